//! Landmark and frame builders for testing.

use std::time::Duration;

use help_signal_core::domain::{
    Frame, HandDetection, HandLandmark, Handedness, Landmark, LandmarkSet, LANDMARK_COUNT,
};
use image::{Rgb, RgbImage};

/// Builder for synthetic hand skeletons.
///
/// Places the wrist at the bottom of the frame and stacks each finger
/// vertically above its knuckle. Shortcuts produce the poses the gesture
/// recognizer cares about; the builder methods tweak individual fingers.
#[derive(Debug, Clone)]
pub struct HandBuilder {
    handedness: Handedness,
    points: Vec<Landmark>,
}

/// Knuckle x positions for index, middle, ring and pinky.
const KNUCKLE_X: [f32; 4] = [0.45, 0.50, 0.55, 0.60];
const KNUCKLE_Y: f32 = 0.60;
const WRIST: Landmark = Landmark::new(0.52, 0.85, 0.0);

impl HandBuilder {
    /// Starts from a relaxed hand: fingers half bent, thumb out to the side.
    #[must_use]
    pub fn new(handedness: Handedness) -> Self {
        let mut builder = Self {
            handedness,
            points: vec![WRIST; LANDMARK_COUNT],
        };
        builder.thumb_out();
        for finger in 0..4 {
            // tip between DIP and PIP: neither raised nor curled
            builder.finger(finger, [0.50, 0.45, 0.52]);
        }
        builder
    }

    /// Open palm with the thumb folded across the index knuckle.
    #[must_use]
    pub fn open_tucked(handedness: Handedness) -> Self {
        let mut builder = Self::new(handedness);
        builder.thumb_in();
        for finger in 0..4 {
            builder.finger(finger, [0.50, 0.40, 0.30]);
        }
        builder
    }

    /// Open palm with the thumb spread away from the hand.
    #[must_use]
    pub fn open_thumb_out(handedness: Handedness) -> Self {
        let mut builder = Self::open_tucked(handedness);
        builder.thumb_out();
        builder
    }

    /// Closed fist with the thumb tucked.
    #[must_use]
    pub fn fist(handedness: Handedness) -> Self {
        let mut builder = Self::new(handedness);
        builder.thumb_in();
        for finger in 0..4 {
            builder.finger(finger, [0.50, 0.55, 0.58]);
        }
        builder
    }

    /// Relaxed hand: neither the open-hand nor the fist shape.
    #[must_use]
    pub fn relaxed(handedness: Handedness) -> Self {
        Self::new(handedness)
    }

    /// Overrides one landmark.
    #[must_use]
    pub fn with_point(mut self, landmark: HandLandmark, x: f32, y: f32) -> Self {
        self.points[landmark.index()] = Landmark::new(x, y, 0.0);
        self
    }

    /// Keeps only the first `len` landmarks, producing a malformed set.
    #[must_use]
    pub fn truncated(mut self, len: usize) -> Self {
        self.points.truncate(len);
        self
    }

    /// Returns the landmark set.
    #[must_use]
    pub fn landmarks(&self) -> LandmarkSet {
        LandmarkSet::new(self.points.clone())
    }

    /// Returns a detection for this hand.
    #[must_use]
    pub fn build(&self) -> HandDetection {
        HandDetection::new(self.handedness, self.landmarks())
    }

    /// Serializes the hand the way a landmark log stores it.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "handedness": self.handedness.as_str(),
            "landmarks": self
                .points
                .iter()
                .map(|p| serde_json::json!({ "x": p.x, "y": p.y, "z": p.z }))
                .collect::<Vec<_>>(),
        })
    }

    /// Sets the y of (PIP, DIP, tip) for finger 0..4 (index..pinky).
    fn finger(&mut self, finger: usize, [pip, dip, tip]: [f32; 3]) {
        let x = KNUCKLE_X[finger];
        let tip_index = HandLandmark::FINGER_TIPS[finger].index();
        self.points[tip_index - 3] = Landmark::new(x, KNUCKLE_Y, 0.0);
        self.points[tip_index - 2] = Landmark::new(x, pip, 0.0);
        self.points[tip_index - 1] = Landmark::new(x, dip, 0.0);
        self.points[tip_index] = Landmark::new(x, tip, 0.0);
    }

    /// Thumb tip across the index knuckle (towards the pinky side).
    fn thumb_in(&mut self) {
        let dir = self.tuck_direction();
        self.set_thumb(KNUCKLE_X[0] + 0.08 * dir);
    }

    /// Thumb tip away from the hand.
    fn thumb_out(&mut self) {
        let dir = self.tuck_direction();
        self.set_thumb(KNUCKLE_X[0] - 0.15 * dir);
    }

    fn set_thumb(&mut self, tip_x: f32) {
        let base = WRIST.x;
        self.points[HandLandmark::ThumbCmc.index()] = Landmark::new(base, 0.78, 0.0);
        self.points[HandLandmark::ThumbMcp.index()] =
            Landmark::new((base + tip_x) / 2.0, 0.72, 0.0);
        self.points[HandLandmark::ThumbIp.index()] =
            Landmark::new((base + 3.0 * tip_x) / 4.0, 0.68, 0.0);
        self.points[HandLandmark::ThumbTip.index()] = Landmark::new(tip_x, 0.66, 0.0);
    }

    /// +1 when a tucked thumb has larger x than the index knuckle.
    const fn tuck_direction(&self) -> f32 {
        match self.handedness {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// Builder for synthetic frames.
pub struct FrameBuilder;

impl FrameBuilder {
    /// A frame without pixels at `index`, stamped at `secs`.
    #[must_use]
    pub fn bare(index: u64, secs: f64) -> Frame {
        Frame::bare(index, Duration::from_secs_f64(secs))
    }

    /// A frame with a uniform gray image.
    #[must_use]
    pub fn gray(index: u64, secs: f64, width: u32, height: u32) -> Frame {
        let image = RgbImage::from_pixel(width, height, Rgb([96, 96, 96]));
        Frame::with_image(index, Duration::from_secs_f64(secs), image)
    }

    /// A frame whose left half is red and right half blue, for mirroring checks.
    #[must_use]
    pub fn split(index: u64, width: u32, height: u32) -> Frame {
        let image = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        Frame::with_image(index, Duration::ZERO, image)
    }
}
