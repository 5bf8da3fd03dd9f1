//! Hand landmark types.
//!
//! A landmark set is the 21-point hand skeleton produced by hand-landmark
//! models, in normalized image coordinates: `x` grows to the right and `y`
//! grows downwards, so a raised fingertip has a *smaller* `y` than its joints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierError;

/// Number of landmarks in a complete hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

/// Anatomical landmark indices of the 21-point hand skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    /// All landmarks in index order.
    pub const ALL: [Self; LANDMARK_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexFingerMcp,
        Self::IndexFingerPip,
        Self::IndexFingerDip,
        Self::IndexFingerTip,
        Self::MiddleFingerMcp,
        Self::MiddleFingerPip,
        Self::MiddleFingerDip,
        Self::MiddleFingerTip,
        Self::RingFingerMcp,
        Self::RingFingerPip,
        Self::RingFingerDip,
        Self::RingFingerTip,
        Self::PinkyMcp,
        Self::PinkyPip,
        Self::PinkyDip,
        Self::PinkyTip,
    ];

    /// Tips of the four non-thumb fingers.
    pub const FINGER_TIPS: [Self; 4] = [
        Self::IndexFingerTip,
        Self::MiddleFingerTip,
        Self::RingFingerTip,
        Self::PinkyTip,
    ];

    /// Position of this landmark in a landmark set.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Landmark `steps` joints closer to the palm along the same finger.
    ///
    /// Only meaningful for fingertips, where the chain tip → DIP → PIP → MCP
    /// occupies consecutive indices.
    #[must_use]
    pub fn joints_back(self, steps: usize) -> Option<Self> {
        self.index()
            .checked_sub(steps)
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Bone segments of the hand skeleton, used for drawing overlays.
pub const HAND_CONNECTIONS: [(HandLandmark, HandLandmark); 21] = {
    use HandLandmark as L;
    [
        (L::Wrist, L::ThumbCmc),
        (L::ThumbCmc, L::ThumbMcp),
        (L::ThumbMcp, L::ThumbIp),
        (L::ThumbIp, L::ThumbTip),
        (L::Wrist, L::IndexFingerMcp),
        (L::IndexFingerMcp, L::IndexFingerPip),
        (L::IndexFingerPip, L::IndexFingerDip),
        (L::IndexFingerDip, L::IndexFingerTip),
        (L::IndexFingerMcp, L::MiddleFingerMcp),
        (L::MiddleFingerMcp, L::MiddleFingerPip),
        (L::MiddleFingerPip, L::MiddleFingerDip),
        (L::MiddleFingerDip, L::MiddleFingerTip),
        (L::MiddleFingerMcp, L::RingFingerMcp),
        (L::RingFingerMcp, L::RingFingerPip),
        (L::RingFingerPip, L::RingFingerDip),
        (L::RingFingerDip, L::RingFingerTip),
        (L::RingFingerMcp, L::PinkyMcp),
        (L::Wrist, L::PinkyMcp),
        (L::PinkyMcp, L::PinkyPip),
        (L::PinkyPip, L::PinkyDip),
        (L::PinkyDip, L::PinkyTip),
    ]
};

/// A single normalized landmark position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (0.0 = left edge, 1.0 = right edge).
    pub x: f32,
    /// Vertical position (0.0 = top edge, 1.0 = bottom edge).
    pub y: f32,
    /// Relative depth, wrist-anchored. Unused by the classifier.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Ordered landmarks of one detected hand in one frame.
///
/// The set is not validated on construction: detectors are trusted to
/// produce complete skeletons, and a short set surfaces as a
/// [`ClassifierError`] when a missing landmark is looked up.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    #[must_use]
    pub const fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Looks up a landmark by its anatomical index.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::MissingLandmark`] if the set is too short.
    pub fn get(&self, landmark: HandLandmark) -> Result<Landmark, ClassifierError> {
        self.points
            .get(landmark.index())
            .copied()
            .ok_or(ClassifierError::MissingLandmark {
                landmark,
                len: self.points.len(),
            })
    }

    /// Number of points in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over the points in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.points.iter()
    }

    /// Mutable access to a landmark, if present.
    pub fn get_mut(&mut self, landmark: HandLandmark) -> Option<&mut Landmark> {
        self.points.get_mut(landmark.index())
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

/// Which hand a landmark set belongs to, as reported by the detector.
///
/// Thumb direction checks mirror on this label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handedness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("left") {
            Ok(Self::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(Self::Right)
        } else {
            Err(format!("unknown handedness '{s}', expected 'Left' or 'Right'"))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_indices_are_sequential() {
        for (i, landmark) in HandLandmark::ALL.iter().enumerate() {
            assert_eq!(landmark.index(), i);
        }
    }

    #[test]
    fn test_joints_back_walks_finger_chain() {
        assert_eq!(
            HandLandmark::IndexFingerTip.joints_back(1),
            Some(HandLandmark::IndexFingerDip)
        );
        assert_eq!(
            HandLandmark::PinkyTip.joints_back(2),
            Some(HandLandmark::PinkyPip)
        );
        assert_eq!(HandLandmark::Wrist.joints_back(1), None);
    }

    #[test]
    fn test_get_missing_landmark() {
        let set = LandmarkSet::new(vec![Landmark::default(); 4]);
        let err = set.get(HandLandmark::IndexFingerMcp).unwrap_err();
        assert_eq!(
            err,
            ClassifierError::MissingLandmark {
                landmark: HandLandmark::IndexFingerMcp,
                len: 4,
            }
        );
        assert!(set.get(HandLandmark::ThumbIp).is_ok());
    }

    #[test]
    fn test_handedness_parse() {
        assert_eq!("Right".parse::<Handedness>(), Ok(Handedness::Right));
        assert_eq!("left".parse::<Handedness>(), Ok(Handedness::Left));
        assert!("both".parse::<Handedness>().is_err());
    }

    #[test]
    fn test_landmark_z_defaults_to_zero() {
        let lm: Landmark = serde_json::from_str(r#"{"x": 0.25, "y": 0.5}"#).unwrap();
        assert_eq!(lm, Landmark::new(0.25, 0.5, 0.0));
    }

    #[test]
    fn test_connections_reference_valid_landmarks() {
        for (a, b) in HAND_CONNECTIONS {
            assert!(a.index() < LANDMARK_COUNT);
            assert!(b.index() < LANDMARK_COUNT);
            assert_ne!(a, b);
        }
    }
}
