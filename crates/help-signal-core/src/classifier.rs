//! Landmark geometry predicates.
//!
//! Pure functions over a single landmark set. The open-hand test compares each
//! fingertip with the joint one step back (DIP); the fist test compares with
//! the joint two steps back (PIP), so curling is judged more coarsely than
//! extension. Both comparisons use image coordinates, where smaller `y` is
//! higher in the frame.

use thiserror::Error;

use crate::domain::{HandLandmark, HandPose, Handedness, LandmarkSet};

/// Errors raised while evaluating landmark geometry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifierError {
    /// The landmark set is shorter than the anatomical index requires.
    #[error("landmark {landmark:?} missing from a set of {len} points")]
    MissingLandmark {
        /// The landmark that was looked up.
        landmark: HandLandmark,
        /// Number of points actually present.
        len: usize,
    },
}

/// Returns true if the thumb tip is folded across the index knuckle.
///
/// Camera frames are mirrored, so for a right hand a tucked thumb lies to
/// the right of the index MCP and for a left hand to the left of it.
///
/// # Errors
///
/// Returns an error if the set lacks the thumb tip or index MCP.
pub fn thumb_tucked(
    landmarks: &LandmarkSet,
    handedness: Handedness,
) -> Result<bool, ClassifierError> {
    let thumb_tip = landmarks.get(HandLandmark::ThumbTip)?;
    let index_mcp = landmarks.get(HandLandmark::IndexFingerMcp)?;

    Ok(match handedness {
        Handedness::Right => thumb_tip.x > index_mcp.x,
        Handedness::Left => thumb_tip.x < index_mcp.x,
    })
}

/// Returns true if all four fingertips sit above their DIP joints.
///
/// A fingertip level with its joint still counts as raised.
///
/// # Errors
///
/// Returns an error if any fingertip or DIP joint is missing.
pub fn fingers_outstretched(landmarks: &LandmarkSet) -> Result<bool, ClassifierError> {
    for tip in HandLandmark::FINGER_TIPS {
        if landmarks.get(tip)?.y > joint_behind(landmarks, tip, 1)?.y {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns true for a closed fist: thumb tucked and every fingertip at or
/// below its PIP joint.
///
/// # Errors
///
/// Returns an error if any required landmark is missing.
pub fn is_fist(landmarks: &LandmarkSet, handedness: Handedness) -> Result<bool, ClassifierError> {
    if !thumb_tucked(landmarks, handedness)? {
        return Ok(false);
    }
    for tip in HandLandmark::FINGER_TIPS {
        if landmarks.get(tip)?.y < joint_behind(landmarks, tip, 2)?.y {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Evaluates all predicates for one hand.
///
/// # Errors
///
/// Returns an error if the landmark set is incomplete.
pub fn classify(
    landmarks: &LandmarkSet,
    handedness: Handedness,
) -> Result<HandPose, ClassifierError> {
    Ok(HandPose {
        outstretched: fingers_outstretched(landmarks)?,
        thumb_tucked: thumb_tucked(landmarks, handedness)?,
        fist: is_fist(landmarks, handedness)?,
    })
}

fn joint_behind(
    landmarks: &LandmarkSet,
    tip: HandLandmark,
    steps: usize,
) -> Result<crate::domain::Landmark, ClassifierError> {
    let joint = tip
        .joints_back(steps)
        .ok_or(ClassifierError::MissingLandmark {
            landmark: tip,
            len: landmarks.len(),
        })?;
    landmarks.get(joint)
}
