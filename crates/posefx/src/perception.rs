use crate::PerceptionError;
use posefx_base::Vec2;
use std::time::Duration;

/// Number of keypoints in COCO pose format
pub const COCO_KEYPOINT_COUNT: usize = 17;

/// A single keypoint with pixel position and confidence score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    pub position: Vec2<f32>,
    /// Confidence in [0.0, 1.0].
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            confidence,
        }
    }
}

/// COCO keypoint indices for human pose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const ALL: [KeypointIndex; COCO_KEYPOINT_COUNT] = [
        KeypointIndex::Nose,
        KeypointIndex::LeftEye,
        KeypointIndex::RightEye,
        KeypointIndex::LeftEar,
        KeypointIndex::RightEar,
        KeypointIndex::LeftShoulder,
        KeypointIndex::RightShoulder,
        KeypointIndex::LeftElbow,
        KeypointIndex::RightElbow,
        KeypointIndex::LeftWrist,
        KeypointIndex::RightWrist,
        KeypointIndex::LeftHip,
        KeypointIndex::RightHip,
        KeypointIndex::LeftKnee,
        KeypointIndex::RightKnee,
        KeypointIndex::LeftAnkle,
        KeypointIndex::RightAnkle,
    ];

    /// Snake-case name as reported by pose models (`left_shoulder`).
    pub fn name(self) -> &'static str {
        match self {
            KeypointIndex::Nose => "nose",
            KeypointIndex::LeftEye => "left_eye",
            KeypointIndex::RightEye => "right_eye",
            KeypointIndex::LeftEar => "left_ear",
            KeypointIndex::RightEar => "right_ear",
            KeypointIndex::LeftShoulder => "left_shoulder",
            KeypointIndex::RightShoulder => "right_shoulder",
            KeypointIndex::LeftElbow => "left_elbow",
            KeypointIndex::RightElbow => "right_elbow",
            KeypointIndex::LeftWrist => "left_wrist",
            KeypointIndex::RightWrist => "right_wrist",
            KeypointIndex::LeftHip => "left_hip",
            KeypointIndex::RightHip => "right_hip",
            KeypointIndex::LeftKnee => "left_knee",
            KeypointIndex::RightKnee => "right_knee",
            KeypointIndex::LeftAnkle => "left_ankle",
            KeypointIndex::RightAnkle => "right_ankle",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|index| index.name() == name)
    }
}

impl From<KeypointIndex> for usize {
    fn from(index: KeypointIndex) -> usize {
        index as usize
    }
}

impl TryFrom<usize> for KeypointIndex {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(value).copied().ok_or_else(|| {
            format!("Invalid keypoint index: {}. Must be in range 0-16.", value)
        })
    }
}

/// One detected person
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    /// Confidence score for the person as a whole
    pub score: f32,
    pub keypoints: [Keypoint; COCO_KEYPOINT_COUNT],
}

impl Pose {
    pub fn new(score: f32, keypoints: [Keypoint; COCO_KEYPOINT_COUNT]) -> Self {
        Self { score, keypoints }
    }

    pub fn keypoint(&self, index: KeypointIndex) -> &Keypoint {
        &self.keypoints[usize::from(index)]
    }

    /// Distance between the shoulders, if both were detected with a score
    /// above `threshold`.
    ///
    /// Typically 50-200 px for a person in frame, which makes it a usable
    /// stand-in for distance from the camera.
    pub fn shoulder_width(&self, threshold: f32) -> Option<f32> {
        let left = self.keypoint(KeypointIndex::LeftShoulder);
        let right = self.keypoint(KeypointIndex::RightShoulder);
        if left.confidence >= threshold && right.confidence >= threshold {
            Some(left.position.distance(right.position))
        } else {
            None
        }
    }
}

/// Per-pixel person segmentation; non-zero bytes are foreground.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    /// Returns `None` if `data` does not hold exactly `width * height` bytes.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major bytes, `width * height` of them.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.data[y * self.width + x] != 0
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// The result of one perception pass.
///
/// Immutable once produced. Effects that need history keep their own
/// `Arc` clone of the frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PerceptionFrame {
    /// Capture time relative to the start of the stream.
    pub timestamp: Duration,
    pub poses: Vec<Pose>,
    pub mask: Option<Mask>,
}

impl PerceptionFrame {
    pub fn new(timestamp: Duration, poses: Vec<Pose>, mask: Option<Mask>) -> Self {
        Self {
            timestamp,
            poses,
            mask,
        }
    }

    /// True when no person was detected.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}

/// Source of perception results, typically a pose/segmentation model fed by a camera.
#[allow(async_fn_in_trait)]
pub trait Perception {
    /// Whether the model has finished loading.
    fn is_ready(&self) -> bool;

    /// Run the model on the latest camera frame.
    async fn detect(&mut self) -> Result<PerceptionFrame, PerceptionError>;
}
