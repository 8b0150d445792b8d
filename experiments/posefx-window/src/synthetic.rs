use posefx::{
    COCO_KEYPOINT_COUNT, Keypoint, KeypointIndex, Mask, Perception, PerceptionError,
    PerceptionFrame, Pose,
};
use std::{f32::consts::TAU, time::Duration};
use tokio::time::Instant;

const WARMUP: Duration = Duration::from_millis(1500);
const MASK_SCALE: usize = 8;

/// Stand-in for a camera plus pose model: one figure dancing in place.
pub struct SyntheticPerception {
    width: usize,
    height: usize,
    started: Instant,
}

impl SyntheticPerception {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            started: Instant::now(),
        }
    }

    fn pose(&self, t: f32) -> Pose {
        use KeypointIndex::*;

        let cx = self.width as f32 * (0.5 + 0.2 * (t * 0.4 * TAU).sin());
        let top = self.height as f32 * 0.2;
        let unit = self.height as f32 * 0.1;
        let wave = (t * TAU).sin();
        let step = (t * 2.0 * TAU).sin();

        let mut keypoints = [Keypoint::new(0.0, 0.0, 0.0); COCO_KEYPOINT_COUNT];
        let mut set = |index: KeypointIndex, dx: f32, dy: f32| {
            keypoints[usize::from(index)] = Keypoint::new(cx + dx * unit, top + dy * unit, 0.9);
        };
        set(Nose, 0.0, 0.0);
        set(LeftEye, -0.2, -0.2);
        set(RightEye, 0.2, -0.2);
        set(LeftEar, -0.4, 0.0);
        set(RightEar, 0.4, 0.0);
        set(LeftShoulder, -0.9, 1.0);
        set(RightShoulder, 0.9, 1.0);
        set(LeftElbow, -1.6, 1.0 - wave);
        set(RightElbow, 1.6, 1.0 + wave);
        set(LeftWrist, -2.0, 0.2 - 2.0 * wave);
        set(RightWrist, 2.0, 0.2 + 2.0 * wave);
        set(LeftHip, -0.6, 3.0);
        set(RightHip, 0.6, 3.0);
        set(LeftKnee, -0.7 - 0.3 * step, 4.4);
        set(RightKnee, 0.7 + 0.3 * step, 4.4);
        set(LeftAnkle, -0.8 - 0.5 * step, 5.8);
        set(RightAnkle, 0.8 + 0.5 * step, 5.8);
        Pose::new(0.9, keypoints)
    }

    /// Coarse silhouette: a box from the shoulders down to the ankles.
    fn mask(&self, pose: &Pose) -> Option<Mask> {
        let mw = self.width / MASK_SCALE;
        let mh = self.height / MASK_SCALE;
        let left = pose.keypoint(KeypointIndex::LeftShoulder).position;
        let right = pose.keypoint(KeypointIndex::RightShoulder).position;
        let ankle = pose.keypoint(KeypointIndex::RightAnkle).position;

        let x0 = (left.x.max(0.0) as usize) / MASK_SCALE;
        let x1 = (right.x.max(0.0) as usize) / MASK_SCALE + 1;
        let y0 = (left.y.max(0.0) as usize) / MASK_SCALE;
        let y1 = (ankle.y.max(0.0) as usize) / MASK_SCALE + 1;

        let mut data = vec![0u8; mw * mh];
        for y in y0..y1.min(mh) {
            for x in x0..x1.min(mw) {
                data[y * mw + x] = 255;
            }
        }
        Mask::new(mw, mh, data)
    }
}

impl Perception for SyntheticPerception {
    fn is_ready(&self) -> bool {
        self.started.elapsed() >= WARMUP
    }

    async fn detect(&mut self) -> Result<PerceptionFrame, PerceptionError> {
        let timestamp = self.started.elapsed();
        let pose = self.pose(timestamp.as_secs_f32());
        let mask = self.mask(&pose);
        Ok(PerceptionFrame::new(timestamp, vec![pose], mask))
    }
}
