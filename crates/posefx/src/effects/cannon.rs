use super::{Effect, EffectKind};
use crate::{
    Canvas, CannonTiming, EffectList, FxConfig, PerceptionFrame,
    color::{self, Rgb},
    draw,
};
use std::{any::Any, collections::VecDeque, sync::Arc, time::Duration};

const COLOR: Rgb = color::BLACK;

/// Replays the skeletons from `delay` seconds ago, like a canon in music.
///
/// Frames are queued oldest-first and the oldest is drawn every tick. With
/// `CannonTiming::AssumedRate` the queue holds at most
/// `delay * assumed_frame_rate` frames. With `CannonTiming::Timestamps` it
/// holds every frame captured within the last `delay`.
#[derive(Debug)]
pub struct Cannon {
    delay: Duration,
    timing: CannonTiming,
    assumed_frame_rate: u32,
    threshold: f32,
    frames: VecDeque<Arc<PerceptionFrame>>,
}

impl Cannon {
    pub fn new(delay_secs: u32, config: &FxConfig) -> Self {
        Self {
            delay: Duration::from_secs(delay_secs as u64),
            timing: config.cannon_timing(),
            assumed_frame_rate: config.assumed_frame_rate(),
            threshold: config.keypoint_threshold(),
            frames: VecDeque::new(),
        }
    }

    /// Append a cannon one second deeper than the cannons already in the
    /// list, so repeated commands build a staircase of echoes.
    pub fn add_to(effects: &mut EffectList, config: &FxConfig) {
        let delay = effects.count(EffectKind::Cannon) as u32 + 1;
        log::info!("adding cannon with {}s delay", delay);
        effects.push(Box::new(Cannon::new(delay, config)));
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of frames kept under `CannonTiming::AssumedRate`.
    pub fn capacity(&self) -> usize {
        ((self.delay.as_secs_f32() * self.assumed_frame_rate as f32).round() as usize).max(1)
    }

    pub fn retained(&self) -> usize {
        self.frames.len()
    }

    /// The frame drawn on the most recent tick.
    pub fn showing(&self) -> Option<&Arc<PerceptionFrame>> {
        self.frames.front()
    }

    fn evict(&mut self, newest: Duration) {
        match self.timing {
            CannonTiming::AssumedRate => {
                let capacity = self.capacity();
                while self.frames.len() > capacity {
                    self.frames.pop_front();
                }
            }
            CannonTiming::Timestamps => {
                while let Some(oldest) = self.frames.front() {
                    if newest.saturating_sub(oldest.timestamp) > self.delay {
                        self.frames.pop_front();
                    } else {
                        break;
                    }
                }
            }
        }
    }
}

impl Effect for Cannon {
    fn kind(&self) -> EffectKind {
        EffectKind::Cannon
    }

    fn on_frame(&mut self, frame: &Arc<PerceptionFrame>, canvas: &mut dyn Canvas) {
        // with timestamp timing, a timestamp going backwards means the
        // stream restarted
        if self.timing == CannonTiming::Timestamps {
            if let Some(newest) = self.frames.back() {
                if frame.timestamp < newest.timestamp {
                    self.frames.clear();
                }
            }
        }

        self.frames.push_back(Arc::clone(frame));
        self.evict(frame.timestamp);

        if let Some(oldest) = self.frames.front() {
            for pose in &oldest.poses {
                draw::draw_skeleton(canvas, pose, COLOR, self.threshold);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
