use super::{Effect, EffectKind};
use crate::{
    Canvas, EffectList, FxConfig, PerceptionFrame,
    color::{self, Rgb},
    draw,
};
use std::{any::Any, collections::VecDeque, sync::Arc};

const TAIL_COLOR: Rgb = color::LIGHT_GREY;
const HEAD_COLOR: Rgb = [70, 70, 70];

/// Trails the person with fading silhouettes of the last few frames.
///
/// Frames with a mask leave a silhouette; frames without one leave a skeleton.
#[derive(Debug)]
pub struct Shadow {
    length: usize,
    threshold: f32,
    trail: VecDeque<Arc<PerceptionFrame>>,
}

impl Shadow {
    pub fn new(config: &FxConfig) -> Self {
        Self {
            length: config.shadow_trail().max(1),
            threshold: config.keypoint_threshold(),
            trail: VecDeque::new(),
        }
    }

    pub fn add_to(effects: &mut EffectList, config: &FxConfig) {
        log::info!("adding shadow");
        effects.push(Box::new(Shadow::new(config)));
    }

    pub fn retained(&self) -> usize {
        self.trail.len()
    }

    /// Color of trail entry `index` (0 = oldest) out of `count` entries.
    pub fn fade(index: usize, count: usize) -> Rgb {
        if count <= 1 {
            return HEAD_COLOR;
        }
        color::lerp(TAIL_COLOR, HEAD_COLOR, index as f32 / (count - 1) as f32)
    }
}

impl Effect for Shadow {
    fn kind(&self) -> EffectKind {
        EffectKind::Shadow
    }

    fn on_frame(&mut self, frame: &Arc<PerceptionFrame>, canvas: &mut dyn Canvas) {
        self.trail.push_back(Arc::clone(frame));
        while self.trail.len() > self.length {
            self.trail.pop_front();
        }

        // oldest first so the newest silhouette ends up on top
        let count = self.trail.len();
        for (index, past) in self.trail.iter().enumerate() {
            let color = Shadow::fade(index, count);
            match &past.mask {
                Some(mask) => draw::draw_mask(canvas, mask, color),
                None => {
                    for pose in &past.poses {
                        draw::draw_skeleton(canvas, pose, color, self.threshold);
                    }
                }
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
