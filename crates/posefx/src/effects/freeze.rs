use super::{Effect, EffectKind};
use crate::{Canvas, EffectList, FxConfig, PerceptionFrame, color::Rgb, draw};
use std::{any::Any, sync::Arc};

/// Captures the first frame with a person in it and keeps redrawing it.
///
/// The capture is never refreshed; a new still needs a new `Freeze`.
#[derive(Debug)]
pub struct Freeze {
    threshold: f32,
    still: Option<Arc<PerceptionFrame>>,
}

impl Freeze {
    /// Color the captured skeletons are drawn in.
    pub const COLOR: Rgb = [40, 90, 200];

    pub fn new(config: &FxConfig) -> Self {
        Self {
            threshold: config.keypoint_threshold(),
            still: None,
        }
    }

    pub fn add_to(effects: &mut EffectList, config: &FxConfig) {
        log::info!("adding freeze");
        effects.push(Box::new(Freeze::new(config)));
    }

    pub fn still(&self) -> Option<&Arc<PerceptionFrame>> {
        self.still.as_ref()
    }
}

impl Effect for Freeze {
    fn kind(&self) -> EffectKind {
        EffectKind::Freeze
    }

    fn on_frame(&mut self, frame: &Arc<PerceptionFrame>, canvas: &mut dyn Canvas) {
        if self.still.is_none() && !frame.is_empty() {
            log::debug!("freeze captured frame at {:?}", frame.timestamp);
            self.still = Some(Arc::clone(frame));
        }

        if let Some(still) = &self.still {
            for pose in &still.poses {
                draw::draw_skeleton(canvas, pose, Self::COLOR, self.threshold);
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
