use crate::{
    Canvas, FrameStats, FxConfig, Perception, SharedEffects,
    color::{self, Rgb},
    draw,
};
use std::{sync::Arc, time::Duration};
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The perception model is still loading; nothing was drawn.
    Waiting,
    /// Detection failed for this tick; nothing was drawn.
    Skipped,
    /// A frame was drawn through this many effects.
    Rendered { effects: usize },
}

/// Drives perception and drawing, one frame per tick.
pub struct RenderLoop<P, C> {
    perception: P,
    canvas: C,
    effects: SharedEffects,
    stats: FrameStats,
    mask_color: Rgb,
    frame_interval: Duration,
}

impl<P: Perception, C: Canvas> RenderLoop<P, C> {
    pub fn new(perception: P, canvas: C, effects: SharedEffects, config: &FxConfig) -> Self {
        Self {
            perception,
            canvas,
            effects,
            stats: FrameStats::new(),
            mask_color: color::MASK_TINT,
            frame_interval: config.frame_interval(),
        }
    }

    pub fn with_mask_color(mut self, color: Rgb) -> Self {
        self.mask_color = color;
        self
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn perception(&self) -> &P {
        &self.perception
    }

    pub fn perception_mut(&mut self) -> &mut P {
        &mut self.perception
    }

    pub fn effects(&self) -> &SharedEffects {
        &self.effects
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// One pass: detect, draw the mask, then run every effect in list order.
    ///
    /// Awaiting detection is the only suspension point. Commands handled
    /// meanwhile are visible to this tick's effect pass, which itself runs
    /// synchronously under the effect list lock.
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.perception.is_ready() {
            return TickOutcome::Waiting;
        }

        let frame = match self.perception.detect().await {
            Ok(frame) => Arc::new(frame),
            Err(error) => {
                log::warn!("skipping frame: {}", error);
                return TickOutcome::Skipped;
            }
        };

        self.canvas.clear(color::BACKGROUND);
        if let Some(mask) = &frame.mask {
            draw::draw_mask(&mut self.canvas, mask, self.mask_color);
        }
        self.canvas.loaded();

        let effects = self.effects.render(&frame, &mut self.canvas);
        self.stats.record(Instant::now());

        TickOutcome::Rendered { effects }
    }

    /// Tick at the configured frame rate, handing the canvas to `present`
    /// after each tick. Runs until `present` returns `false`.
    pub async fn run(&mut self, mut present: impl FnMut(&C, TickOutcome) -> bool) {
        let mut refresh = tokio::time::interval(self.frame_interval);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            refresh.tick().await;
            let outcome = self.tick().await;
            if !present(&self.canvas, outcome) {
                break;
            }
        }
        log::info!("render loop stopped after {} frames", self.stats.total());
    }
}
