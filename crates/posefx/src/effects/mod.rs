mod cannon;
mod freeze;
mod shadow;

pub use cannon::Cannon;
pub use freeze::Freeze;
pub use shadow::Shadow;

use crate::{Canvas, PerceptionFrame};
use std::{any::Any, fmt, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Cannon,
    Freeze,
    Shadow,
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectKind::Cannon => write!(f, "cannon"),
            EffectKind::Freeze => write!(f, "freeze"),
            EffectKind::Shadow => write!(f, "shadow"),
        }
    }
}

/// A stateful visual transform applied once per perception result.
///
/// Effects own whatever history they need. The frame passed to `on_frame`
/// is shared; keeping it past the call means cloning the `Arc`.
pub trait Effect: Send {
    fn kind(&self) -> EffectKind;

    /// Consume one perception result and draw onto `canvas`.
    ///
    /// Must not block: the whole effect list is drawn in one synchronous pass.
    fn on_frame(&mut self, frame: &Arc<PerceptionFrame>, canvas: &mut dyn Canvas);

    fn as_any(&self) -> &dyn Any;
}

impl fmt::Debug for dyn Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Effect({})", self.kind())
    }
}
