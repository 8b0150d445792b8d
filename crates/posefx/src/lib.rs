//! Real-time pose effects driven by keyboard and voice commands.
//!
//! A render loop feeds each perception result (pose skeletons, body mask) to
//! an ordered list of stateful effects. A listener bridge turns recognized
//! phrases and key codes into mutations of that same list through a fixed
//! action registry.

pub mod action;
pub mod canvas;
pub mod color;
pub mod config;
pub mod draw;
pub mod effect_list;
pub mod effects;
pub mod error;
pub mod listener;
pub mod perception;
pub mod recognition;
pub mod render;
pub mod stats;

pub use action::{Action, ActionRegistry, HelpRow};
pub use canvas::{Canvas, DrawContext, RgbCanvas};
pub use config::{CannonTiming, FxConfig};
pub use effect_list::{EffectList, SharedEffects};
pub use effects::{Cannon, Effect, EffectKind, Freeze, Shadow};
pub use error::{CanvasError, ConfigError, PerceptionError, RecognitionError, RegistryError};
pub use listener::{BridgeInput, ListenerBridge, SpeechGate};
pub use perception::{
    Keypoint, KeypointIndex, Mask, Perception, PerceptionFrame, Pose, COCO_KEYPOINT_COUNT,
};
pub use recognition::{Grammar, RecognitionControl, RecognitionEvent, RecognitionTask, Recognizer};
pub use render::{RenderLoop, TickOutcome};
pub use stats::FrameStats;
