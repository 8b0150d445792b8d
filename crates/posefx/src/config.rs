use crate::ConfigError;
use std::time::Duration;

/// How the cannon converts its delay into a retained-frame window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannonTiming {
    /// Keep `delay * assumed_frame_rate` frames regardless of the real tick rate.
    AssumedRate,
    /// Keep frames whose timestamps fall within the last `delay` seconds.
    Timestamps,
}

/// Runtime settings shared by the render loop, the effects and the listener bridge.
#[derive(Clone, Debug)]
pub struct FxConfig {
    width: usize,
    height: usize,
    assumed_frame_rate: u32,
    cannon_timing: CannonTiming,
    shadow_trail: usize,
    keypoint_threshold: f32,
    restart_delay: Duration,
    speech_detection: bool,
    target_fps: u32,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            // the perception model runs at roughly this rate on a laptop
            assumed_frame_rate: 17,
            cannon_timing: CannonTiming::AssumedRate,
            shadow_trail: 5,
            keypoint_threshold: 0.1,
            restart_delay: Duration::from_secs(1),
            speech_detection: true,
            target_fps: 30,
        }
    }
}

impl FxConfig {
    /// Defaults overridden by any `POSEFX_*` environment variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("POSEFX_WIDTH") {
            config.width = parse_positive("POSEFX_WIDTH", &value)?;
        }
        if let Some(value) = lookup("POSEFX_HEIGHT") {
            config.height = parse_positive("POSEFX_HEIGHT", &value)?;
        }
        if let Some(value) = lookup("POSEFX_FRAME_RATE") {
            config.assumed_frame_rate = parse_positive("POSEFX_FRAME_RATE", &value)?;
        }
        if let Some(value) = lookup("POSEFX_CANNON_TIMING") {
            config.cannon_timing = match value.trim() {
                "frames" => CannonTiming::AssumedRate,
                "timestamps" => CannonTiming::Timestamps,
                _ => return Err(invalid("POSEFX_CANNON_TIMING", &value)),
            };
        }
        if let Some(value) = lookup("POSEFX_SHADOW_TRAIL") {
            config.shadow_trail = parse_positive("POSEFX_SHADOW_TRAIL", &value)?;
        }
        if let Some(value) = lookup("POSEFX_KEYPOINT_THRESHOLD") {
            let threshold: f32 = value
                .trim()
                .parse()
                .map_err(|_| invalid("POSEFX_KEYPOINT_THRESHOLD", &value))?;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(invalid("POSEFX_KEYPOINT_THRESHOLD", &value));
            }
            config.keypoint_threshold = threshold;
        }
        if let Some(value) = lookup("POSEFX_RESTART_DELAY_MS") {
            let millis: u64 = value
                .trim()
                .parse()
                .map_err(|_| invalid("POSEFX_RESTART_DELAY_MS", &value))?;
            config.restart_delay = Duration::from_millis(millis);
        }
        if let Some(value) = lookup("POSEFX_SPEECH") {
            config.speech_detection = match value.trim() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => return Err(invalid("POSEFX_SPEECH", &value)),
            };
        }
        if let Some(value) = lookup("POSEFX_TARGET_FPS") {
            config.target_fps = parse_positive("POSEFX_TARGET_FPS", &value)?;
        }

        Ok(config)
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Frame rate the cannon assumes when counting frames.
    pub fn with_assumed_frame_rate(mut self, rate: u32) -> Self {
        self.assumed_frame_rate = rate;
        self
    }

    pub fn with_cannon_timing(mut self, timing: CannonTiming) -> Self {
        self.cannon_timing = timing;
        self
    }

    /// Number of past frames the shadow keeps.
    pub fn with_shadow_trail(mut self, frames: usize) -> Self {
        self.shadow_trail = frames;
        self
    }

    pub fn with_keypoint_threshold(mut self, threshold: f32) -> Self {
        self.keypoint_threshold = threshold;
        self
    }

    /// Pause between end of speech and the automatic recognizer restart.
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    pub fn with_speech_detection(mut self, enabled: bool) -> Self {
        self.speech_detection = enabled;
        self
    }

    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    // Getters
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn assumed_frame_rate(&self) -> u32 {
        self.assumed_frame_rate
    }

    pub fn cannon_timing(&self) -> CannonTiming {
        self.cannon_timing
    }

    pub fn shadow_trail(&self) -> usize {
        self.shadow_trail
    }

    pub fn keypoint_threshold(&self) -> f32 {
        self.keypoint_threshold
    }

    pub fn restart_delay(&self) -> Duration {
        self.restart_delay
    }

    pub fn speech_detection(&self) -> bool {
        self.speech_detection
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Interval between render ticks.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        _ => Err(invalid(key, value)),
    }
}
