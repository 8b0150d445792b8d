use crate::{
    Action, ActionRegistry, FxConfig, RecognitionControl, RecognitionEvent, SharedEffects,
};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};

/// Anything the bridge reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeInput {
    Recognition(RecognitionEvent),
    /// DOM-style key code, e.g. `KeyC`.
    Key(String),
    /// The user flipped the speech detection setting.
    SpeechDetection(bool),
}

/// Whether the recognizer may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeechGate {
    enabled: bool,
    permission_denied: bool,
}

impl SpeechGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            permission_denied: false,
        }
    }

    /// The user setting.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Microphone access was refused; sticky for the session.
    pub fn permission_denied(&self) -> bool {
        self.permission_denied
    }

    pub fn is_allowed(&self) -> bool {
        self.enabled && !self.permission_denied
    }
}

/// Routes keyboard and voice commands to the effect list and decides when
/// the recognizer runs.
///
/// This is the only place the effect list is mutated after startup.
pub struct ListenerBridge {
    registry: Arc<ActionRegistry>,
    effects: SharedEffects,
    control: mpsc::UnboundedSender<RecognitionControl>,
    gate: SpeechGate,
    restart_delay: Duration,
    restart_at: Option<Instant>,
}

impl ListenerBridge {
    pub fn new(
        registry: Arc<ActionRegistry>,
        effects: SharedEffects,
        control: mpsc::UnboundedSender<RecognitionControl>,
        config: &FxConfig,
    ) -> Self {
        Self {
            registry,
            effects,
            control,
            gate: SpeechGate::new(config.speech_detection()),
            restart_delay: config.restart_delay(),
            restart_at: None,
        }
    }

    pub fn gate(&self) -> SpeechGate {
        self.gate
    }

    /// When the pending automatic restart fires, if one is scheduled.
    pub fn pending_restart(&self) -> Option<Instant> {
        self.restart_at
    }

    /// Resolve a recognized phrase and apply its action.
    /// Returns `false` if the phrase is unknown.
    pub fn on_voice_command(&self, phrase: &str) -> bool {
        log::info!("command received: \"{}\"", phrase);
        match self.registry.resolve_phrase(phrase) {
            Some(action) => {
                self.dispatch(action);
                true
            }
            None => {
                log::warn!("command \"{}\" not found", phrase);
                false
            }
        }
    }

    /// Resolve a key code and apply its action.
    /// Returns `false` if no action is bound to the key.
    pub fn on_key(&self, code: &str) -> bool {
        match self.registry.resolve_key(code) {
            Some(action) => {
                log::info!("key {} pressed: {}", code, action.description());
                self.dispatch(action);
                true
            }
            None => {
                log::debug!("no action bound to key {}", code);
                false
            }
        }
    }

    fn dispatch(&self, action: &Action) {
        let count = self.effects.apply(|effects| {
            action.apply(effects);
            effects.len()
        });
        log::debug!("{} applied, {} effects active", action.description(), count);
    }

    /// Apply a change of the speech detection setting.
    pub fn set_speech_detection(&mut self, enabled: bool) {
        self.gate.enabled = enabled;
        if enabled {
            self.start_if_allowed();
        } else {
            self.restart_at = None;
            self.stop();
        }
    }

    pub fn on_recognition_event(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Loaded => self.start_if_allowed(),
            RecognitionEvent::Result(phrase) => {
                self.on_voice_command(&phrase);
            }
            RecognitionEvent::NoMatch => log::info!("no match for voice command"),
            RecognitionEvent::SpeechEnd => {
                log::debug!("speech ended");
                if !self.gate.permission_denied {
                    self.restart_at = Some(Instant::now() + self.restart_delay);
                }
            }
            RecognitionEvent::Error(error) => {
                log::warn!("{}", error);
                if error.is_permission_denial() && !self.gate.permission_denied {
                    log::warn!("microphone permission denied, voice commands disabled");
                    self.gate.permission_denied = true;
                    self.restart_at = None;
                }
            }
        }
    }

    pub fn handle(&mut self, input: BridgeInput) {
        match input {
            BridgeInput::Recognition(event) => self.on_recognition_event(event),
            BridgeInput::Key(code) => {
                self.on_key(&code);
            }
            BridgeInput::SpeechDetection(enabled) => self.set_speech_detection(enabled),
        }
    }

    /// Ask the recognizer to start, if the gate allows it.
    pub fn start_if_allowed(&mut self) {
        if self.gate.is_allowed() {
            self.send(RecognitionControl::Start);
        }
    }

    pub fn stop(&mut self) {
        self.send(RecognitionControl::Stop);
    }

    fn send(&self, request: RecognitionControl) {
        log::debug!("recognizer control: {:?}", request);
        if self.control.send(request).is_err() {
            log::warn!("recognizer is gone, dropped {:?}", request);
        }
    }

    /// Process inputs until every sender is dropped, firing automatic
    /// restarts when they come due.
    pub async fn run(mut self, mut inputs: mpsc::UnboundedReceiver<BridgeInput>) {
        loop {
            let restart_at = self.restart_at;
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.handle(input),
                    None => break,
                },
                _ = sleep_until(restart_at.unwrap_or_else(Instant::now)), if restart_at.is_some() => {
                    self.restart_at = None;
                    self.start_if_allowed();
                }
            }
        }
        log::debug!("listener bridge stopped");
    }
}
