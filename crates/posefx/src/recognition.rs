//! Messages exchanged with the speech recognizer, and the task that hosts it.
//!
//! The recognizer runs in its own task and talks to the rest of the program
//! only through two channels: `RecognitionControl` in, `RecognitionEvent` out.

use crate::{ActionRegistry, RecognitionError};
use std::future::Future;
use tokio::{sync::mpsc, task::JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionControl {
    Start,
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// The model finished loading.
    Loaded,
    /// A phrase from the grammar was heard.
    Result(String),
    /// Speech was heard but matched nothing in the grammar.
    NoMatch,
    /// The utterance ended and the recognizer stopped listening.
    SpeechEnd,
    Error(RecognitionError),
}

/// The phrases a recognizer is allowed to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    phrases: Vec<String>,
}

impl Grammar {
    pub fn new(phrases: Vec<String>) -> Self {
        Self { phrases }
    }

    pub fn from_registry(registry: &ActionRegistry) -> Self {
        Self::new(
            registry
                .all_phrases()
                .into_iter()
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }

    /// JSGF form, for engines that take a speech grammar document.
    pub fn to_jsgf(&self) -> String {
        format!(
            "#JSGF V1.0; grammar commands; public <command> = {} ;",
            self.phrases.join(" | ")
        )
    }

    /// JSON array of phrases, for engines that take a plain phrase list.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.phrases)
    }
}

/// A speech engine that can be hosted by `RecognitionTask`.
pub trait Recognizer: Send + 'static {
    /// Load the model, constrained to `grammar`.
    fn load(&mut self, grammar: &Grammar) -> impl Future<Output = Result<(), RecognitionError>> + Send;

    /// Wait for the next utterance. `Ok(None)` means the audio input is gone.
    ///
    /// Must be cancel-safe: the host drops this future when a control
    /// message arrives first.
    fn hear(&mut self) -> impl Future<Output = Result<Option<String>, RecognitionError>> + Send;
}

/// Background task running a `Recognizer`.
///
/// After loading it reports `Loaded` and waits for `Start`. While started it
/// reports each utterance (`Result` or `NoMatch`), then `SpeechEnd`, and stops
/// listening until the next `Start`. The task is aborted on drop.
pub struct RecognitionTask {
    control: mpsc::UnboundedSender<RecognitionControl>,
    task: JoinHandle<()>,
}

impl RecognitionTask {
    pub fn spawn<R: Recognizer>(
        recognizer: R,
        grammar: Grammar,
    ) -> (Self, mpsc::UnboundedReceiver<RecognitionEvent>) {
        let (control_tx, control_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run_recognizer(recognizer, grammar, control_rx, event_tx));

        (
            Self {
                control: control_tx,
                task,
            },
            event_rx,
        )
    }

    /// Sender for start/stop requests.
    pub fn controller(&self) -> mpsc::UnboundedSender<RecognitionControl> {
        self.control.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RecognitionTask {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_recognizer<R: Recognizer>(
    mut recognizer: R,
    grammar: Grammar,
    mut control: mpsc::UnboundedReceiver<RecognitionControl>,
    events: mpsc::UnboundedSender<RecognitionEvent>,
) {
    if let Err(error) = recognizer.load(&grammar).await {
        log::warn!("recognizer failed to load: {}", error);
        let _ = events.send(RecognitionEvent::Error(error));
        return;
    }
    log::info!("recognizer loaded with {} phrases", grammar.phrases().len());
    if events.send(RecognitionEvent::Loaded).is_err() {
        return;
    }

    let mut listening = false;
    loop {
        if !listening {
            match control.recv().await {
                Some(RecognitionControl::Start) => listening = true,
                Some(RecognitionControl::Stop) => {}
                None => break,
            }
            continue;
        }

        tokio::select! {
            request = control.recv() => match request {
                Some(RecognitionControl::Start) => {}
                Some(RecognitionControl::Stop) => listening = false,
                None => break,
            },
            heard = recognizer.hear() => {
                let outgoing = match heard {
                    Ok(Some(text)) => {
                        let text = text.trim();
                        // engines sometimes report empty results
                        if text.is_empty() {
                            continue;
                        }
                        if grammar.contains(text) {
                            vec![RecognitionEvent::Result(text.to_string()), RecognitionEvent::SpeechEnd]
                        } else {
                            log::debug!("heard \"{}\", not in grammar", text);
                            vec![RecognitionEvent::NoMatch, RecognitionEvent::SpeechEnd]
                        }
                    }
                    Ok(None) => {
                        log::info!("recognizer input closed");
                        break;
                    }
                    Err(error) => vec![RecognitionEvent::Error(error), RecognitionEvent::SpeechEnd],
                };

                listening = false;
                for event in outgoing {
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
        }
    }
}
