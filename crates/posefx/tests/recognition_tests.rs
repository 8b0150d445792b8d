use posefx::{
    ActionRegistry, FxConfig, Grammar, RecognitionControl, RecognitionError, RecognitionEvent,
    RecognitionTask, Recognizer,
};
use std::collections::VecDeque;

/// Plays back canned utterances, then waits forever.
struct ScriptedRecognizer {
    load_error: Option<RecognitionError>,
    utterances: VecDeque<Result<Option<String>, RecognitionError>>,
}

impl ScriptedRecognizer {
    fn new(utterances: Vec<Result<Option<&str>, RecognitionError>>) -> Self {
        Self {
            load_error: None,
            utterances: utterances
                .into_iter()
                .map(|u| u.map(|text| text.map(str::to_string)))
                .collect(),
        }
    }

    fn failing(error: RecognitionError) -> Self {
        Self {
            load_error: Some(error),
            utterances: VecDeque::new(),
        }
    }
}

impl Recognizer for ScriptedRecognizer {
    async fn load(&mut self, _grammar: &Grammar) -> Result<(), RecognitionError> {
        match self.load_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn hear(&mut self) -> Result<Option<String>, RecognitionError> {
        match self.utterances.pop_front() {
            Some(utterance) => utterance,
            None => std::future::pending().await,
        }
    }
}

fn grammar() -> Grammar {
    Grammar::new(vec!["freeze".to_string(), "cannon".to_string()])
}

#[test]
fn test_grammar_from_registry() {
    let registry = ActionRegistry::standard(&FxConfig::default()).unwrap();
    let grammar = Grammar::from_registry(&registry);

    assert_eq!(grammar.phrases().len(), 25);
    assert!(grammar.contains("start over"));
    assert!(grammar.contains("trees"));
    assert!(!grammar.contains("Freeze"));
}

#[test]
fn test_grammar_jsgf() {
    assert_eq!(
        grammar().to_jsgf(),
        "#JSGF V1.0; grammar commands; public <command> = freeze | cannon ;"
    );
}

#[test]
fn test_grammar_json() {
    assert_eq!(grammar().to_json().unwrap(), r#"["freeze","cannon"]"#);
}

#[tokio::test]
async fn test_waits_for_start_and_stops_after_each_utterance() {
    let recognizer = ScriptedRecognizer::new(vec![Ok(Some("freeze")), Ok(Some("hello there"))]);
    let (task, mut events) = RecognitionTask::spawn(recognizer, grammar());
    let control = task.controller();

    assert_eq!(events.recv().await, Some(RecognitionEvent::Loaded));

    control.send(RecognitionControl::Start).unwrap();
    assert_eq!(
        events.recv().await,
        Some(RecognitionEvent::Result("freeze".to_string()))
    );
    assert_eq!(events.recv().await, Some(RecognitionEvent::SpeechEnd));
    assert!(events.try_recv().is_err(), "must not listen until restarted");

    control.send(RecognitionControl::Start).unwrap();
    assert_eq!(events.recv().await, Some(RecognitionEvent::NoMatch));
    assert_eq!(events.recv().await, Some(RecognitionEvent::SpeechEnd));
}

#[tokio::test]
async fn test_empty_results_are_ignored() {
    let recognizer = ScriptedRecognizer::new(vec![Ok(Some("  ")), Ok(Some(" cannon "))]);
    let (task, mut events) = RecognitionTask::spawn(recognizer, grammar());

    assert_eq!(events.recv().await, Some(RecognitionEvent::Loaded));
    task.controller().send(RecognitionControl::Start).unwrap();

    assert_eq!(
        events.recv().await,
        Some(RecognitionEvent::Result("cannon".to_string()))
    );
    assert_eq!(events.recv().await, Some(RecognitionEvent::SpeechEnd));
}

#[tokio::test]
async fn test_errors_end_the_utterance() {
    let recognizer = ScriptedRecognizer::new(vec![Err(RecognitionError::NoSpeech)]);
    let (task, mut events) = RecognitionTask::spawn(recognizer, grammar());

    assert_eq!(events.recv().await, Some(RecognitionEvent::Loaded));
    task.controller().send(RecognitionControl::Start).unwrap();

    assert_eq!(
        events.recv().await,
        Some(RecognitionEvent::Error(RecognitionError::NoSpeech))
    );
    assert_eq!(events.recv().await, Some(RecognitionEvent::SpeechEnd));
}

#[tokio::test]
async fn test_load_failure_is_reported() {
    let recognizer = ScriptedRecognizer::failing(RecognitionError::Network);
    let (task, mut events) = RecognitionTask::spawn(recognizer, grammar());

    assert_eq!(
        events.recv().await,
        Some(RecognitionEvent::Error(RecognitionError::Network))
    );
    assert_eq!(events.recv().await, None);
    assert!(task.controller().send(RecognitionControl::Start).is_err());
}

#[tokio::test]
async fn test_closed_input_ends_task() {
    let recognizer = ScriptedRecognizer::new(vec![Ok(None)]);
    let (task, mut events) = RecognitionTask::spawn(recognizer, grammar());

    assert_eq!(events.recv().await, Some(RecognitionEvent::Loaded));
    task.controller().send(RecognitionControl::Start).unwrap();

    assert_eq!(events.recv().await, None);
}

#[test]
fn test_error_codes() {
    assert_eq!(
        RecognitionError::from_code("not-allowed"),
        RecognitionError::NotAllowed
    );
    assert!(RecognitionError::from_code("service-not-allowed").is_permission_denial());
    assert!(!RecognitionError::from_code("no-speech").is_permission_denial());
    assert_eq!(RecognitionError::from_code("no-speech").code(), "no-speech");
}
