use std::fmt;

/// Rejected action table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two actions accept the same phrase.
    DuplicatePhrase {
        phrase: String,
        first: String,
        second: String,
    },
    /// Two actions are bound to the same key code.
    DuplicateKey {
        key: String,
        first: String,
        second: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicatePhrase { phrase, first, second } => write!(
                f,
                "phrase \"{phrase}\" is claimed by both \"{first}\" and \"{second}\""
            ),
            RegistryError::DuplicateKey { key, first, second } => write!(
                f,
                "key {key} is bound to both \"{first}\" and \"{second}\""
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug, Clone, PartialEq)]
pub enum PerceptionError {
    /// `detect` was called before the model finished loading.
    NotReady,
    /// The model failed on this frame.
    Model(String),
    /// The perception source has shut down.
    Closed,
}

impl fmt::Display for PerceptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerceptionError::NotReady => write!(f, "perception model is not ready"),
            PerceptionError::Model(msg) => write!(f, "perception model error: {msg}"),
            PerceptionError::Closed => write!(f, "perception source closed"),
        }
    }
}

impl std::error::Error for PerceptionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Invalid { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid { key, value } => {
                write!(f, "invalid value for {key}: \"{value}\"")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    SizeMismatch { expected: usize, got: usize },
}

impl fmt::Display for CanvasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanvasError::SizeMismatch { expected, got } => {
                write!(f, "pixel buffer size mismatch: expected {expected} bytes, got {got}")
            }
        }
    }
}

impl std::error::Error for CanvasError {}

/// Error reported by the speech recognizer, keyed by its reason code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    NotAllowed,
    ServiceNotAllowed,
    NoSpeech,
    Aborted,
    AudioCapture,
    Network,
    Other(String),
}

impl RecognitionError {
    pub fn from_code(code: &str) -> Self {
        match code {
            "not-allowed" => RecognitionError::NotAllowed,
            "service-not-allowed" => RecognitionError::ServiceNotAllowed,
            "no-speech" => RecognitionError::NoSpeech,
            "aborted" => RecognitionError::Aborted,
            "audio-capture" => RecognitionError::AudioCapture,
            "network" => RecognitionError::Network,
            other => RecognitionError::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            RecognitionError::NotAllowed => "not-allowed",
            RecognitionError::ServiceNotAllowed => "service-not-allowed",
            RecognitionError::NoSpeech => "no-speech",
            RecognitionError::Aborted => "aborted",
            RecognitionError::AudioCapture => "audio-capture",
            RecognitionError::Network => "network",
            RecognitionError::Other(code) => code,
        }
    }

    /// The user or platform refused microphone access.
    pub fn is_permission_denial(&self) -> bool {
        matches!(
            self,
            RecognitionError::NotAllowed | RecognitionError::ServiceNotAllowed
        )
    }
}

impl fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "speech recognition error: {}", self.code())
    }
}

impl std::error::Error for RecognitionError {}
