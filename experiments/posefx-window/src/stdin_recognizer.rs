use posefx::{Grammar, RecognitionError, Recognizer};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Treats each line typed on stdin as one utterance.
///
/// A line of the form `!code` reports that recognizer error instead, e.g.
/// `!not-allowed`.
pub struct StdinRecognizer {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinRecognizer {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Recognizer for StdinRecognizer {
    async fn load(&mut self, grammar: &Grammar) -> Result<(), RecognitionError> {
        log::debug!("grammar: {}", grammar.to_jsgf());
        Ok(())
    }

    async fn hear(&mut self) -> Result<Option<String>, RecognitionError> {
        let line = self
            .lines
            .next_line()
            .await
            .map_err(|error| RecognitionError::Other(error.to_string()))?;
        match line {
            Some(line) => match line.trim().strip_prefix('!') {
                Some(code) => Err(RecognitionError::from_code(code)),
                None => Ok(Some(line)),
            },
            None => Ok(None),
        }
    }
}
