mod stdin_recognizer;
mod synthetic;

use minifb::{Key, KeyRepeat, Window, WindowOptions};
use posefx::{
    ActionRegistry, BridgeInput, FxConfig, Grammar, HelpRow, ListenerBridge, RecognitionTask,
    RenderLoop, RgbCanvas, SharedEffects, TickOutcome,
};
use posefx_base::log_fatal;
use std::sync::Arc;
use stdin_recognizer::StdinRecognizer;
use synthetic::SyntheticPerception;
use tokio::sync::mpsc;

const TITLE: &str = "posefx - ESC to exit";
const LOADING_TITLE: &str = "posefx - loading model...";

/// DOM-style code for the keys the action table binds.
fn key_code(key: Key) -> Option<&'static str> {
    match key {
        Key::R => Some("KeyR"),
        Key::S => Some("KeyS"),
        Key::C => Some("KeyC"),
        Key::F => Some("KeyF"),
        Key::H => Some("KeyH"),
        _ => None,
    }
}

fn print_help(rows: &[HelpRow]) {
    println!();
    println!("{:<20} {:<16} {}", "Action", "Say", "Key");
    for row in rows {
        println!("{:<20} {:<16} {}", row.description, row.phrase, row.key);
    }
    println!("{:<20} {:<16} {}", "Toggle voice", "", "v");
    println!();
}

fn forward(input_tx: &mpsc::UnboundedSender<BridgeInput>, input: BridgeInput) {
    if let Err(error) = input_tx.send(input) {
        log::warn!("listener bridge is gone, dropped {:?}", error.0);
    }
}

#[tokio::main]
async fn main() {
    posefx_base::init_stdout_logger();

    let config = match FxConfig::from_env() {
        Ok(config) => config,
        Err(error) => log_fatal!("{}", error),
    };
    let registry = match ActionRegistry::standard(&config) {
        Ok(registry) => Arc::new(registry),
        Err(error) => log_fatal!("{}", error),
    };
    let (width, height) = (config.width(), config.height());

    println!("posefx");
    println!("Resolution: {}x{}", width, height);
    println!("Type voice commands on stdin, ESC in the window to exit");
    let help = registry.help_rows();
    print_help(&help);

    let effects = SharedEffects::default();

    // recognizer events and window keys both feed the bridge
    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (recognition, mut events) =
        RecognitionTask::spawn(StdinRecognizer::new(), Grammar::from_registry(&registry));
    tokio::spawn({
        let input_tx = input_tx.clone();
        async move {
            while let Some(event) = events.recv().await {
                if input_tx.send(BridgeInput::Recognition(event)).is_err() {
                    break;
                }
            }
        }
    });

    let bridge = ListenerBridge::new(
        registry.clone(),
        effects.clone(),
        recognition.controller(),
        &config,
    );
    let mut speech_detection = config.speech_detection();
    let bridge_task = tokio::spawn(bridge.run(input_rx));

    let mut window = match Window::new(TITLE, width, height, WindowOptions::default()) {
        Ok(window) => window,
        Err(error) => log_fatal!("unable to open window: {}", error),
    };

    let mut render = RenderLoop::new(
        SyntheticPerception::new(width, height),
        RgbCanvas::new(width, height),
        effects,
        &config,
    );

    let mut loading = false;
    render
        .run(|canvas, outcome| {
            let waiting = outcome == TickOutcome::Waiting;
            if waiting != loading {
                window.set_title(if waiting { LOADING_TITLE } else { TITLE });
                loading = waiting;
            }

            for key in window.get_keys_pressed(KeyRepeat::No) {
                if key == Key::V {
                    speech_detection = !speech_detection;
                    log::info!("voice commands {}", if speech_detection { "on" } else { "off" });
                    forward(&input_tx, BridgeInput::SpeechDetection(speech_detection));
                    continue;
                }
                if key == Key::H {
                    print_help(&help);
                }
                if let Some(code) = key_code(key) {
                    forward(&input_tx, BridgeInput::Key(code.to_string()));
                }
            }

            if let Err(error) = window.update_with_buffer(&canvas.to_argb(), width, height) {
                log::error!("unable to present frame: {}", error);
                return false;
            }
            window.is_open() && !window.is_key_down(Key::Escape)
        })
        .await;

    drop(input_tx);
    drop(recognition);
    if let Err(error) = bridge_task.await {
        log::warn!("listener bridge task failed: {}", error);
    }
    println!("Exiting...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_code_covers_bound_keys() {
        assert_eq!(key_code(Key::R), Some("KeyR"));
        assert_eq!(key_code(Key::H), Some("KeyH"));
        assert_eq!(key_code(Key::V), None);
    }

    #[test]
    fn test_forward_delivers_input() {
        let (input_tx, mut input_rx) = mpsc::unbounded_channel();
        forward(&input_tx, BridgeInput::Key("KeyC".to_string()));
        assert_eq!(input_rx.try_recv().ok(), Some(BridgeInput::Key("KeyC".to_string())));
    }

    #[test]
    fn test_forward_to_stopped_bridge_is_logged_not_fatal() {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        drop(input_rx);
        forward(&input_tx, BridgeInput::SpeechDetection(false));
        assert!(input_tx.is_closed());
    }
}
