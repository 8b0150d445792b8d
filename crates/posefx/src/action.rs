use crate::{Cannon, EffectList, Freeze, FxConfig, RegistryError, Shadow};
use serde::Serialize;
use std::{collections::HashMap, fmt, sync::Arc};

type Callback = Arc<dyn Fn(&mut EffectList) + Send + Sync>;

/// A user intent: what it is called, how to trigger it and what it does to
/// the effect list.
#[derive(Clone)]
pub struct Action {
    description: String,
    key: String,
    phrases: Vec<String>,
    callback: Callback,
}

impl Action {
    /// `key` is a DOM-style key code such as `KeyR`. `phrases` lists every
    /// literal the recognizer may produce for this intent, misheard
    /// variants included.
    pub fn new(
        description: impl Into<String>,
        key: impl Into<String>,
        phrases: &[&str],
        callback: impl Fn(&mut EffectList) + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            key: key.into(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
            callback: Arc::new(callback),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    /// Key as shown to users: `KeyR` becomes `r`.
    pub fn key_label(&self) -> String {
        self.key
            .strip_prefix("Key")
            .unwrap_or(&self.key)
            .to_lowercase()
    }

    /// Mutate `effects` according to this action.
    pub fn apply(&self, effects: &mut EffectList) {
        (self.callback)(effects);
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("description", &self.description)
            .field("key", &self.key)
            .field("phrases", &self.phrases)
            .finish()
    }
}

/// One line of the help table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HelpRow {
    pub description: String,
    /// First accepted phrase, empty for key-only actions.
    pub phrase: String,
    pub key: String,
}

/// Immutable table of actions with phrase and key lookup.
///
/// Matching is exact and case-sensitive. Recognizer mistakes are absorbed by
/// listing the misheard phrases as aliases, not by fuzzy matching.
#[derive(Debug)]
pub struct ActionRegistry {
    actions: Vec<Action>,
    by_phrase: HashMap<String, usize>,
    by_key: HashMap<String, usize>,
}

impl ActionRegistry {
    /// Index `actions`, rejecting any phrase or key claimed twice.
    pub fn new(actions: Vec<Action>) -> Result<Self, RegistryError> {
        let mut by_phrase: HashMap<String, usize> = HashMap::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for (index, action) in actions.iter().enumerate() {
            for phrase in &action.phrases {
                if let Some(&first) = by_phrase.get(phrase) {
                    return Err(RegistryError::DuplicatePhrase {
                        phrase: phrase.clone(),
                        first: actions[first].description.clone(),
                        second: action.description.clone(),
                    });
                }
                by_phrase.insert(phrase.clone(), index);
            }

            if let Some(&first) = by_key.get(&action.key) {
                return Err(RegistryError::DuplicateKey {
                    key: action.key.clone(),
                    first: actions[first].description.clone(),
                    second: action.description.clone(),
                });
            }
            by_key.insert(action.key.clone(), index);
        }

        Ok(Self {
            actions,
            by_phrase,
            by_key,
        })
    }

    /// Reset, shadow, cannon, freeze and the help toggle.
    pub fn standard(config: &FxConfig) -> Result<Self, RegistryError> {
        let shadow_config = config.clone();
        let cannon_config = config.clone();
        let freeze_config = config.clone();

        Self::new(vec![
            Action::new(
                "Reset effects",
                "KeyR",
                &["reset", "clear", "start over", "restart"],
                |effects| effects.clear(),
            ),
            Action::new(
                "Shadow",
                "KeyS",
                &[
                    "start shadow",
                    "shadow",
                    "shout out",
                    "shut up",
                    "add shadow",
                    "at shadow",
                ],
                move |effects| Shadow::add_to(effects, &shadow_config),
            ),
            Action::new(
                "Start cannon",
                "KeyC",
                &[
                    "start cannon",
                    "start canon",
                    "cannon",
                    "canon",
                    "add cannon",
                    "add canon",
                    "at cannon",
                    "at canon",
                ],
                move |effects| Cannon::add_to(effects, &cannon_config),
            ),
            Action::new(
                "Freeze",
                "KeyF",
                &[
                    "freeze", "free", "fries", "frieze", "priest", "prince", "trees",
                ],
                move |effects| Freeze::add_to(effects, &freeze_config),
            ),
            // the window toggles its own help overlay; nothing to do here
            Action::new("Show/hide controls", "KeyH", &[], |_effects| {}),
        ])
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Every accepted phrase, in table order. Used to constrain the
    /// recognizer's grammar.
    pub fn all_phrases(&self) -> Vec<&str> {
        self.actions
            .iter()
            .flat_map(|action| action.phrases.iter().map(String::as_str))
            .collect()
    }

    pub fn resolve_phrase(&self, phrase: &str) -> Option<&Action> {
        self.by_phrase.get(phrase).map(|&index| &self.actions[index])
    }

    pub fn resolve_key(&self, key: &str) -> Option<&Action> {
        self.by_key.get(key).map(|&index| &self.actions[index])
    }

    pub fn help_rows(&self) -> Vec<HelpRow> {
        self.actions
            .iter()
            .map(|action| HelpRow {
                description: action.description.clone(),
                phrase: action.phrases.first().cloned().unwrap_or_default(),
                key: action.key_label(),
            })
            .collect()
    }

    pub fn help_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.help_rows())
    }
}
