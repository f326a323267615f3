//! The command registry: an ordered, read-only set of command descriptors.
//!
//! Descriptors are deserialized from JSON records of the form
//!
//! ```json
//! { "cmd": "print", "flags": [{ "long": "scream", "short": "s" }],
//!   "args": ["content", "content times"], "usage": "...", "description": "...",
//!   "is_secret": false }
//! ```
//!
//! A registry is validated once when it is loaded and never changes afterwards.

use crate::error::ConsoleError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

const CONTEXT: &str = "Schema";

/// The registry bundled with the binary.
const BUILTIN_COMMANDS: &str = include_str!("commands.json");

/// Names the lexer is able to produce; anything else could never be typed.
static WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").expect("word pattern is a valid regex")
});

/// One accepted flag: its canonical long name and an optional short alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagAlias {
    pub long: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
}

impl FlagAlias {
    /// Whether `literal` names this flag, in either its long or its short form.
    pub fn matches(&self, literal: &str) -> bool {
        self.long == literal || self.short.as_deref() == Some(literal)
    }
}

/// Schema entry describing one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDescriptor {
    /// Unique, case-insensitive command name.
    #[serde(rename = "cmd")]
    pub name: String,
    #[serde(default)]
    pub flags: Vec<FlagAlias>,
    /// Arity templates: whitespace separated argument names, `""` for "no arguments".
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub description: String,
    /// Hidden from the general help listing.
    #[serde(default)]
    pub is_secret: bool,
}

impl CommandDescriptor {
    /// Argument names of every template, in declared order.
    pub fn templates(&self) -> impl Iterator<Item = Vec<&str>> + '_ {
        self.args
            .iter()
            .map(|template| template.split_whitespace().collect())
    }

    fn validate(&self) -> Result<(), ConsoleError> {
        if !WORD.is_match(&self.name) {
            return Err(ConsoleError::internal(
                CONTEXT,
                format!("Command name '{}' can not be typed.", self.name),
            ));
        }

        for flag in &self.flags {
            if !WORD.is_match(&flag.long) {
                return Err(ConsoleError::internal(
                    CONTEXT,
                    format!("Flag '{}' of '{}' can not be typed.", flag.long, self.name),
                ));
            }
        }

        // Template words only name map keys, they never have to be typed.
        for names in self.templates() {
            let mut seen = HashSet::new();
            for name in names {
                if !seen.insert(name) {
                    return Err(ConsoleError::internal(
                        CONTEXT,
                        format!("Argument '{}' of '{}' is declared twice.", name, self.name),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Process-wide view of the command registry.
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    commands: Vec<CommandDescriptor>,
}

impl SchemaStore {
    /// Build a store from already deserialized descriptors.
    pub fn new(commands: Vec<CommandDescriptor>) -> Result<Self, ConsoleError> {
        let mut names = HashSet::new();
        for command in &commands {
            command.validate()?;
            if !names.insert(command.name.to_ascii_lowercase()) {
                return Err(ConsoleError::internal(
                    CONTEXT,
                    format!("Command '{}' is declared twice.", command.name),
                ));
            }
        }
        Ok(Self { commands })
    }

    /// Parse a registry from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ConsoleError> {
        let commands: Vec<CommandDescriptor> = serde_json::from_str(json)
            .map_err(|e| ConsoleError::internal(CONTEXT, format!("Failed to parse command set: {e}")))?;
        Self::new(commands)
    }

    /// Read a registry from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConsoleError::internal(
                CONTEXT,
                format!("Failed to read command set from {}: {e}", path.display()),
            )
        })?;
        Self::from_json(&json)
    }

    /// The registry shipped with the crate.
    pub fn builtin() -> Result<Self, ConsoleError> {
        Self::from_json(BUILTIN_COMMANDS)
    }

    /// All descriptors in declared order.
    ///
    /// An empty registry means the command set was never loaded, which is a defect.
    pub fn all(&self) -> Result<&[CommandDescriptor], ConsoleError> {
        if self.commands.is_empty() {
            return Err(ConsoleError::internal(CONTEXT, "Failed to fetch command set."));
        }
        Ok(&self.commands)
    }

    /// Case-insensitive exact lookup by name.
    pub fn find(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands
            .iter()
            .find(|command| command.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_builtin_registry_loads() {
        let store = SchemaStore::builtin().unwrap();
        let names: Vec<&str> = store.all().unwrap().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["help", "print", "who"]);
        assert!(store.find("who").unwrap().is_secret);
        assert!(!store.find("help").unwrap().is_secret);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let store = SchemaStore::builtin().unwrap();
        assert_eq!(store.find("PRINT").unwrap().name, "print");
        assert_eq!(store.find("Help").unwrap().name, "help");
        assert!(store.find("prin").is_none());
    }

    #[test]
    fn test_optional_fields_have_defaults() {
        let store = SchemaStore::from_json(r#"[{ "cmd": "ping" }]"#).unwrap();
        let ping = store.find("ping").unwrap();
        assert!(ping.flags.is_empty());
        assert!(ping.args.is_empty());
        assert!(!ping.is_secret);
    }

    #[test]
    fn test_templates_split_on_whitespace() {
        let store = SchemaStore::from_json(
            r#"[{ "cmd": "mv", "args": ["", "from", "from  to"] }]"#,
        )
        .unwrap();
        let templates: Vec<Vec<&str>> = store.find("mv").unwrap().templates().collect();
        assert_eq!(templates, vec![vec![], vec!["from"], vec!["from", "to"]]);
    }

    #[test]
    fn test_flag_alias_matches_both_forms() {
        let alias = FlagAlias {
            long: "scream".to_string(),
            short: Some("s".to_string()),
        };
        assert!(alias.matches("scream"));
        assert!(alias.matches("s"));
        assert!(!alias.matches("S"));
    }

    #[test]
    fn test_empty_store_is_internal_error() {
        let store = SchemaStore::default();
        assert!(store.all().unwrap_err().is_internal());
        assert!(store.find("help").is_none());
    }

    #[rstest]
    #[case("not json")]
    #[case(r#"[{ "cmd": "a" }, { "cmd": "A" }]"#)]
    #[case(r#"[{ "cmd": "two words" }]"#)]
    #[case(r#"[{ "cmd": "a", "flags": [{ "long": "x-y" }] }]"#)]
    #[case(r#"[{ "cmd": "a", "args": ["b b"] }]"#)]
    fn test_malformed_registry_is_rejected(#[case] json: &str) {
        let err = SchemaStore::from_json(json).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_template_words_need_not_be_typeable() {
        let store =
            SchemaStore::from_json(r#"[{ "cmd": "cp", "args": ["src-path dst-path", "b-c"] }]"#)
                .unwrap();
        let templates: Vec<Vec<&str>> = store.find("cp").unwrap().templates().collect();
        assert_eq!(templates, vec![vec!["src-path", "dst-path"], vec!["b-c"]]);
    }

    #[test]
    fn test_short_alias_may_be_longer_than_one_character() {
        let store = SchemaStore::from_json(
            r#"[{ "cmd": "print", "flags": [{ "long": "scream", "short": "sc" }], "args": ["content"] }]"#,
        )
        .unwrap();
        let alias = &store.find("print").unwrap().flags[0];
        assert!(alias.matches("sc"));
        assert!(!alias.matches("s"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{ "cmd": "greet", "args": ["", "name"], "usage": "greet [name]" }}]"#
        )
        .unwrap();

        let store = SchemaStore::load(file.path()).unwrap();
        let greet = store.find("GREET").unwrap();
        assert_eq!(greet.name, "greet");
        assert_eq!(greet.usage, "greet [name]");
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SchemaStore::load(Path::new("/nonexistent/commands.json")).unwrap_err();
        assert!(err.is_internal());
    }
}
