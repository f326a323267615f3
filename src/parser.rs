use crate::command::ParsedCommand;
use crate::lexer::Token;
use crate::schema::{CommandDescriptor, SchemaStore};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Errors raised while matching tokens against a command descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingError {
    /// The line does not start with a command name.
    #[error("Invalid command.")]
    InvalidCommand,
    /// No descriptor carries the given name.
    #[error("Command not found.")]
    CommandNotFound,
    /// The flag literal is not declared by the descriptor.
    #[error("Flag '{0}' not valid.")]
    InvalidFlag(String),
    /// Something other than an argument follows the first argument.
    #[error("Invalid command format.")]
    InvalidFormat,
    /// No arity template accepts the number of supplied arguments.
    #[error("Command arguments are incorrect.")]
    IncorrectArguments,
}

struct CommandParser<'s> {
    tokens: Vec<Token>,
    pos: usize,
    schema: &'s SchemaStore,
}

impl<'s> CommandParser<'s> {
    fn new(tokens: Vec<Token>, schema: &'s SchemaStore) -> Self {
        CommandParser {
            tokens,
            pos: 0,
            schema,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn build(mut self) -> Result<ParsedCommand, ParsingError> {
        let descriptor = self.parse_name()?;

        let flags = self.parse_flags();
        let flags = validate_flags(&flags, descriptor)?;

        let args = self.parse_args();
        // Flags are only accepted before the first argument.
        if !self.is_at_end() {
            return Err(ParsingError::InvalidFormat);
        }
        let args = validate_args(args, descriptor)?;

        Ok(ParsedCommand::new(descriptor, flags, args))
    }

    fn parse_name(&mut self) -> Result<&'s CommandDescriptor, ParsingError> {
        let name = match self.peek() {
            Some(Token::Command(name)) => name,
            _ => return Err(ParsingError::InvalidCommand),
        };
        let descriptor = self
            .schema
            .find(name)
            .ok_or(ParsingError::CommandNotFound)?;
        self.consume();
        Ok(descriptor)
    }

    /// Collects the literals of the leading run of flag tokens.
    fn parse_flags(&mut self) -> Vec<String> {
        let mut flags = Vec::new();
        while let Some(literal) = self.peek().and_then(Token::flag_literal) {
            self.consume();
            flags.push(literal);
        }
        flags
    }

    fn parse_args(&mut self) -> Vec<String> {
        let mut args = Vec::new();
        while let Some(Token::Argument(_)) = self.peek() {
            if let Some(Token::Argument(value)) = self.consume() {
                args.push(value);
            }
        }
        args
    }
}

/// Resolves every supplied literal to its canonical long name.
///
/// A literal may name either form of an alias regardless of how it was typed,
/// so `--s` is accepted wherever `-s` is.
fn validate_flags(
    supplied: &[String],
    descriptor: &CommandDescriptor,
) -> Result<Vec<String>, ParsingError> {
    let mut canonical: Vec<String> = Vec::new();
    for literal in supplied {
        let alias = descriptor
            .flags
            .iter()
            .find(|alias| alias.matches(literal))
            .ok_or_else(|| ParsingError::InvalidFlag(literal.clone()))?;
        if !canonical.contains(&alias.long) {
            canonical.push(alias.long.clone());
        }
    }
    Ok(canonical)
}

/// Binds the supplied values to the first template with the same number of names.
fn validate_args(
    supplied: Vec<String>,
    descriptor: &CommandDescriptor,
) -> Result<BTreeMap<String, String>, ParsingError> {
    let names = descriptor
        .templates()
        .find(|names| names.len() == supplied.len())
        .ok_or(ParsingError::IncorrectArguments)?;

    Ok(names
        .into_iter()
        .map(str::to_string)
        .zip(supplied)
        .collect())
}

/// Validates a token stream against the registry and builds the command it describes.
///
/// # Arguments
///
/// * `tokens` - The tokens of one line, as produced by [`crate::lexer::split_into_tokens`].
/// * `schema` - The registry the command name is looked up in.
///
/// # Returns
///
/// * `Result<ParsedCommand, ParsingError>` - the validated command, or the first
///   mismatch found. Flags are checked before the arguments are.
pub fn parse_command(
    tokens: Vec<Token>,
    schema: &SchemaStore,
) -> Result<ParsedCommand, ParsingError> {
    let parsed = CommandParser::new(tokens, schema).build()?;
    debug!(id = %parsed.id, flags = ?parsed.flags, args = ?parsed.args, "parsed command");
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::split_into_tokens;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn schema() -> SchemaStore {
        SchemaStore::from_json(
            r#"[
                { "cmd": "print",
                  "flags": [{ "long": "scream", "short": "s" }, { "long": "whisper", "short": "w" }],
                  "args": ["content", "content times"],
                  "usage": "print <content> [times]", "description": "Prints." },
                { "cmd": "help", "flags": [], "args": ["", "name"],
                  "usage": "help [command]", "description": "Helps." },
                { "cmd": "strict", "flags": [{ "long": "scream" }], "args": [""] },
                { "cmd": "twice", "args": ["first", "second"] }
            ]"#,
        )
        .unwrap()
    }

    fn parse(line: &str) -> Result<ParsedCommand, ParsingError> {
        parse_command(split_into_tokens(line).unwrap(), &schema())
    }

    fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_flags_and_arguments_are_resolved() {
        let cmd = parse("print -s \"hello world\" 3").unwrap();
        assert_eq!(cmd.id, "print");
        assert_eq!(cmd.flags, vec!["scream".to_string()]);
        assert_eq!(cmd.args, args(&[("content", "hello world"), ("times", "3")]));
        assert_eq!(cmd.usage, "print <content> [times]");
        assert_eq!(cmd.description, "Prints.");
        assert!(!cmd.is_secret);
    }

    #[rstest]
    #[case("print -s x")]
    #[case("print --scream x")]
    #[case("print -s --scream x")]
    #[case("print --scream -ss x")]
    #[case("print --s x")]
    fn test_aliases_collapse_to_canonical_flag(#[case] line: &str) {
        let cmd = parse(line).unwrap();
        assert_eq!(cmd.flags, vec!["scream".to_string()]);
        assert!(cmd.has_flag("scream"));
        assert!(!cmd.has_flag("s"));
    }

    #[test]
    fn test_multi_character_short_alias_is_reachable_as_long_flag() {
        let store = SchemaStore::from_json(
            r#"[{ "cmd": "print", "flags": [{ "long": "scream", "short": "sc" }], "args": ["content"] }]"#,
        )
        .unwrap();
        let cmd = parse_command(split_into_tokens("print --sc hi").unwrap(), &store).unwrap();
        assert_eq!(cmd.flags, vec!["scream".to_string()]);
        assert_eq!(cmd.arg("content"), Some("hi"));
    }

    #[test]
    fn test_flag_order_follows_first_occurrence() {
        let cmd = parse("print -w --scream -sw x").unwrap();
        assert_eq!(cmd.flags, vec!["whisper".to_string(), "scream".to_string()]);
    }

    #[test]
    fn test_command_lookup_is_case_insensitive() {
        let cmd = parse("PRINT hi").unwrap();
        assert_eq!(cmd.id, "print");
        assert_eq!(cmd.arg("content"), Some("hi"));
    }

    #[test]
    fn test_templates_match_by_word_count() {
        assert!(parse("help").unwrap().args.is_empty());
        assert_eq!(parse("help print").unwrap().args, args(&[("name", "print")]));
        assert_eq!(parse("help a b"), Err(ParsingError::IncorrectArguments));
    }

    #[test]
    fn test_values_bind_positionally() {
        let cmd = parse("twice b a").unwrap();
        assert_eq!(cmd.arg("first"), Some("b"));
        assert_eq!(cmd.arg("second"), Some("a"));
        assert_eq!(cmd.arg("third"), None);
    }

    #[test]
    fn test_arity_is_strict() {
        assert_eq!(
            parse("strict --scream \"hello world\" 3"),
            Err(ParsingError::IncorrectArguments)
        );
        assert_eq!(parse("print"), Err(ParsingError::IncorrectArguments));
    }

    #[test]
    fn test_unknown_flag_is_reported_before_arguments() {
        assert_eq!(
            parse("print --loud a b c d"),
            Err(ParsingError::InvalidFlag("loud".to_string()))
        );
        assert_eq!(
            parse("help -x"),
            Err(ParsingError::InvalidFlag("x".to_string()))
        );
    }

    #[test]
    fn test_flag_after_argument_is_invalid_format() {
        assert_eq!(parse("print hello -s"), Err(ParsingError::InvalidFormat));
        assert_eq!(parse("print -s hello --scream 2"), Err(ParsingError::InvalidFormat));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse("foo"), Err(ParsingError::CommandNotFound));
        assert_eq!(parse("foo --anything"), Err(ParsingError::CommandNotFound));
    }

    #[test]
    fn test_missing_command_token() {
        assert_eq!(parse(""), Err(ParsingError::InvalidCommand));
        assert_eq!(parse("!!! print"), Err(ParsingError::InvalidCommand));

        let tokens = vec![Token::Argument("print".to_string())];
        assert_eq!(
            parse_command(tokens, &schema()),
            Err(ParsingError::InvalidCommand)
        );
    }

    #[test]
    fn test_first_matching_template_wins() {
        let store = SchemaStore::from_json(
            r#"[{ "cmd": "pick", "args": ["left", "right"] }]"#,
        )
        .unwrap();
        let tokens = split_into_tokens("pick x").unwrap();
        let cmd = parse_command(tokens, &store).unwrap();
        assert_eq!(cmd.args, args(&[("left", "x")]));
    }

    #[test]
    fn test_command_without_templates_rejects_everything() {
        let store = SchemaStore::from_json(r#"[{ "cmd": "bare" }]"#).unwrap();
        let tokens = split_into_tokens("bare").unwrap();
        assert_eq!(
            parse_command(tokens, &store),
            Err(ParsingError::IncorrectArguments)
        );
    }
}
