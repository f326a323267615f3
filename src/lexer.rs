//! A module implementing lexical analysis (tokenization) for the one-line command language.
//!
//! The grammar is deliberately small: the first segment of a line is the command name,
//! every following segment is a flag group (`-ab`), a long flag (`--name`), a quoted
//! string argument (`"any text"`) or a bare argument. Characters outside `[a-zA-Z0-9_]`
//! are dropped from names and bare arguments instead of being reported.

use thiserror::Error;

/// Represents a token resulting from lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// The command name, always the first token when present.
    Command(String),
    /// A single letter taken from a `-abc` group.
    ShortFlag(char),
    /// The name following `--`.
    LongFlag(String),
    /// A positional argument, either bare or the interior of a quoted string.
    Argument(String),
}

impl Token {
    /// The literal a flag token carries, `None` for any other token.
    pub fn flag_literal(&self) -> Option<String> {
        match self {
            Token::ShortFlag(c) => Some(c.to_string()),
            Token::LongFlag(name) => Some(name.clone()),
            _ => None,
        }
    }
}

/// Errors that can occur during the lexical analysis process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexingError {
    /// `--` was not followed by any name character.
    #[error("Invalid long flag.")]
    InvalidLongFlag,
    /// `-` was not followed by any flag character.
    #[error("Invalid flag formatting.")]
    InvalidFlagFormat,
    /// A closing double quote was not found.
    #[error("Expected end quote on string argument.")]
    UnfinishedQuote,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

struct Lexer {
    input: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(line: &str) -> Self {
        Lexer {
            input: line.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    /// Walks the input once, left to right, and returns the collected tokens.
    fn make_tokens(mut self) -> Result<Vec<Token>, LexingError> {
        let mut command_lexed = false;

        while let Some(ch) = self.peek_char() {
            if ch == ' ' {
                self.read_char();
                continue;
            }

            if !command_lexed {
                self.lex_command();
                command_lexed = true;
                continue;
            }

            match ch {
                '-' => self.lex_flag()?,
                '"' => self.lex_string()?,
                _ => self.lex_argument(),
            }
        }

        Ok(self.tokens)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    /// Consumes up to the next space, keeping only word characters.
    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.peek_char() {
            if ch == ' ' {
                break;
            }
            self.read_char();
            if is_word_char(ch) {
                word.push(ch);
            }
        }
        word
    }

    fn lex_command(&mut self) {
        let name = self.read_word();
        if !name.is_empty() {
            self.tokens.push(Token::Command(name));
        }
    }

    fn lex_flag(&mut self) -> Result<(), LexingError> {
        self.read_char(); // '-'

        let is_long = self.peek_char() == Some('-');
        if is_long {
            self.read_char();
        }

        // Stops at the first character that cannot belong to a flag; the main loop
        // picks up from there.
        let mut letters = Vec::new();
        while let Some(ch) = self.peek_char() {
            if !is_word_char(ch) {
                break;
            }
            self.read_char();
            letters.push(ch);
        }

        if is_long {
            if letters.is_empty() {
                return Err(LexingError::InvalidLongFlag);
            }
            self.tokens
                .push(Token::LongFlag(letters.into_iter().collect()));
        } else {
            if letters.is_empty() {
                return Err(LexingError::InvalidFlagFormat);
            }
            self.tokens
                .extend(letters.into_iter().map(Token::ShortFlag));
        }
        Ok(())
    }

    fn lex_string(&mut self) -> Result<(), LexingError> {
        self.read_char(); // opening '"'

        let mut content = String::new();
        loop {
            match self.read_char() {
                Some('"') => break,
                Some(ch) => content.push(ch),
                None => return Err(LexingError::UnfinishedQuote),
            }
        }

        self.tokens.push(Token::Argument(content));
        Ok(())
    }

    fn lex_argument(&mut self) {
        let arg = self.read_word();
        if !arg.is_empty() {
            self.tokens.push(Token::Argument(arg));
        }
    }
}

/// The main entry point function to perform lexical analysis.
///
/// # Arguments
/// * `line` - The string to be tokenized.
///
/// # Returns
/// `Result<Vec<Token>, LexingError>`: the tokens in input order, or the first
/// malformed flag or string encountered.
pub fn split_into_tokens(line: &str) -> Result<Vec<Token>, LexingError> {
    Lexer::new(line).make_tokens()
}
