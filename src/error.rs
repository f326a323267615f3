use crate::lexer::LexingError;
use crate::parser::ParsingError;
use thiserror::Error;

/// Message shown to the user in place of the details of an internal error.
pub const GENERIC_FAILURE: &str = "Something went wrong, see the log for details.";

/// Every failure one interpretation cycle can end with.
///
/// The variants fall into two groups:
/// - user-facing errors (`Lexing`, `Parsing`, `InvalidArgument`) describe a problem
///   with the line the user typed and are shown verbatim;
/// - internal errors (`Internal`, `Output`) describe a defect in the console itself or
///   in its configuration. They are logged with context and reported generically.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The line could not be split into tokens.
    #[error(transparent)]
    Lexing(#[from] LexingError),

    /// The tokens do not match any command descriptor.
    #[error(transparent)]
    Parsing(#[from] ParsingError),

    /// A handler rejected the value of one of its arguments.
    #[error("Invalid command argument.")]
    InvalidArgument,

    /// A broken invariant, e.g. a descriptor without a registered handler.
    #[error("{context}: {message}")]
    Internal {
        /// Subsystem that detected the problem.
        context: &'static str,
        message: String,
    },

    /// The output sink refused a write.
    #[error("Output: {0}")]
    Output(#[from] std::io::Error),
}

impl ConsoleError {
    /// Shorthand for building an [`ConsoleError::Internal`].
    pub fn internal(context: &'static str, message: impl Into<String>) -> Self {
        ConsoleError::Internal {
            context,
            message: message.into(),
        }
    }

    /// Whether this error signals a defect rather than bad user input.
    pub fn is_internal(&self) -> bool {
        matches!(self, ConsoleError::Internal { .. } | ConsoleError::Output(_))
    }

    /// Text that may be shown to the user.
    ///
    /// Internal details never leak: they are replaced by [`GENERIC_FAILURE`].
    pub fn user_message(&self) -> String {
        if self.is_internal() {
            GENERIC_FAILURE.to_string()
        } else {
            self.to_string()
        }
    }
}
