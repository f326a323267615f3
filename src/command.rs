use crate::error::ConsoleError;
use crate::schema::{CommandDescriptor, SchemaStore};
use std::collections::BTreeMap;
use std::io::Write;

/// A line that passed validation against its descriptor.
///
/// Built once per line by the parser and handed to exactly one handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Canonical name of the matched descriptor.
    pub id: String,
    /// Canonical (long) names of the supplied flags, without duplicates,
    /// in order of first occurrence.
    pub flags: Vec<String>,
    /// Argument name, as declared by the matched template, to supplied value.
    pub args: BTreeMap<String, String>,
    pub usage: String,
    pub description: String,
    pub is_secret: bool,
}

impl ParsedCommand {
    pub(crate) fn new(
        descriptor: &CommandDescriptor,
        flags: Vec<String>,
        args: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: descriptor.name.clone(),
            flags,
            args,
            usage: descriptor.usage.clone(),
            description: descriptor.description.clone(),
            is_secret: descriptor.is_secret,
        }
    }

    /// Whether the canonical flag `name` was supplied.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|flag| flag == name)
    }

    /// Value supplied for the argument `name`.
    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }
}

/// A handler registered for one command of the registry.
///
/// Handlers read the validated flags and arguments of a [`ParsedCommand`] and write
/// their output to `stdout`. The only errors a handler should return are user-facing
/// ones ([`ConsoleError::InvalidArgument`]) and failed writes.
pub trait BuiltinCommand: Send + Sync {
    /// Name of the descriptor this handler serves, e.g. "print" or "help".
    fn name(&self) -> &'static str;

    /// Executes the command.
    ///
    /// `schema` is the registry the command was validated against.
    fn execute(
        &self,
        cmd: &ParsedCommand,
        schema: &SchemaStore,
        stdout: &mut dyn Write,
    ) -> Result<(), ConsoleError>;
}
