use crate::builtin::{Help, Print, Who};
use crate::command::{BuiltinCommand, ParsedCommand};
use crate::error::ConsoleError;
use crate::schema::SchemaStore;
use std::io::Write;

const CONTEXT: &str = "Commands";

/// Handler table, built once at startup.
///
/// The parser guarantees that a [`ParsedCommand`] names a descriptor of the registry,
/// so a command without a handler is a registration defect, not a user mistake.
pub struct Dispatcher {
    handlers: Vec<Box<dyn BuiltinCommand>>,
}

impl Dispatcher {
    /// Create a dispatcher with a custom set of handlers.
    pub fn new(handlers: Vec<Box<dyn BuiltinCommand>>) -> Self {
        Self { handlers }
    }

    /// Add a handler; a later registration for the same name is never reached.
    pub fn register(&mut self, handler: Box<dyn BuiltinCommand>) {
        self.handlers.push(handler);
    }

    fn find(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.handlers
            .iter()
            .find(|handler| handler.name() == name)
            .map(|handler| handler.as_ref())
    }

    /// Runs the handler registered for `cmd.id`.
    pub fn dispatch(
        &self,
        cmd: &ParsedCommand,
        schema: &SchemaStore,
        stdout: &mut dyn Write,
    ) -> Result<(), ConsoleError> {
        let handler = self.find(&cmd.id).ok_or_else(|| {
            ConsoleError::internal(CONTEXT, format!("Command '{}' not found.", cmd.id))
        })?;
        handler.execute(cmd, schema, stdout)
    }

    /// Fails on the first registry entry that has no handler.
    pub fn check_registry(&self, schema: &SchemaStore) -> Result<(), ConsoleError> {
        for command in schema.all()? {
            if self.find(&command.name).is_none() {
                return Err(ConsoleError::internal(
                    CONTEXT,
                    format!("Command '{}' has no handler.", command.name),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Dispatcher {
    /// Create a dispatcher with the bundled handlers: `help`, `print` and `who`.
    fn default() -> Self {
        Self::new(vec![Box::new(Help), Box::new(Print), Box::new(Who)])
    }
}
