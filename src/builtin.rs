use crate::command::{BuiltinCommand, ParsedCommand};
use crate::error::ConsoleError;
use crate::schema::SchemaStore;
use std::io::Write;

/// Lists the available commands, or describes one of them.
pub struct Help;

impl BuiltinCommand for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn execute(
        &self,
        cmd: &ParsedCommand,
        schema: &SchemaStore,
        stdout: &mut dyn Write,
    ) -> Result<(), ConsoleError> {
        if let Some(name) = cmd.arg("name") {
            let target = schema
                .find(name)
                .filter(|target| !target.is_secret)
                .ok_or(ConsoleError::InvalidArgument)?;

            writeln!(stdout, "Name:\n  {}\n", target.name)?;
            writeln!(stdout, "Description:\n  {}\n", target.description)?;
            writeln!(stdout, "Usage:\n  {}\n", target.usage)?;
            return Ok(());
        }

        let visible: Vec<_> = schema
            .all()?
            .iter()
            .filter(|command| !command.is_secret)
            .collect();
        let width = visible
            .iter()
            .map(|command| command.name.len())
            .max()
            .unwrap_or(0)
            + 3;

        writeln!(stdout, "Available Commands:")?;
        for command in visible {
            writeln!(stdout, "  {:<width$}{}", command.name, command.usage)?;
        }
        writeln!(
            stdout,
            "\n\nType 'help <command>' for usage, examples, and option details."
        )?;
        Ok(())
    }
}

/// Largest repeat count `print` accepts.
pub const MAX_REPEAT: usize = 1000;

/// Writes its content argument, optionally transformed and repeated up to
/// [`MAX_REPEAT`] times.
pub struct Print;

impl BuiltinCommand for Print {
    fn name(&self) -> &'static str {
        "print"
    }

    fn execute(
        &self,
        cmd: &ParsedCommand,
        _schema: &SchemaStore,
        stdout: &mut dyn Write,
    ) -> Result<(), ConsoleError> {
        let content = cmd.arg("content").unwrap_or_default();
        let times = match cmd.arg("times") {
            Some(times) => times
                .parse::<usize>()
                .ok()
                .filter(|times| *times <= MAX_REPEAT)
                .ok_or(ConsoleError::InvalidArgument)?,
            None => 1,
        };

        let content = if cmd.has_flag("scream") {
            content.to_uppercase()
        } else if cmd.has_flag("whisper") {
            content.to_lowercase()
        } else {
            content.to_string()
        };

        for _ in 0..times {
            writeln!(stdout, "{}", content)?;
        }
        Ok(())
    }
}

/// Answers with a fixed line; hidden from the listing.
pub struct Who;

impl BuiltinCommand for Who {
    fn name(&self) -> &'static str {
        "who"
    }

    fn execute(
        &self,
        _cmd: &ParsedCommand,
        _schema: &SchemaStore,
        stdout: &mut dyn Write,
    ) -> Result<(), ConsoleError> {
        writeln!(stdout, "Who, me?")?;
        Ok(())
    }
}
