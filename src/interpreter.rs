use crate::dispatcher::Dispatcher;
use crate::error::ConsoleError;
use crate::lexer;
use crate::parser;
use crate::schema::SchemaStore;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result};
use std::io::Write;
use tracing::{debug, error};

/// The one-line command interpreter.
///
/// The interpreter owns the command registry, the handler table and the output sink.
/// Each line goes through the same cycle: lexing, validation against the registry,
/// then dispatch to the matching handler.
///
/// Example
/// ```
/// use line_console::{Interpreter, MemWriter};
/// let (out, handle) = MemWriter::with_handle();
/// let mut console = Interpreter::builtin().unwrap().with_output(Box::new(out));
/// console.run_line("print --scream hello").unwrap();
/// assert_eq!(handle.borrow().as_slice(), b"HELLO\n");
/// ```
pub struct Interpreter {
    schema: SchemaStore,
    dispatcher: Dispatcher,
    stdout: Box<dyn Write>,
}

impl Interpreter {
    /// Create an interpreter writing to the process standard output.
    ///
    /// Fails when a registry entry has no handler in `dispatcher`.
    pub fn new(schema: SchemaStore, dispatcher: Dispatcher) -> std::result::Result<Self, ConsoleError> {
        dispatcher.check_registry(&schema)?;
        Ok(Self {
            schema,
            dispatcher,
            stdout: Box::new(std::io::stdout()),
        })
    }

    /// Interpreter over the bundled registry and handlers.
    pub fn builtin() -> std::result::Result<Self, ConsoleError> {
        Self::new(SchemaStore::builtin()?, Dispatcher::default())
    }

    /// Redirect all further output to `stdout`.
    pub fn with_output(mut self, stdout: Box<dyn Write>) -> Self {
        self.stdout = stdout;
        self
    }

    /// The registry lines are validated against.
    pub fn schema(&self) -> &SchemaStore {
        &self.schema
    }

    /// Interpret a single line.
    ///
    /// Nothing is written unless the whole line validated.
    pub fn run_line(&mut self, line: &str) -> std::result::Result<(), ConsoleError> {
        let tokens = lexer::split_into_tokens(line)?;
        debug!(?tokens, "lexed line");
        let cmd = parser::parse_command(tokens, &self.schema)?;
        self.dispatcher.dispatch(&cmd, &self.schema, &mut self.stdout)?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Interpret a line and report a failure on the output sink.
    ///
    /// Blank lines are ignored. Returns whether the line succeeded; control always
    /// comes back, even when the sink itself is broken.
    pub fn interpret(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        match self.run_line(line) {
            Ok(()) => true,
            Err(err) => {
                self.report(&err);
                false
            }
        }
    }

    fn report(&mut self, err: &ConsoleError) {
        match err {
            ConsoleError::Internal { context, message } => {
                error!(context, message = %message, "internal console error");
            }
            ConsoleError::Output(e) => {
                error!(context = "Output", message = %e, "internal console error");
            }
            _ => debug!(%err, "rejected line"),
        }
        let written = writeln!(self.stdout, "{}", err.user_message()).and_then(|()| self.stdout.flush());
        if let Err(e) = written {
            error!(context = "Output", message = %e, "failed to report error");
        }
    }

    /// Read-Eval-Print Loop over an interactive line editor.
    ///
    /// Stops on Ctrl-C or Ctrl-D.
    pub fn repl(&mut self, prompt: &str) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    self.interpret(&line);
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}
