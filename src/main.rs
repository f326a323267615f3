use anyhow::{Context, Result};
use argh::FromArgs;
use line_console::{Dispatcher, Interpreter, SchemaStore};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Interactive one-line command console.
struct Options {
    #[argh(option, short = 'c')]
    /// interpret a single line and exit instead of starting the interactive loop.
    command: Option<String>,

    #[argh(option)]
    /// load the command registry from this JSON file instead of the bundled one.
    schema: Option<PathBuf>,

    #[argh(option, default = "String::from(\"> \")")]
    /// prompt shown by the interactive loop.
    prompt: String,

    #[argh(switch, short = 'v')]
    /// log debug information to standard error.
    verbose: bool,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn main() -> Result<()> {
    let options: Options = argh::from_env();
    init_tracing(options.verbose)?;

    let schema = match &options.schema {
        Some(path) => SchemaStore::load(path)
            .with_context(|| format!("can't load command registry {}", path.display()))?,
        None => SchemaStore::builtin().context("can't load bundled command registry")?,
    };
    let mut console =
        Interpreter::new(schema, Dispatcher::default()).context("can't register handlers")?;
    info!(commands = console.schema().all()?.len(), "console ready");

    if let Some(line) = options.command {
        if !console.interpret(&line) {
            std::process::exit(1);
        }
        return Ok(());
    }

    console.repl(&options.prompt)?;
    Ok(())
}
