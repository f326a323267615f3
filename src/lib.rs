//! A small interactive one-line command interpreter.
//!
//! A line of text is split into tokens by the [`lexer`], validated against a registry of
//! command descriptors ([`SchemaStore`]) by the [`parser`], and handed to the handler
//! registered for it in a [`Dispatcher`]. Handlers write their output to a sink owned by
//! the [`Interpreter`].
//!
//! The command language is intentionally tiny: `name [-abc | --flag]... [arg | "quoted arg"]...`.
//! Flags must precede arguments, and every command declares the flags and argument
//! counts it accepts.

mod builtin;
pub mod command;
mod dispatcher;
pub mod error;
mod interpreter;
mod io_adapters;
pub mod lexer;
pub mod parser;
pub mod schema;

pub use builtin::{Help, MAX_REPEAT, Print, Who};
pub use command::{BuiltinCommand, ParsedCommand};
pub use dispatcher::Dispatcher;
pub use error::ConsoleError;
pub use interpreter::Interpreter;
pub use io_adapters::MemWriter;
pub use schema::{CommandDescriptor, FlagAlias, SchemaStore};
