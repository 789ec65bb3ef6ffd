//! Built-in commands and the [`Command`] sum type the engine dispatches on.
mod extension;
mod not_found;
mod remove;
mod transfer;
mod value;

pub use extension::{CommandFactory, ExtensionCommand};
pub use not_found::NotFoundCommand;
pub use remove::RemoveCommand;
pub use transfer::{TransferCommand, TransferMode};
pub use value::ValueCommand;

use crate::policy::{AddPolicy, PutPolicy, SetPolicy};
use jsonmorph_context::{ExecutionContext, ExecutionResult};
use jsonmorph_document::Document;
use std::fmt;

pub enum Command {
    Add(ValueCommand),
    Set(ValueCommand),
    Put(ValueCommand),
    Move(TransferCommand),
    Copy(TransferCommand),
    Remove(RemoveCommand),
    NotFound(NotFoundCommand),
    Extension(Box<dyn ExtensionCommand>),
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::Add(_) => "add",
            Command::Set(_) => "set",
            Command::Put(_) => "put",
            Command::Move(_) => "move",
            Command::Copy(_) => "copy",
            Command::Remove(_) => "remove",
            Command::NotFound(cmd) => &cmd.discriminator,
            Command::Extension(cmd) => cmd.name(),
        }
    }

    pub fn execute(&self, document: &mut Document, ctx: &ExecutionContext<'_>) -> ExecutionResult<()> {
        match self {
            Command::Add(cmd) => cmd.execute(&AddPolicy, document, ctx),
            Command::Set(cmd) => cmd.execute(&SetPolicy, document, ctx),
            Command::Put(cmd) => cmd.execute(&PutPolicy, document, ctx),
            Command::Move(cmd) | Command::Copy(cmd) => cmd.execute(document, ctx),
            Command::Remove(cmd) => cmd.execute(document, ctx),
            Command::NotFound(cmd) => cmd.execute(ctx),
            Command::Extension(cmd) => cmd.execute(document, ctx),
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Add(cmd) | Command::Set(cmd) | Command::Put(cmd) => {
                f.debug_tuple(self.name()).field(cmd).finish()
            }
            Command::Move(cmd) | Command::Copy(cmd) => f.debug_tuple(self.name()).field(cmd).finish(),
            Command::Remove(cmd) => f.debug_tuple(self.name()).field(cmd).finish(),
            Command::NotFound(cmd) => f.debug_tuple("not_found").field(cmd).finish(),
            Command::Extension(cmd) => f.debug_tuple("extension").field(&cmd.name()).finish(),
        }
    }
}
