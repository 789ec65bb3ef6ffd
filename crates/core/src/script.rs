//! Compiling a JSON script into [`Command`]s.
use crate::commands::{
    Command, NotFoundCommand, RemoveCommand, TransferCommand, TransferMode, ValueCommand,
};
use crate::error::ScriptError;
use crate::registry::CommandRegistry;
use jsonmorph_expr::ExpressionParser;
use serde_json::{Map, Value};

const DISCRIMINATOR: &str = "op";
const PATH: &str = "path";
const VALUE: &str = "value";
const FROM_PATH: &str = "fromPath";
const TO_PATH: &str = "toPath";

/// A compiled script: commands in execution order.
#[derive(Debug, Default)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }
}

impl FromIterator<Command> for Script {
    fn from_iter<I: IntoIterator<Item = Command>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Builds commands from script entries.
pub struct ScriptCompiler<'a> {
    parser: &'a ExpressionParser<'a>,
    registry: &'a CommandRegistry,
}

impl<'a> ScriptCompiler<'a> {
    pub fn new(parser: &'a ExpressionParser<'a>, registry: &'a CommandRegistry) -> Self {
        Self { parser, registry }
    }

    /// Only a script that is not an array is an error. Every entry compiles to
    /// some command; unusable entries become [`Command::NotFound`].
    pub fn compile(&self, script: &Value) -> Result<Script, ScriptError> {
        let Value::Array(entries) = script else {
            return Err(ScriptError::NotAnArray(kind_of(script)));
        };
        let script: Script = entries.iter().map(|entry| self.compile_entry(entry)).collect();
        log::debug!("Compiled script with {} command(s)", script.len());
        Ok(script)
    }

    pub fn compile_entry(&self, entry: &Value) -> Command {
        let Value::Object(fields) = entry else {
            return Command::NotFound(NotFoundCommand::new(entry.to_string()));
        };
        let op = match fields.get(DISCRIMINATOR) {
            Some(Value::String(op)) => op,
            Some(other) => return Command::NotFound(NotFoundCommand::new(other.to_string())),
            None => {
                let missing = format!("<missing '{}'>", DISCRIMINATOR);
                return Command::NotFound(NotFoundCommand::new(missing));
            }
        };

        match op.to_lowercase().as_str() {
            "add" => Command::Add(self.value_command(fields)),
            "set" => Command::Set(self.value_command(fields)),
            "put" => Command::Put(self.value_command(fields)),
            "move" => Command::Move(transfer_command(TransferMode::Move, fields)),
            "copy" => Command::Copy(transfer_command(TransferMode::Copy, fields)),
            "remove" => Command::Remove(RemoveCommand {
                path: string_field(fields, PATH),
            }),
            _ => match self.registry.get(op) {
                Some(factory) => Command::Extension(factory.create(fields, self.parser)),
                None => Command::NotFound(NotFoundCommand::new(op.as_str())),
            },
        }
    }

    fn value_command(&self, fields: &Map<String, Value>) -> ValueCommand {
        ValueCommand {
            path: string_field(fields, PATH),
            value: fields.get(VALUE).map(|value| self.parser.parse(value)),
        }
    }
}

fn transfer_command(mode: TransferMode, fields: &Map<String, Value>) -> TransferCommand {
    TransferCommand {
        mode,
        from_path: string_field(fields, FROM_PATH),
        to_path: string_field(fields, TO_PATH),
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_string)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
