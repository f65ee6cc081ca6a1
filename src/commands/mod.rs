pub mod doctor;
pub mod list;

pub use doctor::handle_doctor_command;
pub use list::{handle_commands_command, handle_list_command};

use crate::error::{Result, TntError};
use crate::instance::{Instance, Instances};
use crate::node::NodeArgs;
use crate::output::print_success;
use chrono::Local;
use std::fs;
use std::path::PathBuf;

/// Inputs shared by every command invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub node_args: NodeArgs,
    pub binary: Option<String>,
    pub destination: Option<PathBuf>,
}

type Handler = fn(&Command, &Instance, &CommandContext) -> Result<()>;

/// A named action that can be run against one instance.
pub struct Command {
    pub name: &'static str,
    pub info: &'static str,
    handler: Handler,
}

pub static COMMANDS: &[Command] = &[
    Command { name: "boot", info: "starts up", handler: boot },
    Command { name: "kill", info: "shuts down", handler: kill },
    Command { name: "start", info: "starts node", handler: start },
    Command { name: "stop", info: "stops node", handler: stop },
    Command { name: "tail", info: "tails logs in a new terminal", handler: tail },
    Command { name: "shell", info: "opens a shell in a new terminal", handler: shell },
    Command { name: "update", info: "uploads binary", handler: update },
    Command { name: "cat-logs", info: "prints logs", handler: cat_logs },
    Command { name: "retrieve-logs", info: "copies logs locally", handler: retrieve_logs },
    Command { name: "delete-logs", info: "deletes logs", handler: delete_logs },
    Command { name: "ip", info: "shows address", handler: ip },
];

pub fn find(name: &str) -> Result<&'static Command> {
    COMMANDS
        .iter()
        .find(|command| command.name == name)
        .ok_or_else(|| TntError::UnknownCommand(name.to_string()))
}

impl Command {
    pub fn run_for(
        &self,
        instances: &Instances,
        name: &str,
        context: &CommandContext,
    ) -> Result<()> {
        let instance = instances.get(name)?;
        tracing::debug!("running {} for {} ({})", self.name, name, instance.backend());
        (self.handler)(self, instance, context)
    }

    /// Runs against each name in order, stopping at the first failure.
    pub fn run_for_many<S: AsRef<str>>(
        &self,
        instances: &Instances,
        names: &[S],
        context: &CommandContext,
    ) -> Result<()> {
        for name in names {
            self.run_for(instances, name.as_ref(), context)?;
        }
        Ok(())
    }

    fn missing(&self, argument: &str) -> TntError {
        TntError::MissingArgument {
            command: self.name.to_string(),
            argument: argument.to_string(),
        }
    }
}

fn boot(_: &Command, instance: &Instance, _: &CommandContext) -> Result<()> {
    instance.boot()?;
    print_success(&format!("{} started up", instance.name()));
    Ok(())
}

fn kill(_: &Command, instance: &Instance, _: &CommandContext) -> Result<()> {
    instance.kill()?;
    print_success(&format!("{} shut down", instance.name()));
    Ok(())
}

fn start(_: &Command, instance: &Instance, context: &CommandContext) -> Result<()> {
    instance.start_node(&context.node_args)?;
    print_success(&format!("Node started on {}", instance.name()));
    Ok(())
}

fn stop(_: &Command, instance: &Instance, _: &CommandContext) -> Result<()> {
    instance.stop_node()?;
    print_success(&format!("Node stopped on {}", instance.name()));
    Ok(())
}

fn tail(_: &Command, instance: &Instance, _: &CommandContext) -> Result<()> {
    instance.tail()
}

fn shell(_: &Command, instance: &Instance, _: &CommandContext) -> Result<()> {
    instance.shell()
}

fn update(command: &Command, instance: &Instance, context: &CommandContext) -> Result<()> {
    let binary = context.binary.as_deref().ok_or_else(|| command.missing("binary"))?;
    instance.update(binary)
}

fn cat_logs(_: &Command, instance: &Instance, _: &CommandContext) -> Result<()> {
    instance.cat_logs()
}

fn retrieve_logs(command: &Command, instance: &Instance, context: &CommandContext) -> Result<()> {
    let destination = context
        .destination
        .as_ref()
        .ok_or_else(|| command.missing("destination"))?;
    fs::create_dir_all(destination)?;

    let file = destination.join(log_file_name(instance.name()));
    instance.retrieve_logs(&file.to_string_lossy())?;
    print_success(&format!("Logs saved to {}", file.display()));
    Ok(())
}

fn delete_logs(_: &Command, instance: &Instance, _: &CommandContext) -> Result<()> {
    instance.delete_logs()
}

fn ip(_: &Command, instance: &Instance, _: &CommandContext) -> Result<()> {
    println!("{}: {}", instance.name(), instance.ip()?);
    Ok(())
}

fn log_file_name(instance: &str) -> String {
    format!("{}-{}.log", instance, Local::now().format("%Y%m%d-%H%M%S"))
}
