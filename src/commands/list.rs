use super::COMMANDS;
use crate::backends::Backend;
use crate::error::Result;
use crate::instance::Instances;
use crate::output::output_data;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct InstanceSummary {
    pub name: String,
    pub backend: Backend,
}

pub fn summarize(instances: &Instances, backend: Option<Backend>) -> Vec<InstanceSummary> {
    instances
        .iter()
        .filter(|instance| backend.map_or(true, |b| instance.backend() == b))
        .map(|instance| InstanceSummary {
            name: instance.name().to_string(),
            backend: instance.backend(),
        })
        .collect()
}

pub fn handle_list_command(
    instances: &Instances,
    backend: Option<Backend>,
    format: &str,
) -> Result<()> {
    let summaries = summarize(instances, backend);

    if format == "pretty" {
        if summaries.is_empty() {
            println!("No instances configured.");
        }
        for summary in &summaries {
            println!("{:<20} {}", summary.name, summary.backend);
        }
        return Ok(());
    }

    output_data(&summaries, format)
}

pub fn handle_commands_command() {
    for command in COMMANDS {
        println!("{:<15} {}", command.name, command.info);
    }
}
