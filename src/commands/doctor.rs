use crate::error::Result;
use crate::executor::{argv, Executor};
use crate::output::output_data;
use serde::Serialize;

/// External programs the adapters shell out to.
const TOOLS: &[&str] = &["docker", "ssh", "scp", "aws", "gcloud", "VBoxManage"];

#[derive(Debug, Serialize)]
pub struct ToolStatus {
    pub tool: String,
    pub available: bool,
    pub path: Option<String>,
}

pub fn check_tools(executor: &dyn Executor) -> Result<Vec<ToolStatus>> {
    let mut statuses = Vec::new();

    for tool in TOOLS {
        let output = executor.execute_capture(&argv(["which", *tool]))?;
        let path = output.stdout.trim();

        statuses.push(ToolStatus {
            tool: tool.to_string(),
            available: output.success && !path.is_empty(),
            path: if output.success && !path.is_empty() {
                Some(path.to_string())
            } else {
                None
            },
        });
    }

    Ok(statuses)
}

pub fn handle_doctor_command(executor: &dyn Executor, format: &str) -> Result<()> {
    let statuses = check_tools(executor)?;

    if format != "pretty" {
        return output_data(&statuses, format);
    }

    for status in &statuses {
        match &status.path {
            Some(path) => println!("✓ {:<12} {}", status.tool, path),
            None => println!("✗ {:<12} not found", status.tool),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::mock::{Call, MockExecutor};
    use crate::executor::CommandOutput;

    #[test]
    fn test_check_tools() {
        let executor = MockExecutor::new()
            .with_capture(CommandOutput::ok("/usr/bin/docker\n"))
            .with_capture(CommandOutput::ok("/usr/bin/ssh\n"))
            .with_capture(CommandOutput::ok("/usr/bin/scp\n"))
            .with_capture(CommandOutput::failed(1, ""))
            .with_capture(CommandOutput::failed(1, ""))
            .with_capture(CommandOutput::ok("/usr/local/bin/VBoxManage\n"));

        let statuses = check_tools(&executor).unwrap();

        let available: Vec<&str> = statuses
            .iter()
            .filter(|s| s.available)
            .map(|s| s.tool.as_str())
            .collect();
        assert_eq!(available, vec!["docker", "ssh", "scp", "VBoxManage"]);
        assert_eq!(statuses[0].path.as_deref(), Some("/usr/bin/docker"));
        assert_eq!(statuses[3].path, None);
        assert_eq!(executor.calls()[4], Call::Capture(argv(["which", "gcloud"])));
    }
}
