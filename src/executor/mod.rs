use crate::error::{Result, TntError};
use std::process::{Command, Stdio};
use std::sync::Arc;

#[cfg(test)]
pub mod mock;

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn ok(stdout: &str) -> Self {
        CommandOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: &str) -> Self {
        CommandOutput {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

/// Runs external programs on behalf of the node and instance adapters.
///
/// `args[0]` is the program, the rest are passed through untouched.
pub trait Executor: Send + Sync {
    /// Runs to completion with inherited stdio. A non-zero exit is an error.
    fn execute_sync(&self, args: &[String]) -> Result<()>;

    /// Runs to completion capturing stdout and stderr. The exit status is
    /// reported in the output, not as an error.
    fn execute_capture(&self, args: &[String]) -> Result<CommandOutput>;

    /// Starts the process and returns without waiting for it.
    fn spawn(&self, args: &[String]) -> Result<()>;
}

/// Builds an owned argv from string slices.
pub fn argv<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

fn split_program(args: &[String]) -> Result<(&String, &[String])> {
    args.split_first()
        .ok_or_else(|| TntError::Config("attempted to execute an empty command".to_string()))
}

pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute_sync(&self, args: &[String]) -> Result<()> {
        let (program, rest) = split_program(args)?;
        tracing::debug!("exec: {}", args.join(" "));

        let status = Command::new(program).args(rest).status()?;

        if !status.success() {
            tracing::warn!("{} exited with {:?}", program, status.code());
            return Err(TntError::CommandFailed {
                program: program.clone(),
                code: status.code(),
                stderr: String::new(),
            });
        }

        Ok(())
    }

    fn execute_capture(&self, args: &[String]) -> Result<CommandOutput> {
        let (program, rest) = split_program(args)?;
        tracing::debug!("capture: {}", args.join(" "));

        let output = Command::new(program).args(rest).output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    fn spawn(&self, args: &[String]) -> Result<()> {
        let (program, rest) = split_program(args)?;
        tracing::debug!("spawn: {}", args.join(" "));

        Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .spawn()?;

        Ok(())
    }
}

/// Opens a command in a separate terminal window through a helper program.
///
/// The command line handed to the helper starts with the window title,
/// followed by the command to run inside the window.
pub struct TerminalExecutor {
    executor: Arc<dyn Executor>,
    helper: String,
}

impl TerminalExecutor {
    pub fn new(executor: Arc<dyn Executor>, helper: impl Into<String>) -> Self {
        TerminalExecutor {
            executor,
            helper: helper.into(),
        }
    }

    pub fn execute_in_new_terminal(&self, command: &str) -> Result<()> {
        let line = format!("{} {}", self.helper, command);
        self.executor.spawn(&argv(["sh", "-c", line.as_str()]))
    }
}

/// Fails with `CommandFailed` unless the captured process succeeded.
pub fn require_success(args: &[String], output: CommandOutput) -> Result<CommandOutput> {
    if output.success {
        return Ok(output);
    }

    Err(TntError::CommandFailed {
        program: args.first().cloned().unwrap_or_default(),
        code: output.code,
        stderr: output.stderr.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::mock::{Call, MockExecutor};
    use super::*;

    #[test]
    fn test_argv() {
        assert_eq!(argv(["docker", "ps"]), vec!["docker".to_string(), "ps".to_string()]);
    }

    #[test]
    fn test_terminal_executor_wraps_with_helper() {
        let executor = Arc::new(MockExecutor::new());
        let terminal = TerminalExecutor::new(executor.clone(), "./terminal.sh");

        terminal
            .execute_in_new_terminal("\"bacon(1.2.3.4)\" docker exec -it bacon bash")
            .unwrap();

        assert_eq!(
            executor.calls(),
            vec![Call::Spawn(argv([
                "sh",
                "-c",
                "./terminal.sh \"bacon(1.2.3.4)\" docker exec -it bacon bash",
            ]))]
        );
    }

    #[test]
    fn test_require_success() {
        let args = argv(["aws", "ec2"]);
        assert!(require_success(&args, CommandOutput::ok("fine")).is_ok());

        match require_success(&args, CommandOutput::failed(255, "denied\n")) {
            Err(TntError::CommandFailed { program, code, stderr }) => {
                assert_eq!(program, "aws");
                assert_eq!(code, Some(255));
                assert_eq!(stderr, "denied");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_system_executor_rejects_empty_command() {
        assert!(matches!(SystemExecutor.execute_sync(&[]), Err(TntError::Config(_))));
    }

    #[test]
    fn test_system_executor_capture() {
        let output = SystemExecutor
            .execute_capture(&argv(["sh", "-c", "echo hello; exit 3"]))
            .unwrap();
        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "hello\n");
    }
}
