use super::{
    IpSource, NodeArgs, NodeCommands, CAT_LOGS_COMMAND, DELETE_LOGS_COMMAND, NODE_BINARY, NODE_LOG,
    STOP_COMMAND, TAIL_LOGS_COMMAND,
};
use crate::error::Result;
use crate::executor::{argv, Executor, TerminalExecutor};
use std::path::PathBuf;
use std::sync::Arc;

pub fn wrap_with_ssh(user: &str, ip: &str, command: &[String]) -> Vec<String> {
    let target = format!("{}@{}", user, ip);
    let mut args = argv(["ssh", "-oStrictHostKeyChecking=no", target.as_str()]);
    args.extend(command.iter().cloned());
    args
}

pub fn wrap_with_scp(source: &str, destination: &str) -> Vec<String> {
    argv(["scp", "-oStrictHostKeyChecking=no", source, destination])
}

/// Drives a node on a remote machine (cloud instance or VM) over SSH/SCP.
pub struct NodeSshCommands {
    get_ip: IpSource,
    user: String,
    binaries_dir: PathBuf,
    executor: Arc<dyn Executor>,
    terminal_executor: TerminalExecutor,
}

impl NodeSshCommands {
    pub fn new(
        get_ip: IpSource,
        user: impl Into<String>,
        binaries_dir: PathBuf,
        executor: Arc<dyn Executor>,
        terminal_executor: TerminalExecutor,
    ) -> Self {
        NodeSshCommands {
            get_ip,
            user: user.into(),
            binaries_dir,
            executor,
            terminal_executor,
        }
    }

    fn ssh(&self, command: &[String]) -> Result<Vec<String>> {
        Ok(wrap_with_ssh(&self.user, &(self.get_ip)()?, command))
    }

    fn remote_path(&self, path: &str) -> Result<String> {
        Ok(format!("{}@{}:{}", self.user, (self.get_ip)()?, path))
    }

    fn execute_in_new_terminal(&self, command: &[String]) -> Result<()> {
        let title = (self.get_ip)()?;
        let line = format!("{} {}", title, self.ssh(command)?.join(" "));
        self.terminal_executor.execute_in_new_terminal(&line)
    }
}

impl NodeCommands for NodeSshCommands {
    fn start(&self, node_args: &NodeArgs) -> Result<()> {
        let ip = (self.get_ip)()?;
        let mut command = vec![format!("sudo ./{}", NODE_BINARY)];
        command.extend(node_args.to_flags(&ip)?);
        command.extend(argv([">", "/dev/null", "2>&1", "&"]));

        self.executor.execute_sync(&self.ssh(&command)?)
    }

    fn stop(&self) -> Result<()> {
        self.executor.execute_sync(&self.ssh(&argv([STOP_COMMAND]))?)
    }

    fn cat_logs(&self) -> Result<()> {
        self.executor.execute_sync(&self.ssh(&argv([CAT_LOGS_COMMAND]))?)
    }

    fn delete_logs(&self) -> Result<()> {
        self.executor
            .execute_sync(&self.ssh(&argv([DELETE_LOGS_COMMAND]))?)
    }

    fn retrieve_logs(&self, destination: &str) -> Result<()> {
        let source = self.remote_path(NODE_LOG)?;
        self.executor
            .execute_sync(&wrap_with_scp(&source, destination))
    }

    fn update(&self, binary: &str) -> Result<()> {
        let source = self.binaries_dir.join(binary);
        let destination = self.remote_path(binary)?;
        self.executor
            .execute_sync(&wrap_with_scp(&source.to_string_lossy(), &destination))
    }

    fn tail(&self) -> Result<()> {
        self.execute_in_new_terminal(&argv([TAIL_LOGS_COMMAND]))
    }

    fn shell(&self) -> Result<()> {
        self.execute_in_new_terminal(&[])
    }
}
