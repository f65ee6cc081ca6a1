use super::{IpSource, NodeArgs, NodeCommands, NODE_BINARY, NODE_LOG};
use crate::error::Result;
use crate::executor::{argv, Executor, TerminalExecutor};
use crate::output::print_info;
use regex::Regex;
use std::path::PathBuf;
use std::sync::Arc;

pub const DOCKER_NETWORK: &str = "test_net";
pub const DOCKER_IMAGE: &str = "test_net_tools";

const CONTAINER_ID_PATTERN: &str = "[0-9a-fA-F]+";

/// Runs a node inside a container on the `test_net` Docker network.
/// The node binary is volume-mapped from the local binaries directory.
pub struct NodeDockerCommands {
    name: String,
    get_ip: IpSource,
    binaries_dir: PathBuf,
    executor: Arc<dyn Executor>,
    terminal_executor: TerminalExecutor,
}

impl NodeDockerCommands {
    pub fn new(
        name: impl Into<String>,
        get_ip: IpSource,
        binaries_dir: PathBuf,
        executor: Arc<dyn Executor>,
        terminal_executor: TerminalExecutor,
    ) -> Self {
        NodeDockerCommands {
            name: name.into(),
            get_ip,
            binaries_dir,
            executor,
            terminal_executor,
        }
    }

    fn terminal_title(&self) -> Result<String> {
        Ok(format!("\"{}({})\"", self.name, (self.get_ip)()?))
    }

    fn docker_run_node(&self, node_args: &NodeArgs) -> Result<()> {
        let ip = (self.get_ip)()?;
        let volume = format!("{}/:/node_root/node", self.binaries_dir.display());
        let binary = format!("/node_root/node/{}", NODE_BINARY);

        let mut command = argv([
            "docker",
            "run",
            "--detach",
            "--ip",
            ip.as_str(),
            "--dns",
            "127.0.0.1",
            "--name",
            self.name.as_str(),
            "--hostname",
            self.name.as_str(),
            "--net",
            DOCKER_NETWORK,
            "--volume",
            volume.as_str(),
            DOCKER_IMAGE,
            binary.as_str(),
        ]);
        command.extend(node_args.to_flags(&ip)?);

        self.executor.execute_sync(&command)
    }

    fn docker_destroy(&self) -> Result<()> {
        self.executor
            .execute_sync(&argv(["docker", "rm", "-f", self.name.as_str()]))
    }

    fn exists(&self) -> Result<bool> {
        let filter = format!("-f name={}", self.name);
        let output = self
            .executor
            .execute_capture(&argv(["docker", "ps", "--all", "-q", filter.as_str()]))?;

        let container_id = Regex::new(CONTAINER_ID_PATTERN)?;
        Ok(container_id.is_match(&output.stdout))
    }
}

impl NodeCommands for NodeDockerCommands {
    fn start(&self, node_args: &NodeArgs) -> Result<()> {
        if self.exists()? {
            tracing::debug!("container {} already exists, removing it", self.name);
            self.docker_destroy()?;
        }

        self.docker_run_node(node_args)
    }

    fn stop(&self) -> Result<()> {
        self.executor
            .execute_sync(&argv(["docker", "stop", "-t0", self.name.as_str()]))
    }

    fn cat_logs(&self) -> Result<()> {
        self.executor.execute_sync(&argv([
            "docker",
            "exec",
            "-it",
            self.name.as_str(),
            "cat",
            NODE_LOG,
        ]))
    }

    fn delete_logs(&self) -> Result<()> {
        tracing::debug!("delete-logs is a no-op for Docker node {}", self.name);
        Ok(())
    }

    fn retrieve_logs(&self, destination: &str) -> Result<()> {
        let source = format!("{}:{}", self.name, NODE_LOG);
        self.executor
            .execute_sync(&argv(["docker", "cp", source.as_str(), destination]))
    }

    fn update(&self, _binary: &str) -> Result<()> {
        print_info("Binaries are volume-mapped for Docker-based Nodes; no update is required.");
        Ok(())
    }

    fn tail(&self) -> Result<()> {
        let command = format!(
            "{} docker exec -it {} tail -f -n 250 {}",
            self.terminal_title()?,
            self.name,
            NODE_LOG
        );
        self.terminal_executor.execute_in_new_terminal(&command)
    }

    fn shell(&self) -> Result<()> {
        let command = format!("{} docker exec -it {} bash", self.terminal_title()?, self.name);
        self.terminal_executor.execute_in_new_terminal(&command)
    }
}
