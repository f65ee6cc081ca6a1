use super::{Backend, InstanceApi};
use crate::error::Result;
use crate::executor::{argv, Executor};
use crate::node::docker::DOCKER_NETWORK;
use std::sync::Arc;

pub const DOCKER_SUBNET: &str = "172.18.0.0/16";

/// A node container on the local Docker daemon. The container itself is
/// created by the node's `start`; booting only prepares the network.
pub struct Docker {
    name: String,
    ip: String,
    executor: Arc<dyn Executor>,
}

impl Docker {
    pub fn new(
        name: impl Into<String>,
        ip: impl Into<String>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Docker {
            name: name.into(),
            ip: ip.into(),
            executor,
        }
    }
}

impl InstanceApi for Docker {
    fn backend(&self) -> Backend {
        Backend::Docker
    }

    fn start(&self) -> Result<()> {
        let inspect = self
            .executor
            .execute_capture(&argv(["docker", "network", "inspect", DOCKER_NETWORK]))?;

        if inspect.success {
            tracing::debug!("docker network {} already exists", DOCKER_NETWORK);
            return Ok(());
        }

        println!("Creating docker network '{}'...", DOCKER_NETWORK);
        self.executor.execute_sync(&argv([
            "docker",
            "network",
            "create",
            "--subnet",
            DOCKER_SUBNET,
            DOCKER_NETWORK,
        ]))
    }

    fn stop(&self) -> Result<()> {
        self.executor
            .execute_sync(&argv(["docker", "rm", "-f", self.name.as_str()]))
    }

    fn ip(&self) -> Result<String> {
        Ok(self.ip.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::mock::{Call, MockExecutor};
    use crate::executor::CommandOutput;

    #[test]
    fn test_start_creates_missing_network() {
        let executor = Arc::new(
            MockExecutor::new()
                .with_capture(CommandOutput::failed(1, "Error: No such network: test_net")),
        );

        Docker::new("bootstrap", "172.18.1.1", executor.clone()).start().unwrap();

        assert_eq!(
            executor.calls(),
            vec![
                Call::Capture(argv(["docker", "network", "inspect", "test_net"])),
                Call::Sync(argv([
                    "docker",
                    "network",
                    "create",
                    "--subnet",
                    "172.18.0.0/16",
                    "test_net",
                ])),
            ]
        );
    }

    #[test]
    fn test_start_with_existing_network() {
        let executor = Arc::new(MockExecutor::new().with_capture(CommandOutput::ok("[{}]")));

        Docker::new("bootstrap", "172.18.1.1", executor.clone()).start().unwrap();

        assert!(executor.sync_calls().is_empty());
    }

    #[test]
    fn test_stop_removes_container() {
        let executor = Arc::new(MockExecutor::new());

        Docker::new("bootstrap", "172.18.1.1", executor.clone()).stop().unwrap();

        assert_eq!(executor.sync_calls(), vec![argv(["docker", "rm", "-f", "bootstrap"])]);
    }

    #[test]
    fn test_ip_is_configured() {
        let executor = Arc::new(MockExecutor::new());
        assert_eq!(Docker::new("bootstrap", "172.18.1.1", executor).ip().unwrap(), "172.18.1.1");
    }
}
