use crate::backends::{Backend, Compute, Docker, Ec2, InstanceApi, VirtualBoxManage};
use crate::config::{InstanceConfig, TntConfig};
use crate::error::{Result, TntError};
use crate::executor::{Executor, TerminalExecutor};
use crate::node::{IpSource, NodeArgs, NodeCommands, NodeDockerCommands, NodeSshCommands};
use std::path::Path;
use std::sync::Arc;

/// A named test machine: the backend that owns it plus the transport used
/// to drive the node running on it.
pub struct Instance {
    name: String,
    api: Arc<dyn InstanceApi>,
    node: Box<dyn NodeCommands>,
}

impl Instance {
    pub fn new(
        name: impl Into<String>,
        api: Arc<dyn InstanceApi>,
        node: Box<dyn NodeCommands>,
    ) -> Self {
        Instance {
            name: name.into(),
            api,
            node,
        }
    }

    pub fn from_config(
        instance: &InstanceConfig,
        config: &TntConfig,
        binaries_dir: &Path,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let name = instance.name().to_string();
        let api: Arc<dyn InstanceApi> = match instance {
            InstanceConfig::Ec2 { instance_id, region, .. } => {
                Arc::new(Ec2::new(&name, instance_id, region.clone(), executor.clone()))
            }
            InstanceConfig::Compute { zone, project, .. } => {
                Arc::new(Compute::new(&name, zone, project.clone(), executor.clone()))
            }
            InstanceConfig::VirtualBox { vm, ip, .. } => Arc::new(VirtualBoxManage::new(
                &name,
                vm.clone().unwrap_or_else(|| name.clone()),
                ip.clone(),
                executor.clone(),
            )),
            InstanceConfig::Docker { ip, .. } => Arc::new(Docker::new(&name, ip, executor.clone())),
        };

        let ip_api = api.clone();
        let get_ip: IpSource = Arc::new(move || ip_api.ip());
        let terminal = TerminalExecutor::new(executor.clone(), config.terminal_helper.clone());

        let node: Box<dyn NodeCommands> = match api.backend() {
            Backend::Docker => Box::new(NodeDockerCommands::new(
                &name,
                get_ip,
                binaries_dir.to_path_buf(),
                executor,
                terminal,
            )),
            _ => Box::new(NodeSshCommands::new(
                get_ip,
                config.instance_user.clone(),
                binaries_dir.to_path_buf(),
                executor,
                terminal,
            )),
        };

        Instance::new(name, api, node)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> Backend {
        self.api.backend()
    }

    pub fn ip(&self) -> Result<String> {
        self.api.ip()
    }

    pub fn boot(&self) -> Result<()> {
        tracing::info!("booting {} ({})", self.name, self.backend());
        self.api.start()
    }

    pub fn kill(&self) -> Result<()> {
        tracing::info!("shutting down {} ({})", self.name, self.backend());
        self.api.stop()
    }

    pub fn start_node(&self, node_args: &NodeArgs) -> Result<()> {
        tracing::info!("starting node on {}", self.name);
        self.node.start(node_args)
    }

    pub fn stop_node(&self) -> Result<()> {
        tracing::info!("stopping node on {}", self.name);
        self.node.stop()
    }

    pub fn tail(&self) -> Result<()> {
        self.node.tail()
    }

    pub fn shell(&self) -> Result<()> {
        self.node.shell()
    }

    pub fn update(&self, binary: &str) -> Result<()> {
        tracing::info!("updating {} on {}", binary, self.name);
        self.node.update(binary)
    }

    pub fn cat_logs(&self) -> Result<()> {
        self.node.cat_logs()
    }

    pub fn retrieve_logs(&self, destination: &str) -> Result<()> {
        tracing::info!("retrieving logs from {} into {}", self.name, destination);
        self.node.retrieve_logs(destination)
    }

    pub fn delete_logs(&self) -> Result<()> {
        self.node.delete_logs()
    }
}

/// Every configured instance, keyed by name, in configuration order.
#[derive(Default)]
pub struct Instances {
    instances: Vec<Instance>,
}

impl Instances {
    pub fn new(instances: Vec<Instance>) -> Result<Self> {
        let mut registry = Instances::default();
        for instance in instances {
            registry.insert(instance)?;
        }
        Ok(registry)
    }

    pub fn from_config(config: &TntConfig, executor: Arc<dyn Executor>) -> Result<Self> {
        let binaries_dir = config.resolved_binaries_dir()?;
        let instances = config
            .instances
            .iter()
            .map(|instance| {
                Instance::from_config(instance, config, &binaries_dir, executor.clone())
            })
            .collect();
        Instances::new(instances)
    }

    pub fn insert(&mut self, instance: Instance) -> Result<()> {
        if self.instances.iter().any(|i| i.name == instance.name) {
            return Err(TntError::Config(format!("duplicate instance name '{}'", instance.name)));
        }
        self.instances.push(instance);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Instance> {
        self.instances
            .iter()
            .find(|instance| instance.name == name)
            .ok_or_else(|| TntError::UnknownInstance(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.instances.iter().map(|i| i.name()).collect()
    }

    pub fn by_backend(&self, backend: Backend) -> Vec<&Instance> {
        self.instances.iter().filter(|i| i.backend() == backend).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
