// Instance-level control for each backend that can host a node
pub mod compute;
pub mod docker;
pub mod ec2;
pub mod virtualbox;

pub use compute::Compute;
pub use docker::Docker;
pub use ec2::Ec2;
pub use virtualbox::VirtualBoxManage;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Ec2,
    Compute,
    #[value(name = "virtualbox")]
    VirtualBox,
    Docker,
}

impl Backend {
    pub const ALL: [Backend; 4] = [
        Backend::Ec2,
        Backend::Compute,
        Backend::VirtualBox,
        Backend::Docker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Ec2 => "ec2",
            Backend::Compute => "compute",
            Backend::VirtualBox => "virtualbox",
            Backend::Docker => "docker",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controls the machine (or container) a node lives on.
pub trait InstanceApi: Send + Sync {
    fn backend(&self) -> Backend;

    /// Boots the machine.
    fn start(&self) -> Result<()>;

    /// Shuts the machine down.
    fn stop(&self) -> Result<()>;

    /// Address the node is reachable on.
    fn ip(&self) -> Result<String>;
}
