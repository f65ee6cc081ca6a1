use super::{Backend, InstanceApi};
use crate::error::{Result, TntError};
use crate::executor::{argv, require_success, Executor};
use std::sync::Arc;

const GUEST_IP_PROPERTY: &str = "/VirtualBox/GuestInfo/Net/1/V4/IP";

/// A local VirtualBox VM driven through `VBoxManage`.
pub struct VirtualBoxManage {
    name: String,
    vm: String,
    ip: Option<String>,
    executor: Arc<dyn Executor>,
}

impl VirtualBoxManage {
    pub fn new(
        name: impl Into<String>,
        vm: impl Into<String>,
        ip: Option<String>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        VirtualBoxManage {
            name: name.into(),
            vm: vm.into(),
            ip,
            executor,
        }
    }
}

// Parses `VBoxManage guestproperty get` output, e.g. "Value: 192.168.56.101"
fn parse_guest_property(output: &str) -> Option<String> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Value:"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl InstanceApi for VirtualBoxManage {
    fn backend(&self) -> Backend {
        Backend::VirtualBox
    }

    fn start(&self) -> Result<()> {
        println!("Starting VM '{}' via VBoxManage...", self.vm);
        self.executor
            .execute_sync(&argv(["VBoxManage", "startvm", self.vm.as_str(), "--type", "headless"]))
    }

    fn stop(&self) -> Result<()> {
        println!("Shutting down VM '{}' via VBoxManage...", self.vm);
        self.executor
            .execute_sync(&argv(["VBoxManage", "controlvm", self.vm.as_str(), "acpipowerbutton"]))
    }

    fn ip(&self) -> Result<String> {
        if let Some(ip) = &self.ip {
            return Ok(ip.clone());
        }

        let args = argv([
            "VBoxManage",
            "guestproperty",
            "get",
            self.vm.as_str(),
            GUEST_IP_PROPERTY,
        ]);
        let output = require_success(&args, self.executor.execute_capture(&args)?)?;

        parse_guest_property(&output.stdout).ok_or_else(|| TntError::Ip {
            instance: self.name.clone(),
            message: format!(
                "guest property {} is not set (are guest additions running?)",
                GUEST_IP_PROPERTY
            ),
        })
    }
}
