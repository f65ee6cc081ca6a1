use super::{Backend, InstanceApi};
use crate::error::{Result, TntError};
use crate::executor::{argv, require_success, Executor};
use std::sync::Arc;

const PUBLIC_IP_QUERY: &str = "Reservations[0].Instances[0].PublicIpAddress";

/// An EC2 instance driven through the `aws` CLI.
pub struct Ec2 {
    name: String,
    instance_id: String,
    region: Option<String>,
    executor: Arc<dyn Executor>,
}

impl Ec2 {
    pub fn new(
        name: impl Into<String>,
        instance_id: impl Into<String>,
        region: Option<String>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Ec2 {
            name: name.into(),
            instance_id: instance_id.into(),
            region,
            executor,
        }
    }

    fn aws(&self, action: &[&str]) -> Vec<String> {
        let mut args = argv(["aws", "ec2"]);
        args.extend(argv(action.iter().copied()));
        args.extend(argv(["--instance-ids", self.instance_id.as_str()]));
        if let Some(region) = &self.region {
            args.extend(argv(["--region", region.as_str()]));
        }
        args
    }
}

impl InstanceApi for Ec2 {
    fn backend(&self) -> Backend {
        Backend::Ec2
    }

    fn start(&self) -> Result<()> {
        self.executor.execute_sync(&self.aws(&["start-instances"]))
    }

    fn stop(&self) -> Result<()> {
        self.executor.execute_sync(&self.aws(&["stop-instances"]))
    }

    fn ip(&self) -> Result<String> {
        let mut args = self.aws(&["describe-instances"]);
        args.extend(argv(["--query", PUBLIC_IP_QUERY, "--output", "text"]));

        let output = require_success(&args, self.executor.execute_capture(&args)?)?;
        let ip = output.stdout.trim();

        if ip.is_empty() || ip == "None" {
            return Err(TntError::Ip {
                instance: self.name.clone(),
                message: format!("{} has no public address (is it running?)", self.instance_id),
            });
        }

        Ok(ip.to_string())
    }
}
