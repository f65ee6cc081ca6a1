use super::{Backend, InstanceApi};
use crate::error::{Result, TntError};
use crate::executor::{argv, require_success, Executor};
use std::sync::Arc;

const NAT_IP_FORMAT: &str = "get(networkInterfaces[0].accessConfigs[0].natIP)";

/// A Google Compute Engine instance driven through `gcloud`.
pub struct Compute {
    name: String,
    zone: String,
    project: Option<String>,
    executor: Arc<dyn Executor>,
}

impl Compute {
    pub fn new(
        name: impl Into<String>,
        zone: impl Into<String>,
        project: Option<String>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Compute {
            name: name.into(),
            zone: zone.into(),
            project,
            executor,
        }
    }

    fn gcloud(&self, action: &str, extra: &[&str]) -> Vec<String> {
        let mut args = argv([
            "gcloud",
            "compute",
            "instances",
            action,
            self.name.as_str(),
            "--zone",
            self.zone.as_str(),
        ]);
        args.extend(argv(extra.iter().copied()));
        if let Some(project) = &self.project {
            args.extend(argv(["--project", project.as_str()]));
        }
        args
    }
}

impl InstanceApi for Compute {
    fn backend(&self) -> Backend {
        Backend::Compute
    }

    fn start(&self) -> Result<()> {
        self.executor.execute_sync(&self.gcloud("start", &[]))
    }

    fn stop(&self) -> Result<()> {
        self.executor.execute_sync(&self.gcloud("stop", &[]))
    }

    fn ip(&self) -> Result<String> {
        let args = self.gcloud("describe", &["--format", NAT_IP_FORMAT]);
        let output = require_success(&args, self.executor.execute_capture(&args)?)?;
        let ip = output.stdout.trim();

        if ip.is_empty() {
            return Err(TntError::Ip {
                instance: self.name.clone(),
                message: "no external NAT address assigned".to_string(),
            });
        }

        Ok(ip.to_string())
    }
}
