use crate::backends::Backend;
use crate::error::{Result, TntError};
use crate::node::NodeArgs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_ENV: &str = "TNT_CONFIG";
const LOCAL_CONFIG: &str = "tnt.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TntConfig {
    #[serde(default = "default_instance_user")]
    pub instance_user: String,
    #[serde(default = "default_terminal_helper")]
    pub terminal_helper: String,
    #[serde(default = "default_binaries_dir")]
    pub binaries_dir: PathBuf,
    #[serde(default)]
    pub node: NodeArgs,
    #[serde(default)]
    pub instances: Vec<InstanceConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum InstanceConfig {
    Ec2 {
        name: String,
        instance_id: String,
        region: Option<String>,
    },
    Compute {
        name: String,
        zone: String,
        project: Option<String>,
    },
    #[serde(rename = "virtualbox")]
    VirtualBox {
        name: String,
        vm: Option<String>,
        ip: Option<String>,
    },
    Docker {
        name: String,
        ip: String,
    },
}

impl InstanceConfig {
    pub fn name(&self) -> &str {
        match self {
            InstanceConfig::Ec2 { name, .. }
            | InstanceConfig::Compute { name, .. }
            | InstanceConfig::VirtualBox { name, .. }
            | InstanceConfig::Docker { name, .. } => name,
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            InstanceConfig::Ec2 { .. } => Backend::Ec2,
            InstanceConfig::Compute { .. } => Backend::Compute,
            InstanceConfig::VirtualBox { .. } => Backend::VirtualBox,
            InstanceConfig::Docker { .. } => Backend::Docker,
        }
    }
}

fn default_instance_user() -> String {
    "ubuntu".to_string()
}

fn default_terminal_helper() -> String {
    "./terminal.sh".to_string()
}

fn default_binaries_dir() -> PathBuf {
    PathBuf::from("binaries")
}

impl TntConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: TntConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TntError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        tracing::debug!("loaded config from {}", path.display());
        Self::from_yaml(&content)
    }

    /// Binaries directory as an absolute path, for Docker volume mapping.
    pub fn resolved_binaries_dir(&self) -> Result<PathBuf> {
        if self.binaries_dir.is_absolute() {
            return Ok(self.binaries_dir.clone());
        }
        Ok(std::env::current_dir()?.join(&self.binaries_dir))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for instance in &self.instances {
            let name = instance.name();
            if name.trim().is_empty() {
                return Err(TntError::Config("instance name must not be empty".to_string()));
            }
            if !seen.insert(name) {
                return Err(TntError::Config(format!("duplicate instance name '{}'", name)));
            }
        }
        Ok(())
    }
}

/// Picks the config file: explicit path, then `$TNT_CONFIG`, then
/// `./tnt.yaml`, then `<config dir>/tnt/config.yaml`.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
    search(
        explicit,
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        Path::new("."),
        dirs::config_dir(),
    )
}

fn search(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    working_dir: &Path,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = from_env {
        return Ok(path);
    }

    let local = working_dir.join(LOCAL_CONFIG);
    if local.exists() {
        return Ok(local);
    }

    let user = config_dir.map(|dir| dir.join("tnt").join("config.yaml"));
    match user {
        Some(path) if path.exists() => Ok(path),
        _ => Err(TntError::Config(format!(
            "no configuration found; pass --config, set {} or create ./{}",
            CONFIG_ENV, LOCAL_CONFIG
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
instance_user: admin
node:
  log_level: debug
instances:
  - name: node-0
    backend: ec2
    instance_id: i-0abc
    region: us-west-2
  - name: node-1
    backend: compute
    zone: us-central1-a
  - name: node-2
    backend: virtualbox
  - name: bootstrap
    backend: docker
    ip: 172.18.1.1
"#;

    #[test]
    fn test_parse_sample() {
        let config = TntConfig::from_yaml(SAMPLE).unwrap();

        assert_eq!(config.instance_user, "admin");
        assert_eq!(config.terminal_helper, "./terminal.sh");
        assert_eq!(config.binaries_dir, PathBuf::from("binaries"));
        assert_eq!(config.node.log_level, "debug");
        assert_eq!(config.node.dns_servers, "1.1.1.1");

        let backends: Vec<Backend> = config.instances.iter().map(|i| i.backend()).collect();
        assert_eq!(
            backends,
            vec![Backend::Ec2, Backend::Compute, Backend::VirtualBox, Backend::Docker]
        );
        assert_eq!(
            config.instances[2],
            InstanceConfig::VirtualBox {
                name: "node-2".to_string(),
                vm: None,
                ip: None,
            }
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let yaml = r#"
instances:
  - { name: twin, backend: docker, ip: 172.18.1.1 }
  - { name: twin, backend: docker, ip: 172.18.1.2 }
"#;
        match TntConfig::from_yaml(yaml) {
            Err(TntError::Config(message)) => assert!(message.contains("twin")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_docker_requires_ip() {
        let yaml = "instances:\n  - { name: bootstrap, backend: docker }\n";
        assert!(matches!(TntConfig::from_yaml(yaml), Err(TntError::Yaml(_))));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let yaml = "instances:\n  - { name: x, backend: azure }\n";
        assert!(TntConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = TntConfig::load(file.path()).unwrap();
        assert_eq!(config.instances.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(TntConfig::load(&missing), Err(TntError::Config(_))));
    }

    #[test]
    fn test_locate_prefers_explicit_path() {
        let path = PathBuf::from("/etc/tnt/custom.yaml");
        assert_eq!(locate(Some(&path)).unwrap(), path);
    }

    #[test]
    fn test_env_path_beats_local_file() {
        let cwd = tempfile::tempdir().unwrap();
        fs::write(cwd.path().join(LOCAL_CONFIG), "{}").unwrap();
        let from_env = PathBuf::from("/srv/tnt/env.yaml");

        let found = search(None, Some(from_env.clone()), cwd.path(), None).unwrap();
        assert_eq!(found, from_env);
    }

    #[test]
    fn test_local_file_beats_user_config() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::write(cwd.path().join(LOCAL_CONFIG), "{}").unwrap();
        fs::create_dir_all(home.path().join("tnt")).unwrap();
        fs::write(home.path().join("tnt").join("config.yaml"), "{}").unwrap();

        let found = search(None, None, cwd.path(), Some(home.path().to_path_buf())).unwrap();
        assert_eq!(found, cwd.path().join(LOCAL_CONFIG));
    }

    #[test]
    fn test_user_config_fallback() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        fs::create_dir_all(home.path().join("tnt")).unwrap();
        fs::write(home.path().join("tnt").join("config.yaml"), "{}").unwrap();

        let found = search(None, None, cwd.path(), Some(home.path().to_path_buf())).unwrap();
        assert_eq!(found, home.path().join("tnt").join("config.yaml"));
    }

    #[test]
    fn test_nothing_to_locate() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();

        let result = search(None, None, cwd.path(), Some(home.path().to_path_buf()));
        assert!(matches!(result, Err(TntError::Config(_))));
    }

    #[test]
    fn test_absolute_binaries_dir_is_kept() {
        let mut config = TntConfig::from_yaml("{}").unwrap();
        config.binaries_dir = PathBuf::from("/opt/tnt/binaries");
        assert_eq!(config.resolved_binaries_dir().unwrap(), PathBuf::from("/opt/tnt/binaries"));
    }
}
