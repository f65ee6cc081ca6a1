// Node command adapters: one uniform vocabulary, one implementation per transport
pub mod docker;
pub mod ssh;

pub use docker::NodeDockerCommands;
pub use ssh::NodeSshCommands;

use crate::error::{Result, TntError};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::net::Ipv4Addr;
use std::sync::Arc;

pub const NODE_BINARY: &str = "SubstratumNode";
pub const NODE_LOG: &str = "/tmp/SubstratumNode_rCURRENT.log";

pub const STOP_COMMAND: &str = "sudo killall SubstratumNode";
pub const CAT_LOGS_COMMAND: &str = "cat /tmp/SubstratumNode_rCURRENT.log";
pub const DELETE_LOGS_COMMAND: &str = "sudo rm -f /tmp/SubstratumNode_rCURRENT.log";
pub const TAIL_LOGS_COMMAND: &str = "tail -f -n 250 /tmp/SubstratumNode_rCURRENT.log";

/// Resolves the address of the machine a node runs on. Called lazily, so
/// cloud instances are only queried when a command actually needs the IP.
pub type IpSource = Arc<dyn Fn() -> Result<String> + Send + Sync>;

/// Arguments passed to the node binary on start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeArgs {
    pub dns_servers: String,
    pub log_level: String,
    pub data_directory: String,
    pub additional_args: Vec<String>,
    pub earning_wallet: Option<String>,
    pub consuming_private_key: Option<String>,
}

impl Default for NodeArgs {
    fn default() -> Self {
        NodeArgs {
            dns_servers: "1.1.1.1".to_string(),
            log_level: "trace".to_string(),
            data_directory: "/tmp".to_string(),
            additional_args: Vec::new(),
            earning_wallet: None,
            consuming_private_key: None,
        }
    }
}

impl NodeArgs {
    pub fn earning_wallet_for(&self, ip: &str) -> Result<String> {
        match &self.earning_wallet {
            Some(wallet) => Ok(wallet.clone()),
            None => earning_wallet(ip),
        }
    }

    pub fn consuming_private_key_for(&self, ip: &str) -> Result<String> {
        match &self.consuming_private_key {
            Some(key) => Ok(key.clone()),
            None => consuming_private_key(ip),
        }
    }

    /// Flags shared by every transport, in the order the node expects them.
    pub(crate) fn to_flags(&self, ip: &str) -> Result<Vec<String>> {
        let mut flags = vec![
            "--dns-servers".to_string(),
            self.dns_servers.clone(),
            "--log-level".to_string(),
            self.log_level.clone(),
            "--data-directory".to_string(),
            self.data_directory.clone(),
            "--ip".to_string(),
            ip.to_string(),
            "--earning-wallet".to_string(),
            self.earning_wallet_for(ip)?,
            "--consuming-private-key".to_string(),
            self.consuming_private_key_for(ip)?,
        ];
        flags.extend(self.additional_args.iter().cloned());
        Ok(flags)
    }
}

fn parse_ipv4(ip: &str) -> Result<Ipv4Addr> {
    ip.trim().parse::<Ipv4Addr>().map_err(|e| TntError::Ip {
        instance: ip.to_string(),
        message: e.to_string(),
    })
}

/// Deterministic wallet address for a node: the IPv4 octets in hex, four
/// times over, with an `EEEEEEEE` suffix.
pub fn earning_wallet(ip: &str) -> Result<String> {
    let octets = parse_ipv4(ip)?.octets();
    let hex: String = octets.iter().map(|b| format!("{:02x}", b)).collect();
    Ok(format!("0x{}EEEEEEEE", hex.repeat(4)))
}

/// Keccak-256 of the dotted IPv4 address, as lowercase hex.
pub fn consuming_private_key(ip: &str) -> Result<String> {
    let ip = parse_ipv4(ip)?.to_string();
    let digest = Keccak256::digest(ip.as_bytes());
    Ok(format!("{:x}", digest))
}

/// The command vocabulary every node transport supports.
pub trait NodeCommands: Send + Sync {
    fn start(&self, node_args: &NodeArgs) -> Result<()>;
    fn stop(&self) -> Result<()>;
    fn cat_logs(&self) -> Result<()>;
    fn delete_logs(&self) -> Result<()>;
    fn retrieve_logs(&self, destination: &str) -> Result<()>;
    fn update(&self, binary: &str) -> Result<()>;
    fn tail(&self) -> Result<()>;
    fn shell(&self) -> Result<()>;
}

#[cfg(test)]
pub(crate) fn fixed_ip(ip: &str) -> IpSource {
    let ip = ip.to_string();
    Arc::new(move || Ok(ip.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earning_wallet() {
        assert_eq!(
            earning_wallet("1.2.3.4").unwrap(),
            "0x01020304010203040102030401020304EEEEEEEE"
        );
        assert_eq!(
            earning_wallet("172.18.1.1").unwrap(),
            "0xac120101ac120101ac120101ac120101EEEEEEEE"
        );
    }

    #[test]
    fn test_consuming_private_key() {
        assert_eq!(
            consuming_private_key("1.2.3.4").unwrap(),
            "89d59b93ef6a94c977e1812b727d5f123f7d825ab636e83aad3e2845a68eaedb"
        );
        assert_eq!(
            consuming_private_key(" 1.2.3.4\n").unwrap(),
            consuming_private_key("1.2.3.4").unwrap()
        );
    }

    #[test]
    fn test_derivation_rejects_bad_ip() {
        assert!(matches!(earning_wallet("not-an-ip"), Err(TntError::Ip { .. })));
        assert!(consuming_private_key("1.2.3").is_err());
    }

    #[test]
    fn test_overrides_win_over_derived_values() {
        let args = NodeArgs {
            earning_wallet: Some("0xabc".to_string()),
            consuming_private_key: Some("deadbeef".to_string()),
            ..NodeArgs::default()
        };
        assert_eq!(args.earning_wallet_for("1.2.3.4").unwrap(), "0xabc");
        assert_eq!(args.consuming_private_key_for("1.2.3.4").unwrap(), "deadbeef");
    }

    #[test]
    fn test_node_args_from_partial_yaml() {
        let args: NodeArgs = serde_yaml::from_str("log_level: debug\n").unwrap();
        assert_eq!(args.log_level, "debug");
        assert_eq!(args.dns_servers, "1.1.1.1");
        assert!(args.additional_args.is_empty());
    }
}
