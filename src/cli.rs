use crate::backends::Backend;
use crate::commands::CommandContext;
use crate::error::{Result, TntError};
use crate::instance::Instances;
use crate::node::NodeArgs;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "tnt")]
#[command(about = "Test Net Tools - drive test nodes on EC2, GCE, VirtualBox and Docker")]
pub struct Cli {
    /// Path to the YAML configuration
    /// (defaults to $TNT_CONFIG, ./tnt.yaml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which instances a command applies to.
#[derive(Args, Debug, Clone, Default)]
pub struct Targets {
    /// Instance names
    pub names: Vec<String>,

    /// Every configured instance
    #[arg(short, long, conflicts_with = "names")]
    pub all: bool,

    /// Every instance on one backend (ec2, compute, virtualbox, docker)
    #[arg(short, long, value_enum, conflicts_with_all = ["names", "all"])]
    pub backend: Option<Backend>,
}

impl Targets {
    pub fn resolve(&self, command: &str, instances: &Instances) -> Result<Vec<String>> {
        let names: Vec<String> = if self.all {
            instances.names().into_iter().map(String::from).collect()
        } else if let Some(backend) = self.backend {
            instances
                .by_backend(backend)
                .into_iter()
                .map(|instance| instance.name().to_string())
                .collect()
        } else {
            self.names.clone()
        };

        if names.is_empty() {
            return Err(TntError::NoTargets(command.to_string()));
        }
        Ok(names)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Boot instances (cloud instance, VM, or Docker network)
    Boot {
        #[command(flatten)]
        targets: Targets,
    },

    /// Shut instances down
    Kill {
        #[command(flatten)]
        targets: Targets,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Start the node on instances
    Start {
        #[command(flatten)]
        targets: Targets,

        /// DNS servers passed to the node
        #[arg(long)]
        dns_servers: Option<String>,

        /// Node log level
        #[arg(long)]
        log_level: Option<String>,

        /// Node data directory
        #[arg(long)]
        data_directory: Option<String>,

        /// Extra arguments for the node, after `--`
        #[arg(last = true)]
        additional_args: Vec<String>,
    },

    /// Stop the node on instances
    Stop {
        #[command(flatten)]
        targets: Targets,
    },

    /// Tail node logs in a new terminal
    Tail {
        #[command(flatten)]
        targets: Targets,
    },

    /// Open a shell in a new terminal
    Shell {
        #[command(flatten)]
        targets: Targets,
    },

    /// Upload a node binary from the binaries directory
    Update {
        #[command(flatten)]
        targets: Targets,

        /// Binary file name inside the binaries directory
        #[arg(long)]
        binary: String,
    },

    /// Print node logs
    CatLogs {
        #[command(flatten)]
        targets: Targets,
    },

    /// Copy node logs to a local directory
    RetrieveLogs {
        #[command(flatten)]
        targets: Targets,

        /// Local directory to copy logs into
        #[arg(short, long, default_value = "logs")]
        destination: PathBuf,
    },

    /// Delete node logs
    DeleteLogs {
        #[command(flatten)]
        targets: Targets,
    },

    /// Show instance addresses
    Ip {
        #[command(flatten)]
        targets: Targets,
    },

    /// List configured instances
    List {
        /// Only instances on this backend
        #[arg(short, long, value_enum)]
        backend: Option<Backend>,

        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },

    /// List available commands
    #[command(name = "commands")]
    ListCommands,

    /// Check that the external tools are installed
    Doctor {
        /// Output format (json, yaml, or pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
}

/// A per-instance command resolved from the command line.
#[derive(Debug)]
pub struct Invocation {
    pub command: &'static str,
    pub targets: Targets,
    pub context: CommandContext,
    pub confirm: bool,
}

impl Commands {
    /// Maps instance commands onto the dispatch table. `None` for the
    /// commands that do not target instances.
    pub fn invocation(&self, defaults: &NodeArgs) -> Option<Invocation> {
        let plain = |command: &'static str, targets: &Targets| Invocation {
            command,
            targets: targets.clone(),
            context: CommandContext {
                node_args: defaults.clone(),
                ..CommandContext::default()
            },
            confirm: false,
        };

        let invocation = match self {
            Commands::Boot { targets } => plain("boot", targets),
            Commands::Kill { targets, yes } => Invocation {
                confirm: !yes,
                ..plain("kill", targets)
            },
            Commands::Start {
                targets,
                dns_servers,
                log_level,
                data_directory,
                additional_args,
            } => {
                let mut invocation = plain("start", targets);
                let node_args = &mut invocation.context.node_args;
                if let Some(dns_servers) = dns_servers {
                    node_args.dns_servers = dns_servers.clone();
                }
                if let Some(log_level) = log_level {
                    node_args.log_level = log_level.clone();
                }
                if let Some(data_directory) = data_directory {
                    node_args.data_directory = data_directory.clone();
                }
                if !additional_args.is_empty() {
                    node_args.additional_args = additional_args.clone();
                }
                invocation
            }
            Commands::Stop { targets } => plain("stop", targets),
            Commands::Tail { targets } => plain("tail", targets),
            Commands::Shell { targets } => plain("shell", targets),
            Commands::Update { targets, binary } => {
                let mut invocation = plain("update", targets);
                invocation.context.binary = Some(binary.clone());
                invocation
            }
            Commands::CatLogs { targets } => plain("cat-logs", targets),
            Commands::RetrieveLogs { targets, destination } => {
                let mut invocation = plain("retrieve-logs", targets);
                invocation.context.destination = Some(destination.clone());
                invocation
            }
            Commands::DeleteLogs { targets } => plain("delete-logs", targets),
            Commands::Ip { targets } => plain("ip", targets),
            Commands::List { .. } | Commands::ListCommands | Commands::Doctor { .. } => return None,
        };

        Some(invocation)
    }
}
