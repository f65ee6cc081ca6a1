use clap::Parser;
use std::sync::Arc;
use test_net_tools::cli::{Cli, Commands};
use test_net_tools::commands::{
    self, handle_commands_command, handle_doctor_command, handle_list_command,
};
use test_net_tools::config::{self, TntConfig};
use test_net_tools::executor::{Executor, SystemExecutor};
use test_net_tools::instance::Instances;
use test_net_tools::output::{confirm_action, print_error, print_info};
use test_net_tools::{logger, Result};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);

    match &cli.command {
        Commands::ListCommands => {
            handle_commands_command();
            return Ok(());
        }
        Commands::Doctor { format } => return handle_doctor_command(executor.as_ref(), format),
        _ => {}
    }

    let path = config::locate(cli.config.as_deref())?;
    tracing::debug!("loading configuration from {}", path.display());
    let config = TntConfig::load(&path)?;
    let instances = Instances::from_config(&config, executor)?;

    if let Commands::List { backend, format } = &cli.command {
        return handle_list_command(&instances, *backend, format);
    }

    let Some(invocation) = cli.command.invocation(&config.node) else {
        return Ok(());
    };

    let command = commands::find(invocation.command)?;
    let names = invocation.targets.resolve(command.name, &instances)?;

    if invocation.confirm && names.len() > 1 {
        let prompt = format!(
            "This will {} {} instances: {}",
            command.name,
            names.len(),
            names.join(", ")
        );
        if !confirm_action(&prompt)? {
            print_info("Cancelled");
            return Ok(());
        }
    }

    command.run_for_many(&instances, &names, &invocation.context)
}
