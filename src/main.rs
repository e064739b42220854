use clap::Parser;
use tracing::error;

use xdedupe::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand, SeenCommand};
use xdedupe::adapter::inbound::cli::output::{self, OutputConfig};
use xdedupe::adapter::inbound::cli::{config, operator, replay, seen};
use xdedupe::error::Result;
use xdedupe::infrastructure::config::settings::Config;
use xdedupe::infrastructure::operator::entry::Operator;

fn init_logging(cli: &Cli) -> Result<()> {
    let config_toml = operator::read_config_toml(cli.config.as_deref())?;
    let mut logging = Config::parse_toml(&config_toml)?.logging;
    match cli.verbose {
        0 if cli.quiet => logging.level = "error".to_string(),
        0 => {}
        1 => logging.level = "debug".to_string(),
        _ => logging.level = "trace".to_string(),
    }
    logging.init();
    Ok(())
}

async fn dispatch(cli: &Cli) -> Result<()> {
    let path = cli.config.as_deref();
    match &cli.command {
        Commands::Replay(args) => replay::execute(path, args).await,
        Commands::Seen(SeenCommand::List) => seen::execute_list(path),
        Commands::Seen(SeenCommand::Prune) => seen::execute_prune(path),
        Commands::Seen(SeenCommand::Forget { id }) => seen::execute_forget(path, id),
        Commands::Seen(SeenCommand::Clear) => seen::execute_clear(path),
        Commands::Config(ConfigCommand::Show) => config::execute_show(path),
        Commands::Config(ConfigCommand::Validate) => config::execute_validate(path),
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    if operator::install(Box::new(Operator)).is_err() {
        output::error("CLI operator already installed");
        std::process::exit(1);
    }

    let result = match init_logging(&cli) {
        Ok(()) => dispatch(&cli).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
