mod commands;
mod terminal;

use commands::{CommandLine, Commands, control, hosts, map, services};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.global.verbose, commands.global.quiet);
    let cfg = commands.global.to_config();

    print::banner(cfg.quiet);

    let result = match commands.command {
        Commands::Map { xml } => {
            print::header("mapping network services", cfg.quiet);
            map::map(xml, cfg).await
        }
        Commands::Hosts => {
            print::header("browsing network neighborhood", cfg.quiet);
            hosts::hosts(&cfg).await
        }
        Commands::Services { host } => services::services(&host, &cfg).await,
        Commands::Control {
            host,
            service,
            action,
        } => control::control(&host, &service, action, cfg).await,
    };

    print::end_of_program();
    result
}
