mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, ConfigCommands};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashflow_analytics=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let settings_override = cli.settings.as_deref();

    let result = match cli.command {
        None => {
            cli::banner();
            Ok(())
        }
        Some(Commands::Analyze {
            file,
            months,
            format,
            summary,
        }) => {
            let settings = cli::load(settings_override);
            cli::analyze::run(&settings, &file, months.as_deref(), format, summary)
        }
        Some(Commands::Months { file, months }) => {
            let settings = cli::load(settings_override);
            cli::months::run(&settings, &file, months.as_deref())
        }
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => cli::config::show(settings_override),
            ConfigCommands::Init { force } => cli::config::init(settings_override, force),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
