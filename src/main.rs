use anyhow::Context;
use clap::Parser;
use tracing::error;

use lantern_scout::cli::{self, Cli, Command};
use lantern_scout::config::Config;
use lantern_scout::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::tracing::init().context("failed to initialize tracing")?;

    std::panic::set_hook(Box::new(|panic_info| {
        let message = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .map(String::as_str)
            })
            .unwrap_or("unknown panic payload");
        if let Some(location) = panic_info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                message,
                "panic occurred"
            );
        } else {
            error!(message, "panic occurred without location information");
        }
    }));

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    match cli.command {
        Command::Run(args) => cli::run(&config, args).await,
        Command::Profiles => cli::profiles(&config),
        Command::Preview(args) => cli::preview(&config, args),
    }
}
