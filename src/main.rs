use anyhow::{Context, Result};

use trello_recur::cli::{self, Command};
use trello_recur::config;
use trello_recur::providers::dry_run::DryRun;
use trello_recur::providers::trello::TrelloClient;
use trello_recur::sync;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match cli::parse_args(&args)? {
        Command::Help => {
            cli::print_help();
            return Ok(());
        }
        Command::Run(options) => options,
    };

    let settings =
        config::load_settings(options.config_path.as_deref(), |name| std::env::var(name).ok())?;
    let client = TrelloClient::new(settings.client_config());

    if options.dry_run {
        let api = DryRun::new(client);
        let summary = sync::run(&api, &settings)
            .await
            .context("Recurring card sync failed")?;
        print!("{}", cli::render_summary(&summary, true));
        print!("{}", cli::render_planned(&api.planned()));
    } else {
        let summary = sync::run(&client, &settings)
            .await
            .context("Recurring card sync failed")?;
        print!("{}", cli::render_summary(&summary, false));
    }

    Ok(())
}
