mod cli;
mod commands;
mod logging;

use clap::{CommandFactory, Parser};
use cli::Args;
use commands::{handle_list_config_command, print_json, run_command};
use logging::setup_logging;
use understat::data_fetcher::api::create_http_client_with_timeout;
use understat::{AppError, Config, Understat};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let mut args = Args::parse();

    if args.list_config {
        return handle_list_config_command().await;
    }

    let Some(command) = args.command.take() else {
        Args::command().print_help()?;
        println!();
        return Ok(());
    };

    // Load config first to fail early if there's an issue
    let config = Config::load().await?;

    let (log_file_path, _guard) = setup_logging(&args, &config).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    let client = create_http_client_with_timeout(config.http_timeout_seconds)?;
    let understat = Understat::with_config(client, &config);

    match run_command(&understat, command).await {
        Ok(output) => print_json(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            if let Some(seconds) = e.retry_delay_seconds() {
                eprintln!("Temporary failure, try again in about {seconds} seconds.");
            }
            Err(e)
        }
    }
}
