use clap::Parser;
use sr_automator::{
    llms::api::openai::models::GPT_4O_MINI,
    prelude::*,
    shell::drive_run,
};
use std::{path::PathBuf, process::ExitCode};

// cargo run --bin sr_automator -- --input articles.csv

// cargo run --bin sr_automator -- --input articles.csv --model gpt-4o --log-level debug

#[derive(Debug, Parser)]
#[command(
    name = "sr_automator",
    version,
    about = "Screen systematic-review candidates in a CSV file as include/exclude"
)]
struct Cli {
    /// CSV file with `title`, `author`, `year` and `abstract` columns
    #[arg(short, long)]
    input: PathBuf,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, default_value = GPT_4O_MINI)]
    model: String,

    /// Override the API base url, e.g. for a compatible proxy
    #[arg(long)]
    base_url: Option<String>,

    #[arg(long, default_value_t = tracing::Level::WARN)]
    log_level: tracing::Level,

    /// Log to the terminal only
    #[arg(long)]
    no_log_file: bool,
}

const EXIT_FAILED: u8 = 1;
const EXIT_INVALID: u8 = 2;
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
pub async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_FAILED)
        }
    }
}

async fn run(cli: Cli) -> sr_automator::Result<ExitCode> {
    let mut logging = LoggingConfig::new().log_to_file(!cli.no_log_file);
    logging.level = cli.log_level;
    logging.load_logger()?;

    let mut builder = SrAutomator::openai()
        .logging_enabled(false)
        .model_id(cli.model);
    if let Some(base_url) = &cli.base_url {
        builder = builder.with_base_url(base_url);
    }

    let request = ScreeningRequest::new(cli.api_key.unwrap_or_default(), cli.input);
    let handle = match SrAutomator::runner().start_openai(request, builder) {
        Ok(handle) => handle,
        Err(e @ RunError::Validation(_)) => {
            eprintln!("Error: {e}");
            return Ok(ExitCode::from(EXIT_INVALID));
        }
        Err(e) => return Err(e.into()),
    };

    // Registered once so a Ctrl-C between redraws is not lost.
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let outcome = drive_run(handle, &mut std::io::stdout(), ctrl_c).await?;
    Ok(match outcome {
        RunOutcome::Completed { .. } => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        RunOutcome::Failed { .. } => {
            eprintln!("{outcome}");
            ExitCode::from(EXIT_FAILED)
        }
        RunOutcome::Cancelled => {
            println!("{outcome}");
            ExitCode::from(EXIT_CANCELLED)
        }
    })
}
