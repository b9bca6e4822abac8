mod logging;

use std::process::ExitCode;

use anyhow::anyhow;
use clap::Parser;
use tracing::{error, info};

use semver_match::cli::Cli;
use semver_match::output::publisher::Publisher;
use semver_match::output::sink::{FileCommandSink, Sink, error_command};
use semver_match::runner::{RunSummary, run};
use semver_match::version::registries::GitHubTagRegistry;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.log_format, cli.log_file.as_deref())?;

    let outcome = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(execute(&cli));

    match outcome {
        Ok(summary) => {
            info!("Resolved {} repositories", summary.resolved.len());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            let message = e.to_string();
            error!("{}", message);
            println!("{}", error_command(&message));
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn execute(cli: &Cli) -> anyhow::Result<RunSummary> {
    let requests = cli.repositories()?;
    info!("Resolving {} repositories", requests.len());

    let token = cli.credential(std::env::var("GITHUB_TOKEN").ok());
    let registry = GitHubTagRegistry::new(&cli.api_url, token)
        .map_err(|e| anyhow!("failed to create GitHub client: {e}"))?;

    let outputs = open_sink(cli.github_output.as_deref(), "output")?;
    let env = open_sink(cli.github_env.as_deref(), "environment variable")?;
    let mut publisher = Publisher::new(outputs, env, &cli.server_url);

    Ok(run(&registry, &requests, &mut publisher, cli.failure_policy()).await?)
}

fn open_sink(path: Option<&std::path::Path>, kind: &'static str) -> anyhow::Result<Box<dyn Sink>> {
    Ok(match path {
        Some(path) => Box::new(FileCommandSink::append(path, kind)?),
        None => Box::new(FileCommandSink::stdout(kind)),
    })
}
