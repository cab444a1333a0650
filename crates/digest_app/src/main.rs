//! `digest`: turns problem pages into stored records and daily challenge posts.

mod config;
mod daily;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use digest_core::{render_for_display, ProblemId, ProblemRecord};
use digest_engine::{
    export_markdown, Catalog, DailyCounter, GraphqlFetcher, ProblemService, ProblemStore,
};
use digest_logging::{digest_error, digest_info};

use config::AppConfig;

#[derive(Parser)]
#[command(name = "digest", version, about)]
struct Cli {
    /// Configuration file (RON). Defaults to ./digest.ron when present.
    #[arg(long, global = true, env = "DIGEST_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a problem by URL, store it and print its card.
    Fetch { url: String },
    /// Print the card of a stored problem.
    Show { id: ProblemId },
    /// Advance the daily counter and print today's post.
    Daily,
    /// Post the daily challenge every day at the configured time.
    Schedule,
    /// List problems from the remote problem set.
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Write a stored problem as a markdown file with frontmatter.
    Export {
        id: ProblemId,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the effective configuration as RON.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (config, source) = match AppConfig::load(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    logging::initialize(config.log_destination, config.level_filter());
    match &source {
        Some(path) => digest_info!("loaded config from {}", path.display()),
        None => digest_info!("no config file; using defaults"),
    }

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            digest_error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, config: &AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(dispatch(command, config))
}

async fn dispatch(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Fetch { url } => {
            let mut service = open_service(config)?;
            let record = service.add_problem_by_url(&url).await?;
            println!("{}", render_for_display(&record, config.card_limit));
            Ok(())
        }
        Command::Show { id } => {
            let store = ProblemStore::open(&config.store_path)?;
            let record = stored(&store, id)?;
            println!("{}", render_for_display(record, config.card_limit));
            Ok(())
        }
        Command::Daily => {
            let mut service = open_service(config)?;
            post_daily(&mut service, config).await
        }
        Command::Schedule => schedule(config).await,
        Command::Config => {
            print!("{}", config.to_ron()?);
            println!();
            Ok(())
        }
        Command::List { limit } => {
            let service = open_service(config)?;
            for summary in service.listing(limit).await? {
                println!(
                    "{} {} ({}) - {}",
                    summary.difficulty.icon(),
                    summary.title,
                    summary.difficulty,
                    summary.slug
                );
            }
            Ok(())
        }
        Command::Export { id, out } => {
            let store = ProblemStore::open(&config.store_path)?;
            let record = stored(&store, id)?;
            let dir = out.unwrap_or_else(|| config.export_dir.clone());
            let path = export_markdown(&dir, record)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn open_service(config: &AppConfig) -> Result<ProblemService<GraphqlFetcher>> {
    let fetcher = GraphqlFetcher::new(config.fetch_settings())?;
    let store = ProblemStore::open(&config.store_path)?;
    Ok(ProblemService::new(fetcher, store))
}

fn stored(store: &ProblemStore, id: ProblemId) -> Result<&ProblemRecord> {
    store
        .get(id)
        .ok_or_else(|| anyhow!("problem {id} is not stored in {}", store.path().display()))
}

async fn post_daily(
    service: &mut ProblemService<GraphqlFetcher>,
    config: &AppConfig,
) -> Result<()> {
    let catalog = Catalog::load(&config.catalog_path)?;
    let counter = DailyCounter::new(&config.counter_path);
    let record = service.daily_problem(&catalog, &counter).await?;

    let today = Local::now().date_naive();
    println!("{}", daily::thread_title(&record, today));
    println!();
    println!(
        "{}",
        daily::format_daily_post(&record, today, config.card_limit, config.message_limit)
    );
    digest_info!("posted daily challenge {} ({})", record.id, record.title);
    Ok(())
}

async fn schedule(config: &AppConfig) -> Result<()> {
    let at = config.daily_time()?;
    let mut service = open_service(config)?;
    loop {
        let now = Local::now().naive_local();
        let next = daily::next_run_after(now, at);
        let wait = (next - now).to_std().unwrap_or_default();
        digest_info!("next daily challenge at {next}");
        tokio::time::sleep(wait).await;

        if let Err(err) = post_daily(&mut service, config).await {
            digest_error!("daily challenge failed: {err:#}");
        }
    }
}
