use anyhow::Context;
use clap::Parser;
use hypernet_api::ReqwestClient;
use hypernet_cache::SqliteCacheStorage;
use hypernet_core::{
    ContactForm, EventLog, Request, SiteConfig, SqliteStore, SubmissionLog, SystemClock,
};
use hypernet_page::form::{FormView, MessageKind};
use hypernet_page::ContactFormHandler;
use hypernet_worker::{CacheWorker, FetchOutcome};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hypernet")]
#[command(version, about = "Drive the Hypernet site scripts from the terminal", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true, env = "HYPERNET_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Validate and post a contact form submission
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        interest: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        newsletter: bool,
    },
    /// Flush queued submissions, as the background sync would
    Sync,
    /// Install the cache worker and precache the site assets
    Install,
    /// Activate the installed worker, dropping every older cache version
    Activate,
    /// Fetch a path through the cache worker
    Fetch {
        /// Site-relative path or absolute URL
        path: String,
    },
    /// Show a push notification
    Push {
        /// Raw JSON payload, e.g. '{"title":"Hi","body":"There"}'
        payload: Option<String>,
    },
    /// Print the tracked analytics events
    Events,
    /// Print the queued submissions
    Submissions,
}

/// Prints form feedback instead of drawing it
struct TerminalFormView;

impl FormView for TerminalFormView {
    fn show_message(&mut self, message: &str, kind: MessageKind) {
        match kind {
            MessageKind::Success => println!("{}", message),
            MessageKind::Error => eprintln!("{}", message),
        }
    }

    fn hide_message(&mut self) {}

    fn submit_label(&self) -> String {
        "Send Message".to_string()
    }

    fn set_submit(&mut self, label: &str, disabled: bool) {
        if disabled {
            println!("{}", label);
        }
    }

    fn reset(&mut self) {}
}

fn open_store(config: &SiteConfig) -> anyhow::Result<(Arc<SqliteStore>, Arc<SqliteCacheStorage>)> {
    let path = config.storage.resolved_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let store = SqliteStore::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let caches = SqliteCacheStorage::new(&path)?;
    Ok((Arc::new(store), Arc::new(caches)))
}

fn worker(config: &SiteConfig) -> anyhow::Result<CacheWorker> {
    let (store, caches) = open_store(config)?;
    let network = Arc::new(ReqwestClient::new(config.origin()?));
    Ok(CacheWorker::new(config, caches, network, store)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hypernet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => SiteConfig::load_from(path)?,
        None => SiteConfig::load()?,
    };

    match cli.command {
        Commands::Submit {
            name,
            email,
            interest,
            message,
            newsletter,
        } => {
            let (store, _) = open_store(&config)?;
            let handler = ContactFormHandler::new(
                config.resolve(&config.form.endpoint)?,
                Arc::new(ReqwestClient::new(config.origin()?)),
                SubmissionLog::new(store),
                Arc::new(SystemClock),
            );
            let form = ContactForm {
                name,
                email,
                interest,
                message,
                newsletter,
            };
            let outcome = handler.submit(&mut TerminalFormView, &form).await;
            tracing::debug!("Submit outcome: {:?}", outcome);
        }
        Commands::Sync => {
            let worker = worker(&config)?;
            match worker.handle_sync(&config.worker.sync_tag).await {
                Some(report) => println!(
                    "Sent {} submissions, {} failed{}",
                    report.attempted,
                    report.failed,
                    if report.cleared { ", queue cleared" } else { "" }
                ),
                None => println!("Nothing to sync"),
            }
        }
        Commands::Install => {
            let worker = worker(&config)?;
            let installed = worker.install().await;
            if let Some(error) = &installed.error {
                eprintln!("Precache failed: {}", error);
            }
            println!(
                "{} installed: {} assets precached",
                worker.cache_name(),
                installed.precached
            );
        }
        Commands::Activate => {
            let worker = worker(&config)?;
            let activated = worker.activate().await?;
            println!("{} active", worker.cache_name());
            for name in &activated.deleted {
                println!("  removed {}", name);
            }
        }
        Commands::Fetch { path } => {
            let worker = worker(&config)?;
            worker.resume();
            let request = Request::get(config.resolve(&path)?);
            match worker.handle_fetch(&request).await {
                FetchOutcome::Passthrough => println!("(not intercepted)"),
                FetchOutcome::Respond { response, source } => {
                    eprintln!("{} {} ({:?})", response.status, response.status_text, source);
                    println!("{}", response.text());
                }
            }
        }
        Commands::Push { payload } => {
            let worker = worker(&config)?;
            worker.handle_push(payload.as_deref().map(str::as_bytes)).await;
        }
        Commands::Events => {
            let (store, _) = open_store(&config)?;
            let log = EventLog::with_capacity(store, config.analytics.max_events);
            for event in log.load()? {
                println!("{}  {:<20} {}", event.timestamp.to_rfc3339(), event.event, event.data);
            }
        }
        Commands::Submissions => {
            let (store, _) = open_store(&config)?;
            let submissions = SubmissionLog::new(store).load()?;
            println!("{}", serde_json::to_string_pretty(&submissions)?);
        }
    }

    Ok(())
}
