use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use tracing_subscriber::prelude::*;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use anyhow::{Result, Context};
use event_stars as lib;
use lib::api::{http::HttpEventApi, mock::MockEventApi, EventApi};
use lib::config::Config;
use lib::models::{Band, Event, Member};
use lib::util::{format_event, format_events};
use lib::view_model::EventsViewModel;

#[derive(Parser)]
#[command(name = "event-stars", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the events API base URL
    #[arg(long, value_name = "URL", global = true)]
    api_base: Option<String>,

    /// Use an in-memory backend with sample events instead of the remote API
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every event
    List,
    /// Show events with a band member whose name contains TEXT
    Search {
        text: String,
    },
    /// Delete an event
    Delete {
        id: i64,
    },
    /// Set an event's star rating (0-5)
    Rate {
        id: i64,
        stars: i32,
    },
    /// Set an event's comment
    Comment {
        id: i64,
        text: String,
    },
    /// Interactive session over the event list
    Shell,
    /// Validate config file and exit
    ConfigValidate,
}

/// Logs go to stderr and, when `log_dir` is configured, to a daily-rotated file.
fn init_logging(cfg: &Config) -> Option<WorkerGuard> {
    let _ = LogTracer::init();

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &cfg.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "event-stars.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().with_ansi(false).with_writer(non_blocking)), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set global tracing subscriber: {}", e);
    }
    guard
}

fn sample_events() -> Vec<Event> {
    let member = |n: &str| Member { name: Some(n.to_string()) };
    let mut graspop = Event::new(1000, "GrasPop Metal Meeting");
    graspop.img_url = Some("img/1000.jpeg".into());
    graspop.nb_stars = Some(4);
    graspop.bands.push(Band {
        name: Some("Metallica".into()),
        members: vec![member("Queen Anika Walsh"), member("Kaleb Hammond")],
    });
    let mut hellfest = Event::new(1001, "Hellfest");
    hellfest.nb_stars = Some(2);
    hellfest.bands.push(Band {
        name: Some("Pink Floyd".into()),
        members: vec![member("Kelsey Gibbs")],
    });
    vec![graspop, hellfest]
}

fn build_api(cli: &Cli, cfg: &Config) -> Result<Arc<dyn EventApi>> {
    if cli.mock {
        return Ok(Arc::new(MockEventApi::new(sample_events())));
    }
    Ok(Arc::new(HttpEventApi::from_config(cfg)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (cfg, cfg_path) = Config::resolve(cli.config.as_deref())
        .with_context(|| "loading config".to_string())?;
    let mut cfg = cfg.with_env_overrides();
    if let Some(base) = &cli.api_base {
        cfg.api_base = base.clone();
    }

    if matches!(cli.command, Commands::ConfigValidate) {
        match cfg.validate() {
            Ok(()) => {
                match &cfg_path {
                    Some(p) => println!("OK ({})", p.display()),
                    None => println!("OK (built-in defaults)"),
                }
                return Ok(());
            }
            Err(e) => {
                eprintln!("Config validation failed: {}", e);
                std::process::exit(2);
            }
        }
    }

    let _guard = init_logging(&cfg);
    cfg.validate()?;
    if let Some(p) = &cfg_path {
        tracing::debug!("using config {}", p.display());
    }

    let api = build_api(&cli, &cfg)?;
    let mut vm = EventsViewModel::new(api);

    match cli.command {
        Commands::List => {
            let events = vm.activate().await.with_context(|| "listing events".to_string())?;
            print!("{}", format_events(events));
        }
        Commands::Search { text } => {
            vm.set_search_query(text);
            if !vm.search().await.with_context(|| "searching events".to_string())? {
                eprintln!("Search text is empty; nothing to do.");
                std::process::exit(2);
            }
            print!("{}", format_events(vm.events()));
        }
        Commands::Delete { id } => {
            vm.delete_event(id).await.with_context(|| format!("deleting event {}", id))?;
            println!("Deleted event {}.", id);
        }
        Commands::Rate { id, stars } => {
            vm.activate().await.with_context(|| "listing events".to_string())?;
            vm.update_stars(id, stars).await.with_context(|| format!("rating event {}", id))?;
            if let Some(e) = vm.find(id) {
                println!("{}", format_event(e));
            }
        }
        Commands::Comment { id, text } => {
            vm.activate().await.with_context(|| "listing events".to_string())?;
            vm.update_comment(id, &text).await.with_context(|| format!("commenting event {}", id))?;
            if let Some(e) = vm.find(id) {
                println!("{}", format_event(e));
            }
        }
        Commands::Shell => {
            vm.activate().await.with_context(|| "listing events".to_string())?;
            let lines = lib::shell::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!("cannot listen for Ctrl-C: {}", e);
                    std::future::pending::<()>().await;
                }
            };
            lib::shell::run_shell(&mut vm, lines, tokio::io::stdout(), shutdown).await?;
        }
        // handled above, before logging is initialised
        Commands::ConfigValidate => {}
    }

    Ok(())
}
