//! User cart CLI - Drive the cart widget against the storefront API.
//!
//! # Usage
//!
//! ```bash
//! # Render a user's cart
//! usercart show --user u1
//!
//! # Render names starting with "Sh", with p1 removed
//! usercart show --user u1 --remove p1 --filter Sh
//!
//! # Interactive session reading gestures from stdin
//! usercart session --user u1
//! ```
//!
//! # Commands
//!
//! - `show` - Load a user's cart, apply gestures, print the rendered HTML
//! - `session` - Apply gestures read line by line from stdin

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usercart_core::{ItemId, UserId};
use usercart_storefront::WidgetConfig;

mod commands;

#[derive(Parser)]
#[command(name = "usercart")]
#[command(author, version, about = "User cart widget CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a user's cart once
    Show {
        /// User whose cart to load
        #[arg(short, long)]
        user: UserId,

        /// Remove these items before rendering
        #[arg(short, long)]
        remove: Vec<ItemId>,

        /// Only show items whose name starts with this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Read gestures from stdin and re-render after each one
    Session {
        /// User to bind first
        #[arg(short, long)]
        user: UserId,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &WidgetConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = WidgetConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so stdout carries only rendered HTML
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "usercart_storefront=info,usercart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &WidgetConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Show {
            user,
            remove,
            filter,
        } => commands::show::run(config, user, &remove, filter.as_deref()).await?,
        Commands::Session { user } => commands::session::run(config, user).await?,
    }
    Ok(())
}
