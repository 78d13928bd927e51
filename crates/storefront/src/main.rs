//! Vitrine storefront - interactive catalog browser.
//!
//! Loads the product feed once, restores the cart from local storage and then
//! reads commands from stdin until `quit`, end of input or Ctrl+C.
//!
//! # Architecture
//!
//! - `AppState` owns the catalog, cart, filters, sort and pagination
//! - Askama text templates render every view to stdout
//! - Logs go to stderr so they never interleave with the catalog output

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Stdout;

use sentry::integrations::tracing as sentry_tracing;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vitrine_core::CheckoutForm;
use vitrine_storefront::cart::FileStorage;
use vitrine_storefront::catalog::Feed;
use vitrine_storefront::config::StorefrontConfig;
use vitrine_storefront::render::TextRenderer;
use vitrine_storefront::shell::{self, Command, Outcome};
use vitrine_storefront::state::AppState;

type Session = AppState<FileStorage, TextRenderer<Stdout>>;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
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
    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vitrine_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let storage = FileStorage::new(&config.data_dir);
    let renderer = TextRenderer::new(std::io::stdout(), config.currency.clone());
    let mut state = AppState::new(storage, renderer);

    let feed = Feed::from_source(&config.feed, config.feed_timeout)
        .expect("Failed to create product feed client");
    tracing::info!(feed = %config.feed, "loading catalog");
    if let Err(e) = state.load_catalog(&feed).await {
        tracing::debug!(error = %e, "continuing without a catalog");
    }

    state.renderer_mut().write_line("Type 'help' for a list of commands.");
    run(&mut state).await;

    tracing::info!("storefront session ended");
}

/// Read and execute commands until the session ends.
async fn run(state: &mut Session) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        state.renderer_mut().prompt("> ");
        let line = tokio::select! {
            line = lines.next_line() => line,
            () = &mut shutdown => break,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                state.renderer_mut().write_line(&e.to_string());
                continue;
            }
        };

        match shell::execute(state, command) {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Help) => state.renderer_mut().write_line(shell::HELP),
            Ok(Outcome::Checkout) => {
                let Some(form) = read_checkout_form(&mut lines, state.renderer_mut()).await else {
                    break;
                };
                if let Err(e) = state.checkout(&form) {
                    tracing::debug!(error = %e, "checkout not completed");
                }
            }
            Ok(Outcome::Quit) => break,
            // Already rendered as a notice
            Err(e) => tracing::debug!(error = %e, "command failed"),
        }
    }
}

/// Ask for the three checkout fields. `None` if input ended.
async fn read_checkout_form<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    renderer: &mut TextRenderer<Stdout>,
) -> Option<CheckoutForm> {
    let mut answers = Vec::with_capacity(3);
    for label in ["Name: ", "Phone: ", "Address: "] {
        renderer.prompt(label);
        match lines.next_line().await {
            Ok(Some(answer)) => answers.push(answer),
            Ok(None) => return None,
            Err(e) => {
                tracing::error!(error = %e, "failed to read input");
                return None;
            }
        }
    }
    let mut answers = answers.into_iter();
    Some(CheckoutForm::new(
        answers.next().unwrap_or_default(),
        answers.next().unwrap_or_default(),
        answers.next().unwrap_or_default(),
    ))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
