//! forge - command-line front end for the forge configuration store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use forge_config::{ConfigStore, Value};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "forge", about, version)]
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit `~/.forge/config.json`.
    Config(ConfigCommand),
    /// Add a path to the linked paths.
    Link(LinkArgs),
    /// List linked paths.
    Links,
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the config file path.
    Path,
    /// Print the whole config as JSON.
    Show,
    /// Print a single top-level setting.
    Get(GetArgs),
    /// Set a top-level setting.
    Set(SetArgs),
    /// Update theme author metadata.
    Author(AuthorArgs),
}

/// Arguments for the `config get` subcommand.
#[derive(clap::Args)]
struct GetArgs {
    /// Top-level key (e.g. "theme", "links").
    key: String,
}

/// Arguments for the `config set` subcommand.
#[derive(clap::Args)]
struct SetArgs {
    /// Top-level key.
    key: String,
    /// New value. Parsed as JSON when possible (e.g. `null`, `["/a"]`),
    /// otherwise stored as a string.
    value: String,
}

/// Arguments for the `config author` subcommand.
#[derive(clap::Args)]
struct AuthorArgs {
    /// Author name.
    #[arg(long)]
    name: Option<String>,
    /// Author homepage URL.
    #[arg(long)]
    url: Option<String>,
}

/// Arguments for the `link` subcommand.
#[derive(clap::Args)]
struct LinkArgs {
    /// Directory to link (e.g. a WordPress install). Stored as an absolute path.
    path: PathBuf,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Creates the store and loads it, writing defaults on first run.
///
/// # Errors
///
/// Returns an error if the home directory is unknown or the config cannot be loaded.
fn load_store() -> Result<ConfigStore> {
    let mut store = ConfigStore::new().context("failed to resolve config path")?;
    store.read().context("failed to load config")?;
    Ok(store)
}

/// Parses a CLI value: JSON if it parses, otherwise a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(String::from(raw)))
}

/// Runs the `config path` subcommand.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
#[instrument(skip_all)]
fn run_config_path() -> Result<()> {
    let store = ConfigStore::new().context("failed to resolve config path")?;
    tracing::info!("{}", store.path().display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or serialized.
#[instrument(skip_all)]
fn run_config_show() -> Result<()> {
    let store = load_store()?;
    let mut buf = Vec::new();
    store.write_to(&mut buf).context("failed to render config")?;
    tracing::info!("{}", String::from_utf8_lossy(&buf));
    Ok(())
}

/// Runs the `config get` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[instrument(skip_all)]
fn run_config_get(args: &GetArgs) -> Result<()> {
    let store = load_store()?;
    report_value(&args.key, store.get(&args.key));
    Ok(())
}

/// Logs a single setting, or a notice if it is not set.
fn report_value(key: &str, value: Option<&Value>) {
    match value {
        Some(value) => tracing::info!("{}", value),
        None => tracing::info!("{} is not set", key),
    }
}

/// Runs the `config set` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or saved.
#[instrument(skip_all)]
fn run_config_set(args: &SetArgs) -> Result<()> {
    let mut store = load_store()?;
    let value = parse_value(&args.value);
    tracing::info!("Set {} = {}", args.key, value);
    store.set(args.key.as_str(), value);
    store.write().context("failed to save config")
}

/// Runs the `config author` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or saved, or `theme` is
/// not a mapping of strings.
#[instrument(skip_all)]
fn run_config_author(args: &AuthorArgs) -> Result<()> {
    let mut store = load_store()?;
    let mut theme = store.theme()?;
    if let Some(name) = &args.name {
        theme.author = Some(name.clone());
    }
    if let Some(url) = &args.url {
        theme.author_url = Some(url.clone());
    }
    store.set_theme(&theme)?;
    store.write().context("failed to save config")?;
    tracing::info!(
        "Theme author: {} ({})",
        theme.author.as_deref().unwrap_or("-"),
        theme.author_url.as_deref().unwrap_or("-"),
    );
    Ok(())
}

/// Runs the `link` subcommand.
///
/// # Errors
///
/// Returns an error if the path cannot be made absolute, or the config
/// cannot be loaded or saved.
#[instrument(skip_all)]
fn run_link(args: &LinkArgs) -> Result<()> {
    let path = std::path::absolute(&args.path)
        .with_context(|| format!("failed to resolve {}", args.path.display()))?;
    let mut store = load_store()?;
    store.add_link(path.to_string_lossy().into_owned())?;
    store.write().context("failed to save config")?;
    tracing::info!("Linked {}", path.display());
    Ok(())
}

/// Runs the `links` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or `links` is malformed.
#[instrument(skip_all)]
fn run_links() -> Result<()> {
    let store = load_store()?;
    report_links(&store.links()?);
    Ok(())
}

/// Logs linked paths in insertion order.
fn report_links(links: &[String]) {
    if links.is_empty() {
        tracing::info!("No linked paths. Run `forge link <path>` to add one.");
        return;
    }
    for link in links {
        tracing::info!("  {}", link);
    }
    tracing::info!("Total: {} linked path(s)", links.len());
}

/// Runs the `completions` subcommand.
#[allow(clippy::unnecessary_wraps)]
fn run_completions(args: &CompletionsArgs) -> Result<()> {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        "forge",
        &mut std::io::stdout(),
    );
    Ok(())
}

/// Installs the global tracing subscriber.
///
/// With the `otel` feature, spans are also exported over OTLP when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
fn init_tracing() {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Path => run_config_path(),
            ConfigSubcommands::Show => run_config_show(),
            ConfigSubcommands::Get(args) => run_config_get(&args),
            ConfigSubcommands::Set(args) => run_config_set(&args),
            ConfigSubcommands::Author(args) => run_config_author(&args),
        },
        Commands::Link(args) => run_link(&args),
        Commands::Links => run_links(),
        Commands::Completions(args) => run_completions(&args),
    }
}
