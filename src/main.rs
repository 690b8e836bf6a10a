use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use osvhub::{
    audits::fetch_audits,
    config::Config,
    feed::{build_client, refresh, HubFeed, PublicFeed},
    model::SeverityTier,
    output::{format_view_to_string, print_audits, print_disclosure_detail, print_view, OutputFormat},
    view::{DisclosureView, SortKey, ViewState},
};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "osvhub")]
#[command(
    author,
    version,
    about = "Aggregate and browse vulnerability disclosures from OSV security-hub feeds"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List vulnerability disclosures
    Vulns {
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Sort column (severity, id, title, system, published, modified)
        #[arg(short, long, default_value = "severity")]
        sort: String,

        /// Reverse the sort order
        #[arg(long)]
        reverse: bool,

        /// Only keep disclosures matching this text
        #[arg(long)]
        filter: Option<String>,

        /// Only show disclosures in this severity tier
        #[arg(long, value_enum)]
        severity: Option<SeverityLevel>,

        /// Write output to file
        #[arg(short, long)]
        output: Option<String>,

        /// Hub server base URL (overrides the configured server_url)
        #[arg(long)]
        server: Option<String>,

        /// Skip the authenticated feed even when a server is configured
        #[arg(long)]
        public_only: bool,
    },

    /// Show one disclosure in full
    Show {
        /// Disclosure id, as listed by `vulns`
        id: String,

        /// Hub server base URL (overrides the configured server_url)
        #[arg(long)]
        server: Option<String>,

        /// Skip the authenticated feed even when a server is configured
        #[arg(long)]
        public_only: bool,
    },

    /// List published audit reports
    Audits {
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Start a hub login and print the sign-in URL
    Login {
        /// Hub server base URL (overrides the configured server_url)
        #[arg(long)]
        server: Option<String>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SeverityLevel {
    Critical,
    High,
    Medium,
    Low,
    Neutral,
}

impl SeverityLevel {
    fn tier(self) -> SeverityTier {
        match self {
            SeverityLevel::Critical => SeverityTier::Critical,
            SeverityLevel::High => SeverityTier::High,
            SeverityLevel::Medium => SeverityTier::Medium,
            SeverityLevel::Low => SeverityTier::Low,
            SeverityLevel::Neutral => SeverityTier::Neutral,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    osvhub::logging::init_tracing("warn");

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

async fn run() -> Result<u8> {
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();

    match cli.command {
        Commands::Vulns {
            format,
            sort,
            reverse,
            filter,
            severity,
            output,
            server,
            public_only,
        } => {
            let hub_server = resolve_hub_server(&config, server, public_only);
            let options = VulnsOptions {
                format: format.unwrap_or(config.default_format.clone()),
                sort,
                reverse,
                filter,
                severity,
                output,
            };
            run_vulns(config, options, hub_server).await
        }
        Commands::Show {
            id,
            server,
            public_only,
        } => {
            let hub_server = resolve_hub_server(&config, server, public_only);
            run_show(config, id, hub_server).await
        }
        Commands::Audits { format } => {
            let format_str = format.unwrap_or(config.default_format.clone());
            run_audits(config, format_str).await
        }
        Commands::Login { server } => run_login(config, server).await,
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

/// Picks the hub server for this invocation: the `--server` flag wins
/// over the configured URL, and `--public-only` disables the hub fetch
/// entirely.
fn resolve_hub_server(config: &Config, server: Option<String>, public_only: bool) -> Option<String> {
    if public_only {
        return None;
    }
    server.or_else(|| config.server_url.clone())
}

/// Listing flags for `vulns`, with the format already resolved against
/// the loaded config.
struct VulnsOptions {
    format: String,
    sort: String,
    reverse: bool,
    filter: Option<String>,
    severity: Option<SeverityLevel>,
    output: Option<String>,
}

async fn run_vulns(config: Config, options: VulnsOptions, hub_server: Option<String>) -> Result<u8> {
    let format = OutputFormat::from_str(&options.format).map_err(|e| anyhow::anyhow!(e))?;
    let sort_key = SortKey::from_str(&options.sort).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table && options.output.is_none();

    let mut view = DisclosureView::new();
    let progress = if is_interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Fetching disclosures...");
        Some(pb)
    } else {
        None
    };

    fetch_into_view(&mut view, &config, hub_server).await?;

    if let Some(pb) = progress {
        if view.state() == ViewState::Error {
            pb.finish_and_clear();
        } else {
            pb.finish_with_message(format!("Fetched {} disclosures", view.len()));
        }
    }

    if view.state() == ViewState::Error {
        anyhow::bail!("could not fetch the disclosure feed");
    }

    if let Some(level) = options.severity {
        view.filter_by_tier(level.tier());
    }
    if let Some(needle) = &options.filter {
        view.apply_filter(needle);
    }
    view.sort_by(sort_key, options.reverse);

    if let Some(path) = &options.output {
        let rendered = format_view_to_string(&view, format)?;
        std::fs::write(path, rendered)?;
        println!("Results written to: {}", path);
    } else {
        print_view(&view, format)?;
    }

    Ok(exit_codes::SUCCESS)
}

async fn run_show(config: Config, id: String, hub_server: Option<String>) -> Result<u8> {
    let mut view = DisclosureView::new();
    fetch_into_view(&mut view, &config, hub_server).await?;

    if view.state() == ViewState::Error {
        anyhow::bail!("could not fetch the disclosure feed");
    }

    match view.rows().iter().find(|row| row.id == id) {
        Some(row) => {
            print_disclosure_detail(row)?;
            Ok(exit_codes::SUCCESS)
        }
        None => anyhow::bail!("no disclosure found with id: {}", id),
    }
}

/// Runs one fetch cycle against the configured sources.
async fn fetch_into_view(
    view: &mut DisclosureView,
    config: &Config,
    hub_server: Option<String>,
) -> Result<()> {
    let client = build_client(config.timeout_seconds)?;
    let public = PublicFeed::new(client.clone(), config.feed_url.clone());
    let hub = hub_server.map(|url| HubFeed::new(client, url, config.session_token.clone()));

    refresh(view, &public, hub.as_ref()).await;
    Ok(())
}

async fn run_audits(config: Config, format: String) -> Result<u8> {
    let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table;

    let progress = if is_interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Fetching audit reports...");
        Some(pb)
    } else {
        None
    };

    let client = build_client(config.timeout_seconds)?;
    let result = fetch_audits(&client, &config.audits_url).await;

    if let Some(pb) = progress {
        match &result {
            Ok(entries) => pb.finish_with_message(format!("Fetched {} audit reports", entries.len())),
            Err(_) => pb.finish_and_clear(),
        }
    }

    // A failed fetch degrades to the empty listing rather than aborting
    let entries = match result {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "audit report fetch failed");
            Vec::new()
        }
    };
    print_audits(&entries, format)?;

    Ok(exit_codes::SUCCESS)
}

async fn run_login(config: Config, server: Option<String>) -> Result<u8> {
    let server_url = match server.or_else(|| config.server_url.clone()) {
        Some(url) => url,
        None => anyhow::bail!(
            "no hub server configured. Pass --server or set server_url in the config file"
        ),
    };

    let client = build_client(config.timeout_seconds)?;
    let hub = HubFeed::new(client, server_url, None);
    let redirect = hub.login().await?;

    println!("Open this URL in your browser to sign in:");
    println!();
    println!("  {}", redirect);
    println!();
    println!(
        "After signing in, store the issued token as session_token in: {}",
        Config::config_path().display()
    );

    Ok(exit_codes::SUCCESS)
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'osvhub config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
