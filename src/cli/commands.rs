use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Keeps Uptime Kuma monitors in sync with docker compose services
#[derive(Parser, Debug)]
#[command(
    name = "kumasync",
    about = "Keeps Uptime Kuma monitors in sync with docker compose services",
    version,
    long_about = "kumasync scans a tree of docker compose files, derives public and backend \
                  URLs from Traefik and homepage labels, and creates the matching HTTP monitors \
                  in Uptime Kuma. Settings come from environment variables (KUMA_API_URL, \
                  KUMA_USERNAME, KUMA_PASSWORD, DOMAIN, COMPOSE_DIR, SYNC_INTERVAL, \
                  UPDATE_EXISTING, ONLY_INCLUDED); flags override them."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Synchronize monitors with the compose tree",
        long_about = "Discovers targets and reconciles them with Uptime Kuma, then sleeps and \
                      repeats until interrupted.\n\n\
                      Examples:\n  \
                      kumasync sync\n  \
                      kumasync sync --once --update-existing\n  \
                      kumasync sync --compose-dir /srv/compose --interval 300"
    )]
    Sync(SyncArgs),

    #[command(
        about = "Print discovered targets without contacting Uptime Kuma",
        long_about = "Runs one discovery pass and prints the monitor names and URLs that \
                      a sync would create.\n\n\
                      Examples:\n  \
                      kumasync discover\n  \
                      kumasync discover /srv/compose --domain example.com\n  \
                      kumasync discover --format json"
    )]
    Discover(DiscoverArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct SyncArgs {
    #[arg(long, help = "Run a single cycle and exit")]
    pub once: bool,

    #[arg(long, value_name = "PATH", help = "Root of the compose tree (overrides COMPOSE_DIR)")]
    pub compose_dir: Option<PathBuf>,

    #[arg(long, value_name = "DOMAIN", help = "Value for ${DOMAIN} in labels (overrides DOMAIN)")]
    pub domain: Option<String>,

    #[arg(long, value_name = "SECONDS", help = "Seconds between cycles (overrides SYNC_INTERVAL)")]
    pub interval: Option<u64>,

    #[arg(long, help = "Update monitors whose URL changed")]
    pub update_existing: bool,

    #[arg(long, help = "Scan only documents referenced by include: lists")]
    pub only_included: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DiscoverArgs {
    #[arg(value_name = "PATH", help = "Root of the compose tree (defaults to COMPOSE_DIR)")]
    pub compose_dir: Option<PathBuf>,

    #[arg(long, value_name = "DOMAIN", help = "Value for ${DOMAIN} in labels (overrides DOMAIN)")]
    pub domain: Option<String>,

    #[arg(long, help = "Scan only documents referenced by include: lists")]
    pub only_included: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
