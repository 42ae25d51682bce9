use kumasync::cli::commands::{CliArgs, Commands};
use kumasync::cli::handlers::{handle_discover, handle_sync};
use kumasync::util::{init_logging, parse_level, LoggingConfig};
use kumasync::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("kumasync v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Sync(sync_args) => handle_sync(sync_args).await,
        Commands::Discover(discover_args) => handle_discover(discover_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }
    config.use_json |= args.log_json;

    init_logging(config);
}
