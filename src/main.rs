//! typesforge - command-line editor for DayZ `types.xml` files.
//!
//! Startup order:
//! 1. Parse arguments
//! 2. Load `typesforge.yaml` from `--config-dir` (defaults when missing)
//! 3. Initialize logging (rolling file in the configured log dir, console on stderr)
//! 4. Build an [`EditorSession`] from the config and run the command
//!
//! Errors are printed by anyhow and exit non-zero.

use anyhow::Result;
use clap::Parser;
use typesforge::cli::{self, Cli};
use typesforge::logging::{self, LOG_PREFIX};
use typesforge::{APP_NAME, ConfigManager, EditorSession, VERSION};

fn main() -> Result<()> {
    let args = Cli::parse();

    let config_manager = ConfigManager::new(&args.config_dir)?;
    let mut config = config_manager.load_config()?;
    if args.debug {
        config.logging.debug_mode = true;
    }

    // Guard must live until exit so buffered log lines are flushed
    let _log_guard = logging::setup_logging(&config.logging, LOG_PREFIX)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);
    tracing::debug!("Command: {:?}", args.command);

    let session = EditorSession::new(&config);
    let mut stdout = std::io::stdout().lock();
    cli::run(&args.command, &session, &mut stdout)?;

    Ok(())
}
