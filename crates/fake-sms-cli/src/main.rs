//! fake-sms entry point.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use fake_sms::{Fetcher, RecordStore};
use fake_sms_cli::config::{resolve_export_dir, resolve_fetch_config, resolve_store_dir};
use fake_sms_cli::{commands, LinePrompt, Session};

#[derive(Parser)]
#[command(
    name = "fake-sms",
    about = "Disposable phone numbers and their SMS from your terminal",
    version,
    after_help = "Run 'fake-sms' with no command to open the interactive menu."
)]
struct Cli {
    /// Directory holding db.json (default: $FAKE_SMS_DB_DIR or ~/.fake-sms).
    #[arg(long, global = true)]
    db_dir: Option<String>,

    /// Listing page URL (default: $FAKE_SMS_BASE_URL or https://receive-smss.com/).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds (default: $FAKE_SMS_TIMEOUT_MS or 15000).
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Output results as JSON (machine-readable).
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive menu (default).
    Menu,

    /// List the numbers currently offered by the site.
    Available,

    /// List your registered numbers.
    List,

    /// Register a number that is currently offered.
    Register {
        /// Number exactly as shown by `available`, e.g. +15551234567.
        number: String,
    },

    /// Remove a registered number.
    Remove {
        /// Number exactly as printed by `list`, e.g. +15551234567.
        number: String,
    },

    /// Fetch the messages received on a number.
    Messages {
        /// Number to query, e.g. +15551234567.
        number: String,

        /// Keep only messages whose body matches this regular expression.
        #[arg(long)]
        filter: Option<String>,

        /// Do not write <number>.json to the working directory.
        #[arg(long)]
        no_export: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let open_store = || -> anyhow::Result<RecordStore> {
        let dir = resolve_store_dir(cli.db_dir.as_deref())?;
        Ok(RecordStore::open(&dir)?)
    };
    let fetcher = || -> anyhow::Result<Fetcher> {
        let config = resolve_fetch_config(cli.base_url.as_deref(), cli.timeout_ms);
        Ok(Fetcher::new(config)?)
    };

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let store = open_store()?;
            tracing::info!("Store: {}", store.path().display());
            let mut session = Session::new(
                fetcher()?,
                store,
                resolve_export_dir()?,
                LinePrompt::new()?,
            );
            session.run().await
        }
        Commands::Available => commands::available(&fetcher()?, cli.json).await,
        Commands::List => commands::list(&open_store()?, cli.json),
        Commands::Register { number } => {
            commands::register(&fetcher()?, &open_store()?, &number).await
        }
        Commands::Remove { number } => commands::remove(&open_store()?, &number),
        Commands::Messages {
            number,
            filter,
            no_export,
        } => {
            let export_dir = if no_export {
                None
            } else {
                Some(resolve_export_dir()?)
            };
            commands::messages(
                &fetcher()?,
                &number,
                filter.as_deref(),
                export_dir.as_deref(),
                cli.json,
            )
            .await
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "fake-sms", &mut std::io::stdout());
            Ok(())
        }
    }
}
