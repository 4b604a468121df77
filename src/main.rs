use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ip_conductor::config::Config;
use ip_conductor::core::{BookmarkSession, ReaderError};
use ip_conductor::store;
use ip_conductor::transport::{Command, Shell};
use ip_conductor::tui::{install_interrupt_handler, CrosstermTerminal};

#[derive(Parser)]
#[command(name = "ip-conductor")]
#[command(
    author,
    version = concat!(env!("CARGO_PKG_VERSION"), env!("IP_CONDUCTOR_VERSION_SUFFIX")),
    about = "Browse your Instapaper reading list and read articles one sentence at a time",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Reading-list provider (instapaper, sim)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Maximum number of bookmarks to fetch
    #[arg(short, long, global = true)]
    limit: Option<usize>,

    /// Line width for wrapped text
    #[arg(short, long, global = true)]
    width: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive shell (default)
    Shell,

    /// List bookmarks
    List,

    /// Print an article
    Read {
        /// Bookmark number (1-based); defaults to the first bookmark
        number: Option<i64>,
    },

    /// Read an article one sentence at a time
    Speak {
        /// Bookmark number (1-based); defaults to the first bookmark
        number: Option<i64>,
    },

    /// Save a URL to the reading list
    Add {
        /// URL to save
        url: String,
    },

    /// Show the effective configuration
    Config {
        /// Write it to the configuration file
        #[arg(long)]
        save: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "ip_conductor=debug"
    } else {
        "ip_conductor=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Variables already in the environment win over .env entries
    dotenvy::dotenv().ok();
    let mut config = Config::load()?;
    if let Some(provider) = &cli.provider {
        config.store.provider = provider.to_lowercase();
    }
    if let Some(limit) = cli.limit.filter(|n| *n > 0) {
        config.store.bookmark_limit = limit;
    }
    if let Some(width) = cli.width.filter(|n| *n > 0) {
        config.reader.line_width = width;
    }

    let command = cli.command.unwrap_or(Commands::Shell);
    if let Commands::Config { save } = command {
        return run_config(&config, save);
    }

    install_interrupt_handler()?;

    let store = store::create_store(&config.store)?;
    let session = BookmarkSession::with_limit(store, config.store.bookmark_limit);
    let mut shell = Shell::new(session, CrosstermTerminal::new(), config.reader.line_width);
    let mut stdout = std::io::stdout();

    let result = match command {
        Commands::Shell => {
            let stdin = std::io::stdin();
            shell.run(&mut stdin.lock(), &mut stdout)
        }
        Commands::List => one_shot(&mut shell, vec![Command::Bookmarks], &mut stdout),
        Commands::Read { number } => one_shot(&mut shell, vec![Command::Read(number)], &mut stdout),
        Commands::Speak { number } => {
            let mut commands = Vec::new();
            if let Some(number) = number {
                commands.push(Command::Jump(number));
            }
            commands.push(Command::Speak);
            one_shot(&mut shell, commands, &mut stdout)
        }
        Commands::Add { url } => one_shot(&mut shell, vec![Command::Add(Some(url))], &mut stdout),
        Commands::Config { .. } => Ok(()),
    };

    if let Err(err) = result {
        if matches!(err.downcast_ref::<ReaderError>(), Some(ReaderError::Interrupted)) {
            println!("\nGoodbye!");
            std::process::exit(130);
        }
        return Err(err);
    }
    Ok(())
}

fn one_shot<R, W>(
    shell: &mut Shell<R, CrosstermTerminal>,
    commands: Vec<Command>,
    out: &mut W,
) -> Result<()>
where
    R: ip_conductor::core::ReadingList,
    W: std::io::Write,
{
    shell.run_once(commands, out).map_err(anyhow::Error::from)
}

fn run_config(config: &Config, save: bool) -> Result<()> {
    let path = Config::config_path();
    match &path {
        Some(path) => println!("# {}", path.display()),
        None => println!("# no configuration directory available"),
    }
    print!(
        "{}",
        toml::to_string_pretty(config).context("Failed to serialize configuration")?
    );
    if save {
        config.save()?;
        println!("Saved configuration.");
    }
    Ok(())
}
