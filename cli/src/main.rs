//! dominsp CLI - Binary entry point.
//!
//! Every command loads the config, opens the JSON database and makes exactly
//! one [`Pipeline`] call:
//!
//! ```text
//! init       -> init_database + persist path to config
//! add WORD.. -> Pipeline::add
//! list       -> Pipeline::list_all
//! available  -> Pipeline::available
//! process    -> Pipeline::process(expander, registrar)
//! combine    -> Pipeline::combine
//! ```
//!
//! Results go to stdout, failures to stderr in red with a non-zero exit code.
//! Logs never touch the terminal; they go to `<config dir>/logs/dominsp.log`.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use crossterm::{style::Stylize, tty::IsTty};
use std::{
    fs::{self, OpenOptions},
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dominsp_config::{DominspConfig, LexiconProvider};
use dominsp_core::dominsp_types::{Record, Status};
use dominsp_core::{LexicalExpander, NameRegistrar, Pipeline, ProcessReport};
use dominsp_providers::{
    DATAMUSE_API_URL, DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT_SECS, DatamuseExpander,
    RdapRegistrar, ThesaurusExpander, VERISIGN_COM_RDAP_URL, http_client,
};
use dominsp_store::{JsonRecordStore, init_database};

const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "dominsp.log";

#[derive(Debug, Parser)]
#[command(
    name = "dominsp",
    version,
    about = "Expand seed words into synonyms and compounds, then find which .com names are free"
)]
struct Cli {
    /// Config file (default: ~/.dominsp/config.toml)
    #[arg(long, global = true, env = "DOMINSP_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty database and remember its location in the config
    Init {
        /// Where to create the database; asked interactively when omitted
        /// on a terminal (default: ~/.dominsp.json)
        #[arg(long, value_name = "PATH")]
        db_path: Option<PathBuf>,
    },
    /// Queue a seed word; several arguments form one multi-word entry
    Add {
        #[arg(required = true, value_name = "WORD")]
        words: Vec<String>,
    },
    /// Show every record
    List,
    /// Show the domains found to be unregistered
    Available,
    /// Expand new words and check the domains of everything staged
    Process,
    /// Stage two-word compounds of every non-compound word
    Combine,
}

fn init_tracing(config_path: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file(config_path);

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than mix logs into command output.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file(config_path: Option<&Path>) -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates(config_path) {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates(config_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: next to the config, ~/.dominsp/logs/dominsp.log by default
    if let Some(config_dir) = config_path.and_then(Path::parent)
        && !config_dir.as_os_str().is_empty()
    {
        candidates.push(config_dir.join(LOG_DIR).join(LOG_FILE));
    }

    // Fallback: ./.dominsp/logs/dominsp.log
    candidates.push(PathBuf::from(".dominsp").join(LOG_DIR).join(LOG_FILE));

    candidates
}

fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(dominsp_config::config_path)
}

fn database_path(config: &DominspConfig) -> Result<PathBuf> {
    config
        .database_path()
        .or_else(dominsp_config::default_database_path)
        .ok_or_else(|| {
            anyhow!("cannot locate the database: no home directory and no [general] database set")
        })
}

fn configured_tld(config: &DominspConfig) -> String {
    config
        .registrar
        .as_ref()
        .and_then(|registrar| registrar.tld.as_deref())
        .map(|tld| tld.trim().trim_start_matches('.').to_lowercase())
        .filter(|tld| !tld.is_empty())
        .unwrap_or_else(|| dominsp_core::DEFAULT_TLD.to_string())
}

fn build_expander(config: &DominspConfig) -> Result<Box<dyn LexicalExpander>> {
    let lexicon = config.lexicon.as_ref();

    match config.lexicon_provider() {
        LexiconProvider::Thesaurus => {
            let path = config
                .thesaurus_path()
                .ok_or_else(|| anyhow!("no thesaurus path configured"))?;
            let thesaurus = ThesaurusExpander::open(&path)?;
            Ok(Box::new(thesaurus))
        }
        LexiconProvider::Datamuse => {
            let timeout = lexicon
                .and_then(|lexicon| lexicon.timeout_seconds)
                .unwrap_or(DEFAULT_TIMEOUT_SECS);
            let url = lexicon
                .and_then(|lexicon| lexicon.datamuse_url.as_deref())
                .unwrap_or(DATAMUSE_API_URL);
            let max_results = lexicon
                .and_then(|lexicon| lexicon.max_results)
                .unwrap_or(DEFAULT_MAX_RESULTS);

            let client = http_client(timeout).context("failed to build HTTP client")?;
            let expander = DatamuseExpander::new(client, url)?.with_max_results(max_results);
            Ok(Box::new(expander))
        }
    }
}

fn build_registrar(config: &DominspConfig, tld: &str) -> Result<Box<dyn NameRegistrar>> {
    let registrar = config.registrar.as_ref();
    let timeout = registrar
        .and_then(|registrar| registrar.timeout_seconds)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let url = match registrar.and_then(|registrar| registrar.rdap_url.as_deref()) {
        Some(url) => url,
        None => {
            if tld != dominsp_core::DEFAULT_TLD {
                tracing::warn!(tld, "No rdap_url configured; using the .com registry");
            }
            VERISIGN_COM_RDAP_URL
        }
    };

    let client = http_client(timeout).context("failed to build HTTP client")?;
    Ok(Box::new(RdapRegistrar::new(client, url)?))
}

fn status_label(status: Status) -> String {
    let label = format!("{:<9}", status.as_str());
    match status {
        Status::New => label.blue().to_string(),
        Status::Expanded => label.yellow().to_string(),
        Status::Taken => label.dark_grey().to_string(),
        Status::Available => label.green().to_string(),
    }
}

fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("{}", "No words recorded yet".dark_grey());
        return;
    }
    for record in records {
        let origin = if record.combined() { " (compound)" } else { "" };
        println!("{} {}{}", status_label(record.status()), record.word(), origin);
    }
}

fn print_process_report(report: &ProcessReport, tld: &str) {
    println!(
        "Expanded {} word(s), discovered {}, checked {}",
        report.stage.expanded,
        report.stage.discovered.len(),
        report.resolve.checked()
    );
    for word in &report.resolve.available {
        println!("{}", word.domain(tld).green());
    }
}

/// Ask for the database location, falling back to `default` on an empty answer.
fn read_database_location(
    input: &mut impl BufRead,
    output: &mut impl Write,
    default: &Path,
) -> Result<PathBuf> {
    write!(output, "Database location? [{}] ", default.display())?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("failed to read the database location")?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(default.to_path_buf());
    }
    Ok(dominsp_config::expand_path(answer))
}

fn init(
    config_path: Option<&Path>,
    config: &DominspConfig,
    db_path: Option<PathBuf>,
) -> Result<()> {
    let config_path =
        config_path.ok_or_else(|| anyhow!("cannot locate the config file: no home directory"))?;

    let database = match db_path {
        Some(path) => path,
        None if io::stdin().is_tty() => {
            let default = database_path(config)?;
            read_database_location(&mut io::stdin().lock(), &mut io::stdout(), &default)?
        }
        None => database_path(config)?,
    };

    if database.exists() {
        println!("Using existing database at {}", database.display());
    } else {
        init_database(&database)
            .with_context(|| format!("failed to create database at {}", database.display()))?;
        println!("{} {}", "Created database at".green(), database.display());
    }

    DominspConfig::persist_database(config_path, &database)?;
    Ok(())
}

/// Config and database locations for every command but `init`, which creates them.
fn require_initialized(config_path: Option<&Path>, config: &DominspConfig) -> Result<PathBuf> {
    let config_path = config_path
        .filter(|path| path.exists())
        .ok_or_else(|| anyhow!("Config file not found. Please run \"dominsp init\""))?;

    let database = database_path(config)?;
    if !database.exists() {
        return Err(anyhow!(
            "Database not found at {}. Please run \"dominsp init\"",
            database.display()
        ));
    }

    tracing::debug!(
        config = %config_path.display(),
        database = %database.display(),
        "Using database"
    );
    Ok(database)
}

async fn run(cli: Cli, config_path: Option<PathBuf>) -> Result<()> {
    let config = match &config_path {
        Some(path) => DominspConfig::load_from(path)?.unwrap_or_default(),
        None => DominspConfig::default(),
    };

    let tld = configured_tld(&config);
    let open_pipeline = || -> Result<Pipeline<JsonRecordStore>> {
        let database = require_initialized(config_path.as_deref(), &config)?;
        Ok(Pipeline::new(JsonRecordStore::new(database)).with_tld(&tld))
    };

    match cli.command {
        Command::Init { db_path } => init(config_path.as_deref(), &config, db_path)?,
        Command::Add { words } => {
            let record = open_pipeline()?
                .add(words.as_slice())
                .context("failed to add word")?;
            println!("{} {}", "Added".green(), record.word());
        }
        Command::List => {
            let records = open_pipeline()?.list_all().context("failed to list words")?;
            print_records(&records);
        }
        Command::Available => {
            let records = open_pipeline()?
                .available()
                .context("failed to list available words")?;
            for record in &records {
                println!("{}", record.word().domain(&tld));
            }
        }
        Command::Process => {
            let pipeline = open_pipeline()?;
            let expander = build_expander(&config)?;
            let registrar = build_registrar(&config, &tld)?;
            let report = pipeline
                .process(expander.as_ref(), registrar.as_ref())
                .await
                .context("expansion pass failed")?;
            print_process_report(&report, &tld);
        }
        Command::Combine => {
            let report = open_pipeline()?.combine().context("composition pass failed")?;
            println!("Staged {} compound(s)", report.created.len());
        }
    }

    Ok(())
}

/// `{err:#}` without repeating causes that an outer message already embeds.
fn error_chain(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.contains(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.clone());
    init_tracing(config_path.as_deref());

    match run(cli, config_path).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = error_chain(&err);
            tracing::error!("{message}");
            eprintln!("{} {message}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
