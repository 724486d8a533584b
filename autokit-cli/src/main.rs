//! `AutoKit` CLI - Command-line interface for the `AutoKit` toolkit
//!
//! Provides commands for bootstrapping dependencies, managing stored
//! credentials, querying databases, exporting query results to spreadsheets
//! and driving a browser.

use std::fmt::Write as _;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;

use autokit_core::bootstrap::{ensure_installed, CommandInstaller};
use autokit_core::browser::{BrowserSession, Locator};
use autokit_core::config::{AppSettings, ConfigManager};
use autokit_core::error::{BootstrapError, BrowserError};
use autokit_core::export::{export_to_spreadsheet, fetch_tagged, format_sql, Table};
use autokit_core::secret::{open_store, CredentialStore};
use clap::{Parser, Subcommand, ValueEnum};
use secrecy::ExposeSecret;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// `AutoKit` command-line interface
#[derive(Parser)]
#[command(name = "autokit")]
#[command(author, version, about = "AutoKit automation toolkit")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Defaults to `init`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Install missing dependencies, then open the credential store
    #[command(about = "Bootstrap dependencies and create the credential store")]
    Init,

    /// Install missing dependencies
    #[command(about = "Install any missing dependencies")]
    Bootstrap {
        /// Package to check; repeat for several (defaults to the configured list)
        #[arg(short, long = "package")]
        packages: Vec<String>,
    },

    /// Credential store commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Run a query and print the result
    #[command(about = "Run a query against a database backend")]
    Query {
        /// Backend tag (SSMS, Oracle, DP3)
        #[arg(short, long)]
        backend: String,

        /// SQL query
        #[arg(short, long)]
        sql: String,

        /// Output format
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Run queries and write each result to its own sheet
    #[command(about = "Export query results to an .xlsx workbook")]
    Export {
        /// Backend tag (SSMS, Oracle, DP3)
        #[arg(short, long)]
        backend: String,

        /// SQL query; repeat for more sheets
        #[arg(short, long = "sql", required = true)]
        sql: Vec<String>,

        /// Output workbook path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Open a page in the configured browser
    #[command(about = "Open a URL and optionally read an element's text")]
    Browse {
        /// Page to open
        url: String,

        /// Element to read, as strategy=value (e.g. name=q)
        #[arg(short, long)]
        locator: Option<String>,

        /// Element wait in seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },
}

/// Credential store subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add or overwrite an account
    Add {
        /// Account name
        name: String,

        /// Secret; read from stdin when omitted
        #[arg(short, long)]
        secret: Option<String>,
    },

    /// Print an account's secret
    Show {
        /// Account name
        name: String,
    },

    /// Replace an existing account's secret
    Update {
        /// Account name
        name: String,

        /// Secret; read from stdin when omitted
        #[arg(short, long)]
        secret: Option<String>,
    },

    /// Delete an account
    Remove {
        /// Account name
        name: String,
    },

    /// List account names
    List,
}

/// Output format for query results
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    Table,
    /// Output as JSON
    Json,
    /// Output as CSV
    Csv,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

/// Loaded configuration shared by command handlers
struct Context {
    manager: ConfigManager,
    settings: AppSettings,
}

fn run(cli: Cli) -> Result<(), CliError> {
    let manager = match cli.config {
        Some(dir) => ConfigManager::with_config_dir(dir),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}")))?,
    };
    let settings = manager.load_settings();
    init_logging(
        settings
            .as_ref()
            .map_or("info", |s| s.logging.filter.as_str()),
    );
    let settings =
        settings.map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))?;
    let ctx = Context { manager, settings };

    match cli.command.unwrap_or(Commands::Init) {
        Commands::Init => cmd_init(&ctx),
        Commands::Bootstrap { packages } => cmd_bootstrap(&ctx, &packages),
        Commands::Account(subcmd) => cmd_account(&ctx, subcmd),
        Commands::Query {
            backend,
            sql,
            format,
        } => cmd_query(&ctx, &backend, &sql, format),
        Commands::Export {
            backend,
            sql,
            output,
        } => cmd_export(&ctx, &backend, &sql, &output),
        Commands::Browse {
            url,
            locator,
            timeout,
        } => cmd_browse(&ctx, &url, locator.as_deref(), timeout),
    }
}

/// `RUST_LOG` wins over the configured filter
fn init_logging(filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::Config(format!("Failed to create async runtime: {e}")))
}

// ========== Init / bootstrap ==========

fn cmd_init(ctx: &Context) -> Result<(), CliError> {
    cmd_bootstrap(ctx, &[])?;
    let store = open_configured_store(ctx)?;
    println!("Credential store ready at {}", store.path().display());
    Ok(())
}

fn cmd_bootstrap(ctx: &Context, packages: &[String]) -> Result<(), CliError> {
    let bootstrap = &ctx.settings.bootstrap;
    let installer = CommandInstaller::new(
        bootstrap.check_command.clone(),
        bootstrap.install_command.clone(),
    )
    .map_err(|e| CliError::Config(e.to_string()))?;

    let packages = if packages.is_empty() {
        bootstrap.packages.as_slice()
    } else {
        packages
    };

    let report = ensure_installed(&installer, packages).map_err(|e| match e {
        BootstrapError::InstallFailed { .. } => CliError::Install(e.to_string()),
        BootstrapError::InvalidCommand(_) => CliError::Config(e.to_string()),
    })?;

    if report.is_noop() {
        println!("All {} packages already installed", report.already_installed.len());
    } else {
        println!("Installed: {}", report.installed.join(", "));
    }
    Ok(())
}

// ========== Accounts ==========

fn open_configured_store(ctx: &Context) -> Result<CredentialStore, CliError> {
    open_store(&ctx.manager, &ctx.settings).map_err(|e| CliError::Store(e.to_string()))
}

fn cmd_account(ctx: &Context, subcmd: AccountCommands) -> Result<(), CliError> {
    let store = open_configured_store(ctx)?;
    let store_error = |e: autokit_core::error::SecretError| CliError::Store(e.to_string());

    match subcmd {
        AccountCommands::Add { name, secret } => {
            let secret = secret_from_arg_or_stdin(secret)?;
            store.add(&name, &secret).map_err(store_error)?;
            println!("Added account '{name}'");
        }
        AccountCommands::Show { name } => {
            let secret = store
                .read(&name)
                .map_err(store_error)?
                .ok_or_else(|| CliError::AccountNotFound(name.clone()))?;
            println!("{}", secret.expose_secret());
        }
        AccountCommands::Update { name, secret } => {
            let secret = secret_from_arg_or_stdin(secret)?;
            if !store.update(&name, &secret).map_err(store_error)? {
                return Err(CliError::AccountNotFound(name));
            }
            println!("Updated account '{name}'");
        }
        AccountCommands::Remove { name } => {
            if !store.remove(&name).map_err(store_error)? {
                return Err(CliError::AccountNotFound(name));
            }
            println!("Removed account '{name}'");
        }
        AccountCommands::List => {
            for name in store.list().map_err(store_error)? {
                println!("{name}");
            }
        }
    }
    Ok(())
}

/// Reads the first line of stdin when no secret was given on the command line
fn secret_from_arg_or_stdin(secret: Option<String>) -> Result<String, CliError> {
    if let Some(secret) = secret {
        return Ok(secret);
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

// ========== Query / export ==========

fn cmd_query(
    ctx: &Context,
    backend: &str,
    sql: &str,
    format: OutputFormat,
) -> Result<(), CliError> {
    debug!("Query:\n{}", format_sql(sql));
    let table = runtime()?
        .block_on(fetch_tagged(sql, backend, &ctx.settings.database))
        .map_err(|e| CliError::Export(e.to_string()))?;

    match format {
        OutputFormat::Table => println!("{}", format_table(&table)),
        OutputFormat::Json => println!("{}", format_json(&table)?),
        OutputFormat::Csv => println!("{}", format_csv(&table)),
    }
    Ok(())
}

fn cmd_export(
    ctx: &Context,
    backend: &str,
    queries: &[String],
    output: &Path,
) -> Result<(), CliError> {
    let runtime = runtime()?;
    let mut tables = Vec::with_capacity(queries.len());
    for sql in queries {
        debug!("Query:\n{}", format_sql(sql));
        let table = runtime
            .block_on(fetch_tagged(sql, backend, &ctx.settings.database))
            .map_err(|e| CliError::Export(e.to_string()))?;
        tables.push(table);
    }

    let path = ConfigManager::output_path(&ctx.settings, output);
    export_to_spreadsheet(&tables, &path).map_err(|e| CliError::Export(e.to_string()))?;
    println!("Wrote {} sheet(s) to {}", tables.len(), path.display());
    Ok(())
}

/// Format a table as aligned text columns
#[must_use]
pub fn format_table(table: &Table) -> String {
    if table.columns.is_empty() {
        return "No rows returned.".to_string();
    }

    let cells: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .filter_map(|row| row.get(i).map(String::len))
                .chain(std::iter::once(name.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, width)| format!("{:<width$}", name.to_uppercase()))
        .collect();
    let _ = writeln!(output, "{}", header.join("  "));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(output, "{}", rule.join("  "));
    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        let _ = writeln!(output, "{}", line.join("  "));
    }

    output.trim_end().to_string()
}

/// Format a table as a JSON array of row objects
///
/// # Errors
///
/// Returns `CliError::Export` if JSON serialization fails.
pub fn format_json(table: &Table) -> Result<String, CliError> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .columns
                .iter()
                .cloned()
                .zip(row.iter().map(|cell| serde_json::to_value(cell).unwrap_or_default()))
                .collect()
        })
        .collect();
    serde_json::to_string_pretty(&rows)
        .map_err(|e| CliError::Export(format!("Failed to serialize to JSON: {e}")))
}

/// Format a table as CSV with a header line
#[must_use]
pub fn format_csv(table: &Table) -> String {
    let mut output = String::new();
    let header: Vec<String> = table.columns.iter().map(|c| escape_csv_field(c)).collect();
    let _ = writeln!(output, "{}", header.join(","));
    for row in &table.rows {
        let line: Vec<String> = row
            .iter()
            .map(|cell| escape_csv_field(&cell.to_string()))
            .collect();
        let _ = writeln!(output, "{}", line.join(","));
    }
    output.trim_end().to_string()
}

/// Escape a CSV field if it contains special characters
fn escape_csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ========== Browser ==========

fn cmd_browse(
    ctx: &Context,
    url: &str,
    locator: Option<&str>,
    timeout: Option<u64>,
) -> Result<(), CliError> {
    let locator: Option<Locator> = locator
        .map(str::parse)
        .transpose()
        .map_err(|e: BrowserError| CliError::Browser(e.to_string()))?;
    let timeout = timeout.map(Duration::from_secs);

    runtime()?
        .block_on(async {
            let mut session = BrowserSession::new(ctx.settings.browser.clone());
            session.open().await?;
            let result = browse(&session, url, locator.as_ref(), timeout).await;
            session.close().await;
            result
        })
        .map_err(|e| CliError::Browser(e.to_string()))
}

async fn browse(
    session: &BrowserSession,
    url: &str,
    locator: Option<&Locator>,
    timeout: Option<Duration>,
) -> Result<(), BrowserError> {
    session.navigate(url).await?;
    println!("{}", session.title().await?);
    if let Some(locator) = locator {
        println!("{}", session.read_text(locator, timeout).await?);
    }
    Ok(())
}

/// Exit codes for CLI operations
pub mod exit_codes {
    /// Success - operation completed successfully
    pub const SUCCESS: i32 = 0;
    /// General error - configuration, store, export, browser or IO errors
    pub const GENERAL_ERROR: i32 = 1;
    /// The named account does not exist in the credential store
    pub const ACCOUNT_NOT_FOUND: i32 = 2;
    /// A dependency could not be installed
    pub const INSTALL_FAILURE: i32 = 3;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Account missing from the credential store
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Dependency installation failed
    #[error("Installation failed: {0}")]
    Install(String),

    /// Credential store error
    #[error("Credential store error: {0}")]
    Store(String),

    /// Query or spreadsheet error
    #[error("Export error: {0}")]
    Export(String),

    /// Browser automation error
    #[error("Browser error: {0}")]
    Browser(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::AccountNotFound(_) => exit_codes::ACCOUNT_NOT_FOUND,
            Self::Install(_) => exit_codes::INSTALL_FAILURE,
            Self::Config(_)
            | Self::Store(_)
            | Self::Export(_)
            | Self::Browser(_)
            | Self::Io(_) => exit_codes::GENERAL_ERROR,
        }
    }
}
