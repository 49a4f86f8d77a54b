//! These structs provide the CLI interface for the rewards CLI.

use crate::directory::StoreKind;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// rewards: compute customer loyalty reward points from purchase transactions.
///
/// A purchase earns 1 point for every whole currency unit spent above 50, plus another point for
/// every unit above 100. So a $120 purchase earns 2x$20 + 1x$50 = 90 points.
///
/// Customers and their purchases come either from a built-in sample data set or from a SQLite
/// database that you fill with the import subcommand. The serve subcommand exposes the reward
/// summaries over HTTP.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and its configuration file.
    ///
    /// With --store memory (the default) the service answers from a small built-in set of sample
    /// customers. With --store sqlite an empty database is created as well; fill it with
    /// 'rewards import'.
    Init(InitArgs),
    /// Load customers and purchases from CSV files into the SQLite store.
    ///
    /// The customers file has the columns id,name,phone,city. The transactions file has the
    /// columns customer_id,date,amount with dates written as yyyy-MM-dd.
    Import(ImportArgs),
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Print reward summaries as JSON.
    Summary(SummaryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where rewards data and configuration is held. Defaults to ~/rewards
    #[arg(long, env = "REWARDS_HOME", default_value_t = default_rewards_home())]
    rewards_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn rewards_home(&self) -> &DisplayPath {
        &self.rewards_home
    }
}

/// Args for the `rewards init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where customers and their purchases are kept: "memory" or "sqlite".
    #[arg(long, default_value_t = StoreKind::Memory)]
    store: StoreKind,

    /// The address the HTTP service listens on, e.g. 127.0.0.1:8080
    #[arg(long)]
    bind: Option<String>,
}

impl InitArgs {
    pub fn new(store: StoreKind, bind: Option<String>) -> Self {
        Self { store, bind }
    }

    pub fn store(&self) -> StoreKind {
        self.store
    }

    pub fn bind(&self) -> Option<&str> {
        self.bind.as_deref()
    }
}

/// Args for the `rewards import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// CSV file with the columns id,name,phone,city
    #[arg(long)]
    customers: PathBuf,

    /// CSV file with the columns customer_id,date,amount
    #[arg(long)]
    transactions: PathBuf,
}

impl ImportArgs {
    pub fn new(customers: impl Into<PathBuf>, transactions: impl Into<PathBuf>) -> Self {
        Self {
            customers: customers.into(),
            transactions: transactions.into(),
        }
    }

    pub fn customers(&self) -> &Path {
        &self.customers
    }

    pub fn transactions(&self) -> &Path {
        &self.transactions
    }
}

/// Args for the `rewards serve` command.
#[derive(Debug, Parser, Clone)]
pub struct ServeArgs {
    /// Overrides the bind_address from the config file.
    #[arg(long)]
    bind: Option<String>,
}

impl ServeArgs {
    pub fn new(bind: Option<String>) -> Self {
        Self { bind }
    }

    pub fn bind(&self) -> Option<&str> {
        self.bind.as_deref()
    }
}

/// Args for the `rewards summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The customer to summarize. When omitted, every customer is summarized.
    #[arg(long)]
    customer_id: Option<i64>,

    /// First day of the window, yyyy-MM-dd. Without --start or --end the window is the configured
    /// calendar year. Otherwise defaults to the configured trailing months before the end.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the window, yyyy-MM-dd. Defaults to today when --start is given.
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl SummaryArgs {
    pub fn new(customer_id: Option<i64>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            customer_id,
            start,
            end,
        }
    }

    pub fn customer_id(&self) -> Option<i64> {
        self.customer_id
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }
}

fn default_rewards_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("rewards"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --rewards-home or REWARDS_HOME instead of relying on the \
                default rewards home directory.",
            );
            PathBuf::from("rewards")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
