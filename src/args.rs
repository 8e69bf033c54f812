//! These structs provide the CLI interface for the gofinances CLI.

use crate::error::{ErrorType, IntoResult};
use crate::model::TransactionType;
use crate::store::UserId;
use crate::Result;
use anyhow::Context;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// gofinances: A command-line ledger of incomes and expenses.
///
/// Each user's transactions are kept in a local store. The dashboard summarizes them into three
/// highlights: the sum of entries, the sum of exits, and the balance between them.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/gofinances; pass --home or set GOFINANCES_HOME to put it somewhere else.
    Init,
    /// Add a transaction for the current user.
    Insert(InsertArgs),
    /// Remove a transaction by its id. Removing an id that does not exist is not an error.
    Delete(DeleteArgs),
    /// Show the entries, exits and total highlights.
    Highlights(ViewArgs),
    /// List the current user's transactions as they are displayed.
    List(ViewArgs),
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

    /// The directory where gofinances data and configuration is held. Defaults to ~/gofinances
    #[arg(long, env = "GOFINANCES_HOME", default_value_t = default_home())]
    home: DisplayPath,

    /// The id of the user whose transactions are being worked on.
    #[arg(long, env = "GOFINANCES_USER")]
    user: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf, user: Option<String>) -> Self {
        Self {
            log_level,
            home: home.into(),
            user,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }

    /// The user given by --user or GOFINANCES_USER.
    ///
    /// # Errors
    /// - Returns a `Request` error if no user was given or the user id is blank.
    pub fn user(&self) -> Result<UserId> {
        let id = self
            .user
            .as_deref()
            .context("A user is required, pass --user or set GOFINANCES_USER")
            .pub_result(ErrorType::Request)?;
        UserId::new(id).pub_result(ErrorType::Request)
    }
}

/// Args for the `gofinances insert` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertArgs {
    /// Whether the transaction is income (positive) or an expense (negative).
    #[arg(long = "type")]
    kind: TransactionType,

    /// The magnitude of the transaction, e.g. 42.50. Always non-negative; --type gives the
    /// direction.
    #[arg(long)]
    amount: Decimal,

    /// A short description, e.g. "Salary".
    #[arg(long)]
    name: Option<String>,

    /// The category key, e.g. "food".
    #[arg(long)]
    category: Option<String>,

    /// When the transaction happened, as RFC 3339 or YYYY-MM-DD. Defaults to now.
    #[arg(long)]
    date: Option<String>,
}

impl InsertArgs {
    pub fn new(kind: TransactionType, amount: Decimal) -> Self {
        Self {
            kind,
            amount,
            name: None,
            category: None,
            date: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Args for the `gofinances delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction to remove.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the read-only `highlights` and `list` commands.
#[derive(Debug, Parser, Clone, Default)]
pub struct ViewArgs {
    /// Print the result as JSON to stdout.
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("gofinances"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or GOFINANCES_HOME instead of relying on the default \
                gofinances home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("gofinances")
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

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
