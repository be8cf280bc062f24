use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use bookkeeper::models::{DateRange, TransactionType};
use bookkeeper::ValidationError;

/// Bookkeeper - local-only income and expense ledger
#[derive(Debug, Parser)]
#[command(name = "bookkeeper", version, about)]
pub(crate) struct Cli {
    /// Config file (default: config.json in the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `summary`
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Record a new transaction
    ///
    /// Amount, type and category left out are copied from the most recent
    /// transaction with the same description.
    Add(AddArgs),
    /// Change fields of a stored transaction
    Edit(EditArgs),
    /// Delete a transaction
    Delete { id: i64 },
    /// Show one transaction
    Show { id: i64 },
    /// List transactions, most recent first
    #[command(alias = "ls")]
    List(ListArgs),
    /// List every description used so far
    Descriptions,
    /// Show the suggested categories
    Categories {
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<TransactionType>,
    },
    /// Totals, net profit and goal progress
    #[command(alias = "s")]
    Summary(RangeArgs),
    /// Income and expenses per month
    Monthly(RangeArgs),
    /// Expenses grouped by category
    Expenses(RangeArgs),
    /// Units needed to cover fixed costs
    #[command(allow_negative_numbers = true)]
    BreakEven {
        fixed_costs: f64,
        price_per_unit: f64,
        variable_cost_per_unit: f64,
    },
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    #[arg(long, short)]
    pub description: String,
    #[arg(long, short)]
    pub amount: Option<Decimal>,
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub kind: Option<TransactionType>,
    #[arg(long, short)]
    pub category: Option<String>,
    /// YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub(crate) struct EditArgs {
    pub id: i64,
    #[arg(long, short)]
    pub description: Option<String>,
    #[arg(long, short)]
    pub amount: Option<Decimal>,
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub kind: Option<TransactionType>,
    #[arg(long, short)]
    pub category: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub kind: Option<TransactionType>,
    #[arg(long, short)]
    pub category: Option<String>,
    /// Matches description or amount, case-insensitive
    #[arg(long, short)]
    pub search: Option<String>,
    #[arg(long, short)]
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Args)]
pub(crate) struct RangeArgs {
    /// First day included, YYYY-MM-DD
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,
    /// Last day included, YYYY-MM-DD
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

impl RangeArgs {
    pub fn to_range(&self) -> Result<Option<DateRange>, ValidationError> {
        match (self.from, self.to) {
            (Some(start), Some(end)) => DateRange::new(start, end).map(Some),
            _ => Ok(None),
        }
    }
}
