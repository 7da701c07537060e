use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::filter::LevelFilter;

use tally_core::VERSION;

/// Tally - a local, single-file personal expense tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the expense database
    #[arg(long, global = true, env = "TALLY_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log verbosity for diagnostics on stderr (ignored when RUST_LOG is set)
    #[arg(long, global = true, env = "TALLY_LOG", default_value_t = LevelFilter::WARN)]
    pub log_level: LevelFilter,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols instead of unicode
    #[arg(long, global = true)]
    pub ascii: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the database will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Seed a few example expenses into an empty database
    #[arg(long)]
    pub sample: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Amount spent (e.g. 12.50)
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: String,

    /// Category label (e.g. Food)
    #[arg(short, long)]
    pub category: String,

    /// Date of the expense (YYYY-MM-DD, default today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Free-form note
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Expense ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New amount
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// New category
    #[arg(short, long)]
    pub category: Option<String>,

    /// New date (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,

    /// New note (use "" to clear)
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Expense ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Filter flags shared by `list` and `export`
#[derive(Args, Default)]
pub struct FilterArgs {
    /// Only this category (exact match)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Case-insensitive text search over note and category
    #[arg(short, long)]
    pub search: Option<String>,

    /// Start date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// End date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Restrict to one calendar month (YYYY-MM)
    #[arg(long, conflicts_with_all = ["since", "until"])]
    pub month: Option<String>,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Expense ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `report` command
#[derive(Args)]
pub struct ReportArgs {
    /// Month to summarize (YYYY-MM, default current month)
    #[arg(value_name = "MONTH")]
    pub month: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Output file (default: stdout)
    #[arg(value_name = "PATH", conflicts_with = "out_dir")]
    pub path: Option<String>,

    /// Write a timestamped export file into this directory
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<String>,

    /// Export format (csv, manual-csv, jsonl)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

/// Arguments for the `categories` command
#[derive(Args)]
pub struct CategoriesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the expense database and write config
    Init(InitArgs),

    /// Record a new expense
    Add(AddArgs),

    /// Change fields of an existing expense
    Edit(EditArgs),

    /// Delete an expense
    Delete(DeleteArgs),

    /// List expenses, newest first
    List(ListArgs),

    /// Show a single expense
    Show(ShowArgs),

    /// Per-category totals for one month
    Report(ReportArgs),

    /// Export expenses as CSV or JSON lines
    Export(ExportArgs),

    /// List suggested and used categories
    Categories(CategoriesArgs),

    /// Check database integrity
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
