use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "repograde",
    version,
    about = "Heuristic quality grading for batches of source repositories"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Explicit config file, merged over the global and working-directory ones
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Grade every repository in an address list
    Grade(GradeCommand),
    /// Validate the configuration and print every module's maximum score
    Weights,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Github,
    Local,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct GradeCommand {
    /// File with one `owner/name` address per line
    pub list: PathBuf,

    #[arg(short, long, default_value = "results")]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value = "github")]
    pub source: SourceKind,

    #[arg(long, env = "GITHUB_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", default_value = crate::provider::github::DEFAULT_API_URL)]
    pub api_url: String,

    /// Directory holding `<owner>/<name>` checkouts for the local source
    #[arg(long, required_if_eq("source", "local"))]
    pub checkouts: Option<PathBuf>,

    #[arg(long, requires = "checkstyle_config")]
    pub checkstyle_jar: Option<PathBuf>,

    #[arg(long, requires = "checkstyle_jar")]
    pub checkstyle_config: Option<PathBuf>,

    /// Java executable used to run Checkstyle
    #[arg(long)]
    pub java: Option<PathBuf>,

    /// Gradle executable; Gradle builds are left unverified without it
    #[arg(long)]
    pub gradle: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Remove previous results (except .gitkeep) before writing
    #[arg(long)]
    pub clean: bool,
}
