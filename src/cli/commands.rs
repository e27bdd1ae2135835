use crate::model::{ProjectId, Role, WorkspaceId};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apportion")]
#[command(
    author,
    version,
    about = "Percentage-based task assignment for annotation projects"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend base URL (overrides config)
    #[arg(long, global = true, env = "APPORTION_API_URL")]
    pub api_url: Option<String>,

    /// Bearer token sent to the backend
    #[arg(long, global = true, env = "APPORTION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a .apportion.toml in the current directory
    Init {
        /// Backend base URL to store in the config
        #[arg(long)]
        url: Option<String>,
    },

    /// List users that can be assigned for a role
    Users {
        /// Role to list
        #[arg(short, long, value_enum)]
        role: RoleArg,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the default equal split for a number of assignees
    Split {
        /// Number of assignees
        count: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Preview how tasks would be distributed, without contacting the backend
    #[command(visible_alias = "preview")]
    Plan {
        /// Plan file (.toml, .yaml, .yml or .json)
        plan: PathBuf,

        /// Number of tasks to distribute
        #[arg(short = 'n', long)]
        tasks: usize,

        /// Reference time for due dates (RFC 3339, defaults to now)
        #[arg(long)]
        now: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Activate a project, create its tasks and assign them
    Send {
        /// Plan file (.toml, .yaml, .yml or .json)
        plan: PathBuf,

        /// Existing project to activate
        #[arg(long, conflicts_with_all = ["workspace", "name"], required_unless_present = "workspace")]
        project: Option<ProjectId>,

        /// Workspace for a new project
        #[arg(long, requires = "name")]
        workspace: Option<WorkspaceId>,

        /// Name of the new project
        #[arg(long, requires = "workspace")]
        name: Option<String>,

        /// Description of the new project
        #[arg(long, default_value = "")]
        description: String,

        /// Task text, one task per line (use '-' to read from stdin)
        #[arg(long, conflicts_with = "items_file")]
        text: Option<String>,

        /// JSON file with an array of task items
        #[arg(long)]
        items_file: Option<PathBuf>,

        /// Batch name (overrides config)
        #[arg(long)]
        batch_name: Option<String>,

        /// Skip creating the default workflow
        #[arg(long)]
        no_workflow: bool,

        /// Run against an in-memory backend and report what would happen
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Annotator,
    Reviewer,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Annotator => Role::Annotator,
            RoleArg::Reviewer => Role::Reviewer,
        }
    }
}
