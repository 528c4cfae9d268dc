//! Command-line interface definitions using clap.
//!
//! Every subcommand stands for a screen of the web client and is bound to
//! that screen's route, so the route guard decides whether it may run.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use projtrack_core::models::{Category, Gender, TaskStatus};
use projtrack_core::routes;

/// projtrack - projects and tasks from the terminal
#[derive(Parser)]
#[command(name = "projtrack")]
#[command(version)]
#[command(about = "Command-line client for the project tracker", long_about = None)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        /// Account email (defaults to the last one used)
        #[arg(long)]
        email: Option<String>,

        /// Remember the password in the OS keychain
        #[arg(long)]
        remember: bool,
    },

    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<NaiveDate>,

        /// male, female or others
        #[arg(long)]
        gender: Option<Gender>,
    },

    /// Sign out
    Logout {
        /// Also delete the remembered password
        #[arg(long)]
        forget: bool,
    },

    /// Show the signed-in user
    Whoami {
        /// Skip the local cache
        #[arg(long)]
        refresh: bool,
    },

    /// Summary of all projects and tasks
    Dashboard {
        /// Skip the local cache
        #[arg(long)]
        refresh: bool,
    },

    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectCommands,
    },

    /// Manage the tasks of a project
    Tasks {
        #[command(subcommand)]
        action: TaskCommands,
    },

    /// About this application
    About,

    /// Show what the route guard decides for a path
    Route {
        /// Path such as /dashboard or /login
        path: String,
    },
}

impl Commands {
    /// The screen this command opens. `route` only inspects a path and
    /// opens nothing.
    pub fn route(&self) -> Option<&'static str> {
        let route = match self {
            Commands::Login { .. } => routes::LOGIN,
            Commands::Register { .. } => routes::REGISTER,
            Commands::Logout { .. } | Commands::Whoami { .. } | Commands::Dashboard { .. } => {
                routes::DASHBOARD
            }
            Commands::Projects { .. } => routes::PROJECTS,
            Commands::Tasks { .. } => routes::TASKS,
            Commands::About => routes::ABOUT,
            Commands::Route { .. } => return None,
        };
        Some(route)
    }

    /// Whether the command signs out anyway, so an expired session is
    /// expected rather than an error.
    pub fn ends_session(&self) -> bool {
        matches!(self, Commands::Logout { .. })
    }
}

/// Project commands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects
    List {
        #[arg(long)]
        refresh: bool,
    },

    /// Create a project
    Create {
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// personal, work, hobby or other
        #[arg(long, default_value = "personal")]
        category: Category,
    },

    /// Update a project; omitted fields keep their value
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<Category>,
    },

    /// Delete a project and its tasks
    Delete { id: i64 },
}

/// Task commands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// List the tasks of a project
    List {
        #[arg(long, short)]
        project: i64,

        #[arg(long)]
        refresh: bool,
    },

    /// Create a task
    Create {
        #[arg(long, short)]
        project: i64,

        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// todo, in_progress or done
        #[arg(long, default_value = "todo")]
        status: TaskStatus,

        /// YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Update a task; omitted fields keep their value
    Update {
        #[arg(long, short)]
        project: i64,

        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        status: Option<TaskStatus>,

        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Delete a task
    Delete {
        #[arg(long, short)]
        project: i64,

        id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_task_create() {
        let cli = Cli::parse_from([
            "projtrack", "tasks", "create", "-p", "4", "Plant beans", "--status", "in progress",
            "--due", "2024-06-01",
        ]);
        match cli.command {
            Commands::Tasks {
                action: TaskCommands::Create { project, title, status, due, .. },
            } => {
                assert_eq!(project, 4);
                assert_eq!(title, "Plant beans");
                assert_eq!(status, TaskStatus::InProgress);
                assert_eq!(due, NaiveDate::from_ymd_opt(2024, 6, 1));
            }
            _ => panic!("parsed the wrong command"),
        }
    }

    #[test]
    fn test_routes() {
        let cli = Cli::parse_from(["projtrack", "login"]);
        assert_eq!(cli.command.route(), Some(routes::LOGIN));
        let cli = Cli::parse_from(["projtrack", "projects", "list"]);
        assert_eq!(cli.command.route(), Some(routes::PROJECTS));
        let cli = Cli::parse_from(["projtrack", "--json", "whoami"]);
        assert!(cli.json);
        assert_eq!(cli.command.route(), Some(routes::DASHBOARD));
        let cli = Cli::parse_from(["projtrack", "route", "/"]);
        assert_eq!(cli.command.route(), None);
    }

    #[test]
    fn test_only_logout_ends_session() {
        assert!(Cli::parse_from(["projtrack", "logout"]).command.ends_session());
        assert!(Cli::parse_from(["projtrack", "logout", "--forget"]).command.ends_session());
        assert!(!Cli::parse_from(["projtrack", "whoami"]).command.ends_session());
        assert!(!Cli::parse_from(["projtrack", "dashboard"]).command.ends_session());
    }

    #[test]
    fn test_parse_clear_due() {
        let cli = Cli::parse_from(["projtrack", "tasks", "update", "-p", "2", "5", "--clear-due"]);
        match cli.command {
            Commands::Tasks {
                action: TaskCommands::Update { project, id, due, clear_due, .. },
            } => {
                assert_eq!((project, id), (2, 5));
                assert!(due.is_none());
                assert!(clear_due);
            }
            _ => panic!("parsed the wrong command"),
        }
        let both = ["projtrack", "tasks", "update", "-p", "2", "5", "--due", "2024-01-01", "--clear-due"];
        assert!(Cli::try_parse_from(both).is_err());
    }

    #[test]
    fn test_bad_category_rejected() {
        let result = Cli::try_parse_from(["projtrack", "projects", "create", "x", "--category", "chores"]);
        assert!(result.is_err());
    }
}
