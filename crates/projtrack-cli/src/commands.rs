//! Command handlers. Each one runs after the route guard has let the
//! navigation through.

use std::io::{self, Write};

use anyhow::{bail, Result};
use chrono::Utc;
use projtrack_core::models::{ProjectInput, RegisterRequest, TaskInput, TaskStatus};
use projtrack_core::resources::DashboardSummary;
use projtrack_core::routes::{self, GuardDecision};
use serde::Serialize;
use tracing::warn;

use crate::app::App;
use crate::cli::{Commands, ProjectCommands, TaskCommands};
use crate::utils::format::{format_date, format_due, progress_bar, truncate_string};

/// Column width for names and titles in listings
const NAME_WIDTH: usize = 32;

pub async fn run(app: &mut App, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Login { email, remember } => login(app, email, remember).await,
        Commands::Register {
            email,
            first_name,
            last_name,
            birth_date,
            gender,
        } => {
            let request = RegisterRequest {
                email,
                password: String::new(),
                first_name,
                last_name,
                birth_date,
                gender,
            };
            register(app, request).await
        }
        Commands::Logout { forget } => logout(app, forget).await,
        Commands::Whoami { refresh } => whoami(app, refresh, json).await,
        Commands::Dashboard { refresh } => dashboard(app, refresh, json).await,
        Commands::Projects { action } => projects(app, action, json).await,
        Commands::Tasks { action } => tasks(app, action, json).await,
        Commands::About => {
            about();
            Ok(())
        }
        Commands::Route { path } => {
            route(app, &path);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(default) => print!("{} [{}]: ", label, default),
        None => print!("{}: ", label),
    }
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    match (input.is_empty(), default) {
        (true, Some(default)) => Ok(default.to_string()),
        _ => Ok(input.to_string()),
    }
}

fn prompt_password() -> Result<String> {
    Ok(rpassword::prompt_password("Password: ")?)
}

// ===== Auth =====

async fn login(app: &mut App, email: Option<String>, remember: bool) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => prompt("Email", app.config.last_email.as_deref())?,
    };
    if email.is_empty() {
        bail!("Email is required");
    }

    let password = if app.passwords.has_password(&email) {
        let answer = prompt("Use stored password? [Y/n]", None)?;
        if answer.eq_ignore_ascii_case("n") {
            prompt_password()?
        } else {
            app.passwords.get_password(&email)?
        }
    } else {
        prompt_password()?
    };

    let user = app.resources.account.login(&email, &password).await?;
    app.set_signed_in(&email);

    if remember {
        if let Err(e) = app.passwords.store(&email, &password) {
            warn!(error = %e, "Failed to store password");
        }
    }

    println!("Signed in as {}", user.display_name());
    Ok(())
}

async fn register(app: &mut App, mut request: RegisterRequest) -> Result<()> {
    let password = prompt_password()?;
    let confirm = rpassword::prompt_password("Confirm password: ")?;
    if password != confirm {
        bail!("Passwords do not match");
    }
    request.password = password;

    let user = app.resources.account.register(&request).await?;
    app.set_signed_in(&request.email);

    println!("Account created. Signed in as {}", user.display_name());
    Ok(())
}

async fn logout(app: &mut App, forget: bool) -> Result<()> {
    let email = app.email().or_else(|| app.config.last_email.clone());

    // The local session goes regardless of what the server says
    if let Err(e) = app.resources.account.logout().await {
        warn!(error = %e, "Server-side logout failed");
    }
    app.sign_out_locally();

    if forget {
        if let Some(ref email) = email {
            if let Err(e) = app.passwords.delete(email) {
                warn!(error = %e, "Failed to delete stored password");
            }
        }
    }

    println!("Signed out");
    Ok(())
}

async fn whoami(app: &App, refresh: bool, json: bool) -> Result<()> {
    let me = app.resources.account.me(refresh).await?;
    if json {
        return print_json(&me.data);
    }

    let user = me.data;
    println!("{} <{}>", user.display_name(), user.email);
    if let Some(birth_date) = user.birth_date {
        println!("Born:   {}", birth_date.format("%Y-%m-%d"));
    }
    if let Some(gender) = user.gender {
        println!("Gender: {}", gender);
    }
    if let Some(age) = me.cached {
        println!("(cached {})", age);
    }
    Ok(())
}

// ===== Dashboard =====

async fn dashboard(app: &App, refresh: bool, json: bool) -> Result<()> {
    let summary = app.resources.dashboard(refresh).await?;
    if json {
        return print_json(&summary);
    }
    print_dashboard(&summary);
    Ok(())
}

fn print_dashboard(summary: &DashboardSummary) {
    println!("Projects: {}", summary.total_projects);
    println!("Tasks:    {}", summary.total_tasks);
    for status in TaskStatus::all() {
        println!("  {:<12} {}", status.label(), summary.by_status.get(*status));
    }
    println!("Overdue:  {}", summary.overdue);
    println!("Done:     {}", progress_bar(summary.completion_percent, 20));

    if !summary.recent_projects.is_empty() {
        println!("\nRecently updated:");
        for project in &summary.recent_projects {
            println!(
                "  #{:<5} {:<width$} {}",
                project.id,
                truncate_string(&project.name, NAME_WIDTH),
                format_date(&project.updated_at),
                width = NAME_WIDTH
            );
        }
    }
}

// ===== Projects =====

async fn projects(app: &App, action: ProjectCommands, json: bool) -> Result<()> {
    let store = &app.resources.projects;
    match action {
        ProjectCommands::List { refresh } => {
            let listed = store.list(refresh).await?;
            if json {
                return print_json(&listed.data);
            }
            if listed.data.is_empty() {
                println!("No projects yet.");
            }
            for project in &listed.data {
                println!(
                    "#{:<5} {:<width$} {:<9} {}",
                    project.id,
                    truncate_string(&project.name, NAME_WIDTH),
                    project.categories.to_string(),
                    format_date(&project.updated_at),
                    width = NAME_WIDTH
                );
            }
            if let Some(age) = listed.cached {
                println!("(cached {})", age);
            }
        }
        ProjectCommands::Create {
            name,
            description,
            category,
        } => {
            let input = ProjectInput {
                name,
                description,
                categories: category,
            };
            let project = store.create(&input).await?;
            if json {
                return print_json(&project);
            }
            println!("Created project #{} {}", project.id, project.name);
        }
        ProjectCommands::Update {
            id,
            name,
            description,
            category,
        } => {
            let Some(current) = store.get(id).await? else {
                bail!("No project #{}", id);
            };
            let mut input = ProjectInput::from(&current);
            if let Some(name) = name {
                input.name = name;
            }
            if let Some(description) = description {
                input.description = description;
            }
            if let Some(category) = category {
                input.categories = category;
            }
            let project = store.update(id, &input).await?;
            if json {
                return print_json(&project);
            }
            println!("Updated project #{} {}", project.id, project.name);
        }
        ProjectCommands::Delete { id } => {
            store.delete(id).await?;
            println!("Deleted project #{}", id);
        }
    }
    Ok(())
}

// ===== Tasks =====

async fn tasks(app: &App, action: TaskCommands, json: bool) -> Result<()> {
    let store = &app.resources.tasks;
    match action {
        TaskCommands::List { project, refresh } => {
            let listed = store.list(project, refresh).await?;
            if json {
                return print_json(&listed.data);
            }
            if listed.data.is_empty() {
                println!("No tasks in project #{}.", project);
            }
            let today = Utc::now().date_naive();
            for task in &listed.data {
                println!(
                    "#{:<5} {:<width$} {:<12} {}",
                    task.id,
                    truncate_string(&task.title, NAME_WIDTH),
                    task.status.label(),
                    format_due(task.due_date, task.is_overdue(today)),
                    width = NAME_WIDTH
                );
            }
            if let Some(age) = listed.cached {
                println!("(cached {})", age);
            }
        }
        TaskCommands::Create {
            project,
            title,
            description,
            status,
            due,
        } => {
            let input = TaskInput {
                title,
                description,
                status,
                due_date: due,
                project,
            };
            let task = store.create(project, &input).await?;
            if json {
                return print_json(&task);
            }
            println!("Created task #{} {}", task.id, task.title);
        }
        TaskCommands::Update {
            project,
            id,
            title,
            description,
            status,
            due,
            clear_due,
        } => {
            let Some(current) = store.get(project, id).await? else {
                bail!("No task #{} in project #{}", id, project);
            };
            let mut input = TaskInput::from(&current);
            if let Some(title) = title {
                input.title = title;
            }
            if let Some(description) = description {
                input.description = description;
            }
            if let Some(status) = status {
                input.status = status;
            }
            if due.is_some() || clear_due {
                input.due_date = due;
            }
            let task = store.update(project, id, &input).await?;
            if json {
                return print_json(&task);
            }
            println!("Updated task #{} {} ({})", task.id, task.title, task.status);
        }
        TaskCommands::Delete { project, id } => {
            store.delete(project, id).await?;
            println!("Deleted task #{}", id);
        }
    }
    Ok(())
}

// ===== Public screens =====

pub fn about() {
    println!("projtrack {}", env!("CARGO_PKG_VERSION"));
    println!("Track projects and their tasks against a project tracker backend.");
    println!("Sign in with `projtrack login`, then try `projtrack dashboard`.");
}

fn route(app: &App, path: &str) {
    let session = if app.has_session() { "signed in" } else { "signed out" };
    match routes::guard(path, app.has_session()) {
        GuardDecision::Allow => println!("{} ({}): allow", path, session),
        GuardDecision::Redirect(target) => {
            println!("{} ({}): redirect to {}", path, session, target)
        }
    }
}
