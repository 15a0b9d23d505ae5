//! SceneSplit command-line client
//!
//! Restores the saved session, runs one command against the SceneSplit API
//! and exits.

use std::path::PathBuf;
use std::sync::Arc;

use api_client::{HttpApiClient, ScriptFile};
use auth::password_digest;
use clap::{Parser, Subcommand};
use entities::ProjectStatus;
use project_store::{AuthHelper, ProjectStore};
use scenesplit_client::{output, prompt, ClientConfig, LoggingNavigator};
use session_storage::{FileStorage, SessionStorage};
use tracing::{debug, info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scenesplit-client", version)]
#[command(about = "Sign in to SceneSplit and manage script projects")]
struct Cli {
    /// Config file to use instead of the standard locations
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in through the server; the password is read from stdin
    Login { email: String },
    /// Sign in with the configured demo account, without a server; the
    /// password is read from stdin
    DemoLogin { email: String },
    /// Start a time-limited guest session
    Guest {
        name: String,
        email: String,
        /// Overrides the configured guest access length
        #[arg(long)]
        days: Option<i64>,
    },
    /// End the session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List projects
    Projects,
    /// Show a project, by id or title
    Select { project: String },
    /// Change a project's status (active, review, completed)
    Status {
        project: String,
        status: ProjectStatus,
    },
    /// Delete a project
    Remove { project: String },
    /// Create a project from a script file (pdf, txt or fountain)
    Upload {
        title: String,
        file: PathBuf,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Print a project's analysis, or replace it with the JSON in FILE
    Analysis {
        project: String,
        #[arg(long, value_name = "FILE")]
        set: Option<PathBuf>,
    },
    /// Check that the API server answers
    Health,
    /// Print the digest to configure as demo_password_sha256 for the
    /// password read from stdin
    HashPassword,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::HashPassword = &cli.command {
        let password = prompt::password_from_stdin()?;
        println!("{}", password_digest(&password));
        return Ok(());
    }

    // Load configuration
    let config = ClientConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    let log_level = match config.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "scenesplit_client={0},project_store={0},api_client={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        api_base_url = %config.api_base_url,
        storage_path = %config.storage_path.display(),
        "Starting SceneSplit client"
    );

    let storage: Arc<dyn SessionStorage> =
        Arc::new(FileStorage::new(config.storage_path.clone()));
    let client = Arc::new(
        HttpApiClient::with_timeout(&config.api_base_url, config.request_timeout())?
            .with_storage(storage.clone()),
    );
    let store = Arc::new(ProjectStore::with_client(storage, client.clone()));

    let mut helper = AuthHelper::new(store.clone(), Arc::new(LoggingNavigator));
    if let Some(account) = config.demo_account() {
        helper = helper.with_demo_account(account);
    }

    store.initialize_from_storage().await;

    match cli.command {
        Command::Login { email } => {
            let password = prompt::password_from_stdin()?;
            let user = helper.login(&email, &password).await?;
            println!("Signed in as {}", output::user_summary(&user, 0));
        }
        Command::DemoLogin { email } => {
            let password = prompt::password_from_stdin()?;
            if !helper.demo_login(&email, &password).await {
                return Err("Demo login failed".into());
            }
            println!("Signed in with the demo account");
        }
        Command::Guest { name, email, days } => {
            let validity = match days {
                Some(days) => chrono::Duration::try_days(days.max(0))
                    .ok_or("Guest access length is out of range")?,
                None => config.guest_validity(),
            };
            let user = store.start_guest_session(&name, &email, validity).await?;
            let days_left = store.days_until_guest_expiry().await;
            println!("Signed in as {}", output::user_summary(&user, days_left));
        }
        Command::Logout => {
            helper.logout().await;
            println!("Signed out");
        }
        Command::Whoami => {
            let user = if store.is_logged_in().await {
                store.user().await
            } else {
                None
            };
            match user {
                Some(user) => {
                    let days_left = store.days_until_guest_expiry().await;
                    println!("{}", output::user_summary(&user, days_left));
                }
                None => println!("Not signed in"),
            }
        }
        Command::Projects => {
            require_login(&store).await?;
            let projects = store.projects().await;
            if projects.is_empty() {
                println!("No projects");
            }
            let selected = store.selected_project_id().await;
            for project in &projects {
                let is_selected = selected.as_deref() == Some(project.id.as_str());
                println!("{}", output::project_line(project, is_selected));
            }
        }
        Command::Select { project } => {
            require_login(&store).await?;
            if !store.set_selected_project(&project).await {
                return Err(format!("No project matches '{}'", project).into());
            }
            if let Some(project) = store.selected_project().await {
                println!("{}", output::project_details(&project));
            }
        }
        Command::Status { project, status } => {
            require_login(&store).await?;
            store.update_project_status(&project, status).await?;
            println!("{} is now {}", project, status);
        }
        Command::Remove { project } => {
            require_login(&store).await?;
            store.remove_project(&project).await?;
            println!("Removed {}", project);
        }
        Command::Upload {
            title,
            file,
            description,
        } => {
            require_login(&store).await?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or("Script path has no file name")?;
            let content = std::fs::read(&file)?;
            let script = ScriptFile::new(file_name, content);
            let project = store
                .create_project_with_script(&title, &description, script)
                .await?;
            info!(project_id = %project.id, "Script uploaded");
            println!("{}", output::project_details(&project));
        }
        Command::Analysis { project, set } => {
            require_login(&store).await?;
            if !store.set_selected_project(&project).await {
                return Err(format!("No project matches '{}'", project).into());
            }
            let id = store
                .selected_project_id()
                .await
                .ok_or("No project selected")?;

            match set {
                Some(path) => {
                    let data: serde_json::Value =
                        serde_json::from_str(&std::fs::read_to_string(&path)?)?;
                    store.update_project_analysis(&id, data).await?;
                    println!("Analysis of {} updated", id);
                }
                None => {
                    let data = store.get_project_analysis(&id).await?;
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
            }
        }
        Command::Health => {
            client.health_check().await?;
            println!("{} is reachable", client.base_url());
        }
        Command::HashPassword => {}
    }

    Ok(())
}

async fn require_login(store: &ProjectStore) -> Result<(), Box<dyn std::error::Error>> {
    if store.is_logged_in().await {
        Ok(())
    } else {
        Err("Not signed in. Run `scenesplit-client login` first.".into())
    }
}
