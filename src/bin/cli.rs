//! EduPulse Portal CLI
//!
//! Operator entry point for inspecting and driving a local portal session.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use edupulse::{
    assistant::{Assistant, GeminiClient, NullAssistant},
    config::Config,
    error::Result,
    models::{
        mock_faculty, mock_student, seed_announcements, seed_events, seed_materials,
        seed_notifications, seed_tasks, AnnouncementDraft, MaterialDraft, MaterialKind, Priority,
        TaskCategory, TaskDraft, TaskStatus,
    },
    session::Session,
    store::{LocalSlotStorage, Slot, StorageHub},
};

/// EduPulse - Campus Portal Core
#[derive(Parser, Debug)]
#[command(name = "edupulse", version, about = "Local-first campus portal core")]
struct Cli {
    /// Path to the storage directory holding slot files and config.toml
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Role to open the session as
    #[arg(short, long, value_enum, default_value_t = RoleArg::Student)]
    role: RoleArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoleArg {
    Student,
    Faculty,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PriorityArg {
    Urgent,
    Academic,
    Event,
    General,
}

impl From<PriorityArg> for Priority {
    fn from(p: PriorityArg) -> Priority {
        match p {
            PriorityArg::Urgent => Priority::Urgent,
            PriorityArg::Academic => Priority::Academic,
            PriorityArg::Event => Priority::Event,
            PriorityArg::General => Priority::General,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CategoryArg {
    Assignment,
    Exam,
    Submission,
}

impl From<CategoryArg> for TaskCategory {
    fn from(c: CategoryArg) -> TaskCategory {
        match c {
            CategoryArg::Assignment => TaskCategory::Assignment,
            CategoryArg::Exam => TaskCategory::Exam,
            CategoryArg::Submission => TaskCategory::Submission,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Pdf,
    Slides,
    Notes,
}

impl From<KindArg> for MaterialKind {
    fn from(k: KindArg) -> MaterialKind {
        match k {
            KindArg::Pdf => MaterialKind::Pdf,
            KindArg::Slides => MaterialKind::Slides,
            KindArg::Notes => MaterialKind::Notes,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the seed collections into the storage directory
    Seed {
        /// Overwrite slots that already exist
        #[arg(long)]
        force: bool,
    },

    /// Show slot counts and session info
    Info,

    /// List tasks
    Tasks,

    /// Add a task
    AddTask {
        title: String,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: String,
        #[arg(long, value_enum, default_value_t = CategoryArg::Assignment)]
        category: CategoryArg,
    },

    /// Toggle a task between pending and completed
    ToggleTask { id: String },

    /// Post an announcement (faculty only)
    Announce {
        title: String,
        content: String,
        #[arg(long, value_enum, default_value_t = PriorityArg::General)]
        priority: PriorityArg,
        /// Optional deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
    },

    /// Upload a material record (faculty only)
    Material {
        subject: String,
        title: String,
        #[arg(long, value_enum, default_value_t = KindArg::Pdf)]
        kind: KindArg,
        #[arg(long, default_value = "#")]
        url: String,
    },

    /// Generate the AI daily digest
    Digest,

    /// Ask the campus assistant a single question
    Chat { message: String },

    /// Validate configuration files
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the assistant, falling back to the inert one when the Gemini
/// client cannot be configured (missing API key, bad URL).
fn build_assistant(config: &Config) -> Arc<dyn Assistant> {
    match GeminiClient::from_config(&config.assistant) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::warn!("Assistant unavailable, using fallbacks: {}", e);
            Arc::new(NullAssistant)
        }
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("EduPulse portal starting...");

    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);
    tokio::fs::create_dir_all(&cli.storage_dir).await?;

    let hub = Arc::new(StorageHub::new(Arc::new(LocalSlotStorage::new(
        &cli.storage_dir,
    ))));

    let command = match cli.command {
        Command::Seed { force } => {
            return seed(&cli.storage_dir, &hub, force).await;
        }
        Command::Validate => {
            log::info!("Validating configuration...");
            config.validate()?;
            log::info!("Config OK ({})", config_path.display());
            return Ok(());
        }
        other => other,
    };

    let user = match cli.role {
        RoleArg::Student => mock_student(),
        RoleArg::Faculty => mock_faculty(),
    };
    let assistant = build_assistant(&config);
    let session = Arc::new(Session::open(user, hub, assistant, &config).await);
    Arc::clone(&session).attach_listener();

    match command {
        Command::Seed { .. } | Command::Validate => unreachable!(),

        Command::Info => {
            let state = session.state().await;
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("User: {} ({:?})", session.user().name, session.role());
            println!("tasks          {}", state.tasks.len());
            println!("events         {}", state.events.len());
            println!("announcements  {}", state.announcements.len());
            println!("materials      {}", state.materials.len());
            println!("notifications  {}", state.notifications.len());
        }

        Command::Tasks => {
            let state = session.state().await;
            for task in &state.tasks {
                let mark = match task.status {
                    TaskStatus::Completed => "x",
                    TaskStatus::Pending => " ",
                };
                println!("[{}] {}  {}  (due {})", mark, task.id, task.title, task.due_date);
            }
        }

        Command::AddTask {
            title,
            due,
            category,
        } => {
            let task = session
                .add_task(TaskDraft {
                    title,
                    due_date: due,
                    status: TaskStatus::Pending,
                    category: category.into(),
                })
                .await?;
            log::info!("Added task {}", task.id);
        }

        Command::ToggleTask { id } => {
            session.toggle_task_status(&id).await?;
            log::info!("Toggled task {}", id);
        }

        Command::Announce {
            title,
            content,
            priority,
            deadline,
        } => {
            let posted_by = session.user().name.clone();
            let announcement = session
                .add_announcement(AnnouncementDraft {
                    title,
                    content,
                    priority: priority.into(),
                    posted_by,
                    deadline,
                })
                .await?;
            session.drain_cascades().await;
            log::info!("Posted announcement {}", announcement.id);
        }

        Command::Material {
            subject,
            title,
            kind,
            url,
        } => {
            let uploaded_by = session.user().name.clone();
            let material = session
                .add_material(MaterialDraft {
                    subject,
                    title,
                    kind: kind.into(),
                    uploaded_by,
                    url,
                })
                .await?;
            log::info!("Uploaded material {}", material.id);
        }

        Command::Digest => {
            println!("{}", session.generate_digest().await);
        }

        Command::Chat { message } => {
            println!("{}", session.chat(&[], &message).await);
        }
    }

    session.close().await;
    Ok(())
}

/// Write seed collections into their slots. Skips populated slots unless
/// `force` is set.
async fn seed(dir: &std::path::Path, hub: &StorageHub, force: bool) -> Result<()> {
    let origin = hub.register_origin();
    for slot in Slot::ALL {
        let path = dir.join(format!("{}.json", slot.key()));
        if path.exists() && !force {
            log::warn!(
                "Slot {} already exists at {}. Use --force to overwrite.",
                slot.key(),
                path.display()
            );
            continue;
        }
        match slot {
            Slot::Tasks => hub.persist(origin, slot, &seed_tasks()).await?,
            Slot::Events => hub.persist(origin, slot, &seed_events()).await?,
            Slot::Announcements => hub.persist(origin, slot, &seed_announcements()).await?,
            Slot::Materials => hub.persist(origin, slot, &seed_materials()).await?,
            Slot::Notifications => hub.persist(origin, slot, &seed_notifications()).await?,
        }
        log::info!("Seeded {}", slot.key());
    }
    Ok(())
}
