//! Coursedesk CLI
//!
//! Command-line front end for the course dashboard:
//! - Log in, sign up, log out
//! - Browse courses, grades and messages
//! - Enroll, send messages
//! - Create and manage courses (teachers)

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coursedesk::api::{ApiClient, HttpTransport};
use coursedesk::config::{Config, LoggingConfig};
use coursedesk::dashboard::{
    self, CapacityForm, CreateCourseForm, Dashboard, DashboardError, GradeForm, LoginForm,
    MessageForm, Notice, NoticeLevel, Notifier, Outcome, SignupForm,
};
use coursedesk::render::escape_html;
use coursedesk::session::{FileStorage, SessionError, SessionStore};
use coursedesk::view::{Section, Tab};

#[derive(Parser)]
#[command(name = "coursedesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Course dashboard for students and teachers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./coursedesk.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account
    Signup {
        name: String,
        email: String,
        #[arg(short, long)]
        password: String,
        /// student or teacher
        #[arg(short, long, default_value = "student")]
        role: String,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show a dashboard section (courses, grades, messages, create-course, manage-course)
    Show {
        section: Section,
        /// Emit HTML fragments instead of text
        #[arg(long)]
        html: bool,
    },

    /// Open a messaging tab (inbox, compose)
    Tab { tab: Tab },

    /// Enroll in a course (students)
    Enroll { course_id: i64 },

    /// Send a direct message
    Send { recipient_id: String, text: String },

    /// Create a course (teachers)
    CreateCourse {
        name: String,
        #[arg(short, long)]
        capacity: String,
    },

    /// Show the roster and grades of a course
    Manage { course_id: i64 },

    /// Change the capacity of a course
    SetCapacity {
        capacity: String,
        #[arg(long)]
        course: Option<i64>,
    },

    /// Delete a course
    DeleteCourse {
        #[arg(long)]
        course: Option<i64>,
    },

    /// Remove a student from a course
    RemoveStudent {
        student_id: i64,
        #[arg(long)]
        course: Option<i64>,
    },

    /// Create or update a student's grade
    AssignGrade {
        student_id: String,
        value: String,
        #[arg(long)]
        course: Option<i64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Prints notices and asks for confirmation on the terminal
struct ConsoleNotifier {
    assume_yes: bool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Warning => eprintln!("warning: {}", notice.message),
            NoticeLevel::Error => eprintln!("error: {}", notice.message),
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [y/N] ", prompt);
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

type CliDashboard = Dashboard<HttpTransport, FileStorage, ConsoleNotifier>;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::load_with_env(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, config)) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("coursedesk={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<ExitCode> {
    let notifier = ConsoleNotifier {
        assume_yes: cli.yes,
    };
    let transport = HttpTransport::new(config.api.transport_config())
        .context("failed to build HTTP client")?;
    let mut client = ApiClient::new(transport);
    let mut store = SessionStore::new(FileStorage::new(&config.session.file));

    tracing::debug!(api = %config.api.base_url, session = %config.session.file, "Starting");

    let outcome = match cli.command {
        Commands::Login { email, password } => {
            let form = LoginForm { email, password };
            dashboard::login(&mut client, &mut store, &notifier, &form).await?
        }

        Commands::Signup {
            name,
            email,
            password,
            role,
        } => {
            let form = SignupForm {
                name,
                email,
                password,
                role,
            };
            dashboard::signup(&client, &notifier, &form).await
        }

        Commands::Logout => {
            match Dashboard::restore(client, store, notifier) {
                Ok(dashboard) => {
                    dashboard.logout()?;
                }
                // a half session is already discarded by the restore attempt
                Err(DashboardError::Session(SessionError::Unauthenticated)) => {}
                Err(e) => return Err(e.into()),
            }
            println!("Logged out");
            Outcome::Applied
        }

        Commands::Config { output } => {
            let content = coursedesk::config::generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
            Outcome::Applied
        }

        command => {
            let mut dashboard = match Dashboard::restore(client, store, notifier) {
                Ok(dashboard) => dashboard,
                Err(DashboardError::Session(SessionError::Unauthenticated)) => {
                    eprintln!("Not logged in. Run `coursedesk login <email> --password <password>` first.");
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            };
            run_dashboard(&mut dashboard, command).await
        }
    };

    Ok(match outcome {
        Outcome::Applied | Outcome::Cancelled => ExitCode::SUCCESS,
        Outcome::Invalid | Outcome::Failed => ExitCode::FAILURE,
    })
}

async fn run_dashboard(dashboard: &mut CliDashboard, command: Commands) -> Outcome {
    match command {
        Commands::Whoami => {
            let user = dashboard.user();
            println!("{} (id {}, {})", user.email, user.id, user.role);
            Outcome::Applied
        }

        Commands::Show { section, html } => {
            if dashboard.navigate(section).await.is_err() {
                return Outcome::Invalid;
            }
            print_screen(dashboard, html);
            Outcome::Applied
        }

        Commands::Tab { tab } => {
            if dashboard.navigate(Section::Messages).await.is_err() {
                return Outcome::Invalid;
            }
            dashboard.switch_tab(tab);
            match tab {
                Tab::Inbox => print_screen(dashboard, false),
                Tab::Compose => println!("Compose: coursedesk send <recipient-id> <text>"),
            }
            Outcome::Applied
        }

        Commands::Enroll { course_id } => dashboard.enroll(course_id).await,

        Commands::Send { recipient_id, text } => {
            let mut form = MessageForm { recipient_id, text };
            dashboard.send_message(&mut form).await
        }

        Commands::CreateCourse { name, capacity } => {
            let mut form = CreateCourseForm { name, capacity };
            dashboard.create_course(&mut form).await
        }

        Commands::Manage { course_id } => {
            select(dashboard, Some(course_id)).await;
            print_screen(dashboard, false);
            Outcome::Applied
        }

        Commands::SetCapacity { capacity, course } => {
            select(dashboard, course).await;
            dashboard.update_capacity(&mut CapacityForm { capacity }).await
        }

        Commands::DeleteCourse { course } => {
            select(dashboard, course).await;
            dashboard.delete_course().await
        }

        Commands::RemoveStudent { student_id, course } => {
            select(dashboard, course).await;
            dashboard.remove_student(student_id).await
        }

        Commands::AssignGrade {
            student_id,
            value,
            course,
        } => {
            select(dashboard, course).await;
            dashboard
                .assign_grade(&mut GradeForm { student_id, value })
                .await
        }

        Commands::Login { .. }
        | Commands::Signup { .. }
        | Commands::Logout
        | Commands::Config { .. } => Outcome::Applied,
    }
}

/// Select `course` for management; without one the handlers' guard fires
async fn select(dashboard: &mut CliDashboard, course: Option<i64>) {
    if let Some(course_id) = course {
        let name = dashboard.course_name(course_id).await;
        dashboard.select_course(course_id, &name).await;
    }
}

fn print_screen(dashboard: &CliDashboard, html: bool) {
    let screen = dashboard.screen();
    if html {
        println!("<header>{}</header>", escape_html(&screen.user_label));
    } else {
        println!("Logged in as {}", screen.user_label);
    }

    let section = dashboard.router().section();
    if section == Section::ManageCourse {
        if let Some(title) = &screen.manage_title {
            println!("\n{}", title);
        }
    }
    if section == Section::CreateCourse {
        println!("\nCreate course: coursedesk create-course <name> --capacity <n>");
    }

    for (panel, fragment) in dashboard.visible_panels() {
        if html {
            println!("<section><h2>{}</h2>{}</section>", panel.title(), fragment.to_html());
        } else {
            println!("\n== {} ==", panel.title());
            print!("{}", fragment);
        }
    }
}
