mod controller;
mod terminal;

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, ClientSettings, FileTokenStore, HttpAuthenticator, HttpDirectoryConnector,
    SessionStore, TokenStore,
};
use shared::domain::EmployeeId;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use controller::{
    employee_list::{EmployeeListController, ListState, MutationOutcome},
    events::UiError,
    login::{LoginController, LoginForm, LoginOutcome},
    navigation::{Navigator, Route, RouteTracker},
};
use terminal::{render_employee, render_table, Prompter, TerminalDialogs};

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;
const INVALID_INPUT: u8 = 2;

const NOT_SIGNED_IN_HINT: &str = "Not signed in. Run `employee-desk login` first.";
const SESSION_REJECTED_HINT: &str = "The server rejected the session. Run `employee-desk login` again.";

#[derive(Parser, Debug)]
#[command(name = "employee-desk", about = "Manage the employee directory from a terminal")]
struct Cli {
    /// Base URL of the directory service, overriding the settings file and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Where the session token is kept.
    #[arg(long, global = true)]
    token_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token.
    Login {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session token.
    Logout,
    /// Print the directory, optionally filtered.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Fetch a single record from the server.
    Show { id: String },
    /// Add an employee through the interactive form.
    Create {
        /// Skip the final confirmation.
        #[arg(long)]
        yes: bool,
    },
    /// Edit an employee through the interactive form.
    Edit {
        id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Delete an employee after confirmation.
    Delete {
        id: String,
        #[arg(long)]
        yes: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_settings(cli: &Cli) -> ClientSettings {
    let mut settings = load_settings();
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(path) = &cli.token_path {
        settings.token_path = path.clone();
    }
    settings
}

struct App {
    session: Arc<SessionStore>,
    navigator: Arc<RouteTracker>,
    settings: ClientSettings,
}

impl App {
    /// An unreadable session starts signed out; `login` and `logout` still work from there.
    async fn start(settings: ClientSettings) -> Self {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(settings.token_path.clone()));
        let session = match SessionStore::restore(store.clone()).await {
            Ok(session) => session,
            Err(err) => {
                warn!(path = %settings.token_path.display(), "starting signed out: {err}");
                SessionStore::new(store)
            }
        };
        let navigator = Arc::new(RouteTracker::new(Route::initial(session.is_authenticated())));

        Self {
            session: Arc::new(session),
            navigator,
            settings,
        }
    }

    fn list_controller(&self, assume_yes: bool) -> Result<EmployeeListController<TerminalDialogs>> {
        let api = self
            .settings
            .api_base()
            .context("invalid directory service URL")?;
        Ok(EmployeeListController::new(
            self.session.clone(),
            Arc::new(HttpDirectoryConnector::new(api)),
            self.navigator.clone(),
            TerminalDialogs::new(Prompter::stdio(), assume_yes),
        ))
    }

    fn signed_out(&self) -> bool {
        self.navigator.current() == Route::Login
    }

    fn failure_hint(&self, last_error: Option<&UiError>) -> Option<&'static str> {
        if self.signed_out() {
            Some(NOT_SIGNED_IN_HINT)
        } else if last_error.is_some_and(UiError::requires_reauth) {
            Some(SESSION_REJECTED_HINT)
        } else {
            None
        }
    }

    /// Explains a failed list operation; the cause itself was already logged.
    fn report_failure(&self, list: &EmployeeListController<TerminalDialogs>) -> u8 {
        if let Some(hint) = self.failure_hint(list.last_error()) {
            eprintln!("{hint}");
        }
        FAILURE
    }

    fn report_mutation(
        &self,
        list: &EmployeeListController<TerminalDialogs>,
        outcome: MutationOutcome,
        done: &str,
    ) -> u8 {
        match outcome {
            MutationOutcome::Applied => {
                println!("{done}");
                SUCCESS
            }
            MutationOutcome::Cancelled => {
                println!("Cancelled.");
                SUCCESS
            }
            MutationOutcome::Invalid(problems) => {
                for problem in problems {
                    eprintln!("{problem}");
                }
                INVALID_INPUT
            }
            MutationOutcome::NotFound => {
                eprintln!("No employee with that id.");
                FAILURE
            }
            MutationOutcome::RedirectedToLogin | MutationOutcome::Failed => self.report_failure(list),
        }
    }

    async fn login(&self, username: Option<String>, password: Option<String>) -> Result<u8> {
        let mut prompter = Prompter::stdio();
        let username = match username {
            Some(username) => username,
            None => prompter.ask("Username", None)?.unwrap_or_default(),
        };
        let password = match password {
            Some(password) => password,
            None => prompter.ask("Password", None)?.unwrap_or_default(),
        };

        let api = self
            .settings
            .api_base()
            .context("invalid directory service URL")?;
        let mut login = LoginController::new(
            HttpAuthenticator::new(api),
            self.session.clone(),
            self.navigator.clone(),
        );
        *login.form_mut() = LoginForm::new(username, password);

        Ok(match login.submit().await {
            LoginOutcome::Blocked => {
                eprintln!("Username and password are required.");
                INVALID_INPUT
            }
            LoginOutcome::LoggedIn => {
                println!("Signed in.");
                SUCCESS
            }
            LoginOutcome::Failed(message) => {
                eprintln!("{message}");
                FAILURE
            }
        })
    }

    /// Needs no directory service, so it works even with a bad API URL.
    async fn logout(&self) -> Result<u8> {
        self.session
            .clear_session()
            .await
            .context("failed to clear the stored session")?;
        self.navigator.navigate(Route::Login);
        println!("Signed out.");
        Ok(SUCCESS)
    }

    async fn list(
        &self,
        search: Option<String>,
        department: Option<String>,
        json: bool,
    ) -> Result<u8> {
        let mut list = self.list_controller(false)?;
        if list.activate().await != ListState::Loaded {
            return Ok(self.report_failure(&list));
        }

        list.set_search_text(search.unwrap_or_default());
        list.set_department(department);

        if json {
            println!("{}", serde_json::to_string_pretty(list.visible())?);
        } else {
            print!("{}", render_table(list.visible()));
            if !list.departments().is_empty() {
                println!("\nDepartments: {}", list.departments().join(", "));
            }
        }
        Ok(SUCCESS)
    }

    async fn show(&self, id: EmployeeId) -> Result<u8> {
        let mut list = self.list_controller(false)?;
        Ok(match list.fetch(&id).await {
            Some(employee) => {
                print!("{}", render_employee(&employee));
                SUCCESS
            }
            None => self.report_failure(&list),
        })
    }

    async fn create(&self, assume_yes: bool) -> Result<u8> {
        let mut list = self.list_controller(assume_yes)?;
        if list.activate().await != ListState::Loaded {
            return Ok(self.report_failure(&list));
        }
        let outcome = list.create().await;
        Ok(self.report_mutation(&list, outcome, "Employee created."))
    }

    async fn edit(&self, id: EmployeeId, assume_yes: bool) -> Result<u8> {
        let mut list = self.list_controller(assume_yes)?;
        if list.activate().await != ListState::Loaded {
            return Ok(self.report_failure(&list));
        }
        let outcome = list.edit_by_id(&id).await;
        Ok(self.report_mutation(&list, outcome, "Employee updated."))
    }

    async fn delete(&self, id: EmployeeId, assume_yes: bool) -> Result<u8> {
        let mut list = self.list_controller(assume_yes)?;
        if list.activate().await != ListState::Loaded {
            return Ok(self.report_failure(&list));
        }
        let outcome = list.delete_by_id(&id).await;
        Ok(self.report_mutation(&list, outcome, "Employee deleted."))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    let app = App::start(resolve_settings(&cli)).await;

    let code = match cli.command {
        Command::Login { username, password } => app.login(username, password).await,
        Command::Logout => app.logout().await,
        Command::List {
            search,
            department,
            json,
        } => app.list(search, department, json).await,
        Command::Show { id } => app.show(EmployeeId::new(id)).await,
        Command::Create { yes } => app.create(yes).await,
        Command::Edit { id, yes } => app.edit(EmployeeId::new(id), yes).await,
        Command::Delete { id, yes } => app.delete(EmployeeId::new(id), yes).await,
    };
    code.map(ExitCode::from)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
