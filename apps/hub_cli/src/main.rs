mod render;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use employee_client::{
    apply_filters, compute_stats, load_settings, Authenticator, ClientSettings, EmployeeApi,
    EmployeeFilters, EmployeeStore, GenderFilter, HttpEmployeeApi, MockAuthenticator,
    SessionStore, StatusFilter,
};
use shared::domain::{encode_profile_image, Credentials, EmployeeFormData, EmployeeId, Gender};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "employee-hub", about = "Manage employee records")]
struct Cli {
    /// Overrides the configured endpoint base url.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    /// Dashboard totals, gender split and top states.
    Stats {
        /// Print the stats as JSON instead of the dashboard text.
        #[arg(long)]
        json: bool,
    },
    List(FilterArgs),
    /// Printable listing of the filtered view.
    Print(FilterArgs),
    Show {
        id: i64,
    },
    Add(AddArgs),
    Update(UpdateArgs),
    Toggle {
        id: i64,
    },
    Delete {
        id: i64,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum GenderArg {
    Male,
    Female,
    Other,
}

impl From<GenderArg> for Gender {
    fn from(value: GenderArg) -> Self {
        match value {
            GenderArg::Male => Gender::Male,
            GenderArg::Female => Gender::Female,
            GenderArg::Other => Gender::Other,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum GenderFilterArg {
    #[default]
    All,
    Male,
    Female,
    Other,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum StatusFilterArg {
    #[default]
    All,
    Active,
    Inactive,
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, value_enum, default_value_t)]
    gender: GenderFilterArg,
    #[arg(long, value_enum, default_value_t)]
    status: StatusFilterArg,
}

impl FilterArgs {
    fn to_filters(&self) -> EmployeeFilters {
        EmployeeFilters {
            search: self.search.clone(),
            gender: match self.gender {
                GenderFilterArg::All => GenderFilter::All,
                GenderFilterArg::Male => GenderFilter::Male,
                GenderFilterArg::Female => GenderFilter::Female,
                GenderFilterArg::Other => GenderFilter::Other,
            },
            status: match self.status {
                StatusFilterArg::All => StatusFilter::All,
                StatusFilterArg::Active => StatusFilter::Active,
                StatusFilterArg::Inactive => StatusFilter::Inactive,
            },
        }
    }
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long, value_enum)]
    gender: GenderArg,
    /// Date of birth, YYYY-MM-DD.
    #[arg(long)]
    dob: NaiveDate,
    #[arg(long)]
    state: String,
    #[arg(long)]
    inactive: bool,
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    id: i64,
    #[arg(long)]
    name: Option<String>,
    #[arg(long, value_enum)]
    gender: Option<GenderArg>,
    #[arg(long)]
    dob: Option<NaiveDate>,
    #[arg(long)]
    state: Option<String>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long, conflicts_with = "clear_image")]
    image: Option<PathBuf>,
    #[arg(long)]
    clear_image: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings()?;
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint_url = endpoint;
    }
    debug!(?settings, "settings loaded");

    let mut session = SessionStore::load(&settings.session_path).await?;

    match cli.command {
        Command::Login { email, password } => {
            let authenticator = MockAuthenticator::new(settings.auth_latency());
            let user = authenticator
                .login(&Credentials { email, password })
                .await?;
            let greeting = format!("Signed in as {} <{}>", user.name, user.email);
            session.login_success(user).await?;
            println!("{greeting}");
        }
        Command::Logout => {
            session.logout().await?;
            println!("Signed out");
        }
        Command::Whoami => match session.current_user() {
            Some(user) => println!("{} <{}>", user.name, user.email),
            None => println!("Not signed in"),
        },
        command => {
            if !session.is_authenticated() {
                bail!("not signed in; run `employee-hub login` first");
            }
            let api = Arc::new(connect(&settings)?);
            let store = EmployeeStore::new(api.clone());
            run_records_command(command, &settings, api.as_ref(), &store).await?;
        }
    }

    Ok(())
}

fn connect(settings: &ClientSettings) -> Result<HttpEmployeeApi> {
    let endpoint = settings.endpoint()?;
    HttpEmployeeApi::new(&endpoint, settings.request_timeout())
        .context("failed to build http client")
}

async fn run_records_command(
    command: Command,
    settings: &ClientSettings,
    api: &dyn EmployeeApi,
    store: &EmployeeStore,
) -> Result<()> {
    let load_failed = || {
        format!(
            "Failed to load employees from {}; make sure the JSON server is running",
            settings.endpoint_url
        )
    };

    match command {
        Command::Stats { json } => {
            let employees = store.get_employees().await.with_context(load_failed)?;
            let stats = compute_stats(&employees);
            if json {
                println!("{}", render::stats_json(&stats)?);
            } else {
                print!("{}", render::dashboard(&stats));
            }
        }
        Command::List(args) => {
            let employees = store.get_employees().await.with_context(load_failed)?;
            let visible = apply_filters(&employees, &args.to_filters());
            match render::empty_state(employees.len(), visible.len()) {
                Some(message) => println!("{message}"),
                None => print!("{}", render::summary_lines(&visible, employees.len())),
            }
        }
        Command::Print(args) => {
            let employees = store.get_employees().await.with_context(load_failed)?;
            let visible = apply_filters(&employees, &args.to_filters());
            match render::empty_state(employees.len(), visible.len()) {
                Some(message) => println!("{message}"),
                None => print!("{}", render::employee_list(&visible)),
            }
        }
        Command::Show { id } => {
            let employee = api
                .get_by_id(EmployeeId(id))
                .await
                .with_context(|| format!("Failed to load employee #{id}"))?;
            print!("{}", render::employee_card(&employee));
        }
        Command::Add(args) => {
            let mut data =
                EmployeeFormData::new(args.name, args.gender.into(), args.dob, args.state)
                    .with_active(!args.inactive);
            if let Some(path) = &args.image {
                data.profile_image = read_profile_image(path).await?;
            }
            let created = store
                .add_employee(&data)
                .await
                .context("Failed to add employee")?;
            println!("Employee added successfully (#{})", created.id);
        }
        Command::Update(args) => {
            let id = EmployeeId(args.id);
            let current = api
                .get_by_id(id)
                .await
                .with_context(|| format!("Failed to load employee #{id}"))?;
            let mut data = EmployeeFormData::from(&current);
            if let Some(name) = args.name {
                data.full_name = name;
            }
            if let Some(gender) = args.gender {
                data.gender = gender.into();
            }
            if let Some(dob) = args.dob {
                data.date_of_birth = dob;
            }
            if let Some(state) = args.state {
                data.state = state;
            }
            if let Some(active) = args.active {
                data.is_active = active;
            }
            if args.clear_image {
                data.profile_image.clear();
            }
            if let Some(path) = &args.image {
                data.profile_image = read_profile_image(path).await?;
            }
            store
                .update_employee(id, &data)
                .await
                .context("Failed to update employee")?;
            println!("Employee updated successfully");
        }
        Command::Toggle { id } => {
            let employees = store.get_employees().await.with_context(load_failed)?;
            let Some(employee) = employees.iter().find(|e| e.id.0 == id) else {
                bail!("employee #{id} not found");
            };
            let updated = store
                .toggle_active(employee)
                .await
                .context("Failed to update employee")?;
            println!("Employee #{} is now {}", updated.id, updated.status_label());
        }
        Command::Delete { id } => {
            store
                .remove_employee(EmployeeId(id))
                .await
                .context("Failed to delete employee")?;
            println!("Employee deleted successfully");
        }
        Command::Login { .. } | Command::Logout | Command::Whoami => {
            bail!("session commands do not talk to the endpoint")
        }
    }
    Ok(())
}

async fn read_profile_image(path: &Path) -> Result<String> {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        bail!("'{}' does not look like an image ({mime})", path.display());
    }
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Ok(encode_profile_image(mime.essence_str(), &bytes))
}
