use std::path::PathBuf;

use clap::{Parser, Subcommand};
use client::app::{App, AppError};
use client::config::{ClientConfig, ConfigError};
use client::net::ApiError;
use client::pages::login::LoginForm;
use client::pages::register::RegisterPage;
use client::pages::verify_email::VerifyEmailPage;
use client::pages::{Outcome, TITLE_ERROR, dashboard};
use client::state::nav::{ActiveTree, AppRoute, AuthRoute, GateState};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("startup failed: {0}")]
    App(#[from] AppError),
    #[error("lookup failed: {0}")]
    Api(#[from] ApiError),
    #[error("a session is already active; run `climaguard logout` first")]
    SessionActive,
    #[error("no active session")]
    NoSession,
    #[error("unknown province: {0} (see `climaguard provinces`)")]
    UnknownProvince(String),
    #[error("unknown city in {province}: {city} (see `climaguard localities`)")]
    UnknownCity { province: String, city: String },
    #[error("{0}")]
    Rejected(String),
}

#[derive(Parser, Debug)]
#[command(name = "climaguard", about = "ClimaGuard account client")]
struct Cli {
    /// Auth service base URL (overrides CLIMAGUARD_AUTH_URL).
    #[arg(long)]
    auth_url: Option<String>,

    /// Georef base URL (overrides CLIMAGUARD_GEO_URL).
    #[arg(long)]
    geo_url: Option<String>,

    /// Where the session marker is kept (overrides CLIMAGUARD_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which route tree is active.
    Status,
    /// Create an account. Province and city must match the georef listings.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        province: String,
        #[arg(long)]
        city: String,
        #[arg(long, env = "CLIMAGUARD_PASSWORD")]
        password: String,
    },
    /// Submit the 6-digit code emailed after registration.
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },
    /// Email a fresh verification code.
    Resend {
        #[arg(long)]
        email: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLIMAGUARD_PASSWORD")]
        password: String,
    },
    Logout,
    /// List provinces.
    Provinces,
    /// List localities of a province.
    Localities { province: String },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let mut app = App::from_config(&config)?;
    let state = app.start();
    tracing::debug!(?state, data_dir = %config.data_dir.display(), "session loaded");

    match cli.command {
        Command::Status => {
            print_tree(app.gate().tree());
            Ok(())
        }
        Command::Register { name, email, province, city, password } => {
            require_signed_out(&app)?;
            let mut page = RegisterPage::new();
            pick_location(&app, &mut page, &province, &city).await?;
            page.draft.name = name;
            page.draft.email = email;
            page.draft.password = password;
            let outcome = page.submit(app.auth()).await;
            render(&mut app, outcome)
        }
        Command::Verify { email, code } => {
            require_signed_out(&app)?;
            let mut page = VerifyEmailPage::new(email);
            page.enter_code(&code);
            let outcome = page.submit(app.auth()).await;
            render(&mut app, outcome)
        }
        Command::Resend { email } => {
            require_signed_out(&app)?;
            let outcome = VerifyEmailPage::new(email).resend(app.auth()).await;
            render(&mut app, outcome)
        }
        Command::Login { email, password } => {
            require_signed_out(&app)?;
            let mut form = LoginForm { email, password, ..LoginForm::new() };
            let session = app.session().clone();
            let outcome = form.submit(app.auth(), &session).await;
            render(&mut app, outcome)
        }
        Command::Logout => {
            if app.gate().state() != GateState::Authenticated {
                return Err(CliError::NoSession);
            }
            let session = app.session().clone();
            let outcome = dashboard::logout(app.auth(), &session).await;
            render(&mut app, outcome)
        }
        Command::Provinces => {
            for province in app.geo().provinces().await? {
                println!("{}", province.name);
            }
            Ok(())
        }
        Command::Localities { province } => {
            let mut page = RegisterPage::new();
            if let Some(alert) = page.choose_province(app.geo(), &province).await {
                return Err(CliError::Rejected(alert.message));
            }
            for locality in page.localities() {
                println!("{}", locality.name);
            }
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.auth_url {
        config = config.with_auth_base_url(url)?;
    }
    if let Some(url) = &cli.geo_url {
        config = config.with_geo_base_url(url)?;
    }
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir.clone());
    }
    Ok(config)
}

/// Fill the province and city pickers the way the register screen does,
/// using the listed spelling of each name.
async fn pick_location(app: &App, page: &mut RegisterPage, province: &str, city: &str) -> Result<(), CliError> {
    if let Some(alert) = page.load_provinces(app.geo()).await {
        return Err(CliError::Rejected(alert.message));
    }
    let listed = page
        .province_named(province)
        .map(|p| p.name.clone())
        .ok_or_else(|| CliError::UnknownProvince(province.to_owned()))?;

    if let Some(alert) = page.choose_province(app.geo(), &listed).await {
        return Err(CliError::Rejected(alert.message));
    }
    let city_name = page
        .locality_named(city)
        .map(|l| l.name.clone())
        .ok_or_else(|| CliError::UnknownCity { province: listed, city: city.to_owned() })?;
    page.select_city(&city_name);
    Ok(())
}

fn require_signed_out(app: &App) -> Result<(), CliError> {
    if app.gate().state() == GateState::Authenticated {
        return Err(CliError::SessionActive);
    }
    Ok(())
}

/// Show an outcome the way the mobile screens would: the alert first, then
/// whatever screen comes next.
fn render(app: &mut App, outcome: Outcome) -> Result<(), CliError> {
    if let Some(alert) = &outcome.alert {
        println!("[{}] {}", alert.title, alert.message);
    }
    if let Some(route) = outcome.navigate {
        if let Some(stack) = app.gate_mut().auth_stack_mut() {
            stack.navigate(route);
        }
    }
    if app.gate_mut().refresh() {
        tracing::debug!(state = ?app.gate().state(), "gate switched after action");
    }
    print_tree(app.gate().tree());

    match outcome.alert {
        Some(alert) if alert.title == TITLE_ERROR => Err(CliError::Rejected(alert.message)),
        _ => Ok(()),
    }
}

fn print_tree(tree: &ActiveTree) {
    match tree {
        ActiveTree::Loading => println!("-> cargando"),
        ActiveTree::Auth(stack) => println!("-> {}", auth_route_label(stack.current())),
        ActiveTree::App(stack) => match stack.current() {
            AppRoute::Dashboard => println!("-> {}", dashboard::TITLE),
        },
    }
}

fn auth_route_label(route: &AuthRoute) -> String {
    match route {
        AuthRoute::Home => "Bienvenida".to_owned(),
        AuthRoute::Login => "Iniciar sesión".to_owned(),
        AuthRoute::Register => "Registro".to_owned(),
        AuthRoute::VerifyEmail { email } => format!("Verificación de email ({email})"),
    }
}
