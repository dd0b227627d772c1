//! Hadi Books CLI - the admin console from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in; the session is kept in HB_SESSION_FILE
//! hb-admin login -e admin@hadibooks.pk -p secret
//!
//! # Browse the catalog
//! hb-admin products list --search tolstoy --page 2
//!
//! # Approve an uploaded payment proof
//! hb-admin orders verify-payment 65f1c0 approve
//!
//! # Walk through the forgotten-password flow
//! hb-admin reset-password
//! ```
//!
//! # Environment Variables
//!
//! - `HB_BACKEND_URL` - Store backend origin (required)
//! - `HB_LOG_JSON` - Emit logs as JSON when set
//! - `RUST_LOG` - Log filter, defaults to `hadi_books_admin=info,hadi_books_cli=info`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hadi_books_admin::listing::PaymentDecision;
use hadi_books_admin::{Console, ConsoleConfig};
use hadi_books_core::{OrderStatus, PaymentStatus};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "hb-admin")]
#[command(author, version, about = "Hadi Books admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in as an admin
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Manage the catalog
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Manage storefront hero images
    Hero {
        #[command(subcommand)]
        action: HeroAction,
    },
    /// Edit your own profile
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Show catalog and order figures
    Dashboard,
    /// Reset a forgotten password (interactive)
    ResetPassword,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Search term (two characters or more)
        #[arg(long)]
        search: Option<String>,

        /// Category filter (two characters or more)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one product with its reviews
    Show { id: String },
    /// Add a product from a JSON file
    Add {
        /// Product fields as JSON
        #[arg(long)]
        json: PathBuf,

        /// Cover image (250KB max)
        #[arg(long)]
        image: PathBuf,
    },
    /// Update a product from a JSON file of changed fields
    Update {
        id: String,

        #[arg(long)]
        json: PathBuf,

        /// Replacement cover image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Flip a product between in stock and out of stock
    ToggleAvailability { id: String },
    /// Flip a product's bestseller flag
    ToggleBestseller { id: String },
    /// Delete a product
    Delete { id: String },
}

#[derive(Subcommand)]
enum OrderAction {
    /// List orders
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Order status (`pending`, `confirmed`, `processing`, ...)
        #[arg(long)]
        status: Option<OrderStatus>,

        /// Payment status (`paid`, `not_paid`, `pending`, `failed`)
        #[arg(long)]
        payment_status: Option<PaymentStatus>,

        /// Order id, customer name, email or mobile number
        #[arg(long)]
        search: Option<String>,
    },
    /// Change an order's status
    SetStatus { id: String, status: OrderStatus },
    /// Set shipping details on an order
    SetDetails {
        id: String,

        #[arg(long)]
        tracking_id: Option<String>,

        #[arg(long)]
        shipping_method: Option<String>,

        #[arg(long)]
        estimated_delivery: Option<String>,
    },
    /// Approve or reject an uploaded payment proof
    VerifyPayment {
        id: String,

        /// `approve` or `reject`
        decision: PaymentDecision,
    },
}

#[derive(Subcommand)]
enum HeroAction {
    /// List hero images
    List,
    /// Upload a hero image
    Add {
        #[arg(long)]
        image: PathBuf,

        #[arg(long, default_value = "")]
        alt: String,
    },
    /// Change a hero image's alt text or file
    Update {
        id: String,

        #[arg(long)]
        image: Option<PathBuf>,

        #[arg(long)]
        alt: Option<String>,
    },
    /// Flip a hero image between active and inactive
    Toggle { id: String },
    /// Delete a hero image
    Delete { id: String },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Change name, email, password or picture
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        password: Option<String>,

        /// New profile picture
        #[arg(long)]
        picture: Option<PathBuf>,
    },
    /// Remove the profile picture
    RemovePicture,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hadi_books_admin=info,hadi_books_cli=info".into());

    let json = std::env::var_os("HB_LOG_JSON").is_some();
    // Logs go to stderr; stdout carries command output
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Sentry before tracing so the layer has a client to report to
    let config = ConsoleConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ConsoleConfig) -> Result<(), commands::CliError> {
    let console = Console::with_session_file(config)?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&console, &email, SecretString::from(password)).await?;
        }
        Commands::Logout => commands::auth::logout(&console).await?,
        Commands::ResetPassword => commands::reset::run(&console).await?,
        command => {
            commands::restore_session(&console).await?;
            dispatch(&console, command).await?;
        }
    }
    Ok(())
}

/// Commands that need a signed-in admin.
async fn dispatch(console: &Console, command: Commands) -> Result<(), commands::CliError> {
    match command {
        Commands::Whoami => commands::auth::whoami(console)?,
        Commands::Products { action } => match action {
            ProductAction::List {
                page,
                search,
                category,
            } => commands::products::list(console, page, search, category).await?,
            ProductAction::Show { id } => commands::products::show(console, &id).await?,
            ProductAction::Add { json, image } => {
                commands::products::add(console, &json, &image).await?;
            }
            ProductAction::Update { id, json, image } => {
                commands::products::update(console, &id, &json, image.as_deref()).await?;
            }
            ProductAction::ToggleAvailability { id } => {
                commands::products::toggle_availability(console, &id).await?;
            }
            ProductAction::ToggleBestseller { id } => {
                commands::products::toggle_bestseller(console, &id).await?;
            }
            ProductAction::Delete { id } => commands::products::delete(console, &id).await?,
        },
        Commands::Orders { action } => match action {
            OrderAction::List {
                page,
                status,
                payment_status,
                search,
            } => commands::orders::list(console, page, status, payment_status, search).await?,
            OrderAction::SetStatus { id, status } => {
                commands::orders::set_status(console, &id, status).await?;
            }
            OrderAction::SetDetails {
                id,
                tracking_id,
                shipping_method,
                estimated_delivery,
            } => {
                let details = hadi_books_admin::listing::ShippingDetails {
                    tracking_id,
                    shipping_method,
                    estimated_delivery,
                };
                commands::orders::set_details(console, &id, details).await?;
            }
            OrderAction::VerifyPayment { id, decision } => {
                commands::orders::verify_payment(console, &id, decision).await?;
            }
        },
        Commands::Hero { action } => match action {
            HeroAction::List => commands::hero::list(console).await?,
            HeroAction::Add { image, alt } => commands::hero::add(console, &image, &alt).await?,
            HeroAction::Update { id, image, alt } => {
                commands::hero::update(console, &id, image.as_deref(), alt).await?;
            }
            HeroAction::Toggle { id } => commands::hero::toggle(console, &id).await?,
            HeroAction::Delete { id } => commands::hero::delete(console, &id).await?,
        },
        Commands::Profile { action } => match action {
            ProfileAction::Update {
                name,
                email,
                password,
                picture,
            } => commands::profile::update(console, name, email, password, picture).await?,
            ProfileAction::RemovePicture => commands::profile::remove_picture(console).await?,
        },
        Commands::Dashboard => commands::dashboard::show(console).await?,
        Commands::Login { .. } | Commands::Logout | Commands::ResetPassword => {}
    }
    Ok(())
}
