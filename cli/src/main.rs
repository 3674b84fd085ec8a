//! DocDesk CLI
//!
//! Command-line interface for the DocDesk document management API.
//!
//! # Usage
//!
//! ```bash
//! docdesk session login --token "$TOKEN"
//! docdesk doc-types list
//! docdesk doc-types create --name Invoice --field "Total:currency:required"
//! docdesk documents create --type 3 --file invoice.pdf --set "Total=12.50"
//! docdesk documents list --type 3 --search lease --sort created --desc
//! docdesk documents send --document 8 --to ana@example.com --subject "Invoice"
//! docdesk roles list --format json
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "docdesk")]
#[command(author = "DocDesk")]
#[command(version)]
#[command(about = "DocDesk Command Line Interface", long_about = None)]
struct Cli {
    /// API base URL; overrides the environment's default
    #[arg(long, env = "DOCDESK_API_URL", global = true)]
    api_url: Option<String>,

    /// Session token
    #[arg(long, env = "DOCDESK_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Backend environment (development or production)
    #[arg(long = "env", env = "DOCDESK_ENV", global = true)]
    environment: Option<String>,

    /// Output format
    #[arg(long, short, global = true)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short, global = true)]
    profile: Option<String>,

    /// Log requests (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and out
    Session {
        #[command(subcommand)]
        action: SessionCommands,
    },
    /// Manage document types
    DocTypes {
        #[command(subcommand)]
        action: DocTypeCommands,
    },
    /// Manage documents
    Documents {
        #[command(subcommand)]
        action: DocumentCommands,
    },
    /// List companies
    Companies {
        #[command(subcommand)]
        action: CompanyCommands,
    },
    /// Manage contacts
    Contacts {
        #[command(subcommand)]
        action: ContactCommands,
    },
    /// Manage roles and permissions
    Roles {
        #[command(subcommand)]
        action: RoleCommands,
    },
    /// List users
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Store a session token after checking it with the backend
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
enum DocTypeCommands {
    /// List document types
    List,
    /// Show a document type with its fields
    Show { id: String },
    /// Create a document type
    Create {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        alias: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// NAME:TYPE[:LENGTH][:required][:opt1|opt2]
        #[arg(long = "field")]
        fields: Vec<String>,
        /// YAML or JSON definition file
        #[arg(long, short = 'd')]
        definition: Option<std::path::PathBuf>,
    },
    /// Edit a document type
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        alias: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// NAME:TYPE[:LENGTH][:required][:opt1|opt2]
        #[arg(long = "add-field")]
        add_fields: Vec<String>,
        #[arg(long = "remove-field")]
        remove_fields: Vec<String>,
        /// FIELD=OPTION appended to an enumeration field
        #[arg(long = "add-option")]
        add_options: Vec<String>,
        /// Replace the whole field list from a definition file
        #[arg(long, short = 'd')]
        definition: Option<std::path::PathBuf>,
    },
}

#[derive(Subcommand)]
enum DocumentCommands {
    /// List documents of a type
    List {
        #[arg(long = "type")]
        type_id: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<commands::documents::SortArg>,
        #[arg(long)]
        desc: bool,
    },
    /// Show a document with its values
    Show { id: String },
    /// Upload a new document
    Create {
        #[arg(long = "type")]
        type_id: String,
        #[arg(long)]
        file: std::path::PathBuf,
        /// FIELD=VALUE
        #[arg(long = "set")]
        values: Vec<String>,
        #[arg(long = "company")]
        companies: Vec<String>,
    },
    /// Edit a stored document
    Edit {
        id: String,
        /// Replace the stored file
        #[arg(long)]
        file: Option<std::path::PathBuf>,
        /// FIELD=VALUE
        #[arg(long = "set")]
        values: Vec<String>,
        /// Toggle a company association
        #[arg(long = "company")]
        companies: Vec<String>,
    },
    /// Email documents
    Send {
        #[arg(long = "document", required = true)]
        documents: Vec<String>,
        #[arg(long)]
        from: Option<String>,
        /// Comma separated addresses
        #[arg(long)]
        to: Vec<String>,
        /// Comma separated addresses
        #[arg(long = "recipient")]
        recipients: Vec<String>,
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "")]
        message: String,
        #[arg(long)]
        company: Option<String>,
    },
}

#[derive(Subcommand)]
enum CompanyCommands {
    /// List companies
    List,
}

#[derive(Subcommand)]
enum ContactCommands {
    /// List contacts of a user (the signed-in user by default)
    List {
        #[arg(long)]
        user: Option<String>,
    },
    /// Create a contact
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },
    /// Update a contact
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        company: Option<String>,
    },
}

#[derive(Subcommand)]
enum RoleCommands {
    /// List roles
    List,
    /// List permissions
    Permissions,
    /// Create a role
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
    /// Edit a role
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        /// Toggle a permission
        #[arg(long = "permission")]
        permissions: Vec<String>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "docdesk_forms=debug,docdesk_sdk=debug,info",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli { api_url, token, environment, format, profile, command, .. } = cli;

    // Config commands work without a usable client
    let command = match command {
        Commands::Config { action } => return commands::config::handle(action, profile.as_deref()),
        other => other,
    };

    let config = config::Config::load(profile.as_deref()).unwrap_or_default();
    let settings = commands::Settings {
        api_url: api_url.or(config.api_url),
        token: token.or(config.token),
        environment: environment.or(config.environment),
        format: format
            .or_else(|| config.default_format.as_deref().and_then(output::OutputFormat::parse))
            .unwrap_or_default(),
        profile,
    };
    let ctx = commands::Context::new(settings)?;

    match command {
        Commands::Session { action } => commands::session::handle(action, &ctx).await,
        Commands::DocTypes { action } => commands::doc_types::handle(action, &ctx).await,
        Commands::Documents { action } => commands::documents::handle(action, &ctx).await,
        Commands::Companies { action } => commands::directory::companies(action, &ctx).await,
        Commands::Contacts { action } => commands::directory::contacts(action, &ctx).await,
        Commands::Roles { action } => commands::directory::roles(action, &ctx).await,
        Commands::Users { action } => commands::directory::users(action, &ctx).await,
        Commands::Config { action } => commands::config::handle(action, ctx.profile()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
