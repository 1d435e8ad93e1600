//! admin-console: operator CLI for the admin backend
//!
//! Signs in, inspects resources and downloads exports using the same
//! client, session store and guard the console itself uses.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console_client::{
    ApiError, ClientConfig, GuardOutcome, HttpClient, LoginOutcome, Query, Resource, SessionGuard,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "admin-console", about = "Admin console command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend base URL override
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Finish sign-in with a one-time code
    Verify {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
    },

    /// Send a fresh one-time code
    ResendCode {
        #[arg(long)]
        email: String,
    },

    /// Show the signed-in identity
    Whoami,

    /// Sign out and forget the stored credential
    Logout,

    /// Check whether a protected path would render
    Check {
        /// Path of the protected view
        path: String,
    },

    /// List a resource
    List {
        /// Resource name, e.g. products or gift-config
        resource: Resource,

        /// Query filters as key=value, repeatable
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
    },

    /// Download the orders spreadsheet
    ExportOrders {
        /// Output file; defaults to the server-suggested name
        #[arg(long)]
        out: Option<PathBuf>,

        /// Order status filter
        #[arg(long)]
        status: Option<String>,
    },
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

/// Surface the sentence meant for people, keep details in the log
fn friendly(err: ApiError) -> anyhow::Error {
    tracing::debug!(code = %err.code, status = err.status, message = %err.message, "Request failed");
    anyhow::anyhow!(err.friendly_message)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "console_client=info,admin_console=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env().context("Invalid configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let client = config
        .build_http_client(config.file_session())
        .context("Failed to build HTTP client")?;
    tracing::debug!(base_url = %client.base_url(), "Client ready");

    run(cli.command, client).await
}

async fn run(command: Command, client: HttpClient) -> Result<()> {
    match command {
        Command::Login { email, password } => match client.login(&email, &password).await.map_err(friendly)? {
            LoginOutcome::SignedIn(identity) => println!("Signed in as {}", display_name(&identity)),
            LoginOutcome::OtpRequired { message } => {
                println!(
                    "{}",
                    message.unwrap_or_else(|| "A verification code was sent to your email.".to_string())
                );
                println!("Run `admin-console verify --email {email} --code <CODE>` to finish.");
            }
        },
        Command::Verify { email, code } => {
            let identity = client.verify_otp(&email, &code).await.map_err(friendly)?;
            println!("Signed in as {}", display_name(&identity));
        }
        Command::ResendCode { email } => {
            client.resend_otp(&email).await.map_err(friendly)?;
            println!("A new verification code was sent.");
        }
        Command::Whoami => {
            let identity = client.me().await.map_err(friendly)?;
            println!("{} ({})", display_name(&identity), identity.role);
        }
        Command::Logout => {
            client.logout().await;
            println!("Signed out");
        }
        Command::Check { path } => {
            let session = client.session().clone();
            let guard = SessionGuard::new(session, Arc::new(client));
            match guard.evaluate(&path).await {
                GuardOutcome::Render(identity) => println!("allowed: {}", display_name(&identity)),
                other => println!("redirect: {}", other.location().unwrap_or_default()),
            }
        }
        Command::List { resource, filters } => {
            let query: Query = filters.into_iter().collect();
            let page = client.list(resource, query).await.map_err(friendly)?;
            for item in &page.items {
                println!("{item}");
            }
            eprintln!("{} of {} {}", page.items.len(), page.total, resource.label());
        }
        Command::ExportOrders { out, status } => {
            let query = Query::new().with("status", status);
            let file = client.export_orders(query).await.map_err(friendly)?;
            let target = out.unwrap_or_else(|| PathBuf::from(&file.file_name));
            tokio::fs::write(&target, &file.bytes)
                .await
                .with_context(|| format!("Failed to write {}", target.display()))?;
            println!("Saved {} ({} bytes)", target.display(), file.bytes.len());
        }
    }
    Ok(())
}

fn display_name(identity: &console_client::Identity) -> &str {
    identity
        .name
        .as_deref()
        .or(identity.email.as_deref())
        .unwrap_or(&identity.id)
}
