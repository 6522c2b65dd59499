use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use mira::app::App;
use mira::config::Config;
use mira::lead::{Advance, Field, Submission, WizardState};
use mira::logging;
use mira::rest;
use mira::services::HttpWaitlistClient;

#[derive(Parser)]
#[command(name = "mira")]
#[command(about = "Lead capture wizard and waitlist service for Mira")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the waitlist form interactively (default)
    Form,

    /// Register a lead without the interactive form
    Submit {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        website: String,

        #[arg(long, default_value = "")]
        instagram: String,
    },

    /// Check a single field value
    Validate {
        /// Field name (firstName, lastName, email, website, instagram)
        field: String,

        value: String,
    },

    /// Run the waitlist and blog REST server
    Serve {
        /// Port to listen on (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the OpenAPI document
    ApiDocs {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // The interactive form owns the terminal, so it logs to a file
    let is_tui_mode = matches!(cli.command, None | Some(Commands::Form));
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        None | Some(Commands::Form) => {
            run_form(&config).await?;
            if let Some(path) = logging_handle.log_file_path {
                println!("Log written to {}", path.display());
            }
        }
        Some(Commands::Submit {
            first_name,
            last_name,
            email,
            website,
            instagram,
        }) => {
            cmd_submit(
                &config,
                [
                    (Field::FirstName, first_name),
                    (Field::LastName, last_name),
                    (Field::Email, email),
                    (Field::Website, website),
                    (Field::Instagram, instagram),
                ],
            )
            .await?;
        }
        Some(Commands::Validate { field, value }) => {
            cmd_validate(&config, &field, &value)?;
        }
        Some(Commands::Serve { port }) => {
            cmd_serve(&config, port).await?;
        }
        Some(Commands::ApiDocs { output }) => {
            cmd_api_docs(output)?;
        }
    }

    Ok(())
}

async fn run_form(config: &Config) -> Result<()> {
    let client = HttpWaitlistClient::from_config(&config.waitlist)
        .context("Failed to create waitlist client")?;
    let mut app = App::new(config, Arc::new(client));
    app.run().await
}

async fn cmd_submit(config: &Config, values: [(Field, String); 5]) -> Result<()> {
    let client = HttpWaitlistClient::from_config(&config.waitlist)
        .context("Failed to create waitlist client")?;
    let mut wizard = WizardState::new(config.validator(), config.analytics_sink());

    for (field, value) in values {
        wizard.set_field(field, value);
    }

    // Walk the steps the same way the interactive form does
    loop {
        match wizard.next() {
            Advance::Moved(_) => continue,
            Advance::AtLastStep => break,
            Advance::Blocked => {
                print_field_errors(&wizard);
                std::process::exit(1);
            }
        }
    }

    let outcome = wizard.submit(&client).await.clone();
    match outcome {
        Submission::Succeeded { message } => {
            println!("{}", message);
            Ok(())
        }
        Submission::Failed {
            message,
            error_code,
        } => {
            eprintln!("Error: {}", message);
            if let Some(code) = error_code {
                eprintln!("  ({})", code);
            }
            print_field_errors(&wizard);
            std::process::exit(1);
        }
        Submission::Idle | Submission::InFlight => {
            // Gate failed before any request was sent
            print_field_errors(&wizard);
            std::process::exit(1);
        }
    }
}

fn print_field_errors(wizard: &WizardState) {
    for (field, message) in wizard.field_errors() {
        eprintln!("  {}: {}", field, message);
    }
}

fn cmd_validate(config: &Config, field: &str, value: &str) -> Result<()> {
    let field = field.parse::<Field>().with_context(|| {
        let names: Vec<&str> = Field::all().iter().map(Field::name).collect();
        format!("Expected one of: {}", names.join(", "))
    })?;

    match config.validator().validate(field, value) {
        None => {
            println!("{}: ok", field);
            Ok(())
        }
        Some(message) => {
            eprintln!("{}: {}", field, message);
            std::process::exit(1);
        }
    }
}

async fn cmd_serve(config: &Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server.port);

    println!("Starting waitlist server...");
    println!("  Port: {}", port);
    println!("  Endpoints:");
    println!("    GET    /api/v1/health              Health check");
    println!("    GET    /api/v1/status              Server status");
    println!("    POST   /api/v1/waitlist            Join the waitlist");
    println!("    GET    /api/v1/posts               List published posts");
    println!("    GET    /api/v1/posts/:slug         Get a published post");
    if config.server.admin_token.is_some() {
        println!("    GET    /api/v1/admin/posts         List all posts");
        println!("    POST   /api/v1/admin/posts         Create post");
        println!("    PUT    /api/v1/admin/posts/:id     Update post");
        println!("    DELETE /api/v1/admin/posts/:id     Delete post");
    } else {
        println!("  Admin API disabled (set server.admin_token to enable)");
    }
    println!();

    let state = rest::ApiState::new(config.clone());
    rest::serve(state, port).await
}

fn cmd_api_docs(output: Option<PathBuf>) -> Result<()> {
    let json = rest::ApiDoc::json().context("Failed to generate OpenAPI document")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
