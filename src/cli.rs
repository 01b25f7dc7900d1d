use crate::config::AppConfig;
use crate::error::AppError;
use crate::forms::{load_form, FormService, FormValues};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    name = "Job Application Form",
    about = "Serve, inspect, and validate the job application form from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Export or check form definitions
    Schema {
        #[command(subcommand)]
        command: SchemaCommand,
    },
    /// Print the controls a renderer would draw, in order
    Render(RenderArgs),
    /// Validate a JSON file of entered values and print the submission payload
    Validate(ValidateArgs),
}

#[derive(Subcommand, Debug)]
enum SchemaCommand {
    /// Print the active form definition as JSON
    Export,
    /// Load a JSON form definition and report every malformation
    Check {
        /// Path to the form definition
        path: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Optional JSON file of entered values used to evaluate visibility
    #[arg(long)]
    values: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// JSON file of entered values keyed by model
    values: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Schema {
            command: SchemaCommand::Export,
        } => export_schema(),
        Command::Schema {
            command: SchemaCommand::Check { path },
        } => check_schema(&path),
        Command::Render(args) => render_form(args),
        Command::Validate(args) => validate_values(args),
    }
}

/// Build the service from `FORM_SCHEMA_PATH` when set, otherwise from the built-in form.
pub(crate) fn form_service(config: &AppConfig) -> Result<FormService, AppError> {
    let policy = config.forms.submission_policy();
    let service = match &config.forms.schema_path {
        Some(path) => FormService::new(Arc::new(load_form(path)?), policy)?,
        None => FormService::job_application(policy)?,
    };
    Ok(service)
}

fn read_values(path: &Path) -> Result<FormValues, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(FormValues::from_json(&raw)?)
}

fn export_schema() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = form_service(&config)?;
    println!("{}", service.schema().to_json()?);
    Ok(())
}

fn check_schema(path: &Path) -> Result<(), AppError> {
    let form = load_form(path)?;
    println!(
        "{}: '{}' is well formed ({} top-level fields)",
        path.display(),
        form.title,
        form.fields.len()
    );
    Ok(())
}

fn render_form(args: RenderArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = form_service(&config)?;
    let values = match args.values {
        Some(path) => read_values(&path)?,
        None => FormValues::default(),
    };

    print!("{}", service.render(&values).to_text());
    Ok(())
}

fn validate_values(args: ValidateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = form_service(&config)?;
    let values = read_values(&args.values)?;

    match service.submit(&values) {
        Ok(submission) => {
            println!("All shown fields are valid. Submission payload:");
            println!("{}", serde_json::to_string_pretty(&submission)?);
            Ok(())
        }
        Err(err) => {
            println!("Validation failed");
            for violation in &err.report().violations {
                println!(
                    "- {} [{}]: {}",
                    violation.model,
                    violation.constraint.name(),
                    violation.message
                );
            }
            Err(err.into())
        }
    }
}
