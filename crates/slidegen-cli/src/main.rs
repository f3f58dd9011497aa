use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Deserialize;
use slidegen_ai::GenerationPipeline;
use slidegen_core::{ConfigManager, LoggingConfig};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "slidegen")]
#[command(about = "SlideGen CLI - AI outlines and slide layouts", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (json, pretty)
    #[arg(short, long, global = true, default_value = "pretty")]
    output: OutputFormat,

    /// Configuration file (defaults to ./.slidegen.toml or ~/.slidegen/config.toml)
    #[arg(short, long, global = true, env = "SLIDEGEN_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a presentation outline from a prompt
    Outline {
        /// Topic or description of the presentation
        prompt: String,
    },

    /// Generate slide layouts for outline points
    Layouts {
        /// File with a JSON outline, a JSON array or one point per line
        #[arg(short = 'f', long, conflicts_with = "points")]
        outline_file: Option<PathBuf>,

        /// Outline points
        points: Vec<String>,
    },

    /// Check the configured models
    Models {
        /// Also run a short generation through the model pair
        #[arg(long)]
        smoke_test: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Target path (defaults to ~/.slidegen/config.toml)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match execute_command(&cli).await {
        Ok(output) => {
            print_output(&cli.output, &output)?;
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<serde_json::Value> {
    if let Commands::InitConfig { path } = &cli.command {
        return execute_init_config(path.as_deref());
    }

    let manager = match &cli.config {
        Some(path) => ConfigManager::load_from(path),
        None => ConfigManager::load(),
    }
    .context("Failed to load configuration")?;

    init_tracing(&manager.config().logging, cli.verbose);
    if let Some(path) = manager.config_path() {
        debug!(path = %path.display(), "Using configuration file");
    }

    let pipeline = GenerationPipeline::from_config(manager.config())
        .context("Failed to initialize model providers")?;

    match &cli.command {
        Commands::Outline { prompt } => {
            let outcome = pipeline.generate_outline(prompt).await?;
            Ok(serde_json::to_value(outcome)?)
        }
        Commands::Layouts {
            outline_file,
            points,
        } => {
            let outline = match outline_file {
                Some(path) => read_outline_file(path)?,
                None => points.clone(),
            };
            if outline.is_empty() {
                bail!("Provide outline points or --outline-file");
            }
            let outcome = pipeline.generate_slide_layouts(&outline).await?;
            Ok(serde_json::to_value(outcome)?)
        }
        Commands::Models { smoke_test } => {
            let models = pipeline.check_models().await;
            let mut value = serde_json::json!({ "models": models });
            if *smoke_test {
                let report = pipeline.smoke_test().await?;
                value["smokeTest"] = serde_json::to_value(report)?;
            }
            Ok(value)
        }
        Commands::InitConfig { path } => execute_init_config(path.as_deref()),
    }
}

fn execute_init_config(path: Option<&Path>) -> Result<serde_json::Value> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => ConfigManager::user_config_path()
            .context("Could not determine the home directory")?,
    };
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    ConfigManager::create_default_config(&path).context("Failed to write configuration")?;
    Ok(serde_json::json!({
        "path": path.display().to_string(),
        "status": "created",
    }))
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { logging.level.as_str() };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match logging.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };
    // A subscriber may already be installed
    result.ok();
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OutlineFile {
    Points(Vec<String>),
    Wrapped { outline: Vec<String> },
}

fn read_outline_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_outline(&content))
}

fn parse_outline(content: &str) -> Vec<String> {
    match serde_json::from_str::<OutlineFile>(content) {
        Ok(OutlineFile::Points(points)) | Ok(OutlineFile::Wrapped { outline: points }) => points,
        Err(_) => content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

fn print_output(format: &OutputFormat, value: &serde_json::Value) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Pretty => {
            print_pretty(value);
        }
    }
    Ok(())
}

fn print_pretty(value: &serde_json::Value) {
    if let Some(model) = value.get("modelUsed").and_then(|m| m.as_str()) {
        println!("{}: {}", "model".cyan().bold(), model.green());
    }

    if let Some(outline) = value.get("outline").and_then(|o| o.as_array()) {
        for (i, point) in outline.iter().enumerate() {
            println!("{:>3}. {}", i + 1, point.as_str().unwrap_or_default());
        }
        return;
    }

    if let Some(slides) = value.get("slides").and_then(|s| s.as_array()) {
        for slide in slides {
            let order = slide.get("slideOrder").and_then(|o| o.as_u64()).unwrap_or(0);
            let name = slide.get("slideName").and_then(|n| n.as_str()).unwrap_or("");
            let kind = slide.get("type").and_then(|k| k.as_str()).unwrap_or("");
            println!("{:>3}. {} {}", order, name.bold(), format!("({})", kind).dimmed());
        }
        return;
    }

    if let Some(models) = value.get("models").and_then(|m| m.as_array()) {
        for model in models {
            let available = model
                .get("available")
                .and_then(|a| a.as_bool())
                .unwrap_or(false);
            let marker = if available { "✓".green() } else { "✗".red() };
            println!(
                "{} {:<8} {} / {} {}",
                marker,
                model.get("role").and_then(|r| r.as_str()).unwrap_or(""),
                model.get("provider").and_then(|p| p.as_str()).unwrap_or(""),
                model.get("model").and_then(|m| m.as_str()).unwrap_or(""),
                format!(
                    "({} token context)",
                    model.get("context_window").and_then(|c| c.as_u64()).unwrap_or(0)
                )
                .dimmed()
            );
        }
        if let Some(report) = value.get("smokeTest") {
            println!(
                "{}: {}",
                "smoke test".cyan().bold(),
                report.get("preview").and_then(|p| p.as_str()).unwrap_or("")
            );
        }
        return;
    }

    if let serde_json::Value::Object(map) = value {
        for (key, val) in map {
            match val {
                serde_json::Value::String(s) => println!("{}: {}", key.cyan().bold(), s.green()),
                _ => println!("{}: {}", key.cyan().bold(), val),
            }
        }
    }
}
