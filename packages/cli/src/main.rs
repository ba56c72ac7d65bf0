use clap::{Parser, Subcommand};
use colored::*;
use std::process;

use codementor_ai::{GeminiConfig, GeminiService};
use codementor_cli::{run_server, Config};

#[derive(Parser)]
#[command(name = "codementor")]
#[command(about = "Codementor - AI code review, code generation and learning roadmaps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server (default)
    Serve,
    /// List the Gemini models available to the configured key
    Models,
    /// Send a single prompt to the configured model and print the reply
    Ping {
        #[arg(default_value = "Reply with the single word: pong")]
        prompt: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command.unwrap_or(Commands::Serve)).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve => {
            let config = Config::from_env()?;
            run_server(config).await
        }
        Commands::Models => list_models().await,
        Commands::Ping { prompt } => ping(&prompt).await,
    }
}

async fn list_models() -> anyhow::Result<()> {
    let service = GeminiService::new(GeminiConfig::from_env())?;
    let models = service.list_models().await?;

    if models.is_empty() {
        println!("{}", "No models available".yellow());
        return Ok(());
    }

    for model in models {
        let supports_generation = model
            .supported_generation_methods
            .iter()
            .any(|m| m == "generateContent");
        let marker = if supports_generation {
            "✓".green()
        } else {
            "-".dimmed()
        };
        println!(
            "{} {} {}",
            marker,
            model.name.bold(),
            model.display_name.unwrap_or_default().dimmed()
        );
    }

    Ok(())
}

async fn ping(prompt: &str) -> anyhow::Result<()> {
    let config = GeminiConfig::from_env();
    let model = config.model.clone();
    let service = GeminiService::new(config)?.with_system_instruction(None);

    let response = service.generate_text(prompt).await?;

    println!("{} {}", "Model:".cyan().bold(), model);
    println!("{}", response.data.trim());
    println!(
        "{} {} in / {} out",
        "Tokens:".cyan().bold(),
        response.usage.input_tokens,
        response.usage.output_tokens
    );

    Ok(())
}
