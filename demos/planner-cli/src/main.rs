use std::io::Read;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use invoker::{ChatProvider, Completion, CompletionRequest, OpenAiCompatProvider};
use tracing::debug;

const SYSTEM_PROMPT: &str = "You are an expert planning assistant. When given a problem, output a structured plan in PDDL format with actions and explanations.";

const RULER_WIDTH: usize = 80;

#[derive(Parser, Debug)]
#[command(name = "planner-cli")]
#[command(about = "Generate planning solutions using the PDDL model", long_about = None)]
#[command(version)]
#[command(after_help = "Examples:\n  planner-cli \"I need to organize a conference with 100 attendees\"\n  planner-cli --temperature 0.7 \"Plan a 7-day trip to Japan\"\n  planner-cli --interactive")]
struct Cli {
    /// The planning problem to solve
    prompt: Option<String>,

    /// Read the problem from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Sampling temperature
    #[arg(short, long, default_value_t = 0.5)]
    temperature: f32,

    /// Maximum tokens to generate
    #[arg(short, long, default_value_t = 10_000)]
    max_tokens: u32,

    /// Print the raw provider response as JSON
    #[arg(long)]
    raw: bool,

    /// Also print the plan split into ratable steps
    #[arg(long)]
    steps: bool,

    #[arg(long, env = "FIREWORKS_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "MODEL_API_URL", default_value = "https://api.fireworks.ai/inference/v1/chat/completions")]
    api_url: String,

    #[arg(long, env = "MODEL_ID", default_value = "accounts/colin-fbf68a/models/pddl-gpt-oss-model")]
    model: String,

    /// Seconds before the model call is abandoned
    #[arg(long, env = "MODEL_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let prompt = match (&cli.prompt, cli.interactive) {
        (Some(p), false) => p.clone(),
        _ => read_prompt()?,
    };
    if prompt.trim().is_empty() {
        bail!("no prompt provided");
    }

    let provider = OpenAiCompatProvider::new(
        cli.api_url.clone(),
        Some(cli.api_key.clone()),
        cli.model.clone(),
        Duration::from_secs(cli.timeout_secs),
    )
    .context("Failed to build model client")?;

    eprintln!("Generating plan...");
    debug!(model = %cli.model, temperature = cli.temperature, max_tokens = cli.max_tokens, "request");

    let completion = provider
        .complete(&CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: prompt.trim().to_string(),
            max_tokens: cli.max_tokens,
            temperature: cli.temperature,
        })
        .await
        .context("Error calling API")?;

    if cli.raw {
        println!("{}", serde_json::to_string_pretty(&completion.raw)?);
    } else {
        print_result(&completion);
    }

    if cli.steps {
        print_steps(&completion.content);
    }

    Ok(())
}

fn read_prompt() -> Result<String> {
    eprintln!("PDDL Planner - Interactive Mode");
    eprintln!("{}", "-".repeat(40));
    eprintln!("Enter your planning problem (press Ctrl+D when done):\n");
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read prompt from stdin")?;
    Ok(buf)
}

fn ruler(c: char) -> String {
    c.to_string().repeat(RULER_WIDTH)
}

fn count(v: Option<u64>) -> String {
    v.map_or_else(|| "N/A".to_string(), |n| n.to_string())
}

fn print_result(completion: &Completion) {
    println!("\n{}", ruler('='));
    println!("PDDL PLANNING RESULT");
    println!("{}\n", ruler('='));
    println!("{}", completion.content);

    let usage = &completion.usage;
    println!("\n{}", ruler('-'));
    println!("USAGE STATISTICS");
    println!("{}", ruler('-'));
    println!("Prompt tokens:     {}", count(usage.prompt_tokens));
    println!("Completion tokens: {}", count(usage.completion_tokens));
    println!("Total tokens:      {}", count(usage.total_tokens));
    println!("\n{}\n", ruler('='));
}

fn print_steps(plan: &str) {
    let steps = segment::segment(plan);
    println!("{}", ruler('-'));
    println!("STEPS ({})", steps.len());
    println!("{}", ruler('-'));
    for step in &steps {
        match &step.section {
            Some(section) => println!("\n[{}] {}", step.number, section),
            None => println!("\n[{}]", step.number),
        }
        println!("{}", step.content);
    }
    println!();
}
