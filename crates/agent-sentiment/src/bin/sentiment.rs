//! Portfolio sentiment CLI
//!
//! # Usage
//!
//! ```bash
//! export ANTHROPIC_API_KEY="sk-ant-..."
//!
//! # One-shot analysis
//! cargo run --bin sentiment -- analyze "AAPL, MSFT, NVDA"
//! cargo run --bin sentiment -- analyze --preset tech --period 6mo
//!
//! # Environment check
//! cargo run --bin sentiment -- check
//!
//! # Interactive session
//! cargo run --bin sentiment -- interactive
//! ```

use agent_sentiment::diagnostics::{self, NETWORK_PROBE_URL};
use agent_sentiment::presets::{self, PRESETS};
use agent_sentiment::repl::ReplCommand;
use agent_sentiment::{LookbackPeriod, PortfolioAnalyzer, SentimentConfig};
use agent_utils::{LogFormat, init_tracing};
use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const DEFAULT_LOG_DIRECTIVE: &str = "warn,agent_sentiment=info,agent_runtime=info";

#[derive(Debug, Parser)]
#[command(name = "sentiment", version, about = "Portfolio sentiment analysis from market data and news")]
struct Cli {
    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a portfolio and print the markdown report
    Analyze {
        /// Tickers, comma separated ("AAPL, MSFT") or as separate arguments
        #[arg(num_args = 0.., conflicts_with = "preset")]
        tickers: Vec<String>,

        /// Analyze a named preset instead (see `presets`)
        #[arg(long)]
        preset: Option<String>,

        /// Lookback period for price history (1mo, 3mo, 6mo, 1y, ...)
        #[arg(long)]
        period: Option<LookbackPeriod>,
    },
    /// Check market data access, the API key, and network reachability
    Check,
    /// List the preset portfolios
    Presets,
    /// Read ticker lists line by line
    Interactive {
        /// Lookback period for price history
        #[arg(long)]
        period: Option<LookbackPeriod>,
    },
}

fn load_config(period: Option<LookbackPeriod>) -> anyhow::Result<SentimentConfig> {
    let mut builder = SentimentConfig::builder();
    if let Some(period) = period {
        builder = builder.period(period);
    }
    builder
        .with_env()?
        .build()
        .context("Invalid configuration")
}

fn print_presets() {
    println!("Preset portfolios:");
    for preset in PRESETS {
        println!("  {:<10} {:<12} {}", preset.name, preset.label, preset.tickers);
    }
}

async fn run_check(config: &SentimentConfig) -> anyhow::Result<()> {
    let analyzer = PortfolioAnalyzer::from_config(config.clone())?;
    let checks = diagnostics::run_diagnostics(
        analyzer.fetcher(),
        config.anthropic_api_key.is_some(),
        NETWORK_PROBE_URL,
    )
    .await;

    println!("{}", "=".repeat(60));
    println!("DEPENDENCY CHECK");
    println!("{}", "=".repeat(60));
    println!("{}", diagnostics::render(&checks));
    println!("{}", "=".repeat(60));
    Ok(())
}

async fn run_analyze(
    config: SentimentConfig,
    tickers: Vec<String>,
    preset: Option<String>,
) -> anyhow::Result<ExitCode> {
    let request = match preset {
        Some(name) => match presets::find(&name) {
            Some(preset) => preset.tickers.to_string(),
            None => bail!("Unknown preset '{name}', run `sentiment presets` for the list"),
        },
        None => tickers.join(","),
    };

    let analyzer = PortfolioAnalyzer::from_config(config)?;
    match analyzer.analyze(&request).await {
        Ok(report) => {
            println!("{}", report.to_markdown());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}", e.to_markdown());
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run_interactive(config: SentimentConfig) -> anyhow::Result<()> {
    let has_key = config.anthropic_api_key.is_some();
    let mut analyzer = PortfolioAnalyzer::from_config(config)?;

    println!("Portfolio Sentiment Analysis");
    println!("Enter tickers (e.g. AAPL, MSFT, TSLA) or /help. Period: {}", analyzer.period());
    if !has_key {
        eprintln!("Warning: ANTHROPIC_API_KEY is not set; analyses will fail until it is.");
    }
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("sentiment> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        if input.trim().is_empty() {
            continue;
        }

        let command = match ReplCommand::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{e}\n");
                continue;
            }
        };

        match command {
            ReplCommand::Analyze { tickers } => {
                println!("Analyzing {tickers}...\n");
                println!("{}\n", analyzer.analyze_markdown(&tickers).await);
            }
            ReplCommand::Preset { name } => {
                if let Some(preset) = presets::find(&name) {
                    println!("Analyzing {} ({})...\n", preset.label, preset.tickers);
                    println!("{}\n", analyzer.analyze_markdown(preset.tickers).await);
                }
            }
            ReplCommand::Presets => {
                print_presets();
                println!();
            }
            ReplCommand::Period { period } => {
                analyzer.set_period(period);
                println!("Period set to {period}\n");
            }
            ReplCommand::Check => {
                let checks = diagnostics::run_diagnostics(
                    analyzer.fetcher(),
                    has_key,
                    NETWORK_PROBE_URL,
                )
                .await;
                println!("{}\n", diagnostics::render(&checks));
            }
            ReplCommand::Help => println!("{}", ReplCommand::help_text()),
            ReplCommand::Exit => {
                println!("Goodbye!");
                break;
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_tracing(DEFAULT_LOG_DIRECTIVE, format);

    match cli.command {
        Command::Analyze {
            tickers,
            preset,
            period,
        } => run_analyze(load_config(period)?, tickers, preset).await,
        Command::Check => {
            run_check(&load_config(None)?).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Presets => {
            print_presets();
            Ok(ExitCode::SUCCESS)
        }
        Command::Interactive { period } => {
            run_interactive(load_config(period)?).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
