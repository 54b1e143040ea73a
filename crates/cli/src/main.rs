mod config;
mod error;
mod server;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gateway::{GatewayClient, ToolCatalog};
use runtime::{Calculator, Interpreter, OpenAiBackend, Operation, QueryOrchestrator};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{CONFIG_FILE, Config};
use error::Result;

const DEFAULT_LOG_FILTER: &str = "info,toolproxy=debug";

#[derive(Parser)]
#[command(name = "toolproxy")]
#[command(about = "Resolve free-text queries to gateway tool calls", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Answer a single query and print the response envelope
    Ask {
        query: String,
    },
    /// List the tools advertised by the gateway
    Tools,
    /// Check whether the gateway is reachable
    Health,
    /// Run one calculation through the gateway's calculator tool
    Calc {
        /// add, subtract, multiply or divide
        op: Operation,
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Some(Commands::Serve { bind }) => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            cmd_serve(&config).await
        }
        None => cmd_serve(&config).await,
        Some(Commands::Ask { query }) => cmd_ask(&config, &query).await,
        Some(Commands::Tools) => cmd_tools(&config).await,
        Some(Commands::Health) => cmd_health(&config).await,
        Some(Commands::Calc { op, a, b }) => cmd_calc(&config, op, a, b).await,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn orchestrator(config: &Config) -> Result<QueryOrchestrator<GatewayClient, OpenAiBackend>> {
    let gateway = GatewayClient::new(config.gateway_config())?;
    let interpreter = Interpreter::new(config.llm_backend()?);
    if interpreter.is_simulated() {
        warn!("no LLM api key configured, queries use simulated interpretation");
    } else {
        info!(model = %config.llm.model, "LLM interpretation enabled");
    }
    Ok(QueryOrchestrator::new(gateway, interpreter))
}

async fn cmd_serve(config: &Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let orchestrator = orchestrator(config)?;
    info!(gateway = orchestrator.gateway().base_url(), "using tool gateway");

    let listener = TcpListener::bind(addr).await?;
    server::serve(listener, server::router(orchestrator)).await?;
    Ok(())
}

async fn cmd_ask(config: &Config, query: &str) -> Result<()> {
    let envelope = orchestrator(config)?.handle(query).await?;
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

async fn cmd_tools(config: &Config) -> Result<()> {
    let gateway = GatewayClient::new(config.gateway_config())?;
    let tools = gateway.list_tools().await?;

    if tools.is_empty() {
        println!("No tools advertised.");
        return Ok(());
    }

    for tool in tools {
        println!("{}: {}", tool.name, tool.description);
        for param in &tool.parameters {
            let required = if param.required { " (required)" } else { "" };
            println!(
                "    {} <{}>{required}  {}",
                param.name, param.param_type, param.description
            );
        }
    }
    Ok(())
}

async fn cmd_health(config: &Config) -> Result<()> {
    let gateway = GatewayClient::new(config.gateway_config())?;
    let status = if gateway.is_healthy().await {
        "OK"
    } else {
        "unreachable"
    };
    println!("{}: {status}", gateway.base_url());
    Ok(())
}

async fn cmd_calc(config: &Config, op: Operation, a: f64, b: f64) -> Result<()> {
    let calculator = Calculator::new(GatewayClient::new(config.gateway_config())?);
    let result = calculator.evaluate(op, a, b).await?;
    println!("{a} {op} {b} = {result}");
    Ok(())
}
