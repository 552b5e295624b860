use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::domain::flow::FlowEnv;
use crate::infra::config::Config;
use crate::MaestroClient;

#[derive(Parser)]
#[command(name = "maestro-mcp-client")]
#[command(about = "Run Maestro flows through `maestro mcp`")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List devices visible to Maestro
    Devices {
        /// Device to resolve instead of the first connected one
        #[arg(short, long)]
        device: Option<String>,
    },
    /// Run a flow file on a device
    RunFlow {
        /// Path to the flow YAML
        file: PathBuf,
        /// Target device id (defaults to the first connected device)
        #[arg(short, long)]
        device: Option<String>,
        /// Environment variable passed to the flow, as KEY=VALUE
        #[arg(short, long = "env", value_parser = parse_env_pair)]
        env: Vec<(String, String)>,
    },
    /// Show the effective configuration
    Config {
        /// Also check that the configured Maestro executable can be found
        #[arg(long)]
        validate: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command)
}

pub fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Devices { device } => match list_devices(device.as_deref()) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Listing devices failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::RunFlow { file, device, env } => match run_flow(&file, device.as_deref(), env) {
            Ok(_) => {
                println!("✅ Flow passed");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Flow failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate } => match show_config().and_then(|cfg| {
            if validate {
                validate_config(&cfg)?;
            }
            Ok(())
        }) {
            Ok(_) if validate => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_owned(), value.to_owned())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn list_devices(device: Option<&str>) -> anyhow::Result<()> {
    let mut client = MaestroClient::start(device)?;
    let devices = client.devices()?;
    println!("📱 {} device(s):", devices.len());
    for d in &devices {
        let id = d.device_id.as_str();
        let marker = if id == client.default_device() { "*" } else { " " };
        let state = if d.is_connected() { "connected" } else { "disconnected" };
        println!(" {} {} ({})", marker, id, state);
    }
    client.close();
    Ok(())
}

fn run_flow(file: &std::path::Path, device: Option<&str>, env: Vec<(String, String)>) -> anyhow::Result<()> {
    let env: FlowEnv = env.into_iter().collect();
    let mut client = MaestroClient::start(device)?;
    let result = client.run_flow_file(file, &env);
    client.close();
    println!("{}", result?);
    Ok(())
}

fn show_config() -> anyhow::Result<Config> {
    let cfg = Config::load()?;
    println!("📋 Configuration:");
    println!("  Command: {}", cfg.command);
    println!(
        "  Device: {}",
        cfg.device_id.as_deref().unwrap_or("first connected")
    );
    println!("  Client: {} {}", cfg.client_name, cfg.client_version);
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );
    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<std::path::PathBuf> {
    let program = &cfg.command.program;
    let path = which::which(program)
        .map_err(|e| anyhow::anyhow!("cannot find `{}`: {}. Is the Maestro CLI installed and on PATH?", program, e))?;
    println!("  Executable: {}", path.display());
    Ok(path)
}
