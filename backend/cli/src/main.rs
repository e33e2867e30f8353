mod doctor_cmd;
mod output;
mod runtime;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use truthlens_config::{
    config_dir, config_file_path, ensure_valid, load_with_report, log_report, redact,
    TruthLensConfig, ValidationReport,
};
use truthlens_core::{data_url, ImageAnalysis};
use truthlens_gateway::{start_server, GatewayState};
use truthlens_logging::{init_console_logger, init_logger};
use truthlens_panel::ResultView;

use output::{render_pairs, render_result, supports_color};
use runtime::{platform_rules, Runtime};

#[derive(Parser)]
#[command(name = "truthlens")]
#[command(about = "TruthLens: fake-news detection over OCR and an LLM classifier")]
#[command(version)]
struct Cli {
    /// Path to the config file (default: ~/.truthlens/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(long)]
        bind: Option<String>,
    },
    /// Classify a piece of text
    AnalyzeText {
        text: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Extract text from an image file and classify it
    AnalyzeImage {
        path: PathBuf,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Query a running gateway's health endpoint
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Check the config for problems
    Doctor,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective config with secrets masked
    Show,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    match cli.command {
        Commands::Config {
            command: ConfigCommands::Path,
        } => {
            println!("{}", config_path.display());
            Ok(())
        }
        Commands::Doctor => {
            if !doctor_cmd::run(&config_path).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        command => {
            let (config, report) = load_with_report(&config_path).await?;
            run(command, config, &report, &config_path).await
        }
    }
}

async fn run(
    command: Commands,
    config: TruthLensConfig,
    report: &ValidationReport,
    config_path: &Path,
) -> Result<()> {
    // Install logging before reporting so config warnings reach it.
    let logging = config.logging();
    match (&command, &logging.dir) {
        (Commands::Serve { .. }, Some(dir)) => init_logger(dir, logging.level()),
        _ => init_console_logger(logging.level()),
    }
    log_report(report);
    ensure_valid(report, config_path)?;

    match command {
        Commands::Serve { port, bind } => serve(config, port, bind).await,
        Commands::AnalyzeText { text, json } => {
            let runtime = Runtime::start(&config)?;
            let result = runtime.client().analyze_text(&text).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                let view = ResultView::from_result(&result);
                print!("{}", render_result(&view, result.verdict, result.confidence, supports_color()));
            }
            Ok(())
        }
        Commands::AnalyzeImage { path, json } => {
            let image = read_image_data_url(&path).await?;
            let runtime = Runtime::start(&config)?;
            let analysis = runtime.client().analyze_image(&image).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print!("{}", render_image_analysis(&analysis));
            }
            Ok(())
        }
        Commands::Status { port } => status(&config, port).await,
        Commands::Config {
            command: ConfigCommands::Show,
        } => {
            println!("# {}", config_path.display());
            let value = redact(&serde_json::to_value(&config)?);
            print!("{}", serde_yaml::to_string(&value)?);
            Ok(())
        }
        Commands::Config {
            command: ConfigCommands::Path,
        }
        | Commands::Doctor => Ok(()),
    }
}

async fn serve(config: TruthLensConfig, port: Option<u16>, bind: Option<String>) -> Result<()> {
    let gateway = config.gateway();
    let bind = bind.unwrap_or_else(|| gateway.bind().to_string());
    let port = port.unwrap_or(gateway.port());
    let addr = bind_addr(&bind, port)?;

    info!(addr = %addr, "Starting TruthLens gateway");
    let runtime = Runtime::start(&config)?;
    let state = GatewayState::new(
        runtime.coordinator.clone(),
        runtime.client(),
        runtime.bus.relay_sender(),
    )
    .with_platform_rules(platform_rules(&config));
    start_server(addr, state, gateway.cors_permissive()).await
}

/// Join a bind host and port. IPv6 hosts are accepted with or without brackets.
fn bind_addr(bind: &str, port: u16) -> Result<SocketAddr> {
    let host = bind.trim_start_matches('[').trim_end_matches(']');
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    Ok(SocketAddr::new(ip, port))
}

async fn status(config: &TruthLensConfig, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.gateway().port());
    let url = format!("http://127.0.0.1:{port}/api/health");
    match reqwest::get(&url).await {
        Ok(resp) => {
            let body: serde_json::Value = resp.json().await?;
            let rows: Vec<(&str, String)> = ["status", "version", "ocrProvider", "classifierProvider", "uptimeSeconds"]
                .into_iter()
                .map(|key| (key, display_value(&body[key])))
                .collect();
            println!("\n📊 TruthLens Status\n");
            print!("{}", render_pairs(&rows, supports_color()));
        }
        Err(_) => println!("TruthLens is not running on port {port}"),
    }
    Ok(())
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

/// Read an image file as a data URL, typed by its extension.
async fn read_image_data_url(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read image {}", path.display()))?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    Ok(data_url::encode(data_url::mime_for_extension(ext), &bytes))
}

fn render_image_analysis(analysis: &ImageAnalysis) -> String {
    let result = analysis.result();
    let view = ResultView {
        extracted_text: Some(analysis.extracted_text.clone()).filter(|t| !t.is_empty()),
        ..ResultView::from_result(&result)
    };
    render_result(&view, result.verdict, result.confidence, supports_color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use truthlens_core::{AnalysisResult, Verdict};

    #[test]
    fn cli_parses_global_config_and_subcommands() {
        let cli = Cli::try_parse_from(["truthlens", "--config", "/tmp/c.yaml", "serve", "-p", "9000"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.yaml")));
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000), bind: None }));

        let cli = Cli::try_parse_from(["truthlens", "analyze-text", "claim", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::AnalyzeText { json: true, .. }));

        let cli = Cli::try_parse_from(["truthlens", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config { command: ConfigCommands::Show }));
    }

    #[test]
    fn bind_accepts_ipv4_and_ipv6_hosts() {
        assert_eq!(bind_addr("127.0.0.1", 8080).unwrap().to_string(), "127.0.0.1:8080");
        assert_eq!(bind_addr("::1", 8080).unwrap().to_string(), "[::1]:8080");
        assert_eq!(bind_addr("[::]", 9000).unwrap().to_string(), "[::]:9000");
        assert!(bind_addr("localhost", 8080).is_err());
    }

    #[tokio::test]
    async fn image_file_becomes_typed_data_url() {
        let path = std::env::temp_dir().join(format!("truthlens-cli-{}.jpg", std::process::id()));
        tokio::fs::write(&path, [0xff, 0xd8, 0xff]).await.unwrap();
        let url = read_image_data_url(&path).await.unwrap();
        assert_eq!(url, "data:image/jpeg;base64,/9j/");
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn image_card_shows_extracted_text() {
        let analysis = ImageAnalysis::new("Salt water cures colds", AnalysisResult::new(Verdict::Fake, 70, "No evidence."));
        let card = output::strip_ansi(&render_image_analysis(&analysis));
        assert!(card.starts_with("Extracted text:\n  \"Salt water cures colds\""));
        assert!(card.contains("FAKE"));
    }
}
