use anyhow::Context;
use clap::Parser;
use food_scanner::analyzer::{FoodAnalyzer, OpenAiEndpoint, PendingCapture};
use food_scanner::capture::{self, ImagePayload};
use food_scanner::{cli, config, error, picker, report_view};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, ScannerError};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "food_scanner=debug" } else { "food_scanner=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load().context("failed to load configuration")?;

    if let Err(failure) = run(cli.command, config).await {
        let e = &failure.error;
        tracing::error!(category = e.category(), error = %e, "command failed");
        eprintln!("\n✖ {}", e.user_message());
        if e.suggests_file_picker() {
            eprintln!("  Use `food-scanner analyze --pick <PASTA>` para escolher uma foto.");
        }
        if failure.kept_for_retry {
            eprintln!("  A foto foi guardada. Use `food-scanner retry` para tentar de novo.");
        }
        std::process::exit(1);
    }

    Ok(())
}

/// A failed command, and whether its photo is waiting for `retry`
struct Failure {
    error: ScannerError,
    kept_for_retry: bool,
}

impl From<ScannerError> for Failure {
    fn from(error: ScannerError) -> Self {
        Self {
            error,
            kept_for_retry: false,
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        ScannerError::from(error).into()
    }
}

async fn run(command: Commands, config: Config) -> std::result::Result<(), Failure> {
    match command {
        Commands::Analyze { image, pick, output } => {
            println!("🍽  food-scanner - análise de refeição\n");

            let path = match image {
                Some(path) => path,
                None => {
                    let folder = pick.unwrap_or_else(|| PathBuf::from("."));
                    let images = picker::scan_folder(&folder)?;
                    if images.is_empty() {
                        println!("Nenhuma foto encontrada em {}", folder.display());
                        return Ok(());
                    }
                    match picker::pick_interactive(&images)? {
                        Some(path) => path,
                        None => {
                            println!("Nenhuma foto selecionada.");
                            return Ok(());
                        }
                    }
                }
            };

            let payload = capture::load_from_file(&path, &config.encode_options()).await?;
            println!("✔ Foto carregada: {} ({}x{})\n", path.display(), payload.width, payload.height);

            let analyzer = build_analyzer(&config)?;
            analyze_and_report(&analyzer, &payload, output.as_deref()).await?;
        }

        Commands::Capture { facing, save, no_analyze, output } => {
            println!("📷 food-scanner - captura\n");

            let camera = config.camera();
            let mut stream = capture::acquire_camera_stream(&camera, facing, config.jpeg_quality).await?;
            let captured = stream.capture_frame().await;
            stream.release();
            let payload = captured?;
            println!("✔ Foto capturada ({}x{})", payload.width, payload.height);

            if let Some(path) = save {
                std::fs::write(&path, &payload.bytes)?;
                println!("✔ Foto salva: {}", path.display());
            }

            if no_analyze {
                return Ok(());
            }

            println!();
            let analyzer = build_analyzer(&config)?;
            analyze_and_report(&analyzer, &payload, output.as_deref()).await?;
        }

        Commands::Retry { output } => {
            let dir = Config::cache_dir()?;
            let Some(pending) = PendingCapture::load(&dir) else {
                println!("Nenhuma análise pendente.");
                return Ok(());
            };

            println!("🔁 food-scanner - nova tentativa\n");
            println!(
                "Foto de {} ({}), falha anterior: {}\n",
                pending.saved_at, pending.source, pending.last_error
            );

            let payload = pending.payload()?;
            let analyzer = build_analyzer(&config)?;
            analyze_and_report(&analyzer, &payload, output.as_deref()).await?;
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ Chave da API definida");
            }

            if show {
                println!("Configuração:");
                println!("  Endpoint: {}", config.api_base_url);
                println!("  Modelo: {}", config.model);
                println!("  Tempo limite: {}s", config.timeout_seconds);
                println!("  Tamanho máximo da imagem: {}px", config.max_image_size);
                println!("  Câmera: {}", config.camera.program);
                println!(
                    "  Chave da API: {}",
                    if config.get_api_key().is_ok() { "definida" } else { "não definida" }
                );
            }
        }
    }

    Ok(())
}

fn build_analyzer(config: &Config) -> Result<FoodAnalyzer> {
    let endpoint = OpenAiEndpoint::new(&config.api_base_url, config.get_api_key()?)?;
    Ok(FoodAnalyzer::new(Arc::new(endpoint), config.analysis_settings()))
}

/// Run one analysis, keep the photo on failure and print the report on success
async fn analyze_and_report(
    analyzer: &FoodAnalyzer,
    payload: &ImagePayload,
    output: Option<&Path>,
) -> std::result::Result<(), Failure> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Analisando a refeição...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = analyzer.analyze(payload).await;
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(error) => {
            let kept_for_retry = PendingCapture::keep_after_failure(Config::cache_dir(), payload, &error);
            return Err(Failure {
                error,
                kept_for_retry,
            });
        }
    };

    PendingCapture::discard_after_success(Config::cache_dir());

    println!("{}", report_view::render(&report));

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report).map_err(ScannerError::from)?;
        std::fs::write(path, json)?;
        println!("✔ Relatório salvo: {}", path.display());
    }

    Ok(())
}
