pub mod config;
pub mod models;
pub mod ndc;
pub mod pipeline;

use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use config::AppConfig;
use pipeline::lookup::LookupError;
use pipeline::processor::{build_processor, ProcessingError, RunOutcome};

/// Initialize tracing to stderr and, when possible, to a timestamped log file
/// under `log_dir`. Returns the log file path.
pub fn init_tracing(log_dir: &Path) -> Option<PathBuf> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()));

    let (log_path, file_layer) = match open_log_file(log_dir) {
        Some((path, file)) => {
            let layer = fmt::layer().with_ansi(false).with_writer(Mutex::new(file));
            (Some(path), Some(layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .try_init()
        .ok();

    log_path
}

fn open_log_file(log_dir: &Path) -> Option<(PathBuf, File)> {
    std::fs::create_dir_all(log_dir).ok()?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = log_dir.join(format!("drugdeck_{stamp}.log"));
    let file = File::create(&path).ok()?;
    Some((path, file))
}

/// Read an NDC from `input`, prompting on `output` first.
pub fn prompt_ndc<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<String> {
    write!(output, "Enter the NDC code: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Configuration file: explicit path, else `DRUGDECK_CONFIG`, else the default.
pub fn config_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os("DRUGDECK_CONFIG").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(config::DEFAULT_CONFIG_PATH))
}

/// Command-line entry point: one NDC per invocation.
pub fn run(config_file: Option<PathBuf>, ndc_arg: Option<String>) -> ExitCode {
    let env_loaded = dotenvy::dotenv().is_ok();
    let log_path = init_tracing(&config::log_dir());

    tracing::info!("======= {} v{} started =======", config::APP_NAME, config::APP_VERSION);
    if let Some(path) = &log_path {
        tracing::info!(path = %path.display(), "Logging to file");
    }
    if env_loaded {
        tracing::info!("Environment variables loaded from .env");
    }

    let config = AppConfig::resolve(&config_path(config_file));

    let raw = match ndc_arg {
        Some(ndc) => ndc,
        None => match prompt_ndc(io::stdin().lock(), io::stdout()) {
            Ok(ndc) => ndc,
            Err(e) => {
                tracing::error!(error = %e, "Cannot read NDC from stdin");
                eprintln!("Could not read the NDC code: {e}");
                return ExitCode::FAILURE;
            }
        },
    };
    if raw.trim().is_empty() {
        eprintln!("No NDC code entered.");
        return ExitCode::FAILURE;
    }

    println!("Searching for drug with NDC: {}", ndc::normalize(&raw));

    let processor = match build_processor(&config) {
        Ok(processor) => processor,
        Err(e) => {
            tracing::error!(error = %e, "Cannot build report processor");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let code = match processor.run(&raw) {
        Ok(outcome) => report_outcome(&outcome),
        Err(ProcessingError::Lookup(LookupError::NotFound(ndc))) => {
            tracing::error!(ndc = %ndc, "No drug information found");
            println!("No drug information found for the provided NDC code.");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Report run failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    };

    tracing::info!("======= {} finished =======", config::APP_NAME);
    code
}

fn report_outcome(outcome: &RunOutcome) -> ExitCode {
    println!(
        "Found drug: {} ({})",
        outcome.drug.brand_name, outcome.drug.generic_name
    );
    if !outcome.label_found {
        println!("No FDA label information found; clinical sections use fallback text.");
    }

    match &outcome.pdf {
        Ok(path) => println!("Drug report generated successfully: {}", path.display()),
        Err(e) => eprintln!("PDF report failed: {e}"),
    }
    match &outcome.json {
        Ok(path) => println!("JSON data saved: {}", path.display()),
        Err(e) => eprintln!("JSON report failed: {e}"),
    }

    if outcome.all_artifacts_written() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
