use clap::Parser;
use tabular_report::core::ConfigProvider;
use tabular_report::utils::error::{ErrorSeverity, ReportError};
use tabular_report::utils::{logger, validation::Validate};
use tabular_report::{CliConfig, LocalStorage, ReportEngine, ReportPipeline, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting tabular-report CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(config) => run(config).await,
                Err(e) => Err(e),
            }
        }
        None => run(cli).await,
    };

    match result {
        Ok(paths) => {
            println!("Report completed, {} file(s) written", paths.len());
            for path in paths {
                println!("  {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "Report failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", e.user_friendly_message());
            eprintln!("Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run<C>(config: C) -> Result<Vec<String>, ReportError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    tracing::info!(
        "Reporting '{}' from {} into {}",
        config.title(),
        config.input_path(),
        config.output_path()
    );

    let storage = LocalStorage::new(".");
    let pipeline = ReportPipeline::new(storage, config);
    ReportEngine::new(pipeline).run().await
}
