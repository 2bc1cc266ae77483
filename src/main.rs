use anyhow::Context;
use clap::Parser;
use intake_etl::utils::error::ErrorSeverity;
use intake_etl::utils::{logger, validation::Validate};
use intake_etl::{CliConfig, ConfiguredNotifier, EtlEngine, IntakePipeline, LocalStorage, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting intake-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let config = cli.resolve().context("failed to load configuration")?;
    let notifier = ConfiguredNotifier::from_config(&config.notification)
        .context("failed to set up e-mail notifications")?;

    let storage = LocalStorage::new(cli.base_dir.clone());
    let pipeline = IntakePipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline, notifier);

    match engine.run(&cli.incoming_path).await {
        Ok(report) => {
            tracing::info!("✅ Intake completed successfully!");
            if cli.log_format == LogFormat::Json {
                println!("{}", serde_json::to_string(&report)?);
            } else {
                println!("✅ {} processed", report.file_name);
                println!(
                    "📄 {} clean records -> {}",
                    report.clean_records, report.cleaned_path
                );
                println!(
                    "📄 {} bad records -> {}",
                    report.bad_records, report.bad_records_path
                );
                println!("📁 Archived to: {}", report.archive_path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Intake failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

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
