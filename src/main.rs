use clap::Parser;
use datafun_analytics::utils::{logger, validation::Validate};
use datafun_analytics::{AnalyticsConfig, CliConfig, LocalStorage, Runner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    if config.monitoring.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Pipelines: Read, Process, Verify, Write (ETVL)");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if config.monitoring_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let runner = Runner::new(LocalStorage::new("."), config);

    if cli.dry_run {
        print_plan(&runner);
        return Ok(());
    }

    tracing::info!("START main()");
    match runner.run().await {
        Ok(summary) => {
            for outcome in &summary.outcomes {
                match &outcome.result {
                    Ok(outputs) => println!(
                        "✅ {} ({:?}): {}",
                        outcome.kind.label(),
                        outcome.elapsed,
                        outputs.join(", ")
                    ),
                    Err(message) => println!("❌ {}: {}", outcome.kind.label(), message),
                }
            }
            if let Some(archive) = &summary.archive {
                println!("📦 Reports archived to: {}", archive);
            }
            tracing::info!("END main()");
            if summary.failed() > 0 {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Pipeline run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn print_plan(runner: &Runner<LocalStorage>) {
    let config: &AnalyticsConfig = runner.config();
    println!("📋 Dry run, nothing will be read or written:");
    println!("  Raw dir: {}", config.paths.raw_dir);
    println!("  Processed dir: {}", config.paths.processed_dir);
    for planned in runner.plan() {
        println!(
            "  {}: {} -> {}",
            planned.kind.label(),
            planned.input,
            planned.outputs.join(", ")
        );
    }
    if config.load.archive.enabled {
        println!("  Archive: {}", config.load.archive.filename);
    }
}
