/*!
 * Command-line interface for srcdump
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use srcdump::config::{Args, Config};
use srcdump::exporter::export;
use srcdump::logger;
use srcdump::report::{ReportFormat, Reporter, ScanReport};
use srcdump::settings::SettingsCache;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        clap_complete::generate(shell, &mut Args::command(), "srcdump", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let config = Config::from_args(args);
    logger::init(config.debug);
    debug!("Debug mode enabled.");

    // Resolve the settings file once for this run
    let mut settings = SettingsCache::new();
    let filter = settings.resolve(&config.config_path);

    let progress = if config.quiet {
        ProgressBar::hidden()
    } else {
        let progress = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) ⏱️  Elapsed: {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);
        progress.enable_steady_tick(Duration::from_millis(100));
        progress.set_prefix("📊 Exporting");
        progress
    };

    let start_time = Instant::now();
    let result = export(&config, &filter, Arc::new(progress.clone()));
    progress.finish_and_clear();

    let exported = match result {
        Ok(exported) => exported,
        Err(e) => {
            error!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !config.quiet {
        let report = ScanReport::new(&exported, &config.output_file, start_time.elapsed());
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    }

    ExitCode::SUCCESS
}
