use crate::cli::args::{Cli, Commands};
use crate::error::Result;
use crate::models::Dataset;
use crate::processors::{AggregationPipeline, Dashboard, IntegrityChecker};
use crate::readers::{DatasetLoader, InvalidRows, TableReader};
use crate::settings::Settings;
use crate::utils::filename::generate_default_snapshot_filename;
use crate::utils::logging::init_logging;
use crate::utils::progress::ProgressReporter;
use crate::writers::JsonWriter;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = resolve_settings(&cli)?;
    // Validation reports bad rows instead of dropping them
    let invalid_rows = match cli.command {
        Commands::Validate { strict: true } => InvalidRows::Reject,
        Commands::Validate { strict: false } => InvalidRows::Keep,
        _ => InvalidRows::Skip,
    };
    let dataset = load_dataset(&settings, invalid_rows, cli.quiet).await?;

    let pipeline = AggregationPipeline::from_dataset(dataset);
    let writer = JsonWriter::new().with_pretty(cli.pretty);
    let output = cli.output.as_deref();
    let selected = |state: Option<String>| state.unwrap_or_else(|| settings.dashboard.default_state.clone());

    match cli.command {
        Commands::States => {
            emit(&writer, &pipeline.states(), output)?;
        }

        Commands::Current { state } => {
            let state = selected(state);
            emit(&writer, &pipeline.latest_reading(&state)?, output)?;
        }

        Commands::Hourly { state } => {
            let state = selected(state);
            emit(&writer, &pipeline.hourly_series(&state)?, output)?;
        }

        Commands::Forecast { state } => {
            let state = selected(state);
            emit(&writer, &pipeline.forecast_series(&state)?, output)?;
        }

        Commands::Heatmap { state, pollutant } => {
            let state = selected(state);
            let grid = pipeline.month_day_heatmap_by_code(&state, &pollutant)?;
            info!(state = %state, pollutant = %grid.pollutant, cells = grid.len(), "Heatmap computed");
            emit(&writer, &grid, output)?;
        }

        Commands::Dashboard { state, save } => {
            let state = selected(state);
            let dashboard = Dashboard::new(pipeline, settings.max_workers)?;
            let snapshot = dashboard.on_selection_changed(&state)?;

            let default_path;
            let target = match output {
                Some(path) => Some(path),
                None if save => {
                    default_path = generate_default_snapshot_filename(&state);
                    Some(default_path.as_path())
                }
                None => None,
            };
            emit(&writer, &snapshot, target)?;
        }

        Commands::Choropleth => {
            emit(&writer, &pipeline.state_temperatures(), output)?;
        }

        Commands::Validate { .. } => {
            let checker = IntegrityChecker::new();
            let report = checker.check_integrity(pipeline.dataset());

            println!("{}", checker.generate_summary(&report));

            if report.is_clean() {
                println!("✅ All tables passed integrity checks");
            } else {
                println!("⚠️  Found {} integrity issues", report.violations.len());
            }
        }
    }

    Ok(())
}

/// Settings from file and environment, with command-line flags on top
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;

    if let Some(path) = &cli.live {
        settings.data.live_path = path.clone();
    }
    if let Some(path) = &cli.aqi_history {
        settings.data.aqi_history_path = path.clone();
    }
    if let Some(path) = &cli.forecast {
        settings.data.forecast_path = path.clone();
    }
    if cli.mmap {
        settings.data.use_mmap = true;
    }
    if let Some(workers) = cli.max_workers {
        settings.max_workers = workers.max(1);
    }

    Ok(settings)
}

async fn load_dataset(
    settings: &Settings,
    invalid_rows: InvalidRows,
    quiet: bool,
) -> Result<Dataset> {
    let progress = ProgressReporter::new_spinner("Loading weather and air-quality tables...", quiet);

    let reader = TableReader::new()
        .with_mmap(settings.data.use_mmap)
        .with_invalid_rows(invalid_rows);
    let loader = DatasetLoader::from_settings(&settings.data).with_reader(reader);

    match loader.load().await {
        Ok(dataset) => {
            progress.finish_and_clear();
            if dataset.live().is_empty() {
                warn!("Live observation table is empty; no states to select");
            }
            Ok(dataset)
        }
        Err(e) => {
            progress.finish_with_message("Failed to load tables");
            Err(e)
        }
    }
}

fn emit<T>(writer: &JsonWriter, value: &T, output: Option<&Path>) -> Result<()>
where
    T: Serialize + ?Sized,
{
    match output {
        Some(path) => {
            let info = writer.write_file(value, path)?;
            info!("{}", info.summary());
        }
        None => writer.write_to(value, std::io::stdout().lock())?,
    }
    Ok(())
}
