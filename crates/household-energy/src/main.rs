mod bootstrap;
mod render;

use anyhow::Result;
use energy_core::settings::Settings;
use energy_data::analysis::analyze;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    for warning in &settings.startup_warnings {
        tracing::warn!("{}", warning);
    }

    tracing::info!("Household Energy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Fill mode: {}, Period: {}, Output: {}",
        settings.fill_mode,
        settings.period,
        settings.output
    );

    let path = settings.data_file()?;
    let result = analyze(path, settings.fill_mode()?, settings.period()?)?;

    if settings.wants_json() {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::render_report(&result, !settings.no_stats));
    }

    Ok(())
}
