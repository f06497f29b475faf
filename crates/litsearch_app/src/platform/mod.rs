mod app;
mod cli;
mod effects;
mod headless;
mod logging;
mod settings;
mod ui;

use anyhow::Result;
use search_logging::search_info;

pub use cli::Cli;

use logging::LogDestination;
use settings::Settings;

pub fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    settings.apply_cli(&cli);

    let destination = if cli.headless {
        LogDestination::Both
    } else {
        LogDestination::File
    };
    logging::initialize(destination, &settings.log_file);
    search_info!(
        "litsearch starting: endpoint={} export_dir={}",
        settings.endpoint,
        settings.export_dir.display()
    );

    let start = cli.start_inputs(&settings);
    if cli.headless {
        headless::run(&settings, start, cli.export)
    } else {
        app::run(&settings, start)
    }
}
