use crate::{application::Application, config::Config};

mod abs;
mod application;
mod config;
mod error;
mod fps;
mod geometry;
mod input;
mod logging;
mod shader_manager;

fn main() {
    let (config, source) = match Config::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = logging::init_logging(&config.log_level, config.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }
    match source {
        Some(path) => log::info!("Using configuration from {}", path.display()),
        None => log::info!("No configuration file found, using defaults"),
    }

    let result = Application::new(config).and_then(|mut app| app.run());
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(e.exit_code());
    }
}
