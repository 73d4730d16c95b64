use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;
use std::path::Path;

/// Resolves the log level.
///
/// An explicit level (e.g. from the command line) wins, then the `RUST_LOG`
/// environment variable, then `info`.
pub fn resolve_level(explicit: Option<&str>) -> LevelFilter {
    let log_level = match explicit {
        Some(level) => level.to_string(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
    };

    log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info)
}

/// Initializes the global logger.
///
/// This function should be called once at the very beginning of the
/// application's `main` function. Logs always go to stderr; when `log_file`
/// is given (the `settings.logging` / `settings.log_file` pair of the
/// simulation config) they are additionally written to that file.
pub fn init(level: LevelFilter, log_file: Option<&Path>) {
    let base_config = Dispatch::new().level(level).level_for("serde", LevelFilter::Warn);

    let console_config = Dispatch::new()
        .format(|out, message, record| {
            let colors = fern::colors::ColoredLevelConfig::new()
                .error(fern::colors::Color::Red)
                .warn(fern::colors::Color::Yellow)
                .info(fern::colors::Color::Green)
                .debug(fern::colors::Color::Blue)
                .trace(fern::colors::Color::BrightBlack);

            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut dispatch = base_config.chain(console_config);

    if let Some(path) = log_file {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Failed to create log directory at '{}': {}", parent.display(), e);
            }
        }

        match fern::log_file(path) {
            Ok(file) => {
                let file_config = Dispatch::new()
                    .format(|out, message, record| {
                        out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.target(), message))
                    })
                    .chain(file);
                dispatch = dispatch.chain(file_config);
            }
            Err(e) => eprintln!("Failed to open log file '{}': {}", path.display(), e),
        }
    }

    dispatch.apply().unwrap_or_else(|e| {
        eprintln!("Failed to apply logger configuration: {}", e);
    });

    match log_file {
        Some(path) => log::debug!("Logger initialized. Logging to console and '{}'.", path.display()),
        None => log::debug!("Logger initialized. Logging to console."),
    }
}
