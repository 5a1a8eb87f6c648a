use crate::config::RunConfig;
use chrono::Local;
use simplelog::*;
use std::fs::File;
use std::io;

/// `log_<date>_<time>.txt`
pub fn log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Terminal logger, plus a timestamped file logger in the output directory
/// when `log_to_file` is set.
///
/// A logger that is already installed is left in place. Fails when the log
/// file cannot be created.
pub fn init_logger(config: &RunConfig) -> io::Result<()> {
    let level = config.log_level;
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if config.log_to_file {
        let path = config.output_dir.join(log_file_name());
        let file = File::create(&path)?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }
    let _ = CombinedLogger::init(loggers);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn log_file_name_has_timestamp() {
        let re = Regex::new(r"^log_\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}\.txt$").unwrap();
        assert!(re.is_match(&log_file_name()));
    }

    #[test]
    fn init_twice_is_harmless() {
        let config = RunConfig::default();
        init_logger(&config).unwrap();
        init_logger(&config).unwrap();
        log::info!("logger initialised");
    }

    #[test]
    fn missing_log_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::default()
            .with_output_dir(&dir.path().join("missing").join("dir"))
            .with_log_to_file(true);
        assert!(init_logger(&config).is_err());
    }
}
