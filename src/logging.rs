use crate::Context;
use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt};

pub const DEFAULT_LOG_DIR_NAME: &str = "sr_automator_logs";

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: tracing::Level,
    pub logging_enabled: bool,
    pub logger_name: String,
    /// Directory for the rolling log files. Defaults to `sr_automator_logs` in the working directory.
    pub log_dir: Option<PathBuf>,
    pub log_to_file: bool,
}

impl LoggingConfig {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            logging_enabled: true,
            logger_name: "sr_automator".to_string(),
            log_dir: None,
            log_to_file: true,
        }
    }
}

impl LoggingConfig {
    /// Installs the process-wide subscriber. Only the first successful call takes effect;
    /// later calls leave the installed subscriber in place.
    pub fn load_logger(&mut self) -> crate::Result<()> {
        if !self.logging_enabled {
            return Ok(());
        }
        let file_layer = if self.log_to_file {
            let log_dir = self.resolve_log_dir()?;
            let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
                .rotation(tracing_appender::rolling::Rotation::HOURLY)
                .max_log_files(6)
                .filename_prefix(&self.logger_name)
                .filename_suffix("log")
                .build(&log_dir)
                .with_context(|| format!("failed to create log appender in {}", log_dir.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(false)
                    .with_writer(file_appender),
            )
        } else {
            None
        };

        let filter = tracing_subscriber::EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.level).into())
            .from_env_lossy();

        let terminal_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_ansi(true)
            .with_writer(std::io::stderr);

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(terminal_layer);

        if tracing::subscriber::set_global_default(subscriber).is_err() {
            crate::debug!("global subscriber already installed; keeping it");
        }
        Ok(())
    }

    fn resolve_log_dir(&self) -> crate::Result<PathBuf> {
        let log_dir = match &self.log_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()
                .context("failed to resolve working directory for logs")?
                .join(DEFAULT_LOG_DIR_NAME),
        };
        if !Path::new(&log_dir).exists() {
            create_dir_all(&log_dir)
                .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;
        }
        Ok(log_dir)
    }
}

pub trait LoggingConfigTrait {
    fn logging_config_mut(&mut self) -> &mut LoggingConfig;

    fn logging_enabled(mut self, enabled: bool) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().logging_enabled = enabled;
        self
    }

    fn logger_name<S: Into<String>>(mut self, logger_name: S) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().logger_name = logger_name.into();
        self
    }

    fn log_dir<P: Into<PathBuf>>(mut self, log_dir: P) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().log_dir = Some(log_dir.into());
        self
    }

    /// Log to the terminal only.
    fn log_to_file(mut self, enabled: bool) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().log_to_file = enabled;
        self
    }

    /// Sets the log level to TRACE.
    ///
    /// TRACE carries the serialized request and response bodies of every completion call.
    fn log_level_trace(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::TRACE;
        self
    }

    /// Sets the log level to DEBUG.
    ///
    /// DEBUG logs the parsed classification of each row.
    fn log_level_debug(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::DEBUG;
        self
    }

    /// Sets the log level to INFO.
    ///
    /// INFO logs run milestones: table loaded, run started, result written.
    fn log_level_info(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::INFO;
        self
    }

    /// Sets the log level to WARN.
    ///
    /// WARN logs replies that did not follow the answer template.
    fn log_level_warn(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::WARN;
        self
    }

    /// Sets the log level to ERROR.
    ///
    /// ERROR logs the failure that aborted a run.
    fn log_level_error(mut self) -> Self
    where
        Self: Sized,
    {
        self.logging_config_mut().level = tracing::Level::ERROR;
        self
    }
}

impl LoggingConfigTrait for LoggingConfig {
    fn logging_config_mut(&mut self) -> &mut LoggingConfig {
        self
    }
}
