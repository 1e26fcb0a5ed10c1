//! The log4rs backend: one console appender on stderr, so that messages never mix with output
//! written to stdout.
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::runtime::ConfigErrors;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::log::LogConfiguration;

const CONSOLE_APPENDER: &str = "console";

// ISO 8601 timestamp, color coded level and the module path of the message
const LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l:<5})} {M} - {m}{n}";

fn console_appender() -> Appender {
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build();
    Appender::builder().build(CONSOLE_APPENDER, Box::new(console))
}

impl LogConfiguration {
    /// The log4rs configuration for the current global level and module filters.
    fn build_config(&self) -> Result<Config, ConfigErrors> {
        let loggers = self
            .module_configurations
            .values()
            .map(|filter| Logger::builder().build(filter.module.as_str(), filter.level));
        Config::builder()
            .appender(console_appender())
            .loggers(loggers)
            .build(
                Root::builder()
                    .appender(CONSOLE_APPENDER)
                    .build(self.global_log_level),
            )
    }

    /// Installs the logger on first use and swaps its configuration afterwards.
    pub(in crate::log) fn set_config(&mut self) {
        let config = match self.build_config() {
            Ok(config) => config,
            Err(errors) => {
                eprintln!("invalid log configuration: {errors}");
                return;
            }
        };

        if let Some(handle) = &self.root_handle {
            handle.set_config(config);
            return;
        }
        match log4rs::init_config(config) {
            Ok(handle) => self.root_handle = Some(handle),
            Err(e) => eprintln!("could not install logger: {e}"),
        }
    }
}
