//! Logging setup for `zadarapy`.
//!
//! Log lines go to stderr so that table and JSON output on stdout can be
//! piped. The format is chosen with `ZADARAPY_LOG_FORMAT`:
//! - `json` - Structured JSON output
//! - `pretty` - Human-readable multi-line output (default for TTY)
//! - `compact` - Single-line output (default for non-TTY)
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the number of
//! `-v` flags.

mod config;
mod tracing_setup;

pub use config::{LogFormat, TracingConfig};
pub use tracing_setup::init_tracing;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.log_filter(), "warn");
        assert_eq!(config.log_format(), LogFormat::Compact);
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::builder()
            .log_format(LogFormat::Json)
            .log_filter("zadara_client=debug")
            .include_location(true)
            .build();

        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.log_filter(), "zadara_client=debug");
        assert!(config.include_location());
    }

    #[test]
    fn test_verbosity_filters() {
        assert_eq!(TracingConfig::filter_for_verbosity(0), "warn");
        assert_eq!(TracingConfig::filter_for_verbosity(1), "info");
        assert_eq!(TracingConfig::filter_for_verbosity(2), "debug");
        assert_eq!(TracingConfig::filter_for_verbosity(7), "trace");
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!("bogus".parse::<LogFormat>().unwrap(), LogFormat::Compact);
    }
}
