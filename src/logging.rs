// src/logging.rs

use crate::config::Config;
use crate::errors::{ChatError, ChatResult};
use crate::models::ApiCallLog;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming};

const LOG_BASENAME: &str = "chat-widget";
const LOG_ROTATE_BYTES: u64 = 1_000_000;
const LOG_KEEP_FILES: usize = 3;

/// Starts the file logger. The terminal belongs to the UI, so nothing is
/// written to stderr. Keep the handle alive for the life of the program.
pub fn init_logging(config: &Config) -> ChatResult<LoggerHandle> {
    let log_dir = config.resolved_log_dir()?;

    Logger::try_with_str(&config.log_level)
        .map_err(|e| ChatError::config_error(format!("Invalid log level: {}", e)))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_BASENAME),
        )
        .format(flexi_logger::detailed_format)
        .rotate(
            Criterion::Size(LOG_ROTATE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(LOG_KEEP_FILES),
        )
        .start()
        .map_err(|e| ChatError::config_error(format!("Failed to start logger: {}", e)))
}

pub fn format_api_call(log: &ApiCallLog) -> String {
    format!(
        "[{}] {} - {} - Status: {} - Time: {}ms",
        log.timestamp.to_rfc3339(),
        log.endpoint,
        log.request_summary,
        log.response_status,
        log.response_time_ms
    )
}

/// Logs an API call. Status 0 means no HTTP response was received.
pub fn log_api_call(log: &ApiCallLog) {
    if (200..300).contains(&log.response_status) {
        log::info!("{}", format_api_call(log));
    } else {
        log::warn!("{}", format_api_call(log));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_api_call() {
        let entry = ApiCallLog {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            endpoint: "http://127.0.0.1:5000/chat".to_string(),
            request_summary: "message (2 chars)".to_string(),
            response_status: 200,
            response_time_ms: 42,
        };
        assert_eq!(
            format_api_call(&entry),
            "[2024-05-01T08:30:00+00:00] http://127.0.0.1:5000/chat - message (2 chars) - Status: 200 - Time: 42ms"
        );
    }
}
