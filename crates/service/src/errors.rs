use std::fmt::Display;

use common::utils::log_sink::LogSink;
use models::ResponseDto;

/// Log an unexpected use-case failure and turn it into a failed envelope.
///
/// The log line names the failing method; the envelope carries the error text.
pub fn envelope_from_error<T>(log: &dyn LogSink, method: &str, err: impl Display) -> ResponseDto<T> {
    let text = err.to_string();
    log.log(&format!("An error occurred while executing BLL: {method}: {text}"));
    ResponseDto::failure(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::utils::log_sink::mock::RecordingLogSink;

    #[test]
    fn logs_method_and_returns_failed_envelope() {
        let log = RecordingLogSink::default();
        let env: ResponseDto<Vec<u8>> = envelope_from_error(&log, "get_all_countries", "connection reset");
        assert!(!env.is_success);
        assert_eq!(env.message.as_deref(), Some("connection reset"));
        assert!(env.data.is_none());
        assert_eq!(
            log.messages(),
            vec!["An error occurred while executing BLL: get_all_countries: connection reset".to_string()]
        );
    }
}
