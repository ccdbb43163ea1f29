//! ODPT client error types.

use crate::domain::StopRef;

use super::convert::ConversionError;

/// Errors from an ODPT data source.
///
/// Request failures name the API resource that was queried, such as
/// `odpt:BusTimetable` or `places/odpt:Station`.
#[derive(Debug, thiserror::Error)]
pub enum OdptError {
    /// The HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Request failed (network error, timeout, etc.)
    #[error("request for {resource} failed: {source}")]
    Http {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    /// API answered with a non-success status
    #[error("{resource} returned HTTP {status}: {message}")]
    Status {
        resource: String,
        status: u16,
        message: String,
    },

    /// Response body is not the expected JSON-LD array
    #[error("{resource} response could not be decoded: {message} (body: {body})")]
    Decode {
        resource: String,
        message: String,
        body: String,
    },

    /// Too many requests for the consumer key
    #[error("rate limited while requesting {resource}")]
    RateLimited { resource: String },

    /// Consumer key missing or rejected
    #[error("consumer key rejected for {resource} (check ODPT_API_KEY)")]
    Unauthorized { resource: String },

    /// A stop record was found but cannot be displayed
    #[error("record for {stop} is incomplete: {source}")]
    IncompleteRecord {
        stop: StopRef,
        #[source]
        source: ConversionError,
    },

    /// The client's request limiter was shut down
    #[error("ODPT client is shut down")]
    Closed,

    /// Mock data could not be loaded
    #[error("mock data error: {0}")]
    Mock(String),
}

impl OdptError {
    /// Whether retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            OdptError::Http { .. } | OdptError::RateLimited { .. } => true,
            OdptError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_resource() {
        let err = OdptError::RateLimited {
            resource: "odpt:BusTimetable".into(),
        };
        assert_eq!(err.to_string(), "rate limited while requesting odpt:BusTimetable");

        let err = OdptError::Status {
            resource: "odpt:Station".into(),
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "odpt:Station returned HTTP 500: Internal Server Error"
        );

        let err = OdptError::Decode {
            resource: "places/odpt:BusstopPole".into(),
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert_eq!(
            err.to_string(),
            "places/odpt:BusstopPole response could not be decoded: expected value (body: <html>)"
        );
    }

    #[test]
    fn incomplete_record_keeps_cause() {
        use std::error::Error;

        let err = OdptError::IncompleteRecord {
            stop: StopRef::new("odpt.Station:X").unwrap(),
            source: ConversionError::MissingField("dc:title"),
        };
        assert_eq!(
            err.to_string(),
            "record for odpt.Station:X is incomplete: missing required field: dc:title"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn transient_errors() {
        let resource = || "odpt:TrainTimetable".to_string();

        assert!(OdptError::RateLimited { resource: resource() }.is_transient());
        assert!(
            OdptError::Status {
                resource: resource(),
                status: 503,
                message: String::new(),
            }
            .is_transient()
        );
        assert!(
            !OdptError::Status {
                resource: resource(),
                status: 404,
                message: String::new(),
            }
            .is_transient()
        );
        assert!(!OdptError::Unauthorized { resource: resource() }.is_transient());
        assert!(!OdptError::Mock("no data".into()).is_transient());
    }
}
