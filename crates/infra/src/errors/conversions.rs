//! Conversions from external infrastructure errors into domain errors.

use chonkie_domain::ChonkieError;
use reqwest::{Error as HttpError, StatusCode};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ChonkieError);

impl From<InfraError> for ChonkieError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ChonkieError> for InfraError {
    fn from(value: ChonkieError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoChonkieError {
    fn into_chonkie(self) -> ChonkieError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ChonkieError */
/* -------------------------------------------------------------------------- */

impl IntoChonkieError for HttpError {
    fn into_chonkie(self) -> ChonkieError {
        if self.is_builder() {
            return ChonkieError::Configuration(format!("invalid HTTP request: {self}"));
        }

        if self.is_timeout() {
            return ChonkieError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ChonkieError::Network("HTTP connection failure".into());
        }

        ChonkieError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_chonkie())
    }
}

/* -------------------------------------------------------------------------- */
/* Non-success status → ChonkieError */
/* -------------------------------------------------------------------------- */

/// Map a non-success response status and its body text to a domain error.
pub(crate) fn status_error(status: StatusCode, body: String) -> ChonkieError {
    let code = status.as_u16();
    match code {
        401 | 403 => ChonkieError::Authentication(format!(
            "HTTP {code} {}: {body}",
            status.canonical_reason().unwrap_or("unknown status")
        )),
        _ => ChonkieError::Api { status: code, message: body },
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ChonkieError */
/* -------------------------------------------------------------------------- */

impl IntoChonkieError for serde_json::Error {
    fn into_chonkie(self) -> ChonkieError {
        ChonkieError::invalid_response("could not decode chunk records", self)
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_chonkie())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use reqwest::blocking::Client;

    use super::*;

    #[test]
    fn unauthorized_and_forbidden_map_to_auth_error() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            match status_error(status, "bad key".into()) {
                ChonkieError::Authentication(msg) => {
                    assert!(msg.contains(status.as_str()));
                    assert!(msg.contains("bad key"));
                }
                other => panic!("expected auth error, got {other:?}"),
            }
        }
    }

    #[test]
    fn other_statuses_keep_code_and_body() {
        match status_error(StatusCode::UNPROCESSABLE_ENTITY, "unknown recipe".into()) {
            ChonkieError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "unknown recipe");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_url_maps_to_configuration_error() {
        let err = Client::builder().no_proxy().build().unwrap().get("not a url").build().unwrap_err();
        let mapped: ChonkieError = InfraError::from(err).into();
        assert!(matches!(mapped, ChonkieError::Configuration(_)));
    }

    #[test]
    fn json_error_maps_to_service_response_with_source() {
        let err = serde_json::from_str::<Vec<String>>("[1, 2]").unwrap_err();
        let mapped: ChonkieError = InfraError::from(err).into();

        assert_eq!(
            mapped.to_string(),
            "Invalid response from service: could not decode chunk records"
        );
        let source = mapped.source().expect("source should be chained");
        assert!(source.to_string().contains("invalid type"));
    }
}
