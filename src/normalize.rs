//! Turns a [`RawResponse`] into an [`Outcome`] under an [`ErrorPolicy`].

use tracing::debug;

use crate::config::ErrorPolicy;
use crate::error::GlobalpingError;
use crate::outcome::{Outcome, RawResponse, Reply};
use crate::types::{ApiErrorBody, ApiErrorDetail};

/// Normalizes one raw envelope.
///
/// - an `error` that is not an object holding an `error` key is a transport
///   failure, whatever the policy;
/// - a structured error is raised under [`ErrorPolicy::ThrowApiErrors`] and
///   returned as [`Outcome::Failure`] otherwise;
/// - neither `data` nor `error` is an invariant violation of the binding layer.
///
/// Status codes are not inspected here.
pub fn normalize<T>(
    raw: RawResponse<T>,
    policy: ErrorPolicy,
) -> Result<Outcome<T, ApiErrorBody>, GlobalpingError> {
    let RawResponse {
        data,
        error,
        request,
        response,
    } = raw;

    if let Some(error) = error {
        let body = match parse_api_error(error) {
            Some(body) => body,
            None => {
                debug!(status = %response.status, url = %request.url, "unrecognized error body");
                return Err(GlobalpingError::Http {
                    request: Box::new(request),
                    response: Box::new(response),
                });
            }
        };

        return match policy {
            ErrorPolicy::ThrowApiErrors => Err(GlobalpingError::Api {
                request: Box::new(request),
                response: Box::new(response),
                body,
            }),
            ErrorPolicy::ReturnApiErrors => Ok(Outcome::Failure(Reply {
                data: body,
                request,
                response,
            })),
        };
    }

    match data {
        Some(data) => Ok(Outcome::Success(Reply {
            data,
            request,
            response,
        })),
        None => Err(GlobalpingError::InvariantViolation(format!(
            "{} {} returned {} without data or error",
            request.method, request.url, response.status
        ))),
    }
}

/// Only the presence of the `error` key is checked; its content is decoded
/// leniently.
fn parse_api_error(error: serde_json::Value) -> Option<ApiErrorBody> {
    let serde_json::Value::Object(mut fields) = error else {
        return None;
    };
    let descriptor = fields.remove("error")?;
    Some(ApiErrorBody {
        error: ApiErrorDetail::from_descriptor(descriptor),
        links: fields.remove("links").filter(|links| !links.is_null()),
    })
}
