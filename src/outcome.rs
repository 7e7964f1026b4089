//! The discriminated result of one API call and the raw envelope it is
//! normalized from.

use reqwest::header::{ETAG, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};

use crate::error::GlobalpingError;
use crate::types::ApiErrorBody;

/// The request exactly as it went out, after header injection.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl RequestInfo {
    pub fn new(method: Method, url: Url, headers: HeaderMap) -> Self {
        Self {
            method,
            url,
            headers,
        }
    }
}

impl From<&reqwest::Request> for RequestInfo {
    fn from(request: &reqwest::Request) -> Self {
        Self::new(
            request.method().clone(),
            request.url().clone(),
            request.headers().clone(),
        )
    }
}

/// Status line and headers of a received response.
#[derive(Debug, Clone)]
pub struct ResponseInfo {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

impl ResponseInfo {
    pub fn new(status: StatusCode, headers: HeaderMap) -> Self {
        Self { status, headers }
    }

    /// The validator token of the returned representation, if any.
    pub fn etag(&self) -> Option<&HeaderValue> {
        self.headers.get(ETAG)
    }
}

/// What an endpoint binding hands back: at most one of `data` / `error`.
///
/// `error` holds whatever the server sent for a non-2xx status: parsed JSON,
/// the raw text, or `{}` for an empty body.
#[derive(Debug, Clone)]
pub struct RawResponse<T> {
    pub data: Option<T>,
    pub error: Option<serde_json::Value>,
    pub request: RequestInfo,
    pub response: ResponseInfo,
}

/// Payload of either outcome variant together with the exchange that
/// produced it.
#[derive(Debug, Clone)]
pub struct Reply<D> {
    pub data: D,
    pub request: RequestInfo,
    pub response: ResponseInfo,
}

/// Result of an API call under the default error policy.
///
/// `Success` carries the documented body for the response status, `Failure`
/// a structured API error. Anything else never becomes an `Outcome`.
#[derive(Debug, Clone)]
pub enum Outcome<T, E = ApiErrorBody> {
    Success(Reply<T>),
    Failure(Reply<E>),
}

impl<T, E> Outcome<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn request(&self) -> &RequestInfo {
        match self {
            Outcome::Success(reply) => &reply.request,
            Outcome::Failure(reply) => &reply.request,
        }
    }

    pub fn response(&self) -> &ResponseInfo {
        match self {
            Outcome::Success(reply) => &reply.response,
            Outcome::Failure(reply) => &reply.response,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.response().status
    }

    /// The success payload, if this is a `Success`.
    pub fn ok(&self) -> Option<&T> {
        match self {
            Outcome::Success(reply) => Some(&reply.data),
            Outcome::Failure(_) => None,
        }
    }

    /// The error payload, if this is a `Failure`.
    pub fn err(&self) -> Option<&E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(reply) => Some(&reply.data),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
        match self {
            Outcome::Success(reply) => Outcome::Success(Reply {
                data: f(reply.data),
                request: reply.request,
                response: reply.response,
            }),
            Outcome::Failure(reply) => Outcome::Failure(reply),
        }
    }
}

impl<T> Outcome<T, ApiErrorBody> {
    /// Raises a `Failure` as [`GlobalpingError::Api`], the same way a client
    /// with the strict policy would.
    pub fn into_result(self) -> Result<Reply<T>, GlobalpingError> {
        match self {
            Outcome::Success(reply) => Ok(reply),
            Outcome::Failure(reply) => Err(GlobalpingError::Api {
                request: Box::new(reply.request),
                response: Box::new(reply.response),
                body: reply.data,
            }),
        }
    }
}
