//! Declarative endpoint bindings, one function per API operation.
//!
//! A binding only describes the call. Executing it (headers, cancellation,
//! body decoding) is the job of [`invoke`](crate::invoker::invoke).

use std::marker::PhantomData;

use reqwest::header::{HeaderMap, HeaderValue, IF_NONE_MATCH};
use reqwest::{Method, Url};

use crate::error::GlobalpingError;
use crate::types::{CreateMeasurementResponse, Limits, MeasurementRequest, MeasurementResponse, Probe};

/// One call to the API whose success body decodes into `T`.
#[derive(Debug)]
pub(crate) struct Operation<T> {
    pub(crate) method: Method,
    pub(crate) path: Vec<String>,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) headers: HeaderMap,
    response: PhantomData<fn() -> T>,
}

impl<T> Operation<T> {
    fn new(method: Method, path: &[&str]) -> Self {
        Self {
            method,
            path: path.iter().map(|segment| segment.to_string()).collect(),
            body: None,
            headers: HeaderMap::new(),
            response: PhantomData,
        }
    }

    /// Appends the path segments to `base_url`, percent-encoding each one.
    pub(crate) fn url(&self, base_url: &str) -> Result<Url, GlobalpingError> {
        let mut url =
            Url::parse(base_url).map_err(|e| GlobalpingError::InvalidUrl(format!("{base_url}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| GlobalpingError::InvalidUrl(format!("{base_url}: cannot be a base")))?
            .pop_if_empty()
            .extend(&self.path);
        Ok(url)
    }
}

/// `POST /measurements`
pub(crate) fn create_measurement(
    request: &MeasurementRequest,
) -> Result<Operation<CreateMeasurementResponse>, GlobalpingError> {
    let mut op = Operation::new(Method::POST, &["measurements"]);
    op.body = Some(serde_json::to_value(request)?);
    Ok(op)
}

/// `GET /measurements/{id}`, conditional on `etag` when given.
pub(crate) fn get_measurement(id: &str, etag: Option<HeaderValue>) -> Operation<MeasurementResponse> {
    let mut op = Operation::new(Method::GET, &["measurements", id]);
    if let Some(etag) = etag {
        op.headers.insert(IF_NONE_MATCH, etag);
    }
    op
}

/// `GET /probes`
pub(crate) fn list_probes() -> Operation<Vec<Probe>> {
    Operation::new(Method::GET, &["probes"])
}

/// `GET /limits`
pub(crate) fn get_limits() -> Operation<Limits> {
    Operation::new(Method::GET, &["limits"])
}
