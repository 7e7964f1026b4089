//! Executes an [`Operation`] with the client defaults merged into the
//! per-call [`RequestOptions`].

use std::future::Future;
use std::time::Duration;

use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::api::Operation;
use crate::config::{ClientConfig, RequestOptions};
use crate::error::GlobalpingError;
use crate::outcome::{RawResponse, RequestInfo, ResponseInfo};

/// What aborts an in-flight request: the caller's token, or else a timer.
#[derive(Debug, Clone)]
pub(crate) enum CancelSource {
    Signal(CancellationToken),
    Timeout(Duration),
}

impl CancelSource {
    pub(crate) fn resolve(options: &RequestOptions, config: &ClientConfig) -> Self {
        match &options.signal {
            Some(token) => CancelSource::Signal(token.clone()),
            None => CancelSource::Timeout(options.timeout.unwrap_or_else(|| config.timeout())),
        }
    }

    fn error(&self) -> GlobalpingError {
        match self {
            CancelSource::Signal(_) => GlobalpingError::Cancelled,
            CancelSource::Timeout(timeout) => GlobalpingError::TimedOut(*timeout),
        }
    }

    /// Runs `fut` unless the source fires first, in which case `fut` is
    /// dropped and the request is aborted.
    pub(crate) async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, GlobalpingError> {
        let fired = async {
            match self {
                CancelSource::Signal(token) => token.cancelled().await,
                CancelSource::Timeout(timeout) => tokio::time::sleep(*timeout).await,
            }
        };

        tokio::select! {
            biased;
            () = fired => Err(self.error()),
            output = fut => Ok(output),
        }
    }
}

/// Sends `op` and splits the reply into `data` (2xx) or `error` (anything
/// else). Never retries and never interprets the error body.
pub(crate) async fn invoke<T: DeserializeOwned>(
    http: &Client,
    config: &ClientConfig,
    op: Operation<T>,
    options: RequestOptions,
) -> Result<RawResponse<T>, GlobalpingError> {
    let url = op.url(&config.base_url)?;
    let user_agent = options.user_agent.as_deref().unwrap_or(&config.user_agent);
    let auth = options
        .auth
        .as_deref()
        .or(config.auth.as_deref())
        .filter(|token| !token.is_empty());
    let cancel = CancelSource::resolve(&options, config);

    let mut builder = http
        .request(op.method, url)
        .headers(op.headers)
        .header(USER_AGENT, user_agent);
    if let Some(token) = auth {
        builder = builder.bearer_auth(token);
    }
    if let Some(body) = &op.body {
        builder = builder.json(body);
    }
    let request = builder.build()?;
    let request_info = RequestInfo::from(&request);

    debug!(method = %request_info.method, url = %request_info.url, "sending request");

    let (status, headers, bytes) = cancel
        .guard(async {
            let response = http.execute(request).await?;
            let status = response.status();
            let headers = response.headers().clone();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, headers, bytes))
        })
        .await??;

    trace!(%status, len = bytes.len(), url = %request_info.url, "received response");

    let (data, error) = decode_body(status, &bytes)?;
    Ok(RawResponse {
        data,
        error,
        request: request_info,
        response: ResponseInfo::new(status, headers),
    })
}

fn decode_body<T: DeserializeOwned>(
    status: StatusCode,
    bytes: &[u8],
) -> Result<(Option<T>, Option<serde_json::Value>), GlobalpingError> {
    if status.is_success() {
        if bytes.is_empty() {
            return Ok((None, None));
        }
        return Ok((Some(serde_json::from_slice(bytes)?), None));
    }

    let error = if bytes.is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
    };
    Ok((None, Some(error)))
}
