use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;

use crate::api::{self, Operation};
use crate::config::{ClientConfig, RequestOptions};
use crate::error::GlobalpingError;
use crate::invoker::invoke;
use crate::normalize::normalize;
use crate::outcome::{Outcome, RawResponse};
use crate::poller::{MeasurementSource, await_completion};
use crate::types::{CreateMeasurementResponse, Limits, MeasurementRequest, MeasurementResponse, Probe};

/// Client for the Globalping API.
///
/// Every operation returns `Ok(Outcome)` for a documented response. With
/// [`ErrorPolicy::ThrowApiErrors`](crate::ErrorPolicy::ThrowApiErrors) a
/// structured API error comes back as `Err` instead of
/// [`Outcome::Failure`]. Cloning is cheap and clones share the configuration
/// and connection pool.
#[derive(Debug, Clone)]
pub struct Globalping {
    http: Client,
    config: Arc<ClientConfig>,
}

impl Globalping {
    pub fn new(config: ClientConfig) -> Result<Self, GlobalpingError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Submits a measurement. Answers `202` with its id.
    pub async fn create_measurement(
        &self,
        measurement: &MeasurementRequest,
    ) -> Result<Outcome<CreateMeasurementResponse>, GlobalpingError> {
        self.create_measurement_with(measurement, RequestOptions::default())
            .await
    }

    pub async fn create_measurement_with(
        &self,
        measurement: &MeasurementRequest,
        options: RequestOptions,
    ) -> Result<Outcome<CreateMeasurementResponse>, GlobalpingError> {
        self.call(api::create_measurement(measurement)?, options).await
    }

    /// Fetches the current state of a measurement, finished or not.
    pub async fn get_measurement(
        &self,
        id: &str,
    ) -> Result<Outcome<MeasurementResponse>, GlobalpingError> {
        self.get_measurement_with(id, RequestOptions::default()).await
    }

    pub async fn get_measurement_with(
        &self,
        id: &str,
        options: RequestOptions,
    ) -> Result<Outcome<MeasurementResponse>, GlobalpingError> {
        self.call(api::get_measurement(id, None), options).await
    }

    /// Polls a measurement until it is no longer in progress.
    ///
    /// A successful outcome always holds a `finished` measurement. Fails with
    /// [`GlobalpingError::PollingTimeout`] after
    /// [`POLL_BUDGET`](crate::POLL_BUDGET) and with
    /// [`GlobalpingError::UnexpectedMeasurementStatus`] when the measurement
    /// ended up `failed` or `offline`.
    pub async fn await_measurement(
        &self,
        id: &str,
    ) -> Result<Outcome<MeasurementResponse>, GlobalpingError> {
        await_completion(self, id, self.config.error_policy).await
    }

    pub async fn list_probes(&self) -> Result<Outcome<Vec<Probe>>, GlobalpingError> {
        self.list_probes_with(RequestOptions::default()).await
    }

    pub async fn list_probes_with(
        &self,
        options: RequestOptions,
    ) -> Result<Outcome<Vec<Probe>>, GlobalpingError> {
        self.call(api::list_probes(), options).await
    }

    pub async fn get_limits(&self) -> Result<Outcome<Limits>, GlobalpingError> {
        self.get_limits_with(RequestOptions::default()).await
    }

    pub async fn get_limits_with(
        &self,
        options: RequestOptions,
    ) -> Result<Outcome<Limits>, GlobalpingError> {
        self.call(api::get_limits(), options).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        op: Operation<T>,
        options: RequestOptions,
    ) -> Result<Outcome<T>, GlobalpingError> {
        let raw = invoke(&self.http, &self.config, op, options).await?;
        normalize(raw, self.config.error_policy)
    }
}

impl MeasurementSource for Globalping {
    async fn fetch_measurement(
        &self,
        id: &str,
        etag: Option<HeaderValue>,
    ) -> Result<RawResponse<MeasurementResponse>, GlobalpingError> {
        invoke(
            &self.http,
            &self.config,
            api::get_measurement(id, etag),
            RequestOptions::default(),
        )
        .await
    }
}
