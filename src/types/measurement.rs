use std::fmt;
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::options::{MeasurementLocations, MeasurementOptions};
use super::probe::ProbeLocation;

/// The probe kind of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementType {
    Ping,
    Traceroute,
    Dns,
    Mtr,
    Http,
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementType::Ping => write!(f, "ping"),
            MeasurementType::Traceroute => write!(f, "traceroute"),
            MeasurementType::Dns => write!(f, "dns"),
            MeasurementType::Mtr => write!(f, "mtr"),
            MeasurementType::Http => write!(f, "http"),
        }
    }
}

/// Lifecycle status of a measurement. Only `InProgress` is non-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasurementStatus {
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "finished")]
    Finished,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "offline")]
    Offline,
}

impl MeasurementStatus {
    pub fn is_terminal(self) -> bool {
        self != MeasurementStatus::InProgress
    }
}

impl fmt::Display for MeasurementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementStatus::InProgress => write!(f, "in-progress"),
            MeasurementStatus::Finished => write!(f, "finished"),
            MeasurementStatus::Failed => write!(f, "failed"),
            MeasurementStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Body of `POST /measurements`.
///
/// The `type` field is always derived from the options, see
/// [`MeasurementRequest::with_options`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRequest {
    #[serde(rename = "type")]
    kind: MeasurementType,
    /// Hostname or IP address to measure.
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    measurement_options: Option<MeasurementOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locations: Option<MeasurementLocations>,
    /// Maximum number of probes, applied to locations without their own limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Ask the API to publish partial results while probes are running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress_updates: Option<bool>,
}

impl MeasurementRequest {
    /// A request of the given type with server-side default options.
    pub fn new(kind: MeasurementType, target: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            measurement_options: None,
            locations: None,
            limit: None,
            in_progress_updates: None,
        }
    }

    pub fn ping(target: impl Into<String>) -> Self {
        Self::new(MeasurementType::Ping, target)
    }

    pub fn traceroute(target: impl Into<String>) -> Self {
        Self::new(MeasurementType::Traceroute, target)
    }

    pub fn dns(target: impl Into<String>) -> Self {
        Self::new(MeasurementType::Dns, target)
    }

    pub fn mtr(target: impl Into<String>) -> Self {
        Self::new(MeasurementType::Mtr, target)
    }

    pub fn http(target: impl Into<String>) -> Self {
        Self::new(MeasurementType::Http, target)
    }

    /// Sets the type-specific options. The request type follows the options.
    pub fn with_options(mut self, options: MeasurementOptions) -> Self {
        self.kind = options.kind();
        self.measurement_options = Some(options);
        self
    }

    pub fn with_locations(mut self, locations: MeasurementLocations) -> Self {
        self.locations = Some(locations);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_in_progress_updates(mut self, enabled: bool) -> Self {
        self.in_progress_updates = Some(enabled);
        self
    }

    pub fn kind(&self) -> MeasurementType {
        self.kind
    }

    pub fn measurement_options(&self) -> Option<&MeasurementOptions> {
        self.measurement_options.as_ref()
    }
}

/// `202` body of `POST /measurements`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeasurementResponse {
    pub id: String,
    pub probes_count: u32,
}

/// `200` body of `GET /measurements/{id}`.
///
/// Options and per-probe results stay as raw JSON here; use
/// [`assert_measurement_type`](crate::assert_measurement_type) to get the
/// shapes bound to a concrete [`MeasurementType`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementResponse {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MeasurementType,
    pub status: MeasurementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub target: String,
    pub probes_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_options: Option<serde_json::Value>,
    #[serde(default)]
    pub results: Vec<MeasurementResultItem>,
}

/// One probe's entry in [`MeasurementResponse::results`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResultItem {
    pub probe: ProbeLocation,
    pub result: serde_json::Value,
}

/// A [`MeasurementResponse`] known to be `finished`.
///
/// Only [`assert_measurement_finished`](crate::assert_measurement_finished)
/// builds one. Dereferences to the measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinishedMeasurement<'a>(&'a MeasurementResponse);

impl<'a> FinishedMeasurement<'a> {
    pub(crate) fn new(measurement: &'a MeasurementResponse) -> Self {
        Self(measurement)
    }

    pub fn get(&self) -> &'a MeasurementResponse {
        self.0
    }
}

impl Deref for FinishedMeasurement<'_> {
    type Target = MeasurementResponse;

    fn deref(&self) -> &MeasurementResponse {
        self.0
    }
}
