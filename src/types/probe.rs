use serde::{Deserialize, Serialize};

/// Where a probe sits. Also attached to every measurement result item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbeLocation {
    pub continent: String,
    pub region: String,
    pub country: String,
    pub state: Option<String>,
    pub city: String,
    pub asn: u32,
    pub network: String,
    pub latitude: f64,
    pub longitude: f64,
    pub tags: Vec<String>,
    pub resolvers: Vec<String>,
}

/// An entry of `GET /probes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Probe {
    pub version: String,
    pub location: ProbeLocation,
    pub tags: Vec<String>,
    pub resolvers: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitType {
    Ip,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDetails {
    #[serde(rename = "type")]
    pub kind: RateLimitType,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the window resets.
    pub reset: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementLimits {
    pub create: RateLimitDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    pub measurements: MeasurementLimits,
}

/// Credits left on an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    pub remaining: u64,
}

/// `200` body of `GET /limits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    pub rate_limit: RateLimits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<Credits>,
}
