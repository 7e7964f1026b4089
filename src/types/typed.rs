//! Measurement shapes narrowed to one [`MeasurementType`].
//!
//! A [`MeasurementKind`] marker binds a type tag to its options struct and to
//! the result shape a probe reports once it has finished.

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::measurement::{MeasurementResponse, MeasurementStatus, MeasurementType};
use super::options::{DnsOptions, HttpOptions, MtrOptions, PingOptions, TracerouteOptions};
use super::probe::ProbeLocation;
use crate::error::GlobalpingError;

pub trait MeasurementKind {
    const TYPE: MeasurementType;
    type Options: DeserializeOwned + Debug + Clone + PartialEq;
    type Finished: DeserializeOwned + Debug + Clone + PartialEq;
}

#[derive(Debug, Clone, Copy)]
pub struct Ping;

#[derive(Debug, Clone, Copy)]
pub struct Traceroute;

#[derive(Debug, Clone, Copy)]
pub struct Dns;

#[derive(Debug, Clone, Copy)]
pub struct Mtr;

#[derive(Debug, Clone, Copy)]
pub struct Http;

impl MeasurementKind for Ping {
    const TYPE: MeasurementType = MeasurementType::Ping;
    type Options = PingOptions;
    type Finished = FinishedPingResult;
}

impl MeasurementKind for Traceroute {
    const TYPE: MeasurementType = MeasurementType::Traceroute;
    type Options = TracerouteOptions;
    type Finished = FinishedTracerouteResult;
}

impl MeasurementKind for Dns {
    const TYPE: MeasurementType = MeasurementType::Dns;
    type Options = DnsOptions;
    type Finished = FinishedDnsResult;
}

impl MeasurementKind for Mtr {
    const TYPE: MeasurementType = MeasurementType::Mtr;
    type Options = MtrOptions;
    type Finished = FinishedMtrResult;
}

impl MeasurementKind for Http {
    const TYPE: MeasurementType = MeasurementType::Http;
    type Options = HttpOptions;
    type Finished = FinishedHttpResult;
}

/// Output of a probe that has not produced a finished result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutput {
    #[serde(default)]
    pub raw_output: String,
}

/// A single probe's result, tagged by its `status` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status")]
pub enum TestResult<F> {
    #[serde(rename = "in-progress")]
    InProgress(RawOutput),
    #[serde(rename = "finished")]
    Finished(F),
    #[serde(rename = "failed")]
    Failed(RawOutput),
    #[serde(rename = "offline")]
    Offline(RawOutput),
}

impl<F> TestResult<F> {
    pub fn finished(&self) -> Option<&F> {
        match self {
            TestResult::Finished(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedResultItem<F> {
    pub probe: ProbeLocation,
    pub result: TestResult<F>,
}

/// A [`MeasurementResponse`] whose options and results are decoded for `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedMeasurement<K: MeasurementKind> {
    pub id: String,
    pub status: MeasurementStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub target: String,
    pub probes_count: u32,
    pub locations: Option<serde_json::Value>,
    pub limit: Option<u32>,
    pub measurement_options: Option<K::Options>,
    pub results: Vec<TypedResultItem<K::Finished>>,
}

impl<K: MeasurementKind> TypedMeasurement<K> {
    /// Decodes `measurement` for `K`. The input is left untouched.
    ///
    /// Fails with [`GlobalpingError::UnexpectedMeasurementType`] when the tag
    /// differs, or with [`GlobalpingError::Decode`] when a field does not fit
    /// the shape bound to `K`.
    pub fn from_response(measurement: &MeasurementResponse) -> Result<Self, GlobalpingError> {
        if measurement.kind != K::TYPE {
            return Err(GlobalpingError::UnexpectedMeasurementType {
                expected: K::TYPE,
                actual: measurement.kind,
            });
        }

        let measurement_options = measurement
            .measurement_options
            .clone()
            .map(serde_json::from_value)
            .transpose()?;

        let results = measurement
            .results
            .iter()
            .map(|item| -> Result<_, GlobalpingError> {
                Ok(TypedResultItem {
                    probe: item.probe.clone(),
                    result: serde_json::from_value(item.result.clone())?,
                })
            })
            .collect::<Result<Vec<_>, GlobalpingError>>()?;

        Ok(Self {
            id: measurement.id.clone(),
            status: measurement.status,
            created_at: measurement.created_at,
            updated_at: measurement.updated_at,
            target: measurement.target.clone(),
            probes_count: measurement.probes_count,
            locations: measurement.locations.clone(),
            limit: measurement.limit,
            measurement_options,
            results,
        })
    }

    /// Finished results, skipping probes that failed or went offline.
    pub fn finished_results(&self) -> impl Iterator<Item = &K::Finished> {
        self.results.iter().filter_map(|item| item.result.finished())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PingTiming {
    pub rtt: f64,
    pub ttl: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PingStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub total: u32,
    pub rcv: u32,
    pub drop: u32,
    pub loss: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedPingResult {
    #[serde(default)]
    pub raw_output: String,
    pub resolved_address: Option<String>,
    pub resolved_hostname: Option<String>,
    #[serde(default)]
    pub timings: Vec<PingTiming>,
    #[serde(default)]
    pub stats: PingStats,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HopTiming {
    pub rtt: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracerouteHop {
    pub resolved_address: Option<String>,
    pub resolved_hostname: Option<String>,
    #[serde(default)]
    pub timings: Vec<HopTiming>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedTracerouteResult {
    #[serde(default)]
    pub raw_output: String,
    pub resolved_address: Option<String>,
    pub resolved_hostname: Option<String>,
    #[serde(default)]
    pub hops: Vec<TracerouteHop>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DnsAnswer {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub ttl: u32,
    pub class: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DnsTimings {
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedSimpleDnsResult {
    #[serde(default)]
    pub raw_output: String,
    pub status_code: Option<u16>,
    pub status_code_name: Option<String>,
    pub resolver: Option<String>,
    pub answers: Vec<DnsAnswer>,
    #[serde(default)]
    pub timings: DnsTimings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DnsTraceHop {
    pub resolver: String,
    #[serde(default)]
    pub answers: Vec<DnsAnswer>,
    #[serde(default)]
    pub timings: DnsTimings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedTraceDnsResult {
    #[serde(default)]
    pub raw_output: String,
    pub hops: Vec<DnsTraceHop>,
}

/// A finished DNS result is a hop list when `trace` was requested.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FinishedDnsResult {
    Trace(FinishedTraceDnsResult),
    Simple(FinishedSimpleDnsResult),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MtrStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub st_dev: f64,
    pub j_min: f64,
    pub j_avg: f64,
    pub j_max: f64,
    pub total: u32,
    pub rcv: u32,
    pub drop: u32,
    pub loss: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MtrHop {
    pub resolved_address: Option<String>,
    pub resolved_hostname: Option<String>,
    #[serde(default)]
    pub asn: Vec<u32>,
    #[serde(default)]
    pub timings: Vec<HopTiming>,
    #[serde(default)]
    pub stats: MtrStats,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedMtrResult {
    #[serde(default)]
    pub raw_output: String,
    pub resolved_address: Option<String>,
    pub resolved_hostname: Option<String>,
    #[serde(default)]
    pub hops: Vec<MtrHop>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpTimings {
    pub total: Option<f64>,
    pub dns: Option<f64>,
    pub tcp: Option<f64>,
    pub tls: Option<f64>,
    pub first_byte: Option<f64>,
    pub download: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TlsKeyType {
    #[serde(rename = "RSA")]
    Rsa,
    #[serde(rename = "EC")]
    Ec,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsCertificate {
    pub authorized: bool,
    pub error: Option<String>,
    pub created_at: Option<String>,
    pub expires_at: Option<String>,
    #[serde(default)]
    pub subject: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub issuer: BTreeMap<String, serde_json::Value>,
    pub key_type: Option<TlsKeyType>,
    pub key_bits: Option<u32>,
    pub serial_number: Option<String>,
    pub fingerprint256: Option<String>,
    pub public_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedHttpResult {
    #[serde(default)]
    pub raw_output: String,
    #[serde(default)]
    pub raw_headers: String,
    pub raw_body: Option<String>,
    #[serde(default)]
    pub truncated: bool,
    /// Header values are a string, or an array for repeated headers.
    #[serde(default)]
    pub headers: BTreeMap<String, serde_json::Value>,
    pub status_code: u16,
    pub status_code_name: Option<String>,
    pub resolved_address: Option<String>,
    #[serde(default)]
    pub timings: HttpTimings,
    pub tls: Option<TlsCertificate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn measurement(kind: &str, results: serde_json::Value) -> MeasurementResponse {
        serde_json::from_value(json!({
            "id": "123",
            "type": kind,
            "target": "example.com",
            "status": "finished",
            "createdAt": "2025-01-01T10:00:00Z",
            "updatedAt": "2025-01-01T10:00:02Z",
            "probesCount": 2,
            "measurementOptions": {"packets": 2},
            "results": results
        }))
        .unwrap()
    }

    #[test]
    fn ping_results_decode_by_status() {
        let m = measurement(
            "ping",
            json!([
                {
                    "probe": {"city": "Berlin", "asn": 3320},
                    "result": {
                        "status": "finished",
                        "rawOutput": "PING example.com ...",
                        "resolvedAddress": "93.184.216.34",
                        "resolvedHostname": null,
                        "timings": [{"rtt": 10.5, "ttl": 55}, {"rtt": 11.0, "ttl": 55}],
                        "stats": {"min": 10.5, "max": 11.0, "avg": 10.75, "total": 2, "rcv": 2, "drop": 0, "loss": 0}
                    }
                },
                {
                    "probe": {"city": "Tokyo"},
                    "result": {"status": "offline", "rawOutput": ""}
                }
            ]),
        );

        let typed = TypedMeasurement::<Ping>::from_response(&m).unwrap();
        assert_eq!(typed.measurement_options.as_ref().unwrap().packets, Some(2));
        assert_eq!(typed.results.len(), 2);

        let finished: Vec<_> = typed.finished_results().collect();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].timings.len(), 2);
        assert_eq!(finished[0].stats.avg, Some(10.75));
        assert!(matches!(typed.results[1].result, TestResult::Offline(_)));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let m = measurement("ping", json!([]));
        let err = TypedMeasurement::<Dns>::from_response(&m).unwrap_err();
        assert!(matches!(
            err,
            GlobalpingError::UnexpectedMeasurementType {
                expected: MeasurementType::Dns,
                actual: MeasurementType::Ping,
            }
        ));
    }

    #[test]
    fn dns_trace_and_simple_results() {
        let mut m = measurement(
            "dns",
            json!([
                {
                    "probe": {},
                    "result": {
                        "status": "finished",
                        "rawOutput": "",
                        "statusCode": 0,
                        "statusCodeName": "NOERROR",
                        "resolver": "1.1.1.1",
                        "answers": [{"name": "example.com.", "type": "A", "ttl": 300, "class": "IN", "value": "93.184.216.34"}],
                        "timings": {"total": 12}
                    }
                },
                {
                    "probe": {},
                    "result": {
                        "status": "finished",
                        "rawOutput": "",
                        "hops": [{"resolver": "a.root-servers.net", "answers": [], "timings": {"total": 20}}]
                    }
                }
            ]),
        );
        m.measurement_options = None;

        let typed = TypedMeasurement::<Dns>::from_response(&m).unwrap();
        let finished: Vec<_> = typed.finished_results().collect();
        match finished[0] {
            FinishedDnsResult::Simple(simple) => {
                assert_eq!(simple.answers[0].kind, "A");
                assert_eq!(simple.timings.total, 12.0);
            }
            other => panic!("expected simple result, got {other:?}"),
        }
        assert!(matches!(finished[1], FinishedDnsResult::Trace(_)));
    }

    #[test]
    fn http_result_decodes() {
        let mut m = measurement(
            "http",
            json!([{
                "probe": {},
                "result": {
                    "status": "finished",
                    "rawOutput": "HTTP/1.1 200",
                    "rawHeaders": "content-type: text/html",
                    "rawBody": null,
                    "truncated": false,
                    "headers": {"content-type": "text/html", "set-cookie": ["a=1", "b=2"]},
                    "statusCode": 200,
                    "statusCodeName": "OK",
                    "resolvedAddress": "93.184.216.34",
                    "timings": {"total": 100, "dns": 5, "tcp": 10, "tls": 20, "firstByte": 50, "download": 15},
                    "tls": null
                }
            }]),
        );
        m.measurement_options = None;

        let typed = TypedMeasurement::<Http>::from_response(&m).unwrap();
        let result = typed.finished_results().next().unwrap();
        assert_eq!(result.status_code, 200);
        assert_eq!(result.timings.first_byte, Some(50.0));
        assert!(result.headers["set-cookie"].is_array());
    }

    #[test]
    fn tls_certificate_key_type() {
        let cert: TlsCertificate = serde_json::from_value(json!({
            "authorized": true,
            "createdAt": "2025-01-01T00:00:00.000Z",
            "expiresAt": "2026-01-01T00:00:00.000Z",
            "subject": {"CN": "example.com"},
            "issuer": {"CN": "R3"},
            "keyType": "EC",
            "keyBits": 256
        }))
        .unwrap();
        assert_eq!(cert.key_type, Some(TlsKeyType::Ec));
        assert_eq!(cert.key_bits, Some(256));

        let cert: TlsCertificate =
            serde_json::from_value(json!({"authorized": false, "keyType": "RSA"})).unwrap();
        assert_eq!(cert.key_type, Some(TlsKeyType::Rsa));
    }

    #[test]
    fn mismatched_result_shape_is_a_decode_error() {
        let mut m = measurement(
            "traceroute",
            json!([{"probe": {}, "result": {"status": "finished", "hops": "nope"}}]),
        );
        m.measurement_options = None;
        let err = TypedMeasurement::<Traceroute>::from_response(&m).unwrap_err();
        assert!(matches!(err, GlobalpingError::Decode(_)));
    }
}
