use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::measurement::MeasurementType;

/// IP version used by a probe. Serialized as the bare number `4` or `6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl Serialize for IpVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IpVersion::V4 => serializer.serialize_u8(4),
            IpVersion::V6 => serializer.serialize_u8(6),
        }
    }
}

impl<'de> Deserialize<'de> for IpVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            4 => Ok(IpVersion::V4),
            6 => Ok(IpVersion::V6),
            other => Err(serde::de::Error::custom(format!(
                "invalid IP version {other}, expected 4 or 6"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TracerouteProtocol {
    Icmp,
    Tcp,
    Udp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MtrProtocol {
    Icmp,
    Tcp,
    Udp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsProtocol {
    Udp,
    Tcp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsQueryType {
    A,
    Aaaa,
    Any,
    Cname,
    Dnskey,
    Ds,
    Https,
    Mx,
    Ns,
    Nsec,
    Ptr,
    Rrsig,
    Soa,
    Txt,
    Srv,
    Svcb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpRequestMethod {
    Head,
    Get,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpProtocol {
    Http,
    Https,
    Http2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContinentCode {
    AF,
    AN,
    AS,
    EU,
    NA,
    OC,
    SA,
}

/// UN M49 sub-region accepted by the `region` location filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionName {
    #[serde(rename = "Northern Africa")]
    NorthernAfrica,
    #[serde(rename = "Eastern Africa")]
    EasternAfrica,
    #[serde(rename = "Middle Africa")]
    MiddleAfrica,
    #[serde(rename = "Southern Africa")]
    SouthernAfrica,
    #[serde(rename = "Western Africa")]
    WesternAfrica,
    #[serde(rename = "Caribbean")]
    Caribbean,
    #[serde(rename = "Central America")]
    CentralAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    #[serde(rename = "Northern America")]
    NorthernAmerica,
    #[serde(rename = "Central Asia")]
    CentralAsia,
    #[serde(rename = "Eastern Asia")]
    EasternAsia,
    #[serde(rename = "South-eastern Asia")]
    SouthEasternAsia,
    #[serde(rename = "Southern Asia")]
    SouthernAsia,
    #[serde(rename = "Western Asia")]
    WesternAsia,
    #[serde(rename = "Eastern Europe")]
    EasternEurope,
    #[serde(rename = "Northern Europe")]
    NorthernEurope,
    #[serde(rename = "Southern Europe")]
    SouthernEurope,
    #[serde(rename = "Western Europe")]
    WesternEurope,
    #[serde(rename = "Australia and New Zealand")]
    AustraliaAndNewZealand,
    #[serde(rename = "Melanesia")]
    Melanesia,
    #[serde(rename = "Micronesia")]
    Micronesia,
    #[serde(rename = "Polynesia")]
    Polynesia,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PingOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packets: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<IpVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracerouteOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<TracerouteProtocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<IpVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsQuery {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DnsQueryType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<DnsQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<DnsProtocol>,
    /// Trace the delegation path from the root servers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<IpVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MtrOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<MtrProtocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packets: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<IpVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpRequestMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<HttpRequestOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<HttpProtocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<IpVersion>,
}

/// Per-type options of a measurement request.
///
/// The variant decides the `type` field of the request, so a ping request can
/// never carry DNS options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MeasurementOptions {
    Ping(PingOptions),
    Traceroute(TracerouteOptions),
    Dns(DnsOptions),
    Mtr(MtrOptions),
    Http(HttpOptions),
}

impl MeasurementOptions {
    pub fn kind(&self) -> MeasurementType {
        match self {
            MeasurementOptions::Ping(_) => MeasurementType::Ping,
            MeasurementOptions::Traceroute(_) => MeasurementType::Traceroute,
            MeasurementOptions::Dns(_) => MeasurementType::Dns,
            MeasurementOptions::Mtr(_) => MeasurementType::Mtr,
            MeasurementOptions::Http(_) => MeasurementType::Http,
        }
    }
}

/// A single location filter. Unset fields do not constrain probe selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementLocationOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<ContinentCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Free-form filter matched against every location field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Either the id of a previous measurement (reuse its probes) or a list of
/// location filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementLocations {
    Previous(String),
    List(Vec<MeasurementLocationOption>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ip_version_serializes_as_number() {
        let opts = PingOptions {
            packets: Some(3),
            ip_version: Some(IpVersion::V6),
        };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json, serde_json::json!({"packets": 3, "ipVersion": 6}));
    }

    #[test]
    fn ip_version_rejects_unknown_number() {
        assert!(serde_json::from_str::<IpVersion>("5").is_err());
        assert_eq!(serde_json::from_str::<IpVersion>("4").unwrap(), IpVersion::V4);
    }

    #[test]
    fn empty_options_serialize_to_empty_object() {
        let json = serde_json::to_string(&MeasurementOptions::Mtr(MtrOptions::default())).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn protocol_enums_use_upper_case() {
        assert_eq!(
            serde_json::to_string(&HttpProtocol::Http2).unwrap(),
            r#""HTTP2""#
        );
        assert_eq!(
            serde_json::to_string(&DnsQueryType::Aaaa).unwrap(),
            r#""AAAA""#
        );
        assert_eq!(
            serde_json::to_string(&TracerouteProtocol::Icmp).unwrap(),
            r#""ICMP""#
        );
    }

    #[test]
    fn dns_query_type_field_renames_correctly() {
        let opts = DnsOptions {
            query: Some(DnsQuery {
                kind: Some(DnsQueryType::Mx),
            }),
            trace: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"query": {"type": "MX"}, "trace": true})
        );
    }

    #[test]
    fn locations_accept_previous_id_or_list() {
        let previous: MeasurementLocations = serde_json::from_str(r#""abc123""#).unwrap();
        assert_eq!(previous, MeasurementLocations::Previous("abc123".into()));

        let list: MeasurementLocations =
            serde_json::from_str(r#"[{"continent": "EU", "limit": 2}, {"magic": "aws"}]"#).unwrap();
        match list {
            MeasurementLocations::List(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].continent, Some(ContinentCode::EU));
                assert_eq!(items[0].limit, Some(2));
                assert_eq!(items[1].magic.as_deref(), Some("aws"));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn region_filter_uses_m49_names() {
        let location = MeasurementLocationOption {
            region: Some(RegionName::SouthEasternAsia),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&location).unwrap(),
            serde_json::json!({"region": "South-eastern Asia"})
        );

        let parsed: MeasurementLocationOption =
            serde_json::from_str(r#"{"region": "Australia and New Zealand"}"#).unwrap();
        assert_eq!(parsed.region, Some(RegionName::AustraliaAndNewZealand));
        assert!(serde_json::from_str::<MeasurementLocationOption>(r#"{"region": "Atlantis"}"#).is_err());
    }

    #[test]
    fn options_report_their_kind() {
        assert_eq!(
            MeasurementOptions::Http(HttpOptions::default()).kind(),
            MeasurementType::Http
        );
        assert_eq!(
            MeasurementOptions::Traceroute(TracerouteOptions::default()).kind(),
            MeasurementType::Traceroute
        );
    }
}
