//! Tipos de dados para requisições e respostas da API Globalping.
//!
//! Todas as structs derivam `Serialize`/`Deserialize` para conversão JSON
//! conforme o formato `camelCase` dos endpoints `/v1` da Globalping.
//! Os tipos genéricos de medição usam `serde_json::Value` para opções e
//! resultados; o estreitamento para um tipo concreto fica em [`typed`].

mod error;
mod measurement;
mod options;
mod probe;
pub mod typed;

pub use error::{ApiErrorBody, ApiErrorDetail};
pub use measurement::{
    CreateMeasurementResponse, FinishedMeasurement, MeasurementRequest, MeasurementResponse, MeasurementResultItem,
    MeasurementStatus, MeasurementType,
};
pub use options::{
    ContinentCode, DnsOptions, DnsProtocol, DnsQuery, DnsQueryType, HttpOptions, HttpProtocol,
    HttpRequestMethod, HttpRequestOptions, IpVersion, MeasurementLocationOption,
    MeasurementLocations, MeasurementOptions, MtrOptions, MtrProtocol, PingOptions,
    RegionName, TracerouteOptions, TracerouteProtocol,
};
pub use probe::{
    Credits, Limits, MeasurementLimits, Probe, ProbeLocation, RateLimitDetails, RateLimitType,
    RateLimits,
};
