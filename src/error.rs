//! Tipos de erro do cliente Globalping.
//!
//! Define [`GlobalpingError`] com uma variante para cada categoria de falha:
//! transporte (corpo não reconhecido, rede, decodificação, cancelamento),
//! erros conhecidos da API (apenas na política estrita) e violações de
//! contrato detectadas pela própria biblioteca. Usa `thiserror` para derivar
//! `Display` e `Error` a partir dos atributos `#[error(...)]`.

use std::time::Duration;

use thiserror::Error;

use crate::outcome::{RequestInfo, ResponseInfo};
use crate::types::{ApiErrorBody, MeasurementStatus, MeasurementType};

/// Erros que podem interromper uma chamada ao cliente.
///
/// Erros conhecidos da API só aparecem aqui quando o cliente usa
/// [`ErrorPolicy::ThrowApiErrors`](crate::ErrorPolicy::ThrowApiErrors);
/// na política padrão eles voltam como [`Outcome::Failure`](crate::Outcome::Failure).
#[derive(Debug, Error)]
pub enum GlobalpingError {
    /// Resposta de erro cujo corpo não tem o formato `{ "error": { ... } }`.
    #[error("HTTP {}", .response.status)]
    Http {
        request: Box<RequestInfo>,
        response: Box<ResponseInfo>,
    },

    /// Erro estruturado da API, levantado pela política estrita.
    #[error("HTTP {}: {} ({})", .response.status, .body.error.message, .body.error.kind)]
    Api {
        request: Box<RequestInfo>,
        response: Box<ResponseInfo>,
        body: ApiErrorBody,
    },

    /// Falha de rede subjacente (DNS, conexão recusada, leitura do corpo).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Corpo de sucesso que não corresponde ao formato documentado.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// O prazo da requisição expirou antes da resposta completa.
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),

    /// O token de cancelamento fornecido pelo chamador foi acionado.
    #[error("request cancelled")]
    Cancelled,

    /// A camada de transporte não entregou nem `data` nem `error`.
    #[error("unexpected empty response: {0}")]
    InvariantViolation(String),

    #[error("timed out waiting for measurement {id} to finish")]
    PollingTimeout { id: String },

    #[error("expected measurement status {expected}, got {actual}")]
    UnexpectedMeasurementStatus {
        expected: MeasurementStatus,
        actual: MeasurementStatus,
    },

    #[error("expected measurement type {expected}, got {actual}")]
    UnexpectedMeasurementType {
        expected: MeasurementType,
        actual: MeasurementType,
    },

    #[error("expected HTTP status {expected}, got {actual}")]
    UnexpectedHttpStatus { expected: u16, actual: u16 },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl GlobalpingError {
    /// `true` para [`TimedOut`](Self::TimedOut) e [`Cancelled`](Self::Cancelled).
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut(_) | Self::Cancelled)
    }

    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// O corpo estruturado de um erro [`Api`](Self::Api).
    pub fn api_error_body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// A resposta HTTP associada, quando houve uma.
    pub fn response(&self) -> Option<&ResponseInfo> {
        match self {
            Self::Http { response, .. } | Self::Api { response, .. } => Some(response),
            _ => None,
        }
    }
}
