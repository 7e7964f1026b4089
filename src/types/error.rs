use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Corpo de erro estruturado retornado pela API para status não-2xx.
///
/// Um corpo sem a chave `error` não é um erro da API: o normalizador o trata
/// como falha de transporte. Com a chave presente, o descritor é lido de
/// forma tolerante por [`ApiErrorDetail::from_descriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Descritor do erro (tipo, mensagem e parâmetros inválidos).
    pub error: ApiErrorDetail,
    /// Links para a documentação do endpoint, quando presentes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<serde_json::Value>,
}

/// Descritor aninhado em [`ApiErrorBody`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Tipo do erro (ex.: "validation_error", "not_found", "too_many_requests").
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Mensagem legível do erro.
    #[serde(default)]
    pub message: String,
    /// Parâmetros rejeitados. Os valores costumam ser mensagens de validação,
    /// mas são mantidos como JSON arbitrário.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, Value>>,
}

impl ApiErrorDetail {
    /// Lê o valor da chave `error` sem rejeitá-lo.
    ///
    /// Uma string vira a mensagem; um objeto com campos de tipo inesperado
    /// ou qualquer outro valor resulta num descritor vazio.
    pub fn from_descriptor(descriptor: Value) -> Self {
        match descriptor {
            Value::String(message) => Self {
                message,
                ..Self::default()
            },
            other => serde_json::from_value(other).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_validation_error() {
        let json = r#"{
            "error": {
                "type": "validation_error",
                "message": "Parameter validation failed.",
                "params": {"limit": "\"limit\" must be less than or equal to 500"}
            },
            "links": {"documentation": "https://globalping.io/docs/api.globalping.io#post-/v1/measurements"}
        }"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.kind, "validation_error");
        assert_eq!(
            body.error.params.unwrap()["limit"],
            "\"limit\" must be less than or equal to 500"
        );
        assert!(body.links.is_some());
    }

    #[test]
    fn params_and_links_are_optional() {
        let json = r#"{"error": {"type": "not_found", "message": "Couldn't find the requested item."}}"#;
        let body: ApiErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.error.kind, "not_found");
        assert!(body.error.params.is_none());
        assert!(body.links.is_none());
    }

    #[test]
    fn descriptor_is_read_leniently() {
        let detail = ApiErrorDetail::from_descriptor(serde_json::json!({"type": "too_many_requests"}));
        assert_eq!(detail.kind, "too_many_requests");
        assert_eq!(detail.message, "");
        assert!(detail.params.is_none());

        let detail = ApiErrorDetail::from_descriptor(serde_json::json!({
            "type": "validation_error",
            "message": "m",
            "params": {"limit": 5}
        }));
        assert_eq!(detail.params.unwrap()["limit"], 5);

        let detail = ApiErrorDetail::from_descriptor(serde_json::json!("just a string"));
        assert_eq!(detail.kind, "");
        assert_eq!(detail.message, "just a string");

        assert_eq!(
            ApiErrorDetail::from_descriptor(serde_json::json!({"type": 42})),
            ApiErrorDetail::default()
        );
        assert_eq!(ApiErrorDetail::from_descriptor(Value::Null), ApiErrorDetail::default());
    }

    #[test]
    fn body_without_error_key_is_rejected() {
        let json = r#"{"message": "Bad Gateway"}"#;
        assert!(serde_json::from_str::<ApiErrorBody>(json).is_err());
    }
}
