//! Configuração do cliente Globalping.
//!
//! [`ClientConfig`] contém os padrões de cada instância do cliente:
//! credencial, User-Agent, timeout, política de erros e URL base.
//! Valores ausentes usam defaults sensíveis. A variável de ambiente
//! `GLOBALPING_TOKEN` fornece a credencial em [`ClientConfig::from_env`].
//!
//! [`RequestOptions`] sobrescreve parte desses padrões em uma única chamada.

use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Nome da variável de ambiente lida por [`ClientConfig::from_env`].
pub const TOKEN_ENV_VAR: &str = "GLOBALPING_TOKEN";

/// O que fazer com um erro estruturado da API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Devolve o erro como [`Outcome::Failure`](crate::Outcome::Failure).
    #[default]
    ReturnApiErrors,
    /// Interrompe a chamada com [`GlobalpingError::Api`](crate::GlobalpingError::Api).
    ThrowApiErrors,
}

/// Padrões de uma instância do cliente. Imutável depois de passada a
/// [`Globalping::new`](crate::Globalping::new).
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Token enviado como `Authorization: Bearer <token>`. Sem token, o
    /// cabeçalho não é enviado.
    #[serde(default)]
    pub auth: Option<String>,

    /// Valor do cabeçalho `User-Agent`, sempre enviado.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout de cada requisição em milissegundos.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Política para erros estruturados da API.
    #[serde(default)]
    pub error_policy: ErrorPolicy,

    /// URL base da API, incluindo o prefixo de versão.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

// Valor padrão do User-Agent: nome e versão da biblioteca.
fn default_user_agent() -> String {
    format!("globalping-rust/{}", env!("CARGO_PKG_VERSION"))
}

// Valor padrão do timeout: 30 segundos.
fn default_timeout_ms() -> u64 {
    30_000
}

// Valor padrão da URL base: a API pública v1.
fn default_base_url() -> String {
    "https://api.globalping.io/v1".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth: None,
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            error_policy: ErrorPolicy::default(),
            base_url: default_base_url(),
        }
    }
}

impl ClientConfig {
    /// Padrões com a credencial vinda de `GLOBALPING_TOKEN`, se definida e
    /// não vazia.
    pub fn from_env() -> Self {
        Self::default().with_env_token(std::env::var(TOKEN_ENV_VAR).ok())
    }

    // Valor vazio da variável conta como ausente.
    fn with_env_token(self, token: Option<String>) -> Self {
        match token {
            Some(token) if !token.is_empty() => self.with_auth(token),
            _ => self,
        }
    }

    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Aponta o cliente para outra URL base (útil para testes).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Sobrescritas para uma única chamada.
///
/// Campos `None` herdam o valor de [`ClientConfig`]. Um `signal` fornecido
/// substitui o timeout: a chamada só é interrompida quando o token for
/// cancelado.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub auth: Option<String>,
    pub user_agent: Option<String>,
    pub timeout: Option<Duration>,
    pub signal: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ClientConfig::default();
        assert!(config.auth.is_none());
        assert!(config.user_agent.starts_with("globalping-rust/"));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.error_policy, ErrorPolicy::ReturnApiErrors);
        assert_eq!(config.base_url, "https://api.globalping.io/v1");
    }

    #[test]
    fn deserialize_partial_config() {
        let json = r#"{"auth": "tok-123", "error_policy": "throw_api_errors"}"#;
        let config: ClientConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.auth.as_deref(), Some("tok-123"));
        assert_eq!(config.error_policy, ErrorPolicy::ThrowApiErrors);
        assert_eq!(config.timeout_ms, 30_000);
        assert!(config.user_agent.starts_with("globalping-rust/"));
    }

    #[test]
    fn env_token_sets_credential_unless_empty() {
        let config = ClientConfig::default().with_env_token(Some("tok-env".into()));
        assert_eq!(config.auth.as_deref(), Some("tok-env"));

        let config = ClientConfig::default().with_env_token(Some(String::new()));
        assert!(config.auth.is_none());

        let config = ClientConfig::default().with_env_token(None);
        assert!(config.auth.is_none());

        let config = ClientConfig::default()
            .with_auth("explicit")
            .with_env_token(Some(String::new()));
        assert_eq!(config.auth.as_deref(), Some("explicit"));
    }

    #[test]
    fn from_env_keeps_other_defaults() {
        let config = ClientConfig::from_env();
        let defaults = ClientConfig::default();
        assert_eq!(config.user_agent, defaults.user_agent);
        assert_eq!(config.timeout_ms, defaults.timeout_ms);
        assert_eq!(config.error_policy, defaults.error_policy);
        assert_eq!(config.base_url, defaults.base_url);
        match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.is_empty() => assert_eq!(config.auth, Some(token)),
            _ => assert!(config.auth.is_none()),
        }
    }

    #[test]
    fn builder_setters() {
        let config = ClientConfig::default()
            .with_auth("xx")
            .with_user_agent("ua")
            .with_timeout(Duration::from_millis(50))
            .with_error_policy(ErrorPolicy::ThrowApiErrors)
            .with_base_url("http://127.0.0.1:9999");
        assert_eq!(config.auth.as_deref(), Some("xx"));
        assert_eq!(config.user_agent, "ua");
        assert_eq!(config.timeout_ms, 50);
        assert_eq!(config.error_policy, ErrorPolicy::ThrowApiErrors);
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
    }

    #[test]
    fn request_options_setters() {
        let token = CancellationToken::new();
        let options = RequestOptions::new()
            .auth("a")
            .user_agent("b")
            .timeout(Duration::from_secs(1))
            .signal(token.clone());
        assert_eq!(options.auth.as_deref(), Some("a"));
        assert_eq!(options.user_agent.as_deref(), Some("b"));
        assert_eq!(options.timeout, Some(Duration::from_secs(1)));
        assert!(!options.signal.unwrap().is_cancelled());
    }
}
