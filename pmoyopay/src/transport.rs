use crate::error::{Result, YoPayError};
use std::time::Duration;
use tracing::{debug, warn};
use ureq::Agent;
use ureq::tls::TlsConfig;

/// Délai global d'une requête (connexion, envoi et lecture compris)
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Trace d'un appel à la passerelle
///
/// Remplace l'état « dernière requête / dernière réponse » : chaque appel
/// renvoie sa propre trace, un client partagé reste donc utilisable depuis
/// plusieurs threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallTrace {
    /// Corps XML envoyé (credentials compris)
    pub request: String,
    /// Corps reçu, y compris pour un statut HTTP en erreur
    pub response: Option<String>,
    pub status_code: Option<u16>,
    /// Première erreur rencontrée pendant l'appel
    pub error: Option<String>,
}

impl CallTrace {
    pub fn new(request: impl Into<String>) -> Self {
        Self {
            request: request.into(),
            ..Self::default()
        }
    }
}

/// Résultat d'un appel : la trace et la valeur typée (ou l'erreur)
#[derive(Debug)]
pub struct Call<T> {
    pub trace: CallTrace,
    pub result: Result<T>,
}

impl<T> Call<T> {
    pub fn succeeded(trace: CallTrace, value: T) -> Self {
        Self {
            trace,
            result: Ok(value),
        }
    }

    pub fn failed(mut trace: CallTrace, error: YoPayError) -> Self {
        trace.error.get_or_insert_with(|| error.to_string());
        Self {
            trace,
            result: Err(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn value(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&YoPayError> {
        self.result.as_ref().err()
    }

    pub fn into_result(self) -> Result<T> {
        self.result
    }

    /// Valeur typée, ou sa valeur par défaut si l'appel a échoué
    pub fn value_or_default(self) -> T
    where
        T: Default,
    {
        self.result.unwrap_or_default()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Call<U> {
        Call {
            trace: self.trace,
            result: self.result.map(f),
        }
    }

    /// Enchaîne une étape faillible; son erreur est reportée dans la trace
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U>) -> Call<U> {
        match self.result.and_then(f) {
            Ok(value) => Call::succeeded(self.trace, value),
            Err(error) => Call::failed(self.trace, error),
        }
    }
}

/// Envoi HTTPS d'un document XML, sans retry
#[derive(Debug, Clone)]
pub struct Transport {
    agent: Agent,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    pub fn new() -> Self {
        // La chaîne de certificats de la passerelle n'est pas vérifiée
        let tls = TlsConfig::builder().disable_verification(true).build();

        // Ne pas traiter les 4xx/5xx comme des erreurs ureq : on veut lire le
        // corps et le garder dans la trace.
        let agent: Agent = Agent::config_builder()
            .tls_config(tls)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .proxy(None)
            .build()
            .into();

        Self { agent }
    }

    /// POST `request` vers `url` et renvoie le corps si le statut est 200
    pub fn post(&self, url: &str, request: String) -> Call<String> {
        let mut trace = CallTrace::new(request);

        debug!(url = %url, bytes = trace.request.len(), "Posting gateway request");

        let mut response = match self
            .agent
            .post(url)
            .header("Content-Type", CONTENT_TYPE)
            .send(trace.request.as_str())
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "Gateway request failed");
                return Call::failed(trace, e.into());
            }
        };

        let status = response.status();
        trace.status_code = Some(status.as_u16());
        debug!("Response status: {}", status);

        let body = response.body_mut().read_to_string();

        if status.as_u16() != 200 {
            // Corps lu au mieux : le statut prime sur une erreur de lecture
            match body {
                Ok(body) => trace.response = Some(body),
                Err(e) => debug!(url = %url, error = %e, "Unreadable error body"),
            }
            let error = YoPayError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            };
            warn!(url = %url, "{}", error);
            return Call::failed(trace, error);
        }

        match body {
            Ok(body) => {
                trace.response = Some(body.clone());
                Call::succeeded(trace, body)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to read gateway response");
                Call::failed(trace, e.into())
            }
        }
    }
}
