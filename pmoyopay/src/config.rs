//! Configuration du client Yo! Payments
//!
//! La configuration regroupe les credentials de l'API, l'URL de la passerelle
//! et les champs optionnels ajoutés aux requêtes (références, URLs de
//! notification, ...). Elle peut être construite en code, chargée depuis un
//! fichier YAML, puis surchargée par des variables d'environnement
//! `PMOYOPAY__<CHAMP>`.
//!
//! ```yaml
//! username: "90001234567"
//! password: "secret"
//! url: "https://sandbox.yo.co.ug/services/yopaymentsdev/task.php"
//! non_blocking: true
//! deposit_transaction_type: PUSH
//! ```

use crate::error::{Result, YoPayError};
use serde::{Deserialize, Serialize};
use std::{env, fmt, fs, path::Path, str::FromStr};
use tracing::{debug, info};

/// Préfixe des variables d'environnement de surcharge
pub const ENV_PREFIX: &str = "PMOYOPAY__";

/// Points d'entrée connus de la passerelle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Production, serveur principal
    Primary,
    /// Production, serveur de secours
    Secondary,
    /// Bac à sable pour les tests
    Sandbox,
}

impl Endpoint {
    pub fn url(self) -> &'static str {
        match self {
            Endpoint::Primary => "https://paymentsapi1.yo.co.ug/ybs/task.php",
            Endpoint::Secondary => "https://paymentsapi2.yo.co.ug/ybs/task.php",
            Endpoint::Sandbox => "https://sandbox.yo.co.ug/services/yopaymentsdev/task.php",
        }
    }
}

/// Type de dépôt suivi par `actransactioncheckstatus`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DepositTransactionType {
    #[default]
    Pull,
    Push,
}

impl DepositTransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            DepositTransactionType::Pull => "PULL",
            DepositTransactionType::Push => "PUSH",
        }
    }
}

impl fmt::Display for DepositTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepositTransactionType {
    type Err = YoPayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PULL" => Ok(DepositTransactionType::Pull),
            "PUSH" => Ok(DepositTransactionType::Push),
            other => Err(YoPayError::Config(format!(
                "unknown deposit transaction type: {other}"
            ))),
        }
    }
}

/// Configuration d'un client Yo! Payments
///
/// Les champs optionnels vides ne sont jamais émis dans les requêtes.
/// Les valeurs sont passées brutes : l'échappement XML est assuré par le
/// constructeur d'enveloppe.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Nom d'utilisateur de l'API (interface web du compte de paiement)
    pub username: String,
    /// Mot de passe de l'API
    pub password: String,
    /// URL de la passerelle (voir [`Endpoint`])
    pub url: String,
    /// Ne pas garder la connexion ouverte jusqu'à la fin de la transaction
    pub non_blocking: bool,
    /// Référence convenue avec le bénéficiaire (numéro de facture, ...)
    pub external_reference: String,
    /// Référence d'une autre transaction Yo! Payments
    pub internal_reference: String,
    /// Texte ajouté au SMS de confirmation de l'opérateur
    pub provider_reference_text: String,
    /// URL appelée dès qu'un dépôt aboutit
    pub instant_notification_url: String,
    /// URL appelée dès qu'un dépôt échoue
    pub failure_notification_url: String,
    /// Signature d'authentification exigée pour certains dépôts
    pub authentication_signature_base64: String,
    pub deposit_transaction_type: DepositTransactionType,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            url: Endpoint::Primary.url().to_string(),
            non_blocking: false,
            external_reference: String::new(),
            internal_reference: String::new(),
            provider_reference_text: String::new(),
            instant_notification_url: String::new(),
            failure_notification_url: String::new(),
            authentication_signature_base64: String::new(),
            deposit_transaction_type: DepositTransactionType::Pull,
        }
    }
}

// Le mot de passe ne doit jamais apparaître dans les logs
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("url", &self.url)
            .field("non_blocking", &self.non_blocking)
            .field("external_reference", &self.external_reference)
            .field("internal_reference", &self.internal_reference)
            .field("provider_reference_text", &self.provider_reference_text)
            .field("instant_notification_url", &self.instant_notification_url)
            .field("failure_notification_url", &self.failure_notification_url)
            .field(
                "authentication_signature_base64",
                &self.authentication_signature_base64,
            )
            .field("deposit_transaction_type", &self.deposit_transaction_type)
            .finish()
    }
}

impl ClientConfig {
    /// Crée une configuration pointant sur le serveur de production principal
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_endpoint(self, endpoint: Endpoint) -> Self {
        self.with_url(endpoint.url())
    }

    pub fn with_non_blocking(mut self, non_blocking: bool) -> Self {
        self.non_blocking = non_blocking;
        self
    }

    pub fn with_external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = reference.into();
        self
    }

    pub fn with_internal_reference(mut self, reference: impl Into<String>) -> Self {
        self.internal_reference = reference.into();
        self
    }

    pub fn with_provider_reference_text(mut self, text: impl Into<String>) -> Self {
        self.provider_reference_text = text.into();
        self
    }

    pub fn with_instant_notification_url(mut self, url: impl Into<String>) -> Self {
        self.instant_notification_url = url.into();
        self
    }

    pub fn with_failure_notification_url(mut self, url: impl Into<String>) -> Self {
        self.failure_notification_url = url.into();
        self
    }

    pub fn with_authentication_signature(mut self, signature: impl Into<String>) -> Self {
        self.authentication_signature_base64 = signature.into();
        self
    }

    pub fn with_deposit_transaction_type(mut self, kind: DepositTransactionType) -> Self {
        self.deposit_transaction_type = kind;
        self
    }

    /// Charge une configuration depuis un document YAML
    ///
    /// Les champs absents prennent leur valeur par défaut.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Charge une configuration depuis un fichier YAML
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)?;
        info!(config_file = %path.display(), "Loaded Yo! Payments config file");
        Self::from_yaml_str(&data)
    }

    /// Applique les surcharges `PMOYOPAY__<CHAMP>` de l'environnement du processus
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(env::vars())
    }

    /// Applique des surcharges `(clé, valeur)`; seules les clés préfixées par
    /// [`ENV_PREFIX`] sont prises en compte, le nom du champ est insensible à la casse.
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let field = field.to_ascii_lowercase();
            debug!(field = %field, "Applying environment override");
            match field.as_str() {
                "username" => self.username = value,
                "password" => self.password = value,
                "url" => self.url = value,
                "non_blocking" => self.non_blocking = parse_bool(&value)?,
                "external_reference" => self.external_reference = value,
                "internal_reference" => self.internal_reference = value,
                "provider_reference_text" => self.provider_reference_text = value,
                "instant_notification_url" => self.instant_notification_url = value,
                "failure_notification_url" => self.failure_notification_url = value,
                "authentication_signature_base64" => self.authentication_signature_base64 = value,
                "deposit_transaction_type" => self.deposit_transaction_type = value.parse()?,
                other => {
                    return Err(YoPayError::Config(format!(
                        "unknown configuration key {ENV_PREFIX}{}",
                        other.to_ascii_uppercase()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Vérifie la présence des champs obligatoires
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(YoPayError::Config("API username is required".into()));
        }
        if self.password.is_empty() {
            return Err(YoPayError::Config("API password is required".into()));
        }
        if self.url.is_empty() {
            return Err(YoPayError::Config("gateway URL is required".into()));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(YoPayError::Config(format!("not a boolean: {other}"))),
    }
}
