//! Gestion des erreurs pour le client Yo! Payments

use thiserror::Error;

/// Type Result personnalisé pour pmoyopay
pub type Result<T> = std::result::Result<T, YoPayError>;

/// Erreurs possibles lors d'un appel à la passerelle Yo! Payments
///
/// Les erreurs « métier » (compte invalide, fonds insuffisants, ...) ne sont
/// pas représentées ici : elles arrivent dans une réponse HTTP 200 et se lisent
/// dans le [`ResponseStatus`](crate::models::ResponseStatus) du résultat.
#[derive(Error, Debug)]
pub enum YoPayError {
    /// Erreur de transport (connexion, TLS, timeout, lecture du corps)
    #[error("HTTP transport error: {0}")]
    Http(#[from] ureq::Error),

    /// La passerelle a répondu avec un statut HTTP différent de 200
    #[error("Wrong xml response status {code} {reason}")]
    Status { code: u16, reason: String },

    /// Réponse XML illisible (erreur de quick-xml transmise telle quelle)
    #[error("XML response error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Échec de sérialisation de l'enveloppe de requête
    #[error("XML request error: {0}")]
    Envelope(#[from] xmltree::Error),

    /// Signature de notification qui n'est pas du base64 valide
    #[error("Malformed base64 signature: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Certificat de l'ancre de confiance illisible ou sans clé RSA
    #[error("Trust anchor certificate error: {0}")]
    Certificate(String),

    /// La signature ne correspond pas aux données de la notification
    #[error("Invalid notification signature: {0}")]
    InvalidSignature(#[from] rsa::Error),

    /// Configuration incomplète ou invalide
    #[error("Configuration error: {0}")]
    Config(String),

    /// Fichier de configuration YAML invalide
    #[error("YAML configuration error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Erreur d'entrée/sortie (lecture de la configuration)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl YoPayError {
    /// Vrai pour les erreurs survenues pendant l'aller-retour HTTP
    pub fn is_transport(&self) -> bool {
        matches!(self, YoPayError::Http(_) | YoPayError::Status { .. })
    }

    /// Vrai si la réponse a été reçue mais n'a pas pu être interprétée
    pub fn is_parse(&self) -> bool {
        matches!(self, YoPayError::Xml(_))
    }

    /// Vrai pour toutes les erreurs de vérification de signature
    pub fn is_signature(&self) -> bool {
        matches!(
            self,
            YoPayError::Base64(_) | YoPayError::Certificate(_) | YoPayError::InvalidSignature(_)
        )
    }

    /// Code HTTP associé à l'erreur, le cas échéant
    pub fn status_code(&self) -> Option<u16> {
        match self {
            YoPayError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
