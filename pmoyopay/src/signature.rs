//! Vérification des signatures de notification Yo! Payments
//!
//! La passerelle signe les notifications qu'elle pousse vers l'intégrateur :
//! SHA-1 de la concaténation des champs, signature RSA PKCS#1 v1.5, encodée en
//! base64. La clé publique est extraite d'un certificat X.509 (l'ancre de
//! confiance), par défaut celui publié par Yo! Payments et embarqué dans la crate.

use crate::error::{Result, YoPayError};
use crate::models::SignedNotification;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use once_cell::sync::Lazy;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha1::{Digest, Sha1};
use tracing::warn;
use x509_cert::Certificate;
use x509_cert::der::{DecodePem, Encode};

/// Certificat public de Yo! Payments
pub const EMBEDDED_CERTIFICATE: &str = include_str!("yo_payments.crt");

static EMBEDDED_ANCHOR: Lazy<std::result::Result<TrustAnchor, String>> =
    Lazy::new(|| TrustAnchor::from_pem(EMBEDDED_CERTIFICATE).map_err(|e| e.to_string()));

/// Clé publique de confiance utilisée pour toutes les vérifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    key: RsaPublicKey,
}

impl TrustAnchor {
    /// Extrait la clé RSA d'un certificat X.509 au format PEM
    pub fn from_pem(pem: &str) -> Result<Self> {
        let cert = Certificate::from_pem(pem.trim().as_bytes())
            .map_err(|e| YoPayError::Certificate(format!("invalid certificate: {e}")))?;
        let spki = cert
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| YoPayError::Certificate(format!("invalid public key info: {e}")))?;
        let key = RsaPublicKey::from_public_key_der(&spki)
            .map_err(|e| YoPayError::Certificate(format!("not an RSA public key: {e}")))?;
        Ok(Self { key })
    }

    pub fn from_public_key(key: RsaPublicKey) -> Self {
        Self { key }
    }

    /// Ancre embarquée, analysée une seule fois pour tout le processus
    pub fn embedded() -> Result<&'static TrustAnchor> {
        EMBEDDED_ANCHOR
            .as_ref()
            .map_err(|e| YoPayError::Certificate(e.clone()))
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.key
    }

    /// Vérifie une signature base64 sur `data`
    pub fn verify(&self, data: &[u8], signature_base64: &str) -> Result<()> {
        let signature = STANDARD.decode(signature_base64)?;
        let digest = Sha1::digest(data);
        self.key
            .verify(Pkcs1v15Sign::new::<Sha1>(), &digest, &signature)?;
        Ok(())
    }

    /// Vérifie la signature d'une notification entrante
    pub fn verify_notification<N: SignedNotification>(&self, notification: &N) -> Result<()> {
        self.verify(
            notification.signed_data().as_bytes(),
            notification.signature(),
        )
    }
}

/// Notification reçue, accompagnée du résultat de sa vérification
///
/// `verified` est faux dès qu'une étape échoue; l'erreur correspondante est
/// conservée dans `error`.
#[derive(Debug)]
pub struct NotificationReceipt<N> {
    pub notification: N,
    pub verified: bool,
    pub error: Option<YoPayError>,
}

impl<N> NotificationReceipt<N> {
    pub fn into_result(self) -> Result<N> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.notification),
        }
    }
}

/// Vérifie `notification` contre `anchor` (ou l'ancre embarquée si `None`)
pub fn check_notification<N: SignedNotification>(
    anchor: Option<&TrustAnchor>,
    notification: N,
) -> NotificationReceipt<N> {
    let outcome = match anchor {
        Some(anchor) => anchor.verify_notification(&notification),
        None => TrustAnchor::embedded().and_then(|a| a.verify_notification(&notification)),
    };

    match outcome {
        Ok(()) => NotificationReceipt {
            notification,
            verified: true,
            error: None,
        },
        Err(error) => {
            warn!(error = %error, "Notification signature rejected");
            NotificationReceipt {
                notification,
                verified: false,
                error: Some(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentFailureNotification;

    #[test]
    fn test_embedded_certificate_is_rsa() {
        let anchor = TrustAnchor::embedded().unwrap();
        assert_eq!(rsa::traits::PublicKeyParts::size(anchor.public_key()), 256);
    }

    #[test]
    fn test_malformed_certificate() {
        let err = TrustAnchor::from_pem("-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----")
            .unwrap_err();
        assert!(matches!(err, YoPayError::Certificate(_)));
    }

    #[test]
    fn test_malformed_base64_signature() {
        let anchor = TrustAnchor::embedded().unwrap();
        let err = anchor.verify(b"data", "not base64 !!").unwrap_err();
        assert!(matches!(err, YoPayError::Base64(_)));
        assert!(err.is_signature());
    }

    #[test]
    fn test_forged_signature_is_rejected() {
        let receipt = check_notification(
            None,
            PaymentFailureNotification {
                failed_transaction_reference: "TX-1".into(),
                transaction_init_date: "2024-01-01 00:00:00".into(),
                verification: STANDARD.encode([7u8; 256]),
            },
        );
        assert!(!receipt.verified);
        assert!(matches!(
            receipt.error,
            Some(YoPayError::InvalidSignature(_))
        ));
        assert_eq!(receipt.notification.failed_transaction_reference, "TX-1");
    }
}
