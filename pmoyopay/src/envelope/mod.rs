//! # Module envelope - Enveloppes XML de la passerelle
//!
//! Toutes les requêtes partagent la même enveloppe :
//!
//! ```text
//! <AutoCreate><Request><APIUsername/><APIPassword/><Method/>...</Request></AutoCreate>
//! ```
//!
//! et toutes les réponses arrivent sous `<AutoCreate><Response>`.
//!
//! ## Architecture
//!
//! - [`Method`] : noms de méthode de l'API (`acdepositfunds`, ...)
//! - [`Operation`] : une requête typée, qui fixe l'ordre de ses champs
//! - [`RequestEnvelope`] : document de requête, texte échappé à la sérialisation
//! - [`parser`] : désérialisation des réponses par opération
//!
//! ## Example
//!
//! ```
//! use pmoyopay::ClientConfig;
//! use pmoyopay::envelope::Operation;
//!
//! let config = ClientConfig::new("90001234567", "secret");
//! let xml = Operation::AccountBalance.to_envelope(&config).render().unwrap();
//! assert!(xml.contains("<Method>acacctbalance</Method>"));
//! ```

mod builder;
mod operation;
pub mod parser;

pub use builder::RequestEnvelope;
pub use operation::{
    DEFAULT_ENTRY_DESIGNATION, Method, MiniStatementQuery, Operation, STATEMENT_DATE_FORMAT,
};
