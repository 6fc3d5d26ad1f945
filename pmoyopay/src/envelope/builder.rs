//! Construction des requêtes XML `AutoCreate`

use super::Method;
use crate::error::Result;
use xmltree::{Element, XMLNode};

/// Valeur émise pour les drapeaux booléens (`NonBlocking`)
const FLAG_TRUE: &str = "TRUE";

/// Requête XML destinée à la passerelle
///
/// ```text
/// <AutoCreate>
///   <Request>
///     <APIUsername/><APIPassword/><Method/>
///     ...champs propres à la méthode, dans l'ordre d'ajout...
///   </Request>
/// </AutoCreate>
/// ```
///
/// Les champs sont conservés dans l'ordre d'insertion : certains parseurs de la
/// passerelle y sont sensibles. Le texte est échappé à la sérialisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    username: String,
    password: String,
    method: Method,
    fields: Vec<(&'static str, String)>,
}

impl RequestEnvelope {
    pub fn new(username: impl Into<String>, password: impl Into<String>, method: Method) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            method,
            fields: Vec::new(),
        }
    }

    /// Ajoute un champ obligatoire, même vide
    pub fn field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.fields.push((name, value.into()));
        self
    }

    /// Ajoute un champ seulement s'il n'est pas vide
    pub fn optional_field(self, name: &'static str, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.field(name, value)
        }
    }

    /// Ajoute `<name>TRUE</name>` seulement si le drapeau est levé
    pub fn flag(self, name: &'static str, enabled: bool) -> Self {
        if enabled {
            self.field(name, FLAG_TRUE)
        } else {
            self
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Champs propres à la méthode, dans l'ordre d'émission
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sérialise l'enveloppe en document XML
    ///
    /// L'écriture se fait en mémoire : seule une erreur interne de l'émetteur
    /// XML peut la faire échouer.
    pub fn render(&self) -> Result<String> {
        let mut request = Element::new("Request");
        request.children.push(text_element("APIUsername", &self.username));
        request.children.push(text_element("APIPassword", &self.password));
        request
            .children
            .push(text_element("Method", self.method.as_str()));
        for (name, value) in &self.fields {
            request.children.push(text_element(name, value));
        }

        let mut root = Element::new("AutoCreate");
        root.children.push(XMLNode::Element(request));

        let mut buf = Vec::new();
        let config = xmltree::EmitterConfig::new()
            .write_document_declaration(true)
            .perform_indent(false);
        root.write_with_config(&mut buf, config)?;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn text_element(name: &str, value: &str) -> XMLNode {
    let mut child = Element::new(name);
    if !value.is_empty() {
        child.children.push(XMLNode::Text(value.to_string()));
    }
    XMLNode::Element(child)
}
