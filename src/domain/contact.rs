use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::participant::Participant;

/// External participant identity. Owned by the contacts directory; the ledger only
/// references it by id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            phone: None,
            handle: None,
            avatar: None,
        }
    }

    /// Creates a contact with a generated `contact-…` identifier.
    pub fn with_generated_id(name: impl Into<String>) -> Self {
        let id = format!("contact-{}", Uuid::new_v4().simple());
        Self::new(id, name)
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn participant(&self) -> Participant {
        Participant::contact(self.id.clone())
    }
}

impl Identifiable for Contact {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Contact {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Contact {
    fn display_label(&self) -> String {
        match &self.email {
            Some(email) => format!("{} <{}>", self.name, email),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let first = Contact::with_generated_id("Dana");
        let second = Contact::with_generated_id("Dana");
        assert!(first.id().starts_with("contact-"));
        assert_ne!(first.id, second.id);
        assert_eq!(first.name(), "Dana");
    }

    #[test]
    fn label_includes_email_when_known() {
        let contact = Contact::new("dana", "Dana");
        assert_eq!(contact.display_label(), "Dana");
        let contact = contact.with_email("dana@example.com");
        assert_eq!(contact.display_label(), "Dana <dana@example.com>");
        assert!(contact.participant().is_contact("dana"));
    }
}
