use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel identifier used for the local user in persisted splits and payers.
pub const CURRENT_USER_ID: &str = "current-user";

/// Either the local user or a contact referenced by id.
///
/// Serialized as a bare string: [`CURRENT_USER_ID`] for the local user, the contact id
/// otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Participant {
    CurrentUser,
    Contact(String),
}

impl Participant {
    pub fn contact(id: impl Into<String>) -> Self {
        Participant::from(id.into())
    }

    pub fn is_current_user(&self) -> bool {
        matches!(self, Participant::CurrentUser)
    }

    /// Returns the contact id, or `None` for the local user.
    pub fn contact_id(&self) -> Option<&str> {
        match self {
            Participant::CurrentUser => None,
            Participant::Contact(id) => Some(id),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Participant::CurrentUser => CURRENT_USER_ID,
            Participant::Contact(id) => id,
        }
    }

    /// True when this participant is the contact identified by `contact_id`.
    pub fn is_contact(&self, contact_id: &str) -> bool {
        self.contact_id() == Some(contact_id)
    }
}

impl From<String> for Participant {
    fn from(value: String) -> Self {
        if value == CURRENT_USER_ID {
            Participant::CurrentUser
        } else {
            Participant::Contact(value)
        }
    }
}

impl From<&str> for Participant {
    fn from(value: &str) -> Self {
        Participant::from(value.to_string())
    }
}

impl From<Participant> for String {
    fn from(value: Participant) -> Self {
        match value {
            Participant::CurrentUser => CURRENT_USER_ID.to_string(),
            Participant::Contact(id) => id,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_maps_to_current_user() {
        assert_eq!(Participant::from("current-user"), Participant::CurrentUser);
        assert_eq!(
            Participant::from("contact-1"),
            Participant::Contact("contact-1".into())
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&vec![
            Participant::CurrentUser,
            Participant::contact("alice"),
        ])
        .unwrap();
        assert_eq!(json, r#"["current-user","alice"]"#);

        let parsed: Vec<Participant> = serde_json::from_str(&json).unwrap();
        assert!(parsed[0].is_current_user());
        assert!(parsed[1].is_contact("alice"));
    }
}
