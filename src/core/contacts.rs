use crate::domain::Contact;

/// Read-only lookup into the contacts store. The ledger never mutates contacts.
pub trait ContactDirectory: Send + Sync {
    fn contact(&self, id: &str) -> Option<Contact>;
    fn contacts(&self) -> Vec<Contact>;

    fn contains(&self, id: &str) -> bool {
        self.contact(id).is_some()
    }

    /// Display name for `id`, falling back to the raw id for unknown contacts.
    fn display_name(&self, id: &str) -> String {
        self.contact(id)
            .map(|contact| contact.name)
            .unwrap_or_else(|| id.to_string())
    }
}

/// Vector-backed directory used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContacts {
    entries: Vec<Contact>,
}

impl InMemoryContacts {
    pub fn new(entries: Vec<Contact>) -> Self {
        Self { entries }
    }

    /// Inserts or replaces the contact with the same id.
    pub fn upsert(&mut self, contact: Contact) {
        match self.entries.iter_mut().find(|known| known.id == contact.id) {
            Some(existing) => *existing = contact,
            None => self.entries.push(contact),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ContactDirectory for InMemoryContacts {
    fn contact(&self, id: &str) -> Option<Contact> {
        self.entries.iter().find(|contact| contact.id == id).cloned()
    }

    fn contacts(&self) -> Vec<Contact> {
        self.entries.clone()
    }
}
