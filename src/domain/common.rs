/// Entities addressed by a string id (`contact-…`, `expense-…`).
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Entities with a name shown to the user.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// One-line label for listings and log lines.
pub trait Displayable {
    fn display_label(&self) -> String;
}
