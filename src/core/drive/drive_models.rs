/// A PDF file as reported by the remote folder listing. Transient: only its
/// derived text is ever persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub id: String,
    pub name: String,
}
