/// Outcome of the syntax check for one address.
///
/// `local_ok`/`domain_ok` record which side of the `@` failed so later
/// stages can tell a domain-level problem (candidate for a typo fix) from a
/// broken local part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxReport {
    pub ok: bool,
    pub local_ok: bool,
    pub domain_ok: bool,
    pub reasons: Vec<String>,
}

impl SyntaxReport {
    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            local_ok: false,
            domain_ok: false,
            reasons: vec![reason.into()],
        }
    }
}
