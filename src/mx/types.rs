/// Classification of a domain's mail reachability.
///
/// `NotChecked` is the resting state when the MX stage is disabled or the
/// row never reached it.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MxStatus {
    #[default]
    NotChecked,
    /// One or more MX records, or a resolvable host address as fallback.
    Valid,
    /// NXDOMAIN or definitively no mail records.
    NoMx,
    /// Timeout, transient resolver error or deadline cut-off.
    Unknown,
}

impl MxStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotChecked => "not_checked",
            Self::Valid => "valid",
            Self::NoMx => "no_mx",
            Self::Unknown => "mx_unknown",
        }
    }
}

#[cfg(feature = "with-mx")]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

#[cfg(feature = "with-mx")]
impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}
