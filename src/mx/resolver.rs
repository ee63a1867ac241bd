use std::time::Duration;

use tracing::debug;
use trust_dns_resolver::Resolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

use super::{Error, MxRecord, MxStatus};

/// Resolver failures folded into the three cases the classifier cares
/// about. Everything that is not a definitive "no records" answer stays
/// transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LookupError {
    NoRecords,
    Timeout,
    Failed(String),
}

/// Seam between the classifier and the actual DNS client; tests plug in a
/// stub.
pub(crate) trait LookupMx {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, LookupError>;
    /// Whether the bare domain resolves to any host address.
    fn lookup_host(&self, domain: &str) -> Result<bool, LookupError>;
}

/// One-shot MX classification for a single domain using a dedicated
/// resolver. Pipeline runs go through the pool instead.
pub fn check_mx(domain: &str, timeout: Duration) -> Result<MxStatus, Error> {
    let ascii = normalize_domain(domain)?;
    let resolver = make_resolver(timeout)?;
    Ok(classify_with(&resolver, &ascii))
}

/// Default-config resolver with our timeout; two attempts to fail fast.
pub(crate) fn make_resolver(timeout: Duration) -> Result<Resolver, Error> {
    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 2;
    Resolver::new(ResolverConfig::default(), opts).map_err(Error::resolver_init)
}

/// Classify one IDNA-normalized domain. Lookup failures never escape:
/// they become [`MxStatus::Unknown`] (transient) or [`MxStatus::NoMx`]
/// (definitive).
pub(crate) fn classify_with<R: LookupMx>(resolver: &R, ascii_domain: &str) -> MxStatus {
    match resolver.lookup_mx(ascii_domain) {
        Ok(records) if !records.is_empty() => MxStatus::Valid,
        Ok(_) | Err(LookupError::NoRecords) => host_fallback(resolver, ascii_domain),
        Err(LookupError::Timeout) => MxStatus::Unknown,
        Err(LookupError::Failed(reason)) => {
            debug!(domain = ascii_domain, reason = %reason, "MX lookup failed");
            MxStatus::Unknown
        }
    }
}

/// A domain without MX records can still receive mail through a resolvable
/// host address; only a definitive miss downgrades to `NoMx`.
fn host_fallback<R: LookupMx>(resolver: &R, ascii_domain: &str) -> MxStatus {
    match resolver.lookup_host(ascii_domain) {
        Ok(true) => MxStatus::Valid,
        Ok(false) | Err(LookupError::NoRecords) => MxStatus::NoMx,
        Err(LookupError::Timeout) => MxStatus::Unknown,
        Err(LookupError::Failed(reason)) => {
            debug!(domain = ascii_domain, reason = %reason, "host fallback lookup failed");
            MxStatus::Unknown
        }
    }
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(Error::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}

fn map_resolve_error(err: ResolveError) -> LookupError {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { .. } => LookupError::NoRecords,
        ResolveErrorKind::Timeout => LookupError::Timeout,
        _ => LookupError::Failed(err.to_string()),
    }
}

impl LookupMx for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, LookupError> {
        let lookup = Resolver::mx_lookup(self, domain).map_err(map_resolve_error)?;
        let mut records: Vec<MxRecord> = lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect();
        records.sort();
        records.dedup();
        Ok(records)
    }

    fn lookup_host(&self, domain: &str) -> Result<bool, LookupError> {
        let lookup = Resolver::lookup_ip(self, domain).map_err(map_resolve_error)?;
        Ok(lookup.iter().next().is_some())
    }
}
