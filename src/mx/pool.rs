//! Bounded worker pool over the set of distinct domains.
//!
//! Each worker owns its resolver and pulls domains from a shared cursor;
//! one lookup's failure or timeout never aborts sibling lookups. A
//! pool-wide deadline stops *new* lookups from being issued; every domain
//! still queued past that point is classified [`MxStatus::Unknown`].

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config;

use super::resolver::{self, LookupMx};
use super::{Error, MxStatus};

/// Tunables for one MX stage run.
#[derive(Debug, Clone)]
pub struct MxPoolOptions {
    /// Per-domain DNS query timeout.
    pub timeout: Duration,
    /// Wall-time budget for the whole stage.
    pub deadline: Duration,
    /// Upper bound on concurrent lookups; clamped to the number of domains.
    pub max_workers: usize,
}

impl Default for MxPoolOptions {
    fn default() -> Self {
        Self {
            timeout: config::DNS_TIMEOUT,
            deadline: config::MX_DEADLINE,
            max_workers: config::MAX_MX_WORKERS,
        }
    }
}

/// Resolve every domain in `domains` to an [`MxStatus`].
///
/// The result holds exactly one entry per input domain (write-once per run:
/// rows sharing a domain share the entry).
pub fn check_domains(
    domains: &BTreeSet<String>,
    options: &MxPoolOptions,
) -> HashMap<String, MxStatus> {
    check_domains_with(domains, options, || resolver::make_resolver(options.timeout))
}

pub(crate) fn check_domains_with<R, F>(
    domains: &BTreeSet<String>,
    options: &MxPoolOptions,
    make_resolver: F,
) -> HashMap<String, MxStatus>
where
    R: LookupMx,
    F: Fn() -> Result<R, Error> + Sync,
{
    if domains.is_empty() {
        return HashMap::new();
    }

    let started = Instant::now();
    let deadline = started + options.deadline;
    let queue: Vec<&String> = domains.iter().collect();
    let cursor = AtomicUsize::new(0);
    let workers = options.max_workers.clamp(1, queue.len());
    let (tx, rx) = mpsc::channel::<(String, MxStatus)>();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = tx.clone();
            let queue = &queue;
            let cursor = &cursor;
            let make_resolver = &make_resolver;
            scope.spawn(move || {
                let mut resolver: Option<R> = None;
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(domain) = queue.get(index) else {
                        break;
                    };
                    let status = if Instant::now() >= deadline {
                        debug!(domain = domain.as_str(), "deadline passed, skipping lookup");
                        MxStatus::Unknown
                    } else {
                        lookup_one(&mut resolver, make_resolver, domain.as_str())
                    };
                    if tx.send(((*domain).clone(), status)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);
    });

    let results: HashMap<String, MxStatus> = rx.into_iter().collect();
    debug!(
        domains = results.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "MX stage finished"
    );
    results
}

fn lookup_one<R, F>(slot: &mut Option<R>, make_resolver: &F, domain: &str) -> MxStatus
where
    R: LookupMx,
    F: Fn() -> Result<R, Error>,
{
    if slot.is_none() {
        match make_resolver() {
            Ok(resolver) => *slot = Some(resolver),
            Err(err) => {
                // DNS trouble is row-level, never fatal for the run
                warn!(error = %err, "resolver unavailable, classifying as unknown");
                return MxStatus::Unknown;
            }
        }
    }
    let Some(resolver) = slot.as_ref() else {
        return MxStatus::Unknown;
    };
    match resolver::normalize_domain(domain) {
        Ok(ascii) => resolver::classify_with(resolver, &ascii),
        Err(_) => MxStatus::Unknown,
    }
}
