//! DNS MX reachability classification (optional `with-mx` feature).
//!
//! [`MxStatus`] is always available so the pipeline's data model does not
//! depend on the feature; the resolver, the worker pool and [`check_mx`]
//! need `with-mx`. Lookups classify, they never fail the run: a transient
//! resolver problem is `Unknown`, a definitive miss is `NoMx`.

mod types;

pub use types::MxStatus;

#[cfg(feature = "with-mx")]
mod error;
#[cfg(feature = "with-mx")]
mod pool;
#[cfg(feature = "with-mx")]
mod resolver;

#[cfg(feature = "with-mx")]
pub use error::MxError as Error;
#[cfg(feature = "with-mx")]
pub use pool::{MxPoolOptions, check_domains};
#[cfg(feature = "with-mx")]
pub use resolver::check_mx;
#[cfg(feature = "with-mx")]
pub use types::MxRecord;
