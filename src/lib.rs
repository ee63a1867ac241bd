#![forbid(unsafe_code)]
//! mailsweep_lib — nettoyage de listes e-mail (normalisation, validation, MX, suggestions)

pub mod cleaner;
pub mod config;
pub mod lists;
pub mod mx;
pub mod pipeline;
pub mod suggest;
pub mod suppression;
pub mod table;
pub mod validator;

#[cfg(feature = "with-csv")]
pub mod io;

pub use config::CleanOptions;
pub use lists::{DomainLists, ListError};
pub use mx::MxStatus;
pub use pipeline::{
    ClassifiedRow,
    Disposition,
    EmailRecord,
    PipelineError,
    PipelineResult,
    ReasonCode,
    ReasonStat,
    Summary,
    ValidationOutcome,
    clean_list,
    reasons_histogram,
};
pub use suggest::{Suggestion, suggest_domain};
pub use suppression::SuppressionList;
pub use table::Table;
pub use validator::{SyntaxReport, check_syntax, is_syntax_valid};

#[cfg(feature = "with-mx")]
pub use mx::{Error as MxError, MxPoolOptions, MxRecord, check_domains, check_mx};
