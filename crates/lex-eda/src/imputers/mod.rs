//! Imputation module for filling missing values.
//!
//! This module provides:
//! - Statistical imputation (mean, median, mode)
//! - Sequential imputation (forward fill with backward fill for leading gaps)
//!
//! Imputers never touch the input Series; they return a filled copy, or
//! `None` when the column has no value to impute from.

mod sequential;
mod statistical;

pub use sequential::SequentialImputer;
pub use statistical::StatisticalImputer;
