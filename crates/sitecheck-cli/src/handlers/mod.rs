//! Command handlers, kept out of main.rs for testability
//!
//! Each handler module holds the execution logic for one command plus the
//! pure helpers it is built from.

pub mod data;
pub mod perf;
pub mod run;
pub mod validate;

use sitecheck::TestDataProvider;
use std::path::PathBuf;

pub use data::execute_data;
pub use perf::execute_perf;
pub use run::{dry_run_driver, execute_run, select_records};
pub use validate::execute_validate;

/// Provider over the given data files
#[must_use]
pub fn provider_for(paths: &[PathBuf]) -> TestDataProvider {
    let mut provider = TestDataProvider::new();
    for path in paths {
        provider.add_source(path);
    }
    provider
}
