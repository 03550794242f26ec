//! `sitecheck validate`

use crate::{CliConfig, CliError, CliResult, ValidateArgs};
use crate::output::ProgressReporter;
use sitecheck::SourceValidation;

/// One human-readable line per source
#[must_use]
pub fn describe(validation: &SourceValidation) -> String {
    let path = validation.path.display();
    match (&validation.error, validation.format) {
        (Some(reason), _) => format!("{path}: {reason}"),
        (None, Some(format)) => format!(
            "{path}: {} records ({})",
            validation.records,
            format!("{format:?}").to_lowercase()
        ),
        (None, None) => format!("{path}: {} records", validation.records),
    }
}

/// Validate every data source; fails if any is unusable
pub fn execute_validate(config: &CliConfig, args: &ValidateArgs) -> CliResult<()> {
    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());
    let provider = super::provider_for(&args.data);

    reporter.header("Data Source Validation");
    let results = provider.validate_sources();
    let invalid = results.iter().filter(|v| !v.is_valid()).count();
    for validation in &results {
        if validation.is_valid() {
            reporter.success(&describe(validation));
        } else {
            reporter.failure(&describe(validation));
        }
    }

    if invalid > 0 {
        return Err(CliError::invalid_argument(format!(
            "{invalid} of {} data sources are invalid",
            results.len()
        )));
    }
    Ok(())
}
