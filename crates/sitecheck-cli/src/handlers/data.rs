//! `sitecheck data`

use crate::output::OutputFormat;
use crate::{CliResult, DataArgs};
use sitecheck::{Priority, WebsiteTestData};

/// Keep records matching the optional environment and priority
#[must_use]
pub fn filter_records(
    records: Vec<WebsiteTestData>,
    env: Option<&str>,
    priority: Option<Priority>,
) -> Vec<WebsiteTestData> {
    records
        .into_iter()
        .filter(|r| env.map_or(true, |e| r.environment.eq_ignore_ascii_case(e)))
        .filter(|r| priority.map_or(true, |p| r.priority == p))
        .collect()
}

/// Render records as text lines or a JSON array
pub fn render_records(records: &[WebsiteTestData], format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Text => {
            let mut out = String::new();
            for record in records {
                out.push_str(&record.to_string());
                out.push('\n');
            }
            out.push_str(&format!("{} records\n", records.len()));
            Ok(out)
        }
    }
}

/// List records from the given sources on stdout
pub fn execute_data(args: &DataArgs) -> CliResult<()> {
    let provider = super::provider_for(&args.data);
    let records = filter_records(
        provider.all()?,
        args.env.as_deref(),
        args.priority.map(Priority::from),
    );
    print!("{}", render_records(&records, args.format.into())?);
    Ok(())
}
