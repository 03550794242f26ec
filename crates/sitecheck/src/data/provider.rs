//! Aggregates several data sources into one record stream.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::model::{Priority, WebsiteTestData};
use super::{json, tabular};
use crate::result::{SitecheckError, SitecheckResult};

/// Supported source formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// `.json`
    Json,
    /// `.csv`
    Csv,
    /// `.xlsx`, `.xlsm`, `.xls`, `.ods`
    Excel,
}

impl SourceFormat {
    /// Detect the format of a path
    ///
    /// # Errors
    ///
    /// Returns a parse error for unknown extensions
    pub fn detect(path: &Path) -> SitecheckResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Excel),
            other => Err(SitecheckError::parse(
                path.display().to_string(),
                format!("unsupported data source extension '{other}'"),
            )),
        }
    }
}

/// Load every record from one source
///
/// # Errors
///
/// Returns an error when the file is missing, unreadable, or malformed
pub fn load_source(path: impl AsRef<Path>) -> SitecheckResult<Vec<WebsiteTestData>> {
    let path = path.as_ref();
    match SourceFormat::detect(path)? {
        SourceFormat::Json => json::read_test_data(path),
        SourceFormat::Csv => tabular::read_csv(path),
        SourceFormat::Excel => tabular::read_excel(path),
    }
}

/// Validation outcome for one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceValidation {
    /// Source path
    pub path: PathBuf,
    /// Detected format, if the extension is known
    pub format: Option<SourceFormat>,
    /// Number of records read
    pub records: usize,
    /// Reason for failure, `None` when valid
    pub error: Option<String>,
}

impl SourceValidation {
    /// Readable, well-formed and non-empty
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

/// Central test data provider over registered sources
#[derive(Debug, Clone, Default)]
pub struct TestDataProvider {
    sources: Vec<PathBuf>,
}

impl TestDataProvider {
    /// Provider with no sources
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source
    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.add_source(path);
        self
    }

    /// Register a source
    pub fn add_source(&mut self, path: impl Into<PathBuf>) {
        self.sources.push(path.into());
    }

    /// Registered sources in order
    #[must_use]
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Every record from every source, in registration order
    ///
    /// # Errors
    ///
    /// Fails on the first source that cannot be loaded
    pub fn all(&self) -> SitecheckResult<Vec<WebsiteTestData>> {
        let mut all = Vec::new();
        for source in &self.sources {
            let records = load_source(source)?;
            tracing::info!(source = %source.display(), count = records.len(), "loaded test data source");
            all.extend(records);
        }
        tracing::info!(total = all.len(), "loaded test cases from all sources");
        Ok(all)
    }

    /// Records for one environment (case-insensitive)
    pub fn for_environment(&self, environment: &str) -> SitecheckResult<Vec<WebsiteTestData>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|d| d.environment.eq_ignore_ascii_case(environment))
            .collect())
    }

    /// Records with the given priority
    pub fn by_priority(&self, priority: Priority) -> SitecheckResult<Vec<WebsiteTestData>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|d| d.priority == priority)
            .collect())
    }

    /// High-priority records
    pub fn smoke(&self) -> SitecheckResult<Vec<WebsiteTestData>> {
        self.by_priority(Priority::High)
    }

    /// Check every source independently
    #[must_use]
    pub fn validate_sources(&self) -> Vec<SourceValidation> {
        self.sources
            .iter()
            .map(|path| {
                let format = SourceFormat::detect(path).ok();
                let (records, error) = match load_source(path) {
                    Ok(r) if r.is_empty() => (0, Some("source contains no records".to_string())),
                    Ok(r) => (r.len(), None),
                    Err(e) => (0, Some(e.to_string())),
                };
                if let Some(ref reason) = error {
                    tracing::warn!(source = %path.display(), reason = %reason, "data source validation failed");
                }
                SourceValidation {
                    path: path.clone(),
                    format,
                    records,
                    error,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const CSV: &str = "\
TestName,Website,ExpectedTitle,ButtonText,Environment,Priority
GitHub Homepage,GitHub,GitHub,Sign up,dev,high
JUnit Docs,JUnit,JUnit,,staging,medium
Selenium Prod,Selenium,Selenium,,prod,high
";

    const JSON: &str = r#"[{"name": "Maven", "url": "https://maven.apache.org", "expectedTitle": "Maven"}]"#;

    fn fixture() -> (tempfile::TempDir, TestDataProvider) {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("website-test-data.csv");
        let json = dir.path().join("links.json");
        std::fs::write(&csv, CSV).unwrap();
        std::fs::write(&json, JSON).unwrap();
        let provider = TestDataProvider::new().with_source(csv).with_source(json);
        (dir, provider)
    }

    mod format_tests {
        use super::*;

        #[test]
        fn test_detect() {
            assert_eq!(SourceFormat::detect(Path::new("a.JSON")).unwrap(), SourceFormat::Json);
            assert_eq!(SourceFormat::detect(Path::new("a.csv")).unwrap(), SourceFormat::Csv);
            assert_eq!(SourceFormat::detect(Path::new("a.xlsx")).unwrap(), SourceFormat::Excel);
            assert!(SourceFormat::detect(Path::new("a.txt")).is_err());
            assert!(SourceFormat::detect(Path::new("noext")).is_err());
        }
    }

    mod provider_tests {
        use super::*;

        #[test]
        fn test_all_in_registration_order() {
            let (_dir, provider) = fixture();
            let all = provider.all().unwrap();
            assert_eq!(all.len(), 4);
            assert_eq!(all[0].test_name, "GitHub Homepage");
            assert_eq!(all[3].test_name, "Maven_JSON_Test");
        }

        #[test]
        fn test_for_environment() {
            let (_dir, provider) = fixture();
            let dev = provider.for_environment("DEV").unwrap();
            let names: Vec<&str> = dev.iter().map(|d| d.test_name.as_str()).collect();
            assert_eq!(names, vec!["GitHub Homepage", "Maven_JSON_Test"]);
            assert_eq!(provider.for_environment("qa").unwrap().len(), 0);
        }

        #[test]
        fn test_smoke_is_high_priority() {
            let (_dir, provider) = fixture();
            let smoke = provider.smoke().unwrap();
            assert_eq!(smoke.len(), 2);
            assert!(smoke.iter().all(|d| d.priority == Priority::High));
            assert_eq!(provider.by_priority(Priority::Low).unwrap().len(), 0);
        }

        #[test]
        fn test_missing_source_fails_all() {
            let provider = TestDataProvider::new().with_source("/nope/links.json");
            assert!(provider.all().is_err());
        }

        #[test]
        fn test_empty_provider() {
            let provider = TestDataProvider::new();
            assert!(provider.all().unwrap().is_empty());
            assert!(provider.validate_sources().is_empty());
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_valid_sources() {
            let (_dir, provider) = fixture();
            let report = provider.validate_sources();
            assert_eq!(report.len(), 2);
            assert!(report.iter().all(SourceValidation::is_valid));
            assert_eq!(report[0].records, 3);
            assert_eq!(report[0].format, Some(SourceFormat::Csv));
        }

        #[test]
        fn test_invalid_sources_reported_individually() {
            let dir = tempfile::tempdir().unwrap();
            let empty = dir.path().join("empty.json");
            let bad_header = dir.path().join("bad.csv");
            std::fs::write(&empty, "[]").unwrap();
            std::fs::write(&bad_header, "Name,Url\nx,y\n").unwrap();

            let provider = TestDataProvider::new()
                .with_source(&empty)
                .with_source(&bad_header)
                .with_source(dir.path().join("notes.txt"));
            let report = provider.validate_sources();

            assert_eq!(report.len(), 3);
            assert!(report.iter().all(|v| !v.is_valid()));
            assert!(report[0].error.as_deref().unwrap().contains("no records"));
            assert!(report[1].error.as_deref().unwrap().contains("TestName"));
            assert!(report[2].format.is_none());
        }
    }
}
