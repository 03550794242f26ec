//! JSON test data.
//!
//! A JSON source is an array whose elements are either link objects
//! (`{"name", "url", "expectedTitle"?}`) or full website records
//! (`{"testName", "website", ...}`). Both shapes may be mixed in one file.

use std::path::Path;

use serde::Deserialize;

use super::model::{LinkData, Priority, WebsiteTestData};
use crate::result::{SitecheckError, SitecheckResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebsiteRecord {
    #[serde(alias = "test_name")]
    test_name: String,
    website: String,
    #[serde(default, alias = "website_url")]
    website_url: Option<String>,
    #[serde(default, alias = "expected_title")]
    expected_title: Option<String>,
    #[serde(default, alias = "button_text")]
    button_text: Option<String>,
    #[serde(default)]
    environment: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkRecord {
    name: String,
    url: String,
    #[serde(default, alias = "expected_title")]
    expected_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonRecord {
    Website(WebsiteRecord),
    Link(LinkRecord),
}

impl WebsiteRecord {
    fn into_data(self) -> SitecheckResult<WebsiteTestData> {
        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => Priority::default(),
            Some(p) => p.parse()?,
        };
        let mut builder = WebsiteTestData::builder()
            .test_name(self.test_name)
            .website(self.website)
            .maybe_expected_title(self.expected_title)
            .priority(priority);
        if let Some(url) = self.website_url {
            builder = builder.website_url(url);
        }
        if let Some(text) = self.button_text {
            builder = builder.button_text(text);
        }
        if let Some(env) = self.environment {
            builder = builder.environment(env);
        }
        builder.build()
    }
}

impl LinkRecord {
    fn into_link(self) -> SitecheckResult<LinkData> {
        let mut builder = LinkData::builder().name(self.name).url(self.url);
        if let Some(title) = self.expected_title {
            builder = builder.expected_title(title);
        }
        builder.build()
    }
}

/// Parse link objects from JSON text
///
/// # Errors
///
/// Returns a parse error when the document is not an array of link objects
pub fn parse_links(content: &str, source_name: &str) -> SitecheckResult<Vec<LinkData>> {
    let records: Vec<LinkRecord> = serde_json::from_str(content)
        .map_err(|e| SitecheckError::parse(source_name, e.to_string()))?;
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_link().map_err(|e| at_index(source_name, i, &e)))
        .collect()
}

/// Parse website records (link objects are converted) from JSON text
///
/// # Errors
///
/// Returns a parse error when the document is malformed or a record lacks
/// required fields
pub fn parse_test_data(content: &str, source_name: &str) -> SitecheckResult<Vec<WebsiteTestData>> {
    let records: Vec<JsonRecord> = serde_json::from_str(content).map_err(|e| {
        SitecheckError::parse(
            source_name,
            format!("expected an array of link or website objects: {e}"),
        )
    })?;

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let data = match record {
                JsonRecord::Website(w) => w.into_data(),
                JsonRecord::Link(l) => l.into_link().map(LinkData::into_test_data),
            };
            data.map_err(|e| at_index(source_name, i, &e))
        })
        .collect()
}

/// Read link objects from a JSON file
pub fn read_links(path: impl AsRef<Path>) -> SitecheckResult<Vec<LinkData>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    parse_links(&content, &path.display().to_string())
}

/// Read website records from a JSON file
pub fn read_test_data(path: impl AsRef<Path>) -> SitecheckResult<Vec<WebsiteTestData>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let records = parse_test_data(&content, &path.display().to_string())?;
    tracing::debug!(source = %path.display(), count = records.len(), "loaded JSON test data");
    Ok(records)
}

fn at_index(source_name: &str, index: usize, err: &SitecheckError) -> SitecheckError {
    SitecheckError::parse(source_name, format!("record {index}: {err}"))
}
