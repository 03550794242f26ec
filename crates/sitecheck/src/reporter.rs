//! Report rendering for a [`TestSummary`].
//!
//! - HTML: self-contained page for humans
//! - JUnit XML: one `<testsuite>` per page result, for CI
//! - JSON: the summary as-is, for tooling

use std::path::Path;

use crate::result::SitecheckResult;
use crate::summary::{one_decimal, TestResult, TestSummary};

/// HTML report builder
#[derive(Debug, Clone)]
pub struct HtmlReport {
    title: String,
    environment: Option<String>,
    generated_at: String,
}

impl Default for HtmlReport {
    fn default() -> Self {
        Self::new("Sitecheck Test Report")
    }
}

impl HtmlReport {
    /// Report with a page title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            environment: None,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Show the environment in the summary block
    #[must_use]
    pub fn with_environment(mut self, env: impl Into<String>) -> Self {
        self.environment = Some(env.into());
        self
    }

    /// Fix the generation timestamp
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = timestamp.into();
        self
    }

    /// Render the HTML document
    #[must_use]
    pub fn render(&self, summary: &TestSummary) -> String {
        let mut html = String::new();

        html.push_str(&format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{}</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; }}
        .summary {{ background: #f5f5f5; padding: 20px; border-radius: 8px; margin-bottom: 20px; }}
        .progress-bar {{ background: #ddd; height: 20px; border-radius: 10px; overflow: hidden; }}
        .passed {{ background: #4caf50; height: 100%; }}
        .suite {{ margin: 15px 0; }}
        .suite h3 {{ margin-bottom: 5px; }}
        .test {{ padding: 10px; margin: 5px 0; border-radius: 4px; }}
        .test.pass {{ background: #e8f5e9; border-left: 4px solid #4caf50; }}
        .test.fail {{ background: #ffebee; border-left: 4px solid #f44336; }}
        .details {{ color: #555; font-family: monospace; white-space: pre-wrap; }}
    </style>
</head>
<body>
"#,
            escape_html(&self.title)
        ));

        let context = if summary.context().is_empty() {
            String::new()
        } else {
            format!("    <p>Data set: {}</p>\n", escape_html(summary.context()))
        };
        let environment = self
            .environment
            .as_deref()
            .map(|env| format!("    <p>Environment: {}</p>\n", escape_html(env)))
            .unwrap_or_default();

        html.push_str(&format!(
            r#"<div class="summary">
    <h1>{}</h1>
    <h2>Results: {}/{} passed ({:.1}%)</h2>
    <div class="progress-bar">
        <div class="passed" style="width: {:.1}%"></div>
    </div>
    <p>Test Suites: {} | Failed: {}</p>
{}{}    <p>Generated: {}</p>
</div>
"#,
            escape_html(&self.title),
            summary.total_passed(),
            summary.total_tests(),
            one_decimal(summary.pass_percentage()),
            one_decimal(summary.pass_percentage()),
            summary.total_suites(),
            summary.total_failed(),
            context,
            environment,
            escape_html(&self.generated_at)
        ));

        html.push_str("<h2>Test Results</h2>\n");
        for result in summary.results() {
            render_result(&mut html, result);
        }

        html.push_str(
            r#"
<footer>
    <p>Generated by Sitecheck</p>
</footer>
</body>
</html>
"#,
        );

        html
    }

    /// Render and write to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn write(&self, summary: &TestSummary, path: &Path) -> SitecheckResult<()> {
        write_file(path, &self.render(summary))?;
        tracing::info!(path = %path.display(), "HTML report written");
        Ok(())
    }
}

fn render_result(html: &mut String, result: &TestResult) {
    let heading = if result.context().is_empty() {
        escape_html(result.test_name())
    } else {
        format!(
            "{} <small>[{}]</small>",
            escape_html(result.test_name()),
            escape_html(result.context())
        )
    };

    html.push_str(&format!(
        r#"<div class="suite">
    <h3>{} - {}/{} passed ({:.1}%)</h3>
"#,
        heading,
        result.passed_count(),
        result.total_tests(),
        one_decimal(result.pass_percentage())
    ));

    for test in result.tests() {
        let (class, marker) = if test.passed() {
            ("pass", "PASS")
        } else {
            ("fail", "FAIL")
        };
        html.push_str(&format!(
            r#"    <div class="test {class}">
        <strong>{marker}</strong> {}
"#,
            escape_html(test.description())
        ));
        if !test.details().is_empty() {
            html.push_str(&format!(
                "        <div class=\"details\">{}</div>\n",
                escape_html(test.details())
            ));
        }
        html.push_str("    </div>\n");
    }

    html.push_str("</div>\n");
}

/// JUnit XML report builder
#[derive(Debug, Clone)]
pub struct JunitReport {
    name: String,
}

impl Default for JunitReport {
    fn default() -> Self {
        Self::new("sitecheck")
    }
}

impl JunitReport {
    /// Report whose `<testsuites>` element carries `name`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Render JUnit XML content
    #[must_use]
    pub fn render(&self, summary: &TestSummary) -> String {
        let mut xml = String::new();

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuites name="{}" tests="{}" failures="{}">"#,
            escape_xml(&self.name),
            summary.total_tests(),
            summary.total_failed()
        ));
        xml.push('\n');

        for result in summary.results() {
            let suite_name = if result.context().is_empty() {
                result.test_name().to_string()
            } else {
                format!("{} [{}]", result.test_name(), result.context())
            };
            xml.push_str(&format!(
                r#"  <testsuite name="{}" tests="{}" failures="{}">"#,
                escape_xml(&suite_name),
                result.total_tests(),
                result.failed_count()
            ));
            xml.push('\n');

            for test in result.tests() {
                xml.push_str(&format!(
                    r#"    <testcase name="{}" classname="{}">"#,
                    escape_xml(test.description()),
                    escape_xml(result.test_name())
                ));
                xml.push('\n');

                if !test.passed() {
                    xml.push_str(&format!(
                        r#"      <failure message="{}">{}</failure>"#,
                        escape_xml(test.details()),
                        escape_xml(test.details())
                    ));
                    xml.push('\n');
                } else if !test.details().is_empty() {
                    xml.push_str(&format!(
                        "      <system-out>{}</system-out>\n",
                        escape_xml(test.details())
                    ));
                }

                xml.push_str("    </testcase>\n");
            }

            xml.push_str("  </testsuite>\n");
        }

        xml.push_str("</testsuites>\n");
        xml
    }

    /// Render and write to `path`
    ///
    /// # Errors
    ///
    /// Returns error if file writing fails
    pub fn write(&self, summary: &TestSummary, path: &Path) -> SitecheckResult<()> {
        write_file(path, &self.render(summary))?;
        tracing::info!(path = %path.display(), "JUnit report written");
        Ok(())
    }
}

/// Pretty-printed JSON of the whole summary
///
/// # Errors
///
/// Returns error if serialization fails
pub fn render_json(summary: &TestSummary) -> SitecheckResult<String> {
    Ok(serde_json::to_string_pretty(summary)?)
}

/// Write the summary as JSON
///
/// # Errors
///
/// Returns error if serialization or file writing fails
pub fn write_json(summary: &TestSummary, path: &Path) -> SitecheckResult<()> {
    write_file(path, &render_json(summary)?)?;
    tracing::info!(path = %path.display(), "JSON report written");
    Ok(())
}

fn write_file(path: &Path, content: &str) -> SitecheckResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Escape HTML text content
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
