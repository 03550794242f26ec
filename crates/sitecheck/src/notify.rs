//! Slack incoming-webhook notifications.
//!
//! Payload builders are pure functions returning `serde_json::Value`;
//! [`SlackNotifier`] only delivers them.

use std::time::Duration;

use serde_json::{json, Value};

use crate::analyzer::ExecutionSummary;
use crate::result::{SitecheckError, SitecheckResult};

const COLOR_GOOD: &str = "good";
const COLOR_WARNING: &str = "warning";
const COLOR_DANGER: &str = "danger";

fn field(title: &str, value: impl Into<String>, short: bool) -> Value {
    json!({ "title": title, "value": value.into(), "short": short })
}

/// Message sent when a run finishes
#[must_use]
pub fn completion_payload(summary: &ExecutionSummary, environment: &str) -> Value {
    let (text, color) = if summary.has_failures() {
        ("⚠️ *Test Execution Completed with Failures*", COLOR_WARNING)
    } else {
        ("✅ *All Tests Passed!* 🎉", COLOR_GOOD)
    };

    let mut attachments = vec![json!({
        "color": color,
        "title": "Test Execution Summary",
        "fields": [
            field("Total Tests", summary.total_tests.to_string(), true),
            field("Passed", summary.passed_tests.to_string(), true),
            field("Failed", summary.failed_tests.to_string(), true),
            field("Skipped", summary.skipped_tests.to_string(), true),
            field("Success Rate", format!("{}%", summary.success_rate), true),
            field("Duration", format!("{}ms", summary.execution_time_ms), true),
            field("Environment", environment, true),
        ],
    })];

    if summary.has_failures() {
        let mut listing = String::from("```");
        for name in &summary.failed_test_names {
            listing.push_str(name);
            listing.push('\n');
        }
        listing.push_str("```");
        attachments.push(json!({
            "color": COLOR_DANGER,
            "title": "Failed Tests",
            "text": listing,
        }));
    }

    json!({ "text": text, "attachments": attachments })
}

/// Immediate alert for one failing test
#[must_use]
pub fn failure_alert(test_name: &str, reason: &str, environment: &str) -> Value {
    json!({
        "text": "🚨 *Test Failure Alert* 🚨",
        "attachments": [{
            "color": COLOR_DANGER,
            "title": format!("Test: {test_name}"),
            "text": format!("Environment: {environment}"),
            "fields": [
                field("Failure Reason", reason, false),
                field("Environment", environment, true),
                field("Action Required", "Please investigate and fix", true),
            ],
        }],
    })
}

/// CI/CD pipeline status; `status == "success"` is the only green state
#[must_use]
pub fn pipeline_status(
    pipeline: &str,
    status: &str,
    build_url: Option<&str>,
    environment: &str,
) -> Value {
    let success = status.eq_ignore_ascii_case("success");
    let (emoji, color) = if success {
        ("✅", COLOR_GOOD)
    } else {
        ("❌", COLOR_DANGER)
    };

    let mut fields = vec![
        field("Status", status, true),
        field("Environment", environment, true),
    ];
    let mut attachment = json!({
        "color": color,
        "title": format!("Pipeline: {pipeline}"),
    });
    if let Some(url) = build_url {
        attachment["title_link"] = json!(url);
        fields.push(field("Build URL", format!("<{url}|View Build>"), false));
    }
    attachment["fields"] = json!(fields);

    json!({
        "text": format!("{emoji} *CI/CD Pipeline {}*", status.to_uppercase()),
        "attachments": [attachment],
    })
}

/// Posts payloads to one webhook URL
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    webhook_url: String,
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Notifier for `webhook_url` with a 30 s request timeout
    #[must_use]
    pub fn new(webhook_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self::with_client(webhook_url, client)
    }

    /// Notifier using a caller-supplied client
    #[must_use]
    pub fn with_client(webhook_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client,
        }
    }

    /// Target webhook URL
    #[must_use]
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// POST a payload
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx responses are network errors
    pub async fn send(&self, payload: &Value) -> SitecheckResult<()> {
        let resp = self
            .client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "slack webhook rejected message");
            return Err(SitecheckError::network(format!(
                "webhook returned {}: {body}",
                status.as_u16()
            )));
        }
        tracing::debug!("slack notification sent");
        Ok(())
    }

    /// Send the completion message for `summary`
    pub async fn notify_completion(
        &self,
        summary: &ExecutionSummary,
        environment: &str,
    ) -> SitecheckResult<()> {
        self.send(&completion_payload(summary, environment)).await
    }

    /// Send a failure alert
    pub async fn notify_failure(
        &self,
        test_name: &str,
        reason: &str,
        environment: &str,
    ) -> SitecheckResult<()> {
        self.send(&failure_alert(test_name, reason, environment)).await
    }

    /// Send a pipeline status message
    pub async fn notify_pipeline(
        &self,
        pipeline: &str,
        status: &str,
        build_url: Option<&str>,
        environment: &str,
    ) -> SitecheckResult<()> {
        self.send(&pipeline_status(pipeline, status, build_url, environment))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::analyzer::ExecutionRecord;
    use crate::result::ErrorKind;
    use crate::test_support::serve_status;

    fn summary(failures: usize) -> ExecutionSummary {
        let mut records = vec![ExecutionRecord::passed("ok", Duration::from_millis(120))];
        for i in 0..failures {
            records.push(ExecutionRecord::failed(
                format!("bad{i}"),
                "title mismatch",
                Duration::from_millis(30),
            ));
        }
        ExecutionSummary::analyze(&records)
    }

    mod payload_tests {
        use super::*;

        #[test]
        fn test_completion_all_passed() {
            let payload = completion_payload(&summary(0), "staging");
            assert_eq!(payload["text"], "✅ *All Tests Passed!* 🎉");
            let attachments = payload["attachments"].as_array().unwrap();
            assert_eq!(attachments.len(), 1);
            assert_eq!(attachments[0]["color"], "good");
            assert_eq!(attachments[0]["title"], "Test Execution Summary");

            let fields = attachments[0]["fields"].as_array().unwrap();
            assert_eq!(fields.len(), 7);
            assert_eq!(fields[4]["title"], "Success Rate");
            assert_eq!(fields[4]["value"], "100%");
            assert_eq!(fields[5]["value"], "120ms");
            assert_eq!(fields[6]["value"], "staging");
            assert!(fields.iter().all(|f| f["short"] == true));
        }

        #[test]
        fn test_completion_with_failures() {
            let payload = completion_payload(&summary(2), "dev");
            assert_eq!(payload["text"], "⚠️ *Test Execution Completed with Failures*");
            let attachments = payload["attachments"].as_array().unwrap();
            assert_eq!(attachments[0]["color"], "warning");
            assert_eq!(attachments[1]["color"], "danger");
            assert_eq!(attachments[1]["title"], "Failed Tests");
            assert_eq!(
                attachments[1]["text"],
                "```bad0: title mismatch\nbad1: title mismatch\n```"
            );
        }

        #[test]
        fn test_failure_alert() {
            let payload = failure_alert("Login", "button missing", "prod");
            assert_eq!(payload["text"], "🚨 *Test Failure Alert* 🚨");
            let attachment = &payload["attachments"][0];
            assert_eq!(attachment["title"], "Test: Login");
            assert_eq!(attachment["text"], "Environment: prod");
            assert_eq!(attachment["fields"][0]["value"], "button missing");
            assert_eq!(attachment["fields"][0]["short"], false);
            assert_eq!(attachment["fields"][2]["value"], "Please investigate and fix");
        }

        #[test]
        fn test_pipeline_success_with_url() {
            let payload = pipeline_status("nightly", "success", Some("https://ci/1"), "dev");
            assert_eq!(payload["text"], "✅ *CI/CD Pipeline SUCCESS*");
            let attachment = &payload["attachments"][0];
            assert_eq!(attachment["color"], "good");
            assert_eq!(attachment["title"], "Pipeline: nightly");
            assert_eq!(attachment["title_link"], "https://ci/1");
            assert_eq!(attachment["fields"][2]["value"], "<https://ci/1|View Build>");
        }

        #[test]
        fn test_pipeline_failure_without_url() {
            let payload = pipeline_status("nightly", "failed", None, "dev");
            assert_eq!(payload["text"], "❌ *CI/CD Pipeline FAILED*");
            let attachment = &payload["attachments"][0];
            assert_eq!(attachment["color"], "danger");
            assert!(attachment.get("title_link").is_none());
            assert_eq!(attachment["fields"].as_array().unwrap().len(), 2);
        }
    }

    mod delivery_tests {
        use super::*;

        #[tokio::test]
        async fn test_send_success() {
            let url = serve_status(200).await;
            let notifier = SlackNotifier::new(url);
            notifier
                .notify_failure("Login", "timeout", "dev")
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_non_success_is_network_error() {
            let url = serve_status(500).await;
            let notifier = SlackNotifier::new(url);
            let err = notifier
                .notify_completion(&summary(0), "dev")
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NetworkError);
            assert!(err.to_string().contains("500"));
        }

        #[tokio::test]
        async fn test_unreachable_is_network_error() {
            let notifier = SlackNotifier::new("http://127.0.0.1:1/hook");
            let err = notifier
                .notify_pipeline("p", "success", None, "dev")
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NetworkError);
        }
    }
}
