//! HTTP load generation and performance thresholds.
//!
//! [`LoadTest`] ramps up `users` tokio workers that issue GET requests
//! against one URL until the test duration elapses. Every worker owns its
//! sample buffer; buffers are merged after all workers join and reduced to
//! [`PerformanceMetrics`].

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::result::{SitecheckError, SitecheckResult};

/// One request as observed by a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestSample {
    /// Time until the response status arrived
    pub latency: Duration,
    /// 2xx response
    pub success: bool,
}

/// Aggregated latency, error and throughput figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Mean latency of successful requests (ms)
    pub average_response_ms: u64,
    /// Fastest successful request (ms)
    pub min_response_ms: u64,
    /// Slowest successful request (ms)
    pub max_response_ms: u64,
    /// 90th percentile (ms)
    pub p90_response_ms: u64,
    /// 95th percentile (ms)
    pub p95_response_ms: u64,
    /// 99th percentile (ms)
    pub p99_response_ms: u64,
    /// Failed requests in percent, two decimals
    pub error_rate: f64,
    /// Successful requests per second, two decimals
    pub throughput: f64,
    /// Requests issued
    pub total_requests: u64,
    /// Requests answered with 2xx
    pub successful_requests: u64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Nearest-rank percentile of a sorted slice; 0.0 when empty
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

impl PerformanceMetrics {
    /// Reduce samples collected over `elapsed` wall time
    #[must_use]
    pub fn from_samples(samples: &[RequestSample], elapsed: Duration) -> Self {
        let total = samples.len() as u64;
        let mut latencies: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.latency.as_secs_f64() * 1000.0)
            .collect();
        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let successful = latencies.len() as u64;

        let average = if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().sum::<f64>() / latencies.len() as f64
        };
        let error_rate = if total == 0 {
            0.0
        } else {
            round2((total - successful) as f64 / total as f64 * 100.0)
        };
        let secs = elapsed.as_secs_f64();
        let throughput = if secs > 0.0 {
            round2(successful as f64 / secs)
        } else {
            0.0
        };

        Self {
            average_response_ms: average.round() as u64,
            min_response_ms: latencies.first().copied().unwrap_or(0.0).round() as u64,
            max_response_ms: latencies.last().copied().unwrap_or(0.0).round() as u64,
            p90_response_ms: percentile(&latencies, 0.90).round() as u64,
            p95_response_ms: percentile(&latencies, 0.95).round() as u64,
            p99_response_ms: percentile(&latencies, 0.99).round() as u64,
            error_rate,
            throughput,
            total_requests: total,
            successful_requests: successful,
        }
    }
}

/// Outcome of one load test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    /// Test name
    pub test_name: String,
    /// Target URL
    pub url: String,
    /// Concurrent users
    pub users: usize,
    /// Ramp-up period in seconds
    pub ramp_up_secs: u64,
    /// Test duration in seconds
    pub duration_secs: u64,
    /// Aggregated figures
    pub metrics: PerformanceMetrics,
}

impl PerformanceResult {
    /// Plain-text report
    #[must_use]
    pub fn performance_report(&self) -> String {
        let m = &self.metrics;
        let mut report = String::from("=== PERFORMANCE TEST REPORT ===\n");
        let _ = writeln!(report, "Test Name: {}", self.test_name);
        let _ = writeln!(report, "URL: {}", self.url);
        let _ = writeln!(report, "User Count: {}", self.users);
        let _ = writeln!(report, "Ramp-up: {} seconds", self.ramp_up_secs);
        let _ = writeln!(report, "Duration: {} seconds\n", self.duration_secs);

        report.push_str("=== RESPONSE TIME METRICS ===\n");
        let _ = writeln!(report, "Average: {}ms", m.average_response_ms);
        let _ = writeln!(report, "Minimum: {}ms", m.min_response_ms);
        let _ = writeln!(report, "Maximum: {}ms", m.max_response_ms);
        let _ = writeln!(report, "90th Percentile: {}ms", m.p90_response_ms);
        let _ = writeln!(report, "95th Percentile: {}ms", m.p95_response_ms);
        let _ = writeln!(report, "99th Percentile: {}ms\n", m.p99_response_ms);

        report.push_str("=== THROUGHPUT & ERROR METRICS ===\n");
        let _ = writeln!(report, "Throughput: {} req/s", m.throughput);
        let _ = writeln!(report, "Total Requests: {}", m.total_requests);
        let _ = writeln!(report, "Successful Requests: {}", m.successful_requests);
        let _ = writeln!(report, "Error Rate: {}%", m.error_rate);
        report
    }
}

/// Acceptance limits for a load test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceThresholds {
    /// Maximum average response time (ms)
    pub max_average_response_ms: u64,
    /// Maximum 95th percentile (ms)
    pub max_p95_response_ms: u64,
    /// Maximum error rate (%)
    pub max_error_rate: f64,
    /// Minimum throughput (req/s)
    pub min_throughput: f64,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            max_average_response_ms: 2000,
            max_p95_response_ms: 3000,
            max_error_rate: 1.0,
            min_throughput: 10.0,
        }
    }
}

/// Threshold check outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceValidation {
    /// No violations
    pub passed: bool,
    /// One message per exceeded threshold
    pub violations: Vec<String>,
}

impl PerformanceThresholds {
    /// Compare `metrics` against every threshold
    #[must_use]
    pub fn validate(&self, metrics: &PerformanceMetrics) -> PerformanceValidation {
        let mut violations = Vec::new();
        if metrics.average_response_ms > self.max_average_response_ms {
            violations.push(format!(
                "Average response time ({}ms) exceeds threshold ({}ms)",
                metrics.average_response_ms, self.max_average_response_ms
            ));
        }
        if metrics.p95_response_ms > self.max_p95_response_ms {
            violations.push(format!(
                "95th percentile response time ({}ms) exceeds threshold ({}ms)",
                metrics.p95_response_ms, self.max_p95_response_ms
            ));
        }
        if metrics.error_rate > self.max_error_rate {
            violations.push(format!(
                "Error rate ({}%) exceeds threshold ({}%)",
                metrics.error_rate, self.max_error_rate
            ));
        }
        if metrics.throughput < self.min_throughput {
            violations.push(format!(
                "Throughput ({} req/s) below threshold ({} req/s)",
                metrics.throughput, self.min_throughput
            ));
        }
        PerformanceValidation {
            passed: violations.is_empty(),
            violations,
        }
    }
}

/// Load test against a single URL
#[derive(Debug, Clone)]
pub struct LoadTest {
    name: String,
    url: String,
    users: usize,
    ramp_up: Duration,
    duration: Duration,
    client: reqwest::Client,
}

impl LoadTest {
    /// 10 users, 5 s ramp-up, 30 s duration
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            name: name.into(),
            url: url.into(),
            users: 10,
            ramp_up: Duration::from_secs(5),
            duration: Duration::from_secs(30),
            client,
        }
    }

    /// Set concurrent users
    #[must_use]
    pub const fn with_users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }

    /// Set the period over which workers start
    #[must_use]
    pub const fn with_ramp_up(mut self, ramp_up: Duration) -> Self {
        self.ramp_up = ramp_up;
        self
    }

    /// Set how long requests are issued
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Use a caller-supplied HTTP client
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Test name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start delay of worker `index`
    fn start_delay(&self, index: usize) -> Duration {
        if self.users == 0 {
            return Duration::ZERO;
        }
        self.ramp_up.mul_f64(index as f64 / self.users as f64)
    }

    /// Run the test
    ///
    /// # Errors
    ///
    /// Zero users, a zero duration or a URL reqwest cannot parse is a
    /// configuration error. Request failures are counted, not returned.
    pub async fn run(&self) -> SitecheckResult<PerformanceResult> {
        if self.users == 0 {
            return Err(SitecheckError::config("load test needs at least one user"));
        }
        if self.duration.is_zero() {
            return Err(SitecheckError::config("load test duration must be positive"));
        }
        let target = reqwest::Url::parse(&self.url)
            .map_err(|e| SitecheckError::config(format!("invalid URL {}: {e}", self.url)))?;

        tracing::info!(
            name = %self.name,
            url = %target,
            users = self.users,
            ramp_up_ms = self.ramp_up.as_millis() as u64,
            duration_ms = self.duration.as_millis() as u64,
            "starting load test"
        );

        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.ramp_up + self.duration;
        let mut handles = Vec::with_capacity(self.users);

        for index in 0..self.users {
            let client = self.client.clone();
            let url = target.clone();
            let delay = self.start_delay(index);

            handles.push(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let mut samples = Vec::new();
                while tokio::time::Instant::now() < deadline {
                    let sent = Instant::now();
                    let success = match client.get(url.clone()).send().await {
                        Ok(resp) => resp.status().is_success(),
                        Err(e) => {
                            tracing::debug!(worker = index, error = %e, "request failed");
                            false
                        }
                    };
                    samples.push(RequestSample {
                        latency: sent.elapsed(),
                        success,
                    });
                }
                samples
            }));
        }

        let mut samples = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(buffer) => samples.extend(buffer),
                Err(e) => tracing::warn!(error = %e, "load worker aborted"),
            }
        }

        let metrics = PerformanceMetrics::from_samples(&samples, started.elapsed());
        tracing::info!(
            name = %self.name,
            requests = metrics.total_requests,
            error_rate = metrics.error_rate,
            "load test finished"
        );

        Ok(PerformanceResult {
            test_name: self.name.clone(),
            url: self.url.clone(),
            users: self.users,
            ramp_up_secs: self.ramp_up.as_secs(),
            duration_secs: self.duration.as_secs(),
            metrics,
        })
    }
}
