// file: src/utils/telemetry.rs
// description: health reporting for credentials and knowledge base, plus operation timing
// reference: observability for the status command and pipeline logs

use crate::config::Config;
use crate::credentials::{CredentialSnapshot, CredentialSource};
use crate::error::ProviderKind;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    fn icon(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "✓",
            HealthStatus::Degraded => "⚠",
            HealthStatus::Unhealthy => "✗",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub component: String,
    pub status: HealthStatus,
    pub message: Option<String>,
}

impl HealthCheck {
    pub fn healthy(component: &str, message: impl Into<String>) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Healthy,
            message: Some(message.into()),
        }
    }

    pub fn degraded(component: &str, message: impl Into<String>) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Degraded,
            message: Some(message.into()),
        }
    }

    pub fn unhealthy(component: &str, message: impl Into<String>) -> Self {
        Self {
            component: component.to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
        }
    }

    /// Credential checks for both providers. Keys are shown redacted.
    pub fn credentials(snapshot: &CredentialSnapshot, config: &Config) -> Vec<HealthCheck> {
        let describe = |provider: ProviderKind| {
            snapshot.get(provider).map(|resolved| {
                let source = match resolved.source {
                    CredentialSource::Session => "session override",
                    CredentialSource::Environment => "environment",
                    CredentialSource::ConfigFile => "config file",
                };
                format!("{} from {}", resolved.key, source)
            })
        };

        let primary = match describe(ProviderKind::Primary) {
            Some(detail) => HealthCheck::healthy(
                "primary provider",
                format!("{} ({})", config.primary.model, detail),
            ),
            None => HealthCheck::unhealthy(
                "primary provider",
                "no API key: analysis requests will ask for configuration",
            ),
        };

        let secondary = match describe(ProviderKind::Secondary) {
            Some(detail) => HealthCheck::healthy(
                "reasoning provider",
                format!("{} ({})", config.secondary.model, detail),
            ),
            None => HealthCheck::degraded(
                "reasoning provider",
                format!(
                    "no API key: phase 2 is simulated on {}",
                    config.primary.model
                ),
            ),
        };

        vec![primary, secondary]
    }

    pub fn knowledge_base(document_count: usize) -> Self {
        if document_count == 0 {
            HealthCheck::degraded("knowledge base", "no documents loaded")
        } else {
            HealthCheck::healthy(
                "knowledge base",
                format!("{} documents available", document_count),
            )
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub overall_status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub timestamp: u64,
    pub version: String,
}

impl HealthReport {
    pub fn new(checks: Vec<HealthCheck>, version: String) -> Self {
        let overall_status = if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
            HealthStatus::Unhealthy
        } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_secs();

        Self {
            overall_status,
            checks,
            timestamp,
            version,
        }
    }

    pub fn format(&self) -> String {
        let mut output = format!(
            "{} FinSight Health: {:?}\nVersion: {}\nTimestamp: {}\n\n",
            self.overall_status.icon(),
            self.overall_status,
            self.version,
            chrono::DateTime::from_timestamp(self.timestamp as i64, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );

        for check in &self.checks {
            output.push_str(&format!(
                "{} {} ({:?})",
                check.status.icon(),
                check.component,
                check.status
            ));

            if let Some(ref msg) = check.message {
                output.push_str(&format!("\n  {}", msg));
            }

            output.push('\n');
        }

        output
    }
}

/// Logs the start and end of an operation with its duration.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration, message: &str) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Slow operation [{}]: {} took {:.2}s (threshold: {:.2}s)",
                self.operation,
                message,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
        }
    }
}
