use chrono::NaiveDate;
use dose_titration::workflows::reassessment::{SinkError, SubmissionPayload, SubmissionSink};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Sink that keeps payloads in memory so CLI runs can print what would have been sent.
#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionSink {
    payloads: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl SubmissionSink for InMemorySubmissionSink {
    fn record(&self, payload: SubmissionPayload) -> Result<(), SinkError> {
        let mut guard = self
            .payloads
            .lock()
            .map_err(|_| SinkError::Transport("payload buffer poisoned".to_string()))?;
        guard.push(payload);
        Ok(())
    }
}

impl InMemorySubmissionSink {
    pub(crate) fn payloads(&self) -> Vec<SubmissionPayload> {
        self.payloads
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
