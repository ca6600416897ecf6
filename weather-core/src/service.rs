use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};
use tracing::{debug, info, warn};

use crate::{
    Config, Result, WeatherError, WeatherReport, codec,
    failure::{FailureSource, Operation, RandomFailures},
    fixture::FIXTURE_JSON,
};

/// A remote endpoint that serves and accepts weather reports.
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    async fn fetch_report(&self, city: &str) -> Result<WeatherReport>;

    async fn submit_report(&self, report: &WeatherReport) -> Result<()>;
}

/// In-process stand-in for a remote weather service.
///
/// Each call waits a fixed latency, then consults the [`FailureSource`].
/// Fetches are answered from a JSON dataset; submissions are encoded as XML
/// and decoded again by the simulated receiver.
#[derive(Debug, Clone)]
pub struct SimulatedService {
    fetch_delay: Duration,
    submit_delay: Duration,
    failures: Arc<dyn FailureSource>,
    dataset: String,
}

impl SimulatedService {
    pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_secs(2);
    pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(3);

    pub fn new(failures: Arc<dyn FailureSource>) -> Self {
        Self {
            fetch_delay: Self::DEFAULT_FETCH_DELAY,
            submit_delay: Self::DEFAULT_SUBMIT_DELAY,
            failures,
            dataset: FIXTURE_JSON.to_string(),
        }
    }

    /// Build a service with the latencies and failure probability from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(RandomFailures::new(config.failure_probability)))
            .with_delays(config.fetch_delay(), config.submit_delay())
    }

    pub fn with_delays(mut self, fetch: Duration, submit: Duration) -> Self {
        self.fetch_delay = fetch;
        self.submit_delay = submit;
        self
    }

    /// Replace the JSON document served to fetches.
    pub fn with_dataset(mut self, json: impl Into<String>) -> Self {
        self.dataset = json.into();
        self
    }

    fn check_remote(&self, operation: Operation) -> Result<()> {
        if self.failures.should_fail(operation) {
            warn!(%operation, "simulated remote failure");
            return Err(WeatherError::Remote { operation });
        }
        Ok(())
    }
}

#[async_trait]
impl WeatherService for SimulatedService {
    async fn fetch_report(&self, city: &str) -> Result<WeatherReport> {
        tokio::time::sleep(self.fetch_delay).await;
        self.check_remote(Operation::Fetch)?;

        let reports = codec::decode_json_collection(&self.dataset)?;
        debug!(count = reports.len(), "decoded retrieval payload");

        codec::find_by_city(&reports, city).cloned()
    }

    async fn submit_report(&self, report: &WeatherReport) -> Result<()> {
        tokio::time::sleep(self.submit_delay).await;

        let payload = codec::encode_xml(report)?;
        let payload = String::from_utf8_lossy(&payload);
        info!(payload = %payload, "sending weather report");

        let received = codec::decode_xml(&payload)?;
        debug!(city = %received.city, "simulated receiver accepted report");

        self.check_remote(Operation::Submit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::{AlwaysFail, FailOn, NeverFail};

    fn instant(failures: Arc<dyn FailureSource>) -> SimulatedService {
        SimulatedService::new(failures).with_delays(Duration::ZERO, Duration::ZERO)
    }

    #[tokio::test]
    async fn fetch_returns_fixture_entry() {
        let service = instant(Arc::new(NeverFail));
        let report = service.fetch_report("Cartagena").await.unwrap();

        assert_eq!(report.city, "Cartagena");
        assert_eq!(report.temperature, 31.7);
        assert_eq!(report.condition, "Caluroso y húmedo");
    }

    #[tokio::test]
    async fn fetch_unknown_city_is_not_found() {
        let service = instant(Arc::new(NeverFail));
        let err = service.fetch_report("Guatemala").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound { .. }));
    }

    #[tokio::test]
    async fn fetch_surfaces_remote_failure() {
        let service = instant(Arc::new(AlwaysFail));
        let err = service.fetch_report("Armenia").await.unwrap_err();
        assert!(matches!(err, WeatherError::Remote { operation: Operation::Fetch }));
    }

    #[tokio::test]
    async fn fetch_fails_on_malformed_dataset() {
        let service = instant(Arc::new(NeverFail))
            .with_dataset(r#"[{"city": "Cali", "condition": "Nublado"}]"#);
        let err = service.fetch_report("Cali").await.unwrap_err();
        assert!(matches!(err, WeatherError::Decode { .. }));
    }

    #[tokio::test]
    async fn submit_succeeds_when_remote_accepts() {
        let service = instant(Arc::new(FailOn(Operation::Fetch)));
        let report = WeatherReport::new("Guatemala", 23.5, "Windy");
        assert!(service.submit_report(&report).await.is_ok());
    }

    #[tokio::test]
    async fn submit_surfaces_remote_failure() {
        let service = instant(Arc::new(FailOn(Operation::Submit)));
        let report = WeatherReport::new("Guatemala", 23.5, "Windy");
        let err = service.submit_report(&report).await.unwrap_err();
        assert_eq!(err.to_string(), "simulated remote failure during submit");
    }

    #[tokio::test(start_paused = true)]
    async fn each_call_waits_its_own_latency() {
        let service = SimulatedService::new(Arc::new(NeverFail))
            .with_delays(Duration::from_millis(200), Duration::from_millis(700));

        let start = tokio::time::Instant::now();
        service.fetch_report("Cali").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(200));
        assert!(start.elapsed() < Duration::from_millis(700));
    }
}
