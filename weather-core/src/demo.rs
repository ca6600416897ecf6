use std::sync::Arc;

use crate::{
    Config, WeatherReport,
    failure::Operation,
    runner::{RunError, RunSummary, TaskGroup},
    service::WeatherService,
};

/// What the demo fetches and what it submits.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoPlan {
    pub fetch_city: String,
    pub submit: WeatherReport,
}

impl From<&Config> for DemoPlan {
    fn from(config: &Config) -> Self {
        Self {
            fetch_city: config.fetch_city.clone(),
            submit: config.submit.clone(),
        }
    }
}

/// Value produced by each demo task.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoOutput {
    Fetched(WeatherReport),
    Submitted,
}

/// Fetch one city's report and submit a new one, concurrently.
///
/// Tasks are named after their [`Operation`] and registered fetch first, so a
/// run where both fail reports the fetch failure before the submit failure.
/// When only one task fails, the other task's output is kept on the
/// [`RunError`].
pub async fn run_demo(
    service: Arc<dyn WeatherService>,
    plan: &DemoPlan,
) -> Result<RunSummary<DemoOutput>, RunError<DemoOutput>> {
    let mut group = TaskGroup::new();

    let fetcher = Arc::clone(&service);
    let city = plan.fetch_city.clone();
    group.add(Operation::Fetch.as_str(), async move {
        fetcher.fetch_report(&city).await.map(DemoOutput::Fetched)
    });

    let submitter = service;
    let report = plan.submit.clone();
    group.add(Operation::Submit.as_str(), async move {
        submitter.submit_report(&report).await.map(|()| DemoOutput::Submitted)
    });

    group.join().await
}
