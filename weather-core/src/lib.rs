//! Core library for the `weather` demo.
//!
//! This crate defines:
//! - The weather report model and its XML / JSON codecs
//! - A simulated remote weather service with injectable failures
//! - A task runner that joins concurrent tasks and aggregates their failures
//! - Configuration handling
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod codec;
pub mod config;
pub mod demo;
pub mod error;
pub mod failure;
pub mod fixture;
pub mod model;
pub mod runner;
pub mod service;

pub use config::Config;
pub use demo::{DemoOutput, DemoPlan, run_demo};
pub use error::{Result, WeatherError};
pub use failure::{FailureSource, Operation, RandomFailures};
pub use model::WeatherReport;
pub use runner::{RunError, RunSummary, TaskGroup, TaskState};
pub use service::{SimulatedService, WeatherService};
