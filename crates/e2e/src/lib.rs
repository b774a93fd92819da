//! loginsuite E2E harness
//!
//! This crate wraps the Playwright run of the login page suite:
//! - Reads the JSON reporter output and reduces it to a run summary
//! - Formats run-started and run-finished chat messages
//! - Delivers them to a webhook with a single POST each
//! - Spawns the test command and propagates its exit code
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  SuiteRunner (Rust)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  announce_start(branch, commit)  ──► WebhookNotifier        │
//! │  run_suite()  ──► npx playwright test --reporter=json       │
//! │  summarize(results.json) -> Option<RunSummary>              │
//! │  announce_result(summary)        ──► WebhookNotifier        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ResultsDocument (JSON)                                     │
//! │    ├── stats { expected, unexpected, skipped, duration }    │
//! │    └── suites: [Suite]                                      │
//! │          ├── title                                          │
//! │          ├── suites: [Suite]                                │
//! │          └── tests: [Test { title, results: [Attempt] }]    │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod embed;
pub mod error;
pub mod notifier;
pub mod results;
pub mod runner;
pub mod summary;

pub use config::{Config, NotifyConfig, RunnerConfig};
pub use error::{E2eError, E2eResult};
pub use notifier::{Delivered, WebhookNotifier};
pub use results::ResultsDocument;
pub use runner::SuiteRunner;
pub use summary::{format_duration, summarize, RunMetadata, RunSummary};
