//! storeprobe: end-to-end checks for a storefront UI and a pet-store REST API
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  scenarios ──► runner ──► SuiteReport                            │
//! │      │            │                                              │
//! │      │            └── fixture (browser / pet / user, teardown)   │
//! │      ▼                                                           │
//! │  pages ──► Session ──► dyn BrowserDriver ─┬─► CdpDriver          │
//! │      │       (wait policy, site URLs)     └─► MockStorefront     │
//! │      ▼                                                           │
//! │  api ──► ApiClient (reqwest) ──► /pet, /user                     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Page objects wrap one screen each and return the next page object from
//! navigating actions. Every browser primitive waits with a bounded
//! [`WaitPolicy`]. The REST clients capture raw responses so callers decide
//! which status they expect.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_frames))]

mod assertion;
mod locator;
mod result;
mod retry;
mod session;
mod wait;

/// REST clients for `/pet` and `/user`
pub mod api;

/// Settings file and environment overlay
pub mod config;

/// Random ids, sample payloads and checkout form data
pub mod data;

/// Browser driver seam and its implementations
pub mod driver;

/// Scoped resources with guaranteed teardown
pub mod fixture;

/// One page object per storefront screen
pub mod pages;

/// Case execution and reporting
pub mod runner;

/// Named checks with their expected outcome
pub mod scenarios;

pub use assertion::Assertion;
pub use config::ProbeConfig;
pub use locator::{xpath_literal, Locator, Strategy};
pub use result::{ProbeError, ProbeResult};
pub use retry::RetryPolicy;
pub use runner::{CaseReport, CaseStatus, Runner, SuiteReport};
pub use session::{Session, SiteUrls};
pub use wait::{WaitPolicy, DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS};

/// Everything a scenario author usually needs
pub mod prelude {
    pub use super::api::{ApiClient, ApiMessage, ApiResponse, Pet, PetApi, PetStatus, User, UserApi};
    pub use super::assertion::Assertion;
    pub use super::config::{ApiConfig, BrowserConfig, ProbeConfig, SiteConfig};
    pub use super::data::{scenario_rng, CheckoutInfo};
    pub use super::driver::{BrowserDriver, Launcher, MockLauncher, MockStorefront};
    #[cfg(feature = "browser")]
    pub use super::driver::{CdpDriver, CdpLauncher};
    pub use super::fixture::{with_fixture, BrowserFixture, Fixture, PetFixture, UserFixture};
    pub use super::pages::*;
    pub use super::result::{ProbeError, ProbeResult};
    pub use super::retry::RetryPolicy;
    pub use super::runner::{CaseStatus, Runner, SuiteReport};
    pub use super::scenarios::{Case, Expectation, Suite};
    pub use super::session::{Session, SiteUrls};
    pub use super::wait::WaitPolicy;
}
