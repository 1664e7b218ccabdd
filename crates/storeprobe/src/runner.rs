//! Runs scenario cases and classifies what happened.
//!
//! Each case's raw result is compared with its [`Expectation`]:
//!
//! | expectation   | body result | status                |
//! |---------------|-------------|-----------------------|
//! | pass          | ok          | `Passed`              |
//! | pass          | error/panic | `Failed`              |
//! | known failure | error/panic | `ExpectedFailure`     |
//! | known failure | ok          | `UnexpectedlyPassed`  |
//!
//! UI cases without a browser launcher, and cases left over after a
//! fail-fast stop, are `Skipped`. A run is green iff no case is `Failed`.

use crate::config::ProbeConfig;
use crate::driver::Launcher;
use crate::fixture::{with_fixture, BrowserFixture};
use crate::result::ProbeResult;
use crate::scenarios::{ApiContext, Case, CaseBody, Expectation, Suite, UiContext};
use futures::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Classified outcome of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Expected to pass and did
    Passed,
    /// Expected to pass and did not
    Failed,
    /// Known failure that still fails
    ExpectedFailure,
    /// Known failure that now passes
    UnexpectedlyPassed,
    /// Not run
    Skipped,
}

impl CaseStatus {
    /// Combine an expectation with whether the body succeeded
    #[must_use]
    pub const fn classify(expectation: &Expectation, succeeded: bool) -> Self {
        match (expectation, succeeded) {
            (Expectation::Pass, true) => Self::Passed,
            (Expectation::Pass, false) => Self::Failed,
            (Expectation::KnownFailure(_), false) => Self::ExpectedFailure,
            (Expectation::KnownFailure(_), true) => Self::UnexpectedlyPassed,
        }
    }

    /// Whether this status turns the run red
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Short label for text output
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "FAILED",
            Self::ExpectedFailure => "expected failure",
            Self::UnexpectedlyPassed => "unexpectedly passed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one case
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    /// Case name
    pub name: &'static str,
    /// Suite the case belongs to
    pub suite: Suite,
    /// What was expected
    pub expectation: Expectation,
    /// What happened
    pub status: CaseStatus,
    /// Error or panic message, or the reason a case was skipped
    pub detail: Option<String>,
    /// Wall time spent in the case
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl CaseReport {
    fn skipped(case: &Case, reason: &str) -> Self {
        Self {
            name: case.name,
            suite: case.suite(),
            expectation: case.expectation,
            status: CaseStatus::Skipped,
            detail: Some(reason.to_string()),
            duration: Duration::ZERO,
        }
    }
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Results of one run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// When the run started
    pub started_at: SystemTime,
    /// Per-case results, in run order
    pub cases: Vec<CaseReport>,
    /// Total wall time
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
}

impl SuiteReport {
    /// Number of cases with `status`
    #[must_use]
    pub fn count(&self, status: CaseStatus) -> usize {
        self.cases.iter().filter(|c| c.status == status).count()
    }

    /// True iff no case failed
    #[must_use]
    pub fn is_green(&self) -> bool {
        !self.cases.iter().any(|c| c.status.is_failed())
    }

    /// Cases that failed
    #[must_use]
    pub fn failures(&self) -> Vec<&CaseReport> {
        self.cases.iter().filter(|c| c.status.is_failed()).collect()
    }

    /// One-line tally
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} cases: {} passed, {} failed, {} expected failures, {} unexpectedly passed, {} skipped",
            self.cases.len(),
            self.count(CaseStatus::Passed),
            self.count(CaseStatus::Failed),
            self.count(CaseStatus::ExpectedFailure),
            self.count(CaseStatus::UnexpectedlyPassed),
            self.count(CaseStatus::Skipped),
        )
    }

    /// JUnit XML for CI dashboards. Expected failures are reported as
    /// passing test cases, skipped ones as `<skipped/>`.
    #[must_use]
    pub fn render_junit(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<testsuite name="storeprobe" id="{}" tests="{}" failures="{}" skipped="{}" time="{:.3}">"#,
            self.run_id,
            self.cases.len(),
            self.count(CaseStatus::Failed),
            self.count(CaseStatus::Skipped),
            self.duration.as_secs_f64()
        ));
        xml.push('\n');

        for case in &self.cases {
            xml.push_str(&format!(
                r#"  <testcase classname="{}" name="{}" time="{:.3}">"#,
                case.suite,
                escape_xml(case.name),
                case.duration.as_secs_f64()
            ));
            xml.push('\n');
            let detail = escape_xml(case.detail.as_deref().unwrap_or_default());
            match case.status {
                CaseStatus::Failed => {
                    xml.push_str(&format!(r#"    <failure message="{detail}">{detail}</failure>"#));
                    xml.push('\n');
                }
                CaseStatus::Skipped => {
                    xml.push_str(&format!(r#"    <skipped message="{detail}"/>"#));
                    xml.push('\n');
                }
                _ => {}
            }
            xml.push_str("  </testcase>\n");
        }

        xml.push_str("</testsuite>\n");
        xml
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

const NO_BROWSER: &str = "no browser available (build with the `browser` feature)";
const FAIL_FAST: &str = "not run after an earlier failure";

/// Executes cases sequentially
///
/// ```ignore
/// let report = Runner::new(config)
///     .with_launcher(Arc::new(CdpLauncher::new(browser_config)))
///     .run(&scenarios::select(None, None))
///     .await;
/// assert!(report.is_green());
/// ```
#[derive(Debug)]
pub struct Runner {
    config: ProbeConfig,
    launcher: Option<Arc<dyn Launcher>>,
    fail_fast: bool,
}

impl Runner {
    /// Runner for API cases only; UI cases are skipped until a launcher is set
    #[must_use]
    pub const fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            launcher: None,
            fail_fast: false,
        }
    }

    /// Launch a browser per UI case with `launcher`
    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Skip remaining cases after the first `Failed` one
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Run `cases` in order
    pub async fn run(&self, cases: &[Case]) -> SuiteReport {
        let run_id = Uuid::new_v4();
        let started_at = SystemTime::now();
        let start = Instant::now();
        info!(%run_id, cases = cases.len(), "run started");

        // built once and shared; a bad base URL fails every API case
        let api = cases
            .iter()
            .any(|c| c.suite() == Suite::Api)
            .then(|| ApiContext::from_config(&self.config.api).map_err(|e| e.to_string()));

        let mut reports = Vec::with_capacity(cases.len());
        let mut stopped = false;
        for case in cases {
            if stopped {
                reports.push(CaseReport::skipped(case, FAIL_FAST));
                continue;
            }
            let report = self.run_case(case, api.as_ref()).await;
            stopped = self.fail_fast && report.status.is_failed();
            reports.push(report);
        }

        let report = SuiteReport {
            run_id,
            started_at,
            cases: reports,
            duration: start.elapsed(),
        };
        info!(%run_id, green = report.is_green(), "{}", report.summary());
        report
    }

    async fn run_case(&self, case: &Case, api: Option<&Result<ApiContext, String>>) -> CaseReport {
        let started = Instant::now();
        let outcome = match case.body {
            CaseBody::Api(body) => match api {
                Some(Ok(ctx)) => Self::guarded(body(ctx.clone())).await,
                Some(Err(e)) => Err(e.clone()),
                None => Err("API clients were not built".to_string()),
            },
            CaseBody::Ui(body) => {
                let Some(launcher) = &self.launcher else {
                    info!(case = case.name, "skipped: no browser");
                    return CaseReport::skipped(case, NO_BROWSER);
                };
                let mut fixture = BrowserFixture::new(Arc::clone(launcher), self.config.clone());
                let site = self.config.site.clone();
                Self::guarded(with_fixture(&mut fixture, |session| {
                    body(UiContext { session, site })
                }))
                .await
            }
        };

        let status = CaseStatus::classify(&case.expectation, outcome.is_ok());
        let detail = outcome.err();
        match status {
            CaseStatus::Failed => warn!(case = case.name, error = detail.as_deref(), "case failed"),
            CaseStatus::UnexpectedlyPassed => {
                warn!(case = case.name, "known failure passed; the expectation may be outdated");
            }
            _ => info!(case = case.name, %status, "case finished"),
        }

        CaseReport {
            name: case.name,
            suite: case.suite(),
            expectation: case.expectation,
            status,
            detail,
            duration: started.elapsed(),
        }
    }

    /// Await a case body, turning errors and panics into a message
    async fn guarded<F>(body: F) -> Result<(), String>
    where
        F: std::future::Future<Output = ProbeResult<()>>,
    {
        match AssertUnwindSafe(body).catch_unwind().await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(panic) => Err(panic_message(panic.as_ref())),
        }
    }
}
