//! Text rendering for the catalogue and run reports

use console::{style, Style};
use storeprobe::runner::{CaseReport, CaseStatus, SuiteReport};
use storeprobe::scenarios::{Case, Expectation};

fn status_style(status: CaseStatus) -> Style {
    match status {
        CaseStatus::Passed => Style::new().green(),
        CaseStatus::Failed => Style::new().red().bold(),
        CaseStatus::ExpectedFailure => Style::new().yellow(),
        CaseStatus::UnexpectedlyPassed => Style::new().magenta().bold(),
        CaseStatus::Skipped => Style::new().dim(),
    }
}

const fn status_mark(status: CaseStatus) -> &'static str {
    match status {
        CaseStatus::Passed => "PASS",
        CaseStatus::Failed => "FAIL",
        CaseStatus::ExpectedFailure => "XFAIL",
        CaseStatus::UnexpectedlyPassed => "XPASS",
        CaseStatus::Skipped => "SKIP",
    }
}

/// One line per case: name, then the known-failure reason if any
#[must_use]
pub fn render_catalogue(cases: &[Case], use_color: bool) -> String {
    let width = cases.iter().map(|c| c.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for case in cases {
        let line = match case.expectation {
            Expectation::Pass => case.name.to_string(),
            Expectation::KnownFailure(reason) => {
                let note = format!("known failure: {reason}");
                let note = if use_color {
                    style(note).yellow().to_string()
                } else {
                    note
                };
                format!("{:<width$}  {note}", case.name)
            }
        };
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&format!("{} cases\n", cases.len()));
    out
}

fn render_case(case: &CaseReport, use_color: bool) -> String {
    let mark = format!("{:<5}", status_mark(case.status));
    let mark = if use_color {
        status_style(case.status).apply_to(mark).to_string()
    } else {
        mark
    };
    let mut line = format!(
        "{mark} {} ({:.2}s)",
        case.name,
        case.duration.as_secs_f64()
    );
    if let Some(detail) = &case.detail {
        if case.status != CaseStatus::Passed {
            line.push_str("\n      ");
            line.push_str(detail);
        }
    }
    line
}

/// Per-case lines followed by the tally
#[must_use]
pub fn render_report(report: &SuiteReport, use_color: bool) -> String {
    let mut out = String::new();
    for case in &report.cases {
        out.push_str(&render_case(case, use_color));
        out.push('\n');
    }
    out.push('\n');

    let verdict = if report.is_green() { "PASSED" } else { "FAILED" };
    let verdict = if use_color {
        let style = if report.is_green() {
            Style::new().green().bold()
        } else {
            Style::new().red().bold()
        };
        style.apply_to(verdict).to_string()
    } else {
        verdict.to_string()
    };
    out.push_str(&format!(
        "{verdict} {} in {:.2}s (run {})\n",
        report.summary(),
        report.duration.as_secs_f64(),
        report.run_id
    ));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use storeprobe::scenarios::{self, Suite};
    use uuid::Uuid;

    fn case(name: &'static str, status: CaseStatus, detail: Option<&str>) -> CaseReport {
        CaseReport {
            name,
            suite: Suite::Api,
            expectation: Expectation::Pass,
            status,
            detail: detail.map(str::to_string),
            duration: Duration::from_millis(250),
        }
    }

    #[test]
    fn test_catalogue_lists_reasons() {
        let text = render_catalogue(&scenarios::select(None, Some("api.pet.update")), false);
        assert!(text.contains("api.pet.update"));
        assert!(text.contains("known failure:"));
        assert!(text.ends_with("1 cases\n"));
    }

    #[test]
    fn test_report_text() {
        let report = SuiteReport {
            run_id: Uuid::nil(),
            started_at: SystemTime::UNIX_EPOCH,
            cases: vec![
                case("api.pet.create", CaseStatus::Passed, None),
                case("api.pet.delete", CaseStatus::Failed, Some("expected HTTP 200, got 404")),
            ],
            duration: Duration::from_secs(1),
        };
        let text = render_report(&report, false);
        assert!(text.contains("PASS  api.pet.create (0.25s)"));
        assert!(text.contains("FAIL  api.pet.delete"));
        assert!(text.contains("      expected HTTP 200, got 404"));
        assert!(text.contains("FAILED 2 cases: 1 passed, 1 failed"));
    }
}
