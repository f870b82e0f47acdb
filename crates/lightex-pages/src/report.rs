//! Per-document status output.

use std::io::{self, Write};

use crate::pipeline::{DocumentReport, DocumentStatus};

/// Receives one report per processed document, in processing order.
pub trait Reporter {
    fn report(&mut self, report: &DocumentReport) -> io::Result<()>;
}

/// Writes `<path> <exit-code>` lines.
///
/// Documents the renderer never finished with are reported as `signal`
/// (killed) or `failed` (read, launch or write problems).
pub struct TextReporter<W> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, report: &DocumentReport) -> io::Result<()> {
        let marker = match &report.status {
            DocumentStatus::Failed { .. } => "failed".to_string(),
            status => match status.exit_code() {
                Some(code) => code.to_string(),
                None => "signal".to_string(),
            },
        };

        writeln!(self.out, "{} {}", report.document.path().display(), marker)?;
        self.out.flush()
    }
}

/// Writes one JSON object per line.
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, report: &DocumentReport) -> io::Result<()> {
        let path = report.document.path().display().to_string();
        let value = match &report.status {
            DocumentStatus::Assembled { page } => serde_json::json!({
                "path": path,
                "status": "assembled",
                "code": 0,
                "page": page.display().to_string(),
            }),
            DocumentStatus::Rejected { code } => serde_json::json!({
                "path": path,
                "status": "rejected",
                "code": code,
            }),
            DocumentStatus::Failed { stage, error } => serde_json::json!({
                "path": path,
                "status": "failed",
                "stage": stage.as_str(),
                "error": error,
            }),
        };

        serde_json::to_writer(&mut self.out, &value)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

/// Keeps reports in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    reports: Vec<DocumentReport>,
}

impl CollectingReporter {
    pub fn reports(&self) -> &[DocumentReport] {
        &self.reports
    }

    pub fn into_reports(self) -> Vec<DocumentReport> {
        self.reports
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, report: &DocumentReport) -> io::Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::SourceDocument;
    use crate::pipeline::Stage;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn report(path: &str, status: DocumentStatus) -> DocumentReport {
        DocumentReport {
            document: SourceDocument::new(path),
            status,
        }
    }

    fn text(reports: &[DocumentReport]) -> String {
        let mut reporter = TextReporter::new(Vec::new());
        for r in reports {
            reporter.report(r).unwrap();
        }
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn text_lines_carry_exit_codes() {
        let output = text(&[
            report(
                "root/probA/statement.tex",
                DocumentStatus::Assembled {
                    page: PathBuf::from("root/probA/lightex.html"),
                },
            ),
            report(
                "root/probB/statement.tex",
                DocumentStatus::Rejected { code: Some(1) },
            ),
            report(
                "root/probC/statement.tex",
                DocumentStatus::Rejected { code: None },
            ),
            report(
                "root/probD/statement.tex",
                DocumentStatus::Failed {
                    stage: Stage::Render,
                    error: "Failed to launch renderer".to_string(),
                },
            ),
        ]);

        assert_eq!(
            output,
            "root/probA/statement.tex 0\n\
             root/probB/statement.tex 1\n\
             root/probC/statement.tex signal\n\
             root/probD/statement.tex failed\n"
        );
    }

    #[test]
    fn json_lines_describe_status() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter
            .report(&report(
                "probB/statement.tex",
                DocumentStatus::Rejected { code: Some(1) },
            ))
            .unwrap();
        reporter
            .report(&report(
                "probC/statement.tex",
                DocumentStatus::Failed {
                    stage: Stage::Read,
                    error: "stream did not contain valid UTF-8".to_string(),
                },
            ))
            .unwrap();

        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(
            lines,
            vec![
                serde_json::json!({
                    "path": "probB/statement.tex",
                    "status": "rejected",
                    "code": 1,
                }),
                serde_json::json!({
                    "path": "probC/statement.tex",
                    "status": "failed",
                    "stage": "read",
                    "error": "stream did not contain valid UTF-8",
                }),
            ]
        );
    }

    #[test]
    fn collects_reports() {
        let mut reporter = CollectingReporter::default();
        let r = report("a/statement.tex", DocumentStatus::Rejected { code: Some(2) });

        reporter.report(&r).unwrap();

        assert_eq!(reporter.into_reports(), vec![r]);
    }
}
