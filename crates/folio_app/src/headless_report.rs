//! JSON result of a scenario run.

use crate::app::AppSnapshot;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Passed,
    Failed,
}

/// The assertion that ended a run early
#[derive(Debug, Clone)]
pub struct StepFailure {
    pub step_index: usize,
    pub assertion: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessReport {
    pub status: ReportStatus,
    pub failed_step_index: Option<usize>,
    pub assertion: Option<String>,
    pub message: Option<String>,
    pub elapsed_frames: u64,
    pub elapsed_ms: u64,
    /// App state at the end of the run, or at the failing step
    pub snapshot: Option<AppSnapshot>,
}

impl HeadlessReport {
    pub fn passed(elapsed_frames: u64, elapsed_ms: u64, snapshot: AppSnapshot) -> Self {
        Self {
            status: ReportStatus::Passed,
            failed_step_index: None,
            assertion: None,
            message: None,
            elapsed_frames,
            elapsed_ms,
            snapshot: Some(snapshot),
        }
    }

    pub fn failed(
        failure: StepFailure,
        elapsed_frames: u64,
        elapsed_ms: u64,
        snapshot: AppSnapshot,
    ) -> Self {
        Self {
            status: ReportStatus::Failed,
            failed_step_index: Some(failure.step_index),
            assertion: Some(failure.assertion.to_owned()),
            message: Some(failure.message),
            ..Self::passed(elapsed_frames, elapsed_ms, snapshot)
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self.status, ReportStatus::Passed)
    }

    /// Writes pretty JSON to `path`, creating parent directories. Only
    /// paths below the working directory are accepted.
    pub fn write_to_path(&self, path: &Path) -> Result<()> {
        ensure_relative(path)?;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))
    }

    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

fn ensure_relative(path: &Path) -> Result<()> {
    let escapes = path.components().any(|part| {
        matches!(
            part,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    ensure!(
        !escapes,
        "report path {} must stay inside the working directory",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_theme::ThemePreference;

    fn report() -> HeadlessReport {
        HeadlessReport::failed(
            StepFailure {
                step_index: 3,
                assertion: "assert_theme",
                message: "expected theme 'dark', got 'light'".into(),
            },
            10,
            160,
            AppSnapshot {
                now_ms: 160,
                scroll_y: 0.0,
                theme: ThemePreference::Light,
                fired: Default::default(),
                expanded: Vec::new(),
                active_region: None,
                pointer: None,
                cursor: None,
                contact_notice: None,
                star_count: 100,
                star_generation: 1,
            },
        )
    }

    #[test]
    fn rejects_paths_outside_the_working_directory() {
        let report = report();
        assert!(report.write_to_path(Path::new("/tmp/report.json")).is_err());
        assert!(report.write_to_path(Path::new("../report.json")).is_err());
        assert!(report.write_to_path(Path::new("out/../../report.json")).is_err());
    }

    #[test]
    fn serializes_snake_case_status_and_snapshot() {
        let mut out = Vec::new();
        report().write_to_writer(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["failed_step_index"], 3);
        assert_eq!(value["snapshot"]["theme"], "light");
    }
}
