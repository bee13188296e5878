//! What a read did, stage by stage.

use std::fmt;

use layout::Generation;
use store::StreamState;

use crate::error::ReadError;

/// One hydration stage. Stages run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Properties,
    Calendars,
    Resources,
    Tasks,
    Relations,
    Assignments,
    ViewProperties,
    Views,
    Tables,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Properties => "properties",
            Self::Calendars => "calendars",
            Self::Resources => "resources",
            Self::Tasks => "tasks",
            Self::Relations => "relations",
            Self::Assignments => "assignments",
            Self::ViewProperties => "view properties",
            Self::Views => "views",
            Self::Tables => "tables",
        })
    }
}

/// Outcome of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    /// State of the stage's primary stream.
    pub state: StreamState,
    /// Entities (or values) delivered to the sink.
    pub items: usize,
    /// Rows dropped by validation.
    pub skipped: usize,
}

impl StageReport {
    #[must_use]
    pub const fn new(stage: Stage) -> Self {
        Self {
            stage,
            state: StreamState::Unopened,
            items: 0,
            skipped: 0,
        }
    }
}

/// A recoverable anomaly met while reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadWarning {
    /// The property bag stopped early; earlier entries were used.
    IncompleteProperties { stream: String },
    /// A record width was picked by heuristic.
    AmbiguousLayout(ReadError),
    /// An entity's tagged store did not decode; its rows kept their
    /// fixed fields only.
    UnreadableTags(ReadError),
    /// A derived calendar names a base that does not exist.
    UnresolvedBaseCalendar { calendar: i32, base: i32 },
    /// A relation names a task that was not read.
    DanglingRelation { predecessor: i32, successor: i32 },
    /// An assignment names a task or resource that was not read.
    DanglingAssignment { task: i32, resource: i32 },
    /// An optional stream is absent; its stage was skipped.
    MissingOptional { stage: Stage, path: String },
    /// A stream failed to decode; its stage was abandoned.
    StageFailed { stage: Stage, error: ReadError },
}

impl fmt::Display for ReadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteProperties { stream } => {
                write!(f, "property bag {stream} only partially decoded")
            }
            Self::AmbiguousLayout(err) => write!(f, "{err}"),
            Self::UnreadableTags(err) => write!(f, "tagged fields skipped: {err}"),
            Self::UnresolvedBaseCalendar { calendar, base } => {
                write!(f, "calendar {calendar} names missing base calendar {base}")
            }
            Self::DanglingRelation {
                predecessor,
                successor,
            } => write!(
                f,
                "relation {predecessor} -> {successor} names a missing task"
            ),
            Self::DanglingAssignment { task, resource } => write!(
                f,
                "assignment of resource {resource} to task {task} names a missing entity"
            ),
            Self::MissingOptional { stage, path } => {
                write!(f, "{stage} skipped: no stream {path}")
            }
            Self::StageFailed { stage, error } => write!(f, "{stage} abandoned: {error}"),
        }
    }
}

/// Summary of a whole read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadReport {
    pub generation: Generation,
    pub application_name: String,
    pub format: String,
    /// Stages in the order they ran.
    pub stages: Vec<StageReport>,
    pub warnings: Vec<ReadWarning>,
}

impl ReadReport {
    #[must_use]
    pub const fn new(generation: Generation, application_name: String, format: String) -> Self {
        Self {
            generation,
            application_name,
            format,
            stages: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns the report for `stage`, if it ran.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    /// Returns the stages in the order they ran.
    #[must_use]
    pub fn order(&self) -> Vec<Stage> {
        self.stages.iter().map(|s| s.stage).collect()
    }

    /// Returns `true` if every stage finished with all its items.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
            && self
                .stages
                .iter()
                .all(|s| s.state == StreamState::Complete)
    }
}

impl fmt::Display for ReadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}, {})",
            self.generation, self.format, self.application_name
        )?;
        for stage in &self.stages {
            writeln!(
                f,
                "  {:<16} {:<18} items={} skipped={}",
                stage.stage.to_string(),
                stage.state.to_string(),
                stage.items,
                stage.skipped
            )?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {warning}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Properties < Stage::Calendars);
        assert!(Stage::Tasks < Stage::Relations);
        assert!(Stage::Assignments < Stage::Views);
    }

    #[test]
    fn report_lookup_and_display() {
        let mut report = ReadReport::new(
            Generation::Mpp9,
            "Microsoft Project 9.0".into(),
            "MSProject.MPP9".into(),
        );
        let mut tasks = StageReport::new(Stage::Tasks);
        tasks.state = StreamState::Complete;
        tasks.items = 2;
        report.stages.push(tasks);
        assert_eq!(report.stage(Stage::Tasks).map(|s| s.items), Some(2));
        assert!(report.stage(Stage::Views).is_none());
        assert!(report.is_clean());

        report.warnings.push(ReadWarning::UnresolvedBaseCalendar {
            calendar: 3,
            base: 9,
        });
        assert!(!report.is_clean());
        let text = report.to_string();
        assert!(text.contains("MPP9"));
        assert!(text.contains("items=2"));
        assert!(text.contains("missing base calendar 9"));
    }

    #[test]
    fn warning_display() {
        let warning = ReadWarning::MissingOptional {
            stage: Stage::Relations,
            path: "   1/TBkndCons".into(),
        };
        assert!(warning.to_string().contains("relations skipped"));
    }
}
