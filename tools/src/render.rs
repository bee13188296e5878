//! Text and JSON renderings of a read.

use std::fmt::Write;

use layout::{FieldValue, RelationType, ResourceField, TaskField};
use reader::{FileIdentity, Project, ReadReport};
use serde::Serialize;

/// A stage line in a dump.
#[derive(Debug, Serialize)]
pub struct StageLine {
    pub stage: String,
    pub state: String,
    pub items: usize,
    pub skipped: usize,
}

/// Everything `dump` prints as JSON.
#[derive(Debug, Serialize)]
pub struct DumpOutput<'a> {
    pub application: &'a str,
    pub format: &'a str,
    pub generation: String,
    pub stages: Vec<StageLine>,
    pub warnings: Vec<String>,
    pub project: &'a Project,
}

impl<'a> DumpOutput<'a> {
    pub fn new(project: &'a Project, report: &'a ReadReport) -> Self {
        Self {
            application: &report.application_name,
            format: &report.format,
            generation: report.generation.to_string(),
            stages: report
                .stages
                .iter()
                .map(|s| StageLine {
                    stage: s.stage.to_string(),
                    state: s.state.to_string(),
                    items: s.items,
                    skipped: s.skipped,
                })
                .collect(),
            warnings: report.warnings.iter().map(ToString::to_string).collect(),
            project,
        }
    }
}

/// Pretty-printed JSON for a read.
pub fn dump_json(project: &Project, report: &ReadReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&DumpOutput::new(project, report))
}

pub fn format_identity(identity: &FileIdentity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "application: {}", identity.application_name);
    let _ = writeln!(out, "format: {}", identity.format);
    if let Some(id) = &identity.application_id {
        let _ = writeln!(out, "application id: {id}");
    }
    let _ = write!(out, "generation: {}", identity.generation);
    out
}

const fn relation_code(kind: RelationType) -> &'static str {
    match kind {
        RelationType::FinishFinish => "FF",
        RelationType::FinishStart => "FS",
        RelationType::StartFinish => "SF",
        RelationType::StartStart => "SS",
    }
}

fn text_or_dash(value: Option<&FieldValue>) -> String {
    value.map_or_else(|| "-".to_owned(), ToString::to_string)
}

fn uid_or_dash(uid: Option<i32>) -> String {
    uid.map_or_else(|| "-".to_owned(), |uid| uid.to_string())
}

/// Indented text listing of a read.
pub fn format_pretty(project: &Project, report: &ReadReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{report}");

    let _ = writeln!(out, "calendars ({}):", project.calendars.len());
    for calendar in &project.calendars {
        let parent = calendar.base.map_or_else(
            || "base".to_owned(),
            |base| {
                let uid = project.calendars.get(base).and_then(|c| c.unique_id());
                format!("derived from {}", uid_or_dash(uid))
            },
        );
        let _ = writeln!(
            out,
            "  {} {} [{parent}] exceptions={}",
            uid_or_dash(calendar.unique_id()),
            calendar.name().unwrap_or("-"),
            calendar.exceptions.len()
        );
    }

    let _ = writeln!(out, "resources ({}):", project.resources.len());
    for resource in &project.resources {
        let _ = writeln!(
            out,
            "  {} {}",
            uid_or_dash(resource.unique_id()),
            text_or_dash(resource.get(ResourceField::Name))
        );
    }

    let _ = writeln!(out, "tasks ({}):", project.tasks.len());
    for task in &project.tasks {
        let _ = writeln!(
            out,
            "  {} {} duration={}",
            uid_or_dash(task.unique_id()),
            text_or_dash(task.get(TaskField::Name)),
            text_or_dash(task.get(TaskField::Duration))
        );
    }

    let task_uid = |index: usize| uid_or_dash(project.tasks.get(index).and_then(|t| t.unique_id()));
    let _ = writeln!(out, "relations ({}):", project.relations.len());
    for relation in &project.relations {
        let _ = writeln!(
            out,
            "  {} -> {} {} lag={}",
            task_uid(relation.predecessor),
            task_uid(relation.successor),
            relation_code(relation.kind),
            relation.lag
        );
    }

    let _ = writeln!(out, "assignments ({}):", project.assignments.len());
    for assignment in &project.assignments {
        let resource = project
            .resources
            .get(assignment.resource)
            .and_then(|r| r.unique_id());
        let _ = writeln!(
            out,
            "  task {} <- resource {}",
            task_uid(assignment.task),
            uid_or_dash(resource)
        );
    }

    if !project.views.is_empty() || !project.tables.is_empty() {
        let _ = writeln!(out, "views ({}):", project.views.len());
        for view in &project.views {
            let _ = writeln!(out, "  {} {}", view.id, view.name.as_deref().unwrap_or("-"));
        }
        let _ = writeln!(out, "tables ({}):", project.tables.len());
        for table in &project.tables {
            let _ = writeln!(
                out,
                "  {} {} columns={}",
                table.id,
                table.name.as_deref().unwrap_or("-"),
                table.columns.len()
            );
        }
    }
    out
}
