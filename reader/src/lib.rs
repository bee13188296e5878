//! Reads project files into a caller-supplied entity sink.
//!
//! This crate ties the stores and the descriptor tables together:
//! - [`Container`]: the named-stream view of a structured-storage file
//! - [`identify`] / [`read_project`]: format dispatch and the stage pipeline
//! - [`EntitySink`]: where hydrated calendars, resources, tasks, relations
//!   and assignments go
//! - [`ReadReport`]: per-stage stream states, counts and warnings
//! - [`ProjectCollector`]: a sink that builds an in-memory [`Project`]
//!
//! # Design Principles
//!
//! - **Tables drive hydration** - Both generations share one control flow;
//!   a [`FormatHydrator`] only selects descriptor tables and stages.
//! - **Dependency order** - Properties, calendars, resources, tasks,
//!   relations, assignments, then view metadata. Later stages resolve
//!   entities by unique id.
//! - **Fail per stage** - In lenient mode a stage whose streams do not
//!   decode is reported and skipped. Identification failures always abort.
//! - **No container parsing** - Callers adapt their storage library to
//!   [`Container`].
//!
//! # Example
//!
//! ```ignore
//! use reader::{read_project, ProjectCollector, ReadOptions};
//!
//! let mut sink = ProjectCollector::new();
//! let report = read_project(&container, &mut sink, &ReadOptions::default())?;
//! println!("{report}");
//! let project = sink.finish();
//! ```

mod collector;
mod container;
mod dispatch;
mod error;
mod hydrator;
mod options;
mod pipeline;
mod record;
mod report;
mod sink;

pub use collector::{
    AssignmentRecord, CalendarRecord, Fields, Handle, Project, ProjectCollector, RelationRecord,
    ResourceRecord, TaskRecord,
};
pub use container::{display_path, Container, MemoryContainer, COMPOBJ_STREAM};
pub use dispatch::{identify, read_project, read_with, FileIdentity};
pub use error::{ReadError, ReadResult};
pub use hydrator::{hydrator_for, FormatHydrator, Mpp8Hydrator, Mpp9Hydrator};
pub use options::ReadOptions;
pub use report::{ReadReport, ReadWarning, Stage, StageReport};
pub use sink::EntitySink;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = ReadOptions::default();
        let _ = MemoryContainer::new();
        let _ = ProjectCollector::new();
        let _ = hydrator_for(layout::Generation::Mpp9);
        let _: ReadResult<()> = Ok(());
        let _ = Stage::Properties;
        let _ = COMPOBJ_STREAM;
    }
}
