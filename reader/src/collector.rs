//! An [`EntitySink`] that builds an in-memory project.

use std::collections::BTreeMap;

use layout::{
    CalendarException, CalendarField, DayDefinition, Duration, EntityKind, FieldId, FieldValue,
    ProjectField, RelationType, ResourceField, TableDefinition, TaskField, ViewDefinition,
};

use crate::sink::EntitySink;

/// Fields of one entity keyed by [`FieldId::key`].
pub type Fields = BTreeMap<String, FieldValue>;

fn lookup(fields: &Fields, field: impl Into<FieldId>) -> Option<&FieldValue> {
    fields.get(&field.into().key())
}

/// A calendar and its working time.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CalendarRecord {
    pub fields: Fields,
    /// Index of the base calendar in [`Project::calendars`].
    pub base: Option<usize>,
    pub week: Option<[DayDefinition; 7]>,
    pub exceptions: Vec<CalendarException>,
}

impl CalendarRecord {
    pub fn get(&self, field: CalendarField) -> Option<&FieldValue> {
        lookup(&self.fields, field)
    }

    #[must_use]
    pub fn unique_id(&self) -> Option<i32> {
        self.get(CalendarField::UniqueId).and_then(FieldValue::as_int)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get(CalendarField::Name).and_then(FieldValue::as_text)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ResourceRecord {
    pub fields: Fields,
    /// Index of the resource's calendar in [`Project::calendars`].
    pub calendar: Option<usize>,
}

impl ResourceRecord {
    pub fn get(&self, field: ResourceField) -> Option<&FieldValue> {
        lookup(&self.fields, field)
    }

    #[must_use]
    pub fn unique_id(&self) -> Option<i32> {
        self.get(ResourceField::UniqueId).and_then(FieldValue::as_int)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TaskRecord {
    pub fields: Fields,
}

impl TaskRecord {
    pub fn get(&self, field: TaskField) -> Option<&FieldValue> {
        lookup(&self.fields, field)
    }

    #[must_use]
    pub fn unique_id(&self) -> Option<i32> {
        self.get(TaskField::UniqueId).and_then(FieldValue::as_int)
    }
}

/// A resource working on a task. Both ends index into [`Project`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AssignmentRecord {
    pub task: usize,
    pub resource: usize,
    pub fields: Fields,
}

impl AssignmentRecord {
    pub fn get(&self, field: impl Into<FieldId>) -> Option<&FieldValue> {
        lookup(&self.fields, field)
    }
}

/// A dependency between two tasks, by index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RelationRecord {
    pub successor: usize,
    pub predecessor: usize,
    pub kind: RelationType,
    pub lag: Duration,
}

/// Everything read from one file.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Project {
    pub properties: Fields,
    pub calendars: Vec<CalendarRecord>,
    pub resources: Vec<ResourceRecord>,
    pub tasks: Vec<TaskRecord>,
    pub relations: Vec<RelationRecord>,
    pub assignments: Vec<AssignmentRecord>,
    pub views: Vec<ViewDefinition>,
    pub tables: Vec<TableDefinition>,
}

impl Project {
    pub fn property(&self, field: ProjectField) -> Option<&FieldValue> {
        lookup(&self.properties, field)
    }

    pub fn task(&self, unique_id: i32) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.unique_id() == Some(unique_id))
    }

    pub fn resource(&self, unique_id: i32) -> Option<&ResourceRecord> {
        self.resources
            .iter()
            .find(|r| r.unique_id() == Some(unique_id))
    }

    pub fn calendar(&self, unique_id: i32) -> Option<&CalendarRecord> {
        self.calendars
            .iter()
            .find(|c| c.unique_id() == Some(unique_id))
    }
}

/// Handle into a [`ProjectCollector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub kind: EntityKind,
    pub index: usize,
}

impl Handle {
    const fn new(kind: EntityKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// Collects entities into a [`Project`].
///
/// Calls naming a handle of the wrong kind are ignored.
#[derive(Debug, Clone, Default)]
pub struct ProjectCollector {
    project: Project,
}

impl ProjectCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    #[must_use]
    pub fn finish(self) -> Project {
        self.project
    }

    fn fields(&mut self, handle: Handle) -> Option<&mut Fields> {
        let project = &mut self.project;
        match handle.kind {
            EntityKind::Project => Some(&mut project.properties),
            EntityKind::Calendar => project.calendars.get_mut(handle.index).map(|c| &mut c.fields),
            EntityKind::Resource => project.resources.get_mut(handle.index).map(|r| &mut r.fields),
            EntityKind::Task => project.tasks.get_mut(handle.index).map(|t| &mut t.fields),
            EntityKind::Assignment => project
                .assignments
                .get_mut(handle.index)
                .map(|a| &mut a.fields),
        }
    }

    fn calendar_mut(&mut self, handle: Handle) -> Option<&mut CalendarRecord> {
        if handle.kind != EntityKind::Calendar {
            return None;
        }
        self.project.calendars.get_mut(handle.index)
    }
}

impl EntitySink for ProjectCollector {
    type Handle = Handle;

    fn set_project_field(&mut self, field: ProjectField, value: FieldValue) {
        self.project
            .properties
            .insert(FieldId::from(field).key(), value);
    }

    fn begin_calendar(&mut self) -> Handle {
        self.project.calendars.push(CalendarRecord::default());
        Handle::new(EntityKind::Calendar, self.project.calendars.len() - 1)
    }

    fn begin_resource(&mut self) -> Handle {
        self.project.resources.push(ResourceRecord::default());
        Handle::new(EntityKind::Resource, self.project.resources.len() - 1)
    }

    fn begin_task(&mut self) -> Handle {
        self.project.tasks.push(TaskRecord::default());
        Handle::new(EntityKind::Task, self.project.tasks.len() - 1)
    }

    fn begin_assignment(&mut self, task: Handle, resource: Handle) -> Handle {
        self.project.assignments.push(AssignmentRecord {
            task: task.index,
            resource: resource.index,
            fields: Fields::new(),
        });
        Handle::new(EntityKind::Assignment, self.project.assignments.len() - 1)
    }

    fn set_field(&mut self, entity: Handle, field: FieldId, value: FieldValue) {
        if field.kind() != entity.kind {
            return;
        }
        if let Some(fields) = self.fields(entity) {
            fields.insert(field.key(), value);
        }
    }

    fn set_calendar_week(&mut self, calendar: Handle, week: [DayDefinition; 7]) {
        if let Some(record) = self.calendar_mut(calendar) {
            record.week = Some(week);
        }
    }

    fn add_calendar_exception(&mut self, calendar: Handle, exception: CalendarException) {
        if let Some(record) = self.calendar_mut(calendar) {
            record.exceptions.push(exception);
        }
    }

    fn set_calendar_base(&mut self, calendar: Handle, base: Handle) {
        if base.kind != EntityKind::Calendar {
            return;
        }
        if let Some(record) = self.calendar_mut(calendar) {
            record.base = Some(base.index);
        }
    }

    fn attach_calendar(&mut self, resource: Handle, calendar: Handle) {
        if resource.kind != EntityKind::Resource || calendar.kind != EntityKind::Calendar {
            return;
        }
        if let Some(record) = self.project.resources.get_mut(resource.index) {
            record.calendar = Some(calendar.index);
        }
    }

    fn link_predecessor(
        &mut self,
        successor: Handle,
        predecessor: Handle,
        kind: RelationType,
        lag: Duration,
    ) {
        if successor.kind != EntityKind::Task || predecessor.kind != EntityKind::Task {
            return;
        }
        self.project.relations.push(RelationRecord {
            successor: successor.index,
            predecessor: predecessor.index,
            kind,
            lag,
        });
    }

    fn add_view(&mut self, view: ViewDefinition) {
        self.project.views.push(view);
    }

    fn add_table(&mut self, table: TableDefinition) {
        self.project.tables.push(table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::{standard_week, AssignmentField, TimeUnit};

    #[test]
    fn fields_land_on_their_entity() {
        let mut sink = ProjectCollector::new();
        let task = sink.begin_task();
        sink.set_field(task, TaskField::UniqueId.into(), FieldValue::Int(3));
        sink.set_field(task, TaskField::Name.into(), FieldValue::Text("Dig".into()));
        // wrong kind for the handle
        sink.set_field(task, ResourceField::Name.into(), FieldValue::Text("x".into()));

        let project = sink.finish();
        let task = project.task(3).unwrap();
        assert_eq!(task.get(TaskField::Name), Some(&FieldValue::Text("Dig".into())));
        assert_eq!(task.fields.len(), 2);
    }

    #[test]
    fn assignments_and_relations_use_indexes() {
        let mut sink = ProjectCollector::new();
        let a = sink.begin_task();
        let b = sink.begin_task();
        let r = sink.begin_resource();
        let assignment = sink.begin_assignment(b, r);
        sink.set_field(assignment, AssignmentField::Units.into(), FieldValue::Units(1.0));
        sink.link_predecessor(b, a, RelationType::FinishStart, Duration::zero(TimeUnit::Days));
        sink.link_predecessor(r, a, RelationType::FinishStart, Duration::zero(TimeUnit::Days));

        let project = sink.finish();
        assert_eq!(project.assignments[0].task, 1);
        assert_eq!(project.assignments[0].resource, 0);
        assert_eq!(
            project.assignments[0].get(AssignmentField::Units),
            Some(&FieldValue::Units(1.0))
        );
        assert_eq!(project.relations.len(), 1, "resource handle is not a task");
        assert_eq!(project.relations[0].predecessor, 0);
        assert_eq!(project.relations[0].successor, 1);
    }

    #[test]
    fn calendars_link_and_attach() {
        let mut sink = ProjectCollector::new();
        let derived = sink.begin_calendar();
        let base = sink.begin_calendar();
        sink.set_calendar_week(base, standard_week());
        sink.set_calendar_base(derived, base);
        let resource = sink.begin_resource();
        sink.attach_calendar(resource, derived);

        let project = sink.project();
        assert_eq!(project.calendars[0].base, Some(1));
        assert_eq!(project.calendars[1].week.as_ref(), Some(&standard_week()));
        assert_eq!(project.resources[0].calendar, Some(0));
    }

    #[test]
    fn project_fields_by_key() {
        let mut sink = ProjectCollector::new();
        sink.set_project_field(ProjectField::CurrencySymbol, FieldValue::Text("$".into()));
        let project = sink.finish();
        assert_eq!(
            project.property(ProjectField::CurrencySymbol).and_then(FieldValue::as_text),
            Some("$")
        );
        assert!(project.properties.contains_key("currency_symbol"));
    }
}
