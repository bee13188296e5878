//! The caller-side interface entities are pushed through.

use layout::{
    CalendarException, DayDefinition, Duration, FieldId, FieldValue, ProjectField, RelationType,
    TableDefinition, ViewDefinition,
};

/// Receives decoded entities.
///
/// The reader owns no entity objects. Every `begin_*` call creates an
/// entity on the caller's side and returns a handle the reader uses for
/// subsequent calls about it. Handles are never interpreted by the reader.
pub trait EntitySink {
    type Handle: Copy;

    fn set_project_field(&mut self, field: ProjectField, value: FieldValue);

    fn begin_calendar(&mut self) -> Self::Handle;

    fn begin_resource(&mut self) -> Self::Handle;

    fn begin_task(&mut self) -> Self::Handle;

    fn begin_assignment(&mut self, task: Self::Handle, resource: Self::Handle) -> Self::Handle;

    fn set_field(&mut self, entity: Self::Handle, field: FieldId, value: FieldValue);

    /// Called once all fields of `entity` have been set.
    fn end_entity(&mut self, _entity: Self::Handle) {}

    fn set_calendar_week(&mut self, calendar: Self::Handle, week: [DayDefinition; 7]);

    fn add_calendar_exception(&mut self, calendar: Self::Handle, exception: CalendarException);

    /// Links a derived calendar to its base. Called after every calendar
    /// has been created.
    fn set_calendar_base(&mut self, calendar: Self::Handle, base: Self::Handle);

    fn attach_calendar(&mut self, resource: Self::Handle, calendar: Self::Handle);

    fn link_predecessor(
        &mut self,
        successor: Self::Handle,
        predecessor: Self::Handle,
        kind: RelationType,
        lag: Duration,
    );

    fn add_view(&mut self, _view: ViewDefinition) {}

    fn add_table(&mut self, _table: TableDefinition) {}
}
