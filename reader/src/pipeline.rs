//! Stage-by-stage hydration of one file.
//!
//! Stages run in dependency order because later ones resolve entities
//! created earlier by unique id. Each stage owns its streams; a stage that
//! fails in lenient mode is reported and the next one still runs.

use std::collections::BTreeMap;

use layout::{
    mpp8, standard_week, AssignmentLayout, CalendarField, CalendarLayout, CalendarParent,
    DayDefinition, Decode, DurationContext, EntityLayout, FieldDescriptor, FieldId, FieldValue,
    Generation, LegacyWidth, Locator, ProjectField, RawValue, RecordWidth, RelationLayout,
    RelationType, TimeUnit,
};
use scalar::{get_i16, get_i32};
use store::{FixDeferFix, FixFix, Offset, PropertyBag};
use tracing::{debug, debug_span, trace, warn};

use crate::container::{display_path, Container};
use crate::error::{ReadError, ReadResult};
use crate::hydrator::FormatHydrator;
use crate::options::ReadOptions;
use crate::record::{Records, Row, RowPlan, Streams};
use crate::report::{ReadReport, ReadWarning, Stage, StageReport};
use crate::sink::EntitySink;

/// Property bag stream inside the project and view directories.
pub(crate) const PROPS_STREAM: &str = "Props";

/// Hydration state for one file.
pub(crate) struct Hydration<'r, S: EntitySink> {
    hydrator: &'r dyn FormatHydrator,
    generation: Generation,
    streams: Streams<'r>,
    options: &'r ReadOptions,
    sink: &'r mut S,
    report: ReadReport,
    ctx: DurationContext,
    props: Option<PropertyBag>,
    calendars: BTreeMap<i32, S::Handle>,
    /// Calendars keyed by the resource they belong to.
    resource_calendars: BTreeMap<i32, S::Handle>,
    resources: BTreeMap<i32, S::Handle>,
    tasks: BTreeMap<i32, S::Handle>,
}

impl<'r, S: EntitySink> Hydration<'r, S> {
    pub fn new(
        hydrator: &'r dyn FormatHydrator,
        container: &'r dyn Container,
        sink: &'r mut S,
        options: &'r ReadOptions,
        report: ReadReport,
    ) -> Self {
        Self {
            hydrator,
            generation: hydrator.generation(),
            streams: Streams::new(container, &options.limits),
            options,
            sink,
            report,
            ctx: DurationContext::STANDARD,
            props: None,
            calendars: BTreeMap::new(),
            resource_calendars: BTreeMap::new(),
            resources: BTreeMap::new(),
            tasks: BTreeMap::new(),
        }
    }

    /// Runs every stage and returns the report.
    pub fn run(mut self) -> ReadResult<ReadReport> {
        for stage in self.hydrator.stages(self.options) {
            let span = debug_span!("stage", %stage);
            let _guard = span.enter();

            let mut out = StageReport::new(stage);
            let result = match stage {
                Stage::Properties => self.properties(&mut out),
                Stage::Calendars => self.calendars(&mut out),
                Stage::Resources => self.resources(&mut out),
                Stage::Tasks => self.tasks(&mut out),
                Stage::Relations => self.relations(&mut out),
                Stage::Assignments => self.assignments(&mut out),
                Stage::ViewProperties => self.view_properties(&mut out),
                Stage::Views => self.views(&mut out),
                Stage::Tables => self.tables(&mut out),
            };
            if let Err(error) = result {
                if error.is_fatal() || self.options.strict {
                    return Err(error);
                }
                warn!(%error, "stage abandoned");
                self.report
                    .warnings
                    .push(ReadWarning::StageFailed { stage, error });
            }
            debug!(
                items = out.items,
                skipped = out.skipped,
                state = %out.state,
                "stage finished"
            );
            self.report.stages.push(out);
        }
        Ok(self.report)
    }

    fn missing_optional(&mut self, stage: Stage, path: &[&str]) -> ReadResult<()> {
        let path = display_path(path);
        if self.options.strict {
            return Err(ReadError::MissingStream { path });
        }
        debug!(%path, "optional stream absent");
        self.report
            .warnings
            .push(ReadWarning::MissingOptional { stage, path });
        Ok(())
    }

    fn entity_records(&mut self, directory: &str, records: RecordWidth) -> ReadResult<Records> {
        let root = self.generation.project_dir();
        let records = self
            .streams
            .records(root, directory, records)?
            .ok_or_else(|| ReadError::MissingStream {
                path: display_path(&[root, directory]),
            })?;
        debug!(directory, rows = records.len(), width = ?records.legacy_width(), "records opened");
        self.check_tags(&records)?;
        Ok(records)
    }

    /// Fails on an unreadable tagged store in strict mode, otherwise
    /// records it and lets rows hydrate from their fixed fields.
    fn check_tags(&mut self, records: &Records) -> ReadResult<()> {
        let Some(error) = records.tag_error() else {
            return Ok(());
        };
        if self.options.strict {
            return Err(error.clone());
        }
        warn!(%error, "tagged fields unreadable");
        self.report
            .warnings
            .push(ReadWarning::UnreadableTags(error.clone()));
        Ok(())
    }

    /// Decodes and applies every descriptor of one entity.
    fn apply_fields<F: Copy + Into<FieldId>>(
        &mut self,
        handle: S::Handle,
        entity: i32,
        row: Row<'_>,
        fields: &[FieldDescriptor<F>],
    ) {
        for descriptor in fields {
            let Some(raw) = row.read(entity, descriptor.locator, descriptor.decode) else {
                continue;
            };
            let units = descriptor
                .interpret
                .units_locator()
                .and_then(|at| row.read(entity, at, Decode::Short))
                .and_then(|raw| raw.as_code())
                .map(TimeUnit::from_code);
            if let Some(value) = descriptor.interpret.apply(raw, units, &self.ctx) {
                self.sink.set_field(handle, descriptor.field.into(), value);
            }
        }
    }

    fn properties(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let path = [self.generation.project_dir(), PROPS_STREAM];
        let data = self.streams.require(&path)?;
        let bag = PropertyBag::decode(&data, self.hydrator.props_shape(), self.streams.limits());
        out.state = bag.state();
        if !bag.is_complete() {
            warn!(entries = bag.len(), "property bag incomplete");
            self.report.warnings.push(ReadWarning::IncompleteProperties {
                stream: display_path(&path),
            });
        }

        let ratio = |key: i32| bag.int(key).and_then(|v| u32::try_from(v).ok()).unwrap_or(0);
        self.ctx = DurationContext {
            minutes_per_day: ratio(layout::properties::MINUTES_PER_DAY),
            minutes_per_week: ratio(layout::properties::MINUTES_PER_WEEK),
            ..DurationContext::STANDARD
        }
        .sanitized();

        for descriptor in self.generation.properties() {
            let Locator::Property(key) = descriptor.locator else {
                continue;
            };
            let value = bag
                .get(key)
                .and_then(|bytes| descriptor.decode.read(bytes, 0).ok().flatten())
                .and_then(|raw| descriptor.interpret.apply(raw, None, &self.ctx));
            if let Some(value) = value {
                self.sink.set_project_field(descriptor.field, value);
                out.items += 1;
            }
        }
        self.props = Some(bag);
        Ok(())
    }

    fn calendars(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let layout = self.generation.calendars();
        let records = self.entity_records(layout.directory, layout.records)?;
        out.state = records.state();

        let mut links = Vec::new();
        let plan = RowPlan {
            extended: layout.extended,
            ..RowPlan::default()
        };
        records.for_each_row(plan, |row| {
            for block in row.fixed.chunks_exact(layout.block.max(1)) {
                self.calendar(layout, row.narrowed(block), &mut links, out);
            }
        });

        // Bases may follow the calendars derived from them.
        for (handle, id, base) in links {
            match self.calendars.get(&base) {
                Some(&base_handle) => self.sink.set_calendar_base(handle, base_handle),
                None => {
                    warn!(calendar = id, base, "base calendar not found");
                    self.report
                        .warnings
                        .push(ReadWarning::UnresolvedBaseCalendar { calendar: id, base });
                }
            }
        }
        Ok(())
    }

    fn calendar(
        &mut self,
        layout: &CalendarLayout,
        row: Row<'_>,
        links: &mut Vec<(S::Handle, i32, i32)>,
        out: &mut StageReport,
    ) {
        let Ok((id, base, resource)) = layout.identity(row.fixed) else {
            out.skipped += 1;
            return;
        };
        let parent = match layout.base_rule.classify(base) {
            CalendarParent::Derived(base) if base == id => CalendarParent::Base,
            parent => parent,
        };
        if id < layout.min_id || parent == CalendarParent::Invalid || self.calendars.contains_key(&id)
        {
            trace!(id, base, "calendar block skipped");
            out.skipped += 1;
            return;
        }

        let handle = self.sink.begin_calendar();
        self.sink
            .set_field(handle, CalendarField::UniqueId.into(), FieldValue::Int(id));
        let derived = match parent {
            CalendarParent::Derived(base) => {
                links.push((handle, id, base));
                true
            }
            _ => false,
        };
        if !derived {
            if let Some(RawValue::Text(name)) = row.read(id, layout.name, Decode::Text) {
                self.sink
                    .set_field(handle, CalendarField::Name.into(), FieldValue::Text(name));
            }
        }

        match row.bytes(id, layout.data) {
            Some(data) => {
                self.sink
                    .set_calendar_week(handle, layout.week.decode_week(data, derived));
                for exception in layout.week.decode_exceptions(data) {
                    self.sink.add_calendar_exception(handle, exception);
                }
            }
            None if derived => self
                .sink
                .set_calendar_week(handle, std::array::from_fn(|_| DayDefinition::Inherit)),
            None => {
                let week = self.base_week(layout);
                self.sink.set_calendar_week(handle, week);
            }
        }

        if derived {
            if let Some(resource) = resource.filter(|&r| r > 0) {
                self.resource_calendars.insert(resource, handle);
            }
        }
        self.sink.end_entity(handle);
        self.calendars.insert(id, handle);
        out.items += 1;
    }

    /// Week for a base calendar stored without one.
    fn base_week(&self, layout: &CalendarLayout) -> [DayDefinition; 7] {
        self.generation
            .default_calendar_hours()
            .and_then(|key| self.props.as_ref()?.get(key))
            .map_or_else(standard_week, |data| layout.week.decode_week(data, false))
    }

    fn resources(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let layout = self.generation.resources();
        let records = self.entity_records(layout.directory, layout.records)?;
        out.state = records.state();
        records.for_each_row(plan_for(layout), |row| {
            let Some(uid) = accept_row(layout, row, &self.resources, out) else {
                return;
            };
            let handle = self.sink.begin_resource();
            self.apply_fields(handle, uid, row, layout.fields);
            let calendar = match layout.calendar {
                Some(at) => get_i32(row.fixed, at)
                    .ok()
                    .and_then(|id| self.calendars.get(&id)),
                None => self.resource_calendars.get(&uid),
            };
            if let Some(&calendar) = calendar {
                self.sink.attach_calendar(handle, calendar);
            }
            self.sink.end_entity(handle);
            self.resources.insert(uid, handle);
            out.items += 1;
        });
        Ok(())
    }

    fn tasks(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let layout = self.generation.tasks();
        let records = self.entity_records(layout.directory, layout.records)?;
        out.state = records.state();
        records.for_each_row(plan_for(layout), |row| {
            let Some(uid) = accept_row(layout, row, &self.tasks, out) else {
                return;
            };
            let handle = self.sink.begin_task();
            self.apply_fields(handle, uid, row, layout.fields);
            self.sink.end_entity(handle);
            self.tasks.insert(uid, handle);
            out.items += 1;
        });
        Ok(())
    }

    fn relations(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let layout = self.generation.relations();
        let root = self.generation.project_dir();
        let Some(records) = self.streams.records(root, layout.directory, layout.records)? else {
            if layout.optional {
                return self.missing_optional(Stage::Relations, &[root, layout.directory]);
            }
            return Err(ReadError::MissingStream {
                path: display_path(&[root, layout.directory]),
            });
        };
        self.check_tags(&records)?;
        out.state = records.state();

        let plan = RowPlan {
            meta_offset: layout.meta_offset,
            ..RowPlan::default()
        };
        let mut last_ordinal = None;
        records.for_each_row(plan, |row| {
            if layout.skip.iter().any(|rule| rule.matches(row.fixed, row.meta)) {
                out.skipped += 1;
                return;
            }
            if let Some(at) = layout.ordinal {
                let ordinal = get_i32(row.fixed, at).ok();
                if ordinal.is_none() || ordinal <= last_ordinal {
                    trace!(row = row.index, ?ordinal, "relation out of order");
                    out.skipped += 1;
                    return;
                }
                last_ordinal = ordinal;
            }
            self.relation(layout, row, out);
        });
        Ok(())
    }

    fn relation(&mut self, layout: &RelationLayout, row: Row<'_>, out: &mut StageReport) {
        let (Ok(predecessor), Ok(successor)) = (
            get_i32(row.fixed, layout.predecessor),
            get_i32(row.fixed, layout.successor),
        ) else {
            out.skipped += 1;
            return;
        };
        if predecessor == successor {
            trace!(task = predecessor, "self link skipped");
            out.skipped += 1;
            return;
        }
        let (Some(&pred), Some(&succ)) = (self.tasks.get(&predecessor), self.tasks.get(&successor))
        else {
            warn!(predecessor, successor, "relation names a missing task");
            self.report.warnings.push(ReadWarning::DanglingRelation {
                predecessor,
                successor,
            });
            out.skipped += 1;
            return;
        };

        let kind = get_i16(row.fixed, layout.kind)
            .ok()
            .and_then(RelationType::from_code)
            .unwrap_or(RelationType::FinishStart);
        let units = get_i16(row.fixed, layout.lag_units)
            .map(TimeUnit::from_code)
            .unwrap_or_default();
        let lag = get_i32(row.fixed, layout.lag).map_or(0.0, f64::from);
        self.sink
            .link_predecessor(succ, pred, kind, self.ctx.adjust(lag, units));
        out.items += 1;
    }

    fn assignments(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let layout = self.generation.assignments();
        let records = self.entity_records(layout.directory, layout.records)?;
        let records = self.settle_width(layout, records)?;
        out.state = records.state();

        let plan = RowPlan {
            meta_offset: layout.meta_offset,
            ..RowPlan::default()
        };
        records.for_each_row(plan, |row| {
            if layout.skip.iter().any(|rule| rule.matches(row.fixed, row.meta)) {
                out.skipped += 1;
                return;
            }
            let Some((task, resource)) = assignment_ids(layout, row.fixed) else {
                out.skipped += 1;
                return;
            };
            let (Some(&task_handle), Some(&resource_handle)) =
                (self.tasks.get(&task), self.resources.get(&resource))
            else {
                warn!(task, resource, "assignment names a missing entity");
                self.report
                    .warnings
                    .push(ReadWarning::DanglingAssignment { task, resource });
                out.skipped += 1;
                return;
            };
            let handle = self.sink.begin_assignment(task_handle, resource_handle);
            let entity = i32::try_from(row.index).unwrap_or(i32::MAX);
            self.apply_fields(handle, entity, row, layout.fields);
            self.sink.end_entity(handle);
            out.items += 1;
        });
        Ok(())
    }

    /// Picks between two legacy assignment widths that both divide the
    /// stream.
    ///
    /// A width is accepted when every row it yields names a task and a
    /// resource that were read. This is a heuristic: when neither width
    /// resolves every row, the one resolving more rows wins (the primary
    /// on a tie) and an ambiguity warning is recorded.
    fn settle_width(&mut self, layout: &AssignmentLayout, records: Records) -> ReadResult<Records> {
        let RecordWidth::Legacy(LegacyWidth {
            primary,
            alternate: Some(alternate),
        }) = layout.records
        else {
            return Ok(records);
        };
        if records.legacy_width() != Some(primary)
            || !records.divisible_by(primary)
            || !records.divisible_by(alternate)
        {
            return Ok(records);
        }

        let (rows, resolved) = self.assignment_fit(layout, &records);
        if resolved == rows {
            debug!(width = primary, rows, "assignment width settled");
            return Ok(records);
        }
        let stream = display_path(&[self.generation.project_dir(), layout.directory]);
        let other = records.rewidth(alternate, self.streams.limits(), &stream)?;
        let (other_rows, other_resolved) = self.assignment_fit(layout, &other);
        if other_resolved == other_rows {
            debug!(width = alternate, rows = other_rows, "assignment width settled");
            return Ok(other);
        }

        let (chosen, records) = if other_resolved > resolved {
            (alternate, other)
        } else {
            (primary, records)
        };
        let error = ReadError::AmbiguousLayout {
            directory: stream,
            candidates: [primary, alternate],
            chosen,
        };
        warn!(%error, "assignment width ambiguous");
        self.report.warnings.push(ReadWarning::AmbiguousLayout(error));
        Ok(records)
    }

    /// Counts rows and rows whose task and resource both exist.
    fn assignment_fit(&self, layout: &AssignmentLayout, records: &Records) -> (usize, usize) {
        let mut rows = 0;
        let mut resolved = 0;
        records.for_each_row(RowPlan::default(), |row| {
            if layout.skip.iter().any(|rule| rule.matches(row.fixed, row.meta)) {
                return;
            }
            rows += 1;
            let found = assignment_ids(layout, row.fixed).is_some_and(|(task, resource)| {
                self.tasks.contains_key(&task) && self.resources.contains_key(&resource)
            });
            if found {
                resolved += 1;
            }
        });
        (rows, resolved)
    }

    fn view_properties(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let Some(key) = self.hydrator.summary_task_property() else {
            return Ok(());
        };
        let path = [self.generation.view_dir(), PROPS_STREAM];
        let Some(data) = self.streams.open(&path)? else {
            return self.missing_optional(Stage::ViewProperties, &path);
        };
        let bag = PropertyBag::decode(&data, self.hydrator.props_shape(), self.streams.limits());
        out.state = bag.state();
        if let Some(flag) = bag.flag(key) {
            self.sink
                .set_project_field(ProjectField::ShowProjectSummaryTask, FieldValue::Bool(flag));
            out.items += 1;
        }
        Ok(())
    }

    fn view_records(&mut self, stage: Stage, directory: &str, width: usize) -> ReadResult<Option<FixFix>> {
        let path = [self.generation.view_dir(), directory, mpp8::FIXED_STREAM];
        let Some(data) = self.streams.open(&path)? else {
            self.missing_optional(stage, &path)?;
            return Ok(None);
        };
        FixFix::decode(&data, width, self.streams.limits())
            .map(Some)
            .map_err(|e| ReadError::store(display_path(&path), e))
    }

    fn views(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let Some(layout) = self.generation.views() else {
            return Ok(());
        };
        let Some(fixed) = self.view_records(Stage::Views, layout.directory, layout.width)? else {
            return Ok(());
        };
        out.state = fixed.state();
        for record in fixed.iter() {
            match layout.decode(record) {
                Ok(view) => {
                    self.sink.add_view(view);
                    out.items += 1;
                }
                Err(err) => {
                    trace!(%err, "view record unreadable");
                    out.skipped += 1;
                }
            }
        }
        Ok(())
    }

    fn tables(&mut self, out: &mut StageReport) -> ReadResult<()> {
        let Some(layout) = self.generation.tables() else {
            return Ok(());
        };
        let Some(fixed) = self.view_records(Stage::Tables, layout.directory, layout.width)? else {
            return Ok(());
        };
        out.state = fixed.state();

        let path = [self.generation.view_dir(), layout.directory, mpp8::DEFERRED_STREAM];
        let deferred = match self.streams.open(&path)? {
            Some(data) => FixDeferFix::decode(&data, self.streams.limits())
                .map_err(|e| ReadError::store(display_path(&path), e))?,
            None => FixDeferFix::default(),
        };
        let follow = |bytes: &[u8], at: usize| {
            get_i32(bytes, at)
                .ok()
                .and_then(Offset::from_stored)
                .and_then(|offset| deferred.get(offset))
        };

        for record in fixed.iter() {
            let Ok(mut table) = layout.decode(record) else {
                out.skipped += 1;
                continue;
            };
            let columns = follow(record, layout.extended).and_then(|ext| follow(ext, layout.columns));
            if let Some(block) = columns {
                layout.decode_columns(block, &mut table);
            }
            self.sink.add_table(table);
            out.items += 1;
        }
        Ok(())
    }
}

fn plan_for<F>(layout: &EntityLayout<F>) -> RowPlan {
    RowPlan {
        leading_rows: layout.leading_rows,
        meta_offset: None,
        extended: layout.extended,
    }
}

/// Applies row validation and returns the unique id of a row to keep.
fn accept_row<F, H>(
    layout: &EntityLayout<F>,
    row: Row<'_>,
    seen: &BTreeMap<i32, H>,
    out: &mut StageReport,
) -> Option<i32> {
    if layout.skips(row.fixed, row.meta) {
        trace!(kind = %layout.kind, row = row.index, "row skipped");
        out.skipped += 1;
        return None;
    }
    match layout.read_unique_id(row.fixed) {
        Some(uid) if uid >= 1 && !seen.contains_key(&uid) => Some(uid),
        uid => {
            trace!(kind = %layout.kind, row = row.index, ?uid, "row has no usable id");
            out.skipped += 1;
            None
        }
    }
}

fn assignment_ids(layout: &AssignmentLayout, fixed: &[u8]) -> Option<(i32, i32)> {
    Some((
        get_i32(fixed, layout.task).ok()?,
        get_i32(fixed, layout.resource).ok()?,
    ))
}
