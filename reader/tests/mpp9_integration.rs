use layout::{
    properties, standard_week, AssignmentField, DayDefinition, Duration, FieldValue, Generation,
    ProjectField, RelationType, ResourceField, TaskField, TimeUnit,
};
use reader::{
    read_project, MemoryContainer, ProjectCollector, ReadError, ReadOptions, ReadWarning, Stage,
    COMPOBJ_STREAM,
};
use store::{CompObj, FixedStoreWriter, PropertyBagWriter, PropsShape, StreamState, VarStoreWriter};

const ROOT: &str = "   19";

fn utf16(text: &str) -> Vec<u8> {
    let mut out: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
    out.extend_from_slice(&[0, 0]);
    out
}

fn put_i32(buf: &mut [u8], at: usize, value: i32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_i16(buf: &mut [u8], at: usize, value: i16) {
    buf[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

fn insert_dir(
    container: &mut MemoryContainer,
    dir: &str,
    fixed: &FixedStoreWriter,
    tagged: Option<&VarStoreWriter>,
) {
    let (meta, data) = fixed.finish();
    container
        .insert(&[ROOT, dir, "FixedMeta"], meta)
        .insert(&[ROOT, dir, "FixedData"], data);
    if let Some(tagged) = tagged {
        let (meta, data) = tagged.finish();
        container
            .insert(&[ROOT, dir, "VarMeta"], meta)
            .insert(&[ROOT, dir, "Var2Data"], data);
    }
}

/// Two tasks, one finish-to-start link, one resource assigned to both,
/// a base calendar and the resource's derived calendar.
fn minimal_file() -> MemoryContainer {
    let mut container = MemoryContainer::new();
    let identity = CompObj {
        application_name: "Microsoft Project 9.0".into(),
        format: "MSProject.MPP9".into(),
        application_id: Some("MSProject.Project.9".into()),
    };
    container.insert(&[COMPOBJ_STREAM], identity.encode());

    let mut props = PropertyBagWriter::new(PropsShape::Current);
    props
        .entry(properties::MINUTES_PER_DAY, &480i32.to_le_bytes())
        .entry(properties::CURRENCY_SYMBOL, &utf16("$"));
    container.insert(&[ROOT, "Props"], props.finish());

    // Both calendars share one data item.
    let mut blocks = vec![0u8; 24];
    put_i32(&mut blocks, 0, 1);
    put_i32(&mut blocks, 4, -1);
    put_i32(&mut blocks, 8, -1);
    put_i32(&mut blocks, 12, 2);
    put_i32(&mut blocks, 16, 1);
    put_i32(&mut blocks, 20, 1);
    let mut calendars = FixedStoreWriter::new(10);
    calendars.push(&[], &blocks);
    let mut calendar_tags = VarStoreWriter::new();
    calendar_tags.insert_text(1, 1, "Standard");
    insert_dir(&mut container, "TBkndCal", &calendars, Some(&calendar_tags));

    let mut resource = vec![0u8; 188];
    put_i16(&mut resource, 0, 1);
    put_i32(&mut resource, 4, 1);
    let mut resources = FixedStoreWriter::new(37);
    resources.push(&[], &resource);
    let mut resource_tags = VarStoreWriter::new();
    resource_tags.insert_text(1, 1, "Crew");
    insert_dir(&mut container, "TBkndRsc", &resources, Some(&resource_tags));

    let mut tasks = FixedStoreWriter::new(47);
    for _ in 0..3 {
        tasks.push(&[], &[0u8; 4]);
    }
    for uid in 1..=2 {
        let mut task = vec![0u8; 240];
        put_i32(&mut task, 0, uid);
        put_i32(&mut task, 4, uid);
        put_i32(&mut task, 60, 4800);
        put_i16(&mut task, 64, 7);
        tasks.push(&[], &task);
    }
    let mut task_tags = VarStoreWriter::new();
    task_tags
        .insert_text(1, 11, "Design")
        .insert_text(2, 11, "Build");
    insert_dir(&mut container, "TBkndTask", &tasks, Some(&task_tags));

    let mut link = vec![0u8; 20];
    put_i32(&mut link, 0, 1);
    put_i32(&mut link, 4, 1);
    put_i32(&mut link, 8, 2);
    put_i16(&mut link, 12, 1);
    put_i16(&mut link, 14, 7);
    let mut relations = FixedStoreWriter::new(10);
    relations.push(&[], &link);
    insert_dir(&mut container, "TBkndCons", &relations, None);

    let mut assignments = FixedStoreWriter::new(34);
    for uid in 1..=2 {
        let mut assignment = vec![0u8; 142];
        put_i32(&mut assignment, 0, uid);
        put_i32(&mut assignment, 4, uid);
        put_i32(&mut assignment, 8, 1);
        assignment[54..62].copy_from_slice(&100.0f64.to_le_bytes());
        assignments.push(&[], &assignment);
    }
    insert_dir(&mut container, "TBkndAssn", &assignments, None);

    container
}

#[test]
fn minimal_file_hydrates_every_entity() {
    let container = minimal_file();
    let mut sink = ProjectCollector::new();
    let report = read_project(&container, &mut sink, &ReadOptions::for_testing()).unwrap();
    let project = sink.finish();

    assert_eq!(report.generation, Generation::Mpp9);
    assert_eq!(
        report.order(),
        vec![
            Stage::Properties,
            Stage::Calendars,
            Stage::Resources,
            Stage::Tasks,
            Stage::Relations,
            Stage::Assignments,
        ]
    );
    assert!(report.warnings.is_empty(), "{report}");

    let uids: Vec<_> = project.tasks.iter().map(|t| t.unique_id()).collect();
    assert_eq!(uids, vec![Some(1), Some(2)]);
    assert_eq!(
        project.task(1).and_then(|t| t.get(TaskField::Name)),
        Some(&FieldValue::Text("Design".into()))
    );
    assert_eq!(
        project.task(2).and_then(|t| t.get(TaskField::Duration)),
        Some(&FieldValue::Duration(Duration::new(1.0, TimeUnit::Days)))
    );

    assert_eq!(project.resources.len(), 1);
    assert_eq!(
        project.resources[0].get(ResourceField::Name),
        Some(&FieldValue::Text("Crew".into()))
    );

    assert_eq!(project.relations.len(), 1);
    let relation = &project.relations[0];
    assert_eq!(relation.kind, RelationType::FinishStart);
    assert_eq!(relation.lag.value, 0.0);
    assert_eq!(project.tasks[relation.predecessor].unique_id(), Some(1));
    assert_eq!(project.tasks[relation.successor].unique_id(), Some(2));

    assert_eq!(project.assignments.len(), 2);
    for assignment in &project.assignments {
        assert_eq!(assignment.resource, 0);
        assert_eq!(
            assignment.get(AssignmentField::Units),
            Some(&FieldValue::Units(1.0))
        );
    }
}

#[test]
fn project_properties_and_identity() {
    let container = minimal_file();
    let mut sink = ProjectCollector::new();
    let report = read_project(&container, &mut sink, &ReadOptions::for_testing()).unwrap();
    let project = sink.finish();

    assert_eq!(report.format, "MSProject.MPP9");
    assert_eq!(
        project
            .property(ProjectField::FileFormat)
            .and_then(FieldValue::as_text),
        Some("MSProject.MPP9")
    );
    assert_eq!(
        project
            .property(ProjectField::CurrencySymbol)
            .and_then(FieldValue::as_text),
        Some("$")
    );
    assert_eq!(
        project.property(ProjectField::MinutesPerDay),
        Some(&FieldValue::Int(480))
    );
}

#[test]
fn calendars_link_to_bases_and_resources() {
    let container = minimal_file();
    let mut sink = ProjectCollector::new();
    read_project(&container, &mut sink, &ReadOptions::for_testing()).unwrap();
    let project = sink.finish();

    assert_eq!(project.calendars.len(), 2);
    let base = &project.calendars[0];
    assert_eq!(base.name(), Some("Standard"));
    assert_eq!(base.week.as_ref(), Some(&standard_week()));
    assert_eq!(base.base, None);

    let derived = &project.calendars[1];
    assert_eq!(derived.unique_id(), Some(2));
    assert_eq!(derived.name(), None);
    assert_eq!(derived.base, Some(0));
    assert!(derived
        .week
        .as_ref()
        .is_some_and(|week| week.iter().all(|d| *d == DayDefinition::Inherit)));

    assert_eq!(project.resources[0].calendar, Some(1));
}

#[test]
fn missing_relations_are_optional() {
    let mut container = minimal_file();
    container.remove(&[ROOT, "TBkndCons", "FixedMeta"]);

    let mut sink = ProjectCollector::new();
    let report = read_project(&container, &mut sink, &ReadOptions::for_testing()).unwrap();
    assert!(sink.project().relations.is_empty());
    assert_eq!(sink.project().assignments.len(), 2);
    assert!(matches!(
        report.warnings.as_slice(),
        [ReadWarning::MissingOptional {
            stage: Stage::Relations,
            ..
        }]
    ));
    assert_eq!(
        report.stage(Stage::Relations).map(|s| s.state),
        Some(StreamState::Unopened)
    );

    let mut sink = ProjectCollector::new();
    let err = read_project(&container, &mut sink, &ReadOptions::strict()).unwrap_err();
    assert!(matches!(err, ReadError::MissingStream { .. }));
}

#[test]
fn corrupt_stage_is_skipped_when_lenient() {
    let mut container = minimal_file();
    container.insert(&[ROOT, "TBkndTask", "FixedMeta"], vec![0xAB; 64]);

    let mut sink = ProjectCollector::new();
    let report = read_project(&container, &mut sink, &ReadOptions::for_testing()).unwrap();
    let project = sink.finish();
    assert!(project.tasks.is_empty());
    assert!(project.assignments.is_empty());
    assert!(report.warnings.iter().any(|w| matches!(
        w,
        ReadWarning::StageFailed {
            stage: Stage::Tasks,
            ..
        }
    )));
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, ReadWarning::DanglingAssignment { .. })));

    let mut sink = ProjectCollector::new();
    let err = read_project(&container, &mut sink, &ReadOptions::strict()).unwrap_err();
    assert!(matches!(err, ReadError::Store { .. }));
}

#[test]
fn unreadable_tagged_fields_keep_fixed_rows() {
    let mut container = minimal_file();
    container.insert(&[ROOT, "TBkndTask", "VarMeta"], vec![0u8; 32]);

    let mut sink = ProjectCollector::new();
    let report = read_project(&container, &mut sink, &ReadOptions::for_testing()).unwrap();
    let project = sink.finish();

    let uids: Vec<_> = project.tasks.iter().map(|t| t.unique_id()).collect();
    assert_eq!(uids, vec![Some(1), Some(2)]);
    assert_eq!(project.task(1).and_then(|t| t.get(TaskField::Name)), None);
    assert_eq!(
        project.task(2).and_then(|t| t.get(TaskField::Duration)),
        Some(&FieldValue::Duration(Duration::new(1.0, TimeUnit::Days)))
    );
    assert_eq!(project.relations.len(), 1);
    assert_eq!(project.assignments.len(), 2);
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, ReadWarning::UnreadableTags(ReadError::Store { .. }))));
    assert!(!report
        .warnings
        .iter()
        .any(|w| matches!(w, ReadWarning::StageFailed { .. })));

    let mut sink = ProjectCollector::new();
    let err = read_project(&container, &mut sink, &ReadOptions::strict()).unwrap_err();
    assert!(matches!(err, ReadError::Store { .. }));
}

#[test]
fn deleted_rows_and_repeated_links_are_dropped() {
    let mut container = minimal_file();

    let mut tasks = FixedStoreWriter::new(47);
    for _ in 0..3 {
        tasks.push(&[], &[0u8; 4]);
    }
    for (uid, marker) in [(1, 0i32), (2, 0), (3, 2)] {
        let mut task = vec![0u8; 240];
        put_i32(&mut task, 0, uid);
        tasks.push(&marker.to_le_bytes(), &task);
    }
    let (meta, data) = tasks.finish();
    container
        .insert(&[ROOT, "TBkndTask", "FixedMeta"], meta)
        .insert(&[ROOT, "TBkndTask", "FixedData"], data);

    // The second record repeats the ordinal and is ignored.
    let mut relations = FixedStoreWriter::new(10);
    for ordinal in [5, 5] {
        let mut link = vec![0u8; 20];
        put_i32(&mut link, 0, ordinal);
        put_i32(&mut link, 4, 1);
        put_i32(&mut link, 8, 2);
        put_i16(&mut link, 12, 3);
        relations.push(&[], &link);
    }
    let (meta, data) = relations.finish();
    container
        .insert(&[ROOT, "TBkndCons", "FixedMeta"], meta)
        .insert(&[ROOT, "TBkndCons", "FixedData"], data);

    let mut sink = ProjectCollector::new();
    let report = read_project(&container, &mut sink, &ReadOptions::for_testing()).unwrap();
    let project = sink.finish();
    assert_eq!(project.tasks.len(), 2);
    assert_eq!(report.stage(Stage::Tasks).map(|s| s.skipped), Some(1));
    assert_eq!(project.relations.len(), 1);
    assert_eq!(project.relations[0].kind, RelationType::StartStart);
}

#[test]
fn unsupported_generation_stops_before_any_stage() {
    let mut container = minimal_file();
    let identity = CompObj {
        application_name: "Microsoft Project 4.0".into(),
        format: "MSProject.MPP4".into(),
        application_id: None,
    };
    container.insert(&[COMPOBJ_STREAM], identity.encode());

    let mut sink = ProjectCollector::new();
    let err = read_project(&container, &mut sink, &ReadOptions::default()).unwrap_err();
    assert!(matches!(err, ReadError::UnsupportedFormat { .. }));
    assert!(sink.project().properties.is_empty());
}
