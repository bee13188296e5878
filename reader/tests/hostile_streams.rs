use layout::mpp8;
use proptest::prelude::*;
use reader::{read_project, MemoryContainer, ProjectCollector, ReadOptions, COMPOBJ_STREAM};
use store::CompObj;

fn identity(format: &str) -> Vec<u8> {
    CompObj {
        application_name: "Microsoft Project".into(),
        format: format.into(),
        application_id: None,
    }
    .encode()
}

fn mpp9_container(streams: &[Vec<u8>]) -> MemoryContainer {
    let mut container = MemoryContainer::new();
    container.insert(&[COMPOBJ_STREAM], identity("MSProject.MPP9"));
    container.insert(&["   19", "Props"], streams[0].clone());
    let dirs = ["TBkndCal", "TBkndRsc", "TBkndTask", "TBkndCons", "TBkndAssn"];
    for (i, dir) in dirs.iter().enumerate() {
        container
            .insert(&["   19", dir, "FixedMeta"], streams[1 + i].clone())
            .insert(&["   19", dir, "FixedData"], streams[(2 + i) % streams.len()].clone())
            .insert(&["   19", dir, "VarMeta"], streams[(3 + i) % streams.len()].clone())
            .insert(&["   19", dir, "Var2Data"], streams[(4 + i) % streams.len()].clone());
    }
    container
}

fn mpp8_container(streams: &[Vec<u8>]) -> MemoryContainer {
    let mut container = MemoryContainer::new();
    container.insert(&[COMPOBJ_STREAM], identity("MSProject.MPP8"));
    container.insert(&["   1", "Props"], streams[0].clone());
    container.insert(&["   2", "Props"], streams[1].clone());
    let dirs = [
        ("   1", "TBkndCal"),
        ("   1", "TBkndRsc"),
        ("   1", "TBkndTask"),
        ("   1", "TBkndCons"),
        ("   1", "TBkndAssn"),
        ("   2", "CV_iew"),
        ("   2", "CTable"),
    ];
    for (i, (root, dir)) in dirs.iter().enumerate() {
        container
            .insert(&[root, dir, mpp8::FIXED_STREAM], streams[(2 + i) % streams.len()].clone())
            .insert(&[root, dir, mpp8::DEFERRED_STREAM], streams[(3 + i) % streams.len()].clone());
    }
    container
}

fn streams() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..600), 8)
}

#[test]
fn empty_streams_do_not_panic() {
    let empty = vec![Vec::new(); 8];
    for container in [mpp9_container(&empty), mpp8_container(&empty)] {
        let mut sink = ProjectCollector::new();
        let _ = read_project(&container, &mut sink, &ReadOptions::for_testing());
    }
}

proptest! {
    #[test]
    fn arbitrary_mpp9_streams_never_panic(streams in streams()) {
        let container = mpp9_container(&streams);
        let mut sink = ProjectCollector::new();
        let _ = read_project(&container, &mut sink, &ReadOptions::for_testing());
    }

    #[test]
    fn arbitrary_mpp8_streams_never_panic(streams in streams()) {
        let container = mpp8_container(&streams);
        let mut sink = ProjectCollector::new();
        if let Ok(report) = read_project(&container, &mut sink, &ReadOptions::for_testing()) {
            prop_assert!(report.stages.len() >= 6);
        }
    }

    #[test]
    fn arbitrary_identity_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut container = MemoryContainer::new();
        container.insert(&[COMPOBJ_STREAM], data);
        let _ = reader::identify(&container);
    }
}
