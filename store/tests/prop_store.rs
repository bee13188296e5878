use std::collections::BTreeMap;

use proptest::prelude::*;
use store::{
    FixedMeta, FixedStore, FixedStoreWriter, PropertyBag, PropertyBagWriter, PropsShape,
    StoreLimits, TaggedKey, TaggedSource, VarStore, VarStoreWriter,
};

fn limits() -> StoreLimits {
    StoreLimits::for_testing()
}

fn entries_strategy() -> impl Strategy<Value = BTreeMap<(u16, u8), Vec<u8>>> {
    prop::collection::btree_map(
        (1u16..64, any::<u8>()),
        prop::collection::vec(any::<u8>(), 0..24),
        0..32,
    )
}

proptest! {
    #[test]
    fn prop_tagged_lookup_returns_stored_bytes(
        entries in entries_strategy(),
        probe in (0u16..80, any::<u8>()),
    ) {
        let mut writer = VarStoreWriter::new();
        for (&(entity, tag), payload) in &entries {
            writer.insert(entity, tag, payload);
        }
        let (meta, data) = writer.finish();
        let store = VarStore::decode(&meta, &data, &limits()).unwrap();

        prop_assert_eq!(store.len(), entries.len());
        for (&(entity, tag), payload) in &entries {
            let key = TaggedKey::new(i32::from(entity), i16::from(tag));
            prop_assert_eq!(store.get(key), Some(payload.as_slice()));
        }
        let (entity, tag) = probe;
        let found = store.blob(i32::from(entity), i16::from(tag));
        prop_assert_eq!(found, entries.get(&probe).map(Vec::as_slice));
    }

    #[test]
    fn prop_tagged_decode_never_panics(
        meta in prop::collection::vec(any::<u8>(), 0..96),
        data in prop::collection::vec(any::<u8>(), 0..96),
    ) {
        let _ = VarStore::decode(&meta, &data, &limits());
    }

    #[test]
    fn prop_fixed_count_ignores_header(
        records in prop::collection::vec(prop::collection::vec(any::<u8>(), 12), 0..20),
        declared in 0usize..200,
    ) {
        let mut writer = FixedStoreWriter::new(10);
        writer.declare_items(declared);
        for record in &records {
            writer.push(&[], record);
        }
        let (meta, data) = writer.finish();
        let meta = FixedMeta::decode(&meta, 10, &limits()).unwrap();
        prop_assert_eq!(meta.len(), records.len());

        let store = FixedStore::from_meta(&meta, &data, &limits()).unwrap();
        for (index, record) in records.iter().enumerate() {
            prop_assert_eq!(store.item(index), Some(record.as_slice()));
        }
        prop_assert!(store.item(records.len()).is_none());
    }

    #[test]
    fn prop_property_bag_keeps_prefix(
        values in prop::collection::vec(any::<i32>(), 1..16),
        cut in 0usize..400,
    ) {
        let mut writer = PropertyBagWriter::new(PropsShape::Current);
        for (key, value) in values.iter().enumerate() {
            writer.entry(i32::try_from(key).unwrap(), &value.to_le_bytes());
        }
        let stream = writer.finish();
        let cut = cut.min(stream.len());
        let bag = PropertyBag::decode(&stream[..cut], PropsShape::Current, &limits());

        prop_assert_eq!(bag.is_complete(), cut == stream.len());
        for (key, value) in bag.iter() {
            let expected = values[usize::try_from(key).unwrap()].to_le_bytes();
            prop_assert_eq!(value, &expected[..]);
        }
    }

    #[test]
    fn prop_legacy_bag_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..128)) {
        let bag = PropertyBag::decode(&data, PropsShape::Legacy, &limits());
        prop_assert!(bag.len() <= 128);
    }
}
