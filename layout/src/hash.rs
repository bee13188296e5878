//! Deterministic layout fingerprints.

use blake3::Hasher;

use crate::descriptor::{Decode, FieldDescriptor, Interpret, Locator, RecordWidth, RowSkip};
use crate::field::FieldId;
use crate::Generation;

/// Computes a stable fingerprint of every table a generation decodes with.
///
/// Any change to an offset, tag, decode step or interpretation changes the
/// hash, so golden tests can pin a generation's layout.
#[must_use]
pub fn layout_hash(generation: Generation) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(generation.to_string().as_bytes());

    let tasks = generation.tasks();
    write_records(&mut hasher, tasks.directory, tasks.records, tasks.skip);
    write_fields(&mut hasher, tasks.fields);

    let resources = generation.resources();
    write_records(&mut hasher, resources.directory, resources.records, resources.skip);
    write_fields(&mut hasher, resources.fields);

    let relations = generation.relations();
    write_records(&mut hasher, relations.directory, relations.records, relations.skip);
    for offset in [
        relations.predecessor,
        relations.successor,
        relations.kind,
        relations.lag_units,
        relations.lag,
    ] {
        write_usize(&mut hasher, offset);
    }

    let assignments = generation.assignments();
    write_records(
        &mut hasher,
        assignments.directory,
        assignments.records,
        assignments.skip,
    );
    write_usize(&mut hasher, assignments.task);
    write_usize(&mut hasher, assignments.resource);
    write_fields(&mut hasher, assignments.fields);

    let calendars = generation.calendars();
    write_records(&mut hasher, calendars.directory, calendars.records, &[]);
    write_locator(&mut hasher, calendars.name);
    write_locator(&mut hasher, calendars.data);
    let week = calendars.week;
    for value in [
        week.first_day,
        week.day_stride,
        week.first_exception,
        week.exception_stride,
    ] {
        write_usize(&mut hasher, value);
    }

    write_fields(&mut hasher, generation.properties());

    let hash = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

fn write_records(hasher: &mut Hasher, directory: &str, records: RecordWidth, skip: &[RowSkip]) {
    hasher.update(directory.as_bytes());
    match records {
        RecordWidth::Meta { meta } => {
            write_u8(hasher, 0);
            write_usize(hasher, meta);
        }
        RecordWidth::MetaSized { meta, item } => {
            write_u8(hasher, 1);
            write_usize(hasher, meta);
            write_usize(hasher, item);
        }
        RecordWidth::MetaChunked { meta, item } => {
            write_u8(hasher, 2);
            write_usize(hasher, meta);
            write_usize(hasher, item);
        }
        RecordWidth::Legacy(width) => {
            write_u8(hasher, 3);
            write_usize(hasher, width.primary);
            write_usize(hasher, width.alternate.unwrap_or(0));
        }
    }
    write_usize(hasher, skip.len());
    for rule in skip {
        // Debug output is stable for these plain data enums.
        hasher.update(format!("{rule:?}").as_bytes());
    }
}

fn write_fields<F>(hasher: &mut Hasher, fields: &[FieldDescriptor<F>])
where
    F: Copy + Into<FieldId>,
{
    write_usize(hasher, fields.len());
    for descriptor in fields {
        let id: FieldId = descriptor.field.into();
        hasher.update(id.kind().to_string().as_bytes());
        hasher.update(id.key().as_bytes());
        write_locator(hasher, descriptor.locator);
        write_decode(hasher, descriptor.decode);
        write_interpret(hasher, descriptor.interpret);
    }
}

fn write_locator(hasher: &mut Hasher, locator: Locator) {
    match locator {
        Locator::Fixed(offset) => {
            write_u8(hasher, 0);
            write_usize(hasher, offset);
        }
        Locator::Meta(offset) => {
            write_u8(hasher, 1);
            write_usize(hasher, offset);
        }
        Locator::Tagged(tag) => {
            write_u8(hasher, 2);
            hasher.update(&tag.to_le_bytes());
        }
        Locator::TaggedPointer(tag) => {
            write_u8(hasher, 3);
            hasher.update(&tag.to_le_bytes());
        }
        Locator::Deferred(offset) => {
            write_u8(hasher, 4);
            write_usize(hasher, offset);
        }
        Locator::Property(key) => {
            write_u8(hasher, 5);
            hasher.update(&key.to_le_bytes());
        }
    }
}

fn write_decode(hasher: &mut Hasher, decode: Decode) {
    match decode {
        Decode::Byte => write_u8(hasher, 0),
        Decode::Short => write_u8(hasher, 1),
        Decode::Int => write_u8(hasher, 2),
        Decode::Long6 => write_u8(hasher, 3),
        Decode::Long => write_u8(hasher, 4),
        Decode::Double => write_u8(hasher, 5),
        Decode::Date => write_u8(hasher, 6),
        Decode::Time => write_u8(hasher, 7),
        Decode::Timestamp => write_u8(hasher, 8),
        Decode::Text => write_u8(hasher, 9),
        Decode::Flag(mask) => {
            write_u8(hasher, 10);
            write_u8(hasher, mask);
        }
        Decode::FlagPair { mask, with } => {
            write_u8(hasher, 11);
            write_u8(hasher, mask);
            write_usize(hasher, with);
        }
        Decode::Bool => write_u8(hasher, 12),
    }
}

fn write_interpret(hasher: &mut Hasher, interpret: Interpret) {
    match interpret {
        Interpret::Number { divisor }
        | Interpret::Currency { divisor }
        | Interpret::Work { divisor }
        | Interpret::Units { divisor } => {
            hasher.update(format!("{interpret:?}").as_bytes());
            hasher.update(&divisor.to_le_bytes());
        }
        Interpret::Duration { units } => {
            write_u8(hasher, 1);
            if let Some(units) = units {
                write_locator(hasher, units);
            }
        }
        other => {
            hasher.update(format!("{other:?}").as_bytes());
        }
    }
}

fn write_u8(hasher: &mut Hasher, value: u8) {
    hasher.update(&[value]);
}

fn write_usize(hasher: &mut Hasher, value: usize) {
    hasher.update(&u64::try_from(value).unwrap_or(u64::MAX).to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_hash_is_stable() {
        for generation in Generation::ALL {
            assert_eq!(layout_hash(generation), layout_hash(generation));
        }
    }

    #[test]
    fn generations_hash_differently() {
        assert_ne!(layout_hash(Generation::Mpp8), layout_hash(Generation::Mpp9));
    }

    #[test]
    fn locator_kind_is_hashed() {
        let mut a = Hasher::new();
        write_locator(&mut a, Locator::Fixed(8));
        let mut b = Hasher::new();
        write_locator(&mut b, Locator::Meta(8));
        assert_ne!(a.finalize(), b.finalize());
    }
}
