//! Layout table validation.

use std::collections::HashSet;
use std::fmt;

use crate::descriptor::{FieldDescriptor, Interpret};
use crate::field::FieldId;
use crate::Generation;

/// Result type for layout validation.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// A defect in a field-descriptor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The same field appears twice in one table.
    DuplicateField { generation: Generation, field: FieldId },

    /// A numbered custom field outside its family's range.
    CustomNumberOutOfRange {
        generation: Generation,
        field: FieldId,
        limit: u8,
    },

    /// A duration with nowhere to read its units from.
    DurationWithoutUnits { generation: Generation, field: FieldId },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateField { generation, field } => {
                write!(f, "{generation}: field {} ({field}) is mapped twice", field.kind())
            }
            Self::CustomNumberOutOfRange {
                generation,
                field,
                limit,
            } => write!(
                f,
                "{generation}: {} field {field} is outside 1..={limit}",
                field.kind()
            ),
            Self::DurationWithoutUnits { generation, field } => {
                write!(f, "{generation}: duration {field} has no units field")
            }
        }
    }
}

impl std::error::Error for LayoutError {}

/// Checks every table of `generation` for structural defects.
pub fn validate(generation: Generation) -> LayoutResult<()> {
    check_table(generation, generation.tasks().fields)?;
    check_table(generation, generation.resources().fields)?;
    check_table(generation, generation.assignments().fields)?;
    check_table(generation, generation.properties())?;
    Ok(())
}

fn check_table<F>(generation: Generation, fields: &[FieldDescriptor<F>]) -> LayoutResult<()>
where
    F: Copy + Into<FieldId>,
{
    let mut seen = HashSet::with_capacity(fields.len());
    for descriptor in fields {
        let field: FieldId = descriptor.field.into();
        if !seen.insert(field) {
            return Err(LayoutError::DuplicateField { generation, field });
        }
        if let Some((number, limit)) = field.custom_number() {
            if number == 0 || number > limit {
                return Err(LayoutError::CustomNumberOutOfRange {
                    generation,
                    field,
                    limit,
                });
            }
        }
        if matches!(descriptor.interpret, Interpret::Duration { units: None }) {
            return Err(LayoutError::DurationWithoutUnits { generation, field });
        }
    }
    Ok(())
}
