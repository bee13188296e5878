//! View and table metadata records.
//!
//! Only identity, names and column definitions are decoded. The styling
//! bytes that fill the rest of a view record are passed through raw.

use scalar::{get_i16, get_i32, get_u8, get_utf16, strip_ampersands, ScalarResult};

/// Column text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            32 => Self::Left,
            33 => Self::Center,
            _ => Self::Right,
        }
    }
}

/// A saved view.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewDefinition {
    pub id: i32,
    pub name: Option<String>,
    /// The whole record, styling bytes included.
    pub raw: Vec<u8>,
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnDefinition {
    /// Task or resource field code, depending on the table.
    pub field_code: i16,
    pub width: u8,
    pub title: Option<String>,
    pub align_title: Alignment,
    pub align_data: Alignment,
}

/// A table: an ordered column list over tasks or resources.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableDefinition {
    pub id: i32,
    pub name: Option<String>,
    pub resource: bool,
    pub columns: Vec<ColumnDefinition>,
}

/// Where view records keep their identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewLayout {
    pub directory: &'static str,
    pub width: usize,
    pub id: usize,
    pub name: usize,
}

impl ViewLayout {
    /// Decodes a view record.
    pub fn decode(&self, record: &[u8]) -> ScalarResult<ViewDefinition> {
        Ok(ViewDefinition {
            id: get_i32(record, self.id)?,
            name: Some(get_utf16(record, self.name)?).filter(|n| !n.is_empty()),
            raw: record.to_vec(),
        })
    }
}

/// Where table records keep their identity and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableLayout {
    pub directory: &'static str,
    pub width: usize,
    pub id: usize,
    pub name: usize,
    /// Fixed-record pointer to the table's extended block.
    pub extended: usize,
    /// Offset in the extended block of the pointer to the column block.
    pub columns: usize,
    /// Offset of the column count (stored minus one) in the column block.
    pub column_count: usize,
    pub first_column: usize,
    pub column_stride: usize,
}

impl TableLayout {
    /// Decodes a table record without its columns.
    pub fn decode(&self, record: &[u8]) -> ScalarResult<TableDefinition> {
        let name = get_utf16(record, self.name)?;
        Ok(TableDefinition {
            id: get_i32(record, self.id)?,
            name: Some(strip_ampersands(&name)).filter(|n| !n.is_empty()),
            resource: false,
            columns: Vec::new(),
        })
    }

    /// Decodes a column block into `table`.
    ///
    /// A table lists resource fields when its first column's code is zero.
    /// Columns that run past the block are dropped.
    pub fn decode_columns(&self, block: &[u8], table: &mut TableDefinition) {
        let count = get_i16(block, self.column_count)
            .ok()
            .and_then(|c| usize::try_from(i32::from(c) + 1).ok())
            .unwrap_or(0);
        for index in 0..count {
            let offset = self.first_column + self.column_stride * index;
            let Ok(column) = decode_column(block, offset) else {
                break;
            };
            if index == 0 {
                table.resource = column.field_code == 0;
            }
            table.columns.push(column);
        }
    }
}

fn decode_column(block: &[u8], offset: usize) -> ScalarResult<ColumnDefinition> {
    let title_at = usize::try_from(get_i16(block, offset + 6)?).unwrap_or(0);
    let title = if title_at == 0 {
        None
    } else {
        Some(get_utf16(block, title_at)?).filter(|t| !t.is_empty())
    };
    Ok(ColumnDefinition {
        field_code: get_i16(block, offset)?,
        width: get_u8(block, offset + 4)?,
        title,
        align_title: Alignment::from_code(get_u8(block, offset + 8)?),
        align_data: Alignment::from_code(get_u8(block, offset + 10)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLES: TableLayout = TableLayout {
        directory: "CTable",
        width: 126,
        id: 0,
        name: 4,
        extended: 122,
        columns: 8,
        column_count: 4,
        first_column: 8,
        column_stride: 12,
    };

    fn utf16(text: &str) -> Vec<u8> {
        let mut out: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        out.extend_from_slice(&[0, 0]);
        out
    }

    fn column(code: i16, width: u8, title_at: i16, align: u8) -> Vec<u8> {
        let mut out = vec![0u8; 12];
        out[0..2].copy_from_slice(&code.to_le_bytes());
        out[4] = width;
        out[6..8].copy_from_slice(&title_at.to_le_bytes());
        out[8] = align;
        out[10] = 32;
        out
    }

    #[test]
    fn alignment_codes() {
        assert_eq!(Alignment::from_code(32), Alignment::Left);
        assert_eq!(Alignment::from_code(33), Alignment::Center);
        assert_eq!(Alignment::from_code(0), Alignment::Right);
    }

    #[test]
    fn table_name_drops_ampersands() {
        let mut record = vec![0u8; 126];
        record[0..4].copy_from_slice(&7i32.to_le_bytes());
        let name = utf16("&Entry");
        record[4..4 + name.len()].copy_from_slice(&name);
        let table = TABLES.decode(&record).unwrap();
        assert_eq!(table.id, 7);
        assert_eq!(table.name.as_deref(), Some("Entry"));
    }

    #[test]
    fn columns_with_titles() {
        let mut block = vec![0u8; 8];
        block[4..6].copy_from_slice(&1i16.to_le_bytes());
        block.extend(column(0, 10, 0, 33));
        let title_at = i16::try_from(block.len() + 12).unwrap();
        block.extend(column(5, 20, title_at, 0));
        block.extend(utf16("Cost"));

        let mut table = TABLES.decode(&vec![0u8; 126]).unwrap();
        TABLES.decode_columns(&block, &mut table);
        assert!(table.resource);
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].align_title, Alignment::Center);
        assert_eq!(table.columns[0].align_data, Alignment::Left);
        assert_eq!(table.columns[1].field_code, 5);
        assert_eq!(table.columns[1].title.as_deref(), Some("Cost"));
    }

    #[test]
    fn truncated_columns_are_dropped() {
        let mut block = vec![0u8; 8];
        block[4..6].copy_from_slice(&4i16.to_le_bytes());
        block.extend(column(3, 10, 0, 32));
        let mut table = TABLES.decode(&vec![0u8; 126]).unwrap();
        TABLES.decode_columns(&block, &mut table);
        assert_eq!(table.columns.len(), 1);
        assert!(!table.resource);
    }

    #[test]
    fn view_keeps_raw_bytes() {
        let layout = ViewLayout {
            directory: "CV_iew",
            width: 138,
            id: 0,
            name: 4,
        };
        let mut record = vec![0xEEu8; 138];
        record[0..4].copy_from_slice(&3i32.to_le_bytes());
        let name = utf16("Gantt");
        record[4..4 + name.len()].copy_from_slice(&name);
        let view = layout.decode(&record).unwrap();
        assert_eq!(view.id, 3);
        assert_eq!(view.name.as_deref(), Some("Gantt"));
        assert_eq!(view.raw.len(), 138);
    }
}
