//! Schema and table-header records (spec.md §4.4 passes 1–2). Parsed
//! through the cursor's scoped `at`, the same discipline `dbpf.rs` uses for
//! its index: every self-relative offset is resolved the instant it's
//! read, never carried around as a raw delta.

use std::collections::BTreeMap;
use std::io::{Read, Seek};

use crate::cursor::Cursor;
use crate::hash::fnv1_32_name;
use crate::result::{Error, Result};

#[derive(Debug, Clone)]
pub struct Column {
    pub name: Option<Vec<u8>>,
    pub data_type: u16,
    pub flags: u16,
    pub offset: u32,
    pub sub_schema_offset: Option<u64>,
}

impl Column {
    fn read<R: Read + Seek>(c: &mut Cursor<R>) -> Result<Self> {
        let name = c.relstr()?;
        let _name_hash = c.u32()?; // present on the wire, not validated (§4.4)
        let data_type = c.u16()?;
        let flags = c.u16()?;
        let offset = c.u32()?;
        let sub_schema_offset = c.off32()?;
        Ok(Column { name, data_type, flags, offset, sub_schema_offset })
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    pub name: Option<Vec<u8>>,
    pub schema_hash: u32,
    pub size: u32,
    pub columns: Vec<Column>,
}

impl Schema {
    fn read<R: Read + Seek>(c: &mut Cursor<R>) -> Result<Self> {
        let name = c.relstr()?;
        let name_hash = c.u32()?;
        let computed = fnv1_32_name(name.as_deref());
        if computed != name_hash {
            return Err(Error::HashMismatch { stored: name_hash, computed });
        }

        let schema_hash = c.u32()?;
        let size = c.u32()?;
        let column_pos = c.off32()?;
        let num_columns = c.u32()?;

        let columns = match column_pos {
            None if num_columns == 0 => Vec::new(),
            None => return Err(Error::MalformedIndex("schema declares columns but has no column-pos")),
            Some(pos) => {
                c.at(Some(pos), |c| (0..num_columns).map(|_| Column::read(c)).collect::<Result<Vec<_>>>())?
            }
        };

        Ok(Schema { name, schema_hash, size, columns })
    }
}

#[derive(Debug, Clone)]
pub struct TableHeader {
    pub name: Option<Vec<u8>>,
    pub name_hash: u32,
    pub schema_offset: Option<u64>,
    pub data_type: u32,
    pub row_size: u32,
    pub row_pos: u64,
    pub row_count: u32,
}

impl TableHeader {
    fn read<R: Read + Seek>(c: &mut Cursor<R>) -> Result<Self> {
        let name = c.relstr()?;
        let name_hash = c.u32()?;
        let computed = fnv1_32_name(name.as_deref());
        if computed != name_hash {
            return Err(Error::HashMismatch { stored: name_hash, computed });
        }

        let schema_offset = c.off32()?;
        let data_type = c.u32()?;
        let row_size = c.u32()?;
        let row_pos = c.off32()?.ok_or(Error::MalformedIndex("table header has no row data"))?;
        let row_count = c.u32()?;

        Ok(TableHeader { name, name_hash, schema_offset, data_type, row_size, row_pos, row_count })
    }
}

/// Pass 1: read every schema at `schema_pos`, keyed by its own absolute
/// file offset — the address table headers and sub-schema refs point at.
pub fn read_schemas<R: Read + Seek>(
    c: &mut Cursor<R>,
    schema_pos: u64,
    num_schemas: u32,
) -> Result<BTreeMap<u64, Schema>> {
    c.at(Some(schema_pos), |c| {
        let mut schemas = BTreeMap::new();
        for _ in 0..num_schemas {
            let offset = c.tell()?;
            let schema = Schema::read(c)?;
            schemas.insert(offset, schema);
        }
        Ok(schemas)
    })
}

/// Pass 2: read every table header at `table_pos`.
pub fn read_table_headers<R: Read + Seek>(
    c: &mut Cursor<R>,
    table_pos: u64,
    num_tables: u32,
) -> Result<Vec<TableHeader>> {
    c.at(Some(table_pos), |c| (0..num_tables).map(|_| TableHeader::read(c)).collect())
}
