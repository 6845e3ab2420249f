//! SimData: the self-describing, pointer-rich typed-table format embedded
//! inside DBPF resources (spec.md §4.4). Parse is the three passes the
//! spec lays out — schemas, then table headers, then row data — mirroring
//! the way `dbpf.rs` separates header parse from index scan from content
//! fetch, just with one extra stage: SimData's directory points at another
//! directory (schemas) as well as at data (tables).

mod schema;
mod value;
mod xref;

pub use schema::{Column, Schema, TableHeader};
pub use value::Value;
pub use xref::{ObjectRef, Thunk, VectorRef};

use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Seek};

use crate::constants;
use crate::cursor::Cursor;
use crate::result::{Error, Result};

/// One decoded row. Schema-less tables hold a single primitive value per
/// row; schema-bound tables hold one value per column, in schema order.
#[derive(Debug, Clone)]
pub enum Row {
    Primitive(Value),
    Record(Vec<Value>),
}

#[derive(Debug, Clone)]
pub struct Table {
    pub header: TableHeader,
    pub rows: Vec<Row>,
}

/// Borrowing, by-name view over a schema-bound row (spec.md §4.5).
pub struct RowView<'a> {
    schema: &'a Schema,
    values: &'a [Value],
}

impl<'a> RowView<'a> {
    pub fn get(&self, name: &str) -> Result<&'a Value> {
        let index = column_index(self.schema, name)?;
        Ok(&self.values[index])
    }

    /// Column names in schema order.
    pub fn columns(&self) -> impl Iterator<Item = &'a str> {
        self.schema.columns.iter().map(|c| decode_name(c.name.as_deref()))
    }
}

impl std::fmt::Debug for RowView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("RowView");
        for (column, value) in self.schema.columns.iter().zip(self.values) {
            debug.field(decode_name(column.name.as_deref()), value);
        }
        debug.finish()
    }
}

/// Mutable counterpart of `RowView`; writes validate the column name but
/// not the value's type (spec.md §4.5).
pub struct RowViewMut<'a> {
    schema: &'a Schema,
    values: &'a mut [Value],
}

impl<'a> RowViewMut<'a> {
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let index = column_index(self.schema, name)?;
        self.values[index] = value;
        Ok(())
    }
}

fn column_index(schema: &Schema, name: &str) -> Result<usize> {
    schema
        .columns
        .iter()
        .position(|c| c.name.as_deref() == Some(name.as_bytes()))
        .ok_or_else(|| Error::NoSuchColumn(name.to_string()))
}

fn decode_name(name: Option<&[u8]>) -> &str {
    name.and_then(|b| std::str::from_utf8(b).ok()).unwrap_or("")
}

/// A parsed SimData resource. Immutable in shape after construction — no
/// table, schema, or row is ever added or removed — but individual column
/// values may still be rewritten in place through `row_mut`.
pub struct SimDataDocument {
    pub version: u32,
    pub schemas: BTreeMap<u64, Schema>,
    pub tables: Vec<Table>,
    content_index: HashMap<String, usize>,
    /// Non-fatal anomalies recorded during decode (spec.md §7): currently
    /// only named tables whose `row_count != 1`, which are excluded from
    /// `content` but still appear in `tables`.
    pub errors: Vec<String>,
}

impl SimDataDocument {
    pub fn parse<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut c = Cursor::new(reader)?;

        let magic = c.raw(4)?;
        if magic.as_slice() != constants::SIMDATA_MAGIC {
            return Err(Error::BadMagic { expected: constants::SIMDATA_MAGIC, found: magic });
        }
        let version = c.u32()?;
        let table_pos = c.off32()?.ok_or(Error::MalformedIndex("SimData has no table-headers area"))?;
        let num_tables = c.i32()?.max(0) as u32;
        let schema_pos = c.off32()?.ok_or(Error::MalformedIndex("SimData has no schemas area"))?;
        let num_schemas = c.i32()?.max(0) as u32;

        let schemas = schema::read_schemas(&mut c, schema_pos, num_schemas)?;
        let headers = schema::read_table_headers(&mut c, table_pos, num_tables)?;

        for header in &headers {
            if let Some(schema_offset) = header.schema_offset {
                let bound_schema = schemas
                    .get(&schema_offset)
                    .ok_or(Error::MalformedIndex("table references an unknown schema offset"))?;
                if bound_schema.size != header.row_size {
                    return Err(Error::SchemaMismatch { schema_size: bound_schema.size, row_size: header.row_size });
                }
            }
        }

        let mut tables = Vec::with_capacity(headers.len());
        for header in &headers {
            let bound_schema = header.schema_offset.and_then(|off| schemas.get(&off));
            let rows = Self::read_rows(&mut c, header, bound_schema, &headers)?;
            tables.push(Table { header: header.clone(), rows });
        }

        let mut content_index = HashMap::new();
        let mut errors = Vec::new();
        for (index, table) in tables.iter().enumerate() {
            let Some(name) = table.header.name.as_ref().filter(|n| !n.is_empty()) else { continue };
            if table.header.row_count == 1 {
                content_index.insert(String::from_utf8_lossy(name).into_owned(), index);
            } else {
                errors.push(format!(
                    "table {:?} has row_count {} (expected 1 for a named table); excluded from content",
                    String::from_utf8_lossy(name),
                    table.header.row_count
                ));
            }
        }

        tracing::debug!(num_tables, num_schemas, errors = errors.len(), "parsed SimData document");
        Ok(SimDataDocument { version, schemas, tables, content_index, errors })
    }

    fn read_rows<R: Read + Seek>(
        c: &mut Cursor<R>,
        header: &TableHeader,
        schema: Option<&Schema>,
        tables: &[TableHeader],
    ) -> Result<Vec<Row>> {
        let mut rows = Vec::with_capacity(header.row_count as usize);
        for i in 0..header.row_count as u64 {
            let row_start = header.row_pos + header.row_size as u64 * i;
            match schema {
                None => {
                    let value =
                        c.at(Some(row_start), |c| value::read_value(c, header.data_type as u16, tables))?;
                    rows.push(Row::Primitive(value));
                }
                Some(schema) => {
                    let mut values = Vec::with_capacity(schema.columns.len());
                    for column in &schema.columns {
                        let value = c.at(Some(row_start + column.offset as u64), |c| {
                            value::read_value(c, column.data_type, tables)
                        })?;
                        values.push(value);
                    }
                    rows.push(Row::Record(values));
                }
            }
        }
        Ok(rows)
    }

    pub fn table(&self, index: usize) -> &Table {
        &self.tables[index]
    }

    pub fn row(&self, table_index: usize, row_index: usize) -> &Row {
        &self.tables[table_index].rows[row_index]
    }

    /// A by-name view over a schema-bound row; `None` for schema-less
    /// tables or out-of-range indices.
    pub fn row_view(&self, table_index: usize, row_index: usize) -> Option<RowView<'_>> {
        let table = self.tables.get(table_index)?;
        let schema = table.header.schema_offset.and_then(|off| self.schemas.get(&off))?;
        match table.rows.get(row_index)? {
            Row::Record(values) => Some(RowView { schema, values }),
            Row::Primitive(_) => None,
        }
    }

    pub fn row_view_mut(&mut self, table_index: usize, row_index: usize) -> Option<RowViewMut<'_>> {
        let schema_offset = self.tables.get(table_index)?.header.schema_offset?;
        let schema = self.schemas.get(&schema_offset)?;
        match self.tables.get_mut(table_index)?.rows.get_mut(row_index)? {
            Row::Record(values) => Some(RowViewMut { schema, values }),
            Row::Primitive(_) => None,
        }
    }

    /// The sole row of every named table with `row_count == 1` (spec.md
    /// §4.4), keyed by the table's name.
    pub fn content(&self, name: &str) -> Option<RowView<'_>> {
        let &table_index = self.content_index.get(name)?;
        self.row_view(table_index, 0)
    }

    pub fn content_names(&self) -> impl Iterator<Item = &str> {
        self.content_index.keys().map(|s| s.as_str())
    }
}
