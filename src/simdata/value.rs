//! The 21-code primitive type table (spec.md §4.4.1), modeled as a single
//! closed tagged enum and dispatched on the tag — the same shape as the
//! teacher's `Integer` dispatch in `lib.rs`, generalized from CodeView leaf
//! tags to SimData's type codes.

use std::io::{Read, Seek};

use crate::constants::*;
use crate::cursor::Cursor;
use crate::hash::fnv1_32;
use crate::result::{Error, Result};
use crate::rid::Rid;

use super::schema::TableHeader;
use super::xref::{self, ObjectRef, Thunk, VectorRef};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Char8(u8),
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    String8(Option<Vec<u8>>),
    HashedString8 { text: Option<Vec<u8>>, hash: u32 },
    Object(Option<Thunk<ObjectRef>>),
    Vector(Option<Thunk<VectorRef>>),
    Float2([f32; 2]),
    Float3([f32; 3]),
    Float4([f32; 4]),
    TableSetReference(u64),
    ResourceKey(Rid),
    LocKey(u32),
}

fn alignment_for(data_type: u16) -> Result<u64> {
    Ok(match data_type {
        SIMDATA_TYPE_BOOL | SIMDATA_TYPE_CHAR8 | SIMDATA_TYPE_INT8 | SIMDATA_TYPE_UINT8 => 1,
        SIMDATA_TYPE_INT16 | SIMDATA_TYPE_UINT16 => 2,
        SIMDATA_TYPE_INT32
        | SIMDATA_TYPE_UINT32
        | SIMDATA_TYPE_FLOAT
        | SIMDATA_TYPE_STRING8
        | SIMDATA_TYPE_HASHEDSTRING8
        | SIMDATA_TYPE_OBJECT
        | SIMDATA_TYPE_VECTOR
        | SIMDATA_TYPE_FLOAT2
        | SIMDATA_TYPE_FLOAT3
        | SIMDATA_TYPE_FLOAT4
        | SIMDATA_TYPE_LOCKEY => 4,
        SIMDATA_TYPE_INT64 | SIMDATA_TYPE_UINT64 | SIMDATA_TYPE_TABLESETREFERENCE | SIMDATA_TYPE_RESOURCEKEY => 8,
        other => return Err(Error::UnknownType(other)),
    })
}

/// Read one value of `data_type` at the cursor's current position. `tables`
/// is the fully-parsed table-header set, needed to resolve OBJECT/VECTOR
/// cross-references as they're encountered.
pub fn read_value<R: Read + Seek>(c: &mut Cursor<R>, data_type: u16, tables: &[TableHeader]) -> Result<Value> {
    c.align(alignment_for(data_type)?)?;
    match data_type {
        SIMDATA_TYPE_BOOL => Ok(Value::Bool(c.u8()? != 0)),
        SIMDATA_TYPE_CHAR8 => Ok(Value::Char8(c.u8()?)),
        SIMDATA_TYPE_INT8 => Ok(Value::Int8(c.i8()?)),
        SIMDATA_TYPE_UINT8 => Ok(Value::UInt8(c.u8()?)),
        SIMDATA_TYPE_INT16 => Ok(Value::Int16(c.i16()?)),
        SIMDATA_TYPE_UINT16 => Ok(Value::UInt16(c.u16()?)),
        SIMDATA_TYPE_INT32 => Ok(Value::Int32(c.i32()?)),
        SIMDATA_TYPE_UINT32 => Ok(Value::UInt32(c.u32()?)),
        SIMDATA_TYPE_INT64 => Ok(Value::Int64(c.i64()?)),
        SIMDATA_TYPE_UINT64 => Ok(Value::UInt64(c.u64()?)),
        SIMDATA_TYPE_FLOAT => Ok(Value::Float(c.f32()?)),
        SIMDATA_TYPE_STRING8 => Ok(Value::String8(c.relstr()?)),
        SIMDATA_TYPE_HASHEDSTRING8 => {
            let text = c.relstr()?;
            let hash = c.u32()?;
            // Unlike schema/table/column names, a HASHEDSTRING8 value's hash
            // is taken over the raw bytes, not lowercased.
            let computed = fnv1_32(text.as_deref().unwrap_or(b""));
            if computed != hash {
                return Err(Error::HashMismatch { stored: hash, computed });
            }
            Ok(Value::HashedString8 { text, hash })
        }
        SIMDATA_TYPE_OBJECT => {
            let target = c.off32()?;
            let thunk = match target {
                None => None,
                Some(p) => Some(xref::resolve_object(tables, p)?),
            };
            Ok(Value::Object(thunk))
        }
        SIMDATA_TYPE_VECTOR => {
            let target = c.off32()?;
            let count = c.u32()?;
            let thunk = match (target, count) {
                (None, 0) => None,
                (None, _) => return Err(Error::MalformedIndex("VECTOR has a null offset but nonzero count")),
                (Some(p), n) => Some(xref::resolve_vector(tables, p, n)?),
            };
            Ok(Value::Vector(thunk))
        }
        SIMDATA_TYPE_FLOAT2 => Ok(Value::Float2([c.f32()?, c.f32()?])),
        SIMDATA_TYPE_FLOAT3 => Ok(Value::Float3([c.f32()?, c.f32()?, c.f32()?])),
        SIMDATA_TYPE_FLOAT4 => Ok(Value::Float4([c.f32()?, c.f32()?, c.f32()?, c.f32()?])),
        SIMDATA_TYPE_TABLESETREFERENCE => Ok(Value::TableSetReference(c.u64()?)),
        SIMDATA_TYPE_RESOURCEKEY => {
            let instance = c.u64()?;
            let type_id = c.u32()?;
            let group = c.u32()?;
            Ok(Value::ResourceKey(Rid::new(group, instance, type_id)))
        }
        SIMDATA_TYPE_LOCKEY => Ok(Value::LocKey(c.u32()?)),
        other => Err(Error::UnknownType(other)),
    }
}
