pub const DBPF_MAGIC: &[u8; 4] = b"DBPF";
pub const SIMDATA_MAGIC: &[u8; 4] = b"DATA";

pub const DBPF_FILE_VERSION_MAJOR: u32 = 2;
pub const DBPF_FILE_VERSION_MINOR: u32 = 1;

pub const DBPF_HEADER_SIZE: u64 = 96;

pub const INDEX_FLAG_TYPE_SHARED: u32 = 1 << 0;
pub const INDEX_FLAG_GROUP_SHARED: u32 = 1 << 1;
pub const INDEX_FLAG_INSTANCE_HIGH_SHARED: u32 = 1 << 2;

pub const ENTRY_SIZE_EXTENDED_COMPRESSION: u32 = 0x8000_0000;
pub const ENTRY_SIZE_MASK: u32 = 0x7FFF_FFFF;

pub const COMPRESSION_NONE: u16 = 0x0000;
pub const COMPRESSION_REFPACK: u16 = 0xFFFF;
pub const COMPRESSION_STREAMABLE_REFPACK: u16 = 0xFFFE;
pub const COMPRESSION_DEFLATE: u16 = 0x5A42;
pub const COMPRESSION_DELETED: u16 = 0xFFE0;

/// Reference only; the STBL reader itself is out of scope.
pub const RESOURCE_TYPE_STBL: u32 = 0x220557DA;

pub const REFPACK_HEADER_BYTE: u8 = 0xFB;

pub const SIMDATA_TYPE_BOOL: u16 = 0;
pub const SIMDATA_TYPE_CHAR8: u16 = 1;
pub const SIMDATA_TYPE_INT8: u16 = 2;
pub const SIMDATA_TYPE_UINT8: u16 = 3;
pub const SIMDATA_TYPE_INT16: u16 = 4;
pub const SIMDATA_TYPE_UINT16: u16 = 5;
pub const SIMDATA_TYPE_INT32: u16 = 6;
pub const SIMDATA_TYPE_UINT32: u16 = 7;
pub const SIMDATA_TYPE_INT64: u16 = 8;
pub const SIMDATA_TYPE_UINT64: u16 = 9;
pub const SIMDATA_TYPE_FLOAT: u16 = 10;
pub const SIMDATA_TYPE_STRING8: u16 = 11;
pub const SIMDATA_TYPE_HASHEDSTRING8: u16 = 12;
pub const SIMDATA_TYPE_OBJECT: u16 = 13;
pub const SIMDATA_TYPE_VECTOR: u16 = 14;
pub const SIMDATA_TYPE_FLOAT2: u16 = 15;
pub const SIMDATA_TYPE_FLOAT3: u16 = 16;
pub const SIMDATA_TYPE_FLOAT4: u16 = 17;
pub const SIMDATA_TYPE_TABLESETREFERENCE: u16 = 18;
pub const SIMDATA_TYPE_RESOURCEKEY: u16 = 19;
pub const SIMDATA_TYPE_LOCKEY: u16 = 20;
pub const SIMDATA_TYPE_RESERVED: u16 = 21;
