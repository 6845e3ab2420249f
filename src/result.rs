use thiserror::Error;

pub type Result<A, E = Error> = std::result::Result<A, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad magic bytes: expected {expected:?}, got {found:?}")]
    BadMagic { expected: &'static [u8], found: Vec<u8> },
    #[error("unsupported version: {0}")]
    UnsupportedVersion(String),
    #[error("read past end of source")]
    Truncated,
    #[error("malformed index: {0}")]
    MalformedIndex(&'static str),
    #[error("unsupported compression major: {0:#06x}")]
    UnsupportedCompression(u16),
    #[error("malformed refpack stream: {0}")]
    BadRefpack(&'static str),
    #[error("resource is deleted")]
    DeletedResource,
    #[error("name hash mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    HashMismatch { stored: u32, computed: u32 },
    #[error("schema size {schema_size} does not match table row size {row_size}")]
    SchemaMismatch { schema_size: u32, row_size: u32 },
    #[error("cross-reference at offset {0} is not aligned to a row boundary")]
    UnalignedReference(u64),
    #[error("cross-reference at offset {0} falls outside any table's row region")]
    OutOfRange(u64),
    #[error("no such column: {0}")]
    NoSuchColumn(String),
    #[error("unknown primitive type code: {0}")]
    UnknownType(u16),
    #[error("invalid resource id string: {0}")]
    InvalidRid(String),
    #[error("raw length {0} does not fit in 31 bits")]
    RawLengthOverflow(u64),
}
