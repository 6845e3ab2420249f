//! DBPF: the outer archive container. Reader side — header parse, lazy
//! index scan, content fetch. The writer lives in `dbpf::writer`.
//!
//! Structurally this plays the role the teacher's `msf.rs` + `dbi.rs` play
//! together (a superblock-style header plus a directory of entries), but
//! DBPF's index is flat rather than block-indexed, so it is read directly
//! off the `Cursor` rather than through a block-mapped stream type.

use std::io::{Read, Seek};

use flate2::read::ZlibDecoder;

use crate::constants;
use crate::cursor::Cursor;
use crate::refpack;
use crate::result::{Error, Result};
use crate::rid::{ResourceFilter, Rid};

/// The fixed 96-byte DBPF header, laid out exactly as spec.md §6.
#[derive(Debug, Clone, Copy)]
pub struct DbpfHeader {
    pub file_version: (u32, u32),
    pub user_version: (u32, u32),
    pub ctime: u32,
    pub mtime: u32,
    pub index_count: u32,
    pub index_pos: u64,
    pub index_size: u32,
}

impl DbpfHeader {
    pub(crate) fn read<R: Read + Seek>(cursor: &mut Cursor<R>) -> Result<Self> {
        cursor.at(Some(0), |c| {
            let magic = c.raw(4)?;
            if magic.as_slice() != constants::DBPF_MAGIC {
                return Err(Error::BadMagic {
                    expected: constants::DBPF_MAGIC,
                    found: magic,
                });
            }

            let file_version = (c.u32()?, c.u32()?);
            if file_version != (constants::DBPF_FILE_VERSION_MAJOR, constants::DBPF_FILE_VERSION_MINOR) {
                return Err(Error::UnsupportedVersion(format!(
                    "DBPF file version {:?}",
                    file_version
                )));
            }

            let user_version = (c.u32()?, c.u32()?);
            let _unused1 = c.u32()?;
            let ctime = c.u32()?;
            let mtime = c.u32()?;
            let _unused2 = c.u32()?;
            let index_count = c.u32()?;
            let index_pos_low = c.u32()?;
            let index_size = c.u32()?;
            c.raw(16)?; // reserved
            let index_pos_high = c.u32()?;
            c.raw(24)?; // reserved

            let index_pos = if index_pos_high != 0 {
                index_pos_high as u64
            } else {
                index_pos_low as u64
            };

            if index_pos == 0 && index_count != 0 {
                return Err(Error::MalformedIndex("entries present but no index position"));
            }

            Ok(DbpfHeader {
                file_version,
                user_version,
                ctime,
                mtime,
                index_count,
                index_pos,
                index_size,
            })
        })
    }
}

/// `(offset, raw_len, compression)` as spec.md §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbpfLocator {
    pub offset: u64,
    pub raw_len: u32,
    pub compression: (u16, u16),
}

impl DbpfLocator {
    pub fn is_deleted(&self) -> bool {
        self.compression.0 == constants::COMPRESSION_DELETED
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: Rid,
    pub locator: DbpfLocator,
    pub decompressed_size: u32,
}

/// A Sims 4 DBPF archive opened for reading.
pub struct DbpfFile<R> {
    cursor: Cursor<R>,
    header: DbpfHeader,
}

impl<R: Read + Seek> DbpfFile<R> {
    pub fn open(reader: R) -> Result<Self> {
        let mut cursor = Cursor::new(reader)?;
        let header = DbpfHeader::read(&mut cursor)?;
        tracing::debug!(index_count = header.index_count, index_pos = header.index_pos, "opened DBPF archive");
        Ok(Self { cursor, header })
    }

    pub fn header(&self) -> &DbpfHeader {
        &self.header
    }

    /// Enumerate live (non-deleted) index entries, optionally restricted by
    /// a filter. Entries are yielded in stored file order.
    pub fn scan_index(&mut self, filter: Option<&ResourceFilter>) -> Result<Vec<IndexEntry>> {
        let mut entries = Vec::with_capacity(self.header.index_count as usize);
        if self.header.index_pos == 0 {
            return Ok(entries);
        }

        let header = self.header;
        self.cursor.at(Some(header.index_pos), |c| {
            let flags = c.u32()?;
            let type_shared = flags & constants::INDEX_FLAG_TYPE_SHARED != 0;
            let group_shared = flags & constants::INDEX_FLAG_GROUP_SHARED != 0;
            let inst_hi_shared = flags & constants::INDEX_FLAG_INSTANCE_HIGH_SHARED != 0;

            let shared_type = if type_shared { Some(c.u32()?) } else { None };
            let shared_group = if group_shared { Some(c.u32()?) } else { None };
            let shared_inst_hi = if inst_hi_shared { Some(c.u32()?) } else { None };

            for _ in 0..header.index_count {
                let entry_type = match shared_type {
                    Some(v) => v,
                    None => c.u32()?,
                };
                let entry_group = match shared_group {
                    Some(v) => v,
                    None => c.u32()?,
                };
                let entry_inst_hi = match shared_inst_hi {
                    Some(v) => v,
                    None => c.u32()?,
                };
                let entry_inst_lo = c.u32()?;
                let entry_pos = c.u32()?;
                let mut entry_size = c.u32()?;
                let entry_size_decompressed = c.u32()?;

                let compression = if entry_size & constants::ENTRY_SIZE_EXTENDED_COMPRESSION != 0 {
                    (c.u16()?, c.u16()?)
                } else {
                    (0, 1)
                };
                entry_size &= constants::ENTRY_SIZE_MASK;

                let instance = ((entry_inst_hi as u64) << 32) | entry_inst_lo as u64;
                let locator = DbpfLocator {
                    offset: entry_pos as u64,
                    raw_len: entry_size,
                    compression,
                };

                if locator.is_deleted() {
                    continue;
                }

                let id = Rid::new(entry_group, instance, entry_type);
                if let Some(filter) = filter {
                    if !filter.matches(&id) {
                        continue;
                    }
                }

                entries.push(IndexEntry {
                    id,
                    locator,
                    decompressed_size: entry_size_decompressed,
                });
            }

            Ok(entries)
        })
    }

    /// Fetch and decompress the content referenced by `locator`.
    pub fn get_content(&mut self, locator: &DbpfLocator, decompressed_size: u32) -> Result<Vec<u8>> {
        if locator.is_deleted() {
            return Err(Error::DeletedResource);
        }

        let bytes = self.cursor.at(Some(locator.offset), |c| c.raw(locator.raw_len as usize))?;

        match locator.compression.0 {
            constants::COMPRESSION_NONE => Ok(bytes),
            constants::COMPRESSION_REFPACK | constants::COMPRESSION_STREAMABLE_REFPACK => {
                refpack::decode(&bytes)
            }
            constants::COMPRESSION_DEFLATE => {
                let mut decoder = ZlibDecoder::new(&bytes[..]);
                let mut out = Vec::with_capacity(decompressed_size as usize);
                decoder.read_to_end(&mut out)?;
                Ok(out)
            }
            other => Err(Error::UnsupportedCompression(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    fn write_header(
        buf: &mut Vec<u8>,
        index_count: u32,
        index_pos_low: u32,
        index_pos_high: u32,
        index_size: u32,
    ) {
        buf.extend_from_slice(b"DBPF");
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes()); // user major
        buf.extend_from_slice(&0u32.to_le_bytes()); // user minor
        buf.extend_from_slice(&0u32.to_le_bytes()); // unused
        buf.extend_from_slice(&0u32.to_le_bytes()); // ctime
        buf.extend_from_slice(&0u32.to_le_bytes()); // mtime
        buf.extend_from_slice(&0u32.to_le_bytes()); // unused
        buf.extend_from_slice(&index_count.to_le_bytes());
        buf.extend_from_slice(&index_pos_low.to_le_bytes());
        buf.extend_from_slice(&index_size.to_le_bytes());
        buf.extend_from_slice(&[0u8; 16]);
        buf.extend_from_slice(&index_pos_high.to_le_bytes());
        buf.extend_from_slice(&[0u8; 24]);
    }

    #[test]
    fn empty_archive_scans_to_nothing() {
        let mut buf = Vec::new();
        write_header(&mut buf, 0, 0, 0, 0);
        let mut file = DbpfFile::open(IoCursor::new(buf)).unwrap();
        assert_eq!(file.scan_index(None).unwrap(), vec![]);
    }

    #[test]
    fn index_pos_high_is_preferred_over_low() {
        let mut buf = Vec::new();
        write_header(&mut buf, 0, 123, 456, 0);
        let file = DbpfFile::open(IoCursor::new(buf)).unwrap();
        assert_eq!(file.header().index_pos, 456);

        let mut buf = Vec::new();
        write_header(&mut buf, 0, 123, 0, 0);
        let file = DbpfFile::open(IoCursor::new(buf)).unwrap();
        assert_eq!(file.header().index_pos, 123);
    }

    #[test]
    fn deleted_entries_are_hidden_from_enumeration() {
        let mut buf = Vec::new();
        // header with index right after (96 bytes)
        let index_pos = 96u32;
        write_header(&mut buf, 1, index_pos, 0, 0);

        // flags = 0 (nothing shared)
        buf.extend_from_slice(&0u32.to_le_bytes());
        // one entry, deleted: compression major 0xFFE0
        buf.extend_from_slice(&0x11111111u32.to_le_bytes()); // type
        buf.extend_from_slice(&7u32.to_le_bytes()); // group
        buf.extend_from_slice(&0u32.to_le_bytes()); // inst hi
        buf.extend_from_slice(&42u32.to_le_bytes()); // inst lo
        buf.extend_from_slice(&96u32.to_le_bytes()); // offset
        buf.extend_from_slice(&(0u32 | constants::ENTRY_SIZE_EXTENDED_COMPRESSION).to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes()); // decompressed size
        buf.extend_from_slice(&constants::COMPRESSION_DELETED.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());

        let mut file = DbpfFile::open(IoCursor::new(buf)).unwrap();
        assert_eq!(file.scan_index(None).unwrap(), vec![]);
    }
}
