//! DBPF writer: accepts `put(rid, bytes)` and reconstructs a fresh index +
//! header on `commit`.
//!
//! Structurally grounded in the teacher's `builders.rs`: `DbpfWriter` tracks
//! a running end-of-data offset the way `StreamAllocator`/`PdbBuilder`
//! track stream layouts as components are added, and `commit` writes the
//! index before rewriting the header at offset 0 last — the same
//! write-body-then-patch-header-last ordering as `PdbBuilder::commit`.

use std::collections::BTreeMap;
use std::io::{Seek, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::constants;
use crate::cursor::WriteCursor;
use crate::result::{Error, Result};
use crate::rid::Rid;

struct PendingEntry {
    offset: u64,
    raw_len: u32,
    decompressed_size: u32,
}

/// A writer for a fresh DBPF archive. Resources are staged via `put` and
/// the archive is finalized with `commit`.
pub struct DbpfWriter<W> {
    sink: WriteCursor<W>,
    entries: BTreeMap<Rid, PendingEntry>,
    insertion_order: Vec<Rid>,
}

impl<W: Write + Seek> DbpfWriter<W> {
    pub fn new(mut sink: W) -> Result<Self> {
        sink.seek(std::io::SeekFrom::Start(constants::DBPF_HEADER_SIZE))?;
        Ok(Self {
            sink: WriteCursor::new(sink),
            entries: BTreeMap::new(),
            insertion_order: Vec::new(),
        })
    }

    /// Compress `bytes` via deflate and append it, recording a locator for
    /// `rid`. Last write wins on a duplicate `rid`.
    pub fn put(&mut self, rid: Rid, bytes: &[u8]) -> Result<()> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes)?;
        let compressed = encoder.finish()?;

        if compressed.len() as u64 > constants::ENTRY_SIZE_MASK as u64 {
            return Err(Error::RawLengthOverflow(compressed.len() as u64));
        }

        let offset = self.sink.position()?;
        self.sink.put_raw(&compressed)?;

        if self.entries.insert(
            rid,
            PendingEntry {
                offset,
                raw_len: compressed.len() as u32,
                decompressed_size: bytes.len() as u32,
            },
        )
        .is_none()
        {
            self.insertion_order.push(rid);
        }

        tracing::debug!(%rid, raw_len = compressed.len(), "staged resource for write");
        Ok(())
    }

    /// Write the index (no shared fields) and rewrite the header at offset
    /// 0 with the correct, uncorrupted compression major (`0x5A42`).
    pub fn commit(mut self) -> Result<W> {
        let index_pos = self.sink.position()?;

        self.sink.put_u32(0)?; // flags: nothing shared
        for rid in &self.insertion_order {
            let entry = &self.entries[rid];
            self.sink.put_u32(rid.type_id)?;
            self.sink.put_u32(rid.group)?;
            self.sink.put_u32((rid.instance >> 32) as u32)?;
            self.sink.put_u32(rid.instance as u32)?;
            self.sink.put_u32(entry.offset as u32)?;
            self.sink.put_u32(entry.raw_len | constants::ENTRY_SIZE_EXTENDED_COMPRESSION)?;
            self.sink.put_u32(entry.decompressed_size)?;
            self.sink.put_u16(constants::COMPRESSION_DEFLATE)?;
            self.sink.put_u16(1)?;
        }
        let index_end = self.sink.position()?;
        let index_size = (index_end - index_pos) as u32;
        let index_count = self.insertion_order.len() as u32;

        self.sink.seek(0)?;
        self.sink.put_raw(constants::DBPF_MAGIC)?;
        self.sink.put_u32(constants::DBPF_FILE_VERSION_MAJOR)?;
        self.sink.put_u32(constants::DBPF_FILE_VERSION_MINOR)?;
        self.sink.put_u32(0)?; // user version major
        self.sink.put_u32(0)?; // user version minor
        self.sink.put_u32(0)?; // unused
        self.sink.put_u32(0)?; // ctime
        self.sink.put_u32(0)?; // mtime
        self.sink.put_u32(0)?; // unused
        self.sink.put_u32(index_count)?;
        self.sink.put_u32(index_pos as u32)?;
        self.sink.put_u32(index_size)?;
        self.sink.put_raw(&[0u8; 16])?;
        self.sink.put_u32(index_pos as u32)?; // index_pos_high, preferred on read
        self.sink.put_raw(&[0u8; 24])?;

        tracing::debug!(index_count, index_pos, "committed DBPF archive");
        Ok(self.sink.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbpf::DbpfFile;
    use std::io::Cursor as IoCursor;

    #[test]
    fn round_trips_multiple_resources() {
        let mut writer = DbpfWriter::new(IoCursor::new(Vec::new())).unwrap();
        let r1 = Rid::new(7, 42, 0x1111_1111);
        let r2 = Rid::new(7, 43, 0x1111_1111);
        writer.put(r1, b"hello").unwrap();
        writer.put(r2, b"world").unwrap();
        let mut output = writer.commit().unwrap();
        output.set_position(0);

        let mut file = DbpfFile::open(output).unwrap();
        let entries = file.scan_index(None).unwrap();
        let ids: std::collections::HashSet<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, std::collections::HashSet::from([r1, r2]));

        for entry in &entries {
            let content = file.get_content(&entry.locator, entry.decompressed_size).unwrap();
            let expected: &[u8] = if entry.id == r1 { b"hello" } else { b"world" };
            assert_eq!(content, expected);
        }
    }

    #[test]
    fn writer_uses_correct_deflate_compression_major() {
        let mut writer = DbpfWriter::new(IoCursor::new(Vec::new())).unwrap();
        writer.put(Rid::new(1, 1, 1), b"x").unwrap();
        let mut output = writer.commit().unwrap();
        output.set_position(0);
        let mut file = DbpfFile::open(output).unwrap();
        let entries = file.scan_index(None).unwrap();
        assert_eq!(entries[0].locator.compression.0, constants::COMPRESSION_DEFLATE);
        assert_ne!(entries[0].locator.compression.0, 0x54A2);
    }

    #[test]
    fn last_write_wins_on_duplicate_rid() {
        let mut writer = DbpfWriter::new(IoCursor::new(Vec::new())).unwrap();
        let rid = Rid::new(1, 1, 1);
        writer.put(rid, b"first").unwrap();
        writer.put(rid, b"second").unwrap();
        let mut output = writer.commit().unwrap();
        output.set_position(0);
        let mut file = DbpfFile::open(output).unwrap();
        let entries = file.scan_index(None).unwrap();
        assert_eq!(entries.len(), 1);
        let content = file.get_content(&entries[0].locator, entries[0].decompressed_size).unwrap();
        assert_eq!(content, b"second");
    }
}
