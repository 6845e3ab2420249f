//! The byte cursor: every other component in this crate touches raw bytes
//! only through here. Mirrors the read/seek discipline of the teacher's
//! `MsfStream`, but adds the self-relative-offset and scoped save/restore
//! primitives that a flat, pointer-rich format like SimData needs and that
//! a block-indexed container like MSF never did.

use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::result::{Error, Result};

/// A positionable read cursor over any `Read + Seek` source — an owned
/// in-memory buffer (`io::Cursor<Vec<u8>>`), a borrowed slice wrapped the
/// same way (`io::Cursor<&[u8]>`, see `from_slice`), or a random-access
/// file handle all work, exactly as `original_source`'s `BBase` accepted
/// either bytes or a stream.
pub struct Cursor<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> Cursor<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// `p` may equal `len()` (one-past-end); anything greater is an error.
    pub fn seek(&mut self, p: u64) -> Result<()> {
        if p > self.len {
            return Err(Error::Truncated);
        }
        self.inner.seek(SeekFrom::Start(p))?;
        Ok(())
    }

    /// Advance by `n` bytes, returning them. Fails if fewer than `n` bytes
    /// remain in the source.
    pub fn raw(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        self.inner.read_exact(&mut buf).map_err(|_| Error::Truncated)?;
        Ok(buf)
    }

    pub fn u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf).map_err(|_| Error::Truncated)?;
        Ok(buf[0])
    }

    pub fn i8(&mut self) -> Result<i8> {
        Ok(self.u8()? as i8)
    }

    pub fn u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.inner.read_exact(&mut buf).map_err(|_| Error::Truncated)?;
        Ok(u16::from_le_bytes(buf))
    }

    pub fn i16(&mut self) -> Result<i16> {
        Ok(self.u16()? as i16)
    }

    pub fn u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf).map_err(|_| Error::Truncated)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn i32(&mut self) -> Result<i32> {
        Ok(self.u32()? as i32)
    }

    pub fn u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.inner.read_exact(&mut buf).map_err(|_| Error::Truncated)?;
        Ok(u64::from_le_bytes(buf))
    }

    pub fn i64(&mut self) -> Result<i64> {
        Ok(self.u64()? as i64)
    }

    pub fn f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.u32()?))
    }

    /// Record the current position `p`, read a signed 32-bit offset `r`.
    /// Returns `None` iff `r == -2^31`, else `Some(p + r)`.
    pub fn off32(&mut self) -> Result<Option<u64>> {
        let p = self.tell()?;
        let r = self.i32()?;
        if r == i32::MIN {
            Ok(None)
        } else {
            Ok(Some((p as i64 + r as i64) as u64))
        }
    }

    /// Round the current position up to the next multiple of `n`, a power
    /// of two.
    pub fn align(&mut self, n: u64) -> Result<()> {
        debug_assert!(n != 0 && (n & (n - 1)) == 0, "alignment must be a power of two");
        let p = self.tell()?;
        let aligned = (p + n - 1) & !(n - 1);
        self.seek(aligned)
    }

    /// Read bytes up to and including a NUL terminator; return the bytes
    /// without the terminator. Fails on EOF before a NUL is seen.
    pub fn zstr(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            let b = self.u8()?;
            if b == 0 {
                return Ok(out);
            }
            out.push(b);
        }
    }

    /// Compose `off32`: if `None`, return `None`; otherwise seek to the
    /// absolute offset, read a `zstr`, and restore the original position.
    pub fn relstr(&mut self) -> Result<Option<Vec<u8>>> {
        match self.off32()? {
            None => Ok(None),
            Some(abs) => self.at(Some(abs), |c| c.zstr()).map(Some),
        }
    }

    /// Scoped save/restore: save the current position, optionally seek to
    /// `p`, run `f`, then restore the saved position unconditionally —
    /// including when `f` returns an error. If `p` is `None` this is a pure
    /// save/restore around `f`.
    ///
    /// This is the primitive spec.md's design notes call "central and must
    /// survive errors": restoration happens before the result of `f` is
    /// returned, so no exit path (including `?` inside `f`) skips it.
    pub fn at<F, T>(&mut self, p: Option<u64>, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let saved = self.tell()?;
        if let Some(p) = p {
            self.seek(p)?;
        }
        let result = f(self);
        let _ = self.seek(saved);
        result
    }
}

impl<'a> Cursor<io::Cursor<&'a [u8]>> {
    /// A read cursor over a borrowed byte slice. `&[u8]` alone is `Read`
    /// but not `Seek`; wrapping it in `io::Cursor` supplies the `Seek`
    /// impl this type's `R: Read + Seek` bound requires.
    pub fn from_slice(data: &'a [u8]) -> Result<Self> {
        Cursor::new(io::Cursor::new(data))
    }
}

/// Writer-side counterpart. Mirrors the teacher's `MsfStreamWriter` shape:
/// a thin wrapper tracking the running write position over any
/// `Write + Seek` sink.
pub struct WriteCursor<W> {
    inner: W,
}

impl<W: Write + Seek> WriteCursor<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek(&mut self, p: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(p))?;
        Ok(())
    }

    pub fn put_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    pub fn put_u8(&mut self, v: u8) -> Result<()> {
        self.inner.write_all(&[v])?;
        Ok(())
    }

    pub fn put_u16(&mut self, v: u16) -> Result<()> {
        self.inner.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    pub fn put_u32(&mut self, v: u32) -> Result<()> {
        self.inner.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    pub fn put_u64(&mut self, v: u64) -> Result<()> {
        self.inner.write_all(&v.to_le_bytes())?;
        Ok(())
    }

    /// Write bytes followed by a NUL terminator.
    pub fn put_strz(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        self.inner.write_all(&[0])?;
        Ok(())
    }
}

impl<R: Read> Read for Cursor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor as IoCursor;

    #[test]
    fn seek_one_past_end_is_allowed() {
        let mut c = Cursor::new(IoCursor::new(vec![1, 2, 3])).unwrap();
        c.seek(3).unwrap();
        assert_eq!(c.tell().unwrap(), 3);
    }

    #[test]
    fn seek_past_end_is_an_error() {
        let mut c = Cursor::new(IoCursor::new(vec![1, 2, 3])).unwrap();
        assert!(c.seek(4).is_err());
    }

    #[test]
    fn off32_sentinel_is_none() {
        let mut c = Cursor::new(IoCursor::new(i32::MIN.to_le_bytes().to_vec())).unwrap();
        assert_eq!(c.off32().unwrap(), None);
    }

    #[test]
    fn off32_is_self_relative() {
        // at position 4, reading a delta of 6 should yield absolute 10
        let mut data = vec![0u8; 4];
        data.extend_from_slice(&6i32.to_le_bytes());
        let mut c = Cursor::new(IoCursor::new(data)).unwrap();
        c.seek(4).unwrap();
        assert_eq!(c.off32().unwrap(), Some(10));
    }

    #[test]
    fn at_restores_position_on_success_and_error() {
        let mut c = Cursor::new(IoCursor::new(vec![0u8; 16])).unwrap();
        c.seek(5).unwrap();
        let _ = c.at(Some(10), |cur| {
            assert_eq!(cur.tell().unwrap(), 10);
            cur.u8()?;
            Ok(())
        });
        assert_eq!(c.tell().unwrap(), 5);

        let _: Result<()> = c.at(Some(12), |_| Err(Error::Truncated));
        assert_eq!(c.tell().unwrap(), 5);
    }

    #[test]
    fn zstr_reads_until_nul() {
        let mut c = Cursor::new(IoCursor::new(b"hello\0world".to_vec())).unwrap();
        assert_eq!(c.zstr().unwrap(), b"hello");
        assert_eq!(c.tell().unwrap(), 6);
    }

    #[test]
    fn align_rounds_up_to_power_of_two() {
        let mut c = Cursor::new(IoCursor::new(vec![0u8; 32])).unwrap();
        c.seek(5).unwrap();
        c.align(8).unwrap();
        assert_eq!(c.tell().unwrap(), 8);
        c.align(8).unwrap();
        assert_eq!(c.tell().unwrap(), 8);
    }
}
