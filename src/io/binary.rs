//! Little-endian binary encoding of node metadata.
//!
//! Layout:
//!
//! ```text
//! magic   "NMD1"
//! u32     slot count
//! per slot:
//!   u32 + bytes   key (UTF-8)
//!   u16           kind tag, 0xFFFF for an unset slot
//!   payload       bool: u8, int32: i32, uint64: u64, float32: f32,
//!                 string: u32 + bytes, vector3: 3 x f32
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::core::{MetadataEntry, MetadataValue, NodeMetadata, ValueKind, ValueVisitor};
use crate::util::{Error, Result, Vector3};

/// File magic.
pub const MAGIC: [u8; 4] = *b"NMD1";

/// Kind tag written for a slot with no value.
pub const UNSET_TAG: u16 = 0xFFFF;

/// Cap on slots preallocated from an untrusted count.
const MAX_PREALLOC: usize = 1024;

// ============================================================================
// Writing
// ============================================================================

/// Encode `meta` to `writer`.
pub fn write_metadata<W: Write>(writer: &mut W, meta: &NodeMetadata) -> Result<()> {
    let count = u32::try_from(meta.len())
        .map_err(|_| Error::invalid(format!("too many metadata slots: {}", meta.len())))?;

    writer.write_all(&MAGIC)?;
    writer.write_u32::<LittleEndian>(count)?;

    for entry in meta {
        write_str(writer, entry.key())?;
        match entry.value() {
            Some(value) => {
                writer.write_u16::<LittleEndian>(value.kind().as_u16())?;
                value.visit(ValueWriter(&mut *writer))?;
            }
            None => writer.write_u16::<LittleEndian>(UNSET_TAG)?,
        }
    }

    debug!(slots = count, "wrote metadata");
    Ok(())
}

/// Encode `meta` into a new buffer.
pub fn to_bytes(meta: &NodeMetadata) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(encoded_len(meta));
    write_metadata(&mut buf, meta)?;
    Ok(buf)
}

/// Write `meta` to a file, replacing it.
pub fn save(path: impl AsRef<Path>, meta: &NodeMetadata) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_metadata(&mut writer, meta)?;
    writer.flush()?;
    Ok(())
}

/// Exact encoded size of `meta` in bytes.
pub fn encoded_len(meta: &NodeMetadata) -> usize {
    let slots: usize = meta
        .iter()
        .map(|e| 4 + e.key().len() + 2 + e.value().map_or(0, |v| v.visit(EncodedLen)))
        .sum();
    MAGIC.len() + 4 + slots
}

fn write_str<W: Write>(writer: &mut W, s: &str) -> io::Result<()> {
    let len = u32::try_from(s.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "string longer than u32::MAX"))?;
    writer.write_u32::<LittleEndian>(len)?;
    writer.write_all(s.as_bytes())
}

/// Writes one payload in its kind's layout.
struct ValueWriter<'a, W>(&'a mut W);

impl<W: Write> ValueVisitor for ValueWriter<'_, W> {
    type Output = io::Result<()>;

    fn visit_bool(self, value: bool) -> io::Result<()> {
        self.0.write_u8(value as u8)
    }

    fn visit_int32(self, value: i32) -> io::Result<()> {
        self.0.write_i32::<LittleEndian>(value)
    }

    fn visit_uint64(self, value: u64) -> io::Result<()> {
        self.0.write_u64::<LittleEndian>(value)
    }

    fn visit_float32(self, value: f32) -> io::Result<()> {
        self.0.write_f32::<LittleEndian>(value)
    }

    fn visit_string(self, value: &str) -> io::Result<()> {
        write_str(self.0, value)
    }

    fn visit_vector3(self, value: Vector3) -> io::Result<()> {
        self.0.write_f32::<LittleEndian>(value.x)?;
        self.0.write_f32::<LittleEndian>(value.y)?;
        self.0.write_f32::<LittleEndian>(value.z)
    }
}

/// Payload size in bytes.
struct EncodedLen;

impl ValueVisitor for EncodedLen {
    type Output = usize;

    fn visit_bool(self, _: bool) -> usize {
        1
    }
    fn visit_int32(self, _: i32) -> usize {
        4
    }
    fn visit_uint64(self, _: u64) -> usize {
        8
    }
    fn visit_float32(self, _: f32) -> usize {
        4
    }
    fn visit_string(self, value: &str) -> usize {
        4 + value.len()
    }
    fn visit_vector3(self, _: Vector3) -> usize {
        12
    }
}

// ============================================================================
// Reading
// ============================================================================

/// Decode a store from `reader`.
pub fn read_metadata<R: Read>(reader: R) -> Result<NodeMetadata> {
    let mut src = Source { reader, pos: 0 };

    let mut magic = [0u8; 4];
    src.fill(&mut magic)?;
    if magic != MAGIC {
        return Err(Error::invalid(format!("bad magic {magic:02x?}")));
    }

    let count = src.read_u32()? as usize;
    let mut entries = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        entries.push(src.read_entry()?);
    }

    debug!(slots = count, bytes = src.pos, "read metadata");
    Ok(NodeMetadata::from_entries(entries))
}

/// Decode a store from a complete buffer; trailing bytes are an error.
pub fn from_bytes(bytes: &[u8]) -> Result<NodeMetadata> {
    let mut cursor = Cursor::new(bytes);
    let meta = read_metadata(&mut cursor)?;
    let used = cursor.position();
    if used != bytes.len() as u64 {
        return Err(Error::invalid(format!(
            "{} trailing bytes after metadata",
            bytes.len() as u64 - used
        )));
    }
    Ok(meta)
}

/// Read a store from a file.
pub fn load(path: impl AsRef<Path>) -> Result<NodeMetadata> {
    read_metadata(BufReader::new(File::open(path)?))
}

/// Reader that tracks its offset for error reporting.
struct Source<R> {
    reader: R,
    pos: u64,
}

impl<R: Read> Source<R> {
    fn eof(&self, err: io::Error) -> Error {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Error::UnexpectedEof(self.pos)
        } else {
            err.into()
        }
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.reader.read_exact(buf) {
            Ok(()) => {
                self.pos += buf.len() as u64;
                Ok(())
            }
            Err(e) => Err(self.eof(e)),
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        let v = self.reader.read_u8().map_err(|e| self.eof(e))?;
        self.pos += 1;
        Ok(v)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let v = self.reader.read_u16::<LittleEndian>().map_err(|e| self.eof(e))?;
        self.pos += 2;
        Ok(v)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let v = self.reader.read_u32::<LittleEndian>().map_err(|e| self.eof(e))?;
        self.pos += 4;
        Ok(v)
    }

    fn read_i32(&mut self) -> Result<i32> {
        let v = self.reader.read_i32::<LittleEndian>().map_err(|e| self.eof(e))?;
        self.pos += 4;
        Ok(v)
    }

    fn read_u64(&mut self) -> Result<u64> {
        let v = self.reader.read_u64::<LittleEndian>().map_err(|e| self.eof(e))?;
        self.pos += 8;
        Ok(v)
    }

    fn read_f32(&mut self) -> Result<f32> {
        let v = self.reader.read_f32::<LittleEndian>().map_err(|e| self.eof(e))?;
        self.pos += 4;
        Ok(v)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as u64;
        // Grow with the data actually present instead of trusting `len`.
        let mut buf = Vec::new();
        let got = (&mut self.reader).take(len).read_to_end(&mut buf)? as u64;
        self.pos += got;
        if got < len {
            return Err(Error::UnexpectedEof(self.pos));
        }
        Ok(String::from_utf8(buf)?)
    }

    fn read_entry(&mut self) -> Result<MetadataEntry> {
        let key = self.read_string()?;
        let tag = self.read_u16()?;
        if tag == UNSET_TAG {
            return Ok(MetadataEntry::unset(key));
        }

        let value = match ValueKind::try_from(tag)? {
            ValueKind::Bool => MetadataValue::Bool(self.read_u8()? != 0),
            ValueKind::Int32 => MetadataValue::Int32(self.read_i32()?),
            ValueKind::UInt64 => MetadataValue::UInt64(self.read_u64()?),
            ValueKind::Float32 => MetadataValue::Float32(self.read_f32()?),
            ValueKind::StringValue => MetadataValue::String(self.read_string()?),
            ValueKind::Vector3 => {
                let x = self.read_f32()?;
                let y = self.read_f32()?;
                let z = self.read_f32()?;
                MetadataValue::Vector3(Vector3::new(x, y, z))
            }
        };
        Ok(MetadataEntry::new(key, value))
    }
}
