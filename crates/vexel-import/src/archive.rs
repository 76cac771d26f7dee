//! Zip container reading and writing.
//!
//! Foreign design exports are ordinary zip archives. Only the subset the
//! importer needs is implemented: end-of-central-directory discovery,
//! central-directory walking, stored and deflate entries, and a
//! stored-entry writer for exports. Zip64 is out of scope.

use crate::error::{ImportError, ImportResult};
use flate2::read::DeflateDecoder;
use flate2::Crc;
use std::io::Read;

const LOCAL_SIG: u32 = 0x0403_4b50;
const CENTRAL_SIG: u32 = 0x0201_4b50;
const EOCD_SIG: u32 = 0x0605_4b50;

/// Fixed part of the end-of-central-directory record; a trailing archive
/// comment may add up to 65535 bytes after it.
const EOCD_LEN: usize = 22;

const METHOD_STORED: u16 = 0;
const METHOD_DEFLATE: u16 = 8;

/// 1980-01-01, the DOS timestamp epoch.
const DOS_EPOCH_DATE: u16 = 0x0021;

/// One archive entry, decompressed.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Path inside the archive, forward slashes.
    pub name: String,
    /// Entry contents.
    pub data: Vec<u8>,
}

/// A parsed zip archive. Entries are decompressed eagerly; directory
/// markers are dropped.
#[derive(Debug, Default)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Parse a zip archive from raw bytes.
    pub fn parse(bytes: &[u8]) -> ImportResult<Self> {
        let eocd = find_eocd(bytes).ok_or_else(|| {
            ImportError::MalformedArchive("no end-of-central-directory record".to_string())
        })?;
        let mut trailer = Cursor::new(bytes, eocd + 10);
        let total_entries = trailer.read_u16()? as usize;
        trailer.skip(4)?; // central directory size
        let directory_offset = trailer.read_u32()? as usize;

        let mut directory = Cursor::new(bytes, directory_offset);
        let mut entries = Vec::with_capacity(total_entries);
        for _ in 0..total_entries {
            if directory.read_u32()? != CENTRAL_SIG {
                return Err(ImportError::MalformedArchive(
                    "bad central directory entry".to_string(),
                ));
            }
            directory.skip(6)?; // versions, flags
            let method = directory.read_u16()?;
            directory.skip(4)?; // modification time and date
            let crc = directory.read_u32()?;
            let compressed_size = directory.read_u32()? as usize;
            let uncompressed_size = directory.read_u32()? as usize;
            let name_len = directory.read_u16()? as usize;
            let extra_len = directory.read_u16()? as usize;
            let comment_len = directory.read_u16()? as usize;
            directory.skip(8)?; // disk number, attributes
            let local_offset = directory.read_u32()? as usize;
            let name = String::from_utf8_lossy(directory.read_bytes(name_len)?).into_owned();
            directory.skip(extra_len + comment_len)?;

            if name.ends_with('/') {
                continue; // directory marker
            }
            let data =
                read_entry_data(bytes, local_offset, method, compressed_size, uncompressed_size)?;
            if crc32(&data) != crc {
                log::warn!("archive entry {name} fails its checksum, keeping the bytes anyway");
            }
            entries.push(ArchiveEntry { name, data });
        }
        Ok(Self { entries })
    }

    /// Look an entry up by its exact path.
    pub fn get(&self, name: &str) -> Option<&ArchiveEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// All file entries, in archive order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build a zip archive of stored (uncompressed) entries with correct CRCs.
pub fn write_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut directory = Vec::new();
    for (name, data) in entries {
        let crc = crc32(data);
        let local_offset = out.len() as u32;

        put_u32(&mut out, LOCAL_SIG);
        put_u16(&mut out, 20); // version needed
        put_u16(&mut out, 0); // flags
        put_u16(&mut out, METHOD_STORED);
        put_u16(&mut out, 0); // modification time
        put_u16(&mut out, DOS_EPOCH_DATE);
        put_u32(&mut out, crc);
        put_u32(&mut out, data.len() as u32);
        put_u32(&mut out, data.len() as u32);
        put_u16(&mut out, name.len() as u16);
        put_u16(&mut out, 0); // extra length
        out.extend_from_slice(name.as_bytes());
        out.extend_from_slice(data);

        put_u32(&mut directory, CENTRAL_SIG);
        put_u16(&mut directory, 20); // version made by
        put_u16(&mut directory, 20); // version needed
        put_u16(&mut directory, 0); // flags
        put_u16(&mut directory, METHOD_STORED);
        put_u16(&mut directory, 0); // modification time
        put_u16(&mut directory, DOS_EPOCH_DATE);
        put_u32(&mut directory, crc);
        put_u32(&mut directory, data.len() as u32);
        put_u32(&mut directory, data.len() as u32);
        put_u16(&mut directory, name.len() as u16);
        put_u16(&mut directory, 0); // extra length
        put_u16(&mut directory, 0); // comment length
        put_u16(&mut directory, 0); // disk number
        put_u16(&mut directory, 0); // internal attributes
        put_u32(&mut directory, 0); // external attributes
        put_u32(&mut directory, local_offset);
        directory.extend_from_slice(name.as_bytes());
    }

    let directory_offset = out.len() as u32;
    out.extend_from_slice(&directory);
    put_u32(&mut out, EOCD_SIG);
    put_u16(&mut out, 0); // disk number
    put_u16(&mut out, 0); // directory disk
    put_u16(&mut out, entries.len() as u16);
    put_u16(&mut out, entries.len() as u16);
    put_u32(&mut out, directory.len() as u32);
    put_u32(&mut out, directory_offset);
    put_u16(&mut out, 0); // comment length
    out
}

fn read_entry_data(
    bytes: &[u8],
    local_offset: usize,
    method: u16,
    compressed_size: usize,
    uncompressed_size: usize,
) -> ImportResult<Vec<u8>> {
    let mut header = Cursor::new(bytes, local_offset);
    if header.read_u32()? != LOCAL_SIG {
        return Err(ImportError::MalformedArchive(
            "bad local file header".to_string(),
        ));
    }
    // Sizes come from the central directory; local ones may be deferred
    // to a data descriptor.
    header.skip(22)?;
    let name_len = header.read_u16()? as usize;
    let extra_len = header.read_u16()? as usize;
    header.skip(name_len + extra_len)?;
    let raw = header.read_bytes(compressed_size)?;

    match method {
        METHOD_STORED => Ok(raw.to_vec()),
        METHOD_DEFLATE => {
            let mut data = Vec::with_capacity(uncompressed_size);
            DeflateDecoder::new(raw)
                .read_to_end(&mut data)
                .map_err(|err| {
                    ImportError::MalformedArchive(format!("deflate stream: {err}"))
                })?;
            Ok(data)
        }
        other => Err(ImportError::MalformedArchive(format!(
            "unsupported compression method {other}"
        ))),
    }
}

/// Scan backwards for the end-of-central-directory signature.
fn find_eocd(bytes: &[u8]) -> Option<usize> {
    if bytes.len() < EOCD_LEN {
        return None;
    }
    let floor = bytes.len().saturating_sub(EOCD_LEN + u16::MAX as usize);
    (floor..=bytes.len() - EOCD_LEN)
        .rev()
        .find(|&pos| bytes[pos..pos + 4] == EOCD_SIG.to_le_bytes())
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}

fn put_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

/// Bounds-checked little-endian reader over the archive bytes.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    fn read_u16(&mut self) -> ImportResult<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> ImportResult<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_bytes(&mut self, len: usize) -> ImportResult<&'a [u8]> {
        if self.pos + len > self.data.len() {
            return Err(ImportError::MalformedArchive(
                "truncated archive".to_string(),
            ));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn skip(&mut self, len: usize) -> ImportResult<()> {
        self.read_bytes(len).map(|_| ())
    }
}
