//! On-disk dump writer: one framed file per stream plus a JSON manifest.
//!
//! Frame layout: `u32 LE payload length | JSON payload | u32 LE crc32`.
//!
//! Frames go straight to the file, one `write_all` per frame, so an I/O
//! failure surfaces on the write that caused it. A failed write truncates the
//! stream back to the end of its last complete frame.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dump::DumpWriter;
use crate::errors::{ExportError, ExportResult, WriteError};
use crate::models::{DumpKind, DumpRecord};

pub const MANIFEST_FILE: &str = "manifest.json";

const FRAME_OVERHEAD: usize = 8;

/// Summary written next to the stream files when the dump is finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpManifest {
    pub project_key: String,
    pub streams: BTreeMap<String, u64>,
}

/// An open stream file and the byte length of its complete frames.
struct StreamFile {
    file: File,
    committed: u64,
}

impl StreamFile {
    fn append(&mut self, frame: &[u8]) -> std::io::Result<()> {
        if let Err(err) = self.file.write_all(frame) {
            self.rollback();
            return Err(err);
        }
        self.committed += frame.len() as u64;
        Ok(())
    }

    /// Drop whatever part of a failed frame reached the file.
    fn rollback(&mut self) {
        let restored = self
            .file
            .set_len(self.committed)
            .and_then(|()| self.file.seek(SeekFrom::Start(self.committed)));
        if let Err(err) = restored {
            tracing::warn!(
                committed = self.committed,
                error = %err,
                "could not truncate stream after a failed write"
            );
        }
    }
}

pub struct FileDumpWriter {
    dir: PathBuf,
    streams: HashMap<DumpKind, StreamFile>,
    counts: HashMap<DumpKind, u64>,
}

impl FileDumpWriter {
    /// Create `dir` if needed and write stream files into it.
    pub fn create(dir: impl Into<PathBuf>) -> ExportResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            streams: HashMap::new(),
            counts: HashMap::new(),
        })
    }

    pub fn stream_path(dir: &Path, kind: DumpKind) -> PathBuf {
        dir.join(format!("{}.dat", kind.stream_name()))
    }

    fn stream(&mut self, kind: DumpKind) -> Result<&mut StreamFile, WriteError> {
        match self.streams.entry(kind) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let file = File::create(Self::stream_path(&self.dir, kind))?;
                Ok(entry.insert(StreamFile { file, committed: 0 }))
            }
        }
    }

    /// Write the manifest. Every kind appears in it, with a zero count when
    /// nothing was written.
    pub fn finish(self, project_key: &str) -> ExportResult<DumpManifest> {
        let streams = DumpKind::ALL
            .iter()
            .map(|kind| (kind.stream_name().to_string(), self.written(*kind)))
            .collect();
        let manifest = DumpManifest {
            project_key: project_key.to_string(),
            streams,
        };
        let file = File::create(self.dir.join(MANIFEST_FILE))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &manifest)?;
        out.flush()?;
        Ok(manifest)
    }
}

impl DumpWriter for FileDumpWriter {
    fn write(&mut self, record: DumpRecord) -> Result<(), WriteError> {
        let kind = record.kind();
        let payload = serde_json::to_vec(&record)?;
        let len = u32::try_from(payload.len()).map_err(|_| WriteError::Rejected {
            kind,
            position: self.written(kind) + 1,
        })?;

        let mut frame = Vec::with_capacity(payload.len() + FRAME_OVERHEAD);
        frame.extend_from_slice(&len.to_le_bytes());
        frame.extend_from_slice(&payload);
        frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());

        self.stream(kind)?.append(&frame)?;
        *self.counts.entry(kind).or_insert(0) += 1;
        Ok(())
    }

    fn written(&self, kind: DumpKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Frames read back from one stream file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StreamContents {
    pub records: Vec<serde_json::Value>,
    /// Bytes of an incomplete frame at the end of the file, left by a write
    /// that never finished. Zero for a cleanly written stream.
    pub torn_tail: usize,
}

/// Read back every complete frame of one stream, verifying checksums. A
/// stream that was never written reads as empty.
///
/// An incomplete last frame is not an error: the frames before it are
/// returned and its size is reported in [`StreamContents::torn_tail`]. A
/// complete frame with a bad checksum is [`ExportError::CorruptDump`].
pub fn read_stream(dir: &Path, kind: DumpKind) -> ExportResult<StreamContents> {
    let path = FileDumpWriter::stream_path(dir, kind);
    if !path.exists() {
        return Ok(StreamContents::default());
    }
    let mut bytes = Vec::new();
    File::open(&path)?.read_to_end(&mut bytes)?;

    let mut contents = StreamContents::default();
    let mut rest = bytes.as_slice();
    while !rest.is_empty() {
        let Some((payload, crc, tail)) = split_frame(rest) else {
            contents.torn_tail = rest.len();
            tracing::warn!(
                stream = kind.stream_name(),
                bytes = rest.len(),
                "ignoring incomplete frame at end of stream"
            );
            break;
        };
        if crc32fast::hash(payload) != crc {
            return Err(ExportError::CorruptDump(format!(
                "{kind} stream frame {} has a bad checksum",
                contents.records.len() + 1
            )));
        }
        contents.records.push(serde_json::from_slice(payload)?);
        rest = tail;
    }
    Ok(contents)
}

/// Split one complete frame off the front of `bytes`, or `None` when fewer
/// bytes than the frame needs remain.
fn split_frame(bytes: &[u8]) -> Option<(&[u8], u32, &[u8])> {
    let (len, tail) = split_u32(bytes)?;
    let len = usize::try_from(len).ok()?;
    if tail.len() < len {
        return None;
    }
    let (payload, tail) = tail.split_at(len);
    let (crc, tail) = split_u32(tail)?;
    Some((payload, crc, tail))
}

fn split_u32(bytes: &[u8]) -> Option<(u32, &[u8])> {
    if bytes.len() < 4 {
        return None;
    }
    let (head, tail) = bytes.split_at(4);
    let mut buf = [0u8; 4];
    buf.copy_from_slice(head);
    Some((u32::from_le_bytes(buf), tail))
}
