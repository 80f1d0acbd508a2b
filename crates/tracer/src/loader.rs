//! Parser for the segment-based binary object format.
//!
//! The stream is a sequence of big-endian 16-bit words. A segment starts
//! with a magic word (`0xCADE` for code, `0xDADA` for data; both are written
//! the same way), then a start address, a word count, and that many payload
//! words stored at auto-incrementing addresses. Unrecognized words between
//! segments are skipped one word at a time. A trailing odd byte is dropped.

use std::fs;
use std::path::{Path, PathBuf};

use simulator_core::MachineState;

const CODE_SEGMENT_MAGIC: u16 = 0xCADE;
const DATA_SEGMENT_MAGIC: u16 = 0xDADA;

/// Why an object file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read at all.
    #[error("failed to read object file {path}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The stream ended inside a segment.
    ///
    /// Words loaded before the truncation point stay in memory; no
    /// partial-state guarantee is made.
    #[error("object stream truncated inside a segment at word offset {offset}")]
    Truncated {
        /// Word offset into the stream where data ran out.
        offset: usize,
    },
}

/// Loads one object file into the memory image.
///
/// Multiple files may be loaded in sequence; later segments overwrite
/// earlier ones at overlapping addresses.
///
/// # Errors
///
/// [`LoadError::Io`] when the file cannot be read, [`LoadError::Truncated`]
/// when a segment header promises more words than the stream holds.
pub fn load_object_file(state: &mut MachineState, path: &Path) -> Result<(), LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_object_bytes(state, &bytes)
}

/// Loads an in-memory object stream into the memory image.
///
/// # Errors
///
/// [`LoadError::Truncated`] when a segment header promises more words than
/// the stream holds.
pub fn load_object_bytes(state: &mut MachineState, bytes: &[u8]) -> Result<(), LoadError> {
    let words: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();

    let mut index = 0;
    while index < words.len() {
        match words[index] {
            CODE_SEGMENT_MAGIC | DATA_SEGMENT_MAGIC => {
                index = load_segment(state, &words, index)?;
            }
            _ => index += 1,
        }
    }
    Ok(())
}

/// Parses one segment starting at the magic word and returns the index of
/// the first word after it.
fn load_segment(
    state: &mut MachineState,
    words: &[u16],
    header: usize,
) -> Result<usize, LoadError> {
    let count_index = header + 2;
    if count_index >= words.len() {
        return Err(LoadError::Truncated {
            offset: words.len(),
        });
    }

    let start = words[header + 1];
    let count = words[count_index];
    let payload = count_index + 1;

    let mut addr = start;
    for step in 0..usize::from(count) {
        let Some(&word) = words.get(payload + step) else {
            return Err(LoadError::Truncated {
                offset: payload + step,
            });
        };
        state.write_word(addr, word);
        addr = addr.wrapping_add(1);
    }

    Ok(payload + usize::from(count))
}
