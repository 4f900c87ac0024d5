//! The `.takbin` record-stream format, all integers little-endian:
//! an 8-byte magic token, a u32 channel count, a u32 record-count hint
//! (advisory only, never trusted for iteration bounds), then packed
//! fixed-size records of float32s.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tch::{Kind, Tensor};

use crate::{
    board_floats, Record, TakbinError, BOARD_N, PLACE_POS_LEN, PLACE_TYPE_LEN, SLIDE_DIR_LEN,
    SLIDE_LEN_LEN, SLIDE_PICKUP_LEN, SLIDE_FROM_LEN,
};

pub const MAGIC: &[u8; 8] = b"TAKDATA1";

/// Streams records out of one `.takbin` file. The header is validated on
/// open; the channel count it carries fixes the record size for the whole
/// stream. Iteration is lazy and finite, ends on a clean EOF at a record
/// boundary, and is restartable only by reopening the file.
pub struct TakbinReader {
    file: BufReader<File>,
    channels: u32,
    record_count_hint: u32,
}

impl TakbinReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TakbinError> {
        let path = path.as_ref();
        let mut file = BufReader::new(File::open(path)?);
        let (channels, record_count_hint) = read_header(&mut file)?;
        debug!(
            "opened {}: {} channels, hint {}",
            path.display(),
            channels,
            record_count_hint
        );
        Ok(Self {
            file,
            channels,
            record_count_hint,
        })
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// The header's record-count field. Advisory only: files in the wild
    /// carry arbitrary or zero values here, so iteration is bounded by EOF
    /// alone.
    pub fn record_count_hint(&self) -> u32 {
        self.record_count_hint
    }

    /// Reads one record, or `None` on a clean EOF at a record boundary.
    /// A nonzero short read anywhere inside the record is `Truncated`.
    fn read_record(&mut self) -> Result<Option<Record>, TakbinError> {
        let board = match read_floats_or_eof(&mut self.file, board_floats(self.channels))? {
            Some(b) => b,
            None => return Ok(None),
        };

        let place_pos = read_floats(&mut self.file, PLACE_POS_LEN)?;
        let place_type = read_floats(&mut self.file, PLACE_TYPE_LEN)?;
        let slide_from = read_floats(&mut self.file, SLIDE_FROM_LEN)?;
        let slide_dir = read_floats(&mut self.file, SLIDE_DIR_LEN)?;
        let slide_pickup = read_floats(&mut self.file, SLIDE_PICKUP_LEN)?;
        let slide_len = read_floats(&mut self.file, SLIDE_LEN_LEN)?;
        let outcome = read_floats(&mut self.file, 1)?[0];

        let board = Tensor::from_slice(&board)
            .view([self.channels as i64, BOARD_N as i64, BOARD_N as i64])
            .to_kind(Kind::Float);

        Ok(Some(Record {
            board,
            place_pos,
            place_type,
            slide_from,
            slide_dir,
            slide_pickup,
            slide_len,
            outcome,
        }))
    }
}

impl Iterator for TakbinReader {
    type Item = Result<Record, TakbinError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

fn read_header<R: Read>(r: &mut R) -> Result<(u32, u32), TakbinError> {
    let mut magic = [0u8; 8];
    read_exact_or_truncated(r, &mut magic)?;
    if &magic != MAGIC {
        return Err(TakbinError::BadMagic(magic));
    }
    let mut word = [0u8; 4];
    read_exact_or_truncated(r, &mut word)?;
    let channels = u32::from_le_bytes(word);
    read_exact_or_truncated(r, &mut word)?;
    let hint = u32::from_le_bytes(word);
    Ok((channels, hint))
}

/// Fills `buf` completely or reports how short the file came up.
fn read_exact_or_truncated<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<(), TakbinError> {
    let mut off = 0usize;
    while off < buf.len() {
        match r.read(&mut buf[off..])? {
            0 => {
                return Err(TakbinError::Truncated {
                    expected: buf.len(),
                    got: off,
                })
            }
            n => off += n,
        }
    }
    Ok(())
}

fn read_floats<R: Read>(r: &mut R, n: usize) -> Result<Vec<f32>, TakbinError> {
    let mut buf = vec![0u8; n * 4];
    read_exact_or_truncated(r, &mut buf)?;
    Ok(decode_floats(&buf))
}

/// Like `read_floats`, but a zero-byte read up front is a clean EOF, not an
/// error. Only valid at a record boundary.
fn read_floats_or_eof<R: Read>(r: &mut R, n: usize) -> Result<Option<Vec<f32>>, TakbinError> {
    let mut buf = vec![0u8; n * 4];
    let mut off = 0usize;
    while off < buf.len() {
        match r.read(&mut buf[off..])? {
            0 if off == 0 => return Ok(None),
            0 => {
                return Err(TakbinError::Truncated {
                    expected: buf.len(),
                    got: off,
                })
            }
            read => off += read,
        }
    }
    Ok(Some(decode_floats(&buf)))
}

fn decode_floats(buf: &[u8]) -> Vec<f32> {
    buf.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Writes the file header. The record-count field is a placeholder, not
/// authoritative, so it is always written as 0.
pub fn write_header<W: Write>(w: &mut W, channels: u32) -> Result<(), TakbinError> {
    w.write_all(MAGIC)?;
    w.write_all(&channels.to_le_bytes())?;
    w.write_all(&0u32.to_le_bytes())?;
    Ok(())
}

pub fn write_record<W: Write>(w: &mut W, rec: &Record) -> Result<(), TakbinError> {
    let board: Vec<f32> = Vec::try_from(rec.board.reshape(-1))?;
    write_floats(w, &board)?;
    write_floats(w, &rec.place_pos)?;
    write_floats(w, &rec.place_type)?;
    write_floats(w, &rec.slide_from)?;
    write_floats(w, &rec.slide_dir)?;
    write_floats(w, &rec.slide_pickup)?;
    write_floats(w, &rec.slide_len)?;
    write_floats(w, &[rec.outcome])?;
    Ok(())
}

fn write_floats<W: Write>(w: &mut W, floats: &[f32]) -> Result<(), TakbinError> {
    for &v in floats {
        w.write_all(&v.to_le_bytes())?;
    }
    Ok(())
}

/// Joins several `.takbin` files behind a single header. All inputs must
/// agree on channel count; bodies are appended verbatim.
pub fn concat_files(inputs: &[PathBuf], out: &Path) -> Result<(), TakbinError> {
    let mut channels: Option<u32> = None;
    let mut writer = BufWriter::new(File::create(out)?);

    for path in inputs {
        let mut file = BufReader::new(File::open(path)?);
        let (ch, _hint) = read_header(&mut file)?;
        match channels {
            None => {
                channels = Some(ch);
                write_header(&mut writer, ch)?;
            }
            Some(expected) if ch != expected => {
                return Err(TakbinError::ChannelMismatch {
                    path: path.clone(),
                    found: ch,
                    expected,
                });
            }
            Some(_) => {}
        }
        std::io::copy(&mut file, &mut writer)?;
    }

    writer.flush()?;
    info!("concatenated {} files into {}", inputs.len(), out.display());
    Ok(())
}
