//! Block compression used for graphics and arrangement data.
//!
//! A block is a sequence of commands terminated by a `0xFF` byte. Each
//! command starts with a header byte `tttlllll`: `ttt` selects the command
//! and `lllll + 1` is its length (1..=32). Type 7 is an escape: the real
//! type is in bits 4-2 and the length is the low two bits followed by the
//! next byte, plus one (1..=1024). Commands 4-6 then carry a big-endian
//! 16-bit source position into the output already written.
//!
//! | type | command          | operands          | output                              |
//! |------|------------------|-------------------|-------------------------------------|
//! | 0    | raw              | `length` bytes    | the bytes as-is                     |
//! | 1    | byte run         | 1 byte            | the byte `length` times             |
//! | 2    | word run         | 2 bytes           | the pair `length` times             |
//! | 3    | incrementing run | 1 byte            | `b, b+1, ...` wrapping at 256       |
//! | 4    | repeat           | source            | `length` bytes copied from `source` |
//! | 5    | bit-reversed     | source            | as repeat, each byte bit-reversed   |
//! | 6    | reversed copy    | source            | bytes read backward from `source`   |
//!
//! Sizes are not stored, so [`decompress`] runs the stream twice: once to
//! [`measure`] the output, then to [`decode`] into an exactly-sized buffer.
//! Both passes share the same interpreter.

use crate::DecodeError;
use bbg_core::logging::{log, LogCategory, LogLevel};

/// End-of-block marker.
pub const TERMINATOR: u8 = 0xFF;

const ESCAPE: u8 = 7;

const fn build_reversed_bytes() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut x = i as u8;
        x = ((x & 0b1111_0000) >> 4) | ((x & 0b0000_1111) << 4);
        x = ((x & 0b1100_1100) >> 2) | ((x & 0b0011_0011) << 2);
        x = ((x & 0b1010_1010) >> 1) | ((x & 0b0101_0101) << 1);
        table[i] = x;
        i += 1;
    }
    table
}

static REVERSED_BYTES: [u8; 256] = build_reversed_bytes();

/// Reverse the bit order of a byte (`0b1000_0000` <-> `0b0000_0001`).
#[inline]
pub fn reverse_bits(byte: u8) -> u8 {
    REVERSED_BYTES[byte as usize]
}

/// One decoded command. Back-reference variants carry their source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Raw,
    RleByte,
    RleShort,
    Incremental,
    RepeatPrevious { source: usize },
    ReverseBits { source: usize },
    CopyReversed { source: usize },
}

impl Command {
    /// Bytes this command adds to the output for a given length field.
    fn output_len(self, length: usize) -> usize {
        match self {
            Command::RleShort => length * 2,
            _ => length,
        }
    }

    fn source(self) -> Option<usize> {
        match self {
            Command::RepeatPrevious { source }
            | Command::ReverseBits { source }
            | Command::CopyReversed { source } => Some(source),
            _ => None,
        }
    }
}

/// A command header plus the stream position of its first operand byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub command: Command,
    pub length: usize,
    pub operands: usize,
}

fn byte_at(data: &[u8], pos: usize) -> Result<u8, DecodeError> {
    data.get(pos).copied().ok_or(DecodeError::UnexpectedEnd(pos))
}

fn bytes_at(data: &[u8], pos: usize, len: usize) -> Result<&[u8], DecodeError> {
    data.get(pos..pos + len)
        .ok_or(DecodeError::UnexpectedEnd(data.len().min(pos + len)))
}

/// Parse the command header at `pos`. The caller has already checked for
/// the terminator.
pub fn read_header(data: &[u8], pos: usize) -> Result<Header, DecodeError> {
    let byte = byte_at(data, pos)?;
    let mut kind = byte >> 5;
    let mut length = (byte & 0x1F) as usize + 1;
    let mut next = pos + 1;

    if kind == ESCAPE {
        kind = (byte & 0x1C) >> 2;
        length = (((byte & 0x03) as usize) << 8) + byte_at(data, next)? as usize + 1;
        next += 1;
    }

    let mut source = || -> Result<usize, DecodeError> {
        let pair = bytes_at(data, next, 2)?;
        next += 2;
        Ok(((pair[0] as usize) << 8) | pair[1] as usize)
    };

    let command = match kind {
        0 => Command::Raw,
        1 => Command::RleByte,
        2 => Command::RleShort,
        3 => Command::Incremental,
        4 => Command::RepeatPrevious { source: source()? },
        5 => Command::ReverseBits { source: source()? },
        6 => Command::CopyReversed { source: source()? },
        _ => return Err(DecodeError::UnknownCommand { command: kind, byte }),
    };

    Ok(Header {
        command,
        length,
        operands: next,
    })
}

/// Interpret the stream at `start`. With no output buffer only the length
/// is accumulated; with one, bytes are written and every write and
/// back-reference is range checked against it.
fn run(data: &[u8], start: usize, mut out: Option<&mut [u8]>) -> Result<usize, DecodeError> {
    let mut pos = start;
    let mut written = 0usize;

    while byte_at(data, pos)? != TERMINATOR {
        let Header {
            command,
            length,
            operands,
        } = read_header(data, pos)?;
        pos = operands;

        let emitted = command.output_len(length);
        let end = written
            .checked_add(emitted)
            .ok_or(DecodeError::LengthOverflow)?;

        if let Command::CopyReversed { source } = command {
            if length > source + 1 {
                return Err(DecodeError::ReversedSourceUnderflow {
                    source_pos: source,
                    length,
                });
            }
        }

        if let Some(buf) = out.as_deref() {
            let capacity = buf.len();
            if end > capacity {
                return Err(DecodeError::OutputOverflow {
                    position: written,
                    length: emitted,
                    capacity,
                });
            }
            if let Some(source) = command.source() {
                let span = match command {
                    Command::CopyReversed { .. } => 1,
                    _ => length,
                };
                if source + span > capacity {
                    return Err(DecodeError::SourceOutOfRange {
                        source_pos: source,
                        length,
                        capacity,
                    });
                }
            }
        }

        match command {
            Command::Raw => {
                let literal = bytes_at(data, pos, length)?;
                if let Some(buf) = out.as_deref_mut() {
                    buf[written..end].copy_from_slice(literal);
                }
                pos += length;
            }
            Command::RleByte => {
                let value = byte_at(data, pos)?;
                if let Some(buf) = out.as_deref_mut() {
                    buf[written..end].fill(value);
                }
                pos += 1;
            }
            Command::RleShort => {
                let pair = bytes_at(data, pos, 2)?;
                if let Some(buf) = out.as_deref_mut() {
                    for chunk in buf[written..end].chunks_exact_mut(2) {
                        chunk.copy_from_slice(pair);
                    }
                }
                pos += 2;
            }
            Command::Incremental => {
                let seed = byte_at(data, pos)?;
                if let Some(buf) = out.as_deref_mut() {
                    for (i, b) in buf[written..end].iter_mut().enumerate() {
                        *b = seed.wrapping_add(i as u8);
                    }
                }
                pos += 1;
            }
            // Byte-at-a-time so a source overlapping the destination
            // repeats what was just written.
            Command::RepeatPrevious { source } => {
                if let Some(buf) = out.as_deref_mut() {
                    for i in 0..length {
                        buf[written + i] = buf[source + i];
                    }
                }
            }
            Command::ReverseBits { source } => {
                if let Some(buf) = out.as_deref_mut() {
                    for i in 0..length {
                        buf[written + i] = reverse_bits(buf[source + i]);
                    }
                }
            }
            Command::CopyReversed { source } => {
                if let Some(buf) = out.as_deref_mut() {
                    for i in 0..length {
                        buf[written + i] = buf[source - i];
                    }
                }
            }
        }

        written = end;
    }

    Ok(written)
}

/// Size in bytes of the block at `start` once decompressed.
pub fn measure(data: &[u8], start: usize) -> Result<usize, DecodeError> {
    run(data, start, None)
}

/// Expand the block at `start` into exactly `length` bytes.
pub fn decode(data: &[u8], start: usize, length: usize) -> Result<Vec<u8>, DecodeError> {
    let mut output = vec![0u8; length];
    let actual = run(data, start, Some(&mut output))?;
    if actual != length {
        return Err(DecodeError::SizeMismatch {
            expected: length,
            actual,
        });
    }
    Ok(output)
}

/// Measure, then decode, the block at `start`.
pub fn decompress(data: &[u8], start: usize) -> Result<Vec<u8>, DecodeError> {
    let result = measure(data, start).and_then(|size| {
        if size == 0 {
            return Err(DecodeError::EmptyBlock(start));
        }
        log(LogCategory::Codec, LogLevel::Trace, || {
            format!("block at {:#X}: {} byte(s)", start, size)
        });
        decode(data, start, size)
    });

    if let Err(e) = &result {
        log(LogCategory::Codec, LogLevel::Warn, || {
            format!("block at {:#X} failed to decompress: {}", start, e)
        });
    }
    result
}
