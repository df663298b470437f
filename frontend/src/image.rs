//! Image loading: flat binary ROM files (64 KiB address-space cap) and
//! Motorola S-record files (S19/S28/S37). Grounded in
//! `phosphor-machines::rom_loader::RomLoadError`'s hand-rolled enum +
//! manual `Display` + `From<io::Error>` style.

use std::fmt;
use std::fs;

pub const MAX_IMAGE_LEN: usize = 0x10000;

#[derive(Debug)]
pub enum ImageError {
    Io(std::io::Error),
    TooLarge { len: usize, max: usize },
    MalformedRecord { line: usize, reason: &'static str },
    ChecksumMismatch { line: usize },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::TooLarge { len, max } => {
                write!(f, "image is {len} bytes, exceeds the {max}-byte cap")
            }
            Self::MalformedRecord { line, reason } => {
                write!(f, "line {line}: malformed S-record ({reason})")
            }
            Self::ChecksumMismatch { line } => {
                write!(f, "line {line}: S-record checksum mismatch")
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl From<std::io::Error> for ImageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<hc11_core::error::CoreError> for ImageError {
    fn from(e: hc11_core::error::CoreError) -> Self {
        match e {
            hc11_core::error::CoreError::Io(io) => Self::Io(io),
            hc11_core::error::CoreError::TooLarge { len, max } => Self::TooLarge { len, max },
            hc11_core::error::CoreError::OverlappingRegion { .. } => Self::MalformedRecord {
                line: 0,
                reason: "image region overlaps one already mapped",
            },
        }
    }
}

/// Read a flat binary file, enforcing the 64 KiB address-space cap.
pub fn load_binary(path: &str) -> Result<Vec<u8>, ImageError> {
    let data = fs::read(path)?;
    if data.len() > MAX_IMAGE_LEN {
        return Err(ImageError::TooLarge {
            len: data.len(),
            max: MAX_IMAGE_LEN,
        });
    }
    Ok(data)
}

/// One contiguous data record parsed out of an S-record file.
pub struct SChunk {
    pub addr: u16,
    pub data: Vec<u8>,
}

/// Parse a Motorola S-record (S19/S28/S37) file into its data chunks.
/// Header (`S0`), count (`S5`/`S6`), and termination (`S7`/`S8`/`S9`)
/// records carry no data and are skipped.
pub fn parse_srecord(text: &str) -> Result<Vec<SChunk>, ImageError> {
    let mut chunks = Vec::new();
    for (i, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = i + 1;
        let body = line.strip_prefix('S').ok_or(ImageError::MalformedRecord {
            line: line_no,
            reason: "missing 'S' marker",
        })?;
        let mut chars = body.chars();
        let kind = chars.next().ok_or(ImageError::MalformedRecord {
            line: line_no,
            reason: "missing record type",
        })?;
        if matches!(kind, '0' | '5' | '6' | '7' | '8' | '9') {
            continue;
        }
        let addr_hex_len = match kind {
            '1' => 4,
            '2' => 6,
            '3' => 8,
            _ => {
                return Err(ImageError::MalformedRecord {
                    line: line_no,
                    reason: "unknown record type",
                });
            }
        };

        let decoded = hex_to_bytes(&body[1..]).ok_or(ImageError::MalformedRecord {
            line: line_no,
            reason: "invalid hex digits",
        })?;
        if decoded.is_empty() {
            return Err(ImageError::MalformedRecord {
                line: line_no,
                reason: "empty record body",
            });
        }
        let count = decoded[0] as usize;
        if count + 1 != decoded.len() {
            return Err(ImageError::MalformedRecord {
                line: line_no,
                reason: "count byte doesn't match record length",
            });
        }
        let sum: u32 = decoded.iter().map(|&b| b as u32).sum();
        if sum & 0xFF != 0xFF {
            return Err(ImageError::ChecksumMismatch { line: line_no });
        }

        let addr_bytes = addr_hex_len / 2;
        let addr = decoded[1..1 + addr_bytes]
            .iter()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32);
        let data = decoded[1 + addr_bytes..decoded.len() - 1].to_vec();
        if !data.is_empty() {
            chunks.push(SChunk {
                addr: addr as u16,
                data,
            });
        }
    }
    Ok(chunks)
}

/// Decode a run of ASCII hex digits (even length) into bytes. Used for both
/// S-record bodies and the `-m/--preset-mem` CLI syntax.
pub fn hex_to_bytes(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_s19_data_record() {
        // S1, count=0x12 (2 addr + 15 data + 1 checksum), address 0x0000.
        let line = "S112000000AABBCCDDEEFF001122334455667716";
        let chunks = parse_srecord(line).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].addr, 0x0000);
        assert_eq!(chunks[0].data.len(), 15);
        assert_eq!(chunks[0].data[0], 0x00);
        assert_eq!(chunks[0].data[1], 0xAA);
    }

    #[test]
    fn header_and_termination_records_are_skipped() {
        let text = "S0030000FC\nS9030000FC\n";
        let chunks = parse_srecord(text).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn bad_checksum_is_rejected() {
        // Correct count and data, checksum byte off by one.
        let line = "S1070000AABBCCDDEB";
        assert!(matches!(
            parse_srecord(line),
            Err(ImageError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn hex_to_bytes_round_trips() {
        assert_eq!(hex_to_bytes("CAFE"), Some(vec![0xCA, 0xFE]));
        assert_eq!(hex_to_bytes("C"), None);
        assert_eq!(hex_to_bytes("ZZ"), None);
    }
}
