//! Binary serialization of the packed automaton: a gzip-framed,
//! little-endian encoding opened by magic bytes and a version.

use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::constants::{FORMAT_VERSION, MAGIC};
use crate::trie::alphabet::CharMapper;
use crate::types::CharCode;

use super::PackedAutomaton;

/// Errors raised while encoding or decoding the binary automaton
/// format.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The stream does not open with the automaton magic bytes.
    #[error("bad magic bytes {found:02X?}; not a packed pattern automaton")]
    BadMagic {
        /// The four bytes actually read.
        found: [u8; 4],
    },

    /// The stream carries an unsupported format version.
    #[error("unsupported format version {found}, expected {expected}")]
    BadVersion {
        /// The version byte actually read.
        found: u8,
        /// The version this build understands.
        expected: u8,
    },

    /// The tables decode but are structurally inconsistent.
    #[error("corrupt automaton payload: {0}")]
    Corrupt(&'static str),

    /// An underlying I/O failure, including truncated streams.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl PackedAutomaton {
    /// Writes the automaton to `writer`, gzip-compressed at the
    /// optimal level.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), FormatError> {
        let mut w = GzEncoder::new(writer, Compression::best());

        w.write_all(&MAGIC)?;
        w.write_u8(FORMAT_VERSION)?;

        w.write_u32::<LittleEndian>(self.data.len() as u32)?;
        for &entry in &self.data {
            w.write_u32::<LittleEndian>(entry)?;
        }

        w.write_u32::<LittleEndian>(self.bases.len() as u32)?;
        for &base in &self.bases {
            let base = i32::try_from(base)
                .map_err(|_| FormatError::Corrupt("base offset beyond the serialized range"))?;
            w.write_i32::<LittleEndian>(base)?;
        }

        let assignments = self.mapper.assignments();
        w.write_u32::<LittleEndian>(assignments.len() as u32)?;
        for (ch, code) in assignments {
            w.write_u16::<LittleEndian>(ch)?;
            w.write_u32::<LittleEndian>(code)?;
        }
        w.write_u32::<LittleEndian>(self.mapper.alphabet_size())?;

        w.write_u32::<LittleEndian>(self.priorities.len() as u32)?;
        for vector in &self.priorities {
            match vector.as_deref() {
                None => w.write_u8(0)?,
                Some(v) => {
                    let len = u8::try_from(v.len()).map_err(|_| {
                        FormatError::Corrupt("priority vector longer than a length byte")
                    })?;
                    w.write_u8(len)?;
                    w.write_all(v)?;
                }
            }
        }

        w.finish()?;
        Ok(())
    }

    /// Reads an automaton written by [`write_to`](Self::write_to),
    /// validating the magic bytes and version.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, FormatError> {
        let mut r = GzDecoder::new(reader);

        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(FormatError::BadMagic { found: magic });
        }
        let version = r.read_u8()?;
        if version != FORMAT_VERSION {
            return Err(FormatError::BadVersion {
                found: version,
                expected: FORMAT_VERSION,
            });
        }

        let data_len = r.read_u32::<LittleEndian>()? as usize;
        let mut data = Vec::with_capacity(data_len);
        for _ in 0..data_len {
            data.push(r.read_u32::<LittleEndian>()?);
        }

        let base_count = r.read_u32::<LittleEndian>()? as usize;
        let mut bases = Vec::with_capacity(base_count);
        for _ in 0..base_count {
            let base = r.read_i32::<LittleEndian>()?;
            if base < 0 {
                return Err(FormatError::Corrupt("negative base offset"));
            }
            bases.push(base as u32);
        }

        let pair_count = r.read_u32::<LittleEndian>()? as usize;
        let mut pairs: Vec<(CharCode, u32)> = Vec::with_capacity(pair_count);
        for _ in 0..pair_count {
            let ch = r.read_u16::<LittleEndian>()?;
            let code = r.read_u32::<LittleEndian>()?;
            pairs.push((ch, code));
        }
        let alphabet_size = r.read_u32::<LittleEndian>()?;
        if pairs.iter().any(|&(_, code)| code >= alphabet_size) {
            return Err(FormatError::Corrupt("dense index beyond the alphabet size"));
        }
        let mapper = CharMapper::from_assignments(&pairs, alphabet_size);

        let state_count = r.read_u32::<LittleEndian>()? as usize;
        if state_count != base_count {
            return Err(FormatError::Corrupt(
                "priority table and base table disagree on the state count",
            ));
        }
        let mut priorities = Vec::with_capacity(state_count);
        for _ in 0..state_count {
            let len = r.read_u8()? as usize;
            if len == 0 {
                priorities.push(None);
            } else {
                let mut vector = vec![0u8; len];
                r.read_exact(&mut vector)?;
                priorities.push(Some(vector.into_boxed_slice()));
            }
        }

        Ok(PackedAutomaton {
            data,
            bases,
            mapper,
            priorities,
        })
    }

    /// Serializes to an in-memory buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Deserializes from an in-memory buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        Self::read_from(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PackedAutomaton {
        PackedAutomaton::from_patterns_and_exceptions(
            [".hy3p", "hy3ph", "he2n", "hena4", "hen5at", "4m1n", "n2at"],
            ["uni-ver-sity"],
        )
        .unwrap()
    }

    #[test]
    fn round_trip_preserves_every_table() {
        let original = sample();
        let bytes = original.to_bytes().unwrap();
        let decoded = PackedAutomaton::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.data, original.data);
        assert_eq!(decoded.bases, original.bases);
        assert_eq!(decoded.priorities, original.priorities);
        assert_eq!(decoded.alphabet_size(), original.alphabet_size());
        assert_eq!(
            decoded.mapper.assignments(),
            original.mapper.assignments()
        );
    }

    #[test]
    fn payload_is_gzip_framed() {
        let bytes = sample().to_bytes().unwrap();
        // RFC 1952 header
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut raw = Vec::new();
        let mut enc = GzEncoder::new(&mut raw, Compression::best());
        enc.write_all(b"NOPE").unwrap();
        enc.write_all(&[FORMAT_VERSION]).unwrap();
        enc.finish().unwrap();

        match PackedAutomaton::from_bytes(&raw).err() {
            Some(FormatError::BadMagic { found }) => assert_eq!(&found, b"NOPE"),
            other => panic!("expected BadMagic, got {other:?}"),
        }
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut raw = Vec::new();
        let mut enc = GzEncoder::new(&mut raw, Compression::best());
        enc.write_all(&MAGIC).unwrap();
        enc.write_all(&[9]).unwrap();
        enc.finish().unwrap();

        match PackedAutomaton::from_bytes(&raw).err() {
            Some(FormatError::BadVersion { found, expected }) => {
                assert_eq!(found, 9);
                assert_eq!(expected, FORMAT_VERSION);
            }
            other => panic!("expected BadVersion, got {other:?}"),
        }
    }

    #[test]
    fn truncated_stream_surfaces_as_io() {
        let bytes = sample().to_bytes().unwrap();
        let truncated = &bytes[..bytes.len() / 2];
        assert!(matches!(
            PackedAutomaton::from_bytes(truncated),
            Err(FormatError::Io(_))
        ));
    }
}
