//! # Masking File Codec
//!
//! Text encoding of a [`MaskFile`]:
//!
//! ```text
//! 15          <- offset (decimal, first token)
//! 301 87 12   <- one "R G B" line per masked pixel, in pixel order
//! 44 510 9
//! ```
//!
//! The pixel count is not stored; decoding reads triples until the input runs
//! out. One or two leftover values at the end are dropped, as they cannot form
//! a pixel. Tokens may be separated by any whitespace.

use log::{debug, info, warn};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::common::pixels::{MaskFile, MaskTriple, MaskedChannel};
use crate::error::{Error, Result};

/// Render a mask file as text.
pub fn encode(mask_file: &MaskFile) -> String {
    let mut out = format!("{}\n", mask_file.offset);
    out.extend(
        mask_file
            .triples
            .iter()
            .map(|[r, g, b]| format!("{} {} {}\n", r, g, b)),
    );
    out
}

/// Parse mask text.
///
/// # Errors
/// - [`Error::MalformedMaskFile`] if the text is empty, the offset is not a
///   non-negative integer, or a value in the triple stream is not one
///
/// # Example
/// ```
/// use pixmask::masking::codec;
///
/// let mask_file = codec::decode("2\n1 2 3\n4 5 6\n").unwrap();
/// assert_eq!(mask_file.offset, 2);
/// assert_eq!(mask_file.triples, vec![[1, 2, 3], [4, 5, 6]]);
/// ```
pub fn decode(text: &str) -> Result<MaskFile> {
    read_from(text.as_bytes())
}

/// Parse mask text from any buffered reader in a single pass.
pub fn read_from<R: BufRead>(reader: R) -> Result<MaskFile> {
    let mut parser = TripleParser::default();

    for line in reader.lines() {
        let line = line.map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => Error::MalformedMaskFile("not valid UTF-8 text".to_string()),
            _ => Error::Io(e),
        })?;

        for token in line.split_whitespace() {
            parser.push(token)?;
        }
    }

    parser.finish()
}

/// Write mask text to any writer.
pub fn write_to<W: Write>(mut writer: W, mask_file: &MaskFile) -> Result<()> {
    writer.write_all(encode(mask_file).as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read and decode a masking file.
///
/// The file handle is closed when this returns, on success or failure.
pub fn read_mask_file<P: AsRef<Path>>(path: P) -> Result<MaskFile> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mask_file = read_from(BufReader::new(file))?;

    info!(
        "📄 Loaded masking file '{}' (offset {}, {} pixels)",
        path.display(),
        mask_file.offset,
        mask_file.pixel_count()
    );
    Ok(mask_file)
}

/// Encode a mask file and write it to `path`, replacing any existing file.
pub fn write_mask_file<P: AsRef<Path>>(path: P, mask_file: &MaskFile) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_to(BufWriter::new(file), mask_file)?;

    info!(
        "💾 Wrote masking file '{}' (offset {}, {} pixels)",
        path.display(),
        mask_file.offset,
        mask_file.pixel_count()
    );
    Ok(())
}

/// Streaming token parser: offset first, then values grouped into triples.
#[derive(Default)]
struct TripleParser {
    offset: Option<usize>,
    pending: Vec<MaskedChannel>,
    triples: Vec<MaskTriple>,
}

impl TripleParser {
    fn push(&mut self, token: &str) -> Result<()> {
        if self.offset.is_none() {
            let offset = token
                .parse::<usize>()
                .map_err(|_| Error::MalformedMaskFile(format!("invalid offset '{}'", token)))?;
            self.offset = Some(offset);
            return Ok(());
        }

        let value = token.parse::<MaskedChannel>().map_err(|_| {
            Error::MalformedMaskFile(format!(
                "invalid value '{}' in triple {}",
                token,
                self.triples.len()
            ))
        })?;

        self.pending.push(value);
        if self.pending.len() == 3 {
            self.triples.push([self.pending[0], self.pending[1], self.pending[2]]);
            self.pending.clear();
        }
        Ok(())
    }

    fn finish(self) -> Result<MaskFile> {
        let offset = self
            .offset
            .ok_or_else(|| Error::MalformedMaskFile("missing offset".to_string()))?;

        if !self.pending.is_empty() {
            warn!(
                "Discarding {} trailing value(s) that do not form a full triple",
                self.pending.len()
            );
        }

        debug!("Decoded {} triples at offset {}", self.triples.len(), offset);
        Ok(MaskFile::new(offset, self.triples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scenario() {
        let mask_file = decode("2\n1 2 3\n4 5 6\n").unwrap();

        assert_eq!(mask_file.offset, 2);
        assert_eq!(mask_file.triples, vec![[1, 2, 3], [4, 5, 6]]);
    }

    #[test]
    fn test_encode_format() {
        let mask_file = MaskFile::new(15, vec![[301, 87, 12], [44, 510, 9]]);
        assert_eq!(encode(&mask_file), "15\n301 87 12\n44 510 9\n");
    }

    #[test]
    fn test_roundtrip_with_wide_values() {
        let mask_file = MaskFile::new(
            100,
            vec![[510, 0, 256], [255, 255, 255], [0, 0, 0], [300, 1, 499]],
        );

        assert_eq!(decode(&encode(&mask_file)).unwrap(), mask_file);
    }

    #[test]
    fn test_offset_only() {
        let mask_file = decode("7\n").unwrap();
        assert_eq!(mask_file.offset, 7);
        assert!(mask_file.triples.is_empty());
    }

    #[test]
    fn test_trailing_partial_triple_is_dropped() {
        let one_extra = decode("0\n1 2 3\n4\n").unwrap();
        assert_eq!(one_extra.triples, vec![[1, 2, 3]]);

        let two_extra = decode("0\n1 2 3\n4 5").unwrap();
        assert_eq!(two_extra.triples, vec![[1, 2, 3]]);
    }

    #[test]
    fn test_irregular_whitespace() {
        let mask_file = decode("  3\r\n1\t2 3 4\n\n 5   6\r\n").unwrap();

        assert_eq!(mask_file.offset, 3);
        assert_eq!(mask_file.triples, vec![[1, 2, 3], [4, 5, 6]]);
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(decode(""), Err(Error::MalformedMaskFile(_))));
        assert!(matches!(decode("  \n\n"), Err(Error::MalformedMaskFile(_))));
    }

    #[test]
    fn test_bad_offset_is_malformed() {
        assert!(matches!(decode("abc\n1 2 3\n"), Err(Error::MalformedMaskFile(_))));
        assert!(matches!(decode("-4\n1 2 3\n"), Err(Error::MalformedMaskFile(_))));
    }

    #[test]
    fn test_corrupt_triple_stream_is_malformed() {
        assert!(matches!(
            decode("0\n1 2 3\n4 x 6\n"),
            Err(Error::MalformedMaskFile(_))
        ));
        assert!(matches!(decode("0\n1 -2 3\n"), Err(Error::MalformedMaskFile(_))));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("M1.txt");
        let mask_file = MaskFile::new(15, vec![[1, 2, 3], [400, 500, 6]]);

        write_mask_file(&path, &mask_file).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "15\n1 2 3\n400 500 6\n");
        assert_eq!(read_mask_file(&path).unwrap(), mask_file);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_mask_file(dir.path().join("absent.txt")),
            Err(Error::Io(_))
        ));
    }
}
