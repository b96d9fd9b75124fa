//! Reader and writer for the word2vec binary format.
//!
//! The file starts with an ASCII header `<vocab> <dims>\n`. Each record is
//! the word, terminated by a space (or NUL), followed by `dims`
//! little-endian `f32` values. The C tool also writes a newline after each
//! record; it is tolerated but not required when reading.

use crate::error::{Error, Result};
use crate::word_vectors::{Embeddings, LoadOptions, TableBuilder, WordVectors};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

const MAX_DIMS: usize = 1 << 20;

pub fn from_binary_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<WordVectors> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let wv = read_binary(BufReader::new(file), options)?;
    info!(
        "loaded {} words with {} dimensions from {}",
        wv.len(),
        wv.dims(),
        path.display()
    );
    Ok(wv)
}

pub fn read_binary<R: BufRead>(mut reader: R, options: &LoadOptions) -> Result<WordVectors> {
    let (vocab_size, dims) = read_header(&mut reader)?;
    debug!("header: {vocab_size} words, {dims} dimensions");

    let to_read = options.limit.map_or(vocab_size, |limit| limit.min(vocab_size));
    if to_read.checked_mul(dims).is_none() {
        return Err(Error::parse(
            1,
            format!("header declares {vocab_size} words of {dims} dimensions, too large"),
        ));
    }
    let mut builder = TableBuilder::with_capacity(options.normalize, to_read, dims);
    let mut raw = vec![0f32; dims];

    for _ in 0..to_read {
        let word = read_word(&mut reader)?;
        reader.read_f32_into::<LittleEndian>(&mut raw)?;
        builder.push(word, raw.iter().map(|&x| f64::from(x)).collect())?;
    }

    builder.finish()
}

fn read_header<R: BufRead>(reader: &mut R) -> Result<(usize, usize)> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let mut parts = line.split_whitespace();

    let (Some(vocab), Some(dims), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(Error::parse(1, format!("expected '<vocab> <dims>', got '{}'", line.trim())));
    };
    let parse = |s: &str| {
        s.parse::<usize>()
            .map_err(|e| Error::parse(1, format!("invalid header value '{s}': {e}")))
    };
    let (vocab, dims) = (parse(vocab)?, parse(dims)?);
    if dims == 0 {
        return Err(Error::parse(1, "header declares zero dimensions"));
    }
    if dims > MAX_DIMS {
        return Err(Error::parse(
            1,
            format!("header declares {dims} dimensions, at most {MAX_DIMS} supported"),
        ));
    }
    Ok((vocab, dims))
}

/// Read bytes up to the next space or NUL, skipping the newline left over
/// from the previous record.
fn read_word<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    loop {
        let byte = match reader.read_u8() {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(Error::Io(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "file ended before all declared records were read",
                )));
            }
            Err(e) => return Err(e.into()),
        };
        match byte {
            b' ' | 0 => break,
            b'\n' | b'\r' if bytes.is_empty() => continue,
            b => bytes.push(b),
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write any table in word2vec binary format. Components are narrowed to `f32`.
pub fn write_binary<W: Write, E: Embeddings>(writer: W, table: &E) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    writeln!(writer, "{} {}", table.len(), table.dims())?;
    for (word, vector) in table.iter() {
        writer.write_all(word.as_bytes())?;
        writer.write_u8(b' ')?;
        for &x in vector {
            writer.write_f32::<LittleEndian>(x as f32)?;
        }
        writer.write_u8(b'\n')?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(out: &mut Vec<u8>, word: &str, values: &[f32], sep: u8) {
        out.extend_from_slice(word.as_bytes());
        out.push(sep);
        for v in values {
            out.write_f32::<LittleEndian>(*v).unwrap();
        }
    }

    #[test]
    fn reads_records_with_and_without_newlines() {
        let mut buf = b"3 2\n".to_vec();
        record(&mut buf, "paris", &[1.0, 0.5], b' ');
        buf.push(b'\n');
        record(&mut buf, "france", &[-2.0, 0.25], b' ');
        record(&mut buf, "rome", &[0.0, 4.0], 0);

        let wv = read_binary(&buf[..], &LoadOptions::default()).unwrap();
        assert_eq!(wv.len(), 3);
        assert_eq!(wv.lookup("paris"), Some(&[1.0, 0.5][..]));
        assert_eq!(wv.lookup("france"), Some(&[-2.0, 0.25][..]));
        assert_eq!(wv.lookup("rome"), Some(&[0.0, 4.0][..]));
    }

    #[test]
    fn stops_at_limit() {
        let mut buf = b"2 1\n".to_vec();
        record(&mut buf, "a", &[1.0], b' ');
        record(&mut buf, "b", &[2.0], b' ');
        let options = LoadOptions {
            limit: Some(1),
            ..Default::default()
        };
        let wv = read_binary(&buf[..], &options).unwrap();
        assert_eq!(wv.len(), 1);
    }

    #[test]
    fn truncated_file_is_an_error() {
        let mut buf = b"2 1\n".to_vec();
        record(&mut buf, "a", &[1.0], b' ');
        assert!(matches!(
            read_binary(&buf[..], &LoadOptions::default()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn bad_header() {
        assert!(matches!(
            read_binary(&b"hello\n"[..], &LoadOptions::default()),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            read_binary(&b"3 0\n"[..], &LoadOptions::default()),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn oversized_header_is_rejected() {
        assert!(matches!(
            read_binary(&b"18446744073709551615 300\n"[..], &LoadOptions::default()),
            Err(Error::Parse { line: 1, .. })
        ));
        assert!(matches!(
            read_binary(&b"2 18446744073709551615\n"[..], &LoadOptions::default()),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn huge_vocabulary_without_records_fails_cleanly() {
        // fits in usize, far too large to reserve up front
        assert!(matches!(
            read_binary(&b"4611686018427387904 1\n"[..], &LoadOptions::default()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn writes_what_it_reads() {
        let wv = WordVectors::from_pairs([("x", vec![0.5, -1.0]), ("y", vec![2.0, 8.0])]).unwrap();
        let mut out = Vec::new();
        write_binary(&mut out, &wv).unwrap();
        assert!(out.starts_with(b"2 2\n"));
        let back = read_binary(&out[..], &LoadOptions::default()).unwrap();
        assert_eq!(back.lookup("y"), Some(&[2.0, 8.0][..]));
    }
}
