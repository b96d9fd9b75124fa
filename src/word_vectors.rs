use crate::error::{Error, Result};
use crate::similarity::dot;
use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{info, warn};

/// Read access to a table of word vectors.
///
/// Entries are addressed by their load index. All vectors share the same
/// dimension; implementors check that when the table is built.
pub trait Embeddings: Sync {
    fn dims(&self) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn index_of(&self, word: &str) -> Option<usize>;

    fn word(&self, idx: usize) -> &str;

    fn vector(&self, idx: usize) -> &[f64];

    /// Squared length of the vector at `idx`. Must be computed with [`dot`]
    /// so a vector's distance to itself is exactly zero.
    fn norm_sq(&self, idx: usize) -> f64 {
        let v = self.vector(idx);
        dot(v, v)
    }

    fn lookup(&self, word: &str) -> Option<&[f64]> {
        self.index_of(word).map(|idx| self.vector(idx))
    }

    /// All `(word, vector)` pairs in load order.
    fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        (0..self.len()).map(move |idx| (self.word(idx), self.vector(idx)))
    }
}

/// Options shared by the text and binary loaders.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Keep only the first `limit` words of the file.
    pub limit: Option<usize>,
    /// Scale every vector to unit length. Zero vectors are left alone.
    pub normalize: bool,
}

// A struct to hold word vectors in a contiguous array for performance.
#[derive(Debug)]
pub struct WordVectors {
    words: Vec<String>,               // vocabulary - index to word map
    word_map: HashMap<String, usize>, // word to index map
    vectors: Vec<f64>,                // A single, flattened Vec of all vector data
    norms_sq: Vec<f64>,               // squared length of each vector
    dims: usize,                      // The dimension of each vector
}

impl Embeddings for WordVectors {
    fn dims(&self) -> usize {
        self.dims
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn index_of(&self, word: &str) -> Option<usize> {
        self.word_map.get(word).copied()
    }

    fn word(&self, idx: usize) -> &str {
        &self.words[idx]
    }

    fn vector(&self, idx: usize) -> &[f64] {
        &self.vectors[idx * self.dims..(idx + 1) * self.dims]
    }

    fn norm_sq(&self, idx: usize) -> f64 {
        self.norms_sq[idx]
    }
}

impl WordVectors {
    /// Build a table from in-memory `(word, vector)` pairs.
    pub fn from_pairs<I, W, V>(pairs: I) -> Result<WordVectors>
    where
        I: IntoIterator<Item = (W, V)>,
        W: Into<String>,
        V: Into<Vec<f64>>,
    {
        let mut builder = TableBuilder::new(false);
        for (word, values) in pairs {
            builder.push(word.into(), values.into())?;
        }
        builder.finish()
    }

    /// Read word vectors from a GloVe or word2vec text file.
    pub fn from_file<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<WordVectors> {
        let path = path.as_ref();
        let file = fs::File::open(path)?;
        let wv = Self::from_reader(BufReader::new(file), options)?;
        info!(
            "loaded {} words with {} dimensions from {}",
            wv.len(),
            wv.dims,
            path.display()
        );
        Ok(wv)
    }

    /// One word per line followed by its components. A leading
    /// `<vocab> <dims>` header line, as written by word2vec, is skipped.
    pub fn from_reader<R: BufRead>(reader: R, options: &LoadOptions) -> Result<WordVectors> {
        let mut builder = TableBuilder::new(options.normalize);
        let mut first = true;

        for (index, line_result) in reader.lines().enumerate() {
            if options.limit.is_some_and(|limit| builder.len() >= limit) {
                break;
            }
            let line = line_result?;
            let line_no = index + 1;
            let mut parts = line.split_whitespace();

            let Some(key) = parts.next() else {
                continue;
            };
            let values: Vec<&str> = parts.collect();

            if first {
                first = false;
                if is_header(key, &values) {
                    continue;
                }
            }

            let values = values
                .iter()
                .map(|s| {
                    s.parse::<f64>().map_err(|e| {
                        Error::parse(line_no, format!("invalid value '{s}' for '{key}': {e}"))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            builder.push(key.to_string(), values)?;
        }

        builder.finish()
    }
}

fn is_header(key: &str, rest: &[&str]) -> bool {
    rest.len() == 1 && key.parse::<usize>().is_ok() && rest[0].parse::<usize>().is_ok()
}

const MAX_RESERVED_VALUES: usize = 1 << 20;

/// Accumulates entries for a [`WordVectors`], checking dimensions as it goes.
pub(crate) struct TableBuilder {
    words: Vec<String>,
    word_map: HashMap<String, usize>,
    vectors: Vec<f64>,
    norms_sq: Vec<f64>,
    dims: Option<usize>,
    normalize: bool,
}

impl TableBuilder {
    pub(crate) fn new(normalize: bool) -> Self {
        TableBuilder {
            words: Vec::new(),
            word_map: HashMap::new(),
            vectors: Vec::new(),
            norms_sq: Vec::new(),
            dims: None,
            normalize,
        }
    }

    /// Reserve room for `words` vectors of `dims` components, up to
    /// [`MAX_RESERVED_VALUES`]; beyond that the buffers grow as entries arrive.
    pub(crate) fn with_capacity(normalize: bool, words: usize, dims: usize) -> Self {
        let words = words.min(MAX_RESERVED_VALUES / dims.max(1));
        let mut builder = Self::new(normalize);
        builder.words.reserve(words);
        builder.word_map.reserve(words);
        builder.vectors.reserve(words * dims);
        builder.norms_sq.reserve(words);
        builder
    }

    pub(crate) fn len(&self) -> usize {
        self.words.len()
    }

    pub(crate) fn push(&mut self, word: String, mut values: Vec<f64>) -> Result<()> {
        match self.dims {
            None if values.is_empty() => return Err(Error::ZeroDimensions(word)),
            None => self.dims = Some(values.len()),
            Some(dims) if dims != values.len() => {
                return Err(Error::DimensionMismatch {
                    word,
                    expected: dims,
                    found: values.len(),
                });
            }
            Some(_) => {}
        }

        if self.word_map.contains_key(&word) {
            warn!("duplicate entry for '{word}', keeping the first vector");
            return Ok(());
        }

        if self.normalize {
            let norm = dot(&values, &values).sqrt();
            if norm > 0.0 {
                values.iter_mut().for_each(|e| *e /= norm);
            }
        }

        self.norms_sq.push(dot(&values, &values));
        self.word_map.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.extend_from_slice(&values);
        Ok(())
    }

    pub(crate) fn finish(self) -> Result<WordVectors> {
        let Some(dims) = self.dims else {
            return Err(Error::EmptyVectors);
        };
        Ok(WordVectors {
            words: self.words,
            word_map: self.word_map,
            vectors: self.vectors,
            norms_sq: self.norms_sq,
            dims,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str, options: LoadOptions) -> Result<WordVectors> {
        WordVectors::from_reader(text.as_bytes(), &options)
    }

    #[test]
    fn reads_glove_text() {
        let wv = load("king 0.5 1.0\nqueen 0.25 -1.5\n\nman 1 2\n", LoadOptions::default())
            .unwrap();
        assert_eq!(wv.len(), 3);
        assert_eq!(wv.dims(), 2);
        assert_eq!(wv.lookup("queen"), Some(&[0.25, -1.5][..]));
        assert_eq!(wv.index_of("man"), Some(2));
        assert_eq!(wv.word(0), "king");
    }

    #[test]
    fn skips_word2vec_header() {
        let wv = load("2 3\na 1 2 3\nb 4 5 6\n", LoadOptions::default()).unwrap();
        assert_eq!(wv.len(), 2);
        assert_eq!(wv.dims(), 3);
        assert!(wv.lookup("2").is_none());
    }

    #[test]
    fn applies_limit() {
        let options = LoadOptions {
            limit: Some(2),
            ..Default::default()
        };
        let wv = load("a 1\nb 2\nc 3\n", options).unwrap();
        assert_eq!(wv.len(), 2);
        assert!(wv.lookup("c").is_none());
    }

    #[test]
    fn normalizes_on_request() {
        let options = LoadOptions {
            normalize: true,
            ..Default::default()
        };
        let wv = load("a 3 4\nz 0 0\n", options).unwrap();
        assert_eq!(wv.lookup("a"), Some(&[0.6, 0.8][..]));
        assert_eq!(wv.lookup("z"), Some(&[0.0, 0.0][..]));
    }

    #[test]
    fn rejects_ragged_vectors() {
        let err = load("a 1 2\nb 1 2 3\n", LoadOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { expected: 2, found: 3, .. }
        ));
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = load("a 1 2\nb 1 x\n", LoadOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            load("\n\n", LoadOptions::default()),
            Err(Error::EmptyVectors)
        ));
        assert!(matches!(
            load("lonely\n", LoadOptions::default()),
            Err(Error::ZeroDimensions(_))
        ));
    }

    #[test]
    fn keeps_first_duplicate() {
        let wv = WordVectors::from_pairs([("a", vec![1.0]), ("a", vec![2.0])]).unwrap();
        assert_eq!(wv.len(), 1);
        assert_eq!(wv.lookup("a"), Some(&[1.0][..]));
    }

    #[test]
    fn caches_squared_norms() {
        let wv = WordVectors::from_pairs([("a", vec![3.0, 4.0])]).unwrap();
        assert_eq!(wv.norm_sq(0), 25.0);
        let pairs: Vec<_> = wv.iter().collect();
        assert_eq!(pairs, vec![("a", &[3.0, 4.0][..])]);
    }
}
