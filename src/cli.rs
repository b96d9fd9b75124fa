//! Pieces shared by the command-line tools.

use crate::word_vectors::{LoadOptions, WordVectors};
use crate::word2vec;
use anyhow::Context;
use clap::{Args, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VectorFormat {
    /// One word per line followed by its components (GloVe, word2vec text)
    Text,
    /// word2vec binary
    Binary,
}

/// Where to load the word vectors from.
#[derive(Args, Debug, Clone)]
pub struct VectorArgs {
    #[arg(long, value_name = "FILE", default_value = "vectors.txt")]
    pub vectors: PathBuf,

    #[arg(long, value_enum, default_value_t = VectorFormat::Text)]
    pub format: VectorFormat,

    /// Only keep the first N words of the file
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Scale vectors to unit length when loading
    #[arg(long)]
    pub normalize: bool,
}

impl VectorArgs {
    pub fn load(&self) -> anyhow::Result<WordVectors> {
        let options = LoadOptions {
            limit: self.limit,
            normalize: self.normalize,
        };
        let wv = match self.format {
            VectorFormat::Text => WordVectors::from_file(&self.vectors, &options),
            VectorFormat::Binary => word2vec::from_binary_file(&self.vectors, &options),
        };
        wv.with_context(|| format!("failed to load vectors from {}", self.vectors.display()))
    }
}

/// Log to stderr. `RUST_LOG` wins over `verbose` (0: warn, 1: info, 2+: debug).
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Print a prompt and read one trimmed line; `None` at end of input.
pub fn prompt(message: &str) -> io::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut s = String::new();
    if io::stdin().read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim().to_string()))
}
