//! Evaluate word embeddings on analogy questions.
//!
//! Load a table of word vectors ([`WordVectors`], from GloVe/word2vec text or
//! the word2vec binary format), load analogy questions ([`dataset`]), then
//! ask [`analogy::solve`] or [`eval::Evaluator`] how well the vectors do.

pub mod analogy;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod similarity;
pub mod word2vec;
pub mod word_vectors;

pub use analogy::{solve, solve_top_n, solve_with};
pub use dataset::{AnalogyQuad, CategoryFilter, Dataset};
pub use error::{Error, Result};
pub use eval::{AccuracyReport, Evaluator, Tally, evaluate};
pub use similarity::{BruteForce, LinearScan, NeighborSearch, cosine_distance, top_n};
pub use word_vectors::{Embeddings, LoadOptions, WordVectors};
