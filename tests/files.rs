//! Loading vectors and questions from real files.

use analogy_eval::dataset::{CategoryFilter, load_questions};
use analogy_eval::word2vec::{from_binary_file, write_binary};
use analogy_eval::{Embeddings, Error, LoadOptions, WordVectors, evaluate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::Write;
use tempfile::NamedTempFile;

const VECTORS: &str = "\
athens 1.0 0.0 0.0
greece 1.0 1.0 0.0
berlin 0.0 0.0 1.0
germany 0.0 1.0 1.0
boy 2.0 0.0 0.5
girl 2.0 2.0 0.5
";

const QUESTIONS: &str = "\
// tiny slice of the Google corpus
: capital-common-countries
Athens Greece Berlin Germany
Berlin Germany Athens Greece
: family
boy girl brother sister
: not-in-the-list
boy girl athens greece
";

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn text_vectors_and_questions_end_to_end() {
    let vectors = write_temp(VECTORS);
    let questions = write_temp(QUESTIONS);

    let wv = WordVectors::from_file(vectors.path(), &LoadOptions::default()).unwrap();
    let ds = load_questions(questions.path(), &CategoryFilter::google()).unwrap();
    assert_eq!(ds.len(), 2);

    let mut rng = StdRng::seed_from_u64(5);
    let report = evaluate(&wv, &ds, None, &mut rng).unwrap();

    let capitals = report.category("capital-common-countries").unwrap();
    assert_eq!(capitals.tally.correct, 2);
    assert_eq!(capitals.tally.total, 2);

    let family = report.category("family").unwrap();
    assert_eq!(family.tally.correct, 0);
    assert_eq!(family.tally.answered, 0);

    assert_eq!(report.semantic().total, 3);
    assert_eq!(report.syntactic().total, 0);
}

#[test]
fn binary_round_trip_through_a_file() {
    let text = write_temp(VECTORS);
    let wv = WordVectors::from_file(text.path(), &LoadOptions::default()).unwrap();

    let binary = NamedTempFile::new().unwrap();
    write_binary(File::create(binary.path()).unwrap(), &wv).unwrap();

    let back = from_binary_file(binary.path(), &LoadOptions::default()).unwrap();
    assert_eq!(back.len(), wv.len());
    assert_eq!(back.dims(), 3);
    for (word, vector) in wv.iter() {
        assert_eq!(back.lookup(word), Some(vector));
    }
}

#[test]
fn binary_limit_and_normalize() {
    let text = write_temp(VECTORS);
    let wv = WordVectors::from_file(text.path(), &LoadOptions::default()).unwrap();
    let binary = NamedTempFile::new().unwrap();
    write_binary(File::create(binary.path()).unwrap(), &wv).unwrap();

    let options = LoadOptions {
        limit: Some(2),
        normalize: true,
    };
    let back = from_binary_file(binary.path(), &options).unwrap();
    assert_eq!(back.len(), 2);
    let g = back.lookup("greece").unwrap();
    assert!((g[0] - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.txt");
    assert!(matches!(
        WordVectors::from_file(&path, &LoadOptions::default()),
        Err(Error::Io(_))
    ));
    assert!(matches!(
        load_questions(&path, &CategoryFilter::All),
        Err(Error::Io(_))
    ));
}
