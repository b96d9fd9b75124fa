//! Analogy question sets in the format of the Google analogy corpus:
//! Efficient Estimation of Word Representations in Vector Space,
//! Tomas Mikolov et al, 2013.
//!
//! ```text
//! // comment
//! : capital-common-countries
//! Athens Greece Baghdad Iraq
//! ```

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

pub const SEMANTIC_CATEGORIES: [&str; 5] = [
    "capital-common-countries",
    "capital-world",
    "currency",
    "city-in-state",
    "family",
];

pub const SYNTACTIC_CATEGORIES: [&str; 9] = [
    "gram1-adjective-to-adverb",
    "gram2-opposite",
    "gram3-comparative",
    "gram4-superlative",
    "gram5-present-participle",
    "gram6-nationality-adjective",
    "gram7-past-tense",
    "gram8-plural",
    "gram9-plural-verbs",
];

const COMMENT: &str = "//";
const HEADER: char = ':';

/// One question: `a` is to `b` as `c` is to `d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogyQuad {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

impl AnalogyQuad {
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        d: impl Into<String>,
    ) -> Self {
        AnalogyQuad {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    pub fn to_lowercase(&self) -> Self {
        AnalogyQuad::new(
            self.a.to_lowercase(),
            self.b.to_lowercase(),
            self.c.to_lowercase(),
            self.d.to_lowercase(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub quads: Vec<AnalogyQuad>,
}

/// Named categories of questions, kept in the order they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    categories: Vec<Category>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// The category called `name`, appended at the end if it is new.
    pub fn category_mut(&mut self, name: &str) -> &mut Category {
        let pos = match self.categories.iter().position(|c| c.name == name) {
            Some(pos) => pos,
            None => {
                self.categories.push(Category {
                    name: name.to_string(),
                    quads: Vec::new(),
                });
                self.categories.len() - 1
            }
        };
        &mut self.categories[pos]
    }

    pub fn push(&mut self, category: &str, quad: AnalogyQuad) {
        self.category_mut(category).quads.push(quad);
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of questions over all categories.
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.quads.len()).sum()
    }
}

/// Which categories of a question file to keep.
#[derive(Debug, Clone)]
pub enum CategoryFilter {
    All,
    Only(HashSet<String>),
}

impl CategoryFilter {
    /// The fourteen categories of the Google analogy corpus.
    pub fn google() -> Self {
        Self::only(SEMANTIC_CATEGORIES.iter().chain(SYNTACTIC_CATEGORIES.iter()))
    }

    pub fn only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        CategoryFilter::Only(names.into_iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn allows(&self, name: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(names) => names.contains(name),
        }
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::google()
    }
}

pub fn load_questions<P: AsRef<Path>>(path: P, filter: &CategoryFilter) -> Result<Dataset> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let dataset = read_questions(BufReader::new(file), filter)?;
    info!(
        "read {} questions in {} categories from {}",
        dataset.question_count(),
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse a question file. Questions outside an allowed category, including
/// any before the first header, are skipped.
pub fn read_questions<R: BufRead>(reader: R, filter: &CategoryFilter) -> Result<Dataset> {
    let mut dataset = Dataset::new();
    let mut current: Option<String> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with(COMMENT) {
            continue;
        }

        if let Some(name) = line.strip_prefix(HEADER) {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::parse(line_no, "category header without a name"));
            }
            if filter.allows(name) {
                dataset.category_mut(name);
                current = Some(name.to_string());
            } else {
                debug!("skipping category {name}");
                current = None;
            }
            continue;
        }

        let Some(category) = current.as_deref() else {
            continue;
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        let &[a, b, c, d] = words.as_slice() else {
            return Err(Error::parse(
                line_no,
                format!("expected 4 words, found {}", words.len()),
            ));
        };
        dataset.push(category, AnalogyQuad::new(a, b, c, d));
    }

    Ok(dataset)
}
