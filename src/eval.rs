//! Analogy accuracy over a [`Dataset`], per category and overall.

use crate::analogy::solve_with;
use crate::dataset::{AnalogyQuad, Category, Dataset};
use crate::error::{Error, Result};
use crate::similarity::{BruteForce, NeighborSearch};
use crate::word_vectors::Embeddings;
use rand::Rng;
use rand::seq::index;
use std::ops::AddAssign;
use tracing::debug;

/// Question counts for one category or a group of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    /// Questions where every query word was in vocabulary and some answer came back.
    pub answered: usize,
    pub total: usize,
}

impl Tally {
    fn record(&mut self, guess: Option<&str>, expected: &str) {
        self.total += 1;
        if let Some(guess) = guess {
            self.answered += 1;
            if guess == expected {
                self.correct += 1;
            }
        }
    }

    /// `correct / total`, `None` when nothing was asked.
    pub fn accuracy(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct as f64 / self.total as f64)
    }

    /// `answered / total`, `None` when nothing was asked.
    pub fn coverage(&self) -> Option<f64> {
        (self.total > 0).then(|| self.answered as f64 / self.total as f64)
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Tally) {
        self.correct += other.correct;
        self.answered += other.answered;
        self.total += other.total;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScore {
    pub name: String,
    pub tally: Tally,
}

impl CategoryScore {
    /// Never empty: categories without questions are left out of a report.
    pub fn accuracy(&self) -> f64 {
        self.tally.correct as f64 / self.tally.total as f64
    }
}

/// Categories of the Google corpus named `gram*` test syntax, the rest semantics.
pub fn is_syntactic(category: &str) -> bool {
    category.starts_with("gram")
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccuracyReport {
    categories: Vec<CategoryScore>,
    total: Tally,
}

impl AccuracyReport {
    fn push(&mut self, name: &str, tally: Tally) {
        self.total += tally;
        self.categories.push(CategoryScore {
            name: name.to_string(),
            tally,
        });
    }

    /// Per-category scores in dataset order.
    pub fn categories(&self) -> &[CategoryScore] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn total(&self) -> Tally {
        self.total
    }

    /// Cumulative accuracy, `None` for an empty report.
    pub fn accuracy(&self) -> Option<f64> {
        self.total.accuracy()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn semantic(&self) -> Tally {
        self.sum_where(|name| !is_syntactic(name))
    }

    pub fn syntactic(&self) -> Tally {
        self.sum_where(is_syntactic)
    }

    fn sum_where(&self, keep: impl Fn(&str) -> bool) -> Tally {
        let mut sum = Tally::default();
        for score in self.categories.iter().filter(|c| keep(&c.name)) {
            sum += score.tally;
        }
        sum
    }
}

/// Runs the questions of a dataset against one embedding table.
pub struct Evaluator<'a, E, S = BruteForce> {
    table: &'a E,
    search: S,
}

impl<'a, E: Embeddings> Evaluator<'a, E> {
    pub fn new(table: &'a E) -> Self {
        Evaluator {
            table,
            search: BruteForce,
        }
    }
}

impl<'a, E: Embeddings, S: NeighborSearch> Evaluator<'a, E, S> {
    pub fn with_search<T: NeighborSearch>(self, search: T) -> Evaluator<'a, E, T> {
        Evaluator {
            table: self.table,
            search,
        }
    }

    /// Score every category in dataset order.
    ///
    /// With `sample_size`, each category is scored on that many questions
    /// drawn without replacement; a category too small to supply them is an
    /// error, an empty one included. Questions with no answer count as
    /// wrong. Without sampling, categories without any questions are left out.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        dataset: &Dataset,
        sample_size: Option<usize>,
        rng: &mut R,
    ) -> Result<AccuracyReport> {
        let mut report = AccuracyReport::default();

        for category in dataset.categories() {
            if category.quads.is_empty() && sample_size.is_none() {
                debug!(category = %category.name, "no questions, skipped");
                continue;
            }
            let tally = self.score_category(category, sample_size, rng)?;
            debug!(
                category = %category.name,
                correct = tally.correct,
                answered = tally.answered,
                total = tally.total,
                "scored"
            );
            report.push(&category.name, tally);
        }

        Ok(report)
    }

    pub fn score_category<R: Rng + ?Sized>(
        &self,
        category: &Category,
        sample_size: Option<usize>,
        rng: &mut R,
    ) -> Result<Tally> {
        let mut tally = Tally::default();
        for quad in select(category, sample_size, rng)? {
            let quad = quad.to_lowercase();
            let guess = self.answer(&quad);
            tally.record(guess.as_deref(), &quad.d);
        }
        Ok(tally)
    }

    fn answer(&self, quad: &AnalogyQuad) -> Option<String> {
        solve_with(&self.search, self.table, &quad.a, &quad.b, &quad.c)
    }
}

/// Score `dataset` against `table` with the default search.
pub fn evaluate<E: Embeddings, R: Rng + ?Sized>(
    table: &E,
    dataset: &Dataset,
    sample_size: Option<usize>,
    rng: &mut R,
) -> Result<AccuracyReport> {
    Evaluator::new(table).evaluate(dataset, sample_size, rng)
}

fn select<'c, R: Rng + ?Sized>(
    category: &'c Category,
    sample_size: Option<usize>,
    rng: &mut R,
) -> Result<Vec<&'c AnalogyQuad>> {
    let quads = &category.quads;
    match sample_size {
        None => Ok(quads.iter().collect()),
        Some(0) => Err(Error::InvalidSampleSize),
        Some(k) if k > quads.len() => Err(Error::InsufficientPopulation {
            category: category.name.clone(),
            requested: k,
            available: quads.len(),
        }),
        Some(k) => Ok(index::sample(rng, quads.len(), k)
            .into_iter()
            .map(|i| &quads[i])
            .collect()),
    }
}
