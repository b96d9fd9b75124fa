use analogy_eval::cli::{VectorArgs, init_logging};
use analogy_eval::dataset::{self, CategoryFilter};
use analogy_eval::eval::{AccuracyReport, Evaluator, Tally};
use anyhow::Context;
use chrono::Local;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::info;

/// Test word vectors on analogy questions like the ones in the Google analogy corpus
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    vectors: VectorArgs,

    /// Question file with ": category" headers and one 4-word question per line
    #[arg(long, value_name = "FILE", default_value = "DATA/question-data/questions-words.txt")]
    questions: PathBuf,

    /// Category to evaluate, may be repeated (default: the 14 Google categories)
    #[arg(long = "category", value_name = "NAME")]
    categories: Vec<String>,

    /// Evaluate all categories in the question file
    #[arg(long, conflicts_with = "categories")]
    all_categories: bool,

    /// Score each category on N questions drawn at random
    #[arg(long, value_name = "N")]
    sample: Option<usize>,

    /// Seed for sampling, 0 picks one from the clock
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(short, long, default_value_t = 1)]
    verbose: u8,
}

/// Configuration parameters, built from command-line arguments.
#[derive(Debug)]
struct Config {
    vectors: VectorArgs,
    questions: PathBuf,
    filter: CategoryFilter,
    sample_size: Option<usize>,
    seed: u64,
}

impl Config {
    fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let filter = if cli.all_categories {
            CategoryFilter::All
        } else if cli.categories.is_empty() {
            CategoryFilter::google()
        } else {
            CategoryFilter::only(&cli.categories)
        };
        let seed = if cli.seed == 0 {
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)?
                .as_secs()
        } else {
            cli.seed
        };
        Ok(Config {
            vectors: cli.vectors,
            questions: cli.questions,
            filter,
            sample_size: cli.sample,
            seed,
        })
    }
}

fn percent(tally: &Tally) -> f64 {
    100.0 * tally.accuracy().unwrap_or(0.0)
}

fn print_group(label: &str, tally: &Tally) {
    if tally.total == 0 {
        return;
    }
    println!(
        "{label} Accuracy: {:4.2}% ({}/{})",
        percent(tally),
        tally.correct,
        tally.total
    );
    println!(
        "{label} Questions answered/total: {:4.2}% ({}/{})",
        100.0 * tally.coverage().unwrap_or(0.0),
        tally.answered,
        tally.total
    );
}

fn print_report(report: &AccuracyReport, config: &Config) {
    let time_str = Local::now().format("%x - %I:%M.%S%p");
    println!("\nANALOGY TESTS {time_str}");
    match config.sample_size {
        Some(n) => println!("{n} random questions per category, seed {}", config.seed),
        None => println!("all questions"),
    }

    for score in report.categories() {
        println!(
            "{:<30} Accuracy: {:6.2}% ({}/{})",
            score.name,
            percent(&score.tally),
            score.tally.correct,
            score.tally.total
        );
    }

    println!();
    print_group("SEMANTIC", &report.semantic());
    print_group("SYNTACTIC", &report.syntactic());
    match report.accuracy() {
        Some(_) => print_group("OVERALL", &report.total()),
        None => println!("No questions were evaluated."),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::from_cli(cli)?;

    let word_vectors = config.vectors.load()?;
    let dataset = dataset::load_questions(&config.questions, &config.filter).with_context(|| {
        format!("failed to read questions from {}", config.questions.display())
    })?;

    info!("Using random seed {}", config.seed);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let report = Evaluator::new(&word_vectors).evaluate(&dataset, config.sample_size, &mut rng)?;

    print_report(&report, &config);
    Ok(())
}
