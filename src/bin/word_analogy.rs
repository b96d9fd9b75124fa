use analogy_eval::Embeddings;
use analogy_eval::analogy::solve_top_n;
use analogy_eval::cli::{VectorArgs, init_logging, prompt};
use clap::Parser;

/// Word analogy - KING is to QUEEN as MAN is to ?  Type 'EXIT' to quit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    vectors: VectorArgs,

    /// Number of candidates to show
    #[arg(short = 'n', long, default_value_t = 30)]
    top: usize,

    #[arg(short, long, default_value_t = 1)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let word_vectors = cli.vectors.load()?;

    loop {
        println!("\nWord analogy - KING is to QUEEN as MAN is to ?");
        let Some(s) = prompt("Enter 3 words: ")? else {
            break;
        };
        if s == "EXIT" {
            break;
        }
        let words: Vec<&str> = s.split_whitespace().collect();
        let &[a, b, c] = words.as_slice() else {
            println!("Expected exactly 3 words, but got {}. Try again.", words.len());
            continue;
        };

        let oov_words: Vec<&str> = words
            .iter()
            .filter(|&&w| word_vectors.index_of(w).is_none())
            .copied()
            .collect();

        if !oov_words.is_empty() {
            for word in &oov_words {
                println!("'{word}' is out of vocabulary");
            }
            continue;
        }

        let Some(topn) = solve_top_n(&word_vectors, a, b, c, cli.top) else {
            println!("No analogies");
            continue;
        };

        for (i, (word, distance)) in topn.iter().enumerate() {
            println!("{:3}: {:>8.5} {}", i + 1, distance, word);
        }
    }

    Ok(())
}
