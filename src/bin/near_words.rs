use analogy_eval::Error;
use analogy_eval::cli::{VectorArgs, init_logging, prompt};
use analogy_eval::similarity::top_n;
use clap::Parser;

/// Rank the words nearest to a word by cosine distance. Type 'EXIT' to quit.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    vectors: VectorArgs,

    /// Number of words to show
    #[arg(short = 'n', long, default_value_t = 30)]
    top: usize,

    #[arg(short, long, default_value_t = 1)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let word_vectors = cli.vectors.load()?;

    println!("Near Words Tool - Type 'EXIT' to quit\n");
    loop {
        println!("\nRanking nearest words to a word.");
        let Some(s) = prompt("Enter a word: ")? else {
            break;
        };
        if s == "EXIT" {
            println!("Goodbye!");
            break;
        }
        let words: Vec<&str> = s.split_whitespace().collect();
        let &[word] = words.as_slice() else {
            println!("Expected exactly 1 word, but got {}. Try again.", words.len());
            continue;
        };

        let ranked = match top_n(&word_vectors, word, cli.top) {
            Ok(ranked) => ranked,
            Err(e @ Error::WordNotFound(_)) => {
                println!("{e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        println!("\nNearest words to '{word}':");
        println!("{:>4} {:>10} Word", "Rank", "Distance");
        println!("{}", "-".repeat(30));

        for (i, (w, distance)) in ranked.iter().enumerate() {
            println!("{:4}: {:10.6} {}", i + 1, distance, w);
        }
    }

    Ok(())
}
