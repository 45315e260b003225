use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use lib_puzzle::search::GeneratorConfig;
use lib_puzzle::word::Word;
use lib_puzzle::{Puzzle, PuzzleGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "puzzle-cli", about = "Generate constraint-based word puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a batch of puzzles and write them to a CSV file.
    Generate {
        #[arg(short = 'n', long = "count", default_value_t = 10)]
        count: usize,
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
        #[arg(long = "wordlist")]
        wordlist: PathBuf,
        #[arg(long = "frequency")]
        frequency: Option<PathBuf>,
        #[arg(long = "curated-size", default_value_t = 3000)]
        curated_size: usize,
        #[arg(long = "max-attempts", default_value_t = 500)]
        max_attempts: usize,
        #[arg(long = "full-list")]
        full_list: bool,
        #[arg(long = "seed")]
        seed: Option<u64>,
    },
    /// Generate and print a single puzzle.
    Show {
        #[arg(long = "wordlist")]
        wordlist: PathBuf,
        #[arg(long = "frequency")]
        frequency: Option<PathBuf>,
        #[arg(long = "answer")]
        answer: Option<String>,
        #[arg(long = "full-list")]
        full_list: bool,
        #[arg(long = "seed")]
        seed: Option<u64>,
    },
}

#[derive(Serialize)]
struct PuzzleRow {
    puzzle_id: usize,
    answer: String,
    guesses_json: String,
    valid_answers_json: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Command::Generate { count, output, wordlist, frequency, curated_size, max_attempts, full_list, seed } => {
            run_generate(count, &output, &wordlist, frequency.as_deref(), curated_size, max_attempts, full_list, seed)?;
        }
        Command::Show { wordlist, frequency, answer, full_list, seed } => {
            run_show(&wordlist, frequency.as_deref(), answer.as_deref(), full_list, seed)?;
        }
    }

    log::info!("Finished in {:.3}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn build_generator(
    wordlist: &std::path::Path,
    frequency: Option<&std::path::Path>,
    curated_size: usize,
    use_curated: bool,
    rng: &mut StdRng,
) -> Result<PuzzleGenerator> {
    let mut config = GeneratorConfig::new(wordlist.to_path_buf());
    config.frequency_path = frequency.map(|p| p.to_path_buf());
    config.use_curated = use_curated;
    config.curated_size = curated_size;

    PuzzleGenerator::new(&config, rng).context("failed to build puzzle generator")
}

fn run_generate(
    count: usize,
    output: &std::path::Path,
    wordlist: &std::path::Path,
    frequency: Option<&std::path::Path>,
    curated_size: usize,
    max_attempts: usize,
    full_list: bool,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let generator = build_generator(wordlist, frequency, curated_size, !full_list, &mut rng)?;

    let mut writer = csv::Writer::from_path(output).context("failed to open output CSV")?;
    let mut unique_answers = std::collections::HashSet::new();

    for puzzle_id in 0..count {
        let puzzle = generator.generate_puzzle(None, Some(max_attempts), &mut rng)?;
        unique_answers.insert(puzzle.answer);

        writer.serialize(to_row(puzzle_id, &puzzle)?)?;

        if puzzle_id % 50 == 0 {
            println!("Generated {}/{count} puzzles...", puzzle_id + 1);
        }
    }

    writer.flush()?;
    println!("Wrote {count} puzzles to {output:?} ({} unique answers)", unique_answers.len());

    Ok(())
}

fn run_show(
    wordlist: &std::path::Path,
    frequency: Option<&std::path::Path>,
    answer: Option<&str>,
    full_list: bool,
    seed: Option<u64>,
) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let generator = build_generator(wordlist, frequency, 3000, !full_list, &mut rng)?;

    let answer = answer.map(|text| Word::new(text).ok_or_else(|| color_eyre::eyre::eyre!("'{text}' is not a valid five-letter word"))).transpose()?;

    let puzzle = generator.generate_puzzle(answer, Some(500), &mut rng)?;
    print_puzzle(&puzzle);

    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn to_row(puzzle_id: usize, puzzle: &Puzzle) -> Result<PuzzleRow> {
    Ok(PuzzleRow {
        puzzle_id,
        answer: puzzle.answer.to_string(),
        guesses_json: serde_json::to_string(&puzzle.guesses)?,
        valid_answers_json: serde_json::to_string(&puzzle.valid_answers)?,
    })
}

fn print_puzzle(puzzle: &Puzzle) {
    println!("Answer: {}", puzzle.answer);
    for guess in &puzzle.guesses {
        print!("  {}: ", guess.word);
        for tile in &guess.constraints {
            print!("{:?} ", tile.tile_type);
        }
        println!();
    }
    println!(
        "{} candidate(s) remaining: {}",
        puzzle.candidates_remaining,
        puzzle.valid_answers.iter().map(|w| w.to_string()).collect::<Vec<_>>().join(", ")
    );
}
