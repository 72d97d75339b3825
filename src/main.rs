use std::path::PathBuf;

use clap::{Parser, Subcommand};
use matematik_pintar::{Config, Grade, JsonFileStore, Leaderboard, Quiz, QuizError, Services, Topic, logging};

#[derive(Parser, Debug)]
#[command(version, about = "KSSR mathematics quiz in the terminal", long_about = None)]
struct Args {
    /// Directory for the leaderboard and log files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Generative model used for questions and explanations
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a quiz (default)
    Play,
    /// Print the top scores for one grade and topic
    Leaderboard {
        /// School year, 1 to 6
        #[arg(short, long, value_parser = parse_grade)]
        grade: Grade,

        #[arg(short, long, value_enum)]
        topic: Topic,
    },
}

fn parse_grade(value: &str) -> Result<Grade, String> {
    let number: u8 = value.parse().map_err(|_| format!("'{}' is not a number", value))?;
    Grade::new(number).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(model) = args.model {
        config.model = model;
    }

    let _guard = logging::init(&config.log_dir(), &config.rust_log);

    let result = match args.command.unwrap_or(Command::Play) {
        Command::Play => play(&config).await,
        Command::Leaderboard { grade, topic } => {
            print_leaderboard(&config, grade, topic);
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::error!("Quiz stopped: {}", e);
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

async fn play(config: &Config) -> Result<(), QuizError> {
    let services = Services::from_config(config)?;
    Quiz::new(services).run().await
}

fn print_leaderboard(config: &Config, grade: Grade, topic: Topic) {
    let leaderboard = Leaderboard::new(JsonFileStore::in_dir(&config.data_dir));
    let board = leaderboard.top(grade, topic);

    println!("Papan Pendahulu · Tahun {} · {}", grade, topic);
    if board.is_empty() {
        println!("Belum ada rekod.");
        return;
    }

    for (index, record) in board.iter().enumerate() {
        println!(
            "{:2}. {:<24} {:>3}/{:<3} {:>3}%  {}",
            index + 1,
            record.name,
            record.score,
            record.total_questions,
            record.percentage(),
            record.difficulty.label()
        );
    }
}
