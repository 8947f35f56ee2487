use std::fmt;
use std::io::Write as _;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::countdown::DEFAULT_QUIZ_SECONDS;
use quiz_core::model::{
    DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT, QuizRequest,
};
use services::{
    Advance, CountdownHandle, OpenAiGenerator, QuizLoopService, QuizPhase, QuizSession, Selection,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDuration { raw: String },
    InvalidCount { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDuration { raw } => write!(f, "invalid --duration value: {raw}"),
            ArgsError::InvalidCount { raw } => write!(f, "invalid --count value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    duration_secs: u32,
    question_count: u32,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut duration_secs = std::env::var("QUIZ_DURATION_SECS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_QUIZ_SECONDS);
        let mut question_count = std::env::var("QUIZ_QUESTION_COUNT")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|count| (MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(count))
            .unwrap_or(DEFAULT_QUESTION_COUNT);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--duration" => {
                    let value = require_value(args, "--duration")?;
                    duration_secs = value
                        .parse::<u32>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or(ArgsError::InvalidDuration { raw: value })?;
                }
                "--count" => {
                    let value = require_value(args, "--count")?;
                    question_count = value
                        .parse::<u32>()
                        .ok()
                        .filter(|count| (MIN_QUESTION_COUNT..=MAX_QUESTION_COUNT).contains(count))
                        .ok_or(ArgsError::InvalidCount { raw: value })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            duration_secs,
            question_count,
        })
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--duration <secs>] [--count <n>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --duration {DEFAULT_QUIZ_SECONDS}");
    eprintln!("  --count {DEFAULT_QUESTION_COUNT}   (range {MIN_QUESTION_COUNT}..={MAX_QUESTION_COUNT})");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_AI_API_KEY, QUIZ_AI_BASE_URL, QUIZ_AI_MODEL");
    eprintln!("  QUIZ_DURATION_SECS, QUIZ_QUESTION_COUNT");
}

type InputLines = Lines<BufReader<Stdin>>;

async fn prompt_line(lines: &mut InputLines, prompt: &str) -> std::io::Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    lines.next_line().await
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let generator = OpenAiGenerator::from_env();
    if !generator.enabled() {
        return Err("QUIZ_AI_API_KEY is not set; quiz generation is disabled".into());
    }

    let loop_svc = QuizLoopService::new(Clock::default_clock(), Arc::new(generator))
        .with_duration_secs(args.duration_secs);
    let mut session = QuizSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(topic) = prompt_line(&mut lines, "Quiz topic: ").await? else {
            return Ok(());
        };
        let Some(instructions) =
            prompt_line(&mut lines, "Custom instructions (optional): ").await?
        else {
            return Ok(());
        };

        let request = match QuizRequest::new(topic, args.question_count, instructions) {
            Ok(request) => request,
            Err(error) => {
                println!("{error}");
                continue;
            }
        };

        println!("Generating your quiz...");
        let timer = match loop_svc.submit_topic(&mut session, request).await {
            Ok(timer) => timer,
            Err(_) => {
                println!(
                    "{}",
                    session
                        .error()
                        .unwrap_or("Failed to generate questions. Please try again.")
                );
                continue;
            }
        };

        let finished = run_quiz(&loop_svc, &mut session, timer, &mut lines).await?;
        if !finished {
            return Ok(());
        }
        print_results(&session);

        let again = prompt_line(&mut lines, "Start a new quiz? [y/N] ").await?;
        match again.as_deref().map(str::trim) {
            Some("y" | "Y") => session.reset(),
            _ => return Ok(()),
        }
    }
}

/// Drive one active quiz to completion.
///
/// Returns `false` when stdin closed before the quiz finished.
async fn run_quiz(
    loop_svc: &QuizLoopService,
    session: &mut QuizSession,
    mut timer: CountdownHandle,
    lines: &mut InputLines,
) -> Result<bool, Box<dyn std::error::Error>> {
    while session.phase() == QuizPhase::Active {
        render_question(session, &timer);

        tokio::select! {
            expired = timer.expired() => {
                if expired {
                    println!("Time's up!");
                    loop_svc.finish_expired(session)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(false);
                };
                handle_command(loop_svc, session, line.trim())?;
            }
        }
    }
    Ok(true)
}

fn handle_command(
    loop_svc: &QuizLoopService,
    session: &mut QuizSession,
    command: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        "1" | "2" | "3" | "4" => {
            let index = command.parse::<usize>()? - 1;
            let Some(option) = session
                .current_question()
                .and_then(|question| question.options().get(index))
                .cloned()
            else {
                return Ok(());
            };
            match loop_svc.select_answer(session, &option)? {
                Selection::Selected => println!("Option selected"),
                Selection::Deselected => println!("Option deselected"),
            }
        }
        "n" | "" => {
            if loop_svc.advance(session)? == Advance::Completed {
                println!();
            }
        }
        "p" => {
            loop_svc.retreat(session)?;
        }
        _ => {
            println!("Commands: 1-4 toggle an option, n next, p previous");
        }
    }
    Ok(())
}

fn render_question(session: &QuizSession, timer: &CountdownHandle) {
    let Some(question) = session.current_question() else {
        return;
    };

    println!();
    println!(
        "[{}] Question {} of {}",
        timer.display(),
        session.current_index() + 1,
        session.total_questions()
    );
    println!("{}", question.prompt());
    let selected = session.answer(session.current_index());
    for (index, option) in question.options().iter().enumerate() {
        let marker = if selected == Some(option.as_str()) {
            "*"
        } else {
            " "
        };
        println!("  {marker} {}. {option}", index + 1);
    }
}

fn print_results(session: &QuizSession) {
    let Some(score) = session.score() else {
        return;
    };

    println!();
    println!("Quiz Results");
    if session.expired_by_timer() {
        println!("Time's up!");
    }
    println!("Score: {score}");

    for (number, (question, outcome)) in session
        .questions()
        .iter()
        .zip(score.outcomes())
        .enumerate()
        .map(|(index, pair)| (index + 1, pair))
    {
        println!();
        println!("{number}. {}", question.prompt());
        let answer = outcome.selected.as_deref().unwrap_or("No answer");
        let verdict = if outcome.correct { "correct" } else { "incorrect" };
        println!("   Your answer: {answer} ({verdict})");
        println!(
            "   Correct answer: {}",
            question.correct_options().join(" or ")
        );
    }
}

#[tokio::main]
async fn main() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "app=info,services=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(error) = run().await {
        tracing::error!("{error}");
        eprintln!("{error}");
        std::process::exit(1);
    }
}
