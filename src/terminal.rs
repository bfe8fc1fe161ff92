//! Line-based terminal front end for the game sessions.

use anyhow::Result;
use mozgalica::{MathQuizSession, MemorySession, TicTacToeSession};
use mozgalica_engines::{Card, Difficulty, FlipOutcome, Outcome, TOTAL_QUESTIONS, TicTacToePhase};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, instrument};

/// Reads player input line by line.
pub struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

/// What the player typed.
enum Input {
    /// A 1-based choice.
    Choice(usize),
    /// `q` or end of input.
    Quit,
    /// Anything else.
    Invalid,
}

impl Prompt {
    /// Creates a prompt reading standard input.
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, message: &str) -> Result<Input> {
        println!("{message}");
        let Some(line) = self.lines.next_line().await? else {
            return Ok(Input::Quit);
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(Input::Quit);
        }
        Ok(line.parse().map(Input::Choice).unwrap_or(Input::Invalid))
    }

    /// Asks a yes/no question; anything but `y`/`yes` is no.
    pub async fn confirm(&mut self, message: &str) -> Result<bool> {
        println!("{message} [y/N]");
        let answer = self.lines.next_line().await?.unwrap_or_default();
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

/// Plays tic-tac-toe until the game ends or the player quits.
#[instrument(skip(session, prompt))]
pub async fn play_tictactoe(
    session: &mut TicTacToeSession,
    difficulty: Difficulty,
    prompt: &mut Prompt,
) -> Result<()> {
    session.start_game(difficulty);
    println!("You are X. Pick a cell 1-9, q to quit.\n");

    loop {
        println!("{}\n", session.engine().board().display());
        let cell = match prompt.ask("Your move:").await? {
            Input::Choice(n) if (1..=9).contains(&n) => n - 1,
            Input::Quit => {
                session.return_to_menu();
                return Ok(());
            }
            _ => {
                println!("Enter a number from 1 to 9.");
                continue;
            }
        };

        let report = match session.human_move(cell).await {
            Ok(report) => report,
            Err(e) => {
                debug!(error = %e, "Move rejected");
                println!("{e}");
                continue;
            }
        };
        if let Some(reply) = report.computer_cell {
            println!("Computer plays {}.", reply + 1);
        }

        if let TicTacToePhase::Finished(outcome) = report.phase {
            println!("{}\n", session.engine().board().display());
            match outcome {
                Outcome::Won => println!(
                    "You won! +{} points",
                    session.engine().final_score().unwrap_or_default()
                ),
                Outcome::Lost => println!("You lost."),
                Outcome::Draw => println!("Draw."),
            }
            session.flush_reports().await;
            return Ok(());
        }
    }
}

fn render_grid(cards: &[Card], columns: usize) -> String {
    cards
        .chunks(columns)
        .map(|row| {
            row.iter()
                .map(|card| {
                    if card.is_flipped() || card.is_matched() {
                        format!("[{:^15}]", card.symbol())
                    } else {
                        format!("[{:^15}]", card.id() + 1)
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plays memory until every pair is found or the player quits.
#[instrument(skip(session, prompt))]
pub async fn play_memory(
    session: &mut MemorySession,
    difficulty: Difficulty,
    prompt: &mut Prompt,
) -> Result<()> {
    session.start_game(difficulty);
    let columns = if difficulty == Difficulty::Easy { 3 } else { 4 };
    println!("Find the pairs. Pick a card by number, q to quit.\n");

    loop {
        let (grid, moves, count) = session.inspect(|engine| {
            (render_grid(engine.cards(), columns), engine.moves(), engine.cards().len())
        });
        println!("{grid}\nMoves: {moves}\n");

        let card = match prompt.ask("Flip card:").await? {
            Input::Choice(n) if (1..=count).contains(&n) => n - 1,
            Input::Quit => {
                session.return_to_menu();
                return Ok(());
            }
            _ => {
                println!("Enter a number from 1 to {count}.");
                continue;
            }
        };

        match session.flip(card) {
            Ok(FlipOutcome::Mismatched) => {
                let grid = session.inspect(|engine| render_grid(engine.cards(), columns));
                println!("{grid}\nNo match.\n");
                session.settle().await;
            }
            Ok(FlipOutcome::Matched) => println!("Match!"),
            Ok(FlipOutcome::Revealed) => {}
            Ok(FlipOutcome::Won) => {
                let (moves, score) =
                    session.inspect(|engine| (engine.moves(), engine.final_score()));
                println!("All pairs found in {moves} moves! {} points", score.unwrap_or_default());
                session.flush_reports().await;
                return Ok(());
            }
            Err(e) => {
                debug!(error = %e, "Flip rejected");
                println!("{e}");
            }
        }
    }
}

/// Plays one quiz round or until the player quits.
#[instrument(skip(session, prompt))]
pub async fn play_math_quiz(
    session: &mut MathQuizSession,
    difficulty: Difficulty,
    prompt: &mut Prompt,
) -> Result<()> {
    session.start_game(difficulty);
    println!("{TOTAL_QUESTIONS} questions, the clock is running. Pick an option 1-4, q to quit.\n");

    loop {
        let Some((number, question, elapsed)) = session.inspect(|engine| {
            engine
                .question()
                .cloned()
                .map(|q| (engine.question_number(), q, engine.elapsed_seconds()))
        }) else {
            return Ok(());
        };

        println!("Question {number}/{TOTAL_QUESTIONS} ({elapsed}s): {}", question.text());
        for (i, option) in question.options().iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }

        let value = match prompt.ask("Answer:").await? {
            Input::Choice(n) if (1..=question.options().len()).contains(&n) => {
                question.options()[n - 1]
            }
            Input::Quit => {
                session.return_to_menu();
                return Ok(());
            }
            _ => {
                println!("Enter 1 to 4.");
                continue;
            }
        };

        let outcome = session.submit_answer(value)?;
        println!("{}\n", if outcome.correct { "Correct!" } else { "Wrong." });

        if let Some(score) = outcome.final_score {
            let (correct, elapsed) =
                session.inspect(|engine| (engine.correct_count(), engine.elapsed_seconds()));
            println!("Correct: {correct}/{TOTAL_QUESTIONS}, time: {elapsed}s, points: {score}");
            session.flush_reports().await;
            return Ok(());
        }
    }
}
