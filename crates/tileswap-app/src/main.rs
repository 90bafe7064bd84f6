//! Terminal driver for the Tileswap puzzle engine.
//!
//! Wires a [`Session`] to a JSON-file snapshot store and the wall clock, and
//! turns stdin commands into session operations. All game logic lives in the
//! library crates; this binary only parses, prints, and pumps the clock.

use std::{
    io::{self, BufRead, Write as _},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use tileswap_core::GridSize;
use tileswap_game::Session;
use tileswap_generator::Shuffler;

use crate::{clock::SystemClock, store::JsonFileStore};

mod clock;
mod store;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Grid side length for a fresh session (2-12). A resumable snapshot
    /// takes precedence.
    #[arg(long, value_name = "SIDE", default_value_t = 2)]
    grid_size: u8,

    /// Path of the snapshot file.
    #[arg(long, value_name = "PATH", default_value = "tileswap.json")]
    store: PathBuf,

    /// Shuffler seed for reproducible rounds; omit for entropy.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let default_size = GridSize::new(args.grid_size)?;
    let shuffler = args.seed.map_or_else(Shuffler::from_entropy, Shuffler::seeded);
    let store = JsonFileStore::new(&args.store);
    let mut session = Session::resume_or_start(store, SystemClock::new(), shuffler, default_size)?;
    log::info!(
        "session ready: level {}, {}x{} grid",
        session.level(),
        session.grid_size(),
        session.grid_size()
    );

    println!("tileswap -- swap A B, grid N, preview, reset, show, quit");
    print_board(&session);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let line = line?;

        // Elapsed wall time lands before the command does.
        session.poll()?;

        match dispatch(&mut session, line.trim()) {
            Ok(Command::Continue) => print_board(&session),
            Ok(Command::Quit) => break,
            Err(err) => eprintln!("{err}"),
        }
    }
    Ok(())
}

enum Command {
    Continue,
    Quit,
}

fn dispatch(
    session: &mut Session<JsonFileStore, SystemClock>,
    line: &str,
) -> Result<Command, Box<dyn std::error::Error>> {
    let mut words = line.split_whitespace();
    match words.next() {
        None | Some("show") => {}
        Some("quit") => return Ok(Command::Quit),
        Some("swap") => {
            let a = parse_position(words.next())?;
            let b = parse_position(words.next())?;
            session.swap(a, b)?;
            // A solve or timeout result may be pending; let it land so the
            // next prompt shows the new round.
            session.poll()?;
        }
        Some("grid") => {
            let side: u8 = words
                .next()
                .ok_or("usage: grid N")?
                .parse()
                .map_err(|_| "usage: grid N")?;
            session.set_grid_size(GridSize::new(side)?)?;
        }
        Some("preview") => {
            session.preview()?;
            println!("peeked at the full image (-1 score)");
        }
        Some("reset") => session.clear_progress()?,
        Some(other) => return Err(format!("unknown command: {other}").into()),
    }
    Ok(Command::Continue)
}

fn parse_position(word: Option<&str>) -> Result<usize, Box<dyn std::error::Error>> {
    word.and_then(|word| word.parse().ok())
        .ok_or_else(|| "usage: swap A B".into())
}

fn print_board(session: &Session<JsonFileStore, SystemClock>) {
    let Some(arrangement) = session.arrangement() else {
        return;
    };
    let side = usize::from(session.grid_size().get());
    for row in arrangement.pieces().chunks(side) {
        let cells: Vec<String> = row.iter().map(|piece| format!("{piece:>3}")).collect();
        println!("{}", cells.join(" "));
    }
    let timer = session.timer().unwrap_or(0);
    let incorrect = session.incorrect_moves().unwrap_or(0);
    println!(
        "level {}  score {}  time left {timer}s  incorrect {incorrect}  image #{}",
        session.level(),
        session.score(),
        session.image_index().unwrap_or(0),
    );
    if let Some(feedback) = session.feedback() {
        println!("{feedback}");
    }
    if session.is_solved() {
        println!("solved!");
    }
}
