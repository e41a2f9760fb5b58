//! Interactive command handler
//!
//! A line-driven search form. Each line is a submission in the form
//! `carretera[,pk]`; `:limpiar` clears the form and `:salir` leaves.
//! Location labels are printed as they arrive, also while the prompt waits.

use crate::cli::search::{print_event, stream_until_labelled};
use crate::cli::spawn_status_printer;
use crate::config::Config;
use crate::error::Result;
use crate::query::SearchInput;
use crate::search::{LiveController, SubmitOutcome};
use clap::Args;
use std::io::{ErrorKind, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::warn;

/// Interactive command arguments
#[derive(Args)]
pub struct InteractiveArgs {
    /// Do not print a prompt (for piped input)
    #[arg(long)]
    pub no_prompt: bool,
}

/// One parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Search(SearchInput),
    Clear,
    Quit,
}

fn parse_line(line: &str) -> Line {
    match line.trim() {
        ":limpiar" | ":clear" => Line::Clear,
        ":salir" | ":quit" | ":q" => Line::Quit,
        text => {
            let (carretera, pk) = text.split_once(',').unwrap_or((text, ""));
            Line::Search(SearchInput::new(carretera.trim(), pk.trim()))
        }
    }
}

/// Next parsed line, `None` at end of input
///
/// Lines that are not valid UTF-8 are logged and skipped.
async fn next_input<R>(lines: &mut Lines<R>) -> Result<Option<Line>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Ok(line) => return Ok(line.map(|l| parse_line(&l))),
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                warn!(error = %err, "skipping input line");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

fn prompt(enabled: bool) {
    if enabled {
        eprint!("carretera[,pk]> ");
        let _ = std::io::stderr().flush();
    }
}

/// Run the interactive command
pub async fn run(args: InteractiveArgs) -> Result<()> {
    let config = Config::load()?;
    let mut controller = LiveController::connect(&config)?;
    let mut events = controller.list().subscribe();
    let status_printer = spawn_status_printer(controller.watch_status());
    let show_prompt = !args.no_prompt;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(show_prompt);

    loop {
        tokio::select! {
            input = next_input(&mut lines) => {
                let Some(input) = input? else { break };

                match input {
                    Line::Quit => break,
                    Line::Clear => controller.clear(),
                    Line::Search(input) => {
                        if controller.submit(input).await == SubmitOutcome::Rejected {
                            eprintln!("Introduce una carretera");
                        } else if !controller.count().is_empty() {
                            println!("{}", controller.count());
                        }
                    }
                }
                prompt(show_prompt);
            }
            Some(event) = events.recv() => print_event(event),
        }
    }

    // let the last search finish its labels before leaving
    stream_until_labelled(&mut controller, &mut events).await;

    drop(controller);
    let _ = status_printer.await;
    Ok(())
}
