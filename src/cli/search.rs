//! Search command handler
//!
//! Runs a single submission. The text format streams: items are printed as
//! soon as they are rendered and each location label follows when it
//! arrives. Other formats wait for every label and print one report.

use crate::cli::spawn_status_printer;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::text::{item_line, label_line};
use crate::format::{available_formats, get_formatter, SearchReport};
use crate::query::SearchInput;
use crate::render::ListEvent;
use crate::search::{LiveController, SubmitOutcome};
use clap::Args;
use tokio::sync::mpsc::UnboundedReceiver;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Road name, e.g. "A-1" or "N340"
    pub carretera: Option<String>,

    /// Kilometer point number
    #[arg(long)]
    pub pk: Option<String>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;

    let format = args.format.unwrap_or(config.output.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let input = SearchInput::new(
        args.carretera.unwrap_or_default(),
        args.pk.unwrap_or_default(),
    );
    if input.is_blank() {
        eprintln!("Error: a road name is required (e.g. pk-search search A-1 --pk 12)");
        std::process::exit(2);
    }

    let mut controller = LiveController::connect(&config)?;
    let streaming = formatter.name() == "text" && args.output.is_none();

    let outcome = if streaming {
        let mut events = controller.list().subscribe();
        let status_printer = spawn_status_printer(controller.watch_status());

        let outcome = controller.submit(input).await;
        if !controller.count().is_empty() {
            println!("{}", controller.count());
        }
        stream_until_labelled(&mut controller, &mut events).await;

        drop(controller);
        let _ = status_printer.await;
        outcome
    } else {
        let outcome = controller.submit(input).await;
        controller.wait_for_labels().await;

        let output = formatter.format(&SearchReport::capture(&controller))?;
        if let Some(path) = args.output {
            std::fs::write(&path, &output)?;
            eprintln!("Output written to {}", path);
        } else {
            print!("{}", output);
        }
        outcome
    };

    if let SubmitOutcome::Failed(_) = outcome {
        std::process::exit(1);
    }

    Ok(())
}

/// Print list events until every label lookup of the current render is done
pub(crate) async fn stream_until_labelled(
    controller: &mut LiveController,
    events: &mut UnboundedReceiver<ListEvent>,
) {
    {
        let labels = controller.wait_for_labels();
        tokio::pin!(labels);

        loop {
            tokio::select! {
                Some(event) = events.recv() => print_event(event),
                _ = &mut labels => break,
            }
        }
    }

    while let Ok(event) = events.try_recv() {
        print_event(event);
    }
}

/// Draw one list change on stdout
pub(crate) fn print_event(event: ListEvent) {
    match event {
        ListEvent::Reset => {}
        ListEvent::Appended(item) => println!("{}", item_line(&item)),
        ListEvent::LabelResolved { index, label } => println!("{}", label_line(index, &label)),
    }
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
