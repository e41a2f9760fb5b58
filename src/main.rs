//! pk-search CLI entry point
//!
//! Kilometer point search - CLI + interactive form

use pk_search::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
