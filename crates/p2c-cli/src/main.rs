//! papers2code - community moderation of paper implementability
//!
//! Tracks papers, records confirm/dispute votes on whether they can be
//! reimplemented, and applies the community threshold rules.
//!
//! ## Quick Start
//!
//! ```bash
//! # Initialize in the current directory
//! papers2code init
//!
//! # Register a paper
//! papers2code paper add --title "Attention Is All You Need" --url https://arxiv.org/abs/1706.03762
//!
//! # Vote that it is not implementable
//! papers2code vote confirm <paper-id> --user <user-id>
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
