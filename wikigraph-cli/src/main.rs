//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = wikigraph_cli::run() {
        eprintln!("wikigraph: {err}");
        std::process::exit(1);
    }
}
