use std::process;

fn main() {
    if let Err(e) = bolt::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
