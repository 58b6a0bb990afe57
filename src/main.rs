use std::process;

fn main() {
    if let Err(err) = solace::cli::main() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
