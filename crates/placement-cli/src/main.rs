fn main() {
    if let Err(error) = placement_cli::run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
