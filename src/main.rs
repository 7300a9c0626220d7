fn main() {
    if let Err(e) = ispace::cli::main() {
        eprintln!("❌ Error: {e}");
        std::process::exit(1);
    }
}
