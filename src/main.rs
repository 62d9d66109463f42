fn main() {
    if let Err(e) = chatdesk::cli::main() {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
