fn main() {
    if let Err(e) = lbbench::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
