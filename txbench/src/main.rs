fn main() {
    if let Err(e) = txbench::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
