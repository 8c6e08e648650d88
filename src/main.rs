fn main() {
    if let Err(err) = listing_clean::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
