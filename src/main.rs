fn main() {
    env_logger::init();

    if let Err(error) = fibsem::run_cli() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
