fn main() {
    if let Err(e) = typology_cli::run() {
        typology_cli::print_error(&e.to_string());
        std::process::exit(1);
    }
}
