fn main() {
    if let Err(err) = bacdive_enums::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
