mod platform;

fn main() {
    if let Err(err) = platform::run_app() {
        eprintln!("pdfchat: {err:#}");
        std::process::exit(1);
    }
}
