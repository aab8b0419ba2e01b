//! Binary entrypoint for fontinfo-cli (made by FontLab https://www.fontlab.com/)

fn main() {
    if let Err(err) = fontinfo_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
