fn main() {
    if let Err(err) = solarman_home_api::app::run() {
        eprintln!("daily report failed: {err}");
        std::process::exit(1);
    }
}
