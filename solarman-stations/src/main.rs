fn main() {
    if let Err(err) = solarman_home_api::app::run_station_list() {
        eprintln!("station listing failed: {err}");
        std::process::exit(1);
    }
}
