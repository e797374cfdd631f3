pub mod retry;
pub mod solarman_http;
