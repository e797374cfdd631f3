pub mod models;
pub mod report;
pub mod vendor_payload;
