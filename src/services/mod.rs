// Services module - Business logic

pub mod donation_recorder;
pub mod password;
pub mod reports;
pub mod request_tracker;
