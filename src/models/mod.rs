// Models module - Database entity representations

pub mod blood_request;
pub mod blood_type;
pub mod donation;
pub mod inventory;
pub mod user;

pub use blood_request::{BloodRequest, RequestStatus};
pub use blood_type::BloodType;
pub use donation::Donation;
pub use inventory::{InventoryEntry, InventoryLevel, StockLevel};
pub use user::User;
