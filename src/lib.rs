pub mod api;
pub mod events;
pub mod inventory;
pub mod registry;
pub mod utils;
