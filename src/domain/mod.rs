pub mod booking;
pub mod cart;
pub mod errors;
pub mod feedback;
pub mod identity;
pub mod inventory;
pub mod notification;
pub mod order;
pub mod ports;
