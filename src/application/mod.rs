pub mod booking_service;
pub mod cart_service;
pub mod feedback_service;
pub mod inventory_service;
pub mod order_service;

pub use booking_service::BookingService;
pub use cart_service::CartService;
pub use feedback_service::FeedbackService;
pub use inventory_service::InventoryService;
pub use order_service::OrderService;
