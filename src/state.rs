use std::sync::Arc;

use crate::application::{BookingService, CartService, FeedbackService, InventoryService, OrderService};
use crate::db::DbPool;
use crate::domain::ports::OrderNotifier;
use crate::infrastructure::booking_repo::DieselBookingRepository;
use crate::infrastructure::cart_repo::DieselCartRepository;
use crate::infrastructure::feedback_repo::DieselFeedbackRepository;
use crate::infrastructure::inventory_repo::DieselInventoryRepository;
use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::order_repo::DieselOrderRepository;

/// Services shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub cart: CartService,
    pub orders: OrderService,
    pub feedback: FeedbackService,
    pub bookings: BookingService,
}

impl AppState {
    pub fn from_pool(pool: DbPool, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self {
            inventory: InventoryService::new(Arc::new(DieselInventoryRepository::new(pool.clone()))),
            cart: CartService::new(Arc::new(DieselCartRepository::new(pool.clone()))),
            orders: OrderService::new(Arc::new(DieselOrderRepository::new(pool.clone())), notifier),
            feedback: FeedbackService::new(Arc::new(DieselFeedbackRepository::new(pool.clone()))),
            bookings: BookingService::new(Arc::new(DieselBookingRepository::new(pool))),
        }
    }

    pub fn in_memory(store: InMemoryStore, notifier: Arc<dyn OrderNotifier>) -> Self {
        Self {
            inventory: InventoryService::new(Arc::new(store.clone())),
            cart: CartService::new(Arc::new(store.clone())),
            orders: OrderService::new(Arc::new(store.clone()), notifier),
            feedback: FeedbackService::new(Arc::new(store.clone())),
            bookings: BookingService::new(Arc::new(store)),
        }
    }
}
