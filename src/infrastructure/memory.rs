//! In-memory implementation of every repository port.
//!
//! Used by the service and handler tests and for running the API without a
//! database. Each mutating call works on a copy of the state and swaps it in
//! only on success, so a failed order placement leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingRequest};
use crate::domain::cart::{merged_quantity, CartEntry, CartLine};
use crate::domain::errors::DomainError;
use crate::domain::feedback::{Feedback, NewFeedback};
use crate::domain::identity::Purchaser;
use crate::domain::inventory::{round_rating, InventoryItem, ItemPatch, NewItem, ProductView};
use crate::domain::order::{Order, OrderDraft, OrderLineView, OrderStatus, OrderView};
use crate::domain::ports::{
    BookingRepository, CartRepository, FeedbackRepository, InventoryRepository, OrderRepository,
};

#[derive(Debug, Clone)]
struct StoredLine {
    id: i64,
    item_id: i64,
    quantity: i32,
    unit_price: BigDecimal,
}

#[derive(Debug, Clone, Default)]
struct State {
    items: BTreeMap<i64, InventoryItem>,
    cart: Vec<CartLine>,
    orders: Vec<(Order, Vec<StoredLine>)>,
    feedback: Vec<Feedback>,
    bookings: Vec<Booking>,
    next_id: i64,
    fail_on_order_insert: bool,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn item(&self, id: i64) -> Result<&InventoryItem, DomainError> {
        self.items
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("Item {id}")))
    }

    fn check_available(&self, id: i64, requested: i32) -> Result<bool, DomainError> {
        Ok(self.item(id)?.quantity >= requested)
    }

    fn decrement(&mut self, id: i64, qty: i32) -> Result<(), DomainError> {
        let item = self
            .items
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("Item {id}")))?;
        if item.quantity < qty {
            return Err(DomainError::InsufficientStock {
                item_id: id,
                item_name: item.name.clone(),
                available: item.quantity,
                requested: qty,
            });
        }
        item.quantity -= qty;
        item.updated_at = Utc::now();
        Ok(())
    }

    fn product_view(&self, item: &InventoryItem) -> ProductView {
        let ratings: Vec<f64> = self
            .feedback
            .iter()
            .filter(|f| f.item_id == item.id)
            .map(|f| f64::from(f.rating))
            .collect();
        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            round_rating(ratings.iter().sum::<f64>() / ratings.len() as f64)
        };
        ProductView {
            item: item.clone(),
            average_rating,
        }
    }

    fn order_view(&self, order: &Order, lines: &[StoredLine]) -> OrderView {
        OrderView {
            order: order.clone(),
            lines: lines
                .iter()
                .map(|l| {
                    let item = self.items.get(&l.item_id);
                    OrderLineView {
                        id: l.id,
                        item_id: l.item_id,
                        item_name: item.map(|i| i.name.clone()).unwrap_or_default(),
                        item_description: item.and_then(|i| i.description.clone()),
                        quantity: l.quantity,
                        unit_price: l.unit_price.clone(),
                    }
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, DomainError> {
        self.state
            .lock()
            .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
    }

    /// Runs `f` against a copy of the state and keeps the copy only if `f` succeeds.
    fn atomically<T>(
        &self,
        f: impl FnOnce(&mut State) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let mut guard = self.state()?;
        let mut working = guard.clone();
        let out = f(&mut working)?;
        *guard = working;
        Ok(out)
    }

    #[cfg(any(test, feature = "test-util"))]
    /// Makes the next order placements fail after stock has been decremented.
    pub fn set_fail_on_order_insert(&self, fail: bool) {
        if let Ok(mut state) = self.state() {
            state.fail_on_order_insert = fail;
        }
    }

    /// Inventory ledger availability check.
    pub fn check_available(&self, item_id: i64, requested: i32) -> Result<bool, DomainError> {
        self.state()?.check_available(item_id, requested)
    }

    #[cfg(any(test, feature = "test-util"))]
    /// Current stock of an item, if it exists.
    pub fn stock(&self, item_id: i64) -> Option<i32> {
        self.state().ok()?.items.get(&item_id).map(|i| i.quantity)
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn cart_len(&self, customer_id: i64) -> usize {
        self.state()
            .map(|s| s.cart.iter().filter(|l| l.customer_id == customer_id).count())
            .unwrap_or(0)
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn order_count(&self) -> usize {
        self.state().map(|s| s.orders.len()).unwrap_or(0)
    }
}

impl InventoryRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<ProductView>, DomainError> {
        let state = self.state()?;
        Ok(state.items.values().map(|i| state.product_view(i)).collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<ProductView>, DomainError> {
        let state = self.state()?;
        Ok(state.items.get(&id).map(|i| state.product_view(i)))
    }

    fn create(&self, item: NewItem) -> Result<InventoryItem, DomainError> {
        self.atomically(|state| {
            let now = Utc::now();
            let id = state.next_id();
            let row = InventoryItem {
                id,
                name: item.name,
                description: item.description,
                kind: item.kind,
                quantity: item.quantity,
                unit_price: item.unit_price,
                created_at: now,
                updated_at: now,
            };
            state.items.insert(id, row.clone());
            Ok(row)
        })
    }

    fn update(&self, id: i64, patch: ItemPatch) -> Result<Option<InventoryItem>, DomainError> {
        self.atomically(|state| {
            let Some(item) = state.items.get_mut(&id) else {
                return Ok(None);
            };
            patch.apply(item);
            item.updated_at = Utc::now();
            Ok(Some(item.clone()))
        })
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.atomically(|state| {
            if !state.items.contains_key(&id) {
                return Ok(false);
            }
            let ordered = state
                .orders
                .iter()
                .any(|(_, lines)| lines.iter().any(|l| l.item_id == id));
            if ordered {
                return Err(DomainError::Conflict(format!(
                    "Item {id} appears in existing orders and cannot be deleted"
                )));
            }
            state.items.remove(&id);
            state.cart.retain(|l| l.item_id != id);
            state.feedback.retain(|f| f.item_id != id);
            Ok(true)
        })
    }
}

impl CartRepository for InMemoryStore {
    fn list(&self, customer_id: i64) -> Result<Vec<CartEntry>, DomainError> {
        let state = self.state()?;
        state
            .cart
            .iter()
            .filter(|l| l.customer_id == customer_id)
            .map(|l| -> Result<CartEntry, DomainError> {
                let item = state.item(l.item_id)?;
                Ok(CartEntry {
                    line: l.clone(),
                    item_name: item.name.clone(),
                    unit_price: item.unit_price.clone(),
                    in_stock: item.quantity,
                })
            })
            .collect()
    }

    fn add_or_merge(
        &self,
        customer_id: i64,
        item_id: i64,
        quantity: i32,
    ) -> Result<CartLine, DomainError> {
        self.atomically(|state| {
            state.item(item_id)?;
            if let Some(line) = state
                .cart
                .iter_mut()
                .find(|l| l.customer_id == customer_id && l.item_id == item_id)
            {
                line.quantity = merged_quantity(line.quantity, quantity)?;
                return Ok(line.clone());
            }
            let line = CartLine {
                id: state.next_id(),
                customer_id,
                item_id,
                quantity,
            };
            state.cart.push(line.clone());
            Ok(line)
        })
    }

    fn set_quantity(
        &self,
        customer_id: i64,
        line_id: i64,
        quantity: i32,
    ) -> Result<Option<CartLine>, DomainError> {
        self.atomically(|state| {
            Ok(state
                .cart
                .iter_mut()
                .find(|l| l.id == line_id && l.customer_id == customer_id)
                .map(|line| {
                    line.quantity = quantity;
                    line.clone()
                }))
        })
    }

    fn remove(&self, customer_id: i64, line_id: i64) -> Result<bool, DomainError> {
        self.atomically(|state| {
            let before = state.cart.len();
            state
                .cart
                .retain(|l| !(l.id == line_id && l.customer_id == customer_id));
            Ok(state.cart.len() != before)
        })
    }

    fn clear(&self, customer_id: i64) -> Result<usize, DomainError> {
        self.atomically(|state| {
            let before = state.cart.len();
            state.cart.retain(|l| l.customer_id != customer_id);
            Ok(before - state.cart.len())
        })
    }
}

impl OrderRepository for InMemoryStore {
    fn place(&self, draft: OrderDraft) -> Result<OrderView, DomainError> {
        self.atomically(|state| {
            let demand = draft.demand()?;

            for &(item_id, requested) in &demand {
                if !state.check_available(item_id, requested)? {
                    let item = state.item(item_id)?;
                    return Err(DomainError::InsufficientStock {
                        item_id,
                        item_name: item.name.clone(),
                        available: item.quantity,
                        requested,
                    });
                }
            }
            for &(item_id, requested) in &demand {
                state.decrement(item_id, requested)?;
            }

            if state.fail_on_order_insert {
                return Err(DomainError::Internal("simulated order insert failure".to_string()));
            }

            let order = Order {
                id: Uuid::new_v4(),
                purchaser: Some(draft.purchaser),
                ordered_at: Utc::now(),
                status: OrderStatus::Pending,
                total_price: draft.total,
                payment_method: draft.payment_method,
                email: draft.email,
            };
            let mut lines = Vec::with_capacity(draft.items.len());
            for item in draft.items {
                lines.push(StoredLine {
                    id: state.next_id(),
                    item_id: item.item_id,
                    quantity: item.quantity,
                    unit_price: item.price,
                });
            }

            if let Purchaser::Customer(customer_id) = draft.purchaser {
                state.cart.retain(|l| l.customer_id != customer_id);
            }

            let view = state.order_view(&order, &lines);
            state.orders.push((order, lines));
            Ok(view)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let state = self.state()?;
        Ok(state
            .orders
            .iter()
            .find(|(o, _)| o.id == id)
            .map(|(o, lines)| state.order_view(o, lines)))
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let state = self.state()?;
        let mut views: Vec<OrderView> = state
            .orders
            .iter()
            .map(|(o, lines)| state.order_view(o, lines))
            .collect();
        views.sort_by(|a, b| b.order.ordered_at.cmp(&a.order.ordered_at));
        Ok(views)
    }

    fn transition_status(
        &self,
        id: Uuid,
        next: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError> {
        self.atomically(|state| {
            let Some(idx) = state.orders.iter().position(|(o, _)| o.id == id) else {
                return Ok(None);
            };
            let current = state.orders[idx].0.status;
            if !current.can_transition_to(next) {
                return Err(DomainError::InvalidTransition {
                    from: current.to_string(),
                    to: next.to_string(),
                });
            }
            state.orders[idx].0.status = next;
            let (order, lines) = &state.orders[idx];
            Ok(Some(state.order_view(order, lines)))
        })
    }
}

impl FeedbackRepository for InMemoryStore {
    fn list_for_item(&self, item_id: i64) -> Result<Vec<Feedback>, DomainError> {
        let state = self.state()?;
        let mut out: Vec<Feedback> = state
            .feedback
            .iter()
            .filter(|f| f.item_id == item_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(out)
    }

    fn create(&self, feedback: NewFeedback) -> Result<Feedback, DomainError> {
        self.atomically(|state| {
            state.item(feedback.item_id)?;
            let row = Feedback {
                id: state.next_id(),
                item_id: feedback.item_id,
                author: Some(feedback.author),
                rating: feedback.rating,
                comments: feedback.comments,
                created_at: Utc::now(),
            };
            state.feedback.push(row.clone());
            Ok(row)
        })
    }
}

impl BookingRepository for InMemoryStore {
    fn list(&self) -> Result<Vec<Booking>, DomainError> {
        let mut out = self.state()?.bookings.clone();
        out.sort_by(|a, b| {
            (a.booking_date, a.booking_time, a.id).cmp(&(b.booking_date, b.booking_time, b.id))
        });
        Ok(out)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Booking>, DomainError> {
        Ok(self.state()?.bookings.iter().find(|b| b.id == id).cloned())
    }

    fn create(&self, booking: BookingRequest) -> Result<Booking, DomainError> {
        self.atomically(|state| {
            let now = Utc::now();
            let row = Booking {
                id: state.next_id(),
                name: booking.name,
                email: booking.email,
                phone: booking.phone,
                service: booking.service,
                stylist: booking.stylist,
                room: booking.room,
                booking_date: booking.booking_date,
                booking_time: booking.booking_time,
                notes: booking.notes,
                created_at: now,
                updated_at: now,
            };
            state.bookings.push(row.clone());
            Ok(row)
        })
    }

    fn update(&self, id: i64, booking: BookingRequest) -> Result<Option<Booking>, DomainError> {
        self.atomically(|state| {
            let Some(row) = state.bookings.iter_mut().find(|b| b.id == id) else {
                return Ok(None);
            };
            row.name = booking.name;
            row.email = booking.email;
            row.phone = booking.phone;
            row.service = booking.service;
            row.stylist = booking.stylist;
            row.room = booking.room;
            row.booking_date = booking.booking_date;
            row.booking_time = booking.booking_time;
            row.notes = booking.notes;
            row.updated_at = Utc::now();
            Ok(Some(row.clone()))
        })
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        self.atomically(|state| {
            let before = state.bookings.len();
            state.bookings.retain(|b| b.id != id);
            Ok(state.bookings.len() != before)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(store: &InMemoryStore, name: &str, quantity: i32) -> i64 {
        InventoryRepository::create(
            store,
            NewItem {
                name: name.to_string(),
                description: None,
                kind: "product".to_string(),
                quantity,
                unit_price: BigDecimal::from(10),
            },
        )
        .unwrap()
        .id
    }

    #[test]
    fn ledger_check_available_compares_against_stock() {
        let store = InMemoryStore::new();
        let id = seed(&store, "Comb", 5);
        assert!(store.check_available(id, 5).unwrap());
        assert!(!store.check_available(id, 6).unwrap());
        assert!(matches!(
            store.check_available(999, 1),
            Err(DomainError::NotFound(_))
        ));
    }

    #[test]
    fn failed_closure_leaves_state_untouched() {
        let store = InMemoryStore::new();
        let id = seed(&store, "Comb", 5);
        let result: Result<(), DomainError> = store.atomically(|state| {
            state.decrement(id, 3)?;
            Err(DomainError::Internal("boom".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(store.stock(id), Some(5));
    }

    #[test]
    fn decrement_refuses_to_go_negative() {
        let store = InMemoryStore::new();
        let id = seed(&store, "Comb", 2);
        let err = store
            .atomically(|state| state.decrement(id, 3))
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientStock { available: 2, requested: 3, .. }
        ));
        assert_eq!(store.stock(id), Some(2));
    }

    #[test]
    fn cart_merge_overflow_is_rejected_and_store_stays_usable() {
        let store = InMemoryStore::new();
        let id = seed(&store, "Comb", 5);
        store.add_or_merge(1, id, i32::MAX).unwrap();

        assert!(matches!(
            store.add_or_merge(1, id, 1),
            Err(DomainError::Validation(_))
        ));
        assert_eq!(CartRepository::list(&store, 1).unwrap()[0].line.quantity, i32::MAX);
        assert_eq!(store.add_or_merge(2, id, 1).unwrap().quantity, 1);
    }

    #[test]
    fn deleting_an_item_takes_its_cart_lines_and_feedback() {
        let store = InMemoryStore::new();
        let id = seed(&store, "Comb", 5);
        let other = seed(&store, "Brush", 5);
        store.add_or_merge(1, id, 2).unwrap();
        store.add_or_merge(1, other, 1).unwrap();
        FeedbackRepository::create(
            &store,
            NewFeedback {
                item_id: id,
                author: Purchaser::Customer(1),
                rating: 4,
                comments: None,
            },
        )
        .unwrap();

        assert!(InventoryRepository::delete(&store, id).unwrap());
        assert!(!InventoryRepository::delete(&store, id).unwrap());
        assert!(InventoryRepository::find_by_id(&store, id).unwrap().is_none());
        let cart = CartRepository::list(&store, 1).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].line.item_id, other);
        assert!(store.list_for_item(id).unwrap().is_empty());
    }

    #[test]
    fn ordered_items_cannot_be_deleted() {
        use crate::domain::order::{OrderItemRequest, PlaceOrder};

        let store = InMemoryStore::new();
        let id = seed(&store, "Comb", 5);
        let draft = PlaceOrder {
            items: vec![OrderItemRequest {
                item_id: id,
                quantity: 1,
                price: BigDecimal::from(10),
            }],
            email: "guest@example.com".to_string(),
            payment_method: None,
        }
        .into_draft(Purchaser::Customer(1))
        .unwrap();
        store.place(draft).unwrap();

        assert!(matches!(
            InventoryRepository::delete(&store, id),
            Err(DomainError::Conflict(_))
        ));
        assert_eq!(store.stock(id), Some(4));
    }
}
