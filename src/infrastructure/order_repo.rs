use std::collections::HashMap;

use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::identity::Purchaser;
use crate::domain::order::{Order, OrderDraft, OrderLineView, OrderStatus, OrderView};
use crate::domain::ports::OrderRepository;
use crate::schema::{inventories, order_lines, orders};

use super::cart_repo::clear_cart;
use super::inventory_repo::{check_available, decrement, lock_items};
use super::models::{InventoryRow, NewOrderLineRow, NewOrderRow, OrderLineRow, OrderRow};

fn line_view(line: OrderLineRow, item: InventoryRow) -> OrderLineView {
    OrderLineView {
        id: line.id,
        item_id: line.item_id,
        item_name: item.name,
        item_description: item.description,
        quantity: line.quantity,
        unit_price: line.unit_price,
    }
}

fn load_view(conn: &mut PgConnection, order: OrderRow) -> Result<OrderView, DomainError> {
    let lines: Vec<(OrderLineRow, InventoryRow)> = order_lines::table
        .inner_join(inventories::table)
        .filter(order_lines::order_id.eq(order.id))
        .order(order_lines::id.asc())
        .select((OrderLineRow::as_select(), InventoryRow::as_select()))
        .load(conn)?;

    Ok(OrderView {
        order: Order::try_from(order)?,
        lines: lines.into_iter().map(|(l, i)| line_view(l, i)).collect(),
    })
}

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn place(&self, draft: OrderDraft) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Availability pass, holding row locks on every item involved
            let demand = draft.demand()?;
            let mut ids: Vec<i64> = demand.iter().map(|(id, _)| *id).collect();
            ids.sort_unstable();
            let locked = lock_items(conn, &ids)?;

            for &(item_id, requested) in &demand {
                if !check_available(conn, item_id, requested)? {
                    let item = locked
                        .iter()
                        .find(|r| r.id == item_id)
                        .ok_or_else(|| DomainError::not_found(format!("Item {item_id}")))?;
                    return Err(DomainError::InsufficientStock {
                        item_id,
                        item_name: item.name.clone(),
                        available: item.quantity,
                        requested,
                    });
                }
            }

            // 2. Decrement pass
            for &(item_id, requested) in &demand {
                decrement(conn, item_id, requested)?;
            }

            // 3. Insert the order
            let (customer_id, staff_id) = draft.purchaser.columns();
            let order = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: Uuid::new_v4(),
                    customer_id,
                    staff_id,
                    ordered_at: Utc::now(),
                    status: OrderStatus::Pending.as_str().to_string(),
                    total_price: draft.total.clone(),
                    payment_method: draft.payment_method.clone(),
                    email: draft.email.clone(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 4. Insert order lines with the submitted prices
            let new_lines: Vec<NewOrderLineRow> = draft
                .items
                .iter()
                .map(|i| NewOrderLineRow {
                    order_id: order.id,
                    item_id: i.item_id,
                    quantity: i.quantity,
                    unit_price: i.price.clone(),
                })
                .collect();
            diesel::insert_into(order_lines::table)
                .values(&new_lines)
                .execute(conn)?;

            // 5. Empty the customer's cart, whatever it held
            if let Purchaser::Customer(customer_id) = draft.purchaser {
                clear_cart(conn, customer_id)?;
            }

            load_view(conn, order)
        })
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };
        load_view(&mut conn, order).map(Some)
    }

    fn list(&self) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let rows = orders::table
                .select(OrderRow::as_select())
                .order(orders::ordered_at.desc())
                .load(conn)?;

            let lines: Vec<(OrderLineRow, InventoryRow)> = OrderLineRow::belonging_to(&rows)
                .inner_join(inventories::table)
                .order(order_lines::id.asc())
                .select((OrderLineRow::as_select(), InventoryRow::as_select()))
                .load(conn)?;

            let mut by_order: HashMap<Uuid, Vec<OrderLineView>> = HashMap::new();
            for (line, item) in lines {
                by_order
                    .entry(line.order_id)
                    .or_default()
                    .push(line_view(line, item));
            }

            rows.into_iter()
                .map(|o| -> Result<OrderView, DomainError> {
                    let lines = by_order.remove(&o.id).unwrap_or_default();
                    Ok(OrderView {
                        order: Order::try_from(o)?,
                        lines,
                    })
                })
                .collect()
        })
    }

    fn transition_status(
        &self,
        id: Uuid,
        next: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let order = orders::table
                .find(id)
                .select(OrderRow::as_select())
                .for_update()
                .get_result(conn)
                .optional()?;
            let Some(order) = order else {
                return Ok(None);
            };

            let current = Order::try_from(order)?.status;
            if !current.can_transition_to(next) {
                return Err(DomainError::InvalidTransition {
                    from: current.to_string(),
                    to: next.to_string(),
                });
            }

            let updated = diesel::update(orders::table.find(id))
                .set(orders::status.eq(next.as_str()))
                .returning(OrderRow::as_returning())
                .get_result(conn)?;
            load_view(conn, updated).map(Some)
        })
    }
}
