use std::collections::HashMap;

use bigdecimal::{BigDecimal, ToPrimitive};
use diesel::dsl::avg;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::inventory::{round_rating, InventoryItem, ItemPatch, NewItem, ProductView};
use crate::domain::ports::InventoryRepository;
use crate::schema::{feedbacks, inventories, order_lines};

use super::models::{InventoryChangeset, InventoryRow, NewInventoryRow};

// ── Ledger primitives, run inside a caller's transaction ─────────────────────

/// Locks the given inventory rows `FOR UPDATE`, in ascending id order.
pub(crate) fn lock_items(conn: &mut PgConnection, ids: &[i64]) -> QueryResult<Vec<InventoryRow>> {
    inventories::table
        .filter(inventories::id.eq_any(ids))
        .order(inventories::id.asc())
        .select(InventoryRow::as_select())
        .for_update()
        .load(conn)
}

/// True iff the item currently holds at least `requested` units.
pub(crate) fn check_available(
    conn: &mut PgConnection,
    id: i64,
    requested: i32,
) -> Result<bool, DomainError> {
    let quantity: Option<i32> = inventories::table
        .find(id)
        .select(inventories::quantity)
        .first(conn)
        .optional()?;
    match quantity {
        Some(q) => Ok(q >= requested),
        None => Err(DomainError::not_found(format!("Item {id}"))),
    }
}

/// Subtracts `qty` from the item's stock. The update only matches while
/// `quantity >= qty`, so stock can never be driven below zero.
pub(crate) fn decrement(conn: &mut PgConnection, id: i64, qty: i32) -> Result<(), DomainError> {
    let updated = diesel::update(
        inventories::table
            .filter(inventories::id.eq(id))
            .filter(inventories::quantity.ge(qty)),
    )
    .set(inventories::quantity.eq(inventories::quantity - qty))
    .execute(conn)?;

    if updated == 1 {
        return Ok(());
    }

    let row = inventories::table
        .find(id)
        .select(InventoryRow::as_select())
        .first(conn)
        .optional()?;
    match row {
        Some(row) => Err(DomainError::InsufficientStock {
            item_id: id,
            item_name: row.name,
            available: row.quantity,
            requested: qty,
        }),
        None => Err(DomainError::not_found(format!("Item {id}"))),
    }
}

fn average_ratings(conn: &mut PgConnection) -> QueryResult<HashMap<i64, f64>> {
    let rows: Vec<(i64, Option<BigDecimal>)> = feedbacks::table
        .group_by(feedbacks::item_id)
        .select((feedbacks::item_id, avg(feedbacks::rating)))
        .load(conn)?;
    Ok(rows
        .into_iter()
        .filter_map(|(id, avg)| Some((id, round_rating(avg?.to_f64()?))))
        .collect())
}

fn average_rating(conn: &mut PgConnection, item_id: i64) -> QueryResult<f64> {
    let avg: Option<BigDecimal> = feedbacks::table
        .filter(feedbacks::item_id.eq(item_id))
        .select(avg(feedbacks::rating))
        .first(conn)?;
    Ok(avg.and_then(|a| a.to_f64()).map(round_rating).unwrap_or(0.0))
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselInventoryRepository {
    pool: DbPool,
}

impl DieselInventoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl InventoryRepository for DieselInventoryRepository {
    fn list(&self) -> Result<Vec<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = inventories::table
            .select(InventoryRow::as_select())
            .order(inventories::id.asc())
            .load(&mut conn)?;
        let ratings = average_ratings(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|r| ProductView {
                average_rating: ratings.get(&r.id).copied().unwrap_or(0.0),
                item: r.into(),
            })
            .collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = inventories::table
            .find(id)
            .select(InventoryRow::as_select())
            .first(&mut conn)
            .optional()?;
        let Some(row) = row else {
            return Ok(None);
        };
        let average_rating = average_rating(&mut conn, id)?;

        Ok(Some(ProductView {
            average_rating,
            item: row.into(),
        }))
    }

    fn create(&self, item: NewItem) -> Result<InventoryItem, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(inventories::table)
            .values(&NewInventoryRow {
                name: item.name,
                description: item.description,
                kind: item.kind,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .returning(InventoryRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn update(&self, id: i64, patch: ItemPatch) -> Result<Option<InventoryItem>, DomainError> {
        let mut conn = self.pool.get()?;

        let changes = InventoryChangeset {
            name: patch.name,
            description: patch.description,
            kind: patch.kind,
            quantity: patch.quantity,
            unit_price: patch.unit_price,
        };
        let is_empty = changes.name.is_none()
            && changes.description.is_none()
            && changes.kind.is_none()
            && changes.quantity.is_none()
            && changes.unit_price.is_none();

        let row = if is_empty {
            inventories::table
                .find(id)
                .select(InventoryRow::as_select())
                .first(&mut conn)
                .optional()?
        } else {
            diesel::update(inventories::table.find(id))
                .set(&changes)
                .returning(InventoryRow::as_returning())
                .get_result(&mut conn)
                .optional()?
        };
        Ok(row.map(Into::into))
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let row = inventories::table
                .find(id)
                .select(inventories::id)
                .for_update()
                .first::<i64>(conn)
                .optional()?;
            if row.is_none() {
                return Ok(false);
            }

            let ordered: i64 = order_lines::table
                .filter(order_lines::item_id.eq(id))
                .count()
                .get_result(conn)?;
            if ordered > 0 {
                return Err(DomainError::Conflict(format!(
                    "Item {id} appears in existing orders and cannot be deleted"
                )));
            }

            // Cart lines and feedback go with it through ON DELETE CASCADE.
            let deleted = diesel::delete(inventories::table.find(id)).execute(conn)?;
            Ok(deleted == 1)
        })
    }
}
