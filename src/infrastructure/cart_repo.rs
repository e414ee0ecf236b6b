use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;

use crate::db::DbPool;
use crate::domain::cart::{merged_quantity, CartEntry, CartLine};
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_lines, inventories};

use super::models::{CartLineRow, InventoryRow, NewCartLineRow};

/// Deletes every cart line of the customer. Returns the number removed.
pub(crate) fn clear_cart(conn: &mut PgConnection, customer_id: i64) -> QueryResult<usize> {
    diesel::delete(cart_lines::table.filter(cart_lines::customer_id.eq(customer_id))).execute(conn)
}

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CartRepository for DieselCartRepository {
    fn list(&self, customer_id: i64) -> Result<Vec<CartEntry>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<(CartLineRow, InventoryRow)> = cart_lines::table
            .inner_join(inventories::table)
            .filter(cart_lines::customer_id.eq(customer_id))
            .order(cart_lines::id.asc())
            .select((CartLineRow::as_select(), InventoryRow::as_select()))
            .load(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(line, item)| CartEntry {
                line: line.into(),
                item_name: item.name,
                unit_price: item.unit_price,
                in_stock: item.quantity,
            })
            .collect())
    }

    fn add_or_merge(
        &self,
        customer_id: i64,
        item_id: i64,
        quantity: i32,
    ) -> Result<CartLine, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let exists: i64 = inventories::table
                .filter(inventories::id.eq(item_id))
                .count()
                .get_result(conn)?;
            if exists == 0 {
                return Err(DomainError::not_found(format!("Item {item_id}")));
            }

            let current: Option<i32> = cart_lines::table
                .filter(cart_lines::customer_id.eq(customer_id))
                .filter(cart_lines::item_id.eq(item_id))
                .select(cart_lines::quantity)
                .for_update()
                .first(conn)
                .optional()?;
            if let Some(current) = current {
                merged_quantity(current, quantity)?;
            }

            let row = diesel::insert_into(cart_lines::table)
                .values(&NewCartLineRow {
                    customer_id,
                    item_id,
                    quantity,
                })
                .on_conflict((cart_lines::customer_id, cart_lines::item_id))
                .do_update()
                .set(cart_lines::quantity.eq(cart_lines::quantity + excluded(cart_lines::quantity)))
                .returning(CartLineRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
    }

    fn set_quantity(
        &self,
        customer_id: i64,
        line_id: i64,
        quantity: i32,
    ) -> Result<Option<CartLine>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::update(
            cart_lines::table
                .filter(cart_lines::id.eq(line_id))
                .filter(cart_lines::customer_id.eq(customer_id)),
        )
        .set(cart_lines::quantity.eq(quantity))
        .returning(CartLineRow::as_returning())
        .get_result(&mut conn)
        .optional()?;
        Ok(row.map(Into::into))
    }

    fn remove(&self, customer_id: i64, line_id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(
            cart_lines::table
                .filter(cart_lines::id.eq(line_id))
                .filter(cart_lines::customer_id.eq(customer_id)),
        )
        .execute(&mut conn)?;
        Ok(deleted > 0)
    }

    fn clear(&self, customer_id: i64) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(clear_cart(&mut conn, customer_id)?)
    }
}
