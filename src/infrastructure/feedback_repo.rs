use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::feedback::{Feedback, NewFeedback};
use crate::domain::ports::FeedbackRepository;
use crate::schema::{feedbacks, inventories};

use super::models::{FeedbackRow, NewFeedbackRow};

pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl FeedbackRepository for DieselFeedbackRepository {
    fn list_for_item(&self, item_id: i64) -> Result<Vec<Feedback>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = feedbacks::table
            .filter(feedbacks::item_id.eq(item_id))
            .order((feedbacks::created_at.desc(), feedbacks::id.desc()))
            .select(FeedbackRow::as_select())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn create(&self, feedback: NewFeedback) -> Result<Feedback, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let exists: i64 = inventories::table
                .filter(inventories::id.eq(feedback.item_id))
                .count()
                .get_result(conn)?;
            if exists == 0 {
                return Err(DomainError::not_found(format!("Item {}", feedback.item_id)));
            }

            let (customer_id, staff_id) = feedback.author.columns();
            let row = diesel::insert_into(feedbacks::table)
                .values(&NewFeedbackRow {
                    item_id: feedback.item_id,
                    customer_id,
                    staff_id,
                    rating: feedback.rating,
                    comments: feedback.comments.clone(),
                })
                .returning(FeedbackRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
    }
}
