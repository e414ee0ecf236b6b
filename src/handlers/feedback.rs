use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::blocking;
use crate::domain::feedback::Feedback;
use crate::domain::identity::{Caller, Purchaser};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct FeedbackQuery {
    pub item_id: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitFeedbackRequest {
    pub item_id: i64,
    /// 1 to 5.
    pub rating: i16,
    pub comments: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedbackResponse {
    pub id: i64,
    pub item_id: i64,
    pub customer_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub rating: i16,
    pub comments: Option<String>,
    pub created_at: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(fb: Feedback) -> Self {
        let (customer_id, staff_id) = fb
            .author
            .as_ref()
            .map(Purchaser::columns)
            .unwrap_or((None, None));
        Self {
            id: fb.id,
            item_id: fb.item_id,
            customer_id,
            staff_id,
            rating: fb.rating,
            comments: fb.comments,
            created_at: fb.created_at.to_rfc3339(),
        }
    }
}

/// GET /feedbacks?item_id=
#[utoipa::path(
    get,
    path = "/feedbacks",
    params(("item_id" = i64, Query, description = "Item to list feedback for")),
    responses(
        (status = 200, description = "Feedback for the item, newest first", body = [FeedbackResponse]),
        (status = 400, description = "item_id missing"),
    ),
    tag = "feedback"
)]
pub async fn list_feedback(
    state: web::Data<AppState>,
    query: web::Query<FeedbackQuery>,
) -> Result<HttpResponse, AppError> {
    let item_id = query
        .item_id
        .ok_or_else(|| AppError::BadRequest("item_id query parameter is required".to_string()))?;
    let feedback = blocking(move || state.feedback.list_for_item(item_id)).await?;
    let body: Vec<FeedbackResponse> = feedback.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /feedbacks
#[utoipa::path(
    post,
    path = "/feedbacks",
    request_body = SubmitFeedbackRequest,
    responses(
        (status = 201, description = "Feedback recorded", body = FeedbackResponse),
        (status = 400, description = "Rating out of range"),
        (status = 404, description = "Item not found"),
    ),
    tag = "feedback"
)]
pub async fn submit_feedback(
    state: web::Data<AppState>,
    caller: Caller,
    body: web::Json<SubmitFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let SubmitFeedbackRequest {
        item_id,
        rating,
        comments,
    } = body.into_inner();
    let fb = blocking(move || state.feedback.submit(&caller, item_id, rating, comments)).await?;
    Ok(HttpResponse::Created().json(FeedbackResponse::from(fb)))
}
