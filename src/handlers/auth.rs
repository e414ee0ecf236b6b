//! Reads the caller identity forwarded by the authenticating gateway.
//!
//! Customers arrive with `X-Customer-Id`; staff with `X-Staff-Id` and
//! `X-Staff-Role`. Anything else is rejected with 401 before a handler runs.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};

use crate::domain::identity::{Caller, StaffRole};
use crate::errors::AppError;

pub const CUSTOMER_ID_HEADER: &str = "X-Customer-Id";
pub const STAFF_ID_HEADER: &str = "X-Staff-Id";
pub const STAFF_ROLE_HEADER: &str = "X-Staff-Role";

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = caller_from_headers(req.headers());
        if let Err(e) = &result {
            log::warn!("Rejected {} {}: {}", req.method(), req.path(), e);
        }
        ready(result)
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, AppError> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => value
            .to_str()
            .map(|s| Some(s.trim()))
            .map_err(|_| AppError::Unauthorized(format!("{name} header is not valid text"))),
    }
}

fn parse_id(raw: &str, name: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::Unauthorized(format!("{name} header must be an integer id")))
}

pub fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, AppError> {
    let customer = header(headers, CUSTOMER_ID_HEADER)?;
    let staff = header(headers, STAFF_ID_HEADER)?;

    match (customer, staff) {
        (Some(_), Some(_)) => Err(AppError::Unauthorized(
            "a request cannot carry both customer and staff identity".to_string(),
        )),
        (Some(raw), None) => Ok(Caller::Customer {
            id: parse_id(raw, CUSTOMER_ID_HEADER)?,
        }),
        (None, Some(raw)) => {
            let id = parse_id(raw, STAFF_ID_HEADER)?;
            let role = header(headers, STAFF_ROLE_HEADER)?
                .ok_or_else(|| AppError::Unauthorized(format!("{STAFF_ROLE_HEADER} header is required")))?
                .parse::<StaffRole>()
                .map_err(|e| AppError::Unauthorized(e.to_string()))?;
            Ok(Caller::Staff { id, role })
        }
        (None, None) => Err(AppError::Unauthorized("authentication required".to_string())),
    }
}
