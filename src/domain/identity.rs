//! Who is making a request, as asserted by the upstream identity provider.

use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Admin,
    Receptionist,
    Stylist,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::Receptionist => "receptionist",
            StaffRole::Stylist => "stylist",
        }
    }
}

impl FromStr for StaffRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(StaffRole::Admin),
            "receptionist" => Ok(StaffRole::Receptionist),
            "stylist" => Ok(StaffRole::Stylist),
            other => Err(DomainError::validation(format!("unknown staff role '{other}'"))),
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Customer { id: i64 },
    Staff { id: i64, role: StaffRole },
}

impl Caller {
    pub fn purchaser(&self) -> Purchaser {
        match *self {
            Caller::Customer { id } => Purchaser::Customer(id),
            Caller::Staff { id, .. } => Purchaser::Staff(id),
        }
    }

    pub fn customer_id(&self) -> Option<i64> {
        match *self {
            Caller::Customer { id } => Some(id),
            Caller::Staff { .. } => None,
        }
    }

    /// Succeeds for customers only, returning their id.
    pub fn require_customer(&self) -> Result<i64, DomainError> {
        self.customer_id().ok_or_else(|| {
            DomainError::Forbidden("this endpoint is for customers only".to_string())
        })
    }

    /// Succeeds for staff holding one of `roles`. An empty slice admits any staff member.
    pub fn require_staff(&self, roles: &[StaffRole]) -> Result<(), DomainError> {
        match self {
            Caller::Customer { .. } => Err(DomainError::Forbidden(
                "this endpoint is for staff members only".to_string(),
            )),
            Caller::Staff { role, .. } if roles.is_empty() || roles.contains(role) => Ok(()),
            Caller::Staff { role, .. } => {
                let required: Vec<&str> = roles.iter().map(StaffRole::as_str).collect();
                Err(DomainError::Forbidden(format!(
                    "role '{}' lacks permission, required roles: {}",
                    role,
                    required.join(", ")
                )))
            }
        }
    }
}

/// Who an order or piece of feedback is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchaser {
    Customer(i64),
    Staff(i64),
}

impl Purchaser {
    /// Splits into the `(customer_id, staff_id)` column pair; exactly one is set.
    pub fn columns(&self) -> (Option<i64>, Option<i64>) {
        match *self {
            Purchaser::Customer(id) => (Some(id), None),
            Purchaser::Staff(id) => (None, Some(id)),
        }
    }

    /// Rebuilds from the column pair. `None` when neither is set (guest rows).
    pub fn from_columns(customer_id: Option<i64>, staff_id: Option<i64>) -> Option<Self> {
        match (customer_id, staff_id) {
            (Some(id), _) => Some(Purchaser::Customer(id)),
            (None, Some(id)) => Some(Purchaser::Staff(id)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_case_insensitive() {
        assert_eq!("Admin".parse::<StaffRole>().unwrap(), StaffRole::Admin);
        assert_eq!(" stylist ".parse::<StaffRole>().unwrap(), StaffRole::Stylist);
        assert!("janitor".parse::<StaffRole>().is_err());
    }

    #[test]
    fn customers_cannot_pass_staff_checks() {
        let caller = Caller::Customer { id: 1 };
        assert!(matches!(caller.require_staff(&[]), Err(DomainError::Forbidden(_))));
        assert_eq!(caller.require_customer().unwrap(), 1);
    }

    #[test]
    fn staff_role_check_respects_allowed_roles() {
        let stylist = Caller::Staff { id: 3, role: StaffRole::Stylist };
        assert!(stylist.require_staff(&[]).is_ok());
        assert!(stylist
            .require_staff(&[StaffRole::Admin, StaffRole::Receptionist])
            .is_err());
        assert!(stylist.require_customer().is_err());
    }

    #[test]
    fn purchaser_columns_are_mutually_exclusive() {
        assert_eq!(Purchaser::Customer(5).columns(), (Some(5), None));
        assert_eq!(Purchaser::Staff(9).columns(), (None, Some(9)));
        assert_eq!(Purchaser::from_columns(None, None), None);
        assert_eq!(
            Purchaser::from_columns(None, Some(9)),
            Some(Purchaser::Staff(9))
        );
    }
}
