use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::feedback::{validate_rating, Feedback, NewFeedback};
use crate::domain::identity::Caller;
use crate::domain::ports::FeedbackRepository;

#[derive(Clone)]
pub struct FeedbackService {
    repo: Arc<dyn FeedbackRepository>,
}

impl FeedbackService {
    pub fn new(repo: Arc<dyn FeedbackRepository>) -> Self {
        Self { repo }
    }

    pub fn list_for_item(&self, item_id: i64) -> Result<Vec<Feedback>, DomainError> {
        self.repo.list_for_item(item_id)
    }

    pub fn submit(
        &self,
        caller: &Caller,
        item_id: i64,
        rating: i16,
        comments: Option<String>,
    ) -> Result<Feedback, DomainError> {
        validate_rating(rating)?;
        self.repo.create(NewFeedback {
            item_id,
            author: caller.purchaser(),
            rating,
            comments: comments.filter(|c| !c.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::identity::{Purchaser, StaffRole};
    use crate::domain::inventory::NewItem;
    use crate::domain::ports::InventoryRepository;
    use crate::infrastructure::memory::InMemoryStore;

    fn setup() -> (InMemoryStore, FeedbackService, i64) {
        let store = InMemoryStore::new();
        let item = InventoryRepository::create(
            &store,
            NewItem {
                name: "Beard Oil".to_string(),
                description: None,
                kind: "product".to_string(),
                quantity: 1,
                unit_price: BigDecimal::from(11),
            },
        )
        .unwrap();
        let svc = FeedbackService::new(Arc::new(store.clone()));
        (store, svc, item.id)
    }

    #[test]
    fn rating_must_be_between_one_and_five() {
        let (_, svc, item) = setup();
        let caller = Caller::Customer { id: 1 };
        assert!(svc.submit(&caller, item, 0, None).is_err());
        assert!(svc.submit(&caller, item, 6, None).is_err());
        assert!(svc.submit(&caller, item, 5, None).is_ok());
    }

    #[test]
    fn author_follows_caller_kind() {
        let (_, svc, item) = setup();
        let staff = Caller::Staff { id: 8, role: StaffRole::Stylist };
        let fb = svc
            .submit(&staff, item, 4, Some("great shine".to_string()))
            .unwrap();
        assert_eq!(fb.author, Some(Purchaser::Staff(8)));
        assert_eq!(fb.comments.as_deref(), Some("great shine"));
    }

    #[test]
    fn ratings_feed_product_average() {
        let (store, svc, item) = setup();
        for (id, rating) in [(1, 5), (2, 4), (3, 4)] {
            svc.submit(&Caller::Customer { id }, item, rating, None).unwrap();
        }
        let product = store.find_by_id(item).unwrap().unwrap();
        assert_eq!(product.average_rating, 4.3);
        assert_eq!(svc.list_for_item(item).unwrap().len(), 3);
    }

    #[test]
    fn unknown_item_is_not_found() {
        let (_, svc, _) = setup();
        assert!(matches!(
            svc.submit(&Caller::Customer { id: 1 }, 500, 3, None),
            Err(DomainError::NotFound(_))
        ));
    }
}
