use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::identity::{Caller, StaffRole};
use crate::domain::inventory::{InventoryItem, ItemPatch, NewItem, ProductView};
use crate::domain::ports::InventoryRepository;

/// Roles allowed to change the catalog.
const CATALOG_ROLES: &[StaffRole] = &[StaffRole::Admin, StaffRole::Receptionist];

#[derive(Clone)]
pub struct InventoryService {
    repo: Arc<dyn InventoryRepository>,
}

impl InventoryService {
    pub fn new(repo: Arc<dyn InventoryRepository>) -> Self {
        Self { repo }
    }

    pub fn list_products(&self) -> Result<Vec<ProductView>, DomainError> {
        self.repo.list()
    }

    pub fn get_product(&self, id: i64) -> Result<ProductView, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("Item {id}")))
    }

    pub fn create_product(&self, caller: &Caller, item: NewItem) -> Result<InventoryItem, DomainError> {
        caller.require_staff(CATALOG_ROLES)?;
        item.validate()?;
        let created = self.repo.create(item)?;
        log::info!("Item {} '{}' created with stock {}", created.id, created.name, created.quantity);
        Ok(created)
    }

    /// Partial update; setting `quantity` is how stock is replenished.
    pub fn update_product(
        &self,
        caller: &Caller,
        id: i64,
        patch: ItemPatch,
    ) -> Result<InventoryItem, DomainError> {
        caller.require_staff(CATALOG_ROLES)?;
        patch.validate()?;
        let updated = self
            .repo
            .update(id, patch)?
            .ok_or_else(|| DomainError::not_found(format!("Item {id}")))?;
        log::info!("Item {} updated, stock now {}", updated.id, updated.quantity);
        Ok(updated)
    }

    /// Fails with `Conflict` while any order references the item.
    pub fn delete_product(&self, caller: &Caller, id: i64) -> Result<(), DomainError> {
        caller.require_staff(CATALOG_ROLES)?;
        if !self.repo.delete(id)? {
            return Err(DomainError::not_found(format!("Item {id}")));
        }
        log::info!("Item {id} deleted");
        Ok(())
    }
}
