//! Category service
//!
//! Owner-created categories layered over the fixed system defaults.
//! Deletion is soft: transactions keep referencing a deleted category and
//! reads resolve it to a placeholder name, so nothing cascades and nothing
//! blocks.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, OwnerId, TransactionKind};
use crate::store::LedgerStore;

/// Service for category management
pub struct CategoryService<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
}

/// Input for creating a new category
#[derive(Debug, Clone)]
pub struct CreateCategory {
    pub owner_id: OwnerId,
    pub name: String,
    pub kind: TransactionKind,
    pub icon: String,
    pub color: String,
}

impl<'a, S: LedgerStore + ?Sized> CategoryService<'a, S> {
    /// Create a new category service
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// List categories visible to an owner: system defaults first, then the
    /// owner's custom categories
    pub fn list(&self, owner_id: OwnerId) -> LedgerResult<Vec<Category>> {
        Ok(self.store.categories(owner_id)?)
    }

    /// Create an owner-level custom category
    pub fn create(&self, input: CreateCategory) -> LedgerResult<Category> {
        let category = Category::new_user(
            input.owner_id,
            input.name,
            input.kind,
            input.icon,
            input.color,
        );
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;
        self.store.upsert_category(category.clone())?;
        Ok(category)
    }

    /// Delete a custom category
    ///
    /// Referencing transactions are left untouched; they render under the
    /// placeholder name from then on.
    pub fn delete(&self, owner_id: OwnerId, id: CategoryId) -> LedgerResult<()> {
        let categories = self.store.categories(owner_id)?;
        let category = categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| LedgerError::category_not_found(id.to_string()))?;
        if category.is_system() {
            return Err(LedgerError::Validation(
                "System categories cannot be deleted".into(),
            ));
        }
        self.store.delete_category(owner_id, id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{resolve_category_name, system_defaults, UNKNOWN_CATEGORY};
    use crate::store::MemoryStore;

    fn create_input(owner_id: OwnerId, name: &str) -> CreateCategory {
        CreateCategory {
            owner_id,
            name: name.into(),
            kind: TransactionKind::Expense,
            icon: "🐕".into(),
            color: "#10b981".into(),
        }
    }

    #[test]
    fn test_list_merges_defaults_and_custom() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let service = CategoryService::new(&store);

        service.create(create_input(owner, "Pets")).unwrap();

        let listed = service.list(owner).unwrap();
        assert_eq!(listed.len(), 9);
        assert!(listed[..8].iter().all(|c| c.is_system()));
        assert_eq!(listed[8].name, "Pets");
    }

    #[test]
    fn test_create_validates() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let service = CategoryService::new(&store);

        let empty = service.create(create_input(owner, ""));
        assert!(matches!(empty, Err(LedgerError::Validation(_))));

        let mut transfer = create_input(owner, "Moves");
        transfer.kind = TransactionKind::Transfer;
        assert!(matches!(
            service.create(transfer),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn test_delete_is_soft() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let service = CategoryService::new(&store);

        let category = service.create(create_input(owner, "Pets")).unwrap();
        service.delete(owner, category.id).unwrap();

        // The id now resolves to the placeholder
        let remaining = service.list(owner).unwrap();
        assert_eq!(remaining.len(), 8);
        assert_eq!(
            resolve_category_name(&remaining, category.id),
            UNKNOWN_CATEGORY
        );
    }

    #[test]
    fn test_system_categories_cannot_be_deleted() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let service = CategoryService::new(&store);

        let result = service.delete(owner, system_defaults()[0].id);
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_delete_missing_category() {
        let store = MemoryStore::new();
        let owner = OwnerId::new();
        let service = CategoryService::new(&store);

        assert!(service
            .delete(owner, CategoryId::new())
            .unwrap_err()
            .is_not_found());
    }
}
