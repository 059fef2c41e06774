//! Category model and system defaults
//!
//! Categories come in two flavors: a fixed read-only set of system defaults
//! shared by every owner, and owner-created custom categories. The two sets
//! are merged at read time. Referential integrity is soft: deleting a
//! category leaves referencing transactions in place, and reads fall back to
//! a placeholder name.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ids::{CategoryId, OwnerId};
use super::transaction::TransactionKind;

/// Placeholder name for transactions whose category no longer exists
pub const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Who a category belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryOwner {
    /// Shared read-only default, visible to every owner
    System,
    /// Owner-created custom category
    User(OwnerId),
}

/// A transaction category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// System default or owner-created
    pub owner: CategoryOwner,

    /// Category name
    pub name: String,

    /// Which transaction kind this category applies to
    pub kind: TransactionKind,

    /// Icon glyph for display
    pub icon: String,

    /// Display color (hex)
    pub color: String,
}

impl Category {
    /// Create a new owner-created category
    pub fn new_user(
        owner_id: OwnerId,
        name: impl Into<String>,
        kind: TransactionKind,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: CategoryId::new(),
            owner: CategoryOwner::User(owner_id),
            name: name.into(),
            kind,
            icon: icon.into(),
            color: color.into(),
        }
    }

    /// Check if this is a shared system default
    pub fn is_system(&self) -> bool {
        matches!(self.owner, CategoryOwner::System)
    }

    /// Check if this category is visible to the given owner
    pub fn visible_to(&self, owner_id: OwnerId) -> bool {
        match self.owner {
            CategoryOwner::System => true,
            CategoryOwner::User(id) => id == owner_id,
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }
        if self.kind == TransactionKind::Transfer {
            return Err(CategoryValidationError::TransferKind);
        }
        Ok(())
    }

    fn system(id_tag: u128, name: &str, kind: TransactionKind, icon: &str, color: &str) -> Self {
        Self {
            id: CategoryId::from_uuid(Uuid::from_u128(id_tag)),
            owner: CategoryOwner::System,
            name: name.to_string(),
            kind,
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.icon, self.name)
    }
}

// Fixed ids so the defaults are stable across processes and stores.
const SYSTEM_ID_BASE: u128 = 0x6c65_6467_6572_6b65_6570_0000_0000_0000;

/// The eight shared default categories, merged into every owner's listing
pub fn system_defaults() -> Vec<Category> {
    use TransactionKind::{Expense, Income};
    vec![
        Category::system(SYSTEM_ID_BASE + 1, "Food", Expense, "🍔", "#ef4444"),
        Category::system(SYSTEM_ID_BASE + 2, "Transport", Expense, "🚗", "#f97316"),
        Category::system(SYSTEM_ID_BASE + 3, "Housing", Expense, "🏠", "#eab308"),
        Category::system(SYSTEM_ID_BASE + 4, "Entertainment", Expense, "🎮", "#8b5cf6"),
        Category::system(SYSTEM_ID_BASE + 5, "Salary", Income, "💰", "#22c55e"),
        Category::system(SYSTEM_ID_BASE + 6, "Investment", Income, "📈", "#06b6d4"),
        Category::system(SYSTEM_ID_BASE + 7, "Other Income", Income, "➕", "#64748b"),
        Category::system(SYSTEM_ID_BASE + 8, "Other Expense", Expense, "➖", "#94a3b8"),
    ]
}

/// Look up a system default by name (test and seeding convenience)
pub fn system_category(name: &str) -> Option<Category> {
    system_defaults().into_iter().find(|c| c.name == name)
}

/// Resolve a category name, falling back to the placeholder for dangling ids
pub fn resolve_category_name(categories: &[Category], id: CategoryId) -> String {
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    TransferKind,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::TransferKind => {
                write!(f, "Categories must be income or expense categories")
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}
