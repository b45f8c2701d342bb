//! Category repository for category database operations.
//!
//! Categories with a null owner are global: visible to every user,
//! writable by none of them.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use cambio_core::exchange::types::{
    COMMISSION_CATEGORY_NAME, FROM_CATEGORY_NAME, TO_CATEGORY_NAME,
};
use cambio_core::exchange::ExchangeCategories;
use cambio_shared::types::CategoryId;

use crate::entities::{categories, sea_orm_active_enums::CategoryKind};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Parent category not found or not visible.
    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    /// Global categories are read-only to non-owning users.
    #[error("Global categories are read-only")]
    GlobalReadOnly,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Owning user; `None` creates a global category.
    pub user_id: Option<Uuid>,
    /// Category name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Description.
    pub description: String,
    /// Expense or income.
    pub kind: CategoryKind,
    /// Optional parent for tree structure.
    pub parent_id: Option<Uuid>,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// Category name.
    pub name: Option<String>,
    /// Display color.
    pub color: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Expense or income.
    pub kind: Option<CategoryKind>,
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent does not exist or is not visible to
    /// the owning user.
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        if let Some(parent_id) = input.parent_id {
            let parent = self.find_visible(input.user_id, parent_id).await?;
            if parent.is_none() {
                return Err(CategoryError::ParentNotFound(parent_id));
            }
        }

        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            color: Set(input.color),
            description: Set(input.description),
            kind: Set(input.kind),
            parent_id: Set(input.parent_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Lists the categories visible to a user: their own plus the global
    /// ones.
    pub async fn list_visible(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<categories::Model>, CategoryError> {
        Ok(categories::Entity::find()
            .filter(Self::visible_to(Some(user_id)))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Updates a category the user owns.
    ///
    /// # Errors
    ///
    /// Returns `GlobalReadOnly` when the category has no owner.
    pub async fn update(
        &self,
        user_id: Uuid,
        category_id: Uuid,
        input: UpdateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let category = self.find_owned(user_id, category_id).await?;

        let mut active: categories::ActiveModel = category.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(kind) = input.kind {
            active.kind = Set(kind);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a category the user owns.
    ///
    /// Transactions referencing the category keep existing with a null
    /// category; child categories are removed with their parent.
    pub async fn delete(&self, user_id: Uuid, category_id: Uuid) -> Result<(), CategoryError> {
        let category = self.find_owned(user_id, category_id).await?;
        let active: categories::ActiveModel = category.into();
        active.delete(&self.db).await?;
        Ok(())
    }

    /// Resolves the exchange auto-tagging categories by their exact names,
    /// among the categories visible to the user. Missing names resolve to
    /// `None` and leave the corresponding records untagged.
    pub async fn exchange_categories(
        &self,
        user_id: Uuid,
    ) -> Result<ExchangeCategories, CategoryError> {
        let names = [
            FROM_CATEGORY_NAME,
            TO_CATEGORY_NAME,
            COMMISSION_CATEGORY_NAME,
        ];
        let found = categories::Entity::find()
            .filter(Self::visible_to(Some(user_id)))
            .filter(categories::Column::Name.is_in(names))
            .all(&self.db)
            .await?;

        let by_name = |name: &str| {
            found
                .iter()
                .find(|category| category.name == name)
                .map(|category| CategoryId::from_uuid(category.id))
        };

        Ok(ExchangeCategories {
            from_leg: by_name(FROM_CATEGORY_NAME),
            to_leg: by_name(TO_CATEGORY_NAME),
            commission: by_name(COMMISSION_CATEGORY_NAME),
        })
    }

    /// Condition matching categories visible to the user (own + global).
    fn visible_to(user_id: Option<Uuid>) -> Condition {
        let mut condition = Condition::any().add(categories::Column::UserId.is_null());
        if let Some(user_id) = user_id {
            condition = condition.add(categories::Column::UserId.eq(user_id));
        }
        condition
    }

    async fn find_visible(
        &self,
        user_id: Option<Uuid>,
        category_id: Uuid,
    ) -> Result<Option<categories::Model>, CategoryError> {
        Ok(categories::Entity::find_by_id(category_id)
            .filter(Self::visible_to(user_id))
            .one(&self.db)
            .await?)
    }

    async fn find_owned(
        &self,
        user_id: Uuid,
        category_id: Uuid,
    ) -> Result<categories::Model, CategoryError> {
        let category = categories::Entity::find_by_id(category_id)
            .one(&self.db)
            .await?
            .ok_or(CategoryError::CategoryNotFound(category_id))?;

        match category.user_id {
            None => Err(CategoryError::GlobalReadOnly),
            Some(owner) if owner != user_id => Err(CategoryError::CategoryNotFound(category_id)),
            Some(_) => Ok(category),
        }
    }
}
