//! Account repository for chart of accounts database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use corebook_core::accounts::{
    build_tree, next_code, Account, AccountNature, AccountType, TreeOutcome,
};
use corebook_shared::types::AccountId;

use crate::entities::accounts;
use crate::entities::journal_postings;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Cannot delete an account that postings reference.
    #[error("Account {code} has {count} postings and cannot be deleted")]
    HasPostings {
        /// The account code.
        code: String,
        /// Number of postings referencing the account.
        count: u64,
    },

    /// Account type is immutable once the account has postings.
    #[error("Cannot change account type for '{0}': account has postings")]
    TypeChangeNotAllowed(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code; auto-assigned from the siblings when omitted.
    pub code: Option<String>,
    /// Display name.
    pub name: String,
    /// Secondary localized display name.
    pub name_alt: Option<String>,
    /// Account classification.
    pub account_type: AccountType,
    /// Balance side; derived from the type when omitted, explicit for
    /// contra accounts.
    pub nature: Option<AccountNature>,
    /// Parent account code for tree placement.
    pub parent_code: Option<String>,
    /// Opening balance carried in from before the ledger went live.
    pub opening_balance: Decimal,
    /// Whether manual journal entries may target the account.
    pub allow_manual_entry: bool,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New display name.
    pub name: Option<String>,
    /// New secondary name (outer None = unchanged, inner None = clear).
    pub name_alt: Option<Option<String>>,
    /// New parent code (outer None = unchanged, inner None = make root).
    pub parent_code: Option<Option<String>>,
    /// New account type; only allowed while the account has no postings.
    pub account_type: Option<AccountType>,
    /// New nature.
    pub nature: Option<AccountNature>,
    /// Whether manual journal entries may target the account.
    pub allow_manual_entry: Option<bool>,
    /// Whether the account is active.
    pub is_active: Option<bool>,
}

/// Account repository for chart-of-accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Resolves an account code to its id.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` for an unknown code.
    pub async fn resolve(&self, code: &str) -> Result<AccountId, AccountError> {
        let account = self.require_by_code(code).await?;
        Ok(AccountId::from_uuid(account.id))
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    /// Creates a new account, auto-assigning the code when omitted.
    ///
    /// The nature defaults from the account type; passing an explicit
    /// nature is the contra-account override.
    ///
    /// # Errors
    ///
    /// Returns an error if the code already exists or the parent is
    /// unknown.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let parent = match &input.parent_code {
            Some(parent_code) => Some(
                self.find_by_code(parent_code)
                    .await?
                    .ok_or_else(|| AccountError::ParentNotFound(parent_code.clone()))?,
            ),
            None => None,
        };
        let parent_id = parent.as_ref().map(|p| p.id);

        let code = match input.code {
            Some(code) => code,
            None => {
                let siblings = self.sibling_codes(parent_id).await?;
                next_code(input.parent_code.as_deref(), &siblings)
            }
        };

        if self.find_by_code(&code).await?.is_some() {
            return Err(AccountError::DuplicateCode(code));
        }

        let nature = input
            .nature
            .unwrap_or_else(|| input.account_type.default_nature());
        let now = chrono::Utc::now().into();

        let account = accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            code: Set(code),
            name: Set(input.name),
            name_alt: Set(input.name_alt),
            account_type: Set(input.account_type.into()),
            nature: Set(nature.into()),
            parent_id: Set(parent_id),
            opening_balance: Set(input.opening_balance),
            allow_manual_entry: Set(input.allow_manual_entry),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Updates an account (rename, reparent, toggle flags).
    ///
    /// # Errors
    ///
    /// Returns an error if the account or new parent is unknown, or when
    /// changing the type of an account that already has postings.
    pub async fn update_account(
        &self,
        code: &str,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.require_by_code(code).await?;

        if let Some(new_type) = input.account_type {
            let current: AccountType = account.account_type.into();
            if new_type != current && self.count_postings(account.id).await? > 0 {
                return Err(AccountError::TypeChangeNotAllowed(code.to_string()));
            }
        }

        let new_parent_id = match &input.parent_code {
            None => None,
            Some(None) => Some(None),
            Some(Some(parent_code)) => {
                let parent = self
                    .find_by_code(parent_code)
                    .await?
                    .ok_or_else(|| AccountError::ParentNotFound(parent_code.clone()))?;
                Some(Some(parent.id))
            }
        };

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(name_alt) = input.name_alt {
            active.name_alt = Set(name_alt);
        }
        if let Some(parent_id) = new_parent_id {
            active.parent_id = Set(parent_id);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type.into());
        }
        if let Some(nature) = input.nature {
            active.nature = Set(nature.into());
        }
        if let Some(allow_manual_entry) = input.allow_manual_entry {
            active.allow_manual_entry = Set(allow_manual_entry);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account that has no postings.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::HasPostings` when any posting references the
    /// account.
    pub async fn delete_account(&self, code: &str) -> Result<(), AccountError> {
        let account = self.require_by_code(code).await?;

        let count = self.count_postings(account.id).await?;
        if count > 0 {
            return Err(AccountError::HasPostings {
                code: code.to_string(),
                count,
            });
        }

        accounts::Entity::delete_by_id(account.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Returns the full chart of accounts assembled into trees.
    ///
    /// Accounts with unresolvable parent pointers are promoted to roots and
    /// reported in the outcome (and by the reconciliation audit).
    ///
    /// # Errors
    ///
    /// Returns the underlying database error.
    pub async fn tree(&self) -> Result<TreeOutcome, AccountError> {
        let rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?;

        Ok(build_tree(rows.into_iter().map(to_domain).collect()))
    }

    /// Lists all accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error.
    pub async fn list(&self) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Counts the postings referencing an account.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error.
    pub async fn count_postings(&self, account_id: Uuid) -> Result<u64, AccountError> {
        Ok(journal_postings::Entity::find()
            .filter(journal_postings::Column::AccountId.eq(account_id))
            .count(&self.db)
            .await?)
    }

    async fn require_by_code(&self, code: &str) -> Result<accounts::Model, AccountError> {
        self.find_by_code(code)
            .await?
            .ok_or_else(|| AccountError::NotFound(code.to_string()))
    }

    async fn sibling_codes(&self, parent_id: Option<Uuid>) -> Result<Vec<String>, AccountError> {
        let mut query = accounts::Entity::find();
        query = match parent_id {
            Some(id) => query.filter(accounts::Column::ParentId.eq(id)),
            None => query.filter(accounts::Column::ParentId.is_null()),
        };
        Ok(query
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| a.code)
            .collect())
    }
}

/// Maps an account row to the core domain type.
#[must_use]
pub fn to_domain(model: accounts::Model) -> Account {
    Account {
        id: AccountId::from_uuid(model.id),
        code: model.code,
        name: model.name,
        name_alt: model.name_alt,
        account_type: model.account_type.into(),
        nature: model.nature.into(),
        parent_id: model.parent_id.map(AccountId::from_uuid),
        opening_balance: model.opening_balance,
        allow_manual_entry: model.allow_manual_entry,
        is_active: model.is_active,
    }
}
