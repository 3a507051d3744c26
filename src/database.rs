use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use crate::error::ServiceResult;
use crate::models::{Account, Employee, Product, Session, Supply};

mod accounts;
mod employees;
#[cfg(test)]
pub mod memory;
mod migration;
mod products;
mod sessions;
mod supplies;

#[cfg(test)]
mod tests;

/// Persistence of user accounts.
///
/// `store_account` inserts when the id is `0` and updates the row with the given id otherwise.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn get_all_accounts(&self) -> ServiceResult<Vec<Account>>;
    async fn get_account_by_id(&self, id: u64) -> ServiceResult<Option<Account>>;
    async fn get_account_by_username(&self, username: &str) -> ServiceResult<Option<Account>>;
    async fn store_account(&self, account: Account) -> ServiceResult<Account>;
    async fn delete_account(&self, id: u64) -> ServiceResult<()>;
}

/// Persistence of menu products. Same store semantics as [`AccountRepository`].
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn get_all_products(&self) -> ServiceResult<Vec<Product>>;
    async fn get_product_by_id(&self, id: u64) -> ServiceResult<Option<Product>>;
    async fn store_product(&self, product: Product) -> ServiceResult<Product>;
    async fn delete_product(&self, id: u64) -> ServiceResult<()>;
}

/// Persistence of inventory supplies.
#[async_trait]
pub trait SupplyRepository: Send + Sync {
    async fn get_all_supplies(&self) -> ServiceResult<Vec<Supply>>;
    /// Supplies whose name contains `query`, ignoring case.
    async fn search_supplies(&self, query: &str) -> ServiceResult<Vec<Supply>>;
    async fn get_supply_by_id(&self, id: u64) -> ServiceResult<Option<Supply>>;
    async fn store_supply(&self, supply: Supply) -> ServiceResult<Supply>;
    async fn delete_supply(&self, id: u64) -> ServiceResult<()>;
}

/// Persistence of employees.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn get_all_employees(&self) -> ServiceResult<Vec<Employee>>;
    /// Employees whose name contains `query`, ignoring case.
    async fn search_employees(&self, query: &str) -> ServiceResult<Vec<Employee>>;
    async fn get_employee_by_id(&self, id: u64) -> ServiceResult<Option<Employee>>;
    async fn store_employee(&self, employee: Employee) -> ServiceResult<Employee>;
    async fn delete_employee(&self, id: u64) -> ServiceResult<()>;
}

/// Server side login sessions, identified by the token stored in the session cookie.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(
        &self,
        account: &Account,
        valid_until: DateTime<Utc>,
    ) -> ServiceResult<Session>;
    /// Expired sessions are removed and reported as absent.
    async fn get_session_by_token(&self, token: &str) -> ServiceResult<Option<Session>>;
    async fn delete_session(&self, token: &str) -> ServiceResult<()>;
    async fn delete_expired_sessions(&self) -> ServiceResult<()>;
}

/// Everything the web handlers need from the storage backend.
pub trait Storage:
    AccountRepository + ProductRepository + SupplyRepository + EmployeeRepository + SessionStore
{
}

impl<T> Storage for T where
    T: AccountRepository + ProductRepository + SupplyRepository + EmployeeRepository + SessionStore
{
}

/// PostgreSQL backed storage.
#[derive(Clone)]
pub struct Database {
    pub pool: Pool<Postgres>,
}

impl Database {
    pub async fn connect(url: &str) -> ServiceResult<Database> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        Database::from_pool(pool).await
    }

    /// Wrap an existing pool and bring its schema up to date.
    pub async fn from_pool(pool: Pool<Postgres>) -> ServiceResult<Database> {
        let migrator = Migrator::new(migration::postgresql_migrations()).await?;
        migrator.run(&pool).await?;
        log::debug!("Database migrations are up to date");

        Ok(Database { pool })
    }
}

/// Random, url safe session token.
pub(crate) fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::random();
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
