//! In-memory storage with the same observable behavior as [`Database`](super::Database),
//! used to drive the web handlers in tests without a PostgreSQL server.
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Account, Employee, Product, Session, Supply};

use super::{
    generate_session_token, AccountRepository, EmployeeRepository, ProductRepository,
    SessionStore, SupplyRepository,
};

struct Table<T> {
    last_id: u64,
    rows: BTreeMap<u64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Table {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn get(&self, id: u64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn replace(&mut self, id: u64, row: T) -> ServiceResult<T> {
        match self.rows.get_mut(&id) {
            Some(existing) => {
                *existing = row.clone();
                Ok(row)
            }
            None => Err(ServiceError::NotFound),
        }
    }

    fn delete(&mut self, id: u64) -> ServiceResult<()> {
        self.rows.remove(&id).map(|_| ()).ok_or(ServiceError::NotFound)
    }
}

fn name_contains(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

#[derive(Default)]
pub struct MemoryDatabase {
    accounts: Mutex<Table<Account>>,
    products: Mutex<Table<Product>>,
    supplies: Mutex<Table<Supply>>,
    employees: Mutex<Table<Employee>>,
    sessions: Mutex<HashMap<String, Session>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryDatabase {
    async fn get_all_accounts(&self) -> ServiceResult<Vec<Account>> {
        Ok(self.accounts.lock().await.all())
    }

    async fn get_account_by_id(&self, id: u64) -> ServiceResult<Option<Account>> {
        Ok(self.accounts.lock().await.get(id))
    }

    async fn get_account_by_username(&self, username: &str) -> ServiceResult<Option<Account>> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .rows
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn store_account(&self, mut account: Account) -> ServiceResult<Account> {
        let mut accounts = self.accounts.lock().await;

        let taken = accounts
            .rows
            .values()
            .any(|a| a.username == account.username && a.id != account.id);
        if taken {
            return Err(ServiceError::Conflict(format!(
                "duplicate username '{}'",
                account.username
            )));
        }

        if account.id == 0 {
            account.id = accounts.next_id();
            accounts.rows.insert(account.id, account.clone());
            return Ok(account);
        }
        accounts.replace(account.id, account)
    }

    async fn delete_account(&self, id: u64) -> ServiceResult<()> {
        self.accounts.lock().await.delete(id)
    }
}

#[async_trait]
impl ProductRepository for MemoryDatabase {
    async fn get_all_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.lock().await.all())
    }

    async fn get_product_by_id(&self, id: u64) -> ServiceResult<Option<Product>> {
        Ok(self.products.lock().await.get(id))
    }

    async fn store_product(&self, mut product: Product) -> ServiceResult<Product> {
        let mut products = self.products.lock().await;
        if product.id == 0 {
            product.id = products.next_id();
            products.rows.insert(product.id, product.clone());
            return Ok(product);
        }
        products.replace(product.id, product)
    }

    async fn delete_product(&self, id: u64) -> ServiceResult<()> {
        self.products.lock().await.delete(id)
    }
}

#[async_trait]
impl SupplyRepository for MemoryDatabase {
    async fn get_all_supplies(&self) -> ServiceResult<Vec<Supply>> {
        Ok(self.supplies.lock().await.all())
    }

    async fn search_supplies(&self, query: &str) -> ServiceResult<Vec<Supply>> {
        let supplies = self.supplies.lock().await;
        Ok(supplies
            .rows
            .values()
            .filter(|s| name_contains(&s.name, query))
            .cloned()
            .collect())
    }

    async fn get_supply_by_id(&self, id: u64) -> ServiceResult<Option<Supply>> {
        Ok(self.supplies.lock().await.get(id))
    }

    async fn store_supply(&self, mut supply: Supply) -> ServiceResult<Supply> {
        let mut supplies = self.supplies.lock().await;
        if supply.id == 0 {
            supply.id = supplies.next_id();
            supplies.rows.insert(supply.id, supply.clone());
            return Ok(supply);
        }
        supplies.replace(supply.id, supply)
    }

    async fn delete_supply(&self, id: u64) -> ServiceResult<()> {
        self.supplies.lock().await.delete(id)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryDatabase {
    async fn get_all_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.employees.lock().await.all())
    }

    async fn search_employees(&self, query: &str) -> ServiceResult<Vec<Employee>> {
        let employees = self.employees.lock().await;
        Ok(employees
            .rows
            .values()
            .filter(|e| name_contains(&e.name, query))
            .cloned()
            .collect())
    }

    async fn get_employee_by_id(&self, id: u64) -> ServiceResult<Option<Employee>> {
        Ok(self.employees.lock().await.get(id))
    }

    async fn store_employee(&self, mut employee: Employee) -> ServiceResult<Employee> {
        let mut employees = self.employees.lock().await;
        if employee.id == 0 {
            employee.id = employees.next_id();
            employees.rows.insert(employee.id, employee.clone());
            return Ok(employee);
        }
        employees.replace(employee.id, employee)
    }

    async fn delete_employee(&self, id: u64) -> ServiceResult<()> {
        self.employees.lock().await.delete(id)
    }
}

#[async_trait]
impl SessionStore for MemoryDatabase {
    async fn create_session(
        &self,
        account: &Account,
        valid_until: DateTime<Utc>,
    ) -> ServiceResult<Session> {
        self.delete_expired_sessions().await?;

        let session = Session {
            token: generate_session_token(),
            account_id: account.id,
            account_username: account.username.clone(),
            valid_until,
        };
        self.sessions
            .lock()
            .await
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn get_session_by_token(&self, token: &str) -> ServiceResult<Option<Session>> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get(token).cloned() {
            Some(session) if session.is_expired() => {
                sessions.remove(token);
                Ok(None)
            }
            session => Ok(session),
        }
    }

    async fn delete_session(&self, token: &str) -> ServiceResult<()> {
        self.sessions.lock().await.remove(token);
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> ServiceResult<()> {
        self.sessions
            .lock()
            .await
            .retain(|_, session| !session.is_expired());
        Ok(())
    }
}
