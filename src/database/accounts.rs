use async_trait::async_trait;
use sqlx::FromRow;

use crate::error::{ServiceError, ServiceResult};
use crate::models::Account;

use super::{AccountRepository, Database};

#[derive(Debug, FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    password: String,
    image_url: Option<String>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id as u64,
            username: row.username,
            password: row.password,
            image_url: row.image_url,
        }
    }
}

#[async_trait]
impl AccountRepository for Database {
    async fn get_all_accounts(&self) -> ServiceResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, password, image_url FROM accounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn get_account_by_id(&self, id: u64) -> ServiceResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, password, image_url FROM accounts WHERE id = $1",
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from))
    }

    async fn get_account_by_username(&self, username: &str) -> ServiceResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, username, password, image_url FROM accounts WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from))
    }

    async fn store_account(&self, account: Account) -> ServiceResult<Account> {
        let row = if account.id == 0 {
            sqlx::query_as::<_, AccountRow>(
                r#"
                INSERT INTO accounts (username, password, image_url)
                VALUES ($1, $2, $3)
                RETURNING id, username, password, image_url
                "#,
            )
            .bind(&account.username)
            .bind(&account.password)
            .bind(&account.image_url)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, AccountRow>(
                r#"
                UPDATE accounts SET username = $2, password = $3, image_url = $4
                WHERE id = $1
                RETURNING id, username, password, image_url
                "#,
            )
            .bind(account.id as i64)
            .bind(&account.username)
            .bind(&account.password)
            .bind(&account.image_url)
            .fetch_optional(&self.pool)
            .await?
        };

        row.map(Account::from).ok_or(ServiceError::NotFound)
    }

    async fn delete_account(&self, id: u64) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id as i64)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }
}
