use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::ServiceResult;
use crate::models::{Account, Session};

use super::{generate_session_token, Database, SessionStore};

#[derive(Debug, FromRow)]
struct SessionRow {
    token: String,
    account_id: i64,
    account_username: String,
    valid_until: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            token: row.token,
            account_id: row.account_id as u64,
            account_username: row.account_username,
            valid_until: row.valid_until,
        }
    }
}

#[async_trait]
impl SessionStore for Database {
    async fn create_session(
        &self,
        account: &Account,
        valid_until: DateTime<Utc>,
    ) -> ServiceResult<Session> {
        self.delete_expired_sessions().await?;

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions (token, account_id, account_username, valid_until)
            VALUES ($1, $2, $3, $4)
            RETURNING token, account_id, account_username, valid_until
            "#,
        )
        .bind(generate_session_token())
        .bind(account.id as i64)
        .bind(&account.username)
        .bind(valid_until)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_session_by_token(&self, token: &str) -> ServiceResult<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT token, account_id, account_username, valid_until
            FROM sessions WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        match row.map(Session::from) {
            Some(session) if session.is_expired() => {
                self.delete_session(&session.token).await?;
                Ok(None)
            }
            session => Ok(session),
        }
    }

    async fn delete_session(&self, token: &str) -> ServiceResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE valid_until < now()")
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            log::debug!("Removed {} expired sessions", result.rows_affected());
        }
        Ok(())
    }
}
