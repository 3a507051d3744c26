use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;

use crate::error::{ServiceError, ServiceResult};
use crate::models::Supply;

use super::{Database, SupplyRepository};

#[derive(Debug, FromRow)]
struct SupplyRow {
    id: i64,
    name: String,
    quantity: String,
    last_update: Option<String>,
    date: Option<NaiveDate>,
}

impl From<SupplyRow> for Supply {
    fn from(row: SupplyRow) -> Self {
        Supply {
            id: row.id as u64,
            name: row.name,
            quantity: row.quantity,
            last_update: row.last_update,
            date: row.date,
        }
    }
}

#[async_trait]
impl SupplyRepository for Database {
    async fn get_all_supplies(&self) -> ServiceResult<Vec<Supply>> {
        let rows = sqlx::query_as::<_, SupplyRow>(
            "SELECT id, name, quantity, last_update, date FROM supplies ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Supply::from).collect())
    }

    async fn search_supplies(&self, query: &str) -> ServiceResult<Vec<Supply>> {
        // strpos instead of ILIKE, the query must not be read as a pattern
        let rows = sqlx::query_as::<_, SupplyRow>(
            r#"
            SELECT id, name, quantity, last_update, date FROM supplies
            WHERE strpos(lower(name), lower($1)) > 0
            ORDER BY id
            "#,
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Supply::from).collect())
    }

    async fn get_supply_by_id(&self, id: u64) -> ServiceResult<Option<Supply>> {
        let row = sqlx::query_as::<_, SupplyRow>(
            "SELECT id, name, quantity, last_update, date FROM supplies WHERE id = $1",
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Supply::from))
    }

    async fn store_supply(&self, supply: Supply) -> ServiceResult<Supply> {
        let row = if supply.id == 0 {
            sqlx::query_as::<_, SupplyRow>(
                r#"
                INSERT INTO supplies (name, quantity, last_update, date)
                VALUES ($1, $2, $3, $4)
                RETURNING id, name, quantity, last_update, date
                "#,
            )
            .bind(&supply.name)
            .bind(&supply.quantity)
            .bind(&supply.last_update)
            .bind(supply.date)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, SupplyRow>(
                r#"
                UPDATE supplies SET name = $2, quantity = $3, last_update = $4, date = $5
                WHERE id = $1
                RETURNING id, name, quantity, last_update, date
                "#,
            )
            .bind(supply.id as i64)
            .bind(&supply.name)
            .bind(&supply.quantity)
            .bind(&supply.last_update)
            .bind(supply.date)
            .fetch_optional(&self.pool)
            .await?
        };

        row.map(Supply::from).ok_or(ServiceError::NotFound)
    }

    async fn delete_supply(&self, id: u64) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM supplies WHERE id = $1")
            .bind(id as i64)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }
}
