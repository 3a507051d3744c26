use async_trait::async_trait;
use sqlx::FromRow;

use crate::error::{ServiceError, ServiceResult};
use crate::models::Product;

use super::{Database, ProductRepository};

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    image_url: Option<String>,
    price: i64,
    in_stock: bool,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id as u64,
            name: row.name,
            image_url: row.image_url,
            price: row.price,
            in_stock: row.in_stock,
        }
    }
}

#[async_trait]
impl ProductRepository for Database {
    async fn get_all_products(&self) -> ServiceResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, image_url, price, in_stock FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product_by_id(&self, id: u64) -> ServiceResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, image_url, price, in_stock FROM products WHERE id = $1",
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn store_product(&self, product: Product) -> ServiceResult<Product> {
        let row = if product.id == 0 {
            sqlx::query_as::<_, ProductRow>(
                r#"
                INSERT INTO products (name, image_url, price, in_stock)
                VALUES ($1, $2, $3, $4)
                RETURNING id, name, image_url, price, in_stock
                "#,
            )
            .bind(&product.name)
            .bind(&product.image_url)
            .bind(product.price)
            .bind(product.in_stock)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, ProductRow>(
                r#"
                UPDATE products SET name = $2, image_url = $3, price = $4, in_stock = $5
                WHERE id = $1
                RETURNING id, name, image_url, price, in_stock
                "#,
            )
            .bind(product.id as i64)
            .bind(&product.name)
            .bind(&product.image_url)
            .bind(product.price)
            .bind(product.in_stock)
            .fetch_optional(&self.pool)
            .await?
        };

        row.map(Product::from).ok_or(ServiceError::NotFound)
    }

    async fn delete_product(&self, id: u64) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id as i64)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }
}
