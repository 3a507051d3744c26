use async_trait::async_trait;
use sqlx::FromRow;

use crate::error::{ServiceError, ServiceResult};
use crate::models::Employee;

use super::{Database, EmployeeRepository};

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: i64,
    name: String,
    photo_url: Option<String>,
    role: String,
    age: i32,
    phone: String,
    active: bool,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id as u64,
            name: row.name,
            photo_url: row.photo_url,
            role: row.role,
            age: row.age,
            phone: row.phone,
            active: row.active,
        }
    }
}

#[async_trait]
impl EmployeeRepository for Database {
    async fn get_all_employees(&self) -> ServiceResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, name, photo_url, role, age, phone, active FROM employees ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn search_employees(&self, query: &str) -> ServiceResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, photo_url, role, age, phone, active FROM employees
            WHERE strpos(lower(name), lower($1)) > 0
            ORDER BY id
            "#,
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn get_employee_by_id(&self, id: u64) -> ServiceResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            "SELECT id, name, photo_url, role, age, phone, active FROM employees WHERE id = $1",
        )
        .bind(id as i64)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    async fn store_employee(&self, employee: Employee) -> ServiceResult<Employee> {
        let row = if employee.id == 0 {
            sqlx::query_as::<_, EmployeeRow>(
                r#"
                INSERT INTO employees (name, photo_url, role, age, phone, active)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, name, photo_url, role, age, phone, active
                "#,
            )
            .bind(&employee.name)
            .bind(&employee.photo_url)
            .bind(&employee.role)
            .bind(employee.age)
            .bind(&employee.phone)
            .bind(employee.active)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, EmployeeRow>(
                r#"
                UPDATE employees
                SET name = $2, photo_url = $3, role = $4, age = $5, phone = $6, active = $7
                WHERE id = $1
                RETURNING id, name, photo_url, role, age, phone, active
                "#,
            )
            .bind(employee.id as i64)
            .bind(&employee.name)
            .bind(&employee.photo_url)
            .bind(&employee.role)
            .bind(employee.age)
            .bind(&employee.phone)
            .bind(employee.active)
            .fetch_optional(&self.pool)
            .await?
        };

        row.map(Employee::from).ok_or(ServiceError::NotFound)
    }

    async fn delete_employee(&self, id: u64) -> ServiceResult<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id as i64)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound);
        }
        Ok(())
    }
}
