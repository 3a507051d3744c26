use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

use crate::error::ServiceError;
use crate::models::{Account, Employee, Product, Supply};

use super::{
    AccountRepository, Database, EmployeeRepository, ProductRepository, SessionStore,
    SupplyRepository,
};

fn account(username: &str) -> Account {
    Account {
        id: 0,
        username: username.to_string(),
        password: "secret".to_string(),
        image_url: None,
    }
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_account_crud(pool: PgPool) {
    let db = Database::from_pool(pool).await.unwrap();

    let ana = db.store_account(account("ana")).await.unwrap();
    assert!(ana.id != 0);
    let mut bob = account("bob");
    bob.image_url = Some("https://example.org/bob.png".to_string());
    let bob = db.store_account(bob).await.unwrap();

    assert_eq!(db.get_all_accounts().await.unwrap(), vec![ana.clone(), bob.clone()]);
    assert_eq!(db.get_account_by_id(ana.id).await.unwrap(), Some(ana.clone()));
    assert_eq!(
        db.get_account_by_username("bob").await.unwrap(),
        Some(bob.clone())
    );
    assert_eq!(db.get_account_by_username("carl").await.unwrap(), None);
    assert_eq!(db.get_account_by_id(123213).await.unwrap(), None);

    // usernames are unique
    assert!(matches!(
        db.store_account(account("ana")).await,
        Err(ServiceError::Conflict(_))
    ));

    let mut renamed = ana.clone();
    renamed.username = "ana maria".to_string();
    renamed.password = "other".to_string();
    let renamed = db.store_account(renamed).await.unwrap();
    assert_eq!(db.get_account_by_id(ana.id).await.unwrap(), Some(renamed));

    db.delete_account(ana.id).await.unwrap();
    assert_eq!(db.get_account_by_id(ana.id).await.unwrap(), None);
    assert_eq!(db.delete_account(ana.id).await, Err(ServiceError::NotFound));
    assert_eq!(db.get_all_accounts().await.unwrap(), vec![bob]);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_product_crud(pool: PgPool) {
    let db = Database::from_pool(pool).await.unwrap();

    let product = db
        .store_product(Product {
            id: 0,
            name: "Empanada".to_string(),
            image_url: None,
            price: 2500,
            in_stock: true,
        })
        .await
        .unwrap();

    let mut sold_out = product.clone();
    sold_out.in_stock = false;
    sold_out.price = 1_000_000;
    let sold_out = db.store_product(sold_out).await.unwrap();
    assert_eq!(
        db.get_product_by_id(product.id).await.unwrap(),
        Some(sold_out.clone())
    );

    let mut missing = sold_out.clone();
    missing.id = 4242;
    assert_eq!(db.store_product(missing).await, Err(ServiceError::NotFound));

    db.delete_product(product.id).await.unwrap();
    assert!(db.get_all_products().await.unwrap().is_empty());
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_supply_search(pool: PgPool) {
    let db = Database::from_pool(pool).await.unwrap();

    for name in ["Harina", "Azúcar", "Harina integral", "100% cacao"] {
        db.store_supply(Supply {
            id: 0,
            name: name.to_string(),
            quantity: "15 KG".to_string(),
            last_update: None,
            date: NaiveDate::from_ymd_opt(2025, 8, 27),
        })
        .await
        .unwrap();
    }

    let names = |supplies: Vec<Supply>| supplies.into_iter().map(|s| s.name).collect::<Vec<_>>();

    assert_eq!(
        names(db.search_supplies("hari").await.unwrap()),
        vec!["Harina", "Harina integral"]
    );
    assert_eq!(
        names(db.search_supplies("HARI").await.unwrap()),
        vec!["Harina", "Harina integral"]
    );
    assert_eq!(names(db.search_supplies("%").await.unwrap()), vec!["100% cacao"]);
    assert!(db.search_supplies("sal").await.unwrap().is_empty());
    assert_eq!(db.get_all_supplies().await.unwrap().len(), 4);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_employee_crud(pool: PgPool) {
    let db = Database::from_pool(pool).await.unwrap();

    let employee = db
        .store_employee(Employee {
            id: 0,
            name: "Lucía Pérez".to_string(),
            photo_url: None,
            role: "Chef".to_string(),
            age: 31,
            phone: "+56 9 1234 5678".to_string(),
            active: true,
        })
        .await
        .unwrap();

    assert_eq!(
        db.search_employees("lucía").await.unwrap(),
        vec![employee.clone()]
    );

    let mut inactive = employee.clone();
    inactive.active = false;
    db.store_employee(inactive.clone()).await.unwrap();
    assert_eq!(
        db.get_employee_by_id(employee.id).await.unwrap(),
        Some(inactive)
    );

    db.delete_employee(employee.id).await.unwrap();
    assert_eq!(
        db.delete_employee(employee.id).await,
        Err(ServiceError::NotFound)
    );
}

#[sqlx::test(migrations = false)]
#[ignore = "requires database"]
async fn test_session_lifecycle(pool: PgPool) {
    let db = Database::from_pool(pool).await.unwrap();
    let ana = db.store_account(account("ana")).await.unwrap();

    let session = db
        .create_session(&ana, Utc::now() + Duration::minutes(30))
        .await
        .unwrap();
    assert_eq!(session.account_id, ana.id);
    assert_eq!(session.account_username, "ana");

    let loaded = db.get_session_by_token(&session.token).await.unwrap();
    assert_eq!(loaded.map(|s| s.account_id), Some(ana.id));

    db.delete_session(&session.token).await.unwrap();
    assert_eq!(db.get_session_by_token(&session.token).await.unwrap(), None);

    let expired = db
        .create_session(&ana, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();
    assert_eq!(db.get_session_by_token(&expired.token).await.unwrap(), None);
}
