use std::sync::Arc;

use tokio::net::TcpListener;

mod database;
mod env;
mod error;
mod models;
mod request_state;
mod web;

use crate::database::Database;
use crate::error::ServiceResult;
use crate::web::AppState;

#[tokio::main]
async fn main() {
    let result = init().await;

    let exit_code = match result {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn init() -> ServiceResult<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Setup database connection, migrations run on connect
    let db = Database::connect(env::DATABASE_URL.as_str()).await?;
    let state = AppState::new(Arc::new(db))?;
    let app = web::router(state);

    let address = format!("{}:{}", env::API_HOST.as_str(), env::API_PORT.as_str());
    let listener = TcpListener::bind(&address).await?;
    log::info!("Start http server at {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
