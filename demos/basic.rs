//! Basic example showing how to use sea-orm-sqlcommenter.
//!
//! Run with: cargo run --example basic

use sea_orm::{ConnectionTrait, Database, Statement};
use sea_orm_sqlcommenter::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sea_orm_sqlcommenter=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/test".into());

    tracing::info!("Connecting to database...");

    let db = Database::connect(&database_url).await?;

    // Tags every statement with the application name and driver, and logs
    // each comment at DEBUG
    let db = db.with_sqlcommenter_config(
        CommenterConfig::development()
            .application("basic-example")
            .with_database_name("test"),
    );

    // SELECT 1 /*application='basic-example',db_driver='sea-orm:postgresql'*/
    db.execute(Statement::from_string(db.get_database_backend(), "SELECT 1"))
        .await?;

    // Per-query tags merge over the defaults, later tags win:
    // SELECT 1 /*application='basic-example',db_driver='sea-orm:postgresql',route='%2Fusers%2F42'*/
    let ctx = db.tag("route", "/users").tag("route", "/users/42");
    ctx.execute(Statement::from_string(db.get_database_backend(), "SELECT 1"))
        .await?;

    // Entities work the same way:
    //
    // let users = Users::find()
    //     .filter(users::Column::Active.eq(true))
    //     .all(&db.tag("controller", "users"))
    //     .await?;

    tracing::info!(comment = %SqlComment::tag("hello", "world"), "Rendered comment");

    Ok(())
}
