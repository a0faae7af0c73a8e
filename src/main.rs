use chrono::Local;
use dotenvy::dotenv;
use order_board::{
    config::{app, database},
    core::{
        board::{BoardSummary, spawn_board_watcher},
        directory, export,
        report::{DayFilter, orders_for_day_filter, to_export_rows},
    },
    errors::{Error, Result},
    store::Store,
};
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn log_board(summary: &BoardSummary) {
    for entry in &summary.categories {
        info!(
            category = ?entry.category,
            menu = entry.menu.as_ref().map_or("-", |m| m.store_name.as_str()),
            locked = entry.is_locked,
            orders = entry.totals.order_count,
            total = entry.totals.total_amount,
            unpaid = entry.totals.unpaid_count,
            "Board"
        );
    }
}

fn export_today(store: &Store, config: &app::AppConfig) -> Result<()> {
    let today = Local::now().date_naive();
    let orders = store.orders.current();
    let table = to_export_rows(orders_for_day_filter(&orders, DayFilter::Today, today));
    match export::write_csv_file(
        &table,
        &config.export_dir,
        &DayFilter::Today.export_filename(today),
    ) {
        Ok(path) => info!("Wrote end-of-day export to {}", path.display()),
        Err(Error::NothingToExport) => info!("No orders today, skipping export"),
        Err(e) => return Err(e),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let config = app::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Open the database and the store
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    let store = Store::open(db).await?;

    // 5. Seed the roster and the first administrator
    let seeded = directory::seed_roster(&store, &config.roster).await?;
    if seeded > 0 {
        info!("Seeded {} requesters from configuration", seeded);
    }
    match &config.bootstrap_admin {
        Some(bootstrap) => {
            if let Some(admin) = directory::ensure_bootstrap_admin(&store, bootstrap).await? {
                info!("Created bootstrap administrator {}", admin.username);
            }
        }
        None if store.administrators.current().is_empty() => {
            warn!("No administrators exist and no [bootstrap_admin] is configured");
        }
        None => {}
    }

    // 6. Keep the live board current until shutdown
    let (mut board, watcher) = spawn_board_watcher(
        &store,
        Duration::from_secs(config.board_refresh_secs.max(1)),
    );
    log_board(&board.borrow_and_update());

    loop {
        tokio::select! {
            changed = board.changed() => {
                if changed.is_err() {
                    break;
                }
                log_board(&board.borrow_and_update());
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutdown signal received");
                break;
            }
        }
    }

    // 7. Graceful shutdown
    watcher.abort();
    if let Err(e) = export_today(&store, &config) {
        error!("End-of-day export failed: {}", e);
    }
    store.close().await
}
