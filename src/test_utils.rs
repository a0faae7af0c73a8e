//! Shared test utilities for the order board.
//!
//! This module provides common helper functions for setting up an in-memory
//! store and creating test records with sensible defaults.

use crate::{
    core::{
        cart::{Cart, CartCandidate},
        directory::{self, NewAdministrator},
        menu::{self, NewMenu},
    },
    entities::{
        AdminRole, AdministratorModel, LineItem, LineItems, MenuCategory, MenuEntryModel,
        OrderModel, OrderStatus, order,
    },
    errors::Result,
    store::Store,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};

/// Pin given to every administrator created by [`create_test_admin`].
pub const TEST_PIN: &str = "1234";

/// Creates an in-memory `SQLite` database with all tables initialized and
/// opens a [`Store`] over it.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<Store> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Store::open(db).await
}

/// Routes `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("order_board=debug")
        .with_test_writer()
        .try_init();
}

/// Calendar day shorthand.
///
/// # Panics
/// On an impossible date.
#[allow(clippy::unwrap_used)]
pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// `date` at wall-clock `hh_mm`.
///
/// # Panics
/// On a malformed time.
#[allow(clippy::unwrap_used)]
pub fn at(date: NaiveDate, hh_mm: &str) -> NaiveDateTime {
    date.and_time(NaiveTime::parse_from_str(hh_mm, "%H:%M").unwrap())
}

/// Creates a menu through the normal menu operation.
///
/// # Defaults
/// * `store_name`: "Test Shop"
/// * `description`: empty
/// * `image_ref`: None
pub async fn create_test_menu(
    store: &Store,
    date: NaiveDate,
    category: MenuCategory,
    cutoff: Option<&str>,
) -> Result<MenuEntryModel> {
    menu::create_menu(
        store,
        NewMenu {
            menu_date: date,
            category,
            store_name: "Test Shop".to_string(),
            description: String::new(),
            cutoff_time: cutoff.map(ToString::to_string),
            image_ref: None,
        },
    )
    .await
}

/// Creates an administrator whose display name equals the username and whose
/// pin is [`TEST_PIN`].
pub async fn create_test_admin(
    store: &Store,
    username: &str,
    role: AdminRole,
) -> Result<AdministratorModel> {
    directory::create_administrator(
        store,
        NewAdministrator {
            username: username.to_string(),
            display_name: username.to_string(),
            pin: TEST_PIN.to_string(),
            role,
        },
    )
    .await
}

/// Line item of `quantity` units without a note.
pub fn line(name: &str, unit_price: i64, quantity: u32) -> LineItem {
    LineItem {
        item_name: name.to_string(),
        unit_price,
        note: String::new(),
        quantity,
    }
}

/// An unsaved meal order with a single line worth `amount`.
///
/// # Defaults
/// * status: Preparing, unpaid
/// * `category`: Meal
pub fn order_fixture(id: i64, requester: &str, amount: i64, date: NaiveDate) -> OrderModel {
    OrderModel {
        id,
        requester_name: requester.to_string(),
        line_items: LineItems(vec![line("Set Meal", amount, 1)]),
        total_amount: amount,
        combined_note: String::new(),
        status: OrderStatus::Preparing,
        is_paid: false,
        category: MenuCategory::Meal,
        order_date: date,
        created_at: Utc::now(),
    }
}

/// Inserts a meal order dated `date` directly, bypassing the cutoff check,
/// and re-publishes the orders snapshot.
pub async fn create_test_order(
    store: &Store,
    requester: &str,
    amount: i64,
    date: NaiveDate,
) -> Result<OrderModel> {
    let fixture = order_fixture(0, requester, amount, date);
    let model = order::ActiveModel {
        requester_name: Set(fixture.requester_name),
        line_items: Set(fixture.line_items),
        total_amount: Set(fixture.total_amount),
        combined_note: Set(fixture.combined_note),
        status: Set(fixture.status),
        is_paid: Set(fixture.is_paid),
        category: Set(fixture.category),
        order_date: Set(fixture.order_date),
        created_at: Set(fixture.created_at),
        ..Default::default()
    }
    .insert(store.db())
    .await?;
    store.orders.refresh(store.db()).await?;
    Ok(model)
}

/// A cart holding one unit of each `(name, price)`.
///
/// # Panics
/// If any entry is rejected by the cart.
#[allow(clippy::unwrap_used)]
pub fn cart_with(lines: &[(&str, i64)]) -> Cart {
    let mut cart = Cart::new();
    for &(name, price) in lines {
        cart.add_line(CartCandidate::new(name, price)).unwrap();
    }
    cart
}

/// Inserts an order row whose status no entity can decode. The row itself is
/// never read by id, but every full re-read of the orders collection fails
/// while it exists.
pub async fn insert_unreadable_order(store: &Store) -> Result<()> {
    let db = store.db();
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "INSERT INTO orders (requester_name, line_items, total_amount, combined_note, \
         status, is_paid, category, order_date, created_at) \
         VALUES ('Ghost', '[]', 0, '', 'lost', 0, 'meal', '2024-05-01', \
         '2024-05-01T00:00:00Z')",
    ))
    .await?;
    Ok(())
}
