//! Order submission business logic - Turns a cart into a persisted order.
//!
//! Preconditions are checked in a fixed order and the first failure wins. The
//! lock state is checked again here even if the caller already did, because
//! the clock may have passed the cutoff in between. A failed submission leaves
//! the cart untouched and writes nothing.

use crate::{
    core::{cart::Cart, menu},
    entities::{LineItems, MenuCategory, OrderStatus, menu_entry, order},
    errors::{Error, Result},
    store::Store,
};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, Set};
use tracing::{info, instrument, warn};

/// Checks every submission precondition without touching the store.
///
/// `menu` is the menu resolved for today's date and `category`.
pub fn validate_submission(
    cart: &Cart,
    requester_name: &str,
    category: MenuCategory,
    menu: Option<&menu_entry::Model>,
    now: NaiveDateTime,
) -> Result<()> {
    if requester_name.trim().is_empty() {
        return Err(Error::MissingRequester);
    }
    if cart.is_empty() {
        return Err(Error::EmptyCart);
    }
    if menu::is_locked(menu, now) {
        return Err(Error::OrderingClosed { category });
    }
    Ok(())
}

/// Submits `cart` for `requester_name` against today's `category` menu.
///
/// `now` is local wall-clock time; its date becomes the order's date.
/// On success the cart is cleared and the new order returned.
#[instrument(skip(store, cart), fields(lines = cart.len()))]
pub async fn submit_order(
    store: &Store,
    cart: &mut Cart,
    requester_name: &str,
    category: MenuCategory,
    now: NaiveDateTime,
) -> Result<order::Model> {
    let today = now.date();
    let menus = store.menus.current();
    let resolved = menu::resolve_menu(&menus, today, category);

    if let Err(e) = validate_submission(cart, requester_name, category, resolved, now) {
        warn!("Rejected submission for '{}': {}", requester_name, e);
        return Err(e);
    }

    let line_items = LineItems(cart.lines().iter().map(|line| line.to_line_item()).collect());
    let total_amount = cart.total();

    let order = order::ActiveModel {
        requester_name: Set(requester_name.trim().to_string()),
        line_items: Set(line_items),
        total_amount: Set(total_amount),
        combined_note: Set(cart.combined_note()),
        status: Set(OrderStatus::Preparing),
        is_paid: Set(false),
        category: Set(category),
        order_date: Set(today),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(store.db())
    .await?;

    info!(
        "Order {} submitted for '{}' ({:?}, total {})",
        order.id, order.requester_name, category, total_amount
    );
    cart.clear();
    store.orders.publish(store.db()).await;
    Ok(order)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::cart::CartCandidate;
    use crate::test_utils::*;
    use sea_orm::EntityTrait;

    #[test]
    fn test_validation_order_first_failure_wins() {
        let empty = Cart::new();
        let now = at(day(2024, 5, 1), "12:00");
        // Missing requester is reported before the empty cart and the closed menu
        assert!(matches!(
            validate_submission(&empty, "", MenuCategory::Meal, None, now),
            Err(Error::MissingRequester)
        ));
        assert!(matches!(
            validate_submission(&empty, "Alice", MenuCategory::Meal, None, now),
            Err(Error::EmptyCart)
        ));
        let cart = cart_with(&[("Soup", 30)]);
        assert!(matches!(
            validate_submission(&cart, "Alice", MenuCategory::Meal, None, now),
            Err(Error::OrderingClosed {
                category: MenuCategory::Meal
            })
        ));
    }

    #[tokio::test]
    async fn test_submit_order_freezes_totals() -> Result<()> {
        let store = setup_test_db().await?;
        let today = day(2024, 5, 1);
        create_test_menu(&store, today, MenuCategory::Meal, Some("10:00")).await?;

        let mut cart = Cart::new();
        cart.add_line(CartCandidate::new("Fried Rice", 80).with_note("extra egg"))?;
        cart.add_line(CartCandidate::new("Soup", 30))?;

        let order = submit_order(
            &store,
            &mut cart,
            "Alice",
            MenuCategory::Meal,
            at(today, "09:30"),
        )
        .await?;

        assert_eq!(order.total_amount, 110);
        assert_eq!(order.status, OrderStatus::Preparing);
        assert!(!order.is_paid);
        assert_eq!(order.order_date, today);
        assert_eq!(order.requester_name, "Alice");
        assert_eq!(order.combined_note, "extra egg");
        assert_eq!(order.line_items.0.len(), 2);
        assert_eq!(order.line_items.0[0].item_name, "Fried Rice");
        assert!(cart.is_empty());

        let snapshot = store.orders.current();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0], order);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_empty_cart_creates_nothing() -> Result<()> {
        let store = setup_test_db().await?;
        let today = day(2024, 5, 1);
        create_test_menu(&store, today, MenuCategory::Meal, None).await?;

        let mut cart = Cart::new();
        let result = submit_order(
            &store,
            &mut cart,
            "Alice",
            MenuCategory::Meal,
            at(today, "09:00"),
        )
        .await;
        assert!(matches!(result, Err(Error::EmptyCart)));
        assert!(store.orders.current().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_after_cutoff_keeps_cart() -> Result<()> {
        let store = setup_test_db().await?;
        let today = day(2024, 5, 1);
        create_test_menu(&store, today, MenuCategory::Drink, Some("10:00")).await?;

        let mut cart = cart_with(&[("Milk Tea", 50)]);
        let result = submit_order(
            &store,
            &mut cart,
            "Bob",
            MenuCategory::Drink,
            at(today, "10:01"),
        )
        .await;
        assert!(matches!(result, Err(Error::OrderingClosed { .. })));
        assert_eq!(cart.len(), 1);
        assert!(store.orders.current().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_without_menu_is_closed() -> Result<()> {
        let store = setup_test_db().await?;
        let today = day(2024, 5, 1);
        // Yesterday's menu does not count for today
        create_test_menu(&store, day(2024, 4, 30), MenuCategory::Meal, None).await?;

        let mut cart = cart_with(&[("Soup", 30)]);
        let result = submit_order(
            &store,
            &mut cart,
            "Alice",
            MenuCategory::Meal,
            at(today, "08:00"),
        )
        .await;
        assert!(matches!(result, Err(Error::OrderingClosed { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_missing_requester() -> Result<()> {
        let store = setup_test_db().await?;
        let today = day(2024, 5, 1);
        create_test_menu(&store, today, MenuCategory::Meal, None).await?;

        let mut cart = cart_with(&[("Soup", 30)]);
        let result = submit_order(
            &store,
            &mut cart,
            "  ",
            MenuCategory::Meal,
            at(today, "08:00"),
        )
        .await;
        assert!(matches!(result, Err(Error::MissingRequester)));
        assert_eq!(cart.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_reports_success_once_committed() -> Result<()> {
        let store = setup_test_db().await?;
        let today = day(2024, 5, 1);
        create_test_menu(&store, today, MenuCategory::Meal, None).await?;
        insert_unreadable_order(&store).await?;

        let mut cart = cart_with(&[("Soup", 30)]);
        let order = submit_order(
            &store,
            &mut cart,
            "Alice",
            MenuCategory::Meal,
            at(today, "09:00"),
        )
        .await?;
        assert!(cart.is_empty());

        let persisted = crate::entities::Order::find_by_id(order.id)
            .one(store.db())
            .await?;
        assert_eq!(persisted.map(|o| o.total_amount), Some(30));
        Ok(())
    }

    #[tokio::test]
    async fn test_independent_submissions() -> Result<()> {
        let store = setup_test_db().await?;
        let today = day(2024, 5, 1);
        create_test_menu(&store, today, MenuCategory::Meal, None).await?;

        let mut alice = cart_with(&[("Rice", 80)]);
        let mut bob = cart_with(&[("Noodles", 90), ("Tea", 20)]);
        let a = submit_order(
            &store,
            &mut alice,
            "Alice",
            MenuCategory::Meal,
            at(today, "11:00"),
        )
        .await?;
        let b = submit_order(
            &store,
            &mut bob,
            "Bob",
            MenuCategory::Meal,
            at(today, "11:00"),
        )
        .await?;

        assert_ne!(a.id, b.id);
        assert_eq!(a.total_amount, 80);
        assert_eq!(b.total_amount, 110);
        assert_eq!(store.orders.current().len(), 2);
        Ok(())
    }
}
