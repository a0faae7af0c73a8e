//! Order lifecycle business logic - Status and payment changes after submission.
//!
//! Both toggles read the persisted value at the moment of the write and store
//! the computed next value, touching only that one column. Concurrent toggles
//! from several administrators resolve as last-write-wins. Any administrator
//! may toggle, revert a served order, or delete an order.

use crate::{
    entities::{AdministratorModel, Order, OrderStatus, order},
    errors::{Error, Result},
    store::Store,
};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use tracing::{info, instrument};

async fn load_order(store: &Store, order_id: i64) -> Result<order::Model> {
    Order::find_by_id(order_id)
        .one(store.db())
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })
}

/// Flips `Preparing` ↔ `Served`.
#[instrument(skip(store, actor), fields(actor = %actor.username))]
pub async fn toggle_status(
    store: &Store,
    actor: &AdministratorModel,
    order_id: i64,
) -> Result<order::Model> {
    let current = load_order(store, order_id).await?;
    let next = current.status.toggled();

    let mut active = current.into_active_model();
    active.status = Set(next);
    let updated = active.update(store.db()).await?;

    info!("Order {} status -> {:?}", order_id, next);
    store.orders.publish(store.db()).await;
    Ok(updated)
}

/// Flips the paid flag.
#[instrument(skip(store, actor), fields(actor = %actor.username))]
pub async fn toggle_paid(
    store: &Store,
    actor: &AdministratorModel,
    order_id: i64,
) -> Result<order::Model> {
    let current = load_order(store, order_id).await?;
    let next = !current.is_paid;

    let mut active = current.into_active_model();
    active.is_paid = Set(next);
    let updated = active.update(store.db()).await?;

    info!("Order {} paid -> {}", order_id, next);
    store.orders.publish(store.db()).await;
    Ok(updated)
}

/// Sets the status explicitly, for callers that already know the target state.
#[instrument(skip(store, actor), fields(actor = %actor.username))]
pub async fn set_status(
    store: &Store,
    actor: &AdministratorModel,
    order_id: i64,
    status: OrderStatus,
) -> Result<order::Model> {
    let current = load_order(store, order_id).await?;
    if current.status == status {
        return Ok(current);
    }
    let mut active = current.into_active_model();
    active.status = Set(status);
    let updated = active.update(store.db()).await?;

    info!("Order {} status -> {:?}", order_id, status);
    store.orders.publish(store.db()).await;
    Ok(updated)
}

/// Permanently removes an order.
#[instrument(skip(store, actor), fields(actor = %actor.username))]
pub async fn delete_order(store: &Store, actor: &AdministratorModel, order_id: i64) -> Result<()> {
    let result = Order::delete_by_id(order_id).exec(store.db()).await?;
    if result.rows_affected == 0 {
        return Err(Error::OrderNotFound { id: order_id });
    }
    info!("Order {} deleted", order_id);
    store.orders.publish(store.db()).await;
    Ok(())
}
