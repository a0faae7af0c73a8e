//! Live board - Per-category view of today, recomputed from snapshots.
//!
//! Lock state depends on the clock as much as on the data, so the watcher
//! re-evaluates on a timer as well as on every orders/menus snapshot. Each
//! published [`BoardSummary`] replaces the previous one.

use crate::{
    core::{
        menu::{is_locked, orders_for_menu_day, resolve_menu},
        report::{PeriodTotals, period_totals},
    },
    entities::{MenuCategory, MenuEntryModel, OrderModel},
    store::Store,
};
use chrono::{Local, NaiveDateTime};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::debug;

/// State of one category for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBoard {
    /// Meal, drink or group buy
    pub category: MenuCategory,
    /// Today's menu, if one was published
    pub menu: Option<MenuEntryModel>,
    /// Whether new orders are refused right now
    pub is_locked: bool,
    /// Today's orders in this category
    pub totals: PeriodTotals,
}

/// Snapshot of the whole board at `generated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSummary {
    /// Local time the summary was computed for
    pub generated_at: NaiveDateTime,
    /// One entry per category, in [`MenuCategory::ALL`] order
    pub categories: Vec<CategoryBoard>,
}

impl BoardSummary {
    /// Entry for `category`.
    #[must_use]
    pub fn category(&self, category: MenuCategory) -> Option<&CategoryBoard> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Computes the board for `now` from the given snapshots.
#[must_use]
pub fn summarize_board(
    orders: &[OrderModel],
    menus: &[MenuEntryModel],
    now: NaiveDateTime,
) -> BoardSummary {
    let today = now.date();
    let categories = MenuCategory::ALL
        .iter()
        .map(|&category| {
            let menu = resolve_menu(menus, today, category);
            CategoryBoard {
                category,
                menu: menu.cloned(),
                is_locked: is_locked(menu, now),
                totals: period_totals(orders_for_menu_day(orders, today, category)),
            }
        })
        .collect();

    BoardSummary {
        generated_at: now,
        categories,
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Starts the background task that keeps a [`BoardSummary`] current.
///
/// The task ends when the store is dropped or every receiver is gone.
#[must_use]
pub fn spawn_board_watcher(
    store: &Store,
    refresh: Duration,
) -> (watch::Receiver<BoardSummary>, JoinHandle<()>) {
    let mut orders_rx = store.orders.subscribe();
    let mut menus_rx = store.menus.subscribe();

    let orders = Arc::clone(&*orders_rx.borrow_and_update());
    let menus = Arc::clone(&*menus_rx.borrow_and_update());
    let (tx, rx) = watch::channel(summarize_board(&orders, &menus, local_now()));

    let handle = tokio::spawn(async move {
        let mut ticker = interval(refresh);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = orders_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = menus_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {}
            }

            let orders = Arc::clone(&*orders_rx.borrow_and_update());
            let menus = Arc::clone(&*menus_rx.borrow_and_update());
            let summary = summarize_board(&orders, &menus, local_now());
            if tx.send(summary).is_err() {
                break;
            }
        }
        debug!("Board watcher stopped");
    });

    (rx, handle)
}
