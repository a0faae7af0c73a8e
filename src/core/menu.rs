//! Menu business logic - Resolves today's menu and whether it is still open.
//!
//! Lock state is derived from the wall clock every time it is asked for; it is
//! never stored. Menu management (create/update/delete) writes through the
//! store and re-publishes the menu collection.

use crate::{
    entities::{MenuCategory, MenuEntry, OrderModel, menu_entry},
    errors::{Error, Result},
    store::Store,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use tracing::{info, instrument};

/// Finds the menu for `date` and `category`.
///
/// Duplicates are a data-entry error: the first match in snapshot order wins.
#[must_use]
pub fn resolve_menu(
    menus: &[menu_entry::Model],
    date: NaiveDate,
    category: MenuCategory,
) -> Option<&menu_entry::Model> {
    menus
        .iter()
        .find(|m| m.menu_date == date && m.category == category)
}

/// Whether ordering against `menu` is closed at `now`.
///
/// * no menu → locked
/// * menu without cutoff → open, whatever the time
/// * otherwise locked iff the time of day is strictly after the cutoff
#[must_use]
pub fn is_locked(menu: Option<&menu_entry::Model>, now: NaiveDateTime) -> bool {
    let Some(menu) = menu else {
        return true;
    };
    menu.cutoff_time.is_some_and(|cutoff| now.time() > cutoff)
}

/// Parses an `HH:MM` cutoff as entered by an administrator.
pub fn parse_cutoff_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|_| Error::InvalidCutoffTime {
        input: input.to_string(),
    })
}

/// Cutoff choices offered when editing a menu: 08:00 to 18:00 every half hour.
#[must_use]
pub fn cutoff_time_slots() -> Vec<NaiveTime> {
    (8..=18)
        .flat_map(|hour| [(hour, 0), (hour, 30)])
        .filter(|&(hour, minute)| hour < 18 || minute == 0)
        .filter_map(|(hour, minute)| NaiveTime::from_hms_opt(hour, minute, 0))
        .collect()
}

/// Menus sorted for the management list, latest date first.
#[must_use]
pub fn menus_newest_first(menus: &[menu_entry::Model]) -> Vec<&menu_entry::Model> {
    let mut sorted: Vec<_> = menus.iter().collect();
    sorted.sort_by(|a, b| b.menu_date.cmp(&a.menu_date));
    sorted
}

/// Orders placed on `date` against `category`, as listed beside the menu.
#[must_use]
pub fn orders_for_menu_day(
    orders: &[OrderModel],
    date: NaiveDate,
    category: MenuCategory,
) -> Vec<&OrderModel> {
    orders
        .iter()
        .filter(|o| o.order_date == date && o.category == category)
        .collect()
}

/// Fields of a new menu entry. `cutoff_time` is `HH:MM` or `None`.
#[derive(Debug, Clone)]
pub struct NewMenu {
    /// Day the menu applies to
    pub menu_date: NaiveDate,
    /// Meal, drink or group buy
    pub category: MenuCategory,
    /// Shop name
    pub store_name: String,
    /// Free text
    pub description: String,
    /// Optional `HH:MM` cutoff
    pub cutoff_time: Option<String>,
    /// Optional picture reference
    pub image_ref: Option<String>,
}

/// Partial update of a menu entry; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct MenuUpdate {
    /// New day
    pub menu_date: Option<NaiveDate>,
    /// New category
    pub category: Option<MenuCategory>,
    /// New shop name
    pub store_name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// `Some(None)` clears the cutoff
    pub cutoff_time: Option<Option<String>>,
    /// `Some(None)` clears the picture
    pub image_ref: Option<Option<String>>,
}

fn parse_optional_cutoff(input: Option<&str>) -> Result<Option<NaiveTime>> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_cutoff_time)
        .transpose()
}

/// Creates a menu entry.
#[instrument(skip(store))]
pub async fn create_menu(store: &Store, new_menu: NewMenu) -> Result<menu_entry::Model> {
    let cutoff_time = parse_optional_cutoff(new_menu.cutoff_time.as_deref())?;

    let model = menu_entry::ActiveModel {
        menu_date: Set(new_menu.menu_date),
        category: Set(new_menu.category),
        store_name: Set(new_menu.store_name.trim().to_string()),
        description: Set(new_menu.description),
        cutoff_time: Set(cutoff_time),
        image_ref: Set(new_menu.image_ref),
        ..Default::default()
    }
    .insert(store.db())
    .await?;

    info!(
        "Created menu {} for {} {:?}",
        model.id, model.menu_date, model.category
    );
    store.menus.publish(store.db()).await;
    Ok(model)
}

/// Applies a partial update to a menu entry.
#[instrument(skip(store))]
pub async fn update_menu(store: &Store, id: i64, update: MenuUpdate) -> Result<menu_entry::Model> {
    // Validate before touching the store
    let cutoff_time = update
        .cutoff_time
        .as_ref()
        .map(|c| parse_optional_cutoff(c.as_deref()))
        .transpose()?;

    let current = MenuEntry::find_by_id(id)
        .one(store.db())
        .await?
        .ok_or(Error::MenuNotFound { id })?;

    let mut active = current.into_active_model();
    if let Some(menu_date) = update.menu_date {
        active.menu_date = Set(menu_date);
    }
    if let Some(category) = update.category {
        active.category = Set(category);
    }
    if let Some(store_name) = update.store_name {
        active.store_name = Set(store_name.trim().to_string());
    }
    if let Some(description) = update.description {
        active.description = Set(description);
    }
    if let Some(cutoff_time) = cutoff_time {
        active.cutoff_time = Set(cutoff_time);
    }
    if let Some(image_ref) = update.image_ref {
        active.image_ref = Set(image_ref);
    }

    let model = active.update(store.db()).await?;
    info!("Updated menu {}", id);
    store.menus.publish(store.db()).await;
    Ok(model)
}

/// Deletes a menu entry.
#[instrument(skip(store))]
pub async fn delete_menu(store: &Store, id: i64) -> Result<()> {
    let result = MenuEntry::delete_by_id(id).exec(store.db()).await?;
    if result.rows_affected == 0 {
        return Err(Error::MenuNotFound { id });
    }
    info!("Deleted menu {}", id);
    store.menus.publish(store.db()).await;
    Ok(())
}
