//! Directory business logic - The requester roster and administrator accounts.
//!
//! Administrator deletion goes through [`authorize_admin_deletion`] before any
//! write reaches the store. Credentials are a plain username/pin equality
//! check; failures never say which half was wrong.

use crate::{
    config::app::BootstrapAdmin,
    entities::{
        AdminRole, Administrator, AdministratorModel, Requester, RequesterModel, administrator,
        requester,
    },
    errors::{Error, Result},
    store::Store,
};
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput {
            message: format!("{field} cannot be empty"),
        });
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Requesters
// ---------------------------------------------------------------------------

/// Adds one name to the roster.
#[instrument(skip(store))]
pub async fn add_requester(store: &Store, name: &str) -> Result<RequesterModel> {
    let name = required("Requester name", name)?;
    let model = requester::ActiveModel {
        name: Set(name),
        ..Default::default()
    }
    .insert(store.db())
    .await?;

    info!("Added requester {} '{}'", model.id, model.name);
    store.requesters.publish(store.db()).await;
    Ok(model)
}

/// Renames a roster entry. Existing orders keep the old name.
#[instrument(skip(store))]
pub async fn rename_requester(store: &Store, id: i64, name: &str) -> Result<RequesterModel> {
    let name = required("Requester name", name)?;
    let current = Requester::find_by_id(id)
        .one(store.db())
        .await?
        .ok_or(Error::RequesterNotFound { id })?;

    let mut active = current.into_active_model();
    active.name = Set(name);
    let model = active.update(store.db()).await?;

    info!("Renamed requester {} to '{}'", id, model.name);
    store.requesters.publish(store.db()).await;
    Ok(model)
}

/// Removes a roster entry.
#[instrument(skip(store))]
pub async fn remove_requester(store: &Store, id: i64) -> Result<()> {
    let result = Requester::delete_by_id(id).exec(store.db()).await?;
    if result.rows_affected == 0 {
        return Err(Error::RequesterNotFound { id });
    }
    info!("Removed requester {}", id);
    store.requesters.publish(store.db()).await;
    Ok(())
}

/// Roster sorted by name for the requester picker.
#[must_use]
pub fn roster_by_name(roster: &[RequesterModel]) -> Vec<&RequesterModel> {
    let mut sorted: Vec<_> = roster.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

/// Names in `text` that are not yet on the roster, in input order.
///
/// Entries are separated by newlines or commas.
#[must_use]
pub fn new_roster_names(roster: &[RequesterModel], text: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = roster.iter().map(|r| r.name.as_str()).collect();
    let mut names = Vec::new();
    for name in text.split(['\n', '\r', ',']).map(str::trim) {
        if name.is_empty() || !seen.insert(name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

/// Bulk import; returns how many names were inserted.
#[instrument(skip(store, text))]
pub async fn import_requesters(store: &Store, text: &str) -> Result<usize> {
    let roster = store.requesters.current();
    let names = new_roster_names(&roster, text);
    if names.is_empty() {
        return Ok(0);
    }

    let count = names.len();
    Requester::insert_many(names.into_iter().map(|name| requester::ActiveModel {
        name: Set(name),
        ..Default::default()
    }))
    .exec(store.db())
    .await?;

    info!("Imported {} requesters", count);
    store.requesters.publish(store.db()).await;
    Ok(count)
}

/// Makes sure every configured name is on the roster.
pub async fn seed_roster(store: &Store, names: &[String]) -> Result<usize> {
    import_requesters(store, &names.join("\n")).await
}

// ---------------------------------------------------------------------------
// Administrators
// ---------------------------------------------------------------------------

/// Fields of a new administrator; all are required.
#[derive(Clone)]
pub struct NewAdministrator {
    /// Login name, unique
    pub username: String,
    /// Name shown in the UI
    pub display_name: String,
    /// Login pin
    pub pin: String,
    /// Super or normal
    pub role: AdminRole,
}

/// Editable administrator fields; the username is fixed.
#[derive(Clone, Default)]
pub struct AdministratorUpdate {
    /// New display name
    pub display_name: Option<String>,
    /// New pin
    pub pin: Option<String>,
    /// New role
    pub role: Option<AdminRole>,
}

/// Matches a login attempt against the known administrators.
///
/// # Errors
/// * `AuthenticationFailed` - unknown username or wrong pin, deliberately
///   indistinguishable
pub fn authenticate<'a>(
    admins: &'a [AdministratorModel],
    username: &str,
    pin: &str,
) -> Result<&'a AdministratorModel> {
    admins
        .iter()
        .find(|a| a.username == username && a.pin == pin)
        .ok_or(Error::AuthenticationFailed)
}

/// Role gate for deleting an administrator account.
///
/// Only a super administrator may delete, and never their own account.
pub fn authorize_admin_deletion(
    actor: &AdministratorModel,
    target: &AdministratorModel,
) -> Result<()> {
    if actor.role != AdminRole::Super {
        return Err(Error::PermissionDenied {
            reason: "only a super administrator can delete administrators".to_string(),
        });
    }
    if actor.id == target.id {
        return Err(Error::PermissionDenied {
            reason: "administrators cannot delete their own account".to_string(),
        });
    }
    Ok(())
}

/// Creates an administrator account.
#[instrument(skip(store, new_admin), fields(username = %new_admin.username))]
pub async fn create_administrator(
    store: &Store,
    new_admin: NewAdministrator,
) -> Result<AdministratorModel> {
    let username = required("Username", &new_admin.username)?;
    let display_name = required("Display name", &new_admin.display_name)?;
    let pin = required("Pin", &new_admin.pin)?;

    if store
        .administrators
        .current()
        .iter()
        .any(|a| a.username == username)
    {
        return Err(Error::DuplicateUsername { username });
    }

    let model = administrator::ActiveModel {
        username: Set(username),
        display_name: Set(display_name),
        pin: Set(pin),
        role: Set(new_admin.role),
        ..Default::default()
    }
    .insert(store.db())
    .await?;

    info!("Created administrator {} ({:?})", model.username, model.role);
    store.administrators.publish(store.db()).await;
    Ok(model)
}

/// Updates display name, pin or role.
#[instrument(skip(store, update))]
pub async fn update_administrator(
    store: &Store,
    id: i64,
    update: AdministratorUpdate,
) -> Result<AdministratorModel> {
    let display_name = update
        .display_name
        .map(|d| required("Display name", &d))
        .transpose()?;
    let pin = update.pin.map(|p| required("Pin", &p)).transpose()?;

    let current = Administrator::find_by_id(id)
        .one(store.db())
        .await?
        .ok_or(Error::AdministratorNotFound { id })?;

    let mut active = current.into_active_model();
    if let Some(display_name) = display_name {
        active.display_name = Set(display_name);
    }
    if let Some(pin) = pin {
        active.pin = Set(pin);
    }
    if let Some(role) = update.role {
        active.role = Set(role);
    }
    let model = active.update(store.db()).await?;

    info!("Updated administrator {}", model.username);
    store.administrators.publish(store.db()).await;
    Ok(model)
}

/// Deletes an administrator account after the role check.
#[instrument(skip(store, actor), fields(actor = %actor.username))]
pub async fn delete_administrator(
    store: &Store,
    actor: &AdministratorModel,
    target_id: i64,
) -> Result<()> {
    let admins = store.administrators.current();
    let target = admins
        .iter()
        .find(|a| a.id == target_id)
        .ok_or(Error::AdministratorNotFound { id: target_id })?;

    if let Err(e) = authorize_admin_deletion(actor, target) {
        warn!("Refused to delete administrator {}: {}", target.username, e);
        return Err(e);
    }

    let result = Administrator::delete_by_id(target_id).exec(store.db()).await?;
    if result.rows_affected == 0 {
        return Err(Error::AdministratorNotFound { id: target_id });
    }
    info!("Deleted administrator {}", target.username);
    store.administrators.publish(store.db()).await;
    Ok(())
}

/// Creates the configured super administrator when no account exists yet.
///
/// Returns the created account, or `None` if administrators already exist.
pub async fn ensure_bootstrap_admin(
    store: &Store,
    bootstrap: &BootstrapAdmin,
) -> Result<Option<AdministratorModel>> {
    if !store.administrators.current().is_empty() {
        return Ok(None);
    }
    let admin = create_administrator(
        store,
        NewAdministrator {
            username: bootstrap.username.clone(),
            display_name: bootstrap.display_name.clone(),
            pin: bootstrap.pin.clone(),
            role: AdminRole::Super,
        },
    )
    .await?;
    Ok(Some(admin))
}
