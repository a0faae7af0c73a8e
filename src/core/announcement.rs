//! Announcement business logic - News shown on the ordering page.

use crate::{
    entities::{Announcement, AnnouncementModel, announcement},
    errors::{Error, Result},
    store::Store,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use tracing::{info, instrument};

/// Fields of a new announcement.
#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    /// Headline, required
    pub title: String,
    /// Body text
    pub body: String,
    /// Optional picture reference
    pub image_ref: Option<String>,
    /// Show on the feed right away
    pub is_published: bool,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementUpdate {
    /// New headline
    pub title: Option<String>,
    /// New body
    pub body: Option<String>,
    /// `Some(None)` clears the picture
    pub image_ref: Option<Option<String>>,
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput {
            message: "Announcement title cannot be empty".to_string(),
        });
    }
    Ok(title.to_string())
}

async fn load(store: &Store, id: i64) -> Result<AnnouncementModel> {
    Announcement::find_by_id(id)
        .one(store.db())
        .await?
        .ok_or(Error::AnnouncementNotFound { id })
}

/// Published announcements, newest first.
#[must_use]
pub fn published_feed(announcements: &[AnnouncementModel]) -> Vec<&AnnouncementModel> {
    let mut feed: Vec<_> = announcements.iter().filter(|a| a.is_published).collect();
    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    feed
}

/// Creates an announcement stamped with the current time.
#[instrument(skip(store, new))]
pub async fn create_announcement(
    store: &Store,
    new: NewAnnouncement,
) -> Result<AnnouncementModel> {
    let title = validate_title(&new.title)?;
    let model = announcement::ActiveModel {
        title: Set(title),
        body: Set(new.body),
        image_ref: Set(new.image_ref),
        is_published: Set(new.is_published),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(store.db())
    .await?;

    info!("Created announcement {}", model.id);
    store.announcements.publish(store.db()).await;
    Ok(model)
}

/// Applies a partial update; the publish flag has its own toggle.
#[instrument(skip(store, update))]
pub async fn update_announcement(
    store: &Store,
    id: i64,
    update: AnnouncementUpdate,
) -> Result<AnnouncementModel> {
    let title = update.title.as_deref().map(validate_title).transpose()?;
    let mut active = load(store, id).await?.into_active_model();
    if let Some(title) = title {
        active.title = Set(title);
    }
    if let Some(body) = update.body {
        active.body = Set(body);
    }
    if let Some(image_ref) = update.image_ref {
        active.image_ref = Set(image_ref);
    }
    let model = active.update(store.db()).await?;

    info!("Updated announcement {}", id);
    store.announcements.publish(store.db()).await;
    Ok(model)
}

/// Flips the published flag.
#[instrument(skip(store))]
pub async fn toggle_published(store: &Store, id: i64) -> Result<AnnouncementModel> {
    let current = load(store, id).await?;
    let next = !current.is_published;
    let mut active = current.into_active_model();
    active.is_published = Set(next);
    let model = active.update(store.db()).await?;

    info!("Announcement {} published -> {}", id, next);
    store.announcements.publish(store.db()).await;
    Ok(model)
}

/// Permanently removes an announcement.
#[instrument(skip(store))]
pub async fn delete_announcement(store: &Store, id: i64) -> Result<()> {
    let result = Announcement::delete_by_id(id).exec(store.db()).await?;
    if result.rows_affected == 0 {
        return Err(Error::AnnouncementNotFound { id });
    }
    info!("Deleted announcement {}", id);
    store.announcements.publish(store.db()).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    fn draft(title: &str, published: bool) -> NewAnnouncement {
        NewAnnouncement {
            title: title.to_string(),
            body: String::new(),
            image_ref: None,
            is_published: published,
        }
    }

    #[tokio::test]
    async fn test_feed_shows_published_newest_first() -> Result<()> {
        let store = setup_test_db().await?;
        let first = create_announcement(&store, draft("Holiday", true)).await?;
        create_announcement(&store, draft("Draft", false)).await?;
        let third = create_announcement(&store, draft("New shop", true)).await?;

        let snapshot = store.announcements.current();
        let titles: Vec<&str> = published_feed(&snapshot)
            .iter()
            .map(|a| a.title.as_str())
            .collect();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains(&"Holiday"));
        assert!(titles.contains(&"New shop"));
        if third.created_at > first.created_at {
            assert_eq!(titles[0], "New shop");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_and_update_and_delete() -> Result<()> {
        let store = setup_test_db().await?;
        let a = create_announcement(&store, draft("Menu change", false)).await?;

        let published = toggle_published(&store, a.id).await?;
        assert!(published.is_published);
        assert_eq!(published_feed(&store.announcements.current()).len(), 1);

        let updated = update_announcement(
            &store,
            a.id,
            AnnouncementUpdate {
                body: Some("Tuesday is noodles".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(updated.title, "Menu change");
        assert_eq!(updated.body, "Tuesday is noodles");
        assert!(updated.is_published);

        delete_announcement(&store, a.id).await?;
        assert!(store.announcements.current().is_empty());
        assert!(matches!(
            toggle_published(&store, a.id).await,
            Err(Error::AnnouncementNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_title_rejected() -> Result<()> {
        let store = setup_test_db().await?;
        let result = create_announcement(&store, draft("  ", true)).await;
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
        Ok(())
    }
}
