//! Store for the `spaces` table.

use std::sync::Arc;

use schema::{NewSpace, Space, SpaceSettings};
use supabase::SupabaseApi;
use uuid::Uuid;

use crate::{Result, StoreError};

const TABLE: &str = "spaces";

/// Owner-facing operations on spaces.
pub struct SpacesStore {
    api: Arc<dyn SupabaseApi>,
}

impl SpacesStore {
    pub fn new(api: Arc<dyn SupabaseApi>) -> Self {
        Self { api }
    }

    /// Create a space, refusing slugs that are already in use.
    ///
    /// The slug column carries a UNIQUE constraint; checking first turns
    /// the database error into a typed [`StoreError::SlugTaken`].
    pub async fn create(&self, space: NewSpace) -> Result<Space> {
        if !self.is_slug_available(&space.slug).await? {
            return Err(StoreError::SlugTaken(space.slug));
        }

        let row = self
            .api
            .insert_row(TABLE, serde_json::to_value(&space)?)
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// Fetch a space by its public slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Space>> {
        let rows = self
            .api
            .select_rows(TABLE, &format!("select=*&slug=eq.{}&limit=1", slug))
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    /// List the spaces belonging to an owner, newest first.
    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Space>> {
        let rows = self
            .api
            .select_rows(
                TABLE,
                &format!("select=*&owner_id=eq.{}&order=created_at.desc", owner_id),
            )
            .await?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    /// Update the settings of an existing space.
    ///
    /// Empty settings are a no-op. A slug change re-checks uniqueness
    /// against every other space before the PATCH is sent.
    pub async fn update_settings(&self, id: Uuid, settings: SpaceSettings) -> Result<()> {
        if settings.is_empty() {
            return Ok(());
        }

        if let Some(slug) = &settings.slug {
            let rows = self
                .api
                .select_rows(TABLE, &format!("select=id&slug=eq.{}", slug))
                .await?;
            let taken_by_other = rows
                .iter()
                .filter_map(|row| row.get("id").and_then(|v| v.as_str()))
                .any(|existing| existing != id.to_string());
            if taken_by_other {
                return Err(StoreError::SlugTaken(slug.clone()));
            }
        }

        self.api
            .update_rows(
                TABLE,
                &format!("id=eq.{}", id),
                serde_json::to_value(&settings)?,
            )
            .await?;
        Ok(())
    }

    /// Check whether a slug is free.
    pub async fn is_slug_available(&self, slug: &str) -> Result<bool> {
        let rows = self
            .api
            .select_rows(TABLE, &format!("select=id&slug=eq.{}&limit=1", slug))
            .await?;
        Ok(rows.is_empty())
    }

    /// Delete a space. The database cascades the delete to its
    /// testimonials.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.api
            .delete_rows(TABLE, &format!("id=eq.{}", id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supabase::MockSupabaseApi;

    fn mock_backend() -> Arc<MockSupabaseApi> {
        let api = MockSupabaseApi::new();
        api.register_table_with_defaults(
            "spaces",
            serde_json::json!({
                "owner_id": null,
                "logo_url": null,
                "header_title": "Share your experience",
                "custom_message": null,
                "collect_star_rating": true,
                "created_at": "2025-01-01T00:00:00Z",
                "updated_at": "2025-01-01T00:00:00Z",
            }),
        );
        api.register_table("testimonials");
        api.with_cascade("spaces", "testimonials", "space_id");
        Arc::new(api)
    }

    fn store(api: &Arc<MockSupabaseApi>) -> SpacesStore {
        SpacesStore::new(api.clone() as Arc<dyn SupabaseApi>)
    }

    #[tokio::test]
    async fn create_returns_the_full_row() {
        let api = mock_backend();
        let store = store(&api);

        let space = store
            .create(NewSpace::new("acme", "Acme Inc").unwrap())
            .await
            .unwrap();

        assert_eq!(space.slug, "acme");
        assert_eq!(space.space_name, "Acme Inc");
        assert!(space.collect_star_rating);
        assert_eq!(space.header_title.as_deref(), Some("Share your experience"));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_slugs() {
        let api = mock_backend();
        let store = store(&api);

        store
            .create(NewSpace::new("acme", "Acme Inc").unwrap())
            .await
            .unwrap();

        let err = store
            .create(NewSpace::new("acme", "Copycat").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlugTaken(slug) if slug == "acme"));
        assert_eq!(api.row_count("spaces"), 1);
    }

    #[tokio::test]
    async fn get_by_slug_finds_existing_spaces() {
        let api = mock_backend();
        let store = store(&api);

        store
            .create(NewSpace::new("acme", "Acme Inc").unwrap())
            .await
            .unwrap();

        let found = store.get_by_slug("acme").await.unwrap();
        assert_eq!(found.unwrap().space_name, "Acme Inc");

        let missing = store.get_by_slug("nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn update_settings_is_noop_when_empty() {
        let api = mock_backend();
        let store = store(&api);

        let space = store
            .create(NewSpace::new("acme", "Acme Inc").unwrap())
            .await
            .unwrap();

        store
            .update_settings(space.id, SpaceSettings::default())
            .await
            .unwrap();

        let unchanged = store.get_by_slug("acme").await.unwrap().unwrap();
        assert_eq!(unchanged.space_name, "Acme Inc");
    }

    #[tokio::test]
    async fn update_settings_renames_and_keeps_own_slug_valid() {
        let api = mock_backend();
        let store = store(&api);

        let space = store
            .create(NewSpace::new("acme", "Acme Inc").unwrap())
            .await
            .unwrap();

        // Re-submitting the space's own slug is not a conflict.
        store
            .update_settings(
                space.id,
                SpaceSettings {
                    slug: Some("acme".to_string()),
                    space_name: Some("Acme Incorporated".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let updated = store.get_by_slug("acme").await.unwrap().unwrap();
        assert_eq!(updated.space_name, "Acme Incorporated");
    }

    #[tokio::test]
    async fn update_settings_rejects_taken_slugs() {
        let api = mock_backend();
        let store = store(&api);

        store
            .create(NewSpace::new("acme", "Acme Inc").unwrap())
            .await
            .unwrap();
        let other = store
            .create(NewSpace::new("other", "Other Co").unwrap())
            .await
            .unwrap();

        let err = store
            .update_settings(
                other.id,
                SpaceSettings {
                    slug: Some("acme".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SlugTaken(_)));
    }

    #[tokio::test]
    async fn delete_cascades_to_testimonials() {
        let api = mock_backend();
        let store = store(&api);

        let space = store
            .create(NewSpace::new("acme", "Acme Inc").unwrap())
            .await
            .unwrap();
        api.insert_row(
            "testimonials",
            serde_json::json!({"space_id": space.id.to_string()}),
        )
        .await
        .unwrap();

        store.delete(space.id).await.unwrap();

        assert_eq!(api.row_count("spaces"), 0);
        assert_eq!(api.row_count("testimonials"), 0);
    }
}
