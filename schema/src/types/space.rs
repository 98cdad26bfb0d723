use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ModelError;

/// A tenant-owned collection page for testimonials.
///
/// Matches a row of the `spaces` table as returned by PostgREST.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Space {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub slug: String,
    pub space_name: String,
    pub logo_url: Option<String>,
    pub header_title: Option<String>,
    pub custom_message: Option<String>,
    pub collect_star_rating: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the `spaces` table.
///
/// Optional fields are skipped during serialization so the database
/// defaults (header title, star-rating flag, timestamps) apply.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewSpace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Uuid>,
    pub slug: String,
    pub space_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect_star_rating: Option<bool>,
}

impl NewSpace {
    /// Create a space payload, validating the slug.
    ///
    /// Slugs become URL path segments on the public collection page, so
    /// only lowercase alphanumerics and hyphens are accepted.
    pub fn new(slug: impl Into<String>, space_name: impl Into<String>) -> Result<Self, ModelError> {
        let slug = slug.into();
        validate_slug(&slug)?;

        Ok(Self {
            owner_id: None,
            slug,
            space_name: space_name.into(),
            logo_url: None,
            header_title: None,
            custom_message: None,
            collect_star_rating: None,
        })
    }

    pub fn with_owner(mut self, owner_id: Uuid) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_header_title(mut self, header_title: impl Into<String>) -> Self {
        self.header_title = Some(header_title.into());
        self
    }

    pub fn with_custom_message(mut self, custom_message: impl Into<String>) -> Self {
        self.custom_message = Some(custom_message.into());
        self
    }
}

/// Mutable settings of an existing space, used for PATCH updates.
///
/// `None` fields are left untouched by the update.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SpaceSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collect_star_rating: Option<bool>,
}

impl SpaceSettings {
    /// True when no field is set, i.e. a PATCH would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.space_name.is_none()
            && self.logo_url.is_none()
            && self.header_title.is_none()
            && self.custom_message.is_none()
            && self.collect_star_rating.is_none()
    }
}

fn validate_slug(slug: &str) -> Result<(), ModelError> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(ModelError::InvalidSlug(slug.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_space_accepts_url_safe_slugs() {
        assert!(NewSpace::new("acme", "Acme Inc").is_ok());
        assert!(NewSpace::new("acme-reviews-2", "Acme Inc").is_ok());
    }

    #[test]
    fn new_space_rejects_bad_slugs() {
        for slug in ["", "Acme", "acme reviews", "-acme", "acme-", "acme_reviews"] {
            let result = NewSpace::new(slug, "Acme Inc");
            assert_eq!(result, Err(ModelError::InvalidSlug(slug.to_string())));
        }
    }

    #[test]
    fn new_space_serializes_only_set_fields() {
        let payload = NewSpace::new("acme", "Acme Inc").unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"slug": "acme", "space_name": "Acme Inc"})
        );
    }

    #[test]
    fn space_row_deserializes_from_postgrest_json() {
        let json = serde_json::json!({
            "id": "7f1aebf1-5f35-4c82-a41e-3b8d5a0a4b11",
            "owner_id": null,
            "slug": "acme",
            "space_name": "Acme Inc",
            "logo_url": null,
            "header_title": "Share your experience",
            "custom_message": null,
            "collect_star_rating": true,
            "created_at": "2025-01-02T03:04:05Z",
            "updated_at": "2025-01-02T03:04:05Z"
        });

        let space: Space = serde_json::from_value(json).unwrap();
        assert_eq!(space.slug, "acme");
        assert!(space.collect_star_rating);
        assert_eq!(space.header_title.as_deref(), Some("Share your experience"));
    }

    #[test]
    fn empty_settings_detected() {
        assert!(SpaceSettings::default().is_empty());

        let settings = SpaceSettings {
            space_name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(!settings.is_empty());
    }
}
