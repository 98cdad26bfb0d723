use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ModelError;

/// The form a testimonial was submitted in.
///
/// Serialized as the lowercase values the `type` column accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialKind {
    Text,
    Video,
}

impl TestimonialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestimonialKind::Text => "text",
            TestimonialKind::Video => "video",
        }
    }
}

impl std::fmt::Display for TestimonialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single submitted review tied to a space.
///
/// Matches a row of the `testimonials` table as returned by PostgREST.
/// The column is named `type` in the database; Rust uses `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Testimonial {
    pub id: Uuid,
    pub space_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: TestimonialKind,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub rating: Option<i32>,
    pub respondent_name: String,
    pub respondent_email: Option<String>,
    pub respondent_photo_url: Option<String>,
    pub is_liked: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `testimonials` table.
///
/// Built through [`NewTestimonial::text`] or [`NewTestimonial::video`] so a
/// payload can never violate the kind/content pairing, and through
/// [`NewTestimonial::with_rating`] so ratings stay inside the CHECK range.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTestimonial {
    pub space_id: Uuid,
    #[serde(rename = "type")]
    pub kind: TestimonialKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    pub respondent_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_photo_url: Option<String>,
}

impl NewTestimonial {
    /// Create a text testimonial payload.
    pub fn text(
        space_id: Uuid,
        content: impl Into<String>,
        respondent_name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(ModelError::MissingField {
                kind: TestimonialKind::Text,
                field: "content",
            });
        }

        Ok(Self {
            space_id,
            kind: TestimonialKind::Text,
            content: Some(content),
            video_url: None,
            rating: None,
            respondent_name: respondent_name.into(),
            respondent_email: None,
            respondent_photo_url: None,
        })
    }

    /// Create a video testimonial payload.
    pub fn video(
        space_id: Uuid,
        video_url: impl Into<String>,
        respondent_name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let video_url = video_url.into();
        if video_url.trim().is_empty() {
            return Err(ModelError::MissingField {
                kind: TestimonialKind::Video,
                field: "video_url",
            });
        }

        Ok(Self {
            space_id,
            kind: TestimonialKind::Video,
            content: None,
            video_url: Some(video_url),
            rating: None,
            respondent_name: respondent_name.into(),
            respondent_email: None,
            respondent_photo_url: None,
        })
    }

    /// Attach a star rating, enforcing the 1-5 CHECK range.
    pub fn with_rating(mut self, rating: i32) -> Result<Self, ModelError> {
        if !(1..=5).contains(&rating) {
            return Err(ModelError::RatingOutOfRange(rating));
        }
        self.rating = Some(rating);
        Ok(self)
    }

    pub fn with_respondent_email(mut self, email: impl Into<String>) -> Self {
        self.respondent_email = Some(email.into());
        self
    }

    pub fn with_respondent_photo_url(mut self, url: impl Into<String>) -> Self {
        self.respondent_photo_url = Some(url.into());
        self
    }
}
