mod space;
mod testimonial;

use thiserror::Error;

pub use space::{NewSpace, Space, SpaceSettings};
pub use testimonial::{NewTestimonial, Testimonial, TestimonialKind};

/// Validation errors raised when constructing insert payloads.
///
/// These mirror the database constraints so invalid rows are rejected
/// before a request is ever made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Rating outside the 1-5 range enforced by the `testimonials` table.
    #[error("rating {0} is out of range (expected 1-5)")]
    RatingOutOfRange(i32),

    /// A text testimonial without content, or a video one without a URL.
    #[error("{kind} testimonial is missing its {field}")]
    MissingField {
        kind: TestimonialKind,
        field: &'static str,
    },

    /// Slug is empty or not URL-safe.
    #[error("invalid slug: {0:?}")]
    InvalidSlug(String),
}
