//! Typed stores over the Supabase REST surface.
//!
//! These wrap the raw [`supabase::SupabaseApi`] routes with the operations
//! the TrustFlow product performs on its two tables: space management for
//! owners and testimonial collection/curation for visitors.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use store::{SpacesStore, TestimonialsStore};
//! use supabase::ApiSource;
//!
//! let api = ApiSource::live(url, key).into_api();
//! let spaces = SpacesStore::new(api.clone());
//! let testimonials = TestimonialsStore::new(api);
//!
//! let space = spaces.create(new_space).await?;
//! let wall = testimonials.list_liked(space.id).await?;
//! ```

mod spaces;
mod testimonials;

pub use spaces::SpacesStore;
pub use testimonials::TestimonialsStore;

use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying REST call failed.
    #[error("api error: {0}")]
    Api(#[from] supabase::SupabaseError),

    /// A row came back in a shape the model does not accept.
    #[error("row decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A payload failed model validation before any request was made.
    #[error("invalid payload: {0}")]
    Model(#[from] schema::ModelError),

    /// The requested slug is already in use by another space.
    #[error("slug already taken: {0}")]
    SlugTaken(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
