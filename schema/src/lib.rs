//! Database schema and data model for TrustFlow.
//!
//! This crate provides:
//! - [`SQL_SCHEMA`] — the full DDL for the `spaces` and `testimonials`
//!   tables, their indexes, and the row-level-security policies
//! - [`statements`] — the schema split into individual executable statements
//! - Typed rows ([`Space`], [`Testimonial`]) and insert payloads
//!   ([`NewSpace`], [`NewTestimonial`]) matching the PostgREST JSON shapes
//!
//! ## Usage
//!
//! ```ignore
//! use schema::{NewTestimonial, SQL_SCHEMA};
//!
//! let testimonial = NewTestimonial::text(space_id, "Great product!", "Ada")
//!     .with_rating(5)?;
//!
//! println!("{} statements to apply", schema::statements().len());
//! ```

mod sql;
mod types;

pub use sql::{statements, SQL_SCHEMA};
pub use types::{
    ModelError, NewSpace, NewTestimonial, Space, SpaceSettings, Testimonial, TestimonialKind,
};
