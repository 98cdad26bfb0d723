//! Store for the `testimonials` table.

use std::sync::Arc;

use schema::{NewTestimonial, Testimonial};
use supabase::SupabaseApi;
use uuid::Uuid;

use crate::{Result, StoreError};

const TABLE: &str = "testimonials";

/// Submission and curation operations on testimonials.
pub struct TestimonialsStore {
    api: Arc<dyn SupabaseApi>,
}

impl TestimonialsStore {
    pub fn new(api: Arc<dyn SupabaseApi>) -> Self {
        Self { api }
    }

    /// Submit a testimonial to a space.
    pub async fn submit(&self, testimonial: NewTestimonial) -> Result<Testimonial> {
        let row = self
            .api
            .insert_row(TABLE, serde_json::to_value(&testimonial)?)
            .await?;
        Ok(serde_json::from_value(row)?)
    }

    /// List every testimonial for a space, newest first.
    pub async fn list_for_space(&self, space_id: Uuid) -> Result<Vec<Testimonial>> {
        self.fetch(&format!(
            "select=*&space_id=eq.{}&order=created_at.desc",
            space_id
        ))
        .await
    }

    /// List the liked testimonials of a space, newest first.
    ///
    /// This feeds the public Wall of Love page.
    pub async fn list_liked(&self, space_id: Uuid) -> Result<Vec<Testimonial>> {
        self.fetch(&format!(
            "select=*&space_id=eq.{}&is_liked=eq.true&order=created_at.desc",
            space_id
        ))
        .await
    }

    /// Mark or unmark a testimonial as liked.
    pub async fn set_liked(&self, id: Uuid, liked: bool) -> Result<()> {
        self.api
            .update_rows(
                TABLE,
                &format!("id=eq.{}", id),
                serde_json::json!({ "is_liked": liked }),
            )
            .await?;
        Ok(())
    }

    /// Delete a testimonial.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        self.api
            .delete_rows(TABLE, &format!("id=eq.{}", id))
            .await?;
        Ok(())
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Testimonial>> {
        let rows = self.api.select_rows(TABLE, query).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }
}
