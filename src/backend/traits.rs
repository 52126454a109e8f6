use crate::models::{Ad, AdPayload};
use anyhow::Result;
use async_trait::async_trait;

/// Persistence seam for ad records
///
/// Both calls return the stored record when the backend echoes one back.
#[async_trait]
pub trait AdsBackend: Send + Sync {
    /// Create a new ad (`POST /api/ads`)
    async fn create_ad(&self, payload: &AdPayload) -> Result<Option<Ad>>;

    /// Replace the ad identified by `id` (`PUT /api/ads/{id}`)
    async fn update_ad(&self, id: &str, payload: &AdPayload) -> Result<Option<Ad>>;
}
