//! The add/edit panel for a single ad.
//!
//! [`AdForm`] owns one [`AdDraft`], encodes picked images on background
//! tasks, and saves the draft through an [`AdsBackend`]. It never renders
//! anything itself: callers read a [`FormView`] and forward user input to
//! the setters.

pub mod host;
pub mod view;

#[cfg(test)]
mod testing;

pub use host::AdPanelHost;
pub use view::{FormView, Thumbnail};

use crate::backend::AdsBackend;
use crate::error::FormError;
use crate::images::{ImageFile, MAX_IMAGES};
use crate::models::{parse_move_in_date, parse_price, Ad, AdDraft, AdPayload, Availability};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct AdForm {
    backend: Arc<dyn AdsBackend>,
    host: Arc<dyn AdPanelHost>,
    owner_id: String,
    /// Record being edited; `None` in create mode
    ad: Option<Ad>,
    draft: Arc<Mutex<AdDraft>>,
    loading: watch::Sender<bool>,
}

impl AdForm {
    pub fn new(
        backend: Arc<dyn AdsBackend>,
        host: Arc<dyn AdPanelHost>,
        owner_id: impl Into<String>,
        ad: Option<Ad>,
    ) -> Self {
        let draft = ad.as_ref().map(AdDraft::from).unwrap_or_default();
        let (loading, _) = watch::channel(false);

        Self {
            backend,
            host,
            owner_id: owner_id.into(),
            ad,
            draft: Arc::new(Mutex::new(draft)),
            loading,
        }
    }

    /// Swap the record being edited.
    ///
    /// A different record re-hydrates every field. `None` only switches to
    /// create mode; the current fields stay as they are.
    pub fn set_ad(&mut self, ad: Option<Ad>) {
        if ad == self.ad {
            return;
        }
        if let Some(record) = &ad {
            debug!("Hydrating form from ad {}", record.id);
            *self.draft.lock() = AdDraft::from(record);
        }
        self.ad = ad;
    }

    pub fn ad(&self) -> Option<&Ad> {
        self.ad.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.ad.is_some()
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Snapshot of the current draft
    pub fn draft(&self) -> AdDraft {
        self.draft.lock().clone()
    }

    pub fn view(&self) -> FormView {
        FormView::render(&self.draft.lock(), self.is_editing(), self.is_loading())
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Subscribe to the loading indicator
    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.draft.lock().title = title.into();
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.draft.lock().description = description.into();
    }

    pub fn set_availability(&self, available: bool) {
        self.draft.lock().availability = available;
    }

    /// Apply a status picker value ("available" / "unavailable")
    pub fn set_status(&self, status: &str) {
        self.set_availability(Availability::from_status(status).is_available());
    }

    /// Parse and apply the price input, with the same rule used for backend records.
    pub fn set_price(&self, raw: &str) -> Result<(), FormError> {
        let price = parse_price(raw).ok_or_else(|| FormError::InvalidPrice(raw.to_string()))?;
        self.draft.lock().price = price;
        Ok(())
    }

    /// Parse and apply the date input. An empty input clears the date.
    pub fn set_move_in_date(&self, raw: &str) -> Result<(), FormError> {
        let trimmed = raw.trim();
        let date = if trimmed.is_empty() {
            None
        } else {
            Some(
                parse_move_in_date(trimmed)
                    .ok_or_else(|| FormError::InvalidMoveInDate(raw.to_string()))?,
            )
        };
        self.draft.lock().move_in_date = date;
        Ok(())
    }

    /// Start encoding a file selection.
    ///
    /// More than [`MAX_IMAGES`] files are refused with an alert and nothing is
    /// read. Otherwise each file is encoded on its own task and appended to the
    /// image list as soon as it finishes, so the final order follows completion.
    /// Must be called from within a tokio runtime.
    pub fn upload_images(&self, files: Vec<ImageFile>) -> Result<ImageUploads, FormError> {
        if files.len() > MAX_IMAGES {
            let err = FormError::TooManyImages {
                selected: files.len(),
                max: MAX_IMAGES,
            };
            warn!("Rejected selection of {} images", files.len());
            self.host.alert(&err.to_string());
            return Err(err);
        }

        debug!("Encoding {} selected images", files.len());

        let tasks = files
            .into_iter()
            .map(|file| {
                let draft = Arc::clone(&self.draft);
                tokio::spawn(async move {
                    let name = file.name().to_string();
                    match file.read_as_data_url().await {
                        Ok(url) => {
                            draft.lock().images.push(url);
                            debug!("Appended image {}", name);
                            Ok(name)
                        }
                        Err(e) => {
                            warn!("Could not read image {}: {:#}", name, e);
                            Err(name)
                        }
                    }
                })
            })
            .collect();

        Ok(ImageUploads { tasks })
    }

    /// Remove the image at `index`. Returns `false` when there is none.
    pub fn remove_image(&self, index: usize) -> bool {
        let mut draft = self.draft.lock();
        if index >= draft.images.len() {
            return false;
        }
        draft.images.remove(index);
        true
    }

    /// Save the draft: `PUT` in edit mode, `POST` otherwise.
    ///
    /// The loading flag is raised for the duration of the request and lowered
    /// however it ends. A second call while one is running is refused.
    pub async fn submit(&self) -> Result<Option<Ad>, FormError> {
        let _guard = LoadingGuard::acquire(&self.loading).ok_or(FormError::SubmitInFlight)?;

        let payload = AdPayload::from_draft(&self.draft.lock(), &self.owner_id);
        debug!("Data being sent to backend: {:?}", payload);

        let saved = match &self.ad {
            Some(ad) => self.backend.update_ad(&ad.id, &payload).await?,
            None => self.backend.create_ad(&payload).await?,
        };
        debug!("Response from backend: {:?}", saved);

        if self.is_editing() {
            info!("Updated ad \"{}\"", payload.title);
        } else {
            info!("Created ad \"{}\"", payload.title);
            *self.draft.lock() = AdDraft::default();
        }
        self.host.toggle_refresh_ads();

        Ok(saved)
    }

    /// Close the panel
    pub fn dismiss(&self) {
        self.host.set_add_unit(false);
    }
}

/// Lowers the loading flag when dropped
struct LoadingGuard<'a> {
    loading: &'a watch::Sender<bool>,
}

impl<'a> LoadingGuard<'a> {
    fn acquire(loading: &'a watch::Sender<bool>) -> Option<Self> {
        let raised = loading.send_if_modified(|busy| {
            if *busy {
                false
            } else {
                *busy = true;
                true
            }
        });
        if raised {
            Some(Self { loading })
        } else {
            None
        }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.loading.send_replace(false);
    }
}

/// In-flight image encodes from one selection
///
/// Dropping this detaches the tasks; they still append when done.
pub struct ImageUploads {
    tasks: Vec<JoinHandle<Result<String, String>>>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct UploadSummary {
    pub appended: usize,
    /// Names of files that could not be read
    pub failed: Vec<String>,
}

impl ImageUploads {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every encode in the selection to settle
    pub async fn wait(self) -> UploadSummary {
        let mut summary = UploadSummary::default();
        for task in self.tasks {
            match task.await {
                Ok(Ok(_)) => summary.appended += 1,
                Ok(Err(name)) => summary.failed.push(name),
                Err(e) => summary.failed.push(format!("<task failed: {}>", e)),
            }
        }
        summary
    }
}
