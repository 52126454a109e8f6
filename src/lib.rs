pub mod backend;
pub mod config;
pub mod error;
pub mod form;
pub mod images;
pub mod models;

pub use backend::{AdsBackend, HttpAdsBackend};
pub use config::Config;
pub use error::FormError;
pub use form::{AdForm, AdPanelHost, FormView};
pub use images::ImageFile;
pub use models::{Ad, AdDraft, AdPayload};
