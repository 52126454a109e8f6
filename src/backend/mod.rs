pub mod http;
pub mod traits;

pub use http::HttpAdsBackend;
pub use traits::AdsBackend;
