pub mod net;

// Re-exports for convenience
pub use net::{default_http_client, normalize_base_url, CatalogHttpClient, NetError};
