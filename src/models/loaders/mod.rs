pub mod toml_loader;

pub use toml_loader::{load_all_lookup_requests, load_lookup_request, LookupRequest};
