//! Pure transformations for fetching.
//!
//! Range planning, on-disk naming and header interpretation. No I/O happens
//! here, which keeps every rule unit-testable without a server.

mod headers;
mod layout;
mod range;

pub use headers::{accepts_byte_ranges, is_partial, is_success, normalize_change_token};
pub use layout::{Layout, chunk_path, resource_name};
pub use range::{effective_concurrency, plan_ranges};
