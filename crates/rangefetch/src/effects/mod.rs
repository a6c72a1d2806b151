//! I/O against the network and the local filesystem.
//!
//! Everything that touches a socket or a file lives here; the HTTP side is
//! reached only through the [`HttpClient`] trait so it can be replaced in
//! tests.

mod assemble;
mod cache;
mod chunk;
mod fetcher;
mod http;
mod plan;
mod verify;
mod writer;

pub use assemble::{assemble, promote};
pub use cache::ChangeTokenCache;
pub use chunk::fetch_range;
pub use fetcher::Fetcher;
pub use plan::{PLAN_FILE, read_plan, write_plan};
pub use http::{BodyStream, BoxStream, GetResponse, HeadResponse, HttpClient};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use verify::verify_file;
pub use writer::ProgressWriter;
