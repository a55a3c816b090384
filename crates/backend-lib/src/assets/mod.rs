//! Static file serving: path resolution, content types and compression.

pub mod mime;
pub mod path;
pub mod server;

pub use mime::mime_for;
pub use path::resolve;
pub use server::{etag_for, gzip, FileServer, ServedFile};
