// Job posting extraction pipeline.
//
// Turns a (url, parsed HTML document) pair into a normalized JobRecord,
// using portal-specific parsers for known German job boards and a
// multi-strategy generic fallback for everything else. The pipeline is
// purely computational: no I/O, no shared state, best-effort partial
// results instead of hard failures. The `fetch` module is the only place
// that touches the network and is used by the CLI, not the pipeline.

pub mod config;
pub mod dispatch;
mod dom;
pub mod error;
pub mod fetch;
pub mod generic;
pub mod jsonld;
pub mod normalize;
pub mod portals;
pub mod record;

pub use dispatch::{detect_portal, extract};
pub use error::ScrapeError;
pub use record::{JobRecord, Source};
