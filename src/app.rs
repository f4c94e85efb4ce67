//! Application module: the browsing model and the playback session.
//!
//! `App` (in `app::model`) holds the catalog, cursors and language.
//! `Session` (in `app::session`) decides what should be playing.

mod model;
mod session;

pub use model::*;
pub use session::*;
