//! Score Index WASM Module
//!
//! Builds a beat-indexed representation of a MusicXML score and answers
//! range, inventory, and melody queries over it. A bidirectional cursor walks
//! one instrument's beats.

pub mod models;
pub mod converters;
pub mod cursor;
pub mod query;
pub mod api;

// Re-export commonly used types
pub use converters::{build_score, musicxml_to_score, BuildError, BuildResult};
pub use cursor::{BeatCursor, CursorError, CursorPosition};
pub use models::*;
pub use query::{LookupMiss, PitchRange};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            wasm_warn!("Logger already initialized");
        }
    }

    log::info!("Score Index WASM module initialized");
}
