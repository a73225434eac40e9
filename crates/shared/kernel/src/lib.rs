//! Portal kernel shared by every feature slice.
//!
//! * [`client`]: register REST client and status mapping.
//! * [`config`]: layered file + environment configuration.
//! * [`notify`], [`confirm`]: toasts and the destructive-action prompt.
//! * [`session`], [`prefs`]: session, grid preferences and drafts in the local store.
//! * [`grid`], [`forms`]: the grid engine and form validators.
//! * [`state`]: the portal state handed to views.
//!
//! ## ID generation
//! Use `safe_nanoid!` for URL-safe, unambiguous IDs:
//! ```rust
//! # use ctn_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```
pub mod client;
pub mod config;
pub mod confirm;
pub mod forms;
pub mod grid;
pub mod notify;
pub mod prefs;
#[cfg(feature = "server")]
pub mod server;
pub mod session;
pub mod state;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use ctn_domain as domain;
pub use nanoid::nanoid;

/// Generates an unambiguous `NanoID` (no visually confusing characters).
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!(12, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}
