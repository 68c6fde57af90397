//! Static lookup tables shared by the configen pipeline.
//!
//! Three external collaborators live here, kept separate from the translation
//! logic so they can evolve with the library being migrated:
//!
//! - [`find_library_mapping`]: third-party library id → CMake package
//!   descriptor (a masked entry means the library is intentionally
//!   unsupported).
//! - [`platform_predicate`]: platform/config token → CMake predicate symbol.
//! - [`symbol_name`]: free-text label → identifier usable in generated
//!   symbols (`FEATURE_*`, `INPUT_*`, `TEST_*`).

mod libraries;
mod platforms;
mod symbols;

pub use libraries::{LibraryMapping, find_library_mapping};
pub use platforms::platform_predicate;
pub use symbols::symbol_name;
