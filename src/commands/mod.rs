//! Command implementations

pub mod completions;
pub mod helpers;
pub mod inspect;
pub mod list;
pub mod pack;
pub mod relocate;
pub mod vendor;
pub mod verify;
pub mod version;
