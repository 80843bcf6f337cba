//! Obseris (workspace facade crate).
//!
//! Re-exports `obseris::{core,adapter,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use obseris_adapter as adapter;
pub use obseris_core as core;
pub use obseris_types as types;
