#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `dcc-rs` decodes and encodes DCC directional sprite files.
//!
//! A DCC file stores one animation from up to 32 compass directions. Each
//! direction decodes into a sequence of palette-index frames sharing one
//! bounding box.
//!
pub use dcc_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use dcc_dylib;
