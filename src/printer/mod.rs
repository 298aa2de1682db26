//! C pretty printer back end
//!
//! - [`doc`]: layout instruction vocabulary
//! - [`emit`]: AST → [`doc::Doc`] per node kind
//! - [`layout`]: reference engine turning a `Doc` into text for a width

pub mod doc;
pub mod emit;
pub mod layout;

pub use doc::Doc;
pub use emit::{print, UnsupportedNodeError};
pub use layout::render;
