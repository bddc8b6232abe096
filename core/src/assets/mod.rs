//! Binary model and animation assets.
//!
//! Both formats are little-endian with no magic bytes. Loaders validate the
//! content they read, so a loaded model or clip set can be drawn and played
//! without further checks.

mod animation;
mod model;
mod reader;


pub use animation::{load_animations, load_animations_for, write_animations};
pub use model::{load_model, write_model};
