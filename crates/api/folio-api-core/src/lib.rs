//! folio-api-core: the style value model shared by the motion and page crates.
//!
//! Everything a timeline writes into a host is expressed with these types:
//! a [`TargetPath`] naming the element, a [`Property`] from the renderer's
//! supported set, and a [`Value`]. Hosts receive the writes as a [`WriteBatch`].

pub mod coercion;
pub mod error;
pub mod property;
pub mod style;
pub mod target_path;
pub mod value;
pub mod write_ops;

pub use error::ApiError;
pub use property::Property;
pub use style::StyleMap;
pub use target_path::TargetPath;
pub use value::{Value, ValueKind};
pub use write_ops::{StyleWrite, WriteBatch};
