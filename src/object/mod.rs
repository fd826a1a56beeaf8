//! Object Implementation Kit
//!
//! Building blocks for objects written in Rust and for holding references
//! to objects from anywhere:
//! - [`RefCount`]: the per-object atomic count
//! - [`ComPtr`]: one owned reference, released on drop
//! - [`Class`] / [`ComObject`]: a Rust value exposed through an interface table

mod class;
mod ptr;
mod refcount;

pub use class::{unknown_vtable, Class, ComObject};
pub use ptr::ComPtr;
pub use refcount::RefCount;
