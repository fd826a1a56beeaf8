//! objcap - Interface-Based Object Model
//!
//! The contract that lets independently compiled modules exchange objects
//! without sharing concrete types: objects are seen only through interface
//! pointers, capabilities are discovered at runtime by identifier, and
//! lifetime is managed by per-object reference counts.
//!
//! # Components
//! - [`HResult`]: status code returned by every protocol operation
//! - [`Guid`] / [`interface!`] / [`uuid_of!`]: interface identity
//! - [`IUnknown`]: dynamic query and reference counting
//! - [`IClassFactory`]: object creation
//! - [`cast`]: typed cast, capability test, null-safe release
//! - [`ComPtr`] / [`ComObject`]: owned references and Rust-implemented objects
//!
//! # Rules
//! - Every reference obtained by query or creation is released exactly once
//! - A failed operation leaves its output pointer null
//! - Reference counts are atomic; objects may be shared between threads

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

extern crate alloc;

#[macro_use]
mod macros;

pub mod cast;
pub mod iface;
pub mod ident;
pub mod object;
pub mod status;

#[cfg(test)]
mod testing;

pub use cast::{implements_interface, interface_cast, safe_release, safe_release_raw, same_object};
pub use iface::{
    factory_entry, ClassFactoryImpl, ConstructorFactory, IClassFactory, IClassFactoryVtbl, IUnknown,
    IUnknownVtbl, Interface, InterfaceEntry,
};
pub use ident::Guid;
pub use object::{unknown_vtable, Class, ComObject, ComPtr, RefCount};
pub use status::{HResult, Result};

#[doc(hidden)]
pub mod __private {
    pub use spin::Once;
}
