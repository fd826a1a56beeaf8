//! Capability Interfaces
//!
//! An interface is a pure contract: an ordered table of operation slots with
//! no stored state. Objects are handed around as pointers to one of their
//! interfaces, and the first word behind every such pointer is the address
//! of that interface's vtable.
//!
//! # Layout
//! ```text
//!  interface pointer ──► ┌──────────────┐      ┌────────────────────┐
//!                        │ vtable ptr   │ ───► │ query_interface    │ ┐
//!                        ├──────────────┤      │ add_ref            │ │ IUnknownVtbl
//!                        │ (object data │      │ release            │ ┘
//!                        │  not visible │      ├────────────────────┤
//!                        │  to callers) │      │ interface slots... │
//!                        └──────────────┘      └────────────────────┘
//! ```
//!
//! Every vtable starts with [`IUnknownVtbl`], so any interface pointer can
//! be used as an [`IUnknown`].

use core::ffi::c_void;
use core::ptr::NonNull;

use crate::ident::Guid;

pub mod factory;
pub mod unknown;

pub use factory::{
    factory_entry, ClassFactoryImpl, ConstructorFactory, IClassFactory, IClassFactoryVtbl,
};
pub use unknown::{IUnknown, IUnknownVtbl};

/// An interface pointer type.
///
/// Implemented by the `interface!` macro; hand-written impls are possible
/// but must uphold the same layout.
///
/// # Safety
/// - `Self` must be `#[repr(transparent)]` over `NonNull<c_void>`
/// - `Vtable` must be `#[repr(C)]` and begin with [`IUnknownVtbl`]
/// - `uuid` must return the same identifier on every call
pub unsafe trait Interface: Sized + 'static {
    /// Operation table behind the pointer.
    type Vtable: 'static;

    /// Interface name, for diagnostics.
    const NAME: &'static str;

    /// Identifier of this interface, resolved once per process.
    fn uuid() -> &'static Guid;

    /// Wrap a raw interface pointer.
    ///
    /// # Safety
    /// `raw` must point to a live object exposing this interface, and the
    /// object must stay alive for as long as the returned value is used.
    unsafe fn from_raw(raw: NonNull<c_void>) -> Self;

    /// Get the raw interface pointer.
    fn as_raw(&self) -> NonNull<c_void>;

    /// Get the operation table.
    #[inline]
    fn vtable(&self) -> &Self::Vtable {
        // SAFETY: the first word behind a live interface pointer is the
        // address of its vtable, which outlives the object.
        unsafe { &**(self.as_raw().as_ptr() as *const *const Self::Vtable) }
    }

    /// View this interface as its `IUnknown` prefix.
    #[inline]
    fn as_unknown(&self) -> &IUnknown {
        // SAFETY: both types are transparent over the same pointer and
        // every vtable begins with IUnknownVtbl.
        unsafe { &*(self as *const Self as *const IUnknown) }
    }
}

/// One row of a class's interface table.
///
/// Pairs an interface identifier with the vtable a class uses for it.
#[derive(Clone, Copy)]
pub struct InterfaceEntry {
    iid: fn() -> &'static Guid,
    name: &'static str,
    vtable: *const c_void,
}

// SAFETY: the vtable pointer refers to immutable static data.
unsafe impl Send for InterfaceEntry {}
unsafe impl Sync for InterfaceEntry {}

impl InterfaceEntry {
    /// Create a table row for interface `I`.
    ///
    /// # Safety
    /// Every thunk in `vtable` must expect `this` to be an interface
    /// pointer produced by `ComObject<C>`, where `C` is the class whose
    /// table holds this row.
    pub const unsafe fn new<I: Interface>(vtable: &'static I::Vtable) -> Self {
        Self {
            iid: I::uuid,
            name: I::NAME,
            vtable: vtable as *const I::Vtable as *const c_void,
        }
    }

    /// Identifier of the interface this row exposes.
    #[inline]
    pub fn iid(&self) -> &'static Guid {
        (self.iid)()
    }

    /// Name of the interface this row exposes.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Vtable address stored in the object slot.
    #[inline]
    pub(crate) const fn vtable(&self) -> *const c_void {
        self.vtable
    }
}

impl core::fmt::Debug for InterfaceEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "InterfaceEntry({}, {})", self.name, self.iid())
    }
}
