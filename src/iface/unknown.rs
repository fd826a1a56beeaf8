//! IUnknown
//!
//! The root interface. Every other interface begins with its three slots:
//! dynamic query and the two reference-count operations.
//!
//! # Protocol
//! - `query_interface` either stores a pointer to the requested interface
//!   on the same object and adds one reference, or stores null and
//!   returns `E_NOINTERFACE` without touching the count
//! - `add_ref` / `release` return the new count; the release that reaches
//!   zero destroys the object
//! - Every reference obtained through query or creation is released once

use core::ffi::c_void;
use core::ptr;

use crate::cast;
use crate::ident::Guid;
use crate::object::ComPtr;
use crate::status::{HResult, Result};

use super::Interface;

/// Operation table of [`IUnknown`].
#[repr(C)]
pub struct IUnknownVtbl {
    /// Look up another interface on the same object.
    pub query_interface: unsafe extern "system" fn(
        this: *mut c_void,
        riid: *const Guid,
        object: *mut *mut c_void,
    ) -> HResult,

    /// Add one reference, returning the new count.
    pub add_ref: unsafe extern "system" fn(this: *mut c_void) -> u32,

    /// Drop one reference, returning the new count.
    pub release: unsafe extern "system" fn(this: *mut c_void) -> u32,
}

crate::interface! {
    /// Base interface implemented by every object.
    pub struct IUnknown(IUnknownVtbl) = "91B5E844-05DB-434d-AAAA-9E0FE55C39D1";
}

impl IUnknown {
    /// Raw dynamic query.
    ///
    /// On success `*object` holds an owned reference to the requested
    /// interface. On failure it holds null.
    ///
    /// # Safety
    /// `riid` must be null or point to a valid identifier, and `object`
    /// must be null or valid for a pointer-sized write.
    #[inline]
    pub unsafe fn query_interface(&self, riid: *const Guid, object: *mut *mut c_void) -> HResult {
        let query = self.vtable().query_interface;
        // SAFETY: `self` is a live interface pointer; arguments are the
        // caller's responsibility.
        unsafe { query(self.as_raw().as_ptr(), riid, object) }
    }

    /// Query for interface `I`, returning an owned reference.
    pub fn query<I: Interface>(&self) -> Result<ComPtr<I>> {
        let mut out = None;
        let hr = cast::interface_cast::<I>(self, &mut out);
        out.ok_or(hr)
    }

    /// Query by explicit identifier, returning the result as `IUnknown`.
    pub fn query_iid(&self, iid: &Guid) -> Result<ComPtr<IUnknown>> {
        let mut raw = ptr::null_mut();
        // SAFETY: both arguments point to valid stack or static data.
        let hr = unsafe { self.query_interface(iid, &mut raw) };
        hr.ok()?;
        match ptr::NonNull::new(raw) {
            // SAFETY: a successful query hands over one reference.
            Some(raw) => Ok(unsafe { ComPtr::from_raw(raw) }),
            None => Err(HResult::E_POINTER),
        }
    }

    /// Add one reference, returning the new count.
    ///
    /// The added reference must eventually be matched by [`release`].
    ///
    /// [`release`]: IUnknown::release
    #[inline]
    pub fn add_ref(&self) -> u32 {
        let add_ref = self.vtable().add_ref;
        // SAFETY: `self` is a live interface pointer.
        unsafe { add_ref(self.as_raw().as_ptr()) }
    }

    /// Drop one reference, returning the new count.
    ///
    /// # Safety
    /// The caller must own the reference being dropped. If the count
    /// reaches zero the object is gone and no pointer to it may be used.
    #[inline]
    pub unsafe fn release(&self) -> u32 {
        let release = self.vtable().release;
        // SAFETY: `self` is a live interface pointer owned by the caller.
        unsafe { release(self.as_raw().as_ptr()) }
    }
}
