//! Casting Helpers
//!
//! Free functions built only on `IUnknown`: typed cast, capability test,
//! identity test, and null-safe release.

use core::ffi::c_void;
use core::ptr::{self, NonNull};

use crate::iface::{IUnknown, Interface};
use crate::ident::Guid;
use crate::object::ComPtr;
use crate::status::HResult;

/// Query `unknown` for interface `I`.
///
/// On success `out` holds one owned reference; on failure it is `None` and
/// the failure code is returned.
pub fn interface_cast<I: Interface>(unknown: &IUnknown, out: &mut Option<ComPtr<I>>) -> HResult {
    let mut raw = ptr::null_mut();
    // SAFETY: both arguments point to valid stack or static data.
    let hr = unsafe { unknown.query_interface(I::uuid(), &mut raw) };

    if hr.failed() {
        *out = None;
        return hr;
    }

    match NonNull::new(raw) {
        Some(raw) => {
            // SAFETY: a successful query hands over one reference.
            *out = Some(unsafe { ComPtr::from_raw(raw) });
            hr
        }
        None => {
            *out = None;
            HResult::E_POINTER
        }
    }
}

/// Check whether `unknown` implements the interface named `iid`.
///
/// The reference obtained by the probe is released before returning.
pub fn implements_interface(unknown: &IUnknown, iid: &Guid) -> bool {
    unknown.query_iid(iid).is_ok()
}

/// Check whether two interface pointers belong to the same object.
///
/// Compares the pointers each object returns for `IUnknown`.
pub fn same_object(a: &IUnknown, b: &IUnknown) -> bool {
    match (a.query::<IUnknown>(), b.query::<IUnknown>()) {
        (Ok(a), Ok(b)) => a.as_raw() == b.as_raw(),
        _ => false,
    }
}

/// Release `unknown` if present.
///
/// # Safety
/// If present, the caller must own the reference being dropped.
#[inline]
pub unsafe fn safe_release(unknown: Option<&IUnknown>) {
    if let Some(unknown) = unknown {
        // SAFETY: forwarded from the caller.
        unsafe {
            unknown.release();
        }
    }
}

/// Release a raw interface pointer if it is non-null.
///
/// # Safety
/// If non-null, `raw` must be a live interface pointer carrying a
/// reference the caller owns.
#[inline]
pub unsafe fn safe_release_raw(raw: *mut c_void) {
    if let Some(raw) = NonNull::new(raw) {
        // SAFETY: forwarded from the caller.
        unsafe {
            IUnknown::from_raw(raw).release();
        }
    }
}
