//! Owned Interface References
//!
//! [`ComPtr`] owns exactly one reference to an object through interface
//! `I`. Cloning adds a reference and dropping releases it, so a `ComPtr`
//! can never be released twice or used after its own release.
//!
//! Raw pointers cross the boundary through `from_raw` / `into_raw`, which
//! transfer ownership without touching the count.

use core::ffi::c_void;
use core::fmt;
use core::mem;
use core::ops::Deref;
use core::ptr::NonNull;

use crate::cast;
use crate::iface::{IUnknown, Interface};
use crate::status::Result;

/// One owned reference to interface `I`.
#[repr(transparent)]
pub struct ComPtr<I: Interface> {
    iface: I,
}

// SAFETY: reference counts are atomic and every object exposed through
// this protocol may be shared between execution contexts.
unsafe impl<I: Interface> Send for ComPtr<I> {}
unsafe impl<I: Interface> Sync for ComPtr<I> {}

impl<I: Interface> ComPtr<I> {
    /// Take ownership of one reference held in a raw pointer.
    ///
    /// # Safety
    /// `raw` must be an interface pointer of type `I` carrying a reference
    /// the caller owns; that reference moves into the returned value.
    #[inline]
    pub unsafe fn from_raw(raw: NonNull<c_void>) -> Self {
        Self {
            // SAFETY: forwarded from the caller.
            iface: unsafe { I::from_raw(raw) },
        }
    }

    /// Add a reference to a borrowed interface and own it.
    pub fn from_ref(iface: &I) -> Self {
        iface.as_unknown().add_ref();
        // SAFETY: the reference added above now belongs to the result.
        unsafe { Self::from_raw(iface.as_raw()) }
    }

    /// Get the raw pointer without giving up ownership.
    #[inline]
    pub fn as_raw(&self) -> NonNull<c_void> {
        self.iface.as_raw()
    }

    /// Give up ownership, returning the raw pointer.
    ///
    /// The caller becomes responsible for the reference.
    #[inline]
    pub fn into_raw(self) -> NonNull<c_void> {
        let raw = self.as_raw();
        mem::forget(self);
        raw
    }

    /// Convert into an `IUnknown` reference without touching the count.
    ///
    /// The result is the same pointer, not the object's identity pointer;
    /// use [`query`] for identity comparisons.
    ///
    /// [`query`]: ComPtr::query
    #[inline]
    pub fn into_unknown(self) -> ComPtr<IUnknown> {
        // SAFETY: every interface pointer is a valid IUnknown pointer and
        // ownership moves with it.
        unsafe { ComPtr::from_raw(self.into_raw()) }
    }

    /// Query the object for interface `J`.
    #[inline]
    pub fn query<J: Interface>(&self) -> Result<ComPtr<J>> {
        self.iface.as_unknown().query()
    }

    /// Check whether the object implements interface `J`.
    #[inline]
    pub fn implements<J: Interface>(&self) -> bool {
        cast::implements_interface(self.iface.as_unknown(), J::uuid())
    }

    /// Check whether two references lead to the same object.
    #[inline]
    pub fn same_object<J: Interface>(&self, other: &ComPtr<J>) -> bool {
        cast::same_object(self.iface.as_unknown(), other.iface.as_unknown())
    }
}

impl<I: Interface> Deref for ComPtr<I> {
    type Target = I;

    #[inline]
    fn deref(&self) -> &I {
        &self.iface
    }
}

impl<I: Interface> Clone for ComPtr<I> {
    fn clone(&self) -> Self {
        Self::from_ref(&self.iface)
    }
}

impl<I: Interface> Drop for ComPtr<I> {
    fn drop(&mut self) {
        // SAFETY: this value owns exactly one reference.
        unsafe {
            self.iface.as_unknown().release();
        }
    }
}

impl<I: Interface> fmt::Debug for ComPtr<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComPtr<{}>({:p})", I::NAME, self.as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ref_count, DropLog, IGadget, IWidget, Widget};

    #[test]
    fn test_clone_and_drop_balance() {
        let log = DropLog::new();
        let widget = Widget::create(3, &log);
        assert_eq!(ref_count(&widget), 1);

        let copy = widget.clone();
        assert_eq!(ref_count(&widget), 2);
        assert!(copy.same_object(&widget));

        drop(copy);
        assert_eq!(ref_count(&widget), 1);
        assert_eq!(log.count(), 0);

        drop(widget);
        assert_eq!(log.count(), 1);
    }

    #[test]
    fn test_raw_round_trip_keeps_count() {
        let log = DropLog::new();
        let widget = Widget::create(3, &log);

        let raw = widget.into_raw();
        // SAFETY: `raw` carries the reference given up above.
        let widget = unsafe { ComPtr::<IUnknown>::from_raw(raw) };
        assert_eq!(ref_count(&widget), 1);
        assert_eq!(log.count(), 0);
    }

    #[test]
    fn test_from_ref_adds_reference() {
        let log = DropLog::new();
        let widget = Widget::create(3, &log);
        let view: &IUnknown = &widget;

        let owned = ComPtr::from_ref(view);
        assert_eq!(ref_count(&widget), 2);
        drop(owned);
        assert_eq!(ref_count(&widget), 1);
    }

    #[test]
    fn test_typed_query_and_upcast() {
        let log = DropLog::new();
        let widget = Widget::create(5, &log);

        let typed: ComPtr<IWidget> = widget.query().unwrap();
        assert_eq!(typed.value(), 5);
        assert!(typed.implements::<IGadget>());

        let back = typed.into_unknown();
        assert_eq!(ref_count(&widget), 2);
        assert!(back.same_object(&widget));
    }

    #[test]
    fn test_moves_between_threads() {
        let log = DropLog::new();
        let widget: ComPtr<IWidget> = Widget::create(9, &log).query().unwrap();

        let handle = std::thread::spawn(move || widget.value());
        assert_eq!(handle.join().unwrap(), 9);
        assert_eq!(log.count(), 1);
    }
}
