//! Objects Implemented in Rust
//!
//! A [`Class`] is a Rust type plus the table of interfaces it exposes.
//! [`ComObject`] places a class value on the heap next to one reference
//! count and one slot per interface, and hands out pointers to those slots
//! as interface pointers.
//!
//! # Object Layout
//! ```text
//! ┌──────────────────────────┐       slots (boxed)
//! │ ComObject<C>             │      ┌────────────────────────────┐
//! │   refs: RefCount         │      │ [0] vtable ─► IUnknownVtbl │ ◄── identity
//! │   slots ─────────────────┼────► │     iid, object ───┐       │
//! │   value: C               │      │ [1] vtable ─► ...  │       │
//! └──────────────────────────┘      │     iid, object ───┤       │
//!        ▲                          └────────────────────┼───────┘
//!        └───────────────────────────────────────────────┘
//! ```
//!
//! Every slot points back at the same object, so all interfaces share one
//! count and one value. Slot 0 is always `IUnknown`.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::type_name;
use core::ffi::c_void;
use core::ptr::{self, NonNull};

use crate::iface::{IUnknown, IUnknownVtbl, Interface, InterfaceEntry};
use crate::ident::Guid;
use crate::status::{HResult, Result};

use super::ptr::ComPtr;
use super::refcount::RefCount;

/// A Rust type that can be exposed as an object.
///
/// The interface table is fixed for the lifetime of every object of the
/// class. `IUnknown` is always exposed and must not be listed.
pub trait Class: Send + Sync + Sized + 'static {
    /// Interfaces exposed in addition to `IUnknown`.
    const INTERFACES: &'static [InterfaceEntry];
}

/// `IUnknown` vtable for objects of class `C`.
///
/// Used as the `base` of every other vtable a class installs.
pub const fn unknown_vtable<C: Class>() -> IUnknownVtbl {
    IUnknownVtbl {
        query_interface: ComObject::<C>::query_interface,
        add_ref: ComObject::<C>::add_ref,
        release: ComObject::<C>::release,
    }
}

/// One interface pointer target inside an object.
#[repr(C)]
struct Slot {
    /// Must stay first: callers read it as the vtable pointer.
    #[allow(dead_code)]
    vtable: *const c_void,
    iid: &'static Guid,
    object: *const c_void,
}

/// Heap object backing a [`Class`] value.
pub struct ComObject<C: Class> {
    refs: RefCount,
    slots: Box<[Slot]>,
    value: C,
}

impl<C: Class> ComObject<C> {
    const UNKNOWN_VTABLE: IUnknownVtbl = unknown_vtable::<C>();

    /// Place `value` in a new object and return its `IUnknown`.
    ///
    /// The object starts with one reference, owned by the returned value.
    ///
    /// # Errors
    /// `E_OUTOFMEMORY` if the interface slots cannot be allocated.
    pub fn create(value: C) -> Result<ComPtr<IUnknown>> {
        let table = C::INTERFACES;

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(table.len() + 1)
            .map_err(|_| HResult::E_OUTOFMEMORY)?;

        // Resolve every identifier before the object exists, so a panic
        // here unwinds through `value` instead of leaking it.
        let unknown: &'static IUnknownVtbl = &Self::UNKNOWN_VTABLE;
        slots.push(Slot {
            vtable: unknown as *const IUnknownVtbl as *const c_void,
            iid: IUnknown::uuid(),
            object: ptr::null(),
        });
        for entry in table {
            let iid = entry.iid();
            debug_assert!(
                slots.iter().all(|slot| slot.iid != iid),
                "{} listed twice in the interface table of {}",
                entry.name(),
                type_name::<C>()
            );
            slots.push(Slot {
                vtable: entry.vtable(),
                iid,
                object: ptr::null(),
            });
        }
        let mut slots = slots.into_boxed_slice();

        let object = Box::into_raw(Box::new(Self {
            refs: RefCount::new(1),
            slots: Box::default(),
            value,
        }));
        for slot in slots.iter_mut() {
            slot.object = object as *const c_void;
        }

        // SAFETY: `object` came from Box::into_raw above and no pointer to
        // it has been handed out yet.
        let identity = unsafe {
            (*object).slots = slots;
            NonNull::from(&(*object).slots[0]).cast::<c_void>()
        };

        log::trace!(
            "created {} exposing {} interfaces",
            type_name::<C>(),
            table.len() + 1
        );

        // SAFETY: the initial reference moves into the ComPtr.
        Ok(unsafe { ComPtr::from_raw(identity) })
    }

    /// Borrow the class value behind an interface pointer.
    ///
    /// For use inside vtable thunks.
    ///
    /// # Safety
    /// `this` must be an interface pointer produced by `ComObject<C>` for
    /// this same `C`, and the object must outlive `'a`.
    #[inline]
    pub unsafe fn from_this<'a>(this: *mut c_void) -> &'a C {
        // SAFETY: forwarded from the caller.
        unsafe { &Self::object(this).value }
    }

    /// Borrow the class value behind an interface reference.
    ///
    /// # Safety
    /// `iface` must have been produced by `ComObject<C>` for this same `C`.
    #[inline]
    pub unsafe fn value_of<I: Interface>(iface: &I) -> &C {
        // SAFETY: forwarded from the caller; `iface` keeps the object alive.
        unsafe { Self::from_this(iface.as_raw().as_ptr()) }
    }

    /// Resolve the object an interface pointer belongs to.
    #[inline]
    unsafe fn object_ptr(this: *mut c_void) -> *mut Self {
        // SAFETY: `this` points at one of this object's slots.
        unsafe { (*(this as *const Slot)).object as *mut Self }
    }

    #[inline]
    unsafe fn object<'a>(this: *mut c_void) -> &'a Self {
        // SAFETY: the object is alive while `this` is.
        unsafe { &*Self::object_ptr(this) }
    }

    fn find(&self, iid: &Guid) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.iid == iid)
    }

    unsafe extern "system" fn query_interface(
        this: *mut c_void,
        riid: *const Guid,
        object: *mut *mut c_void,
    ) -> HResult {
        if object.is_null() {
            return HResult::E_POINTER;
        }
        // SAFETY: checked non-null; the caller guarantees it is writable.
        unsafe { *object = ptr::null_mut() };
        if riid.is_null() {
            return HResult::E_INVALIDARG;
        }

        // SAFETY: `this` is one of our slots and `riid` is non-null.
        let (target, riid) = unsafe { (Self::object(this), &*riid) };
        match target.find(riid) {
            Some(slot) => {
                target.refs.increment();
                // SAFETY: checked non-null above.
                unsafe { *object = slot as *const Slot as *mut c_void };
                HResult::S_OK
            }
            None => HResult::E_NOINTERFACE,
        }
    }

    unsafe extern "system" fn add_ref(this: *mut c_void) -> u32 {
        // SAFETY: the caller holds a reference, so the object is alive.
        unsafe { Self::object(this) }.refs.increment()
    }

    unsafe extern "system" fn release(this: *mut c_void) -> u32 {
        // SAFETY: the caller owns the reference being dropped.
        let object = unsafe { Self::object_ptr(this) };
        let remaining = unsafe { (*object).refs.decrement() };

        if remaining == 0 {
            log::trace!("destroying {}", type_name::<C>());
            // SAFETY: the count reached zero, so this is the only access
            // left; the allocation came from Box::into_raw in `create`.
            drop(unsafe { Box::from_raw(object) });
        }

        remaining
    }
}
