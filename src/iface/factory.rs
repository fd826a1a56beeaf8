//! IClassFactory
//!
//! A factory is itself obtained through query and then used to mint new
//! objects. `create_instance` builds an object holding one reference,
//! queries it for the requested interface, and drops its own reference,
//! so the caller ends up owning exactly one reference or none.

use core::ffi::c_void;
use core::ptr::{self, NonNull};

use crate::ident::Guid;
use crate::object::{unknown_vtable, Class, ComObject, ComPtr};
use crate::status::{HResult, Result};

use super::{IUnknown, IUnknownVtbl, Interface, InterfaceEntry};

/// Operation table of [`IClassFactory`].
#[repr(C)]
pub struct IClassFactoryVtbl {
    /// Inherited `IUnknown` slots.
    pub base: IUnknownVtbl,

    /// Create an object and return its `riid` interface.
    pub create_instance: unsafe extern "system" fn(
        this: *mut c_void,
        riid: *const Guid,
        object: *mut *mut c_void,
    ) -> HResult,
}

impl IClassFactoryVtbl {
    /// Vtable for a factory implemented by class `C`.
    pub const fn new<C: ClassFactoryImpl>() -> Self {
        Self {
            base: unknown_vtable::<C>(),
            create_instance: create_instance::<C>,
        }
    }
}

crate::interface! {
    /// Factory for new objects.
    pub struct IClassFactory(IClassFactoryVtbl) = "C1621CCE-40F5-46c0-9397-088475E0B2FA";
}

impl IClassFactory {
    /// Raw object creation.
    ///
    /// # Safety
    /// `riid` must be null or point to a valid identifier, and `object`
    /// must be null or valid for a pointer-sized write.
    #[inline]
    pub unsafe fn create_instance_raw(&self, riid: *const Guid, object: *mut *mut c_void) -> HResult {
        let create = self.vtable().create_instance;
        // SAFETY: `self` is a live factory; arguments are the caller's
        // responsibility.
        unsafe { create(self.as_raw().as_ptr(), riid, object) }
    }

    /// Create a new object and return its `I` interface.
    pub fn create_instance<I: Interface>(&self) -> Result<ComPtr<I>> {
        let mut raw = ptr::null_mut();
        // SAFETY: both arguments point to valid stack or static data.
        let hr = unsafe { self.create_instance_raw(I::uuid(), &mut raw) };
        hr.ok()?;
        match NonNull::new(raw) {
            // SAFETY: a successful creation hands over one reference.
            Some(raw) => Ok(unsafe { ComPtr::from_raw(raw) }),
            None => Err(HResult::E_POINTER),
        }
    }
}

/// Rust-side implementation of [`IClassFactory`].
pub trait ClassFactoryImpl: Class {
    /// Factory vtable for this class.
    const VTABLE: IClassFactoryVtbl = IClassFactoryVtbl::new::<Self>();

    /// Build a new object holding exactly one reference.
    ///
    /// Allocation failures should be reported as `E_OUTOFMEMORY`; other
    /// construction failures as `E_FAIL` or `E_INVALIDARG`.
    fn construct(&self) -> Result<ComPtr<IUnknown>>;
}

/// Interface table row exposing `IClassFactory` for class `C`.
pub const fn factory_entry<C: ClassFactoryImpl>() -> InterfaceEntry {
    // SAFETY: the vtable's thunks resolve `this` as a ComObject<C>.
    unsafe { InterfaceEntry::new::<IClassFactory>(&<C as ClassFactoryImpl>::VTABLE) }
}

unsafe extern "system" fn create_instance<C: ClassFactoryImpl>(
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

    // SAFETY: this thunk is only installed in ComObject<C> slots.
    let factory = unsafe { ComObject::<C>::from_this(this) };
    let instance = match factory.construct() {
        Ok(instance) => instance,
        Err(hr) => return hr,
    };

    // `instance` drops the construction reference on return.
    // SAFETY: `riid` and `object` were checked above.
    unsafe { instance.query_interface(riid, object) }
}

/// Ready-made factory that builds `ComObject<C>` from a constructor.
pub struct ConstructorFactory<C: Class> {
    construct: fn() -> Result<C>,
}

impl<C: Class> ConstructorFactory<C> {
    /// Create a factory around `construct`.
    pub const fn new(construct: fn() -> Result<C>) -> Self {
        Self { construct }
    }

    /// Create the factory as an object and return its `IClassFactory`.
    pub fn create(construct: fn() -> Result<C>) -> Result<ComPtr<IClassFactory>> {
        ComObject::create(Self::new(construct))?.query()
    }
}

impl<C: Class> Class for ConstructorFactory<C> {
    const INTERFACES: &'static [InterfaceEntry] = &[factory_entry::<Self>()];
}

impl<C: Class> ClassFactoryImpl for ConstructorFactory<C> {
    fn construct(&self) -> Result<ComPtr<IUnknown>> {
        ComObject::create((self.construct)()?)
    }
}
