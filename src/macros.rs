//! Declaration Macros
//!
//! `interface!` turns a vtable type and an identifier literal into an
//! interface pointer type; `uuid_of!` resolves that identifier by type.

/// Declare an interface pointer type.
///
/// The generated type is a borrowed, non-owning view of one interface on a
/// live object. It can only be built through [`Interface::from_raw`]; owned
/// references are held as [`ComPtr`].
///
/// The vtable type must be `#[repr(C)]` and start with [`IUnknownVtbl`]
/// (directly or through its own first field).
///
/// ```ignore
/// #[repr(C)]
/// pub struct IClockVtbl {
///     pub base: IUnknownVtbl,
///     pub now: unsafe extern "system" fn(this: *mut c_void) -> u64,
/// }
///
/// interface! {
///     /// Monotonic time source.
///     pub struct IClock(IClockVtbl) = "3C0C5E51-8E2D-4F77-A1B9-52C4D6E8F001";
/// }
/// ```
///
/// [`Interface::from_raw`]: crate::Interface::from_raw
/// [`ComPtr`]: crate::ComPtr
/// [`IUnknownVtbl`]: crate::IUnknownVtbl
#[macro_export]
macro_rules! interface {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident($vtable:ty) = $iid:literal;
    ) => {
        $(#[$attr])*
        #[repr(transparent)]
        $vis struct $name(::core::ptr::NonNull<::core::ffi::c_void>);

        unsafe impl $crate::Interface for $name {
            type Vtable = $vtable;

            const NAME: &'static str = ::core::stringify!($name);

            fn uuid() -> &'static $crate::Guid {
                static ID: $crate::__private::Once<$crate::Guid> = $crate::__private::Once::new();
                ID.call_once(|| {
                    $crate::ident::declare(
                        ::core::concat!(::core::module_path!(), "::", ::core::stringify!($name)),
                        $iid,
                    )
                })
            }

            #[inline]
            unsafe fn from_raw(raw: ::core::ptr::NonNull<::core::ffi::c_void>) -> Self {
                Self(raw)
            }

            #[inline]
            fn as_raw(&self) -> ::core::ptr::NonNull<::core::ffi::c_void> {
                self.0
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::write!(f, "{}({:p})", ::core::stringify!($name), self.0)
            }
        }
    };
}

/// Resolve the identifier of an interface type without an instance.
///
/// ```ignore
/// let iid = uuid_of!(IClassFactory);
/// ```
#[macro_export]
macro_rules! uuid_of {
    ($interface:ty) => {
        <$interface as $crate::Interface>::uuid()
    };
}
