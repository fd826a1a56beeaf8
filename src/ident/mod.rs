//! Interface Identity
//!
//! Every interface is named by one [`Guid`], written as a literal next to
//! the interface declaration and resolved lazily on first use.
//!
//! # Design
//! - The literal is parsed once per interface and cached for the process
//! - Resolution never needs an instance of the interface
//! - Debug builds record each identifier and refuse duplicates

pub mod guid;
pub mod registry;

pub use guid::{parse_canonical, Guid, GuidError};
pub use registry::{IdCollision, IdRegistry};

/// Resolve an interface's identifier literal.
///
/// Called from the accessor generated by `interface!` with the interface's
/// module-qualified name; the result is cached there, so this runs once per
/// interface.
///
/// # Panics
/// Panics if the literal is malformed, or if uniqueness checks are enabled
/// and another interface already owns the same identifier. Both are
/// programming errors in an interface declaration.
pub fn declare(name: &'static str, literal: &str) -> Guid {
    let id = match parse_canonical(literal) {
        Ok(id) => id,
        Err(e) => panic!("interface {} has malformed identifier {:?}: {}", name, literal, e),
    };

    if registry::CHECK_UNIQUE {
        if let Err(collision) = registry::global().register(name, id) {
            log::error!("{}", collision);
            panic!("{}", collision);
        }
    }

    log::debug!("resolved interface {} = {}", name, id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_parses_literal() {
        let id = declare("IDeclareProbe", "5E1D0A7B-7C54-4B0E-9C1A-3F2A1B0C9D01");
        assert_eq!(id, parse_canonical("5e1d0a7b-7c54-4b0e-9c1a-3f2a1b0c9d01").unwrap());
    }

    #[test]
    #[should_panic(expected = "malformed identifier")]
    fn test_declare_rejects_malformed_literal() {
        declare("IBroken", "not-an-identifier");
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-ids"))]
    #[should_panic(expected = "claimed by both")]
    fn test_declare_rejects_duplicate_identifier() {
        declare("IFirstClaim", "5E1D0A7B-7C54-4B0E-9C1A-3F2A1B0C9D02");
        declare("ISecondClaim", "5E1D0A7B-7C54-4B0E-9C1A-3F2A1B0C9D02");
    }

    mod first {
        crate::interface! {
            pub struct IShared(crate::IUnknownVtbl) = "5E1D0A7B-7C54-4B0E-9C1A-3F2A1B0C9D77";
        }
    }

    mod second {
        crate::interface! {
            pub struct IShared(crate::IUnknownVtbl) = "5E1D0A7B-7C54-4B0E-9C1A-3F2A1B0C9D77";
        }
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-ids"))]
    #[should_panic(expected = "claimed by both")]
    fn test_same_named_interfaces_cannot_share_identifier() {
        uuid_of!(first::IShared);
        uuid_of!(second::IShared);
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "strict-ids"))]
    fn test_registry_records_qualified_name() {
        use crate::iface::IClassFactory;

        let id = uuid_of!(IClassFactory);
        assert_eq!(registry::global().lookup(id), Some("objcap::iface::factory::IClassFactory"));
    }

    #[test]
    fn test_uuid_of_is_stable() {
        use crate::iface::{IClassFactory, IUnknown};

        let a = uuid_of!(IUnknown);
        let b = uuid_of!(IUnknown);
        assert_eq!(a, b);
        assert!(core::ptr::eq(a, b));
        assert_eq!(*a, parse_canonical("91B5E844-05DB-434d-AAAA-9E0FE55C39D1").unwrap());
        assert_ne!(uuid_of!(IClassFactory), a);
    }
}
