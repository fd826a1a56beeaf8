//! Status Codes
//!
//! Every protocol operation reports its outcome as an [`HResult`]: a signed
//! 32-bit value whose sign bit separates success from failure. The value is
//! plain data so it can cross module boundaries where unwinding is not safe.
//!
//! # Bit Layout
//! ```text
//!  31  30..29  28 ........ 16  15 ......... 0
//! ┌───┬───────┬──────────────┬───────────────┐
//! │ S │ rsvd  │   facility   │     code      │
//! └───┴───────┴──────────────┴───────────────┘
//! ```
//! `S = 1` marks a failure, so every failure is a negative `i32`.

use core::fmt;

/// Facility for codes that carry no facility information.
pub const FACILITY_NULL: u16 = 0;

/// Facility for interface-specific codes (class factories, aggregation).
pub const FACILITY_ITF: u16 = 4;

/// Facility for codes wrapping platform error numbers.
pub const FACILITY_WIN32: u16 = 7;

/// Mask for the 13 facility bits.
const FACILITY_MASK: u32 = 0x1FFF;

/// Severity bit.
const SEVERITY_BIT: u32 = 1 << 31;

/// Outcome of a protocol operation.
///
/// Non-negative values are successes, negative values are failures.
/// Callers must check the outcome before trusting any output parameter.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct HResult(pub i32);

impl HResult {
    /// Operation succeeded.
    pub const S_OK: Self = Self(0);

    /// Operation succeeded, answering "no" or "nothing to do".
    pub const S_FALSE: Self = Self(1);

    /// Operation is not implemented.
    pub const E_NOTIMPL: Self = Self(0x8000_4001_u32 as i32);

    /// Allocation failed.
    pub const E_OUTOFMEMORY: Self = Self(0x8007_000E_u32 as i32);

    /// An argument was rejected.
    pub const E_INVALIDARG: Self = Self(0x8007_0057_u32 as i32);

    /// The object does not implement the requested interface.
    pub const E_NOINTERFACE: Self = Self(0x8000_4002_u32 as i32);

    /// A required pointer was null or invalid.
    pub const E_POINTER: Self = Self(0x8000_4003_u32 as i32);

    /// A handle was invalid.
    pub const E_HANDLE: Self = Self(0x8007_0006_u32 as i32);

    /// Operation was aborted.
    pub const E_ABORT: Self = Self(0x8000_4004_u32 as i32);

    /// Unspecified failure.
    pub const E_FAIL: Self = Self(0x8000_4005_u32 as i32);

    /// Access was denied.
    pub const E_ACCESSDENIED: Self = Self(0x8007_0005_u32 as i32);

    /// The class does not support aggregation.
    pub const CLASS_E_NOAGGREGATION: Self = Self(0x8004_0110_u32 as i32);

    /// Well-known codes and their symbolic names.
    const NAMED: [(Self, &'static str); 12] = [
        (Self::S_OK, "S_OK"),
        (Self::S_FALSE, "S_FALSE"),
        (Self::E_NOTIMPL, "E_NOTIMPL"),
        (Self::E_OUTOFMEMORY, "E_OUTOFMEMORY"),
        (Self::E_INVALIDARG, "E_INVALIDARG"),
        (Self::E_NOINTERFACE, "E_NOINTERFACE"),
        (Self::E_POINTER, "E_POINTER"),
        (Self::E_HANDLE, "E_HANDLE"),
        (Self::E_ABORT, "E_ABORT"),
        (Self::E_FAIL, "E_FAIL"),
        (Self::E_ACCESSDENIED, "E_ACCESSDENIED"),
        (Self::CLASS_E_NOAGGREGATION, "CLASS_E_NOAGGREGATION"),
    ];

    /// Build a code from its parts.
    ///
    /// Facility bits beyond the 13-bit field are discarded.
    #[inline]
    pub const fn from_parts(failure: bool, facility: u16, code: u16) -> Self {
        let severity = if failure { SEVERITY_BIT } else { 0 };
        let facility = ((facility as u32) & FACILITY_MASK) << 16;
        Self((severity | facility | code as u32) as i32)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Get the raw value as an unsigned bit pattern.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    /// True for any non-negative value.
    #[inline]
    pub const fn succeeded(self) -> bool {
        self.0 >= 0
    }

    /// True for any negative value.
    #[inline]
    pub const fn failed(self) -> bool {
        self.0 < 0
    }

    /// Facility field (bits 16..=28).
    #[inline]
    pub const fn facility(self) -> u16 {
        ((self.bits() >> 16) & FACILITY_MASK) as u16
    }

    /// Code field (bits 0..=15).
    #[inline]
    pub const fn code(self) -> u16 {
        (self.bits() & 0xFFFF) as u16
    }

    /// Convert into a `Result`, keeping any failure as the error.
    ///
    /// Alternate successes such as `S_FALSE` map to `Ok(())`.
    #[inline]
    pub fn ok(self) -> Result<()> {
        if self.succeeded() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Symbolic name for well-known codes.
    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(hr, _)| *hr == self)
            .map(|(_, name)| *name)
    }
}

impl Default for HResult {
    fn default() -> Self {
        Self::S_OK
    }
}

impl From<HResult> for Result<()> {
    fn from(hr: HResult) -> Self {
        hr.ok()
    }
}

impl<T> From<Result<T>> for HResult {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(_) => Self::S_OK,
            Err(hr) => hr,
        }
    }
}

impl fmt::Debug for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "HResult({})", name),
            None => write!(f, "HResult({:#010x})", self.bits()),
        }
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#010x}", self.bits()),
        }
    }
}

/// Result type used by the Rust-side wrappers.
pub type Result<T> = core::result::Result<T, HResult>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_classifies_outcome() {
        assert!(HResult::S_OK.succeeded());
        assert!(HResult::S_FALSE.succeeded());
        assert!(HResult(42).succeeded());

        for (hr, _) in HResult::NAMED.iter().skip(2) {
            assert!(hr.failed(), "{} should be a failure", hr);
            assert!(hr.raw() < 0);
        }
    }

    #[test]
    fn test_well_known_bit_patterns() {
        assert_eq!(HResult::E_NOINTERFACE.bits(), 0x8000_4002);
        assert_eq!(HResult::E_OUTOFMEMORY.bits(), 0x8007_000E);
        assert_eq!(HResult::CLASS_E_NOAGGREGATION.bits(), 0x8004_0110);
    }

    #[test]
    fn test_layout_accessors() {
        assert_eq!(HResult::E_INVALIDARG.facility(), FACILITY_WIN32);
        assert_eq!(HResult::E_INVALIDARG.code(), 0x57);
        assert_eq!(HResult::CLASS_E_NOAGGREGATION.facility(), FACILITY_ITF);
        assert_eq!(HResult::E_FAIL.facility(), FACILITY_NULL);

        let custom = HResult::from_parts(true, FACILITY_ITF, 0x0200);
        assert!(custom.failed());
        assert_eq!(custom.facility(), FACILITY_ITF);
        assert_eq!(custom.code(), 0x0200);
        assert_eq!(HResult::from_parts(true, FACILITY_WIN32, 5), HResult::E_ACCESSDENIED);
    }

    #[test]
    fn test_names_are_distinct() {
        for (i, (a, _)) in HResult::NAMED.iter().enumerate() {
            for (b, _) in HResult::NAMED.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert_eq!(HResult::E_NOINTERFACE.name(), Some("E_NOINTERFACE"));
        assert_eq!(HResult(0x8000_FFFF_u32 as i32).name(), None);
    }

    #[test]
    fn test_ok_bridge() {
        assert_eq!(HResult::S_FALSE.ok(), Ok(()));
        assert_eq!(HResult::E_ABORT.ok(), Err(HResult::E_ABORT));
        assert_eq!(HResult::from(Err::<(), _>(HResult::E_HANDLE)), HResult::E_HANDLE);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", HResult::E_POINTER), "E_POINTER");
        assert_eq!(format!("{}", HResult(0x8000_FFFF_u32 as i32)), "0x8000ffff");
        assert_eq!(format!("{:?}", HResult::S_OK), "HResult(S_OK)");
    }
}
