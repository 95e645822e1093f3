//! AssetLedger v1 — Arithmetic Primitives
//!
//! All amounts: u64 in the currency's smallest unit.
//! Overflow and underflow are errors, never wrap.

use crate::error::LedgerError;

/// Checked addition. `Overflow` on u64 overflow.
pub fn checked_add(a: u64, b: u64) -> Result<u64, LedgerError> {
    a.checked_add(b).ok_or(LedgerError::Overflow {
        op: "add",
        lhs: a,
        rhs: b,
    })
}

/// Checked subtraction. `Overflow` when `b > a`.
pub fn checked_sub(a: u64, b: u64) -> Result<u64, LedgerError> {
    a.checked_sub(b).ok_or(LedgerError::Overflow {
        op: "sub",
        lhs: a,
        rhs: b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add_ok() {
        assert_eq!(checked_add(3, 4).unwrap(), 7);
        assert_eq!(checked_add(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_checked_add_overflow() {
        let err = checked_add(u64::MAX, 1).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow { op: "add", .. }));
    }

    #[test]
    fn test_checked_sub_ok() {
        assert_eq!(checked_sub(10, 4).unwrap(), 6);
    }

    #[test]
    fn test_checked_sub_underflow() {
        let err = checked_sub(1, 2).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow { op: "sub", lhs: 1, rhs: 2 }));
    }
}
