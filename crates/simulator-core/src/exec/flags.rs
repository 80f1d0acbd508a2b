/// One-hot negative condition code, `PSR` bit 2.
pub const CC_NEGATIVE: u16 = 0b100;
/// One-hot zero condition code, `PSR` bit 1.
pub const CC_ZERO: u16 = 0b010;
/// One-hot positive condition code, `PSR` bit 0.
pub const CC_POSITIVE: u16 = 0b001;

/// Maps a widened result to its one-hot NZP code.
///
/// Callers widen to `i32` in whichever signedness the operation defines:
/// ordinary ALU results as `i16`, unsigned comparisons and trap link
/// addresses as `u16`. Widening keeps unsigned results like `0xFFFF` from
/// reading as negative.
#[must_use]
pub const fn condition_code_of(result: i32) -> u16 {
    if result < 0 {
        CC_NEGATIVE
    } else if result == 0 {
        CC_ZERO
    } else {
        CC_POSITIVE
    }
}

#[cfg(test)]
mod tests {
    use super::{condition_code_of, CC_NEGATIVE, CC_POSITIVE, CC_ZERO};

    #[test]
    fn sign_of_result_selects_exactly_one_code() {
        assert_eq!(condition_code_of(-1), CC_NEGATIVE);
        assert_eq!(condition_code_of(i32::from(i16::MIN)), CC_NEGATIVE);
        assert_eq!(condition_code_of(0), CC_ZERO);
        assert_eq!(condition_code_of(1), CC_POSITIVE);
        assert_eq!(condition_code_of(i32::from(u16::MAX)), CC_POSITIVE);
    }

    #[test]
    fn codes_are_one_hot_and_disjoint() {
        for code in [CC_NEGATIVE, CC_ZERO, CC_POSITIVE] {
            assert_eq!(code.count_ones(), 1);
        }
        assert_eq!(CC_NEGATIVE & CC_ZERO & CC_POSITIVE, 0);
    }
}
