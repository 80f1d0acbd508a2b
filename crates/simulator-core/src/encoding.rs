//! Bit-level views of the 16-bit instruction word.
//!
//! Field extraction lives here; interpretation of the fields is the
//! decoder's job.

/// Primary 4-bit opcode, from bits `[15:12]` of the instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Conditional branch family (`0b0000`).
    Branch,
    /// Add/multiply/subtract/divide family (`0b0001`).
    Arithmetic,
    /// Signed/unsigned compare family (`0b0010`).
    Compare,
    /// Jump to subroutine (`0b0100`).
    JumpSub,
    /// And/not/or/xor family (`0b0101`).
    Logical,
    /// Register load (`0b0110`).
    Load,
    /// Register store (`0b0111`).
    Store,
    /// Return from trap (`0b1000`).
    ReturnFromTrap,
    /// Sign-extended constant load (`0b1001`).
    Constant,
    /// Shift and modulo family (`0b1010`).
    ShiftMod,
    /// Unconditional jump (`0b1100`).
    Jump,
    /// High-byte constant load (`0b1101`).
    HighConstant,
    /// Trap into the operating system (`0b1111`).
    Trap,
}

impl Opcode {
    /// Maps a 4-bit opcode field to its instruction family.
    ///
    /// Returns `None` for the reserved encodings `0b0011`, `0b1011`, and
    /// `0b1110` (and anything wider than four bits).
    #[must_use]
    pub const fn from_u4(bits: u8) -> Option<Self> {
        match bits {
            0b0000 => Some(Self::Branch),
            0b0001 => Some(Self::Arithmetic),
            0b0010 => Some(Self::Compare),
            0b0100 => Some(Self::JumpSub),
            0b0101 => Some(Self::Logical),
            0b0110 => Some(Self::Load),
            0b0111 => Some(Self::Store),
            0b1000 => Some(Self::ReturnFromTrap),
            0b1001 => Some(Self::Constant),
            0b1010 => Some(Self::ShiftMod),
            0b1100 => Some(Self::Jump),
            0b1101 => Some(Self::HighConstant),
            0b1111 => Some(Self::Trap),
            _ => None,
        }
    }
}

/// Extracts the primary opcode field, bits `[15:12]`.
#[must_use]
pub const fn opcode_bits(word: u16) -> u8 {
    (word >> 12) as u8
}

/// Extracts the register field at bits `[11:9]`.
#[must_use]
pub const fn reg_bits_11_9(word: u16) -> u8 {
    ((word >> 9) & 0b111) as u8
}

/// Extracts the register field at bits `[8:6]`.
#[must_use]
pub const fn reg_bits_8_6(word: u16) -> u8 {
    ((word >> 6) & 0b111) as u8
}

/// Extracts the register field at bits `[2:0]`.
#[must_use]
pub const fn reg_bits_2_0(word: u16) -> u8 {
    (word & 0b111) as u8
}

/// Sign-extends the low `width` bits of `value` to 16 bits.
///
/// `width` must be in `1..16`; bits above `width` in `value` are ignored.
#[must_use]
pub const fn sign_extend(value: u16, width: u32) -> u16 {
    assert!(width >= 1 && width < 16);
    let mask = (1_u16 << width) - 1;
    let value = value & mask;
    let sign_bit = 1_u16 << (width - 1);
    if value & sign_bit != 0 {
        value | !mask
    } else {
        value
    }
}
