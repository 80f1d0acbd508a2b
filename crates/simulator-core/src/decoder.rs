//! Instruction word decoding.
//!
//! [`Instruction::decode`] turns a raw 16-bit word into a fully resolved
//! operation: sub-opcode selected, register fields validated, immediates
//! sign-extended. Execution never re-inspects raw bits.

use crate::encoding::{
    opcode_bits, reg_bits_11_9, reg_bits_2_0, reg_bits_8_6, sign_extend, Opcode,
};
use crate::fault::FaultCode;
use crate::state::Reg;

/// Arithmetic sub-operation, from bits `[5:3]` (immediate form when bit 5 is
/// set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// `rd = rs + rt`
    Add(Reg),
    /// `rd = rs * rt`
    Mul(Reg),
    /// `rd = rs - rt`
    Sub(Reg),
    /// `rd = rs / rt`, signed; quotient is zero when `rt` is zero.
    Div(Reg),
    /// `rd = rs + imm5`, immediate already sign-extended.
    AddImm(u16),
}

/// Compare sub-operation, from bits `[8:7]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Signed `rs` vs `rt`.
    Signed(Reg),
    /// Unsigned `rs` vs `rt`.
    Unsigned(Reg),
    /// Signed `rs` vs sign-extended `imm7`.
    SignedImm(u16),
    /// Unsigned `rs` vs zero-extended `uimm7`.
    UnsignedImm(u16),
}

/// Logical sub-operation, from bits `[5:3]` (immediate form when bit 5 is
/// set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    /// `rd = rs & rt`
    And(Reg),
    /// `rd = !rs`, bitwise complement.
    Not,
    /// `rd = rs | rt`
    Or(Reg),
    /// `rd = rs ^ rt`
    Xor(Reg),
    /// `rd = rs & imm5`, immediate already sign-extended.
    AndImm(u16),
}

/// Shift or modulo sub-operation, from bits `[5:4]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftModOp {
    /// `rd = rs << uimm4`
    ShiftLeft(u16),
    /// `rd = rs >> uimm4`, arithmetic (sign-replicating).
    ShiftRightArith(u16),
    /// `rd = rs >> uimm4`, logical (zero-filling).
    ShiftRightLogic(u16),
    /// `rd = rs % rt`, unsigned; remainder is zero when `rt` is zero.
    Modulo(Reg),
}

/// Destination of an unconditional jump, selected by bit 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTarget {
    /// `pc = rs`
    Register(Reg),
    /// `pc = pc + 1 + imm11`, offset already sign-extended.
    Relative(u16),
}

/// Destination of a subroutine call, selected by bit 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineTarget {
    /// `pc = rs`
    Register(Reg),
    /// `pc = (pc & 0x8000) | (uimm11 << 4)`; the raw 11-bit field.
    PageOffset(u16),
}

/// A fully decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Conditional branch on the NZP condition codes.
    Branch {
        /// Bits `[11:9]`: the NZP subset that takes the branch.
        mask: u16,
        /// Sign-extended 9-bit target offset, relative to `pc + 1`.
        offset: u16,
    },
    /// Add/multiply/subtract/divide, writes `rd` and the condition codes.
    Arithmetic {
        /// Destination register.
        rd: Reg,
        /// First source register.
        rs: Reg,
        /// Selected sub-operation.
        op: ArithOp,
    },
    /// Compare, writes only the condition codes.
    Compare {
        /// First operand register, bits `[11:9]`.
        rs: Reg,
        /// Selected sub-operation.
        op: CompareOp,
    },
    /// Call: save `pc + 1` to `R7`, then transfer control.
    JumpSub(SubroutineTarget),
    /// Bitwise logic, writes `rd` and the condition codes.
    Logical {
        /// Destination register.
        rd: Reg,
        /// First source register.
        rs: Reg,
        /// Selected sub-operation.
        op: LogicOp,
    },
    /// `rd = mem[rs + imm6]`, sets the condition codes.
    Load {
        /// Destination register.
        rd: Reg,
        /// Base address register.
        rs: Reg,
        /// Sign-extended 6-bit address offset.
        offset: u16,
    },
    /// `mem[rs + imm6] = rt`, no condition-code update.
    Store {
        /// Source register whose value is stored.
        rt: Reg,
        /// Base address register.
        rs: Reg,
        /// Sign-extended 6-bit address offset.
        offset: u16,
    },
    /// Drop privilege and return through `R7`.
    ReturnFromTrap,
    /// `rd = imm9`, sign-extended, sets the condition codes.
    Constant {
        /// Destination register.
        rd: Reg,
        /// Sign-extended 9-bit constant.
        value: u16,
    },
    /// Shift or modulo, writes `rd` and the condition codes.
    ShiftMod {
        /// Destination register.
        rd: Reg,
        /// Source register.
        rs: Reg,
        /// Selected sub-operation.
        op: ShiftModOp,
    },
    /// Unconditional jump.
    Jump(JumpTarget),
    /// `rd = (rd & 0x00FF) | (uimm8 << 8)`, sets the condition codes.
    HighConstant {
        /// Destination register.
        rd: Reg,
        /// Byte placed into the high half of `rd`.
        byte: u8,
    },
    /// Enter the OS: raise privilege, link in `R7`, vector into OS code.
    Trap {
        /// 8-bit trap vector; target is `0x8000 | vector`.
        vector: u8,
    },
}

impl Instruction {
    /// Decodes one instruction word.
    ///
    /// # Errors
    ///
    /// [`FaultCode::InvalidOpcode`] for the reserved primary opcodes, and
    /// [`FaultCode::InvalidRegister`] if any used register field fails to
    /// decode.
    pub fn decode(word: u16) -> Result<Self, FaultCode> {
        let opcode = Opcode::from_u4(opcode_bits(word)).ok_or(FaultCode::InvalidOpcode)?;

        Ok(match opcode {
            Opcode::Branch => Self::Branch {
                mask: u16::from(reg_bits_11_9(word)),
                offset: sign_extend(word, 9),
            },
            Opcode::Arithmetic => Self::Arithmetic {
                rd: reg(reg_bits_11_9(word))?,
                rs: reg(reg_bits_8_6(word))?,
                op: decode_arith_op(word)?,
            },
            Opcode::Compare => Self::Compare {
                rs: reg(reg_bits_11_9(word))?,
                op: decode_compare_op(word)?,
            },
            Opcode::JumpSub => Self::JumpSub(if word & 0x0800 == 0 {
                SubroutineTarget::Register(reg(reg_bits_8_6(word))?)
            } else {
                SubroutineTarget::PageOffset(word & 0x07FF)
            }),
            Opcode::Logical => Self::Logical {
                rd: reg(reg_bits_11_9(word))?,
                rs: reg(reg_bits_8_6(word))?,
                op: decode_logic_op(word)?,
            },
            Opcode::Load => Self::Load {
                rd: reg(reg_bits_11_9(word))?,
                rs: reg(reg_bits_8_6(word))?,
                offset: sign_extend(word, 6),
            },
            Opcode::Store => Self::Store {
                rt: reg(reg_bits_11_9(word))?,
                rs: reg(reg_bits_8_6(word))?,
                offset: sign_extend(word, 6),
            },
            Opcode::ReturnFromTrap => Self::ReturnFromTrap,
            Opcode::Constant => Self::Constant {
                rd: reg(reg_bits_11_9(word))?,
                value: sign_extend(word, 9),
            },
            Opcode::ShiftMod => Self::ShiftMod {
                rd: reg(reg_bits_11_9(word))?,
                rs: reg(reg_bits_8_6(word))?,
                op: decode_shift_mod_op(word)?,
            },
            Opcode::Jump => Self::Jump(if word & 0x0800 == 0 {
                JumpTarget::Register(reg(reg_bits_8_6(word))?)
            } else {
                JumpTarget::Relative(sign_extend(word, 11))
            }),
            Opcode::HighConstant => Self::HighConstant {
                rd: reg(reg_bits_11_9(word))?,
                byte: (word & 0x00FF) as u8,
            },
            Opcode::Trap => Self::Trap {
                vector: (word & 0x00FF) as u8,
            },
        })
    }
}

fn reg(bits: u8) -> Result<Reg, FaultCode> {
    Reg::from_u3(bits).ok_or(FaultCode::InvalidRegister)
}

fn decode_arith_op(word: u16) -> Result<ArithOp, FaultCode> {
    if word & 0x0020 != 0 {
        return Ok(ArithOp::AddImm(sign_extend(word, 5)));
    }
    let rt = reg(reg_bits_2_0(word))?;
    Ok(match (word >> 3) & 0b11 {
        0b00 => ArithOp::Add(rt),
        0b01 => ArithOp::Mul(rt),
        0b10 => ArithOp::Sub(rt),
        _ => ArithOp::Div(rt),
    })
}

fn decode_compare_op(word: u16) -> Result<CompareOp, FaultCode> {
    Ok(match (word >> 7) & 0b11 {
        0b00 => CompareOp::Signed(reg(reg_bits_2_0(word))?),
        0b01 => CompareOp::Unsigned(reg(reg_bits_2_0(word))?),
        0b10 => CompareOp::SignedImm(sign_extend(word, 7)),
        _ => CompareOp::UnsignedImm(word & 0x007F),
    })
}

fn decode_logic_op(word: u16) -> Result<LogicOp, FaultCode> {
    if word & 0x0020 != 0 {
        return Ok(LogicOp::AndImm(sign_extend(word, 5)));
    }
    Ok(match (word >> 3) & 0b11 {
        0b00 => LogicOp::And(reg(reg_bits_2_0(word))?),
        0b01 => LogicOp::Not,
        0b10 => LogicOp::Or(reg(reg_bits_2_0(word))?),
        _ => LogicOp::Xor(reg(reg_bits_2_0(word))?),
    })
}

fn decode_shift_mod_op(word: u16) -> Result<ShiftModOp, FaultCode> {
    let amount = word & 0x000F;
    Ok(match (word >> 4) & 0b11 {
        0b00 => ShiftModOp::ShiftLeft(amount),
        0b01 => ShiftModOp::ShiftRightArith(amount),
        0b10 => ShiftModOp::ShiftRightLogic(amount),
        _ => ShiftModOp::Modulo(reg(reg_bits_2_0(word))?),
    })
}
