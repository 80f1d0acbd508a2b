use core::fmt;

use crate::state::Reg;

/// Data-memory activity observed by one retired instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemAccess {
    /// Effective word address.
    pub addr: u16,
    /// Word read (loads) or written (stores).
    pub value: u16,
    /// `true` for stores, `false` for loads.
    pub write: bool,
}

/// Write-back record for one retired instruction.
///
/// `Display` renders the canonical ten-column trace line: program counter,
/// binary instruction word, then the register, condition-code, and data
/// write-enable groups. Disabled groups print as zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTrace {
    /// Address the instruction was fetched from.
    pub pc: u16,
    /// Raw instruction word.
    pub word: u16,
    /// Register write-back, if the instruction wrote one.
    pub reg_write: Option<(Reg, u16)>,
    /// New one-hot NZP value, if the instruction set the condition codes.
    pub cc_write: Option<u16>,
    /// Data-memory activity, if the instruction touched memory.
    pub mem_access: Option<MemAccess>,
}

impl fmt::Display for StepTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X} {:016b} ", self.pc, self.word)?;

        match self.reg_write {
            Some((reg, value)) => write!(f, "1 {} {:04X} ", reg.index(), value)?,
            None => write!(f, "0 0 0000 ")?,
        }

        match self.cc_write {
            Some(codes) => write!(f, "1 {codes} ")?,
            None => write!(f, "0 0 ")?,
        }

        match self.mem_access {
            Some(access) => write!(
                f,
                "{} {:04X} {:04X}",
                u8::from(access.write),
                access.addr,
                access.value
            ),
            None => write!(f, "0 0000 0000"),
        }
    }
}
