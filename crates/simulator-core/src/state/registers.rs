use crate::memory::new_memory_image;
use crate::state::run_state::RunState;

/// Number of architecturally visible general-purpose registers (`R0..R7`).
pub const GENERAL_REGISTER_COUNT: usize = 8;
/// `PSR` bit for privileged (trap) mode.
pub const PSR_PRIVILEGE: u16 = 1 << 15;
/// Mask of the one-hot NZP condition-code field in `PSR` bits [2:0].
pub const CONDITION_MASK: u16 = 0b111;
/// Program entry address installed by reset.
pub const ENTRY_POINT: u16 = 0x8200;
/// Reserved program-counter value signalling run termination or fault.
pub const HALT_SENTINEL: u16 = 0x80FF;

/// Architecturally visible general-purpose register identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Reg {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl Reg {
    /// Ordered list of all architectural general-purpose registers.
    pub const ALL: [Self; GENERAL_REGISTER_COUNT] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    /// Returns the array index for this register (`0..=7`).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Decodes a 3-bit register field into an architectural register.
    #[must_use]
    pub const fn from_u3(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::R0),
            1 => Some(Self::R1),
            2 => Some(Self::R2),
            3 => Some(Self::R3),
            4 => Some(Self::R4),
            5 => Some(Self::R5),
            6 => Some(Self::R6),
            7 => Some(Self::R7),
            _ => None,
        }
    }
}

/// Full architectural state for one simulated LC4 datapath.
///
/// The aggregate is exclusively owned by the step driver for the duration of
/// a run; instruction handlers receive mutable access for one step only.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    registers: [u16; GENERAL_REGISTER_COUNT],
    pc: u16,
    psr: u16,
    memory: Box<[u16]>,
    run_state: RunState,
}

impl Default for MachineState {
    fn default() -> Self {
        Self {
            registers: [0; GENERAL_REGISTER_COUNT],
            pc: 0,
            psr: 0,
            memory: new_memory_image(),
            run_state: RunState::Running,
        }
    }
}

impl MachineState {
    /// Creates a zero-initialized machine with a blank 64 Ki-word memory image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies canonical reset semantics: `PC = 0x8200`, registers and `PSR`
    /// cleared, run state back to running. The loaded memory image is kept.
    pub fn reset(&mut self) {
        self.registers = [0; GENERAL_REGISTER_COUNT];
        self.pc = ENTRY_POINT;
        self.psr = 0;
        self.run_state = RunState::Running;
    }

    /// Reads a general-purpose register.
    #[must_use]
    pub fn reg(&self, reg: Reg) -> u16 {
        self.registers[reg.index()]
    }

    /// Writes a general-purpose register.
    pub fn set_reg(&mut self, reg: Reg, value: u16) {
        self.registers[reg.index()] = value;
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Writes the program counter.
    pub const fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    /// Reads the full processor status word.
    #[must_use]
    pub const fn psr(&self) -> u16 {
        self.psr
    }

    /// Returns `true` when `PSR[15]` (privileged/trap mode) is set.
    #[must_use]
    pub const fn privileged(&self) -> bool {
        (self.psr & PSR_PRIVILEGE) != 0
    }

    /// Sets or clears the `PSR[15]` privilege bit.
    ///
    /// Only the trap and return-from-trap handlers call this.
    pub const fn set_privilege(&mut self, privileged: bool) {
        if privileged {
            self.psr |= PSR_PRIVILEGE;
        } else {
            self.psr &= !PSR_PRIVILEGE;
        }
    }

    /// Reads the one-hot NZP condition-code field (`PSR` bits [2:0]).
    #[must_use]
    pub const fn condition_codes(&self) -> u16 {
        self.psr & CONDITION_MASK
    }

    /// Replaces the NZP condition-code field with a new one-hot value.
    pub const fn set_condition_codes(&mut self, codes: u16) {
        self.psr = (self.psr & !CONDITION_MASK) | (codes & CONDITION_MASK);
    }

    /// Reads one 16-bit memory word.
    #[must_use]
    pub fn read_word(&self, addr: u16) -> u16 {
        self.memory[usize::from(addr)]
    }

    /// Writes one 16-bit memory word.
    ///
    /// This is the raw image write used by the loader and the store commit
    /// path; protection policy is enforced before execution reaches here.
    pub fn write_word(&mut self, addr: u16, value: u16) {
        self.memory[usize::from(addr)] = value;
    }

    /// Reads the current run state.
    #[must_use]
    pub const fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Writes the current run state.
    pub const fn set_run_state(&mut self, run_state: RunState) {
        self.run_state = run_state;
    }
}
