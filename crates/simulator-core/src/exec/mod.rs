//! Single-cycle step engine.
//!
//! [`step`] performs one fetch/decode/execute cycle. Handlers compute their
//! effects against a read-only view of the machine and faults are raised
//! before anything commits, so a faulting step never mutates architectural
//! state beyond latching the fault itself.

#![allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]

/// NZP condition-code derivation.
pub mod flags;
/// Per-step write-back trace records.
pub mod trace;

use crate::decoder::{
    ArithOp, CompareOp, Instruction, JumpTarget, LogicOp, ShiftModOp, SubroutineTarget,
};
use crate::exec::flags::condition_code_of;
use crate::exec::trace::{MemAccess, StepTrace};
use crate::fault::FaultCode;
use crate::memory::{validate_data_access, validate_fetch_access};
use crate::state::{MachineState, Reg, RunState, HALT_SENTINEL};

/// Result of asking the machine to advance by one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction retired; the trace records its write-backs.
    Retired(StepTrace),
    /// The program counter sits on the halt sentinel; nothing executed.
    Halted,
    /// The step faulted (now or on an earlier step) and the machine stopped.
    Fault(FaultCode),
}

/// Pending write-backs of one executed instruction, applied atomically by
/// `commit` only after every fault check has passed.
struct StepEffects {
    next_pc: u16,
    reg_write: Option<(Reg, u16)>,
    cc_input: Option<i32>,
    privilege: Option<bool>,
    mem_access: Option<MemAccess>,
}

impl StepEffects {
    const fn new(next_pc: u16) -> Self {
        Self {
            next_pc,
            reg_write: None,
            cc_input: None,
            privilege: None,
            mem_access: None,
        }
    }
}

/// Advances the machine by exactly one instruction.
///
/// The cycle is: check for a latched fault, check for the halt sentinel,
/// validate the fetch address, fetch, decode, execute, commit. Terminal
/// outcomes are sticky; calling `step` again returns the same answer.
pub fn step(state: &mut MachineState) -> StepOutcome {
    if let Some(cause) = state.run_state().latched_fault() {
        return StepOutcome::Fault(cause);
    }

    let pc = state.pc();
    if pc == HALT_SENTINEL {
        state.set_run_state(RunState::Halted);
        return StepOutcome::Halted;
    }

    if let Err(cause) = validate_fetch_access(pc) {
        return latch_fault(state, cause);
    }
    let word = state.read_word(pc);

    let instruction = match Instruction::decode(word) {
        Ok(instruction) => instruction,
        Err(cause) => return latch_fault(state, cause),
    };

    match execute(state, &instruction) {
        Ok(effects) => StepOutcome::Retired(commit(state, pc, word, &effects)),
        Err(cause) => latch_fault(state, cause),
    }
}

/// Forces the machine onto the halt sentinel and records the fault cause.
fn latch_fault(state: &mut MachineState, cause: FaultCode) -> StepOutcome {
    state.set_pc(HALT_SENTINEL);
    state.set_run_state(RunState::Faulted(cause));
    StepOutcome::Fault(cause)
}

fn execute(state: &MachineState, instruction: &Instruction) -> Result<StepEffects, FaultCode> {
    let next_pc = state.pc().wrapping_add(1);

    Ok(match *instruction {
        Instruction::Branch { mask, offset } => exec_branch(state, next_pc, mask, offset),
        Instruction::Arithmetic { rd, rs, op } => exec_arithmetic(state, next_pc, rd, rs, op),
        Instruction::Compare { rs, op } => exec_compare(state, next_pc, rs, op),
        Instruction::JumpSub(target) => exec_jump_sub(state, next_pc, target),
        Instruction::Logical { rd, rs, op } => exec_logical(state, next_pc, rd, rs, op),
        Instruction::Load { rd, rs, offset } => exec_load(state, next_pc, rd, rs, offset)?,
        Instruction::Store { rt, rs, offset } => exec_store(state, next_pc, rt, rs, offset)?,
        Instruction::ReturnFromTrap => exec_return_from_trap(state),
        Instruction::Constant { rd, value } => exec_constant(next_pc, rd, value),
        Instruction::ShiftMod { rd, rs, op } => exec_shift_mod(state, next_pc, rd, rs, op),
        Instruction::Jump(target) => exec_jump(state, next_pc, target),
        Instruction::HighConstant { rd, byte } => exec_high_constant(state, next_pc, rd, byte),
        Instruction::Trap { vector } => exec_trap(next_pc, vector),
    })
}

/// Applies the computed effects and builds the retirement trace.
fn commit(state: &mut MachineState, pc: u16, word: u16, effects: &StepEffects) -> StepTrace {
    if let Some((reg, value)) = effects.reg_write {
        state.set_reg(reg, value);
    }

    let cc_write = effects.cc_input.map(|result| {
        let codes = condition_code_of(result);
        state.set_condition_codes(codes);
        codes
    });

    if let Some(privileged) = effects.privilege {
        state.set_privilege(privileged);
    }

    if let Some(access) = effects.mem_access {
        if access.write {
            state.write_word(access.addr, access.value);
        }
    }

    state.set_pc(effects.next_pc);

    StepTrace {
        pc,
        word,
        reg_write: effects.reg_write,
        cc_write,
        mem_access: effects.mem_access,
    }
}

fn exec_branch(state: &MachineState, next_pc: u16, mask: u16, offset: u16) -> StepEffects {
    let taken = match mask {
        0b000 => false,
        0b111 => true,
        // The NZP field may still be all-zero before the first flag write,
        // so the subset test alone cannot stand in for "always".
        subset => subset & state.condition_codes() != 0,
    };
    if taken {
        StepEffects::new(next_pc.wrapping_add(offset))
    } else {
        StepEffects::new(next_pc)
    }
}

fn exec_arithmetic(
    state: &MachineState,
    next_pc: u16,
    rd: Reg,
    rs: Reg,
    op: ArithOp,
) -> StepEffects {
    let a = state.reg(rs);
    let result = match op {
        ArithOp::Add(rt) => a.wrapping_add(state.reg(rt)),
        ArithOp::Mul(rt) => a.wrapping_mul(state.reg(rt)),
        ArithOp::Sub(rt) => a.wrapping_sub(state.reg(rt)),
        ArithOp::Div(rt) => {
            let divisor = state.reg(rt) as i16;
            if divisor == 0 {
                0
            } else {
                (a as i16).wrapping_div(divisor) as u16
            }
        }
        ArithOp::AddImm(imm) => a.wrapping_add(imm),
    };

    let mut effects = StepEffects::new(next_pc);
    effects.reg_write = Some((rd, result));
    effects.cc_input = Some(i32::from(result as i16));
    effects
}

fn exec_compare(state: &MachineState, next_pc: u16, rs: Reg, op: CompareOp) -> StepEffects {
    let a = state.reg(rs);
    // Differences are formed in i32 so unsigned comparisons of distant
    // operands cannot wrap back into the wrong sign.
    let difference = match op {
        CompareOp::Signed(rt) => i32::from(a as i16) - i32::from(state.reg(rt) as i16),
        CompareOp::Unsigned(rt) => i32::from(a) - i32::from(state.reg(rt)),
        CompareOp::SignedImm(imm) => i32::from(a as i16) - i32::from(imm as i16),
        CompareOp::UnsignedImm(imm) => i32::from(a) - i32::from(imm),
    };

    let mut effects = StepEffects::new(next_pc);
    effects.cc_input = Some(difference);
    effects
}

fn exec_jump_sub(state: &MachineState, next_pc: u16, target: SubroutineTarget) -> StepEffects {
    let destination = match target {
        SubroutineTarget::Register(rs) => state.reg(rs),
        SubroutineTarget::PageOffset(offset) => (state.pc() & 0x8000) | (offset << 4),
    };

    let mut effects = StepEffects::new(destination);
    effects.reg_write = Some((Reg::R7, next_pc));
    effects
}

fn exec_logical(state: &MachineState, next_pc: u16, rd: Reg, rs: Reg, op: LogicOp) -> StepEffects {
    let a = state.reg(rs);
    let result = match op {
        LogicOp::And(rt) => a & state.reg(rt),
        LogicOp::Not => !a,
        LogicOp::Or(rt) => a | state.reg(rt),
        LogicOp::Xor(rt) => a ^ state.reg(rt),
        LogicOp::AndImm(imm) => a & imm,
    };

    let mut effects = StepEffects::new(next_pc);
    effects.reg_write = Some((rd, result));
    effects.cc_input = Some(i32::from(result as i16));
    effects
}

fn exec_load(
    state: &MachineState,
    next_pc: u16,
    rd: Reg,
    rs: Reg,
    offset: u16,
) -> Result<StepEffects, FaultCode> {
    let addr = state.reg(rs).wrapping_add(offset);
    validate_data_access(addr, state.privileged())?;
    let value = state.read_word(addr);

    let mut effects = StepEffects::new(next_pc);
    effects.reg_write = Some((rd, value));
    effects.cc_input = Some(i32::from(value as i16));
    effects.mem_access = Some(MemAccess {
        addr,
        value,
        write: false,
    });
    Ok(effects)
}

fn exec_store(
    state: &MachineState,
    next_pc: u16,
    rt: Reg,
    rs: Reg,
    offset: u16,
) -> Result<StepEffects, FaultCode> {
    let addr = state.reg(rs).wrapping_add(offset);
    validate_data_access(addr, state.privileged())?;

    let mut effects = StepEffects::new(next_pc);
    effects.mem_access = Some(MemAccess {
        addr,
        value: state.reg(rt),
        write: true,
    });
    Ok(effects)
}

fn exec_return_from_trap(state: &MachineState) -> StepEffects {
    let mut effects = StepEffects::new(state.reg(Reg::R7));
    effects.privilege = Some(false);
    effects
}

fn exec_constant(next_pc: u16, rd: Reg, value: u16) -> StepEffects {
    let mut effects = StepEffects::new(next_pc);
    effects.reg_write = Some((rd, value));
    effects.cc_input = Some(i32::from(value as i16));
    effects
}

fn exec_shift_mod(
    state: &MachineState,
    next_pc: u16,
    rd: Reg,
    rs: Reg,
    op: ShiftModOp,
) -> StepEffects {
    let a = state.reg(rs);
    let result = match op {
        ShiftModOp::ShiftLeft(amount) => a << amount,
        ShiftModOp::ShiftRightArith(amount) => ((a as i16) >> amount) as u16,
        ShiftModOp::ShiftRightLogic(amount) => a >> amount,
        ShiftModOp::Modulo(rt) => {
            let divisor = state.reg(rt);
            if divisor == 0 {
                0
            } else {
                a % divisor
            }
        }
    };

    let mut effects = StepEffects::new(next_pc);
    effects.reg_write = Some((rd, result));
    effects.cc_input = Some(i32::from(result as i16));
    effects
}

fn exec_jump(state: &MachineState, next_pc: u16, target: JumpTarget) -> StepEffects {
    match target {
        JumpTarget::Register(rs) => StepEffects::new(state.reg(rs)),
        JumpTarget::Relative(offset) => StepEffects::new(next_pc.wrapping_add(offset)),
    }
}

fn exec_high_constant(
    state: &MachineState,
    next_pc: u16,
    rd: Reg,
    byte: u8,
) -> StepEffects {
    let result = (state.reg(rd) & 0x00FF) | (u16::from(byte) << 8);

    let mut effects = StepEffects::new(next_pc);
    effects.reg_write = Some((rd, result));
    effects.cc_input = Some(i32::from(result as i16));
    effects
}

fn exec_trap(next_pc: u16, vector: u8) -> StepEffects {
    let mut effects = StepEffects::new(0x8000 | u16::from(vector));
    effects.reg_write = Some((Reg::R7, next_pc));
    // Link addresses are unsigned, so high-half values still read positive.
    effects.cc_input = Some(i32::from(next_pc));
    effects.privilege = Some(true);
    effects
}
