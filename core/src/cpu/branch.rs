//! Relative branches, subroutine/interrupt control flow, and the two
//! engine-halting instructions (`WAI`, `STOP`).

use super::stack::{pull_interrupt_frame, push16, push_interrupt_frame};
use super::{Mcu, Status, StopReason};
use crate::registers::Ccr;
use crate::vectors::VECTOR_SWI;

/// All `Bcc` forms resolve to the same shape: `operand` already holds the
/// target address (computed by `AddrMode::Relative`); only take it if the
/// condition holds, otherwise `PC` is left where the fetch left it.
fn take_if(mcu: &mut Mcu, operand: u16, condition: bool) {
    if condition {
        mcu.regs.pc = operand;
    }
}

pub(crate) fn op_bra(mcu: &mut Mcu, operand: u16) {
    take_if(mcu, operand, true);
}

pub(crate) fn op_brn(_mcu: &mut Mcu, _operand: u16) {}

pub(crate) fn op_bhi(mcu: &mut Mcu, operand: u16) {
    let c = mcu.regs.flag(Ccr::C);
    let z = mcu.regs.flag(Ccr::Z);
    take_if(mcu, operand, !c && !z);
}

pub(crate) fn op_bls(mcu: &mut Mcu, operand: u16) {
    let c = mcu.regs.flag(Ccr::C);
    let z = mcu.regs.flag(Ccr::Z);
    take_if(mcu, operand, c || z);
}

pub(crate) fn op_bcc(mcu: &mut Mcu, operand: u16) {
    let c = mcu.regs.flag(Ccr::C);
    take_if(mcu, operand, !c);
}

pub(crate) fn op_bcs(mcu: &mut Mcu, operand: u16) {
    let c = mcu.regs.flag(Ccr::C);
    take_if(mcu, operand, c);
}

pub(crate) fn op_bne(mcu: &mut Mcu, operand: u16) {
    let z = mcu.regs.flag(Ccr::Z);
    take_if(mcu, operand, !z);
}

pub(crate) fn op_beq(mcu: &mut Mcu, operand: u16) {
    let z = mcu.regs.flag(Ccr::Z);
    take_if(mcu, operand, z);
}

pub(crate) fn op_bvc(mcu: &mut Mcu, operand: u16) {
    let v = mcu.regs.flag(Ccr::V);
    take_if(mcu, operand, !v);
}

pub(crate) fn op_bvs(mcu: &mut Mcu, operand: u16) {
    let v = mcu.regs.flag(Ccr::V);
    take_if(mcu, operand, v);
}

pub(crate) fn op_bpl(mcu: &mut Mcu, operand: u16) {
    let n = mcu.regs.flag(Ccr::N);
    take_if(mcu, operand, !n);
}

pub(crate) fn op_bmi(mcu: &mut Mcu, operand: u16) {
    let n = mcu.regs.flag(Ccr::N);
    take_if(mcu, operand, n);
}

pub(crate) fn op_bge(mcu: &mut Mcu, operand: u16) {
    let n = mcu.regs.flag(Ccr::N);
    let v = mcu.regs.flag(Ccr::V);
    take_if(mcu, operand, !(n ^ v));
}

pub(crate) fn op_blt(mcu: &mut Mcu, operand: u16) {
    let n = mcu.regs.flag(Ccr::N);
    let v = mcu.regs.flag(Ccr::V);
    take_if(mcu, operand, n ^ v);
}

pub(crate) fn op_bgt(mcu: &mut Mcu, operand: u16) {
    let n = mcu.regs.flag(Ccr::N);
    let v = mcu.regs.flag(Ccr::V);
    let z = mcu.regs.flag(Ccr::Z);
    take_if(mcu, operand, !(z || (n ^ v)));
}

pub(crate) fn op_ble(mcu: &mut Mcu, operand: u16) {
    let n = mcu.regs.flag(Ccr::N);
    let v = mcu.regs.flag(Ccr::V);
    let z = mcu.regs.flag(Ccr::Z);
    take_if(mcu, operand, z || (n ^ v));
}

pub(crate) fn op_bsr(mcu: &mut Mcu, operand: u16) {
    push16(mcu, mcu.regs.pc);
    mcu.regs.pc = operand;
}

pub(crate) fn op_jmp(mcu: &mut Mcu, operand: u16) {
    mcu.regs.pc = operand;
}

pub(crate) fn op_jsr(mcu: &mut Mcu, operand: u16) {
    push16(mcu, mcu.regs.pc);
    mcu.regs.pc = operand;
}

pub(crate) fn op_rts(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.pc = super::stack::pull16(mcu);
}

pub(crate) fn op_swi(mcu: &mut Mcu, _operand: u16) {
    push_interrupt_frame(mcu);
    mcu.regs.set_flag(Ccr::I, true);
    mcu.vector = VECTOR_SWI;
    mcu.state = super::EngineState::VectorFetchHigh;
}

pub(crate) fn op_rti(mcu: &mut Mcu, _operand: u16) {
    pull_interrupt_frame(mcu);
}

/// `WAI` pushes the full register frame and halts the fetch/decode loop
/// until an interrupt is taken; since this port models no interrupt
/// sources beyond the debugger, a `WAI` simply stops the engine.
pub(crate) fn op_wai(mcu: &mut Mcu, _operand: u16) {
    push_interrupt_frame(mcu);
    mcu.busadr = mcu.regs.pc;
    mcu.status = Status::Stopped(StopReason::Normal);
}

/// `STOP` halts the clock entirely (lowest power state). Indistinguishable
/// from `WAI` at this level of emulation, so it shares the same stop path.
pub(crate) fn op_stop(mcu: &mut Mcu, _operand: u16) {
    mcu.busadr = mcu.regs.pc;
    mcu.status = Status::Stopped(StopReason::Normal);
}
