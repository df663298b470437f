//! Bit-manipulation instructions: `BSET`/`BCLR` set or clear masked bits at
//! a direct-page address; `BRSET`/`BRCLR` additionally branch on whether
//! the masked bits were already all-set / all-clear before the write.
//!
//! These don't fit the generic single-value addressing model — the mask
//! (and, for the branching forms, a relative offset) are read directly
//! from `PC` here rather than through `AddrMode::fetch`, since `Direct`
//! only yields the address.

use super::Mcu;
use crate::registers::Ccr;

fn read_mask(mcu: &mut Mcu) -> u8 {
    let mask = mcu.bus.read8(mcu.regs.pc);
    mcu.regs.pc = mcu.regs.pc.wrapping_add(1);
    mask
}

fn read_rel_offset(mcu: &mut Mcu) -> u16 {
    let offset = mcu.bus.read8(mcu.regs.pc) as i8 as i16 as u16;
    mcu.regs.pc = mcu.regs.pc.wrapping_add(1);
    offset
}

pub(crate) fn op_bset(mcu: &mut Mcu, operand: u16) {
    let mask = read_mask(mcu);
    let v = mcu.bus.read8(operand) | mask;
    mcu.bus.write8(operand, v);
    mcu.regs.set_nz8(v);
}

pub(crate) fn op_bclr(mcu: &mut Mcu, operand: u16) {
    let mask = read_mask(mcu);
    let v = mcu.bus.read8(operand) & !mask;
    mcu.bus.write8(operand, v);
    mcu.regs.set_nz8(v);
}

pub(crate) fn op_brset(mcu: &mut Mcu, operand: u16) {
    let mask = read_mask(mcu);
    let target = mcu.regs.pc.wrapping_add(read_rel_offset(mcu));
    let v = mcu.bus.read8(operand);
    let all_set = v & mask == mask;
    mcu.regs.set_flag(Ccr::Z, !all_set);
    if all_set {
        mcu.regs.pc = target;
    }
}

pub(crate) fn op_brclr(mcu: &mut Mcu, operand: u16) {
    let mask = read_mask(mcu);
    let target = mcu.regs.pc.wrapping_add(read_rel_offset(mcu));
    let v = mcu.bus.read8(operand);
    let all_clear = v & mask == 0;
    mcu.regs.set_flag(Ccr::Z, !all_clear);
    if all_clear {
        mcu.regs.pc = target;
    }
}
