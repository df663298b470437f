//! Loads, stores, arithmetic, logic, shifts, and the CCR-manipulation and
//! register-transfer instructions — everything that isn't control flow or
//! a stack op.

use super::{AddrMode, Mcu};
use crate::registers::Ccr;

fn rmw_mem(mcu: &mut Mcu, addr: u16, f: impl FnOnce(&mut Mcu, u8) -> u8) {
    let v = mcu.bus.read8(addr);
    let r = f(mcu, v);
    mcu.bus.write8(addr, r);
}

// --- Loads / stores ---

pub(crate) fn op_ldaa(mcu: &mut Mcu, operand: u16) {
    let v = read_value_or_mem(mcu, operand);
    mcu.regs.set_a(v);
    mcu.regs.set_nz8(v);
}

/// Whether the just-decoded instruction used an immediate addressing mode
/// (in which case `operand` already *is* the value) versus a memory mode
/// (in which case `operand` is the effective address to read through).
fn read_value_or_mem(mcu: &mut Mcu, operand: u16) -> u8 {
    if mcu.current_mode == AddrMode::Imm8 {
        operand as u8
    } else {
        mcu.bus.read8(operand)
    }
}

fn read_value16_or_mem(mcu: &mut Mcu, operand: u16) -> u16 {
    if mcu.current_mode == AddrMode::Imm16 {
        operand
    } else {
        mcu.bus.read16(operand)
    }
}

pub(crate) fn op_ldab(mcu: &mut Mcu, operand: u16) {
    let v = read_value_or_mem(mcu, operand);
    mcu.regs.set_b(v);
    mcu.regs.set_nz8(v);
}

pub(crate) fn op_ldd(mcu: &mut Mcu, operand: u16) {
    let v = read_value16_or_mem(mcu, operand);
    mcu.regs.d = v;
    mcu.regs.set_nz16(v);
}

pub(crate) fn op_ldx(mcu: &mut Mcu, operand: u16) {
    let v = read_value16_or_mem(mcu, operand);
    mcu.regs.x = v;
    mcu.regs.set_nz16(v);
}

pub(crate) fn op_ldy(mcu: &mut Mcu, operand: u16) {
    let v = read_value16_or_mem(mcu, operand);
    mcu.regs.y = v;
    mcu.regs.set_nz16(v);
}

pub(crate) fn op_staa(mcu: &mut Mcu, operand: u16) {
    let v = mcu.regs.a();
    mcu.bus.write8(operand, v);
    mcu.regs.set_nz8(v);
}

pub(crate) fn op_stab(mcu: &mut Mcu, operand: u16) {
    let v = mcu.regs.b();
    mcu.bus.write8(operand, v);
    mcu.regs.set_nz8(v);
}

pub(crate) fn op_std(mcu: &mut Mcu, operand: u16) {
    let v = mcu.regs.d;
    mcu.bus.write16(operand, v);
    mcu.regs.set_nz16(v);
}

pub(crate) fn op_stx(mcu: &mut Mcu, operand: u16) {
    let v = mcu.regs.x;
    mcu.bus.write16(operand, v);
    mcu.regs.set_nz16(v);
}

pub(crate) fn op_sty(mcu: &mut Mcu, operand: u16) {
    let v = mcu.regs.y;
    mcu.bus.write16(operand, v);
    mcu.regs.set_nz16(v);
}

// --- 8/16-bit arithmetic ---

pub(crate) fn op_adda(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let a = mcu.regs.a();
    let r = a.wrapping_add(b);
    mcu.regs.set_add_flags8(a, b, r);
    mcu.regs.set_a(r);
}

pub(crate) fn op_addb(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let a = mcu.regs.b();
    let r = a.wrapping_add(b);
    mcu.regs.set_add_flags8(a, b, r);
    mcu.regs.set_b(r);
}

pub(crate) fn op_addd(mcu: &mut Mcu, operand: u16) {
    let b = read_value16_or_mem(mcu, operand);
    let a = mcu.regs.d;
    let r = a.wrapping_add(b);
    mcu.regs.set_add_flags16(a, b, r);
    mcu.regs.d = r;
}

pub(crate) fn op_adca(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let carry_in = mcu.regs.flag(Ccr::C) as u8;
    let a = mcu.regs.a();
    let r = a.wrapping_add(b).wrapping_add(carry_in);
    mcu.regs.set_add_flags8(a, b.wrapping_add(carry_in), r);
    mcu.regs.set_a(r);
}

pub(crate) fn op_adcb(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let carry_in = mcu.regs.flag(Ccr::C) as u8;
    let a = mcu.regs.b();
    let r = a.wrapping_add(b).wrapping_add(carry_in);
    mcu.regs.set_add_flags8(a, b.wrapping_add(carry_in), r);
    mcu.regs.set_b(r);
}

pub(crate) fn op_suba(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let a = mcu.regs.a();
    let r = a.wrapping_sub(b);
    mcu.regs.set_sub_flags8(a, b, r);
    mcu.regs.set_a(r);
}

pub(crate) fn op_subb(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let a = mcu.regs.b();
    let r = a.wrapping_sub(b);
    mcu.regs.set_sub_flags8(a, b, r);
    mcu.regs.set_b(r);
}

pub(crate) fn op_subd(mcu: &mut Mcu, operand: u16) {
    let b = read_value16_or_mem(mcu, operand);
    let a = mcu.regs.d;
    let r = a.wrapping_sub(b);
    mcu.regs.set_sub_flags16(a, b, r);
    mcu.regs.d = r;
}

pub(crate) fn op_sbca(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let carry_in = mcu.regs.flag(Ccr::C) as u8;
    let a = mcu.regs.a();
    let r = a.wrapping_sub(b).wrapping_sub(carry_in);
    mcu.regs.set_sub_flags8(a, b.wrapping_add(carry_in), r);
    mcu.regs.set_a(r);
}

pub(crate) fn op_sbcb(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let carry_in = mcu.regs.flag(Ccr::C) as u8;
    let a = mcu.regs.b();
    let r = a.wrapping_sub(b).wrapping_sub(carry_in);
    mcu.regs.set_sub_flags8(a, b.wrapping_add(carry_in), r);
    mcu.regs.set_b(r);
}

pub(crate) fn op_cmpa(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let a = mcu.regs.a();
    mcu.regs.set_sub_flags8(a, b, a.wrapping_sub(b));
}

pub(crate) fn op_cmpb(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let a = mcu.regs.b();
    mcu.regs.set_sub_flags8(a, b, a.wrapping_sub(b));
}

pub(crate) fn op_cpd(mcu: &mut Mcu, operand: u16) {
    let b = read_value16_or_mem(mcu, operand);
    let a = mcu.regs.d;
    mcu.regs.set_sub_flags16(a, b, a.wrapping_sub(b));
}

pub(crate) fn op_cpx(mcu: &mut Mcu, operand: u16) {
    let b = read_value16_or_mem(mcu, operand);
    let a = mcu.regs.x;
    mcu.regs.set_sub_flags16(a, b, a.wrapping_sub(b));
}

pub(crate) fn op_cpy(mcu: &mut Mcu, operand: u16) {
    let b = read_value16_or_mem(mcu, operand);
    let a = mcu.regs.y;
    mcu.regs.set_sub_flags16(a, b, a.wrapping_sub(b));
}

// --- Logic ---

pub(crate) fn op_anda(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let r = mcu.regs.a() & b;
    mcu.regs.set_a(r);
    mcu.regs.set_logical_flags(r);
}

pub(crate) fn op_andb(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let r = mcu.regs.b() & b;
    mcu.regs.set_b(r);
    mcu.regs.set_logical_flags(r);
}

pub(crate) fn op_oraa(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let r = mcu.regs.a() | b;
    mcu.regs.set_a(r);
    mcu.regs.set_logical_flags(r);
}

pub(crate) fn op_orab(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let r = mcu.regs.b() | b;
    mcu.regs.set_b(r);
    mcu.regs.set_logical_flags(r);
}

pub(crate) fn op_eora(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let r = mcu.regs.a() ^ b;
    mcu.regs.set_a(r);
    mcu.regs.set_logical_flags(r);
}

pub(crate) fn op_eorb(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let r = mcu.regs.b() ^ b;
    mcu.regs.set_b(r);
    mcu.regs.set_logical_flags(r);
}

pub(crate) fn op_bita(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let r = mcu.regs.a() & b;
    mcu.regs.set_logical_flags(r);
}

pub(crate) fn op_bitb(mcu: &mut Mcu, operand: u16) {
    let b = read_value_or_mem(mcu, operand);
    let r = mcu.regs.b() & b;
    mcu.regs.set_logical_flags(r);
}

// --- Read-modify-write (accumulator-inherent and memory forms) ---

fn neg(mcu: &mut Mcu, v: u8) -> u8 {
    let r = 0u8.wrapping_sub(v);
    mcu.regs.set_flag(Ccr::N, r & 0x80 != 0);
    mcu.regs.set_flag(Ccr::Z, r == 0);
    mcu.regs.set_flag(Ccr::V, v == 0x80);
    mcu.regs.set_flag(Ccr::C, v != 0);
    r
}

fn com(mcu: &mut Mcu, v: u8) -> u8 {
    let r = !v;
    mcu.regs.set_flag(Ccr::N, r & 0x80 != 0);
    mcu.regs.set_flag(Ccr::Z, r == 0);
    mcu.regs.set_flag(Ccr::V, false);
    mcu.regs.set_flag(Ccr::C, true);
    r
}

fn inc(mcu: &mut Mcu, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    mcu.regs.set_flag(Ccr::N, r & 0x80 != 0);
    mcu.regs.set_flag(Ccr::Z, r == 0);
    mcu.regs.set_flag(Ccr::V, v == 0x7F);
    r
}

fn dec(mcu: &mut Mcu, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    mcu.regs.set_flag(Ccr::N, r & 0x80 != 0);
    mcu.regs.set_flag(Ccr::Z, r == 0);
    mcu.regs.set_flag(Ccr::V, v == 0x80);
    r
}

fn lsl(mcu: &mut Mcu, v: u8) -> u8 {
    let carry = v & 0x80 != 0;
    let r = v << 1;
    mcu.regs.set_shift_flags(r, carry);
    r
}

fn lsr(mcu: &mut Mcu, v: u8) -> u8 {
    let carry = v & 0x01 != 0;
    let r = v >> 1;
    mcu.regs.set_shift_flags(r, carry);
    r
}

fn asr(mcu: &mut Mcu, v: u8) -> u8 {
    let carry = v & 0x01 != 0;
    let r = (v >> 1) | (v & 0x80);
    mcu.regs.set_shift_flags(r, carry);
    r
}

fn rol(mcu: &mut Mcu, v: u8) -> u8 {
    let carry_in = mcu.regs.flag(Ccr::C) as u8;
    let carry_out = v & 0x80 != 0;
    let r = (v << 1) | carry_in;
    mcu.regs.set_shift_flags(r, carry_out);
    r
}

fn ror(mcu: &mut Mcu, v: u8) -> u8 {
    let carry_in = (mcu.regs.flag(Ccr::C) as u8) << 7;
    let carry_out = v & 0x01 != 0;
    let r = (v >> 1) | carry_in;
    mcu.regs.set_shift_flags(r, carry_out);
    r
}

macro_rules! rmw_pair {
    ($mem_name:ident, $a_name:ident, $b_name:ident, $f:expr) => {
        pub(crate) fn $mem_name(mcu: &mut Mcu, operand: u16) {
            rmw_mem(mcu, operand, $f);
        }
        pub(crate) fn $a_name(mcu: &mut Mcu, _operand: u16) {
            let v = mcu.regs.a();
            let r = $f(mcu, v);
            mcu.regs.set_a(r);
        }
        pub(crate) fn $b_name(mcu: &mut Mcu, _operand: u16) {
            let v = mcu.regs.b();
            let r = $f(mcu, v);
            mcu.regs.set_b(r);
        }
    };
}

rmw_pair!(op_neg_mem, op_nega, op_negb, neg);
rmw_pair!(op_com_mem, op_coma, op_comb, com);
rmw_pair!(op_inc_mem, op_inca, op_incb, inc);
rmw_pair!(op_dec_mem, op_deca, op_decb, dec);
rmw_pair!(op_lsl_mem, op_lsla, op_lslb, lsl);
rmw_pair!(op_lsr_mem, op_lsra, op_lsrb, lsr);
rmw_pair!(op_asr_mem, op_asra, op_asrb, asr);
rmw_pair!(op_rol_mem, op_rola, op_rolb, rol);
rmw_pair!(op_ror_mem, op_rora, op_rorb, ror);

// --- Multi-precision / BCD ---

pub(crate) fn op_daa(mcu: &mut Mcu, _operand: u16) {
    let a = mcu.regs.a();
    let mut correction = 0u8;
    let mut carry = mcu.regs.flag(Ccr::C);
    let half = mcu.regs.flag(Ccr::H);
    let hi = a >> 4;
    let lo = a & 0x0F;
    if half || lo > 9 {
        correction |= 0x06;
    }
    if carry || hi > 9 || (hi >= 9 && lo > 9) {
        correction |= 0x60;
        carry = true;
    }
    let r = a.wrapping_add(correction);
    mcu.regs.set_a(r);
    mcu.regs.set_flag(Ccr::N, r & 0x80 != 0);
    mcu.regs.set_flag(Ccr::Z, r == 0);
    mcu.regs.set_flag(Ccr::C, carry);
}

pub(crate) fn op_mul(mcu: &mut Mcu, _operand: u16) {
    let r = mcu.regs.a() as u16 * mcu.regs.b() as u16;
    mcu.regs.set_flag(Ccr::C, r & 0x0080 != 0);
    mcu.regs.d = r;
}

pub(crate) fn op_idiv(mcu: &mut Mcu, _operand: u16) {
    if mcu.regs.x == 0 {
        mcu.regs.set_flag(Ccr::C, true);
        return;
    }
    let d = mcu.regs.d;
    let x = mcu.regs.x;
    let q = d / x;
    let r = d % x;
    mcu.regs.x = q;
    mcu.regs.d = r;
    mcu.regs.set_flag(Ccr::C, false);
    mcu.regs.set_flag(Ccr::Z, q == 0);
}

pub(crate) fn op_fdiv(mcu: &mut Mcu, _operand: u16) {
    let d = mcu.regs.d as u32;
    let x = mcu.regs.x as u32;
    if x == 0 {
        mcu.regs.set_flag(Ccr::C, true);
        return;
    }
    if d >= x {
        mcu.regs.set_flag(Ccr::V, true);
        return;
    }
    let q = (d << 16) / x;
    let r = ((d << 16) % x) as u16;
    mcu.regs.x = q as u16;
    mcu.regs.d = r;
    mcu.regs.set_flag(Ccr::C, false);
    mcu.regs.set_flag(Ccr::V, false);
    mcu.regs.set_flag(Ccr::Z, q == 0);
}

// --- CCR manipulation, transfers, NOP ---

pub(crate) fn op_clc(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.set_flag(Ccr::C, false);
}
pub(crate) fn op_sec(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.set_flag(Ccr::C, true);
}
pub(crate) fn op_cli(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.set_flag(Ccr::I, false);
}
pub(crate) fn op_sei(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.set_flag(Ccr::I, true);
}
pub(crate) fn op_clv(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.set_flag(Ccr::V, false);
}
pub(crate) fn op_sev(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.set_flag(Ccr::V, true);
}

pub(crate) fn op_tap(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.ccr = mcu.regs.a();
}
pub(crate) fn op_tpa(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.set_a(mcu.regs.ccr);
}
pub(crate) fn op_tab(mcu: &mut Mcu, _operand: u16) {
    let v = mcu.regs.a();
    mcu.regs.set_b(v);
    mcu.regs.set_nz8(v);
}
pub(crate) fn op_tba(mcu: &mut Mcu, _operand: u16) {
    let v = mcu.regs.b();
    mcu.regs.set_a(v);
    mcu.regs.set_nz8(v);
}
pub(crate) fn op_tsx(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.x = mcu.regs.sp.wrapping_add(1);
}
pub(crate) fn op_txs(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.sp = mcu.regs.x.wrapping_sub(1);
}
pub(crate) fn op_tsy(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.y = mcu.regs.sp.wrapping_add(1);
}
pub(crate) fn op_tys(mcu: &mut Mcu, _operand: u16) {
    mcu.regs.sp = mcu.regs.y.wrapping_sub(1);
}
pub(crate) fn op_xgdx(mcu: &mut Mcu, _operand: u16) {
    std::mem::swap(&mut mcu.regs.d, &mut mcu.regs.x);
}
pub(crate) fn op_xgdy(mcu: &mut Mcu, _operand: u16) {
    std::mem::swap(&mut mcu.regs.d, &mut mcu.regs.y);
}

pub(crate) fn op_nop(_mcu: &mut Mcu, _operand: u16) {}
