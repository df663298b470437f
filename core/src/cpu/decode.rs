//! The `(prefix, opcode) -> instruction` decode table.
//!
//! Prefix semantics implemented here (see DESIGN.md, "Open questions
//! resolved" for why): no prefix addresses via `X`; `0x18` substitutes `Y`
//! for `X` everywhere, including reinterpreting the `LDX`/`STX`/`CPX`
//! opcodes as `LDY`/`STY`/`CPY`; `0xCD` is the cross-indexed form of the
//! `X`-register family (same target register, `Y`-indexed addressing);
//! `0x1A` is the cross-indexed form of the `Y`-register family.

use super::addressing::{AddrMode, IndexReg};
use super::alu::*;
use super::bitops::*;
use super::branch::*;
use super::stack::*;
use super::{Mcu, PREFIX_1A, PREFIX_CD, PREFIX_Y};

#[derive(Copy, Clone)]
pub struct InstrDesc {
    pub mode: AddrMode,
    pub cycles: u8,
    pub exec: fn(&mut Mcu, u16),
}

const fn d(mode: AddrMode, cycles: u8, exec: fn(&mut Mcu, u16)) -> InstrDesc {
    InstrDesc { mode, cycles, exec }
}

pub(crate) fn is_prefix(byte: u8) -> bool {
    matches!(byte, PREFIX_Y | PREFIX_CD | PREFIX_1A)
}

pub(crate) fn index_reg_for_prefix(prefix: Option<u8>) -> IndexReg {
    match prefix {
        Some(PREFIX_Y) | Some(PREFIX_CD) => IndexReg::Y,
        _ => IndexReg::X,
    }
}

use AddrMode::*;

/// Decode `(prefix, opcode)` into an instruction descriptor. `None` means
/// illegal — either genuinely unassigned, or an addressing-mode/register
/// combination this port doesn't model (see DESIGN.md).
pub(crate) fn lookup(prefix: Option<u8>, opcode: u8) -> Option<InstrDesc> {
    match (prefix, opcode) {
        // --- Inherent: CCR / transfers / stack / NOP / control flow ---
        (None, 0x01) => Some(d(Inherent, 2, op_nop)),
        (None, 0x0C) => Some(d(Inherent, 2, op_clc)),
        (None, 0x0D) => Some(d(Inherent, 2, op_sec)),
        (None, 0x0E) => Some(d(Inherent, 2, op_cli)),
        (None, 0x0F) => Some(d(Inherent, 2, op_sei)),
        (None, 0x0A) => Some(d(Inherent, 2, op_clv)),
        (None, 0x0B) => Some(d(Inherent, 2, op_sev)),
        (None, 0x06) => Some(d(Inherent, 2, op_tap)),
        (None, 0x07) => Some(d(Inherent, 2, op_tpa)),
        (None, 0x16) => Some(d(Inherent, 2, op_tab)),
        (None, 0x17) => Some(d(Inherent, 2, op_tba)),
        (None, 0x30) => Some(d(Inherent, 2, op_tsx)),
        (None, 0x35) => Some(d(Inherent, 2, op_txs)),
        (Some(PREFIX_Y), 0x30) => Some(d(Inherent, 3, op_tsy)),
        (Some(PREFIX_Y), 0x35) => Some(d(Inherent, 3, op_tys)),
        (None, 0x8F) => Some(d(Inherent, 3, op_xgdx)),
        (Some(PREFIX_Y), 0x8F) => Some(d(Inherent, 4, op_xgdy)),
        (None, 0x36) => Some(d(Inherent, 3, op_psha)),
        (None, 0x37) => Some(d(Inherent, 3, op_pshb)),
        (None, 0x3C) => Some(d(Inherent, 4, op_pshx)),
        (Some(PREFIX_Y), 0x3C) => Some(d(Inherent, 5, op_pshy)),
        (None, 0x32) => Some(d(Inherent, 4, op_pula)),
        (None, 0x33) => Some(d(Inherent, 4, op_pulb)),
        (None, 0x38) => Some(d(Inherent, 5, op_pulx)),
        (Some(PREFIX_Y), 0x38) => Some(d(Inherent, 6, op_puly)),
        (None, 0x39) => Some(d(Inherent, 5, op_rts)),
        (None, 0x3B) => Some(d(Inherent, 12, op_rti)),
        (None, 0x3F) => Some(d(Inherent, 9, op_swi)),
        (None, 0x3E) => Some(d(Inherent, 9, op_wai)),
        (None, 0xCF) => Some(d(Inherent, 2, op_stop)),
        (None, 0x19) => Some(d(Inherent, 2, op_daa)),
        (None, 0x3D) => Some(d(Inherent, 10, op_mul)),
        (None, 0x02) => Some(d(Inherent, 41, op_idiv)),
        (None, 0x03) => Some(d(Inherent, 41, op_fdiv)),

        // --- Inherent RMW on A/B ---
        (None, 0x40) => Some(d(Inherent, 2, op_nega)),
        (None, 0x50) => Some(d(Inherent, 2, op_negb)),
        (None, 0x43) => Some(d(Inherent, 2, op_coma)),
        (None, 0x53) => Some(d(Inherent, 2, op_comb)),
        (None, 0x4C) => Some(d(Inherent, 2, op_inca)),
        (None, 0x5C) => Some(d(Inherent, 2, op_incb)),
        (None, 0x4A) => Some(d(Inherent, 2, op_deca)),
        (None, 0x5A) => Some(d(Inherent, 2, op_decb)),
        (None, 0x48) => Some(d(Inherent, 2, op_lsla)),
        (None, 0x58) => Some(d(Inherent, 2, op_lslb)),
        (None, 0x44) => Some(d(Inherent, 2, op_lsra)),
        (None, 0x54) => Some(d(Inherent, 2, op_lsrb)),
        (None, 0x47) => Some(d(Inherent, 2, op_asra)),
        (None, 0x57) => Some(d(Inherent, 2, op_asrb)),
        (None, 0x49) => Some(d(Inherent, 2, op_rola)),
        (None, 0x59) => Some(d(Inherent, 2, op_rolb)),
        (None, 0x46) => Some(d(Inherent, 2, op_rora)),
        (None, 0x56) => Some(d(Inherent, 2, op_rorb)),

        // --- Loads/stores: IMM / DIR / EXT / IND,X (and Y via prefix 0x18) ---
        (None, 0x86) => Some(d(Imm8, 2, op_ldaa)),
        (None, 0x96) => Some(d(Direct, 3, op_ldaa)),
        (None, 0xB6) => Some(d(Extended, 4, op_ldaa)),
        (None, 0xA6) => Some(d(Indexed, 4, op_ldaa)),
        (Some(PREFIX_Y), 0xA6) => Some(d(Indexed, 5, op_ldaa)),
        (Some(PREFIX_CD), 0xA6) => Some(d(Indexed, 5, op_ldaa)),

        (None, 0xC6) => Some(d(Imm8, 2, op_ldab)),
        (None, 0xD6) => Some(d(Direct, 3, op_ldab)),
        (None, 0xF6) => Some(d(Extended, 4, op_ldab)),
        (None, 0xE6) => Some(d(Indexed, 4, op_ldab)),
        (Some(PREFIX_Y), 0xE6) => Some(d(Indexed, 5, op_ldab)),
        (Some(PREFIX_CD), 0xE6) => Some(d(Indexed, 5, op_ldab)),

        (None, 0xCC) => Some(d(Imm16, 3, op_ldd)),
        (None, 0xDC) => Some(d(Direct, 4, op_ldd)),
        (None, 0xFC) => Some(d(Extended, 5, op_ldd)),
        (None, 0xEC) => Some(d(Indexed, 5, op_ldd)),
        (Some(PREFIX_Y), 0xEC) => Some(d(Indexed, 6, op_ldd)),

        (None, 0xCE) => Some(d(Imm16, 3, op_ldx)),
        (None, 0xDE) => Some(d(Direct, 4, op_ldx)),
        (None, 0xFE) => Some(d(Extended, 5, op_ldx)),
        (None, 0xEE) => Some(d(Indexed, 5, op_ldx)),
        (Some(PREFIX_CD), 0xEE) => Some(d(Indexed, 6, op_ldx)),

        (Some(PREFIX_Y), 0xCE) => Some(d(Imm16, 4, op_ldy)),
        (Some(PREFIX_Y), 0xDE) => Some(d(Direct, 5, op_ldy)),
        (Some(PREFIX_Y), 0xFE) => Some(d(Extended, 6, op_ldy)),
        (Some(PREFIX_Y), 0xEE) => Some(d(Indexed, 6, op_ldy)),
        (Some(PREFIX_1A), 0xEE) => Some(d(Indexed, 7, op_ldy)),

        (None, 0x97) => Some(d(Direct, 3, op_staa)),
        (None, 0xB7) => Some(d(Extended, 4, op_staa)),
        (None, 0xA7) => Some(d(Indexed, 4, op_staa)),
        (Some(PREFIX_Y), 0xA7) => Some(d(Indexed, 5, op_staa)),
        (Some(PREFIX_CD), 0xA7) => Some(d(Indexed, 5, op_staa)),

        (None, 0xD7) => Some(d(Direct, 3, op_stab)),
        (None, 0xF7) => Some(d(Extended, 4, op_stab)),
        (None, 0xE7) => Some(d(Indexed, 4, op_stab)),
        (Some(PREFIX_Y), 0xE7) => Some(d(Indexed, 5, op_stab)),
        (Some(PREFIX_CD), 0xE7) => Some(d(Indexed, 5, op_stab)),

        (None, 0xDD) => Some(d(Direct, 4, op_std)),
        (None, 0xFD) => Some(d(Extended, 5, op_std)),
        (None, 0xED) => Some(d(Indexed, 5, op_std)),
        (Some(PREFIX_Y), 0xED) => Some(d(Indexed, 6, op_std)),

        (None, 0xDF) => Some(d(Direct, 4, op_stx)),
        (None, 0xFF) => Some(d(Extended, 5, op_stx)),
        (None, 0xEF) => Some(d(Indexed, 5, op_stx)),
        (Some(PREFIX_CD), 0xEF) => Some(d(Indexed, 6, op_stx)),

        (Some(PREFIX_Y), 0xDF) => Some(d(Direct, 5, op_sty)),
        (Some(PREFIX_Y), 0xFF) => Some(d(Extended, 6, op_sty)),
        (Some(PREFIX_Y), 0xEF) => Some(d(Indexed, 6, op_sty)),
        (Some(PREFIX_1A), 0xEF) => Some(d(Indexed, 7, op_sty)),

        // --- Arithmetic ---
        (None, 0x8B) => Some(d(Imm8, 2, op_adda)),
        (None, 0x9B) => Some(d(Direct, 3, op_adda)),
        (None, 0xBB) => Some(d(Extended, 4, op_adda)),
        (None, 0xAB) => Some(d(Indexed, 4, op_adda)),
        (Some(PREFIX_Y), 0xAB) => Some(d(Indexed, 5, op_adda)),

        (None, 0xCB) => Some(d(Imm8, 2, op_addb)),
        (None, 0xDB) => Some(d(Direct, 3, op_addb)),
        (None, 0xFB) => Some(d(Extended, 4, op_addb)),
        (None, 0xEB) => Some(d(Indexed, 4, op_addb)),
        (Some(PREFIX_Y), 0xEB) => Some(d(Indexed, 5, op_addb)),

        (None, 0xC3) => Some(d(Imm16, 4, op_addd)),
        (None, 0xD3) => Some(d(Direct, 5, op_addd)),
        (None, 0xF3) => Some(d(Extended, 6, op_addd)),
        (None, 0xE3) => Some(d(Indexed, 6, op_addd)),
        (Some(PREFIX_Y), 0xE3) => Some(d(Indexed, 7, op_addd)),

        (None, 0x89) => Some(d(Imm8, 2, op_adca)),
        (None, 0x99) => Some(d(Direct, 3, op_adca)),
        (None, 0xB9) => Some(d(Extended, 4, op_adca)),
        (None, 0xA9) => Some(d(Indexed, 4, op_adca)),

        (None, 0xC9) => Some(d(Imm8, 2, op_adcb)),
        (None, 0xD9) => Some(d(Direct, 3, op_adcb)),
        (None, 0xF9) => Some(d(Extended, 4, op_adcb)),
        (None, 0xE9) => Some(d(Indexed, 4, op_adcb)),

        (None, 0x80) => Some(d(Imm8, 2, op_suba)),
        (None, 0x90) => Some(d(Direct, 3, op_suba)),
        (None, 0xB0) => Some(d(Extended, 4, op_suba)),
        (None, 0xA0) => Some(d(Indexed, 4, op_suba)),

        (None, 0xC0) => Some(d(Imm8, 2, op_subb)),
        (None, 0xD0) => Some(d(Direct, 3, op_subb)),
        (None, 0xF0) => Some(d(Extended, 4, op_subb)),
        (None, 0xE0) => Some(d(Indexed, 4, op_subb)),

        (None, 0x83) => Some(d(Imm16, 4, op_subd)),
        (None, 0x93) => Some(d(Direct, 5, op_subd)),
        (None, 0xB3) => Some(d(Extended, 6, op_subd)),
        (None, 0xA3) => Some(d(Indexed, 6, op_subd)),

        (None, 0x82) => Some(d(Imm8, 2, op_sbca)),
        (None, 0x92) => Some(d(Direct, 3, op_sbca)),
        (None, 0xB2) => Some(d(Extended, 4, op_sbca)),
        (None, 0xA2) => Some(d(Indexed, 4, op_sbca)),

        (None, 0xC2) => Some(d(Imm8, 2, op_sbcb)),
        (None, 0xD2) => Some(d(Direct, 3, op_sbcb)),
        (None, 0xF2) => Some(d(Extended, 4, op_sbcb)),
        (None, 0xE2) => Some(d(Indexed, 4, op_sbcb)),

        (None, 0x81) => Some(d(Imm8, 2, op_cmpa)),
        (None, 0x91) => Some(d(Direct, 3, op_cmpa)),
        (None, 0xB1) => Some(d(Extended, 4, op_cmpa)),
        (None, 0xA1) => Some(d(Indexed, 4, op_cmpa)),

        (None, 0xC1) => Some(d(Imm8, 2, op_cmpb)),
        (None, 0xD1) => Some(d(Direct, 3, op_cmpb)),
        (None, 0xF1) => Some(d(Extended, 4, op_cmpb)),
        (None, 0xE1) => Some(d(Indexed, 4, op_cmpb)),

        (Some(PREFIX_CD), 0x83) => Some(d(Imm16, 5, op_cpd)),
        (Some(PREFIX_CD), 0x93) => Some(d(Direct, 6, op_cpd)),
        (Some(PREFIX_CD), 0xB3) => Some(d(Extended, 7, op_cpd)),
        (Some(PREFIX_Y), 0xA3) => Some(d(Indexed, 7, op_cpd)),
        (Some(PREFIX_1A), 0xA3) => Some(d(Indexed, 7, op_cpd)),

        (None, 0x8C) => Some(d(Imm16, 4, op_cpx)),
        (None, 0x9C) => Some(d(Direct, 5, op_cpx)),
        (None, 0xBC) => Some(d(Extended, 6, op_cpx)),
        (None, 0xAC) => Some(d(Indexed, 6, op_cpx)),
        (Some(PREFIX_CD), 0xAC) => Some(d(Indexed, 7, op_cpx)),

        (Some(PREFIX_Y), 0x8C) => Some(d(Imm16, 5, op_cpy)),
        (Some(PREFIX_Y), 0x9C) => Some(d(Direct, 6, op_cpy)),
        (Some(PREFIX_Y), 0xBC) => Some(d(Extended, 7, op_cpy)),
        (Some(PREFIX_Y), 0xAC) => Some(d(Indexed, 7, op_cpy)),
        (Some(PREFIX_1A), 0xAC) => Some(d(Indexed, 7, op_cpy)),

        // --- Logic ---
        (None, 0x84) => Some(d(Imm8, 2, op_anda)),
        (None, 0x94) => Some(d(Direct, 3, op_anda)),
        (None, 0xB4) => Some(d(Extended, 4, op_anda)),
        (None, 0xA4) => Some(d(Indexed, 4, op_anda)),

        (None, 0xC4) => Some(d(Imm8, 2, op_andb)),
        (None, 0xD4) => Some(d(Direct, 3, op_andb)),
        (None, 0xF4) => Some(d(Extended, 4, op_andb)),
        (None, 0xE4) => Some(d(Indexed, 4, op_andb)),

        (None, 0x8A) => Some(d(Imm8, 2, op_oraa)),
        (None, 0x9A) => Some(d(Direct, 3, op_oraa)),
        (None, 0xBA) => Some(d(Extended, 4, op_oraa)),
        (None, 0xAA) => Some(d(Indexed, 4, op_oraa)),

        (None, 0xCA) => Some(d(Imm8, 2, op_orab)),
        (None, 0xDA) => Some(d(Direct, 3, op_orab)),
        (None, 0xFA) => Some(d(Extended, 4, op_orab)),
        (None, 0xEA) => Some(d(Indexed, 4, op_orab)),

        (None, 0x88) => Some(d(Imm8, 2, op_eora)),
        (None, 0x98) => Some(d(Direct, 3, op_eora)),
        (None, 0xB8) => Some(d(Extended, 4, op_eora)),
        (None, 0xA8) => Some(d(Indexed, 4, op_eora)),

        (None, 0xC8) => Some(d(Imm8, 2, op_eorb)),
        (None, 0xD8) => Some(d(Direct, 3, op_eorb)),
        (None, 0xF8) => Some(d(Extended, 4, op_eorb)),
        (None, 0xE8) => Some(d(Indexed, 4, op_eorb)),

        (None, 0x85) => Some(d(Imm8, 2, op_bita)),
        (None, 0x95) => Some(d(Direct, 3, op_bita)),
        (None, 0xB5) => Some(d(Extended, 4, op_bita)),
        (None, 0xA5) => Some(d(Indexed, 4, op_bita)),

        (None, 0xC5) => Some(d(Imm8, 2, op_bitb)),
        (None, 0xD5) => Some(d(Direct, 3, op_bitb)),
        (None, 0xF5) => Some(d(Extended, 4, op_bitb)),
        (None, 0xE5) => Some(d(Indexed, 4, op_bitb)),

        // --- Memory read-modify-write ---
        (None, 0x70) => Some(d(Extended, 6, op_neg_mem)),
        (None, 0x60) => Some(d(Indexed, 6, op_neg_mem)),
        (None, 0x73) => Some(d(Extended, 6, op_com_mem)),
        (None, 0x63) => Some(d(Indexed, 6, op_com_mem)),
        (None, 0x7C) => Some(d(Extended, 6, op_inc_mem)),
        (None, 0x6C) => Some(d(Indexed, 6, op_inc_mem)),
        (None, 0x7A) => Some(d(Extended, 6, op_dec_mem)),
        (None, 0x6A) => Some(d(Indexed, 6, op_dec_mem)),
        (None, 0x78) => Some(d(Extended, 6, op_lsl_mem)),
        (None, 0x68) => Some(d(Indexed, 6, op_lsl_mem)),
        (None, 0x74) => Some(d(Extended, 6, op_lsr_mem)),
        (None, 0x64) => Some(d(Indexed, 6, op_lsr_mem)),
        (None, 0x77) => Some(d(Extended, 6, op_asr_mem)),
        (None, 0x67) => Some(d(Indexed, 6, op_asr_mem)),
        (None, 0x79) => Some(d(Extended, 6, op_rol_mem)),
        (None, 0x69) => Some(d(Indexed, 6, op_rol_mem)),
        (None, 0x76) => Some(d(Extended, 6, op_ror_mem)),
        (None, 0x66) => Some(d(Indexed, 6, op_ror_mem)),

        // --- Bit manipulation (direct page and indexed,X) ---
        (None, 0x14) => Some(d(Direct, 6, op_bset)),
        (None, 0x15) => Some(d(Direct, 6, op_bclr)),
        (None, 0x12) => Some(d(Direct, 6, op_brset)),
        (None, 0x13) => Some(d(Direct, 6, op_brclr)),
        (None, 0x1C) => Some(d(Indexed, 7, op_bset)),
        (None, 0x1D) => Some(d(Indexed, 7, op_bclr)),
        (None, 0x1E) => Some(d(Indexed, 7, op_brset)),
        (None, 0x1F) => Some(d(Indexed, 7, op_brclr)),

        // --- Branches ---
        (None, 0x20) => Some(d(Relative, 3, op_bra)),
        (None, 0x21) => Some(d(Relative, 3, op_brn)),
        (None, 0x22) => Some(d(Relative, 3, op_bhi)),
        (None, 0x23) => Some(d(Relative, 3, op_bls)),
        (None, 0x24) => Some(d(Relative, 3, op_bcc)),
        (None, 0x25) => Some(d(Relative, 3, op_bcs)),
        (None, 0x26) => Some(d(Relative, 3, op_bne)),
        (None, 0x27) => Some(d(Relative, 3, op_beq)),
        (None, 0x28) => Some(d(Relative, 3, op_bvc)),
        (None, 0x29) => Some(d(Relative, 3, op_bvs)),
        (None, 0x2A) => Some(d(Relative, 3, op_bpl)),
        (None, 0x2B) => Some(d(Relative, 3, op_bmi)),
        (None, 0x2C) => Some(d(Relative, 3, op_bge)),
        (None, 0x2D) => Some(d(Relative, 3, op_blt)),
        (None, 0x2E) => Some(d(Relative, 3, op_bgt)),
        (None, 0x2F) => Some(d(Relative, 3, op_ble)),
        (None, 0x8D) => Some(d(Relative, 6, op_bsr)),

        (None, 0x7E) => Some(d(Extended, 3, op_jmp)),
        (None, 0x6E) => Some(d(Indexed, 3, op_jmp)),
        (None, 0xBD) => Some(d(Extended, 6, op_jsr)),
        (None, 0xAD) => Some(d(Indexed, 6, op_jsr)),
        (None, 0x9D) => Some(d(Direct, 5, op_jsr)),

        _ => None,
    }
}
