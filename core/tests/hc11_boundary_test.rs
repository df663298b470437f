/// Edge-of-range behaviors called out as boundary cases: 8-bit wraparound on
/// `INC`, carry-in/half-carry on `ADC`, unsigned indexed offsets, and signed
/// branch-offset wraparound.
use hc11_core::registers::Ccr;

mod hc11_common;
use hc11_common::{load_at, new_mcu, step_n};

// =============================================================================
// INC on 0xFF wraps to 0x00; see DESIGN.md for why V is 0, not 1, here.
// =============================================================================

#[test]
fn inca_0xff_wraps_and_sets_zero() {
    let mut mcu = new_mcu();
    mcu.regs.set_a(0xFF);
    load_at(&mut mcu, 0x2000, &[0x4C]); // INCA
    step_n(&mut mcu, 1);
    assert_eq!(mcu.regs.a(), 0x00);
    assert!(!mcu.regs.flag(Ccr::N));
    assert!(mcu.regs.flag(Ccr::Z));
    assert!(!mcu.regs.flag(Ccr::V));
}

#[test]
fn inca_0x7f_sets_overflow() {
    let mut mcu = new_mcu();
    mcu.regs.set_a(0x7F);
    load_at(&mut mcu, 0x2000, &[0x4C]); // INCA
    step_n(&mut mcu, 1);
    assert_eq!(mcu.regs.a(), 0x80);
    assert!(mcu.regs.flag(Ccr::V));
    assert!(mcu.regs.flag(Ccr::N));
}

// =============================================================================
// ADC honors prior carry and sets H from the bit-3 carry
// =============================================================================

#[test]
fn adca_adds_prior_carry_in() {
    let mut mcu = new_mcu();
    mcu.regs.set_a(0x01);
    mcu.regs.set_flag(Ccr::C, true);
    load_at(&mut mcu, 0x2000, &[0x89, 0x01]); // ADCA #1
    step_n(&mut mcu, 1);
    // 0x01 + 0x01 + carry-in(1) = 0x03
    assert_eq!(mcu.regs.a(), 0x03);
}

#[test]
fn adca_sets_half_carry_from_bit3() {
    let mut mcu = new_mcu();
    mcu.regs.set_a(0x0F);
    mcu.regs.set_flag(Ccr::C, false);
    load_at(&mut mcu, 0x2000, &[0x89, 0x01]); // ADCA #1 -> 0x10, carry out of bit 3
    step_n(&mut mcu, 1);
    assert_eq!(mcu.regs.a(), 0x10);
    assert!(mcu.regs.flag(Ccr::H));
}

// =============================================================================
// Indexed addressing: the 8-bit offset is unsigned
// =============================================================================

#[test]
fn indexed_offset_is_treated_as_unsigned() {
    let mut mcu = new_mcu();
    mcu.regs.x = 0x3000;
    mcu.bus.write8(0x30FF, 0x77); // offset 0xFF means +255, not -1
    load_at(&mut mcu, 0x2000, &[0xA6, 0xFF]); // LDAA $FF,X
    step_n(&mut mcu, 1);
    assert_eq!(mcu.regs.a(), 0x77);
}

// =============================================================================
// Branch offset is signed: BRA 0xFE at PC=0x1000 loops back to 0x1000
// =============================================================================

#[test]
fn bra_negative_two_is_an_infinite_loop_target() {
    let mut mcu = new_mcu();
    load_at(&mut mcu, 0x3000, &[0x20, 0xFE]); // BRA -2
    step_n(&mut mcu, 1);
    assert_eq!(mcu.regs.pc, 0x3000);
}
