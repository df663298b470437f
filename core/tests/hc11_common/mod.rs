//! Shared scaffolding for the HC11 integration tests: a real `Mcu` over a
//! real `Bus`, not a CPU-agnostic stand-in, since `Bus` is already a
//! concrete, directly constructible type (see `core/src/bus.rs`).

use hc11_core::cpu::Mcu;

/// A fresh `Mcu` with a large writable RAM region mapped in so a test's
/// program and stack can live anywhere below the vector table without
/// colliding with the on-chip RAM/IO windows' defaults.
pub fn new_mcu() -> Mcu {
    let mut mcu = Mcu::new();
    mcu.bus.map_ram("test", 0x2000, 0xE000).unwrap();
    mcu
}

/// Load `program` at `addr`, point `PC` at it, and skip the reset vector
/// fetch (as `-r/--run` does) so `step()`/`clock()` starts fetching the
/// first opcode immediately.
pub fn load_at(mcu: &mut Mcu, addr: u16, program: &[u8]) {
    mcu.bus.load_image(addr, program);
    mcu.regs.pc = addr;
    mcu.start_at_pc();
}

/// Retire `n` instructions via the public single-step entry point.
pub fn step_n(mcu: &mut Mcu, n: usize) {
    for _ in 0..n {
        mcu.step();
    }
}
