//! The fixed interrupt/reset vector table at the top of the HC11 address space.
//!
//! Each vector is a big-endian 16-bit address read through the bus, so these
//! constants are bus addresses, not values.

/// Start of the vector table.
pub const VECTOR_TABLE_START: u16 = 0xFFC0;
/// End of the vector table (inclusive).
pub const VECTOR_TABLE_END: u16 = 0xFFFF;

pub const VECTOR_SCI: u16 = 0xFFD6;
pub const VECTOR_SPI: u16 = 0xFFD8;
pub const VECTOR_PULSE_ACC_INPUT_EDGE: u16 = 0xFFDA;
pub const VECTOR_PULSE_ACC_OVERFLOW: u16 = 0xFFDC;
pub const VECTOR_TIMER_OVERFLOW: u16 = 0xFFDE;
pub const VECTOR_TIMER_OUTPUT_COMPARE5: u16 = 0xFFE0;
pub const VECTOR_TIMER_OUTPUT_COMPARE4: u16 = 0xFFE2;
pub const VECTOR_TIMER_OUTPUT_COMPARE3: u16 = 0xFFE4;
pub const VECTOR_TIMER_OUTPUT_COMPARE2: u16 = 0xFFE6;
pub const VECTOR_TIMER_OUTPUT_COMPARE1: u16 = 0xFFE8;
pub const VECTOR_TIMER_INPUT_CAPTURE3: u16 = 0xFFEA;
pub const VECTOR_TIMER_INPUT_CAPTURE2: u16 = 0xFFEC;
pub const VECTOR_TIMER_INPUT_CAPTURE1: u16 = 0xFFEE;
pub const VECTOR_RTI: u16 = 0xFFF0;
pub const VECTOR_IRQ: u16 = 0xFFF2;
pub const VECTOR_XIRQ: u16 = 0xFFF4;
pub const VECTOR_SWI: u16 = 0xFFF6;
/// Illegal opcode trap: double prefix byte or an unrecognized `(prefix, opcode)` pair.
pub const VECTOR_ILLEGAL: u16 = 0xFFF8;
pub const VECTOR_COP_FAIL: u16 = 0xFFFA;
pub const VECTOR_COP_CLOCK_MONITOR_FAIL: u16 = 0xFFFC;
/// Power-on / external reset vector.
pub const VECTOR_RESET: u16 = 0xFFFE;
