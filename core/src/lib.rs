pub mod bus;
pub mod cpu;
pub mod error;
pub mod gdb;
pub mod registers;
pub mod vectors;

pub mod prelude {
    pub use crate::bus::Bus;
    pub use crate::cpu::{Mcu, Status, StopReason};
    pub use crate::error::CoreError;
    pub use crate::registers::{Ccr, Registers};
}
