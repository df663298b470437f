//! The execution engine: a clock-stepped fetch/decode/execute state machine.
//!
//! Operand bytes for a given addressing mode are read in one `clock()` call
//! rather than one-sub-cycle-per-bus-access; see DESIGN.md, "CPU engine" for
//! why. Base cycle counts are still charged to `clocks` so `run_for_cycles`-
//! style throughput measurement stays meaningful.

mod addressing;
mod alu;
mod bitops;
mod branch;
mod decode;
mod stack;

use std::collections::BTreeSet;

use crate::bus::Bus;
use crate::registers::Registers;
use crate::vectors::{VECTOR_ILLEGAL, VECTOR_RESET};

pub use addressing::{AddrMode, IndexReg};
pub use decode::InstrDesc;

/// Legal prefix bytes that switch addressing/register pages.
pub const PREFIX_Y: u8 = 0x18;
pub const PREFIX_CD: u8 = 0xCD;
pub const PREFIX_1A: u8 = 0x1A;

/// Run/stop status of the engine, observed by the debug surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Stopped(StopReason),
    Running,
    Stepping,
    /// A `step()` call retired exactly one instruction and has nothing left
    /// to do this call; distinct from `Stopped` so the GDB server can tell
    /// "stopped because a full step completed" from "stopped at a breakpoint".
    ExecutedStop,
}

/// Why the engine most recently transitioned into `Stopped`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    Normal,
    Fail,
}

/// Sub-states of one `clock()`-driven fetch/decode/execute pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EngineState {
    VectorFetchHigh,
    VectorFetchLow,
    FetchOpcode,
    FetchOperand,
    Execute,
}

/// The full machine: registers, bus, and engine state together. The frontend
/// constructs a single value and shares it behind a mutex; there's no
/// process-global CPU state anywhere in this crate.
pub struct Mcu {
    pub regs: Registers,
    pub bus: Bus,
    pub status: Status,
    pub state: EngineState,
    pub vector: u16,
    pub prefix: Option<u8>,
    pub opcode: u8,
    /// Decoded instruction pending operand fetch / execution.
    pub(crate) instr: Option<InstrDesc>,
    /// Addressing mode of the instruction currently in `Execute`, so a
    /// handler shared across modes (e.g. `op_ldaa`) knows whether `operand`
    /// is a value already or an address to read through.
    pub(crate) current_mode: AddrMode,
    /// Effective address (DIR/EXT/IND) or raw immediate value, set by
    /// `FetchOperand` and consumed by `Execute`.
    pub operand: u16,
    /// Address of the last bus access of interest to stop classification.
    pub busadr: u16,
    pub clocks: u64,
    pub breakpoints: BTreeSet<u16>,
    /// Gates extra `eprintln!` tracing in the frontend; the core itself
    /// never prints (no logging crate anywhere in this dependency tree).
    pub verbose: bool,
}

impl Default for Mcu {
    fn default() -> Self {
        Self::new()
    }
}

impl Mcu {
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            bus: Bus::new(),
            status: Status::Stopped(StopReason::Normal),
            state: EngineState::VectorFetchHigh,
            vector: VECTOR_RESET,
            prefix: None,
            opcode: 0,
            instr: None,
            current_mode: AddrMode::Inherent,
            operand: 0,
            busadr: 0,
            clocks: 0,
            breakpoints: BTreeSet::new(),
            verbose: false,
        }
    }

    /// Restore engine state to its post-reset condition. Register contents
    /// are left alone unless `hard`: a debugger `monitor reset` shouldn't
    /// necessarily clobber registers the user just set.
    pub fn reset(&mut self, hard: bool) {
        self.bus.rambase = 0x0000;
        self.bus.iobase = 0x1000;
        self.vector = VECTOR_RESET;
        self.state = EngineState::VectorFetchHigh;
        self.prefix = None;
        self.instr = None;
        self.clocks = 0;
        self.status = Status::Stopped(StopReason::Normal);
        if hard {
            self.regs = Registers::new();
        }
    }

    pub fn set_breakpoint(&mut self, addr: u16) {
        self.breakpoints.insert(addr);
    }

    pub fn clear_breakpoint(&mut self, addr: u16) {
        self.breakpoints.remove(&addr);
    }

    /// Skip the vector fetch and start directly at `FETCHOPCODE`, as if
    /// `PC` were already loaded — used by the `-r/--run` flag when the
    /// image already preset `PC` explicitly.
    pub fn start_at_pc(&mut self) {
        self.state = EngineState::FetchOpcode;
    }

    fn trace(&self, msg: impl FnOnce() -> String) {
        if self.verbose {
            eprintln!("{}", msg());
        }
    }

    /// Advance one sub-cycle of the fetch/decode/execute pipeline.
    pub fn clock(&mut self) {
        self.clocks += 1;
        match self.state {
            EngineState::VectorFetchHigh => {
                let hi = self.bus.read8(self.vector) as u16;
                self.regs.pc = hi << 8;
                self.state = EngineState::VectorFetchLow;
            }
            EngineState::VectorFetchLow => {
                let lo = self.bus.read8(self.vector.wrapping_add(1)) as u16;
                self.regs.pc |= lo;
                self.state = EngineState::FetchOpcode;
            }
            EngineState::FetchOpcode => self.fetch_opcode(),
            EngineState::FetchOperand => self.fetch_operand(),
            EngineState::Execute => self.execute(),
        }
    }

    fn fetch_opcode(&mut self) {
        if self.breakpoint_hit() {
            return;
        }
        let byte = self.bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);

        if decode::is_prefix(byte) {
            if self.prefix.is_some() {
                self.take_illegal_trap();
            } else {
                self.prefix = Some(byte);
            }
            return;
        }

        self.opcode = byte;
        match decode::lookup(self.prefix, byte) {
            Some(instr) => {
                self.trace(|| format!("decode prefix={:?} opcode={byte:#04X}", self.prefix));
                self.instr = Some(instr);
                self.state = if instr.mode == AddrMode::Inherent {
                    EngineState::Execute
                } else {
                    EngineState::FetchOperand
                };
            }
            None => self.take_illegal_trap(),
        }
    }

    fn fetch_operand(&mut self) {
        let instr = self.instr.expect("FetchOperand without a decoded instruction");
        let index_reg = decode::index_reg_for_prefix(self.prefix);
        self.operand = addressing::fetch(self, instr.mode, index_reg);
        self.clocks += instr.cycles.saturating_sub(2) as u64;
        self.state = EngineState::Execute;
    }

    fn execute(&mut self) {
        let instr = self.instr.take().expect("Execute without a decoded instruction");
        let operand = self.operand;
        self.busadr = self.regs.pc;
        self.current_mode = instr.mode;
        if instr.mode == AddrMode::Inherent {
            // Non-inherent modes already charged their cycles in FetchOperand.
            self.clocks += instr.cycles.saturating_sub(2) as u64;
        }
        (instr.exec)(self, operand);
        self.prefix = None;
        // `SWI` redirects into a vector fetch itself; leave state alone for
        // any handler that already moved off `Execute`.
        if self.state == EngineState::Execute && !matches!(self.status, Status::Stopped(_)) {
            self.state = EngineState::FetchOpcode;
        }
    }

    fn take_illegal_trap(&mut self) {
        self.vector = VECTOR_ILLEGAL;
        self.busadr = VECTOR_ILLEGAL;
        self.prefix = None;
        self.instr = None;
        self.state = EngineState::VectorFetchHigh;
        self.status = Status::Stopped(StopReason::Fail);
    }

    fn breakpoint_hit(&mut self) -> bool {
        if self.breakpoints.contains(&self.regs.pc) {
            self.busadr = self.regs.pc;
            self.status = Status::Stopped(StopReason::Normal);
            true
        } else {
            false
        }
    }

    /// Run `clock()` until one instruction retires (state returns to
    /// `FETCHOPCODE` with no pending prefix), or a breakpoint/illegal
    /// opcode/STOP terminates the step early.
    pub fn step(&mut self) {
        self.status = Status::Stepping;
        self.retire_one_instruction();
        if !matches!(self.status, Status::Stopped(_)) {
            self.status = Status::ExecutedStop;
        }
    }

    /// Run continuously until a breakpoint or fault stops the engine.
    pub fn run(&mut self) {
        self.status = Status::Running;
        while self.status == Status::Running {
            self.clock();
        }
    }

    /// The mechanical half of `step()`: clock through one instruction
    /// without touching `status`. Used directly by a threaded run loop
    /// that owns the Running/Stepping distinction itself (see
    /// `hc11_core::gdb`), so a concurrent `c`/`s` request isn't clobbered
    /// by `step()` unconditionally setting `Stepping` on entry.
    pub fn retire_one_instruction(&mut self) {
        loop {
            self.clock();
            if matches!(self.status, Status::Stopped(_)) {
                return;
            }
            if self.state == EngineState::FetchOpcode && self.prefix.is_none() {
                return;
            }
        }
    }
}
