//! Command-line surface, parsed with `clap`'s derive API now that it's wide
//! enough (repeatable and compound flags) to want structured parsing instead
//! of hand-rolled `std::env::args()` scanning.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "68HC11 emulator with a GDB remote-serial endpoint")]
pub struct Args {
    /// Map a file as ROM at an address (`addr,file`). Repeatable.
    #[arg(short = 'b', long = "bin", value_name = "ADDR,FILE")]
    pub bin: Vec<String>,

    /// Load a Motorola S-record file (S19/S28/S37). Repeatable.
    #[arg(short = 's', long = "s19", value_name = "FILE")]
    pub s19: Vec<String>,

    /// Map 8 KiB of RAM at 0xE000..0xFFFF.
    #[arg(short = 'w', long = "writable")]
    pub writable: bool,

    /// Preset registers before running (`d,a,b,x,y,p=pc,s=sp,c=ccr`, comma-separated `name=hex`).
    #[arg(short = 'p', long = "preset-regs", value_name = "REG=VAL,...")]
    pub preset_regs: Option<String>,

    /// Write hex-encoded bytes to memory (`addr,hex`). Repeatable.
    #[arg(short = 'm', long = "preset-mem", value_name = "ADDR,HEX")]
    pub preset_mem: Vec<String>,

    /// Begin execution immediately instead of waiting for a debugger to issue `c`/`s`.
    #[arg(short = 'r', long = "run")]
    pub run: bool,

    /// After execution ends, compare registers against this list and warn on mismatch.
    #[arg(short = 'e', long = "expect-regs", value_name = "REG=VAL,...")]
    pub expect_regs: Option<String>,

    /// Disable the GDB server.
    #[arg(short = 'g', long = "no-gdb")]
    pub no_gdb: bool,

    /// Trace bus-open accesses, GDB packet dispatch, and status transitions.
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// GDB TCP port. Defaults to the conventional `gdbserver` port.
    #[arg(long = "port", default_value_t = 3333)]
    pub port: u16,
}
