//! GDB Remote Serial Protocol server: a TCP listener that speaks the framed
//! `$payload#cc` protocol and translates it to/from the bus and register
//! file, so an unmodified `gdb` (or `m68hc11-elf-gdb`) can attach.
//!
//! Grounded on `gdbremote.c`'s dispatch table and `gdb`'s own
//! `m68hc11-tdep.c` register order (X, D, Y, SP, PC, A, B, CCR), reworked
//! from its signal-driven single-core-global model into the
//! `Arc<Mutex<Mcu>>` + `Arc<AtomicBool>` shutdown pattern this workspace
//! uses instead of `pthread_sigqueue`/`SIGUSR1`.

mod packet;

use std::io::{ErrorKind, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::cpu::{Mcu, Status, StopReason};

pub use packet::{checksum, encode, Event, Receiver};

const REG_X: u32 = 0;
const REG_D: u32 = 1;
const REG_Y: u32 = 2;
const REG_SP: u32 = 3;
const REG_PC: u32 = 4;
const REG_A: u32 = 5;
const REG_B: u32 = 6;
const REG_CCR: u32 = 7;

/// Cap on the bytes a single `m`/`qRcmd` reply will carry, so a large read
/// request degrades by truncation rather than growing the reply unbounded.
const MAX_REPLY_BYTES: usize = 2048;

/// How long a connection's socket read blocks before the handler loop gets
/// a chance to check `shutdown` and poll for an engine stop.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A bound but not-yet-running GDB server. Call [`GdbServer::run`] on a
/// dedicated thread; [`GdbServer::shutdown_handle`] lets the owner stop it.
pub struct GdbServer {
    listener: TcpListener,
    shutdown: Arc<AtomicBool>,
}

impl GdbServer {
    pub fn bind(port: u16) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))?;
        listener.set_nonblocking(true)?;
        Ok(Self {
            listener,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Accept one connection at a time — a single-target debugger has no
    /// use for more. `std::net` has no accept-with-timeout, so the listener
    /// is non-blocking and this loop polls `shutdown` between attempts.
    pub fn run(self, mcu: Arc<Mutex<Mcu>>) {
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, _addr)) => handle_connection(stream, &mcu, &self.shutdown),
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(POLL_INTERVAL),
                Err(_) => break,
            }
        }
    }
}

fn handle_connection(mut stream: TcpStream, mcu: &Arc<Mutex<Mcu>>, shutdown: &Arc<AtomicBool>) {
    let _ = stream.set_read_timeout(Some(POLL_INTERVAL));
    let mut receiver = packet::Receiver::new();
    let mut awaiting_stop = false;
    let mut byte = [0u8; 1];

    loop {
        if shutdown.load(Ordering::Relaxed) {
            return;
        }
        match stream.read(&mut byte) {
            Ok(0) => return,
            Ok(_) => match receiver.feed(byte[0]) {
                packet::Event::Pending => {}
                packet::Event::BadChecksum => {
                    let _ = stream.write_all(b"-");
                }
                packet::Event::Interrupt => {
                    mcu.lock().unwrap().status = Status::Stopped(StopReason::Normal);
                    awaiting_stop = false;
                    let _ = stream.write_all(&packet::encode(b"S05"));
                }
                packet::Event::Packet(payload) => {
                    let _ = stream.write_all(b"+");
                    if payload.first() == Some(&b'D') {
                        let _ = stream.write_all(&packet::encode(b"OK"));
                        return;
                    }
                    match dispatch(mcu, &payload) {
                        Reply::Immediate(reply) => {
                            let _ = stream.write_all(&packet::encode(&reply));
                        }
                        Reply::AwaitStop => awaiting_stop = true,
                    }
                }
            },
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                if awaiting_stop {
                    let status = mcu.lock().unwrap().status;
                    if matches!(status, Status::Stopped(_)) {
                        let _ = stream.write_all(&packet::encode(b"S05"));
                        awaiting_stop = false;
                    }
                }
            }
            Err(_) => return,
        }
    }
}

enum Reply {
    Immediate(Vec<u8>),
    /// `c`/`s` already changed `status`; the connection loop waits for the
    /// engine thread to stop it before replying.
    AwaitStop,
}

fn dispatch(mcu: &Arc<Mutex<Mcu>>, payload: &[u8]) -> Reply {
    let text = String::from_utf8_lossy(payload);
    match payload.first() {
        Some(b'?') => Reply::Immediate(b"S05".to_vec()),
        Some(b'g') => Reply::Immediate(read_all_registers(&mcu.lock().unwrap())),
        Some(b'G') => {
            write_all_registers(&mut mcu.lock().unwrap(), &text[1..]);
            Reply::Immediate(b"OK".to_vec())
        }
        Some(b'p') => Reply::Immediate(read_one_register(&mcu.lock().unwrap(), &text[1..])),
        Some(b'P') => Reply::Immediate(write_one_register(&mut mcu.lock().unwrap(), &text[1..])),
        Some(b'm') => Reply::Immediate(read_memory(&mut mcu.lock().unwrap(), &text[1..])),
        Some(b'M') => Reply::Immediate(write_memory_hex(&mut mcu.lock().unwrap(), &text[1..])),
        Some(b'X') => Reply::Immediate(write_memory_binary(&mut mcu.lock().unwrap(), &payload[1..])),
        Some(b'c') => {
            mcu.lock().unwrap().status = Status::Running;
            Reply::AwaitStop
        }
        Some(b's') => {
            mcu.lock().unwrap().status = Status::Stepping;
            Reply::AwaitStop
        }
        Some(b'Z') => Reply::Immediate(set_breakpoint(&mut mcu.lock().unwrap(), &text[1..], true)),
        Some(b'z') => Reply::Immediate(set_breakpoint(&mut mcu.lock().unwrap(), &text[1..], false)),
        Some(b'H') => Reply::Immediate(b"OK".to_vec()),
        Some(b'q') => Reply::Immediate(query(mcu, &text[1..])),
        _ => Reply::Immediate(Vec::new()),
    }
}

fn read_all_registers(mcu: &Mcu) -> Vec<u8> {
    format!(
        "{:04X}{:04X}{:04X}{:04X}{:04X}{:02X}{:02X}{:02X}",
        mcu.regs.x,
        mcu.regs.d,
        mcu.regs.y,
        mcu.regs.sp,
        mcu.regs.pc,
        mcu.regs.a(),
        mcu.regs.b(),
        mcu.regs.ccr,
    )
    .into_bytes()
}

/// Reverse of [`read_all_registers`]; any field that doesn't parse is left
/// at its current value rather than failing the whole packet.
fn write_all_registers(mcu: &mut Mcu, text: &str) {
    let field = |start: usize, len: usize| -> Option<u32> {
        text.get(start..start + len)
            .and_then(|s| u32::from_str_radix(s, 16).ok())
    };
    if let Some(v) = field(0, 4) {
        mcu.regs.x = v as u16;
    }
    if let Some(v) = field(4, 4) {
        mcu.regs.d = v as u16;
    }
    if let Some(v) = field(8, 4) {
        mcu.regs.y = v as u16;
    }
    if let Some(v) = field(12, 4) {
        mcu.regs.sp = v as u16;
    }
    if let Some(v) = field(16, 4) {
        mcu.regs.pc = v as u16;
    }
    if let Some(v) = field(20, 2) {
        mcu.regs.set_a(v as u8);
    }
    if let Some(v) = field(22, 2) {
        mcu.regs.set_b(v as u8);
    }
    if let Some(v) = field(24, 2) {
        mcu.regs.ccr = v as u8;
    }
}

fn read_one_register(mcu: &Mcu, text: &str) -> Vec<u8> {
    let Ok(reg) = u32::from_str_radix(text.trim(), 16) else {
        return b"E01".to_vec();
    };
    match reg {
        REG_X => format!("{:04X}", mcu.regs.x).into_bytes(),
        REG_D => format!("{:04X}", mcu.regs.d).into_bytes(),
        REG_Y => format!("{:04X}", mcu.regs.y).into_bytes(),
        REG_SP => format!("{:04X}", mcu.regs.sp).into_bytes(),
        REG_PC => format!("{:04X}", mcu.regs.pc).into_bytes(),
        REG_A => format!("{:02X}", mcu.regs.a()).into_bytes(),
        REG_B => format!("{:02X}", mcu.regs.b()).into_bytes(),
        REG_CCR => format!("{:02X}", mcu.regs.ccr).into_bytes(),
        _ => b"E02".to_vec(),
    }
}

fn write_one_register(mcu: &mut Mcu, text: &str) -> Vec<u8> {
    let Some((reg_s, val_s)) = text.split_once('=') else {
        return b"E01".to_vec();
    };
    let (Ok(reg), Ok(val)) = (
        u32::from_str_radix(reg_s, 16),
        u32::from_str_radix(val_s, 16),
    ) else {
        return b"E01".to_vec();
    };
    match reg {
        REG_X => mcu.regs.x = val as u16,
        REG_D => mcu.regs.d = val as u16,
        REG_Y => mcu.regs.y = val as u16,
        REG_SP => mcu.regs.sp = val as u16,
        REG_PC => mcu.regs.pc = val as u16,
        REG_A => mcu.regs.set_a(val as u8),
        REG_B => mcu.regs.set_b(val as u8),
        REG_CCR => mcu.regs.ccr = val as u8,
        _ => return b"E02".to_vec(),
    }
    b"OK".to_vec()
}

fn read_memory(mcu: &mut Mcu, text: &str) -> Vec<u8> {
    let Some((addr_s, len_s)) = text.split_once(',') else {
        return b"E01".to_vec();
    };
    let (Ok(addr), Ok(len)) = (
        u32::from_str_radix(addr_s, 16),
        u32::from_str_radix(len_s, 16),
    ) else {
        return b"E01".to_vec();
    };
    let len = (len as usize).min(MAX_REPLY_BYTES / 2);
    let mut out = Vec::with_capacity(len * 2);
    for i in 0..len as u32 {
        let byte = mcu.bus.read8(addr.wrapping_add(i) as u16);
        out.extend(format!("{byte:02x}").into_bytes());
    }
    out
}

fn write_memory_hex(mcu: &mut Mcu, text: &str) -> Vec<u8> {
    let Some((header, data)) = text.split_once(':') else {
        return b"E01".to_vec();
    };
    let Some((addr_s, len_s)) = header.split_once(',') else {
        return b"E01".to_vec();
    };
    let (Ok(addr), Ok(len)) = (
        u32::from_str_radix(addr_s, 16),
        u32::from_str_radix(len_s, 16),
    ) else {
        return b"E01".to_vec();
    };
    let bytes = data.as_bytes();
    for i in 0..len as usize {
        let Some(hex) = bytes.get(i * 2..i * 2 + 2) else {
            break;
        };
        let Ok(hex) = std::str::from_utf8(hex) else {
            break;
        };
        let Ok(byte) = u8::from_str_radix(hex, 16) else {
            continue;
        };
        mcu.bus.write8(addr.wrapping_add(i as u32) as u16, byte);
    }
    b"OK".to_vec()
}

/// `X addr,len:binary` — unlike `M`, the data is raw bytes already
/// unescaped by [`packet::Receiver`], so this takes the undecoded payload
/// instead of the lossily-converted `text`.
fn write_memory_binary(mcu: &mut Mcu, payload: &[u8]) -> Vec<u8> {
    let Some(colon) = payload.iter().position(|&b| b == b':') else {
        return b"E01".to_vec();
    };
    let Ok(header) = std::str::from_utf8(&payload[..colon]) else {
        return b"E01".to_vec();
    };
    let Some((addr_s, len_s)) = header.split_once(',') else {
        return b"E01".to_vec();
    };
    let (Ok(addr), Ok(len)) = (
        u32::from_str_radix(addr_s, 16),
        u32::from_str_radix(len_s, 16),
    ) else {
        return b"E01".to_vec();
    };
    let data = &payload[colon + 1..];
    for (i, &byte) in data.iter().take(len as usize).enumerate() {
        mcu.bus.write8(addr.wrapping_add(i as u32) as u16, byte);
    }
    b"OK".to_vec()
}

fn set_breakpoint(mcu: &mut Mcu, text: &str, install: bool) -> Vec<u8> {
    let mut parts = text.splitn(3, ',');
    let (Some(_kind), Some(addr_s), Some(_length)) = (parts.next(), parts.next(), parts.next())
    else {
        return b"E01".to_vec();
    };
    let Ok(addr) = u32::from_str_radix(addr_s, 16) else {
        return b"E01".to_vec();
    };
    if install {
        mcu.set_breakpoint(addr as u16);
    } else {
        mcu.clear_breakpoint(addr as u16);
    }
    b"OK".to_vec()
}

fn query(mcu: &Arc<Mutex<Mcu>>, text: &str) -> Vec<u8> {
    if text.starts_with("Supported") {
        format!("PacketSize={MAX_REPLY_BYTES}").into_bytes()
    } else if text.starts_with("fThreadInfo") {
        b"m0".to_vec()
    } else if text.starts_with("sThreadInfo") {
        b"l".to_vec()
    } else if text.starts_with("Attached") {
        b"1".to_vec()
    } else if text.starts_with('C') {
        b"0".to_vec()
    } else if let Some(hex) = text.strip_prefix("Rcmd,") {
        monitor_command(mcu, hex)
    } else {
        Vec::new()
    }
}

fn monitor_command(mcu: &Arc<Mutex<Mcu>>, hex: &str) -> Vec<u8> {
    let command: String = hex
        .as_bytes()
        .chunks(2)
        .filter_map(|pair| std::str::from_utf8(pair).ok())
        .filter_map(|s| u8::from_str_radix(s, 16).ok())
        .map(|b| b as char)
        .collect();
    let reply = match command.trim() {
        "help" => "reset - restart cpu\n",
        "reset" => {
            mcu.lock().unwrap().reset(false);
            "target was reset\n"
        }
        _ => "",
    };
    reply
        .bytes()
        .flat_map(|b| format!("{b:02x}").into_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn mcu() -> Arc<Mutex<Mcu>> {
        Arc::new(Mutex::new(Mcu::new()))
    }

    #[test]
    fn register_read_round_trip() {
        let mcu = mcu();
        {
            let mut m = mcu.lock().unwrap();
            m.regs.d = 0x1234;
            m.regs.x = 0xAAAA;
            m.regs.y = 0xBBBB;
            m.regs.sp = 0xCCCC;
            m.regs.pc = 0xDDDD;
            m.regs.ccr = 0x5A;
        }
        match dispatch(&mcu, b"g") {
            Reply::Immediate(reply) => {
                assert_eq!(reply, b"AAAA1234BBBBCCCCDDDD12345A");
            }
            Reply::AwaitStop => panic!("expected immediate reply"),
        }
    }

    #[test]
    fn single_register_read_and_write() {
        let mcu = mcu();
        mcu.lock().unwrap().regs.pc = 0x1000;
        match dispatch(&mcu, b"p4") {
            Reply::Immediate(reply) => assert_eq!(reply, b"1000"),
            Reply::AwaitStop => panic!("expected immediate reply"),
        }
        match dispatch(&mcu, b"P4=2000") {
            Reply::Immediate(reply) => assert_eq!(reply, b"OK"),
            Reply::AwaitStop => panic!("expected immediate reply"),
        }
        assert_eq!(mcu.lock().unwrap().regs.pc, 0x2000);
    }

    #[test]
    fn memory_read_write_round_trip() {
        let mcu = mcu();
        mcu.lock().unwrap().bus.map_ram("ram", 0x0000, 0x2000).unwrap();
        match dispatch(&mcu, b"M1000,2:CAFE") {
            Reply::Immediate(r) => assert_eq!(r, b"OK"),
            _ => panic!(),
        }
        match dispatch(&mcu, b"m1000,2") {
            Reply::Immediate(r) => assert_eq!(r, b"cafe"),
            _ => panic!(),
        }
    }

    #[test]
    fn breakpoint_install_and_remove() {
        let mcu = mcu();
        match dispatch(&mcu, b"Z0,1234,1") {
            Reply::Immediate(r) => assert_eq!(r, b"OK"),
            _ => panic!(),
        }
        assert!(mcu.lock().unwrap().breakpoints.contains(&0x1234));
        match dispatch(&mcu, b"z0,1234,1") {
            Reply::Immediate(r) => assert_eq!(r, b"OK"),
            _ => panic!(),
        }
        assert!(!mcu.lock().unwrap().breakpoints.contains(&0x1234));
    }

    #[test]
    fn unknown_register_index_is_rejected() {
        let mcu = mcu();
        match dispatch(&mcu, b"p9") {
            Reply::Immediate(r) => assert_eq!(r, b"E02"),
            _ => panic!(),
        }
    }

    #[test]
    fn query_supported_reports_packet_size() {
        let mcu = mcu();
        match dispatch(&mcu, b"qSupported") {
            Reply::Immediate(r) => assert!(String::from_utf8(r).unwrap().starts_with("PacketSize=")),
            _ => panic!(),
        }
    }

    #[test]
    fn monitor_reset_round_trips_through_hex() {
        let mcu = mcu();
        mcu.lock().unwrap().regs.pc = 0xBEEF;
        // "reset" in hex.
        let hex = "reset".bytes().map(|b| format!("{b:02x}")).collect::<String>();
        match dispatch(&mcu, format!("qRcmd,{hex}").as_bytes()) {
            Reply::Immediate(r) => assert!(!r.is_empty()),
            _ => panic!(),
        }
    }

    #[test]
    fn continue_and_step_request_await_stop() {
        let mcu = mcu();
        assert!(matches!(dispatch(&mcu, b"c"), Reply::AwaitStop));
        assert_eq!(mcu.lock().unwrap().status, Status::Running);
        assert!(matches!(dispatch(&mcu, b"s"), Reply::AwaitStop));
        assert_eq!(mcu.lock().unwrap().status, Status::Stepping);
    }
}
