//! Wires the CLI, image loader, execution engine, and GDB server together:
//! one [`Mcu`] behind `Arc<Mutex<_>>`, shared between an engine thread and
//! the GDB listener thread. No process-global state anywhere.

mod cli;
mod image;
mod regspec;

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use clap::Parser;
use hc11_core::cpu::{Mcu, Status, StopReason};
use hc11_core::gdb::GdbServer;

fn main() -> ExitCode {
    let args = cli::Args::parse();

    let mut mcu = Mcu::new();
    mcu.verbose = args.debug;

    if let Err(e) = load_images(&mut mcu, &args) {
        eprintln!("error: {e}");
        return ExitCode::from(1);
    }
    if args.writable && let Err(e) = mcu.bus.map_ram("writable", 0xE000, 0x2000) {
        eprintln!("error: {e}");
        return ExitCode::from(1);
    }

    mcu.reset(false);

    if let Some(spec) = &args.preset_regs {
        regspec::apply(&mut mcu.regs, &regspec::parse(spec));
    }
    for entry in &args.preset_mem {
        if let Err(e) = apply_preset_mem(&mut mcu, entry) {
            eprintln!("error: {e}");
            return ExitCode::from(1);
        }
    }

    if args.run {
        mcu.start_at_pc();
        mcu.status = Status::Running;
    }

    let gdb_server = if args.no_gdb {
        None
    } else {
        match GdbServer::bind(args.port) {
            Ok(server) => Some(server),
            Err(e) => {
                eprintln!("warning: GDB server disabled ({e})");
                None
            }
        }
    };

    let engine_shutdown = Arc::new(AtomicBool::new(false));
    let gdb_shutdown = gdb_server.as_ref().map(GdbServer::shutdown_handle);
    install_ctrlc_handler(Arc::clone(&engine_shutdown), gdb_shutdown.clone());

    let mcu = Arc::new(Mutex::new(mcu));

    let gdb_thread = gdb_server.map(|server| {
        let mcu = Arc::clone(&mcu);
        thread::spawn(move || server.run(mcu))
    });

    // Batch mode: no debugger is going to attach and drive `c`/`s`, so once
    // the target halts there's nothing left to do.
    let batch_mode = args.no_gdb;
    let engine_thread = {
        let mcu = Arc::clone(&mcu);
        let shutdown = Arc::clone(&engine_shutdown);
        thread::spawn(move || engine_loop(&mcu, &shutdown, batch_mode))
    };

    engine_thread.join().expect("engine thread panicked");
    engine_shutdown.store(true, Ordering::Relaxed);
    if let Some(flag) = &gdb_shutdown {
        flag.store(true, Ordering::Relaxed);
    }
    if let Some(t) = gdb_thread {
        let _ = t.join();
    }

    if let Some(spec) = &args.expect_regs {
        report_register_mismatches(&mcu.lock().unwrap().regs, spec);
    }

    ExitCode::SUCCESS
}

/// Drives the fetch/execute engine one instruction at a time, re-acquiring
/// the mutex between instructions so the GDB thread isn't starved — the
/// coarse-lock-per-step granularity the concurrency design calls for.
fn engine_loop(mcu: &Arc<Mutex<Mcu>>, shutdown: &Arc<AtomicBool>, batch_mode: bool) {
    loop {
        if shutdown.load(Ordering::Relaxed) {
            return;
        }
        let mut keep_running = false;
        {
            let mut m = mcu.lock().unwrap();
            match m.status {
                Status::Running => {
                    m.retire_one_instruction();
                    if !matches!(m.status, Status::Stopped(_)) {
                        m.status = Status::Running;
                        keep_running = true;
                    }
                }
                Status::Stepping => {
                    m.retire_one_instruction();
                    if !matches!(m.status, Status::Stopped(_)) {
                        m.status = Status::Stopped(StopReason::Normal);
                    }
                }
                _ => {}
            }
        }
        if batch_mode && !keep_running {
            return;
        }
        if !keep_running {
            thread::sleep(Duration::from_millis(2));
        }
    }
}

fn install_ctrlc_handler(engine_shutdown: Arc<AtomicBool>, gdb_shutdown: Option<Arc<AtomicBool>>) {
    let result = ctrlc::set_handler(move || {
        engine_shutdown.store(true, Ordering::Relaxed);
        if let Some(flag) = &gdb_shutdown {
            flag.store(true, Ordering::Relaxed);
        }
    });
    if let Err(e) = result {
        eprintln!("warning: failed to install Ctrl-C handler: {e}");
    }
}

fn load_images(mcu: &mut Mcu, args: &cli::Args) -> Result<(), image::ImageError> {
    for spec in &args.bin {
        let (addr_s, path) = spec.split_once(',').ok_or(image::ImageError::MalformedRecord {
            line: 0,
            reason: "expected addr,file",
        })?;
        let addr = parse_addr(addr_s).ok_or(image::ImageError::MalformedRecord {
            line: 0,
            reason: "bad address",
        })?;
        let data = image::load_binary(path)?;
        let len = data.len() as u16;
        mcu.bus.map_rom(&format!("bin@{addr:#06X}"), addr, len, data)?;
    }
    for path in &args.s19 {
        let text = std::fs::read_to_string(path)?;
        for chunk in image::parse_srecord(&text)? {
            let len = chunk.data.len() as u16;
            mcu.bus
                .map_rom(&format!("s19@{:#06X}", chunk.addr), chunk.addr, len, chunk.data)?;
        }
    }
    Ok(())
}

fn apply_preset_mem(mcu: &mut Mcu, entry: &str) -> Result<(), String> {
    let (addr_s, hex) = entry
        .split_once(',')
        .ok_or_else(|| format!("malformed --preset-mem '{entry}', expected addr,hex"))?;
    let addr = parse_addr(addr_s).ok_or_else(|| format!("bad address in --preset-mem '{entry}'"))?;
    let bytes = image::hex_to_bytes(hex).ok_or_else(|| format!("bad hex in --preset-mem '{entry}'"))?;
    for (i, b) in bytes.iter().enumerate() {
        mcu.bus.write8(addr.wrapping_add(i as u16), *b);
    }
    Ok(())
}

fn parse_addr(s: &str) -> Option<u16> {
    u16::from_str_radix(s.trim().trim_start_matches("0x").trim_start_matches("0X"), 16).ok()
}

fn report_register_mismatches(regs: &hc11_core::registers::Registers, spec: &str) {
    for assign in regspec::parse(spec) {
        match regspec::read(regs, assign.name) {
            Some(actual) if actual == assign.value => {}
            Some(actual) => eprintln!(
                "warning: register '{}' expected {:#06X}, got {:#06X}",
                assign.name, assign.value, actual
            ),
            None => eprintln!("warning: unknown register '{}' in expect list", assign.name),
        }
    }
}
