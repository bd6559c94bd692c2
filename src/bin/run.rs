/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::error::Error;
use std::fs;

use clap::Parser;
use i8080_core::opcode::read_opcode;
use i8080_core::proc_state::{Flags, Proc8080};

const MEMORY_SIZE: usize = 0x10000;

/// Runs an 8080 binary image until it leaves the loaded region, halts or stops
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Binary image to execute
    file: String,

    /// Address the image is loaded at (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0", value_parser = parse_address)]
    load_at: u16,

    /// First instruction to execute, defaults to the load address
    #[arg(long, value_parser = parse_address)]
    entry: Option<u16>,

    /// Stop after this many instructions
    #[arg(long)]
    max_steps: Option<u64>,

    /// Print every instruction before it executes
    #[arg(long)]
    trace: bool,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

fn flags_to_string(flags: &Flags) -> String {
    [(flags.s, 'S'), (flags.z, 'Z'), (flags.ac, 'A'), (flags.p, 'P'), (flags.cy, 'C')]
        .iter()
        .map(|&(set, name)| if set { name } else { '.' })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let image = fs::read(&args.file)?;
    let start = args.load_at as usize;
    if start + image.len() > MEMORY_SIZE {
        return Err(format!(
            "image of {} bytes does not fit at 0x{:04x}", image.len(), args.load_at
        ).into());
    }
    let end = start + image.len();

    let mut memory = vec![0u8; MEMORY_SIZE];
    memory[start..end].copy_from_slice(&image);

    let mut proc8080 = Proc8080::new(memory, args.entry.unwrap_or(args.load_at));
    let mut steps: u64 = 0;
    while proc8080.is_running() && !proc8080.is_stopped() {
        let pc = proc8080.pc() as usize;
        if pc < start || pc >= end || args.max_steps.map_or(false, |max| steps >= max) {
            break;
        }

        if args.trace {
            let mnemonic = read_opcode(&proc8080.memory()[pc..])
                .map(|op| op.to_string())
                .unwrap_or_else(|e| e.to_string());
            println!(
                "0x{:04x}  {:<16} A={:02x} {}",
                pc, mnemonic, proc8080.registers().a, flags_to_string(proc8080.flags())
            );
        }

        let result = proc8080.emulate();
        steps += 1;
        if result.is_err() {
            break;
        }
    }

    println!("{} instructions executed", steps);
    println!("{:?}", proc8080);
    match proc8080.halt_reason() {
        Some(reason) => Err((*reason).into()),
        None => Ok(()),
    }
}
