/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::error::Error;
use std::fs::File;
use std::io;

use clap::Parser;
use i8080_core::opcode::OpCodes;

/// Lists the instructions of an 8080 binary image
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Binary image to disassemble
    file: String,

    /// Address of the first byte of the image (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0", value_parser = parse_address)]
    origin: u16,
}

fn parse_address(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{}': {}", s, e))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let input = File::open(&args.file)?;
    let op_codes = OpCodes::new(io::BufReader::new(input));
    let mut address = args.origin;
    for op_code_result in op_codes {
        match op_code_result {
            Ok(op_code) => {
                println!("0x{:04x} - {}", address, op_code);
                address = address.wrapping_add(op_code.size());
            }
            Err(e) => {
                println!("0x{:04x} - ??? ({})", address, e);
                address = address.wrapping_add(1);
            }
        }
    }
    Ok(())
}
