/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! # Intel 8080 interpreter core
//!
//! An instruction-level interpreter for the 8080: one call to
//! [`Proc8080::emulate`](proc_state/struct.Proc8080.html#method.emulate) fetches, decodes and
//! applies exactly one instruction against a 64 KiB memory image owned (or borrowed) by the
//! processor.
//!
//! Decoding goes through a 256-entry table built at compile time, see
//! [`opcode::instruction`](opcode/fn.instruction.html). The same table backs
//! [`read_opcode`](opcode/fn.read_opcode.html), which is enough to write a disassembler.
//!
//! ```
//! use i8080_core::proc_state::Proc8080;
//!
//! let mut memory = vec![0u8; 0x10000];
//! // MVI A,$05 ; ADI $05 ; HLT
//! memory[..5].copy_from_slice(&[0x3e, 0x05, 0xc6, 0x05, 0x76]);
//!
//! let mut proc8080 = Proc8080::new(memory, 0x0000);
//! while proc8080.is_running() && !proc8080.is_stopped() {
//!     proc8080.emulate().unwrap();
//! }
//!
//! assert_eq!(proc8080.registers().a, 0x0a);
//! assert!(proc8080.flags().p);
//! ```
//!
//! Listing a program:
//!
//! ```
//! use i8080_core::opcode::OpCodes;
//!
//! let program: &[u8] = &[0x31, 0x00, 0x24, 0xcd, 0x34, 0x12];
//! let listing: Vec<String> = OpCodes::new(program)
//!     .map(|op| op.unwrap().to_string())
//!     .collect();
//!
//! assert_eq!(listing, vec!["LXI SP,$2400", "CALL $1234"]);
//! ```

pub mod opcode;
pub mod proc_state;

pub use crate::proc_state::{DataBus, Proc8080, UnimplementedInstruction};
