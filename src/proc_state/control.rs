/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Jumps, calls, returns and the stack.
//!
//! The stack grows downwards and holds little-endian words: a push writes the high byte at
//! `SP - 1` and the low byte at `SP - 2`, then moves `SP` down by two.

use super::{DataBus, Flags, Memory, Proc8080};
use crate::opcode::Reg16;

impl<M: Memory, Bus: DataBus> Proc8080<M, Bus> {

    pub(super) fn jump(&mut self, addr: u16) {
        self.registers.pc = addr;
    }

    /// Pushes the program counter, which already points past the call, then jumps.
    pub(super) fn call(&mut self, addr: u16) {
        let return_addr = self.registers.pc;
        self.push(return_addr);
        self.registers.pc = addr;
    }

    pub(super) fn ret(&mut self) {
        self.registers.pc = self.pop();
    }

    pub(super) fn restart(&mut self, n: u8) {
        self.call(u16::from(n & 0b111) * 8);
    }

    pub(super) fn push(&mut self, value: u16) {
        let sp = self.registers.sp.wrapping_sub(2);
        self.write_word(sp, value);
        self.registers.sp = sp;
    }

    pub(super) fn pop(&mut self) -> u16 {
        let sp = self.registers.sp;
        let value = self.read_word(sp);
        self.registers.sp = sp.wrapping_add(2);
        value
    }

    /// Pushes the accumulator as the high byte and the flags as the low byte.
    pub(super) fn push_processor_status_word(&mut self) {
        let psw = u16::from_be_bytes([self.registers.a, self.flags.to_processor_status_word()]);
        self.push(psw);
    }

    pub(super) fn pop_processor_status_word(&mut self) {
        let [a, flags] = self.pop().to_be_bytes();
        self.registers.a = a;
        self.flags = Flags::from_processor_status_word(flags);
    }

    /// `XCHG`: swaps `HL` and `DE`.
    pub(super) fn exchange(&mut self) {
        let de = self.registers.read_pair(Reg16::D);
        let hl = self.registers.read_pair(Reg16::H);

        self.registers.write_pair(Reg16::D, hl);
        self.registers.write_pair(Reg16::H, de);
    }

    /// `XTHL`: swaps `HL` with the word on top of the stack, `SP` is unchanged.
    pub(super) fn exchange_stack_top(&mut self) {
        let sp = self.registers.sp;
        let hl = self.registers.hl();
        let top = self.read_word(sp);
        self.write_word(sp, hl);
        self.registers.write_pair(Reg16::H, top);
    }
}
