/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

pub mod alu;
mod control;
mod flags;
mod registers;

use std::fmt;

use log::{debug, error, trace};
use thiserror::Error;

use crate::opcode::{self, Immediate, OpCode, Operand, Reg16};
use crate::opcode::Instruction::*;
pub use self::flags::Flags;
pub use self::registers::Registers;

/// Interface used by `Proc8080` for `IN` and `OUT` instructions.
///
/// The 8080 communicates with external devices via the instructions `IN` (the CPU reads
/// from the data bus on a given port) and `OUT` (the CPU writes to a given port). What sits
/// behind a port depends on the hardware being emulated, so the processor only forwards
/// the accesses to this trait.
pub trait DataBus {

    /// Called by `Proc8080` when it applies an `IN` instruction
    fn read_port(&self, port: u8) -> u8;

    /// Called by `Proc8080` when it applies an `OUT` instruction
    fn write_port(&mut self, port: u8, value: u8);

}

/// A data bus with nothing connected: reads return 0 and writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBus;

impl DataBus for NullBus {
    fn read_port(&self, _port: u8) -> u8 {
        0
    }

    fn write_port(&mut self, _port: u8, _value: u8) {}
}

/// Byte-addressable storage the processor executes from.
///
/// Implemented for anything that derefs to a byte slice, so the caller can hand over a
/// `&mut [u8]` it keeps owning as well as a `Vec<u8>` or a `Box<[u8]>`. Address 0 is the
/// first byte of the slice. A slice shorter than 64 KiB reads as `0x00` past its end and
/// ignores writes there.
pub trait Memory: AsRef<[u8]> + AsMut<[u8]> {}

impl<T: AsRef<[u8]> + AsMut<[u8]> + ?Sized> Memory for T {}

/// Raised when the fetched byte is not a documented 8080 opcode. The processor is halted
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unimplemented instruction 0x{opcode:02x} at 0x{address:04x}")]
pub struct UnimplementedInstruction {
    pub opcode: u8,
    pub address: u16,
}

/// Structure containing the processor state (flags, registers and memory) and logic.
pub struct Proc8080<M: Memory, Bus: DataBus = NullBus> {
    flags: Flags,
    registers: Registers,
    memory: M,
    interrupt_enabled: bool,
    stopped: bool,
    halt_reason: Option<UnimplementedInstruction>,
    data_bus: Bus,
}

impl<M: Memory> Proc8080<M, NullBus> {

    /// Builds a new `Proc8080` over `memory`, starting execution at `pc`.
    ///
    /// The memory is usually the whole 64 KiB address space with the program image already
    /// loaded; it is neither copied nor validated. `IN` reads 0 and `OUT` is ignored, use
    /// [`with_bus`](#method.with_bus) to connect devices.
    pub fn new(memory: M, pc: u16) -> Proc8080<M, NullBus> {
        Proc8080::with_bus(memory, pc, NullBus)
    }
}

impl<M: Memory, Bus: DataBus> Proc8080<M, Bus> {

    /// Builds a new `Proc8080` whose `IN` and `OUT` instructions go through `data_bus`.
    pub fn with_bus(memory: M, pc: u16, data_bus: Bus) -> Proc8080<M, Bus> {
        Proc8080 {
            flags: Default::default(),
            registers: Registers::starting_at(pc),
            memory,
            interrupt_enabled: false,
            stopped: false,
            halt_reason: None,
            data_bus,
        }
    }

    /// Borrows the processor flags immutably.
    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    /// Borrows the processor registers immutably.
    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    /// Address of the next instruction to fetch.
    pub fn pc(&self) -> u16 {
        self.registers.pc
    }

    /// False once an unimplemented instruction was fetched. The caller should stop stepping.
    pub fn is_running(&self) -> bool {
        self.halt_reason.is_none()
    }

    /// True after a `HLT` instruction. Only an interrupt would restart the processor, so
    /// further calls to `emulate` do nothing.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The instruction which halted the processor, if any.
    pub fn halt_reason(&self) -> Option<&UnimplementedInstruction> {
        self.halt_reason.as_ref()
    }

    /// State of the interrupt enable latch, driven by `EI` and `DI`.
    pub fn interrupt_enabled(&self) -> bool {
        self.interrupt_enabled
    }

    /// Borrows the memory immutably.
    pub fn memory(&self) -> &[u8] {
        self.memory.as_ref()
    }

    /// Borrows the memory mutably, e.g. to load an overlay between two steps.
    pub fn memory_mut(&mut self) -> &mut [u8] {
        self.memory.as_mut()
    }

    /// Borrows the data bus immutably, e.g. to inspect what a device received.
    pub fn data_bus(&self) -> &Bus {
        &self.data_bus
    }

    /// Gives back the memory and the data bus.
    pub fn into_parts(self) -> (M, Bus) {
        (self.memory, self.data_bus)
    }

    /// Reads the next opcode in memory and changes state accordingly.
    ///
    /// This method runs one step of the processor simulation: it fetches the instruction
    /// at the program counter, moves the program counter past it and applies it. Branches
    /// overwrite the program counter with their target.
    ///
    /// Fetching an undocumented opcode moves the program counter by one, halts the
    /// processor and returns the error. Once halted or stopped, the call does nothing.
    pub fn emulate(&mut self) -> Result<(), UnimplementedInstruction> {
        if !self.is_running() || self.stopped {
            return Ok(());
        }

        let address = self.registers.pc;
        let opcode = self.read_byte(address);
        let instruction = match opcode::instruction(opcode) {
            Some(instruction) => instruction,
            None => {
                let unimplemented = UnimplementedInstruction { opcode, address };
                error!("{}", unimplemented);
                self.registers.pc = address.wrapping_add(1);
                self.halt_reason = Some(unimplemented);
                return Err(unimplemented);
            }
        };

        let immediate = match instruction.size() {
            3 => Immediate::Word(self.read_word(address.wrapping_add(1))),
            2 => Immediate::Byte(self.read_byte(address.wrapping_add(1))),
            _ => Immediate::Implied,
        };
        let op = OpCode { instruction, immediate };
        trace!("{:04x} - {}", address, op);

        self.registers.pc = address.wrapping_add(op.size());
        self.apply_op(op);
        Ok(())
    }

    fn apply_op(&mut self, op: OpCode) {
        let byte = op.immediate.byte();
        let word = op.immediate.word();
        match op.instruction {
            Nop => (),
            Hlt => {
                debug!("HLT at 0x{:04x}", self.registers.pc.wrapping_sub(1));
                self.stopped = true;
            }

            // Data transfer
            Mov(dst, src) => {
                let value = self.read_operand(src);
                self.write_operand(dst, value);
            }
            Mvi(dst) => self.write_operand(dst, byte),
            Lxi(reg) => self.registers.write_pair(reg, word),
            Lda => self.registers.a = self.read_byte(word),
            Sta => self.write_byte(word, self.registers.a),
            Lhld => {
                let value = self.read_word(word);
                self.registers.write_pair(Reg16::H, value);
            }
            Shld => self.write_word(word, self.registers.hl()),
            Ldax(reg) => self.registers.a = self.read_byte(self.registers.read_pair(reg)),
            Stax(reg) => self.write_byte(self.registers.read_pair(reg), self.registers.a),
            Xchg => self.exchange(),

            // Arithmetic and logic
            Alu(alu_op, src) => {
                let value = self.read_operand(src);
                self.registers.a = alu::apply(alu_op, &mut self.flags, self.registers.a, value);
            }
            AluImmediate(alu_op) => {
                self.registers.a = alu::apply(alu_op, &mut self.flags, self.registers.a, byte);
            }
            Inr(dst) => {
                let value = self.read_operand(dst);
                let result = alu::increment(&mut self.flags, value);
                self.write_operand(dst, result);
            }
            Dcr(dst) => {
                let value = self.read_operand(dst);
                let result = alu::decrement(&mut self.flags, value);
                self.write_operand(dst, result);
            }
            Inx(reg) => {
                let value = self.registers.read_pair(reg).wrapping_add(1);
                self.registers.write_pair(reg, value);
            }
            Dcx(reg) => {
                let value = self.registers.read_pair(reg).wrapping_sub(1);
                self.registers.write_pair(reg, value);
            }
            Dad(reg) => {
                let value = self.registers.read_pair(reg);
                let result = alu::add_pair(&mut self.flags, self.registers.hl(), value);
                self.registers.write_pair(Reg16::H, result);
            }
            Daa => self.registers.a = alu::decimal_adjust(&mut self.flags, self.registers.a),
            Rlc => self.registers.a = alu::rotate_left(&mut self.flags, self.registers.a),
            Rrc => self.registers.a = alu::rotate_right(&mut self.flags, self.registers.a),
            Ral => self.registers.a = alu::rotate_left_through_carry(&mut self.flags, self.registers.a),
            Rar => self.registers.a = alu::rotate_right_through_carry(&mut self.flags, self.registers.a),
            Cma => self.registers.a = !self.registers.a,
            Stc => self.flags.cy = true,
            Cmc => self.flags.cy = !self.flags.cy,

            // Branch
            Jmp => self.jump(word),
            Jcond(condition) => if self.flags.satisfies(condition) { self.jump(word) },
            Call => self.call(word),
            Ccond(condition) => if self.flags.satisfies(condition) { self.call(word) },
            Ret => self.ret(),
            Rcond(condition) => if self.flags.satisfies(condition) { self.ret() },
            Rst(n) => self.restart(n),
            Pchl => self.jump(self.registers.hl()),

            // Stack, I/O, and machine control
            Push(reg) => self.push(self.registers.read_pair(reg)),
            PushPsw => self.push_processor_status_word(),
            Pop(reg) => {
                let value = self.pop();
                self.registers.write_pair(reg, value);
            }
            PopPsw => self.pop_processor_status_word(),
            Xthl => self.exchange_stack_top(),
            Sphl => self.registers.sp = self.registers.hl(),
            In => self.registers.a = self.data_bus.read_port(byte),
            Out => self.data_bus.write_port(byte, self.registers.a),
            Ei => self.interrupt_enabled = true,
            Di => self.interrupt_enabled = false,
        }
    }

    fn read_operand(&self, operand: Operand) -> u8 {
        match operand {
            Operand::Reg(reg) => self.registers.read(reg),
            Operand::M => self.read_byte(self.registers.hl()),
        }
    }

    fn write_operand(&mut self, operand: Operand, value: u8) {
        match operand {
            Operand::Reg(reg) => self.registers.write(reg, value),
            Operand::M => self.write_byte(self.registers.hl(), value),
        }
    }

    fn read_byte(&self, addr: u16) -> u8 {
        self.memory.as_ref().get(addr as usize).copied().unwrap_or(0)
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        if let Some(cell) = self.memory.as_mut().get_mut(addr as usize) {
            *cell = value;
        }
    }

    /// Little-endian word, as stored in the instruction stream and on the stack.
    fn read_word(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.read_byte(addr), self.read_byte(addr.wrapping_add(1))])
    }

    fn write_word(&mut self, addr: u16, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.write_byte(addr, low);
        self.write_byte(addr.wrapping_add(1), high);
    }
}

impl<M: Memory, Bus: DataBus> fmt::Debug for Proc8080<M, Bus> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{
    flags: {:x?},
    registers: {:x?},
    interrupt_enabled: {:?},
    stopped: {:?},
    halt_reason: {:?},
}}", self.flags, self.registers, self.interrupt_enabled, self.stopped, self.halt_reason)
    }
}
