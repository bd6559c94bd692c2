/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use self::Instruction::*;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Register {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Register pairs as named by the 8080 mnemonics (`B` is `BC`, `D` is `DE`, `H` is `HL`).
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Reg16 {
    B,
    D,
    H,
    SP,
}

impl Display for Reg16 {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An 8-bit operand: either a register or `M`, the memory byte addressed by `HL`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Operand {
    Reg(Register),
    M,
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Operand::Reg(reg) => write!(f, "{}", reg),
            Operand::M => write!(f, "M"),
        }
    }
}

/// Flag predicates shared by conditional jumps, calls and returns.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
    ParityOdd,
    ParityEven,
    Plus,
    Minus,
}

impl Condition {
    fn suffix(self) -> &'static str {
        match self {
            Condition::NotZero => "NZ",
            Condition::Zero => "Z",
            Condition::NoCarry => "NC",
            Condition::Carry => "C",
            Condition::ParityOdd => "PO",
            Condition::ParityEven => "PE",
            Condition::Plus => "P",
            Condition::Minus => "M",
        }
    }
}

/// The eight accumulator operations of the `10 ooo sss` and `11 ooo 110` opcode groups.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbb,
    Ana,
    Xra,
    Ora,
    Cmp,
}

impl AluOp {
    fn register_mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADD",
            AluOp::Adc => "ADC",
            AluOp::Sub => "SUB",
            AluOp::Sbb => "SBB",
            AluOp::Ana => "ANA",
            AluOp::Xra => "XRA",
            AluOp::Ora => "ORA",
            AluOp::Cmp => "CMP",
        }
    }

    fn immediate_mnemonic(self) -> &'static str {
        match self {
            AluOp::Add => "ADI",
            AluOp::Adc => "ACI",
            AluOp::Sub => "SUI",
            AluOp::Sbb => "SBI",
            AluOp::Ana => "ANI",
            AluOp::Xra => "XRI",
            AluOp::Ora => "ORI",
            AluOp::Cmp => "CPI",
        }
    }
}

/// Descriptor of what an opcode byte does, without its immediate data.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Instruction {
    Nop,
    Hlt,

    // Data transfer
    Mov(Operand, Operand),
    Mvi(Operand),
    Lxi(Reg16),
    Lda,
    Sta,
    Lhld,
    Shld,
    Ldax(Reg16),
    Stax(Reg16),
    Xchg,

    // Arithmetic and logic
    Alu(AluOp, Operand),
    AluImmediate(AluOp),
    Inr(Operand),
    Dcr(Operand),
    Inx(Reg16),
    Dcx(Reg16),
    Dad(Reg16),
    Daa,
    Rlc,
    Rrc,
    Ral,
    Rar,
    Cma,
    Stc,
    Cmc,

    // Branch
    Jmp,
    Jcond(Condition),
    Call,
    Ccond(Condition),
    Ret,
    Rcond(Condition),
    Rst(u8),
    Pchl,

    // Stack, I/O, and machine control
    Push(Reg16),
    PushPsw,
    Pop(Reg16),
    PopPsw,
    Xthl,
    Sphl,
    In,
    Out,
    Ei,
    Di,
}

impl Instruction {
    /// Total length in bytes, opcode included.
    pub fn size(&self) -> u16 {
        match *self {
            Lxi(_) | Lda | Sta | Lhld | Shld | Jmp | Jcond(_) | Call | Ccond(_) => 3,
            Mvi(_) | AluImmediate(_) | In | Out => 2,
            _ => 1,
        }
    }

    /// Whether executing the instruction may load a new program counter.
    ///
    /// Every other instruction leaves the program counter just past itself, which lets a
    /// driver tell straight-line steps from control transfers without running them.
    pub fn is_branch(&self) -> bool {
        matches!(
            *self,
            Jmp | Jcond(_) | Call | Ccond(_) | Ret | Rcond(_) | Rst(_) | Pchl
        )
    }
}

/// Immediate data following an opcode in the instruction stream.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Immediate {
    Implied,
    Byte(u8),
    Word(u16),
}

impl Immediate {
    pub fn byte(&self) -> u8 {
        match *self {
            Immediate::Byte(value) => value,
            Immediate::Word(value) => value as u8,
            Immediate::Implied => 0,
        }
    }

    pub fn word(&self) -> u16 {
        match *self {
            Immediate::Word(value) => value,
            Immediate::Byte(value) => value as u16,
            Immediate::Implied => 0,
        }
    }
}

/// A decoded instruction: its descriptor plus the data bytes read after the opcode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OpCode {
    pub instruction: Instruction,
    pub immediate: Immediate,
}

impl OpCode {
    pub fn implied(instruction: Instruction) -> OpCode {
        OpCode { instruction, immediate: Immediate::Implied }
    }

    pub fn with_byte(instruction: Instruction, value: u8) -> OpCode {
        OpCode { instruction, immediate: Immediate::Byte(value) }
    }

    pub fn with_word(instruction: Instruction, value: u16) -> OpCode {
        OpCode { instruction, immediate: Immediate::Word(value) }
    }

    pub fn size(&self) -> u16 {
        self.instruction.size()
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let byte = self.immediate.byte();
        let word = self.immediate.word();
        match self.instruction {
            Nop => write!(f, "NOP"),
            Hlt => write!(f, "HLT"),

            Mov(dst, src) => write!(f, "MOV {},{}", dst, src),
            Mvi(dst) => write!(f, "MVI {},${:02x}", dst, byte),
            Lxi(reg) => write!(f, "LXI {},${:04x}", reg, word),
            Lda => write!(f, "LDA ${:04x}", word),
            Sta => write!(f, "STA ${:04x}", word),
            Lhld => write!(f, "LHLD ${:04x}", word),
            Shld => write!(f, "SHLD ${:04x}", word),
            Ldax(reg) => write!(f, "LDAX {}", reg),
            Stax(reg) => write!(f, "STAX {}", reg),
            Xchg => write!(f, "XCHG"),

            Alu(op, src) => write!(f, "{} {}", op.register_mnemonic(), src),
            AluImmediate(op) => write!(f, "{} ${:02x}", op.immediate_mnemonic(), byte),
            Inr(dst) => write!(f, "INR {}", dst),
            Dcr(dst) => write!(f, "DCR {}", dst),
            Inx(reg) => write!(f, "INX {}", reg),
            Dcx(reg) => write!(f, "DCX {}", reg),
            Dad(reg) => write!(f, "DAD {}", reg),
            Daa => write!(f, "DAA"),
            Rlc => write!(f, "RLC"),
            Rrc => write!(f, "RRC"),
            Ral => write!(f, "RAL"),
            Rar => write!(f, "RAR"),
            Cma => write!(f, "CMA"),
            Stc => write!(f, "STC"),
            Cmc => write!(f, "CMC"),

            Jmp => write!(f, "JMP ${:04x}", word),
            Jcond(cond) => write!(f, "J{} ${:04x}", cond.suffix(), word),
            Call => write!(f, "CALL ${:04x}", word),
            Ccond(cond) => write!(f, "C{} ${:04x}", cond.suffix(), word),
            Ret => write!(f, "RET"),
            Rcond(cond) => write!(f, "R{}", cond.suffix()),
            Rst(n) => write!(f, "RST {}", n),
            Pchl => write!(f, "PCHL"),

            Push(reg) => write!(f, "PUSH {}", reg),
            PushPsw => write!(f, "PUSH PSW"),
            Pop(reg) => write!(f, "POP {}", reg),
            PopPsw => write!(f, "POP PSW"),
            Xthl => write!(f, "XTHL"),
            Sphl => write!(f, "SPHL"),
            In => write!(f, "IN ${:02x}", byte),
            Out => write!(f, "OUT ${:02x}", byte),
            Ei => write!(f, "EI"),
            Di => write!(f, "DI"),
        }
    }
}
