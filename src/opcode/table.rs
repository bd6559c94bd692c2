/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The opcode table: one descriptor per opcode byte, computed at compile time from the
//! bit fields of the 8080 encoding.
//!
//! Bytes without a documented instruction map to `None`. These are the undocumented
//! aliases `0x08`, `0x10`, `0x18`, `0x20`, `0x28`, `0x30`, `0x38`, `0xcb`, `0xd9`, `0xdd`,
//! `0xed` and `0xfd`.

use super::opcodes::{AluOp, Condition, Instruction, Operand, Reg16, Register};
use super::opcodes::Instruction::*;

pub static OPCODE_TABLE: [Option<Instruction>; 256] = build_table();

/// Looks up the descriptor of an opcode byte.
pub fn instruction(opcode: u8) -> Option<Instruction> {
    OPCODE_TABLE[opcode as usize]
}

const fn build_table() -> [Option<Instruction>; 256] {
    let mut table = [None; 256];
    let mut byte = 0;
    while byte < 256 {
        table[byte] = decode(byte as u8);
        byte += 1;
    }
    table
}

const fn decode(byte: u8) -> Option<Instruction> {
    // xx ddd sss, with rp = dd for the register pair forms
    let ddd = (byte >> 3) & 0b111;
    let sss = byte & 0b111;
    let rp = (byte >> 4) & 0b11;
    let odd_pair_form = byte & 0b1000 != 0;

    match byte >> 6 {
        0b00 => decode_misc(byte, ddd, sss, rp, odd_pair_form),
        0b01 => {
            if byte == 0x76 {
                Some(Hlt)
            } else {
                Some(Mov(operand(ddd), operand(sss)))
            }
        }
        0b10 => Some(Alu(alu_op(ddd), operand(sss))),
        _ => decode_control(byte, ddd, sss, rp, odd_pair_form),
    }
}

const fn decode_misc(byte: u8, ddd: u8, sss: u8, rp: u8, odd_pair_form: bool) -> Option<Instruction> {
    match sss {
        0 => if byte == 0x00 { Some(Nop) } else { None },
        1 => if odd_pair_form { Some(Dad(pair_or_sp(rp))) } else { Some(Lxi(pair_or_sp(rp))) },
        2 => match byte {
            0x02 => Some(Stax(Reg16::B)),
            0x0a => Some(Ldax(Reg16::B)),
            0x12 => Some(Stax(Reg16::D)),
            0x1a => Some(Ldax(Reg16::D)),
            0x22 => Some(Shld),
            0x2a => Some(Lhld),
            0x32 => Some(Sta),
            _ => Some(Lda),
        },
        3 => if odd_pair_form { Some(Dcx(pair_or_sp(rp))) } else { Some(Inx(pair_or_sp(rp))) },
        4 => Some(Inr(operand(ddd))),
        5 => Some(Dcr(operand(ddd))),
        6 => Some(Mvi(operand(ddd))),
        _ => match ddd {
            0 => Some(Rlc),
            1 => Some(Rrc),
            2 => Some(Ral),
            3 => Some(Rar),
            4 => Some(Daa),
            5 => Some(Cma),
            6 => Some(Stc),
            _ => Some(Cmc),
        },
    }
}

const fn decode_control(byte: u8, ddd: u8, sss: u8, rp: u8, odd_pair_form: bool) -> Option<Instruction> {
    match sss {
        0 => Some(Rcond(condition(ddd))),
        1 => {
            if !odd_pair_form {
                if rp == 3 { Some(PopPsw) } else { Some(Pop(pair_or_sp(rp))) }
            } else {
                match byte {
                    0xc9 => Some(Ret),
                    0xe9 => Some(Pchl),
                    0xf9 => Some(Sphl),
                    _ => None,
                }
            }
        }
        2 => Some(Jcond(condition(ddd))),
        3 => match byte {
            0xc3 => Some(Jmp),
            0xd3 => Some(Out),
            0xdb => Some(In),
            0xe3 => Some(Xthl),
            0xeb => Some(Xchg),
            0xf3 => Some(Di),
            0xfb => Some(Ei),
            _ => None,
        },
        4 => Some(Ccond(condition(ddd))),
        5 => {
            if !odd_pair_form {
                if rp == 3 { Some(PushPsw) } else { Some(Push(pair_or_sp(rp))) }
            } else if byte == 0xcd {
                Some(Call)
            } else {
                None
            }
        }
        6 => Some(AluImmediate(alu_op(ddd))),
        _ => Some(Rst(ddd)),
    }
}

const fn operand(code: u8) -> Operand {
    match code {
        0 => Operand::Reg(Register::B),
        1 => Operand::Reg(Register::C),
        2 => Operand::Reg(Register::D),
        3 => Operand::Reg(Register::E),
        4 => Operand::Reg(Register::H),
        5 => Operand::Reg(Register::L),
        6 => Operand::M,
        _ => Operand::Reg(Register::A),
    }
}

const fn pair_or_sp(code: u8) -> Reg16 {
    match code {
        0 => Reg16::B,
        1 => Reg16::D,
        2 => Reg16::H,
        _ => Reg16::SP,
    }
}

const fn alu_op(code: u8) -> AluOp {
    match code {
        0 => AluOp::Add,
        1 => AluOp::Adc,
        2 => AluOp::Sub,
        3 => AluOp::Sbb,
        4 => AluOp::Ana,
        5 => AluOp::Xra,
        6 => AluOp::Ora,
        _ => AluOp::Cmp,
    }
}

const fn condition(code: u8) -> Condition {
    match code {
        0 => Condition::NotZero,
        1 => Condition::Zero,
        2 => Condition::NoCarry,
        3 => Condition::Carry,
        4 => Condition::ParityOdd,
        5 => Condition::ParityEven,
        6 => Condition::Plus,
        _ => Condition::Minus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Register::*;

    #[test]
    fn documented_opcode_count() {
        let documented = OPCODE_TABLE.iter().filter(|entry| entry.is_some()).count();
        assert_eq!(documented, 244);
    }

    #[test]
    fn undocumented_aliases_are_not_classified() {
        for byte in [0x08, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0xcb, 0xd9, 0xdd, 0xed, 0xfd] {
            assert_eq!(instruction(byte), None, "0x{:02x} should be unclassified", byte);
        }
    }

    #[test]
    fn data_transfer_group() {
        assert_eq!(instruction(0x00), Some(Nop));
        assert_eq!(instruction(0x41), Some(Mov(Operand::Reg(B), Operand::Reg(C))));
        assert_eq!(instruction(0x46), Some(Mov(Operand::Reg(B), Operand::M)));
        assert_eq!(instruction(0x77), Some(Mov(Operand::M, Operand::Reg(A))));
        assert_eq!(instruction(0x76), Some(Hlt));
        assert_eq!(instruction(0x36), Some(Mvi(Operand::M)));
        assert_eq!(instruction(0x31), Some(Lxi(Reg16::SP)));
        assert_eq!(instruction(0x1a), Some(Ldax(Reg16::D)));
        assert_eq!(instruction(0x12), Some(Stax(Reg16::D)));
        assert_eq!(instruction(0x3a), Some(Lda));
        assert_eq!(instruction(0xeb), Some(Xchg));
    }

    #[test]
    fn arithmetic_group() {
        assert_eq!(instruction(0x86), Some(Alu(AluOp::Add, Operand::M)));
        assert_eq!(instruction(0x9f), Some(Alu(AluOp::Sbb, Operand::Reg(A))));
        assert_eq!(instruction(0xb8), Some(Alu(AluOp::Cmp, Operand::Reg(B))));
        assert_eq!(instruction(0xfe), Some(AluImmediate(AluOp::Cmp)));
        assert_eq!(instruction(0xde), Some(AluImmediate(AluOp::Sbb)));
        assert_eq!(instruction(0x34), Some(Inr(Operand::M)));
        assert_eq!(instruction(0x3d), Some(Dcr(Operand::Reg(A))));
        assert_eq!(instruction(0x39), Some(Dad(Reg16::SP)));
        assert_eq!(instruction(0x2b), Some(Dcx(Reg16::H)));
        assert_eq!(instruction(0x27), Some(Daa));
        assert_eq!(instruction(0x3f), Some(Cmc));
    }

    #[test]
    fn control_group() {
        assert_eq!(instruction(0xc3), Some(Jmp));
        assert_eq!(instruction(0xca), Some(Jcond(Condition::Zero)));
        assert_eq!(instruction(0xf4), Some(Ccond(Condition::Plus)));
        assert_eq!(instruction(0xe0), Some(Rcond(Condition::ParityOdd)));
        assert_eq!(instruction(0xcd), Some(Call));
        assert_eq!(instruction(0xc9), Some(Ret));
        assert_eq!(instruction(0xdf), Some(Rst(3)));
        assert_eq!(instruction(0xe9), Some(Pchl));
        assert_eq!(instruction(0xf5), Some(PushPsw));
        assert_eq!(instruction(0xc1), Some(Pop(Reg16::B)));
        assert_eq!(instruction(0xe3), Some(Xthl));
        assert_eq!(instruction(0xdb), Some(In));
        assert_eq!(instruction(0xfb), Some(Ei));
    }

    #[test]
    fn sizes_follow_operand_width() {
        assert_eq!(Nop.size(), 1);
        assert_eq!(Mvi(Operand::M).size(), 2);
        assert_eq!(AluImmediate(AluOp::Add).size(), 2);
        assert_eq!(Out.size(), 2);
        assert_eq!(Lxi(Reg16::B).size(), 3);
        assert_eq!(Ccond(Condition::Carry).size(), 3);
        assert_eq!(Rst(7).size(), 1);
    }
}
