/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

mod opcodes;
mod table;

pub use self::opcodes::{AluOp, Condition, Immediate, Instruction, OpCode, Operand, Reg16, Register};
pub use self::table::{instruction, OPCODE_TABLE};

use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("unknown opcode 0x{0:02x}")]
    UnknownOpcode(u8),
}

/// Reads a slice of bytes and returns an opcode with its data.
///
/// The parsing fails if the first byte is not a documented 8080 opcode or if the slice is
/// too short for the instruction's data bytes.
pub fn read_opcode(bytes: &[u8]) -> Result<OpCode, DecodeError> {
    let opcode = *bytes.first().ok_or(DecodeError::UnexpectedEndOfInput)?;
    let instruction = instruction(opcode).ok_or(DecodeError::UnknownOpcode(opcode))?;
    let immediate = match instruction.size() {
        3 => Immediate::Word(expect_data_u16(bytes)?),
        2 => Immediate::Byte(expect_data_byte(bytes)?),
        _ => Immediate::Implied,
    };
    Ok(OpCode { instruction, immediate })
}

fn expect_data_u16(bytes: &[u8]) -> Result<u16, DecodeError> {
    match (bytes.get(1), bytes.get(2)) {
        (Some(&low), Some(&high)) => Ok(u16::from_le_bytes([low, high])),
        _ => Err(DecodeError::UnexpectedEndOfInput),
    }
}

fn expect_data_byte(bytes: &[u8]) -> Result<u8, DecodeError> {
    bytes.get(1).copied().ok_or(DecodeError::UnexpectedEndOfInput)
}

/// Iterator decoding a stream of instructions, used to build disassemblers.
///
/// An unknown opcode yields an error and the iterator resumes on the next byte. An
/// instruction cut short by the end of the stream yields `UnexpectedEndOfInput` and ends
/// the iteration, as does a read error.
pub struct OpCodes<U: BufRead> {
    reader: U,
    failed: bool,
}

impl<U: BufRead> OpCodes<U> {
    pub fn new(reader: U) -> OpCodes<U> {
        OpCodes { reader, failed: false }
    }

    /// Copies up to `out.len()` bytes from the reader, refilling its buffer as often as
    /// needed. Returns how many bytes were copied.
    fn take(&mut self, out: &mut [u8]) -> usize {
        let mut filled = 0;
        while filled < out.len() {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => {
                    self.failed = true;
                    break;
                }
            };
            if available.is_empty() {
                break;
            }
            let count = available.len().min(out.len() - filled);
            out[filled..(filled + count)].copy_from_slice(&available[..count]);
            self.reader.consume(count);
            filled += count;
        }
        filled
    }
}

impl<U: BufRead> Iterator for OpCodes<U> {
    type Item = Result<OpCode, DecodeError>;

    fn next(&mut self) -> Option<Result<OpCode, DecodeError>> {
        if self.failed {
            return None;
        }

        let mut bytes = [0u8; 3];
        if self.take(&mut bytes[..1]) == 0 {
            return if self.failed { Some(Err(DecodeError::UnexpectedEndOfInput)) } else { None };
        }

        let size = match instruction(bytes[0]) {
            Some(instruction) => instruction.size() as usize,
            None => return Some(Err(DecodeError::UnknownOpcode(bytes[0]))),
        };
        let read = 1 + self.take(&mut bytes[1..size]);
        Some(read_opcode(&bytes[..read]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::Instruction::*;
    use super::Register::*;
    use std::io::{BufReader, Cursor};

    #[test]
    fn read_opcodes() {
        let bytes = [0x13, 0xf3, 0x04, 0x87];
        assert_eq!(read_opcode(&bytes[0..]), Ok(OpCode::implied(Inx(Reg16::D))));
        assert_eq!(read_opcode(&bytes[1..]), Ok(OpCode::implied(Di)));
        assert_eq!(read_opcode(&bytes[2..]), Ok(OpCode::implied(Inr(Operand::Reg(B)))));
        assert_eq!(read_opcode(&bytes[3..]), Ok(OpCode::implied(Alu(AluOp::Add, Operand::Reg(A)))));
    }

    #[test]
    fn read_complex_opcodes() {
        assert_eq!(read_opcode(&[0xd6, 0xf3]), Ok(OpCode::with_byte(AluImmediate(AluOp::Sub), 0xf3)));
        assert_eq!(read_opcode(&[0xd4, 0x87, 0x97]), Ok(OpCode::with_word(Ccond(Condition::NoCarry), 0x9787)));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(read_opcode(&[]), Err(DecodeError::UnexpectedEndOfInput));
        assert_eq!(read_opcode(&[0xc3, 0x00]), Err(DecodeError::UnexpectedEndOfInput));
        assert_eq!(read_opcode(&[0x3e]), Err(DecodeError::UnexpectedEndOfInput));
    }

    #[test]
    fn unknown_opcode() {
        assert_eq!(read_opcode(&[0xdd, 0x00, 0x00]), Err(DecodeError::UnknownOpcode(0xdd)));
    }

    #[test]
    fn instructions_spanning_buffer_refills() {
        let program: &[u8] = &[0x00, 0x00, 0x00, 0xc3, 0x34, 0x12, 0x3e, 0x0a, 0x76];
        let listing: Vec<String> = OpCodes::new(BufReader::with_capacity(4, program))
            .map(|op| op.unwrap().to_string())
            .collect();

        assert_eq!(listing, vec!["NOP", "NOP", "NOP", "JMP $1234", "MVI A,$0a", "HLT"]);
    }

    #[test]
    fn large_image_keeps_alignment() {
        let mut program = vec![0x00; 8191];
        program.extend_from_slice(&[0xc3, 0x34, 0x12]);
        let listing: Vec<String> = OpCodes::new(BufReader::new(Cursor::new(program)))
            .skip(8191)
            .map(|op| op.unwrap().to_string())
            .collect();

        assert_eq!(listing, vec!["JMP $1234"]);
    }

    #[test]
    fn truncated_last_instruction_ends_the_listing() {
        let program: &[u8] = &[0x3c, 0xc3, 0x34];
        let listing: Vec<Result<OpCode, DecodeError>> =
            OpCodes::new(BufReader::with_capacity(2, program)).collect();

        assert_eq!(listing, vec![
            Ok(OpCode::implied(Inr(Operand::Reg(A)))),
            Err(DecodeError::UnexpectedEndOfInput),
        ]);
    }

    #[test]
    fn iterate_over_program() {
        let program: &[u8] = &[0x31, 0x00, 0x24, 0x3e, 0x0a, 0x08, 0xcd, 0x34, 0x12, 0x76];
        let listing: Vec<String> = OpCodes::new(program)
            .map(|op| match op {
                Ok(op) => op.to_string(),
                Err(e) => e.to_string(),
            })
            .collect();

        assert_eq!(listing, vec![
            "LXI SP,$2400",
            "MVI A,$0a",
            "unknown opcode 0x08",
            "CALL $1234",
            "HLT",
        ]);
    }
}
