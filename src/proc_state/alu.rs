/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Arithmetic and logic operations.
//!
//! Every function takes the operands by value, updates `flags` and returns the result the
//! caller stores back (the accumulator, or the operand for increment/decrement).

use super::Flags;
use crate::opcode::AluOp;

/// Applies one of the eight accumulator operations. `CMP` returns `a` unchanged.
pub fn apply(op: AluOp, flags: &mut Flags, a: u8, value: u8) -> u8 {
    match op {
        AluOp::Add => add(flags, a, value, false),
        AluOp::Adc => {
            let carry = flags.cy;
            add(flags, a, value, carry)
        }
        AluOp::Sub => sub(flags, a, value, false),
        AluOp::Sbb => {
            let borrow = flags.cy;
            sub(flags, a, value, borrow)
        }
        AluOp::Ana => and(flags, a, value),
        AluOp::Xra => xor(flags, a, value),
        AluOp::Ora => or(flags, a, value),
        AluOp::Cmp => {
            compare(flags, a, value);
            a
        }
    }
}

pub fn add(flags: &mut Flags, a: u8, value: u8, carry: bool) -> u8 {
    let result = a as u16 + value as u16 + carry as u16;
    flags.set_zsp(result);
    flags.cy = result > 0xff;
    flags.ac = (a & 0x0f) + (value & 0x0f) + carry as u8 > 0x0f;
    result as u8
}

/// Subtraction. The incoming borrow only reaches the result: carry and auxiliary carry
/// compare `a` with the operand itself, not with `value + borrow`.
pub fn sub(flags: &mut Flags, a: u8, value: u8, borrow: bool) -> u8 {
    let result = (a as u16).wrapping_sub(value as u16).wrapping_sub(borrow as u16);
    flags.set_zsp(result);
    flags.cy = a < value;
    flags.ac = (a & 0x0f) < (value & 0x0f);
    result as u8
}

pub fn compare(flags: &mut Flags, a: u8, value: u8) {
    sub(flags, a, value, false);
}

pub fn and(flags: &mut Flags, a: u8, value: u8) -> u8 {
    logical(flags, a & value)
}

pub fn xor(flags: &mut Flags, a: u8, value: u8) -> u8 {
    logical(flags, a ^ value)
}

pub fn or(flags: &mut Flags, a: u8, value: u8) -> u8 {
    logical(flags, a | value)
}

fn logical(flags: &mut Flags, result: u8) -> u8 {
    flags.set_zsp(result as u16);
    flags.cy = false;
    flags.ac = false;
    result
}

/// `INR`: carry is not affected.
pub fn increment(flags: &mut Flags, value: u8) -> u8 {
    let result = value as u16 + 1;
    flags.set_zsp(result);
    flags.ac = (value & 0x0f) == 0x0f;
    result as u8
}

/// `DCR`: carry is not affected.
pub fn decrement(flags: &mut Flags, value: u8) -> u8 {
    let result = (value as u16).wrapping_sub(1);
    flags.set_zsp(result);
    flags.ac = (value & 0x0f) == 0x00;
    result as u8
}

/// `DAD`: only carry is affected.
pub fn add_pair(flags: &mut Flags, hl: u16, value: u16) -> u16 {
    let result = hl as u32 + value as u32;
    flags.cy = result > 0xffff;
    result as u16
}

pub fn decimal_adjust(flags: &mut Flags, a: u8) -> u8 {
    let low_correction: u16 = if flags.ac || a & 0x0f > 9 { 0x06 } else { 0x00 };
    let adjusted = a as u16 + low_correction;
    let high_correction: u16 = if flags.cy || adjusted >> 4 > 9 { 0x60 } else { 0x00 };
    let result = adjusted + high_correction;

    flags.set_zsp(result);
    flags.ac = (a & 0x0f) as u16 + low_correction > 0x0f;
    flags.cy = result > 0xff;
    result as u8
}

pub fn rotate_left(flags: &mut Flags, a: u8) -> u8 {
    flags.cy = (a & 0x80) != 0;
    a.rotate_left(1)
}

pub fn rotate_right(flags: &mut Flags, a: u8) -> u8 {
    flags.cy = (a & 0x01) != 0;
    a.rotate_right(1)
}

pub fn rotate_left_through_carry(flags: &mut Flags, a: u8) -> u8 {
    let carry = flags.cy as u8;
    flags.cy = (a & 0x80) != 0;
    (a << 1) | carry
}

pub fn rotate_right_through_carry(flags: &mut Flags, a: u8) -> u8 {
    let carry = (flags.cy as u8) << 7;
    flags.cy = (a & 0x01) != 0;
    (a >> 1) | carry
}
