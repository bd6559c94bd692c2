/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::opcode::Condition;

/// The five condition flags of the 8080.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Flags {
    pub z: bool,
    pub s: bool,
    pub p: bool,
    pub cy: bool,
    pub ac: bool,
}

impl Flags {
    /// Unpacks the flags byte of the processor status word.
    ///
    /// Layout: `S Z 0 AC 0 P 1 CY`, bit 7 first.
    pub fn from_processor_status_word(psw: u8) -> Flags {
        Flags {
            z: (psw & (1 << 6)) != 0,
            s: (psw & (1 << 7)) != 0,
            p: (psw & (1 << 2)) != 0,
            cy: (psw & 1) != 0,
            ac: (psw & (1 << 4)) != 0,
        }
    }

    pub fn to_processor_status_word(&self) -> u8 {
        (self.cy as u8)
            | 0b10
            | ((self.p as u8) << 2)
            | ((self.ac as u8) << 4)
            | ((self.z as u8) << 6)
            | ((self.s as u8) << 7)
    }

    /// Sets zero, sign and parity from the low byte of an intermediate result.
    pub fn set_zsp(&mut self, result: u16) {
        let low = result as u8;
        self.z = low == 0;
        self.s = (low & 0x80) != 0;
        self.p = Flags::parity(low);
    }

    /// Even parity: true when `value` has an even number of set bits.
    pub fn parity(value: u8) -> bool {
        value.count_ones() % 2 == 0
    }

    /// Evaluates a conditional jump/call/return predicate.
    pub fn satisfies(&self, condition: Condition) -> bool {
        match condition {
            Condition::NotZero => !self.z,
            Condition::Zero => self.z,
            Condition::NoCarry => !self.cy,
            Condition::Carry => self.cy,
            Condition::ParityOdd => !self.p,
            Condition::ParityEven => self.p,
            Condition::Plus => !self.s,
            Condition::Minus => self.s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Flags;
    use crate::opcode::Condition;

    #[test]
    fn parity() {
        assert!(Flags::parity(0x00));
        assert!(!Flags::parity(0x01));
        assert!(Flags::parity(0x03));
        assert!(!Flags::parity(0x07));
        assert!(Flags::parity(0xff));
    }

    #[test]
    fn zsp_non_zero_sign_parity() {
        let mut flags: Flags = Default::default();

        flags.set_zsp(0x96);
        assert_eq!(flags.z, false);
        assert_eq!(flags.s, true);
        assert_eq!(flags.p, true);
    }

    #[test]
    fn zsp_zero() {
        let mut flags: Flags = Default::default();

        flags.set_zsp(0);
        assert_eq!(flags.z, true);
        assert_eq!(flags.s, false);
        assert_eq!(flags.p, true);
    }

    #[test]
    fn zsp_uses_low_byte_only() {
        let mut flags = Flags { cy: true, ac: true, ..Default::default() };

        flags.set_zsp(0x0100);
        assert_eq!(flags.z, true);
        assert_eq!(flags.s, false);
        assert_eq!(flags.p, true);
        assert_eq!(flags.cy, true, "carry is left alone");
        assert_eq!(flags.ac, true, "auxiliary carry is left alone");
    }

    #[test]
    fn processor_status_word_layout() {
        let flags = Flags { cy: true, s: true, ac: true, ..Default::default() };
        assert_eq!(flags.to_processor_status_word(), 0b1001_0011);
        assert_eq!(Flags::default().to_processor_status_word(), 0b0000_0010);
        assert_eq!(Flags::from_processor_status_word(0b1001_0011), flags);
    }

    #[test]
    fn conditions() {
        let flags = Flags { z: true, p: true, ..Default::default() };
        assert!(flags.satisfies(Condition::Zero));
        assert!(!flags.satisfies(Condition::NotZero));
        assert!(flags.satisfies(Condition::NoCarry));
        assert!(!flags.satisfies(Condition::Carry));
        assert!(flags.satisfies(Condition::ParityEven));
        assert!(!flags.satisfies(Condition::ParityOdd));
        assert!(flags.satisfies(Condition::Plus));
        assert!(!flags.satisfies(Condition::Minus));
    }
}
