use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Operand encoding forms of the 6502.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
)]
pub enum AddressingMode {
    Implied,
    Immediate,
    AbsoluteX,
    AbsoluteY,
    Absolute,
    Accumulator,
    ZeroPageX,
    ZeroPageY,
    ZeroPage,
    IndirectIndexedY,
    Indirect,
    IndexedIndirectX,
    Relative,
}

impl AddressingMode {
    /// Total instruction length in bytes, opcode included.
    pub fn length(self) -> u8 {
        use AddressingMode::*;
        match self {
            Implied | Accumulator => 1,
            Immediate | ZeroPage | ZeroPageX | ZeroPageY => 2,
            IndexedIndirectX | IndirectIndexedY | Relative => 2,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 3,
        }
    }

    /// Number of operand bytes following the opcode.
    pub fn operand_bytes(self) -> u8 {
        self.length() - 1
    }

    /// Operand syntax as written in source, `xx`/`xxxx` standing for hex digits.
    pub fn syntax(self) -> &'static str {
        use AddressingMode::*;
        match self {
            Implied => "",
            Immediate => "#$xx",
            AbsoluteX => "$xxxx,X",
            AbsoluteY => "$xxxx,Y",
            Absolute => "$xxxx",
            Accumulator => "A",
            ZeroPageX => "$xx,X",
            ZeroPageY => "$xx,Y",
            ZeroPage => "$xx",
            IndirectIndexedY => "($xx),Y",
            Indirect => "($xxxx)",
            IndexedIndirectX => "($xx,X)",
            Relative => "$xx",
        }
    }
}
