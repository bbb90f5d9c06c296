use once_cell::sync::Lazy;

use crate::inst::InstructionSet;
use crate::mode::AddressingMode::{self, *};

/// The canonical 6510 table, built on first use.
pub static MOS6510: Lazy<InstructionSet> = Lazy::new(InstructionSet::mos6510);

const MNEMONICS: [(&str, &str); 56] = [
    ("ADC", "Add Memory to Accumulator with Carry"),
    ("AND", "AND Memory with Accumulator"),
    ("ASL", "Shift Left One Bit (Memory or Accumulator)"),
    ("BCC", "Branch on Carry Clear"),
    ("BCS", "Branch on Carry Set"),
    ("BEQ", "Branch on Result Zero"),
    ("BIT", "Test Bits in Memory with Accumulator"),
    ("BMI", "Branch on Result Minus"),
    ("BNE", "Branch on Result not Zero"),
    ("BPL", "Branch on Result Plus"),
    ("BRK", "Force Break"),
    ("BVC", "Branch on Overflow Clear"),
    ("BVS", "Branch on Overflow Set"),
    ("CLC", "Clear Carry Flag"),
    ("CLD", "Clear Decimal Mode"),
    ("CLI", "Clear Interrupt Disable Bit"),
    ("CLV", "Clear Overflow Flag"),
    ("CMP", "Compare Memory and Accumulator"),
    ("CPX", "Compare Memory and Index X"),
    ("CPY", "Compare Memory and Index Y"),
    ("DEC", "Decrement Memory by One"),
    ("DEX", "Decrement Index X by One"),
    ("DEY", "Decrement Index Y by One"),
    ("EOR", "Exclusive-OR Memory with Accumulator"),
    ("INC", "Increment Memory by One"),
    ("INX", "Increment Index X by One"),
    ("INY", "Increment Index Y by One"),
    ("JMP", "Jump to New Location"),
    ("JSR", "Jump to New Location Saving Return Address"),
    ("LDA", "Load Accumulator with Memory"),
    ("LDX", "Load Index X with Memory"),
    ("LDY", "Load Index Y with Memory"),
    ("LSR", "Shift Right One Bit (Memory or Accumulator)"),
    ("NOP", "No Operation"),
    ("ORA", "OR Memory with Accumulator"),
    ("PHA", "Push Accumulator on Stack"),
    ("PHP", "Push Processor Status on Stack"),
    ("PLA", "Pull Accumulator from Stack"),
    ("PLP", "Pull Processor Status from Stack"),
    ("ROL", "Rotate One Bit Left (Memory or Accumulator)"),
    ("ROR", "Rotate One Bit Right (Memory or Accumulator)"),
    ("RTI", "Return from Interrupt"),
    ("RTS", "Return from Subroutine"),
    ("SBC", "Subtract Memory from Accumulator with Borrow"),
    ("SEC", "Set Carry Flag"),
    ("SED", "Set Decimal Mode"),
    ("SEI", "Set Interrupt Disable Status"),
    ("STA", "Store Accumulator in Memory"),
    ("STX", "Store Index X in Memory"),
    ("STY", "Store Index Y in Memory"),
    ("TAX", "Transfer Accumulator to Index X"),
    ("TAY", "Transfer Accumulator to Index Y"),
    ("TSX", "Transfer Stack Pointer to Index X"),
    ("TXA", "Transfer Index X to Accumulator"),
    ("TXS", "Transfer Index X to Stack Pointer"),
    ("TYA", "Transfer Index Y to Accumulator"),
];

// Mode order within a mnemonic is the order operands are tried in.
const OPCODES: &[(&str, AddressingMode, u8)] = &[
    // ADC
    ("ADC", Immediate, 0x69),
    ("ADC", ZeroPage, 0x65),
    ("ADC", ZeroPageX, 0x75),
    ("ADC", Absolute, 0x6D),
    ("ADC", AbsoluteX, 0x7D),
    ("ADC", AbsoluteY, 0x79),
    ("ADC", IndexedIndirectX, 0x61),
    ("ADC", IndirectIndexedY, 0x71),
    // AND
    ("AND", Immediate, 0x29),
    ("AND", ZeroPage, 0x25),
    ("AND", ZeroPageX, 0x35),
    ("AND", Absolute, 0x2D),
    ("AND", AbsoluteX, 0x3D),
    ("AND", AbsoluteY, 0x39),
    ("AND", IndexedIndirectX, 0x21),
    ("AND", IndirectIndexedY, 0x31),
    // ASL
    ("ASL", Accumulator, 0x0A),
    ("ASL", ZeroPage, 0x06),
    ("ASL", ZeroPageX, 0x16),
    ("ASL", Absolute, 0x0E),
    ("ASL", AbsoluteX, 0x1E),
    // Branches
    ("BCC", Relative, 0x90),
    ("BCS", Relative, 0xB0),
    ("BEQ", Relative, 0xF0),
    ("BMI", Relative, 0x30),
    ("BNE", Relative, 0xD0),
    ("BPL", Relative, 0x10),
    ("BVC", Relative, 0x50),
    ("BVS", Relative, 0x70),
    // BIT
    ("BIT", ZeroPage, 0x24),
    ("BIT", Absolute, 0x2C),
    // BRK
    ("BRK", Implied, 0x00),
    // Clear flags
    ("CLC", Implied, 0x18),
    ("CLD", Implied, 0xD8),
    ("CLI", Implied, 0x58),
    ("CLV", Implied, 0xB8),
    // CMP
    ("CMP", Immediate, 0xC9),
    ("CMP", ZeroPage, 0xC5),
    ("CMP", ZeroPageX, 0xD5),
    ("CMP", Absolute, 0xCD),
    ("CMP", AbsoluteX, 0xDD),
    ("CMP", AbsoluteY, 0xD9),
    ("CMP", IndexedIndirectX, 0xC1),
    ("CMP", IndirectIndexedY, 0xD1),
    // CPX
    ("CPX", Immediate, 0xE0),
    ("CPX", ZeroPage, 0xE4),
    ("CPX", Absolute, 0xEC),
    // CPY
    ("CPY", Immediate, 0xC0),
    ("CPY", ZeroPage, 0xC4),
    ("CPY", Absolute, 0xCC),
    // DEC
    ("DEC", ZeroPage, 0xC6),
    ("DEC", ZeroPageX, 0xD6),
    ("DEC", Absolute, 0xCE),
    ("DEC", AbsoluteX, 0xDE),
    ("DEX", Implied, 0xCA),
    ("DEY", Implied, 0x88),
    // EOR
    ("EOR", Immediate, 0x49),
    ("EOR", ZeroPage, 0x45),
    ("EOR", ZeroPageX, 0x55),
    ("EOR", Absolute, 0x4D),
    ("EOR", AbsoluteX, 0x5D),
    ("EOR", AbsoluteY, 0x59),
    ("EOR", IndexedIndirectX, 0x41),
    ("EOR", IndirectIndexedY, 0x51),
    // INC
    ("INC", ZeroPage, 0xE6),
    ("INC", ZeroPageX, 0xF6),
    ("INC", Absolute, 0xEE),
    ("INC", AbsoluteX, 0xFE),
    ("INX", Implied, 0xE8),
    ("INY", Implied, 0xC8),
    // Jumps
    ("JMP", Absolute, 0x4C),
    ("JMP", Indirect, 0x6C),
    ("JSR", Absolute, 0x20),
    // LDA
    ("LDA", Immediate, 0xA9),
    ("LDA", ZeroPage, 0xA5),
    ("LDA", ZeroPageX, 0xB5),
    ("LDA", Absolute, 0xAD),
    ("LDA", AbsoluteX, 0xBD),
    ("LDA", AbsoluteY, 0xB9),
    ("LDA", IndexedIndirectX, 0xA1),
    ("LDA", IndirectIndexedY, 0xB1),
    // LDX
    ("LDX", Immediate, 0xA2),
    ("LDX", ZeroPage, 0xA6),
    ("LDX", ZeroPageY, 0xB6),
    ("LDX", Absolute, 0xAE),
    ("LDX", AbsoluteY, 0xBE),
    // LDY
    ("LDY", Immediate, 0xA0),
    ("LDY", ZeroPage, 0xA4),
    ("LDY", ZeroPageX, 0xB4),
    ("LDY", Absolute, 0xAC),
    ("LDY", AbsoluteX, 0xBC),
    // LSR
    ("LSR", Accumulator, 0x4A),
    ("LSR", ZeroPage, 0x46),
    ("LSR", ZeroPageX, 0x56),
    ("LSR", Absolute, 0x4E),
    ("LSR", AbsoluteX, 0x5E),
    // NOP
    ("NOP", Implied, 0xEA),
    // ORA
    ("ORA", Immediate, 0x09),
    ("ORA", ZeroPage, 0x05),
    ("ORA", ZeroPageX, 0x15),
    ("ORA", Absolute, 0x0D),
    ("ORA", AbsoluteX, 0x1D),
    ("ORA", AbsoluteY, 0x19),
    ("ORA", IndexedIndirectX, 0x01),
    ("ORA", IndirectIndexedY, 0x11),
    // Stack
    ("PHA", Implied, 0x48),
    ("PHP", Implied, 0x08),
    ("PLA", Implied, 0x68),
    ("PLP", Implied, 0x28),
    // ROL
    ("ROL", Accumulator, 0x2A),
    ("ROL", ZeroPage, 0x26),
    ("ROL", ZeroPageX, 0x36),
    ("ROL", Absolute, 0x2E),
    ("ROL", AbsoluteX, 0x3E),
    // ROR
    ("ROR", Accumulator, 0x6A),
    ("ROR", ZeroPage, 0x66),
    ("ROR", ZeroPageX, 0x76),
    ("ROR", Absolute, 0x6E),
    ("ROR", AbsoluteX, 0x7E),
    // Returns
    ("RTI", Implied, 0x40),
    ("RTS", Implied, 0x60),
    // SBC
    ("SBC", Immediate, 0xE9),
    ("SBC", ZeroPage, 0xE5),
    ("SBC", ZeroPageX, 0xF5),
    ("SBC", Absolute, 0xED),
    ("SBC", AbsoluteX, 0xFD),
    ("SBC", AbsoluteY, 0xF9),
    ("SBC", IndexedIndirectX, 0xE1),
    ("SBC", IndirectIndexedY, 0xF1),
    // Set flags
    ("SEC", Implied, 0x38),
    ("SED", Implied, 0xF8),
    ("SEI", Implied, 0x78),
    // STA
    ("STA", ZeroPage, 0x85),
    ("STA", ZeroPageX, 0x95),
    ("STA", Absolute, 0x8D),
    ("STA", AbsoluteX, 0x9D),
    ("STA", AbsoluteY, 0x99),
    ("STA", IndexedIndirectX, 0x81),
    ("STA", IndirectIndexedY, 0x91),
    // STX
    ("STX", ZeroPage, 0x86),
    ("STX", ZeroPageY, 0x96),
    ("STX", Absolute, 0x8E),
    // STY
    ("STY", ZeroPage, 0x84),
    ("STY", ZeroPageX, 0x94),
    ("STY", Absolute, 0x8C),
    // Transfers
    ("TAX", Implied, 0xAA),
    ("TAY", Implied, 0xA8),
    ("TSX", Implied, 0xBA),
    ("TXA", Implied, 0x8A),
    ("TXS", Implied, 0x9A),
    ("TYA", Implied, 0x98),
];

impl InstructionSet {
    /// Builds the documented 6502/6510 instruction set.
    ///
    /// Refused entries are kept in [`InstructionSet::rejected`].
    pub fn mos6510() -> Self {
        let mut set = InstructionSet::new();
        for (mnemonic, description) in MNEMONICS {
            let _ = set.register(mnemonic, description);
        }
        for &(mnemonic, mode, opcode) in OPCODES {
            let _ = set.bind(mnemonic, mode, opcode);
        }
        set
    }
}
