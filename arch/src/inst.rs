use bimap::BiMap;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::mode::AddressingMode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("`{0}` already exists in instruction set")]
    DuplicateMnemonic(String),

    #[error("`{0}` is not in instruction set")]
    UnknownMnemonic(String),

    #[error("Duplicate addressing mode {1} for `{0}`")]
    DuplicateMode(String, AddressingMode),

    #[error("Opcode ${0:02X} already bound to `{1}` {2}")]
    DuplicateOpcode(u8, String, AddressingMode),

    #[error("`{0}` mixes implied addressing with other modes")]
    ImpliedNotAlone(String),
}

// ----------------------------------------------------------------------------
// Instruction

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    mnemonic: String,
    description: String,
    modes: IndexMap<AddressingMode, u8>,
}

impl Instruction {
    fn new(mnemonic: &str, description: &str) -> Self {
        Instruction {
            mnemonic: mnemonic.to_string(),
            description: description.to_string(),
            modes: IndexMap::new(),
        }
    }

    pub fn mnemonic(&self) -> &str {
        &self.mnemonic
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared modes in registration order.
    pub fn modes(&self) -> impl Iterator<Item = (AddressingMode, u8)> + '_ {
        self.modes.iter().map(|(mode, opcode)| (*mode, *opcode))
    }

    pub fn opcode(&self, mode: AddressingMode) -> Option<u8> {
        self.modes.get(&mode).copied()
    }

    pub fn supports(&self, mode: AddressingMode) -> bool {
        self.modes.contains_key(&mode)
    }

    pub fn is_implied(&self) -> bool {
        self.supports(AddressingMode::Implied)
    }

    pub fn is_branch(&self) -> bool {
        self.supports(AddressingMode::Relative)
    }
}

// ----------------------------------------------------------------------------
// Instruction Set

#[derive(Debug, Default)]
pub struct InstructionSet {
    instructions: IndexMap<String, Instruction>,
    opcodes: BiMap<u8, (String, AddressingMode)>,
    rejected: Vec<TableError>,
}

impl InstructionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mnemonic: &str, description: &str) -> Result<(), TableError> {
        if self.instructions.contains_key(mnemonic) {
            return Err(self.reject(TableError::DuplicateMnemonic(mnemonic.to_string())));
        }
        self.instructions
            .insert(mnemonic.to_string(), Instruction::new(mnemonic, description));
        Ok(())
    }

    pub fn bind(
        &mut self,
        mnemonic: &str,
        mode: AddressingMode,
        opcode: u8,
    ) -> Result<(), TableError> {
        let err = match self.instructions.get(mnemonic) {
            None => Some(TableError::UnknownMnemonic(mnemonic.to_string())),
            Some(inst) if inst.supports(mode) => {
                Some(TableError::DuplicateMode(mnemonic.to_string(), mode))
            }
            Some(inst)
                if !inst.modes.is_empty() && (inst.is_implied() || mode == AddressingMode::Implied) =>
            {
                Some(TableError::ImpliedNotAlone(mnemonic.to_string()))
            }
            Some(_) => self
                .opcodes
                .get_by_left(&opcode)
                .map(|(owner, mode)| TableError::DuplicateOpcode(opcode, owner.clone(), *mode)),
        };
        if let Some(err) = err {
            return Err(self.reject(err));
        }

        self.opcodes
            .insert(opcode, (mnemonic.to_string(), mode));
        if let Some(inst) = self.instructions.get_mut(mnemonic) {
            inst.modes.insert(mode, opcode);
        }
        Ok(())
    }

    fn reject(&mut self, err: TableError) -> TableError {
        self.rejected.push(err.clone());
        err
    }

    /// Registrations refused while building this set.
    pub fn rejected(&self) -> &[TableError] {
        &self.rejected
    }

    /// Exact match: `lda` is not `LDA`.
    pub fn lookup(&self, mnemonic: &str) -> Option<&Instruction> {
        self.instructions.get(mnemonic)
    }

    pub fn is_instruction(&self, token: &str) -> bool {
        self.lookup(token).is_some()
    }

    pub fn operand_length(mode: AddressingMode) -> u8 {
        mode.length()
    }

    /// Reverse lookup from an opcode byte.
    pub fn decode(&self, opcode: u8) -> Option<(&Instruction, AddressingMode)> {
        let (mnemonic, mode) = self.opcodes.get_by_left(&opcode)?;
        Some((self.instructions.get(mnemonic)?, *mode))
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AddressingMode::*;

    fn sample() -> InstructionSet {
        let mut set = InstructionSet::new();
        set.register("LDA", "Load Accumulator with Memory").unwrap();
        set.register("RTS", "Return from Subroutine").unwrap();
        set.bind("LDA", Immediate, 0xA9).unwrap();
        set.bind("LDA", Absolute, 0xAD).unwrap();
        set.bind("RTS", Implied, 0x60).unwrap();
        set
    }

    #[test]
    fn register_twice() {
        let mut set = sample();
        assert_eq!(
            set.register("LDA", "again"),
            Err(TableError::DuplicateMnemonic("LDA".to_string()))
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.rejected().len(), 1);
    }

    #[test]
    fn bind_twice_keeps_first() {
        let mut set = sample();
        assert!(set.bind("LDA", Immediate, 0x00).is_err());
        assert_eq!(set.lookup("LDA").unwrap().opcode(Immediate), Some(0xA9));
    }

    #[test]
    fn bind_unknown() {
        let mut set = sample();
        assert_eq!(
            set.bind("XYZ", Implied, 0x02),
            Err(TableError::UnknownMnemonic("XYZ".to_string()))
        );
    }

    #[test]
    fn bind_taken_opcode() {
        let mut set = sample();
        set.register("ADC", "Add Memory to Accumulator with Carry").unwrap();
        // $60 is RTS, not ADC absolute
        assert_eq!(
            set.bind("ADC", Absolute, 0x60),
            Err(TableError::DuplicateOpcode(0x60, "RTS".to_string(), Implied))
        );
    }

    #[test]
    fn implied_is_exclusive() {
        let mut set = sample();
        assert!(set.bind("RTS", Absolute, 0x03).is_err());
        assert!(set.bind("LDA", Implied, 0x04).is_err());
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let set = sample();
        assert!(set.is_instruction("LDA"));
        assert!(!set.is_instruction("lda"));
        assert!(!set.is_instruction("Rts"));
        assert!(!set.is_instruction("loop"));
    }

    #[test]
    fn modes_keep_order() {
        let set = sample();
        let modes: Vec<_> = set.lookup("LDA").unwrap().modes().collect();
        assert_eq!(modes, vec![(Immediate, 0xA9), (Absolute, 0xAD)]);
    }

    #[test]
    fn decode() {
        let set = sample();
        let (inst, mode) = set.decode(0xAD).unwrap();
        assert_eq!(inst.mnemonic(), "LDA");
        assert_eq!(mode, Absolute);
        assert!(set.decode(0xFF).is_none());
    }
}
