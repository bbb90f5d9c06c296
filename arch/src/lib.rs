pub mod inst;
pub mod mode;
pub mod table;

pub use inst::{Instruction, InstructionSet, TableError};
pub use mode::AddressingMode;
pub use table::MOS6510;
