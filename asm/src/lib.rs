pub mod engine;
pub mod error;
pub mod include;
pub mod lexer;
pub mod listing;
pub mod msg;
pub mod operand;
pub mod symbol;
pub mod token;

pub use engine::{assemble, Assembler, Mode, Output};
pub use error::Error;
pub use include::{FsLoader, MemLoader, SourceLoader, Sources};
pub use lexer::Lexer;
pub use listing::Listing;
pub use msg::{Level, Log};
pub use symbol::{Symbol, Symbols};
