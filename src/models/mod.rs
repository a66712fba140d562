pub mod asr;
pub mod report;
pub mod transcript;

pub use asr::*;
pub use report::*;
pub use transcript::*;
