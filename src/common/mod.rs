pub mod process;

pub use process::{CommandOutcome, CommandSpec, ProcessRunner, SystemRunner};
