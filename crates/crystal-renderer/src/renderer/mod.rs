//! Frame orchestration: main effect pass into an off-screen target, then
//! the bloom pass onto the screen.

mod crystal;
mod types;

pub use crystal::*;
pub use types::*;

#[cfg(test)]
mod tests;
