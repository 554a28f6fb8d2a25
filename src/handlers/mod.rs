//! Entry points for the two ways of using pyscratch.

pub mod run;
pub mod scratchpad;
