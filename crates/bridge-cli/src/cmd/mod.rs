pub mod process;
pub mod serve;
