pub mod file_struct;
pub mod modules;
pub mod utils;
