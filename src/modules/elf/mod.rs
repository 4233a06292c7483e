use std::path;

use crate::utils::{file::ERFile, ERError};

pub mod list_sections;
pub mod stat;

/// Owns the loaded file image; every function parses the buffer fresh, the
/// decoded view in `file_struct::elf` only borrows it.
pub struct ElfModule {
    file    : String,
    data    : Vec<u8>
}

impl ElfModule {
    pub fn new<P>(file: P) -> Result<ElfModule, ERError>
    where P: AsRef<path::Path> + ToString {
        let s = file.to_string();
        let mut f = match ERFile::new(file) {
            Ok(o) => o,
            Err(e) => {
                return Err(e);
            }
        };
        let data = match f.read_all() {
            Ok(o) => o,
            Err(e) => {
                return Err(e);
            }
        };
        Ok(Self {
            file: s,
            data,
        })
    }

    pub fn file(&self) -> &str {
        &self.file
    }
}
