use std::collections::HashMap;

use super::ElfModule;
use crate::file_struct::elf::ELF64;
use crate::utils::ERError;

impl ElfModule {
    pub fn stat(&self, _args: HashMap<String, String>) -> Result<(), ERError> {
        let elf = ELF64::parse(&self.data)?;
        let ehdr = elf.header();
        println!("file: {}", self.file());
        println!("\ttype: {:?}", ehdr.get_type());
        println!("\tmachine: {:#x}", ehdr.e_machine);
        println!("\tendian: {:?}", elf.endian());
        println!("\tentry: {:#x}", ehdr.e_entry);
        println!("\tflags: {:#x}", ehdr.e_flags);
        println!("\tprogram headers: {} x {} bytes at {:#x}", ehdr.e_phnum, ehdr.e_phentsize, ehdr.e_phoff);
        println!("\tsection headers: {} x {} bytes at {:#x}", ehdr.e_shnum, ehdr.e_shentsize, ehdr.e_shoff);
        println!("\tsection name table index: {}", ehdr.e_shstrndx);
        Ok(())
    }
}
