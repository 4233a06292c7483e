use std::collections::HashMap;

use colored::Colorize;

use super::ElfModule;
use crate::file_struct::elf::ELF64;
use crate::utils::{file::filesize_to_human_string, ERError};

impl ElfModule {
    /// Prints every section's name and size in table order. A section whose
    /// name cannot be resolved gets a placeholder instead of aborting the
    /// listing.
    pub fn list_sections(&self, args: HashMap<String, String>) -> Result<(), ERError> {
        let human = args
            .get("human")
            .map(|v| v.eq("true"))
            .unwrap_or(false);

        let elf = ELF64::parse(&self.data)?;
        let shdrs = elf.sections()?;
        for shdr in &shdrs {
            let name = match elf.section_name(shdr) {
                Ok(name) => name,
                Err(e) => {
                    log::warn!("name of section at {:#x} unresolved: {}", shdr.sh_offset, e);
                    "<no name>".to_string()
                }
            };
            if human {
                println!(
                    "{}\t{}",
                    name.bright_green(),
                    filesize_to_human_string(shdr.sh_size as usize)
                );
            } else {
                println!("{}\t{}", name.bright_green(), shdr.sh_size);
            }
        }
        Ok(())
    }
}
