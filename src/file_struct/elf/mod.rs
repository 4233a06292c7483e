pub mod cursor;
pub mod elf_pub;
pub mod elf64;

pub use cursor::{ByteCursor, Endian};
pub use elf64::{Elf64_Ehdr, Elf64_Shdr, ELF64};
pub use elf_pub::ElfType;
