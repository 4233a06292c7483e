//! Shared ELF definitions: ident layout, header sizes and the e_type
//! enumeration.

pub const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

pub const EI_CLASS: usize = 4;
pub const EI_DATA: usize = 5;

pub const ELFCLASS64: u8 = 2;
pub const ELFDATA2LSB: u8 = 1;
pub const ELFDATA2MSB: u8 = 2;

pub const EHDR_SIZE: usize = 64;
pub const SHDR_SIZE: usize = 64;

/// Reserved e_shstrndx value meaning the file carries no section name table.
pub const SHN_XINDEX: u16 = 0xFFFF;

/// Object file type from e_type. Values inside the OS and processor specific
/// ranges keep their raw number, anything else out of range lands in
/// `Unrecognized` instead of being cast blindly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElfType {
    Unknown,
    Relocatable,
    Executable,
    Shared,
    Core,
    OsSpecific(u16),
    ProcessorSpecific(u16),
    Unrecognized(u16),
}

impl ElfType {
    pub fn from_u16(v: u16) -> ElfType {
        match v {
            0 => ElfType::Unknown,
            1 => ElfType::Relocatable,
            2 => ElfType::Executable,
            3 => ElfType::Shared,
            4 => ElfType::Core,
            0xFE00..=0xFEFF => ElfType::OsSpecific(v),
            0xFF00..=0xFFFF => ElfType::ProcessorSpecific(v),
            _ => ElfType::Unrecognized(v),
        }
    }
}
