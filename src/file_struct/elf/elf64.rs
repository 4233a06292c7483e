use log::warn;
use memchr::memchr;

use super::cursor::{ByteCursor, Endian};
use super::elf_pub::{
    ElfType, EHDR_SIZE, EI_CLASS, EI_DATA, ELFCLASS64, ELFDATA2LSB, ELFDATA2MSB, ELF_MAGIC,
    SHDR_SIZE, SHN_XINDEX,
};
use crate::utils::{ERErrKind, ERError};

#[derive(Default, Debug)]
pub struct Elf64_Ehdr {
    pub e_ident: [u8; 16],
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u64,
    pub e_phoff: u64,
    pub e_shoff: u64,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    pub e_shentsize: u16,
    pub e_shnum: u16,
    pub e_shstrndx: u16,
}

impl Elf64_Ehdr {
    fn new(cur: &mut ByteCursor, endian: Endian) -> Result<Elf64_Ehdr, ERError> {
        let mut ehdr = Elf64_Ehdr::default();
        ehdr.e_ident.copy_from_slice(cur.read_bytes(16)?);
        ehdr.e_type = cur.read_u16(endian)?;
        ehdr.e_machine = cur.read_u16(endian)?;
        ehdr.e_version = cur.read_u32(endian)?;
        ehdr.e_entry = cur.read_u64(endian)?;
        ehdr.e_phoff = cur.read_u64(endian)?;
        ehdr.e_shoff = cur.read_u64(endian)?;
        ehdr.e_flags = cur.read_u32(endian)?;
        ehdr.e_ehsize = cur.read_u16(endian)?;
        ehdr.e_phentsize = cur.read_u16(endian)?;
        ehdr.e_phnum = cur.read_u16(endian)?;
        ehdr.e_shentsize = cur.read_u16(endian)?;
        ehdr.e_shnum = cur.read_u16(endian)?;
        ehdr.e_shstrndx = cur.read_u16(endian)?;
        Ok(ehdr)
    }

    pub fn get_type(&self) -> ElfType {
        ElfType::from_u16(self.e_type)
    }
}

#[derive(Default, Debug, Clone)]
pub struct Elf64_Shdr {
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_flags: u64,
    pub sh_addr: u64,
    pub sh_offset: u64,
    pub sh_size: u64,
    pub sh_link: u32,
    pub sh_info: u32,
    pub sh_addralign: u64,
    pub sh_entsize: u64,
}

impl Elf64_Shdr {
    fn new(cur: &mut ByteCursor, endian: Endian) -> Result<Elf64_Shdr, ERError> {
        Ok(Elf64_Shdr {
            sh_name: cur.read_u32(endian)?,
            sh_type: cur.read_u32(endian)?,
            sh_flags: cur.read_u64(endian)?,
            sh_addr: cur.read_u64(endian)?,
            sh_offset: cur.read_u64(endian)?,
            sh_size: cur.read_u64(endian)?,
            sh_link: cur.read_u32(endian)?,
            sh_info: cur.read_u32(endian)?,
            sh_addralign: cur.read_u64(endian)?,
            sh_entsize: cur.read_u64(endian)?,
        })
    }
}

/// Decoded view of a 64-bit ELF image. Borrows the caller's buffer for its
/// whole lifetime and never mutates after a successful parse, so shared
/// read-only access is safe.
#[derive(Debug)]
pub struct ELF64<'a> {
    data: &'a [u8],
    endian: Endian,
    ehdr: Elf64_Ehdr,
}

impl<'a> ELF64<'a> {
    pub fn parse(data: &'a [u8]) -> Result<ELF64<'a>, ERError> {
        if data.len() < EHDR_SIZE {
            return Err(ERError::new_with_kind(
                &format!("{} byte buffer cannot hold a {} byte header", data.len(), EHDR_SIZE),
                ERErrKind::TooSmall,
            ));
        }
        if data[0..4] != ELF_MAGIC {
            return Err(ERError::new_with_kind(
                "first four bytes are not 7F 45 4C 46",
                ERErrKind::BadMagic,
            ));
        }
        if data[EI_CLASS] != ELFCLASS64 {
            return Err(ERError::new_with_kind(
                &format!("EI_CLASS {} is not ELFCLASS64", data[EI_CLASS]),
                ERErrKind::UnsupportedClass,
            ));
        }
        let endian = match data[EI_DATA] {
            ELFDATA2MSB => Endian::Big,
            ELFDATA2LSB => Endian::Little,
            other => {
                warn!("unrecognized EI_DATA value {}, assuming little-endian", other);
                Endian::Little
            }
        };

        let mut cur = ByteCursor::new(data);
        let ehdr = Elf64_Ehdr::new(&mut cur, endian)?;

        if ehdr.e_ehsize as usize != EHDR_SIZE {
            warn!("e_ehsize is {}, expected {}", ehdr.e_ehsize, EHDR_SIZE);
        }

        if ehdr.e_shnum != 0 {
            let table_end = (ehdr.e_shnum as u64)
                .checked_mul(ehdr.e_shentsize as u64)
                .and_then(|size| ehdr.e_shoff.checked_add(size));
            match table_end {
                Some(end) if end <= data.len() as u64 => {}
                _ => {
                    return Err(ERError::new_with_kind(
                        &format!(
                            "section table at {:#x} ({} entries of {} bytes) exceeds {} byte buffer",
                            ehdr.e_shoff, ehdr.e_shnum, ehdr.e_shentsize, data.len()
                        ),
                        ERErrKind::SectionTableOutOfBounds,
                    ));
                }
            }
        }

        Ok(ELF64 { data, endian, ehdr })
    }

    pub fn header(&self) -> &Elf64_Ehdr {
        &self.ehdr
    }

    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Decodes all section headers in table order. Index order here is the
    /// same positional indexing that e_shstrndx refers to.
    pub fn sections(&self) -> Result<Vec<Elf64_Shdr>, ERError> {
        let mut result = Vec::with_capacity(self.ehdr.e_shnum as usize);
        for index in 0..self.ehdr.e_shnum as usize {
            result.push(self.section_at(index)?);
        }
        Ok(result)
    }

    fn section_at(&self, index: usize) -> Result<Elf64_Shdr, ERError> {
        let stride = self.ehdr.e_shentsize as usize;
        if stride < SHDR_SIZE {
            return Err(ERError::new_with_kind(
                &format!("e_shentsize {} too small to hold a section header", stride),
                ERErrKind::OutOfBounds,
            ));
        }
        // geometry was validated at parse time, this cannot wrap
        let offset = self.ehdr.e_shoff as usize + index * stride;
        let mut cur = ByteCursor::new(self.data);
        cur.seek(offset)?;
        Elf64_Shdr::new(&mut cur, self.endian)
    }

    /// Resolves a section's name through the string table section selected
    /// by e_shstrndx. Resolution can fail per section without affecting the
    /// rest of the image.
    pub fn section_name(&self, shdr: &Elf64_Shdr) -> Result<String, ERError> {
        let strndx = self.ehdr.e_shstrndx;
        if strndx == SHN_XINDEX {
            return Err(ERError::new_with_kind(
                "e_shstrndx holds the reserved no-string-table sentinel",
                ERErrKind::NoStringTable,
            ));
        }
        if strndx >= self.ehdr.e_shnum {
            return Err(ERError::new_with_kind(
                &format!("e_shstrndx {} out of range of {} sections", strndx, self.ehdr.e_shnum),
                ERErrKind::NoStringTable,
            ));
        }
        let strtab = self.section_at(strndx as usize)?;
        let tab_end = strtab
            .sh_offset
            .checked_add(strtab.sh_size)
            .filter(|end| *end <= self.data.len() as u64);
        let tab = match tab_end {
            Some(end) => &self.data[strtab.sh_offset as usize..end as usize],
            None => {
                return Err(ERError::new_with_kind(
                    &format!(
                        "string table at {:#x}+{:#x} exceeds {} byte buffer",
                        strtab.sh_offset, strtab.sh_size, self.data.len()
                    ),
                    ERErrKind::OutOfBounds,
                ));
            }
        };
        let start = shdr.sh_name as usize;
        if shdr.sh_name as u64 >= strtab.sh_size {
            return Err(ERError::new_with_kind(
                &format!("name offset {} beyond string table of {} bytes", start, tab.len()),
                ERErrKind::NameOffsetOutOfBounds,
            ));
        }
        match memchr(0, &tab[start..]) {
            Some(len) => Ok(String::from_utf8_lossy(&tab[start..start + len]).into_owned()),
            None => Err(ERError::new_with_kind(
                &format!("no NUL terminator after name offset {}", start),
                ERErrKind::UnterminatedString,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put16(buf: &mut Vec<u8>, endian: Endian, v: u16) {
        match endian {
            Endian::Little => buf.extend_from_slice(&v.to_le_bytes()),
            Endian::Big => buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    fn put32(buf: &mut Vec<u8>, endian: Endian, v: u32) {
        match endian {
            Endian::Little => buf.extend_from_slice(&v.to_le_bytes()),
            Endian::Big => buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    fn put64(buf: &mut Vec<u8>, endian: Endian, v: u64) {
        match endian {
            Endian::Little => buf.extend_from_slice(&v.to_le_bytes()),
            Endian::Big => buf.extend_from_slice(&v.to_be_bytes()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn put_shdr(
        buf: &mut Vec<u8>,
        endian: Endian,
        name: u32,
        sh_type: u32,
        flags: u64,
        addr: u64,
        offset: u64,
        size: u64,
        align: u64,
    ) {
        put32(buf, endian, name);
        put32(buf, endian, sh_type);
        put64(buf, endian, flags);
        put64(buf, endian, addr);
        put64(buf, endian, offset);
        put64(buf, endian, size);
        put32(buf, endian, 0); // sh_link
        put32(buf, endian, 0); // sh_info
        put64(buf, endian, align);
        put64(buf, endian, 0); // sh_entsize
    }

    // header, then the string table blob at 64, then three section headers
    // at 81: the null section, .text and .shstrtab
    const STRTAB: &[u8] = b"\0.text\0.shstrtab\0";
    const SHOFF: u64 = 64 + STRTAB.len() as u64;

    fn sample_elf(endian: Endian) -> Vec<u8> {
        let mut buf = Vec::new();
        let ei_data = match endian {
            Endian::Little => 1,
            Endian::Big => 2,
        };
        buf.extend_from_slice(&[0x7F, b'E', b'L', b'F', 2, ei_data, 1, 0]);
        buf.extend_from_slice(&[0u8; 8]);
        put16(&mut buf, endian, 2); // e_type, ET_EXEC
        put16(&mut buf, endian, 0x3E); // e_machine, x86-64
        put32(&mut buf, endian, 1); // e_version
        put64(&mut buf, endian, 0x401000); // e_entry
        put64(&mut buf, endian, 64); // e_phoff
        put64(&mut buf, endian, SHOFF); // e_shoff
        put32(&mut buf, endian, 0); // e_flags
        put16(&mut buf, endian, 64); // e_ehsize
        put16(&mut buf, endian, 0); // e_phentsize
        put16(&mut buf, endian, 0); // e_phnum
        put16(&mut buf, endian, 64); // e_shentsize
        put16(&mut buf, endian, 3); // e_shnum
        put16(&mut buf, endian, 2); // e_shstrndx
        assert_eq!(buf.len(), 64);

        buf.extend_from_slice(STRTAB);
        buf.extend_from_slice(&[0u8; 64]); // index 0, the null section
        put_shdr(&mut buf, endian, 1, 1, 6, 0x401000, 0x200, 0x42, 16); // .text
        put_shdr(&mut buf, endian, 7, 3, 0, 0, 64, STRTAB.len() as u64, 1); // .shstrtab
        buf
    }

    #[test]
    fn parse_round_trips_header_fields() {
        let buf = sample_elf(Endian::Little);
        let elf = ELF64::parse(&buf).unwrap();
        let ehdr = elf.header();
        assert_eq!(&ehdr.e_ident[0..4], &ELF_MAGIC);
        assert_eq!(ehdr.e_type, 2);
        assert_eq!(ehdr.get_type(), ElfType::Executable);
        assert_eq!(ehdr.e_machine, 0x3E);
        assert_eq!(ehdr.e_version, 1);
        assert_eq!(ehdr.e_entry, 0x401000);
        assert_eq!(ehdr.e_phoff, 64);
        assert_eq!(ehdr.e_shoff, SHOFF);
        assert_eq!(ehdr.e_flags, 0);
        assert_eq!(ehdr.e_ehsize, 64);
        assert_eq!(ehdr.e_phentsize, 0);
        assert_eq!(ehdr.e_phnum, 0);
        assert_eq!(ehdr.e_shentsize, 64);
        assert_eq!(ehdr.e_shnum, 3);
        assert_eq!(ehdr.e_shstrndx, 2);
        assert_eq!(elf.endian(), Endian::Little);
    }

    #[test]
    fn parse_big_endian_image() {
        let buf = sample_elf(Endian::Big);
        let elf = ELF64::parse(&buf).unwrap();
        assert_eq!(elf.endian(), Endian::Big);
        assert_eq!(elf.header().e_entry, 0x401000);
        assert_eq!(elf.header().e_shoff, SHOFF);
        let shdrs = elf.sections().unwrap();
        assert_eq!(shdrs[1].sh_size, 0x42);
        assert_eq!(elf.section_name(&shdrs[1]).unwrap(), ".text");
    }

    #[test]
    fn buffer_shorter_than_header_is_too_small() {
        let buf = sample_elf(Endian::Little);
        let err = ELF64::parse(&buf[..63]).unwrap_err();
        assert_eq!(err.kind(), ERErrKind::TooSmall);
        assert_eq!(ELF64::parse(&[]).unwrap_err().kind(), ERErrKind::TooSmall);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let mut buf = sample_elf(Endian::Little);
        buf[0] = 0x7E;
        assert_eq!(ELF64::parse(&buf).unwrap_err().kind(), ERErrKind::BadMagic);
    }

    #[test]
    fn elf32_class_is_rejected() {
        let mut buf = sample_elf(Endian::Little);
        buf[EI_CLASS] = 1;
        let err = ELF64::parse(&buf).unwrap_err();
        assert_eq!(err.kind(), ERErrKind::UnsupportedClass);
    }

    #[test]
    fn sections_come_back_in_table_order() {
        let buf = sample_elf(Endian::Little);
        let elf = ELF64::parse(&buf).unwrap();
        let shdrs = elf.sections().unwrap();
        assert_eq!(shdrs.len(), 3);
        assert_eq!(shdrs[0].sh_type, 0);
        assert_eq!(shdrs[1].sh_name, 1);
        assert_eq!(shdrs[1].sh_addr, 0x401000);
        assert_eq!(shdrs[1].sh_addralign, 16);
        assert_eq!(shdrs[2].sh_name, 7);
        assert_eq!(shdrs[2].sh_offset, 64);
    }

    #[test]
    fn zero_sections_is_legal() {
        let mut buf = sample_elf(Endian::Little);
        buf[60..62].copy_from_slice(&0u16.to_le_bytes()); // e_shnum
        let elf = ELF64::parse(&buf).unwrap();
        assert!(elf.sections().unwrap().is_empty());
    }

    #[test]
    fn section_table_past_end_is_rejected() {
        let mut buf = sample_elf(Endian::Little);
        let bogus = buf.len() as u64;
        buf[40..48].copy_from_slice(&bogus.to_le_bytes()); // e_shoff
        let err = ELF64::parse(&buf).unwrap_err();
        assert_eq!(err.kind(), ERErrKind::SectionTableOutOfBounds);
    }

    #[test]
    fn section_table_overflow_is_rejected() {
        let mut buf = sample_elf(Endian::Little);
        buf[40..48].copy_from_slice(&u64::MAX.to_le_bytes()); // e_shoff
        let err = ELF64::parse(&buf).unwrap_err();
        assert_eq!(err.kind(), ERErrKind::SectionTableOutOfBounds);
    }

    #[test]
    fn names_resolve_through_the_string_table() {
        let buf = sample_elf(Endian::Little);
        let elf = ELF64::parse(&buf).unwrap();
        let shdrs = elf.sections().unwrap();
        assert_eq!(elf.section_name(&shdrs[0]).unwrap(), "");
        assert_eq!(elf.section_name(&shdrs[1]).unwrap(), ".text");
        assert_eq!(elf.section_name(&shdrs[2]).unwrap(), ".shstrtab");
    }

    #[test]
    fn sentinel_string_table_index_fails_gracefully() {
        let mut buf = sample_elf(Endian::Little);
        buf[62..64].copy_from_slice(&SHN_XINDEX.to_le_bytes()); // e_shstrndx
        let elf = ELF64::parse(&buf).unwrap();
        let shdrs = elf.sections().unwrap();
        let err = elf.section_name(&shdrs[1]).unwrap_err();
        assert_eq!(err.kind(), ERErrKind::NoStringTable);
    }

    #[test]
    fn name_offset_beyond_string_table() {
        let buf = sample_elf(Endian::Little);
        let elf = ELF64::parse(&buf).unwrap();
        let bogus = Elf64_Shdr {
            sh_name: 100,
            ..Default::default()
        };
        let err = elf.section_name(&bogus).unwrap_err();
        assert_eq!(err.kind(), ERErrKind::NameOffsetOutOfBounds);
    }

    #[test]
    fn missing_nul_terminator_is_not_truncated() {
        let mut buf = sample_elf(Endian::Little);
        // shrink .shstrtab's declared size so ".text" loses its terminator
        let size_at = SHOFF as usize + 2 * 64 + 32;
        buf[size_at..size_at + 8].copy_from_slice(&6u64.to_le_bytes());
        let elf = ELF64::parse(&buf).unwrap();
        let shdrs = elf.sections().unwrap();
        let err = elf.section_name(&shdrs[1]).unwrap_err();
        assert_eq!(err.kind(), ERErrKind::UnterminatedString);
    }

    #[test]
    fn header_size_mismatch_is_not_fatal() {
        let mut buf = sample_elf(Endian::Little);
        buf[52..54].copy_from_slice(&72u16.to_le_bytes()); // e_ehsize
        assert!(ELF64::parse(&buf).is_ok());
    }

    #[test]
    fn undersized_entry_stride_is_not_interpreted() {
        let mut buf = sample_elf(Endian::Little);
        buf[58..60].copy_from_slice(&32u16.to_le_bytes()); // e_shentsize
        let elf = ELF64::parse(&buf).unwrap();
        let err = elf.sections().unwrap_err();
        assert_eq!(err.kind(), ERErrKind::OutOfBounds);
    }

    #[test]
    fn elf_type_ranges() {
        assert_eq!(ElfType::from_u16(3), ElfType::Shared);
        assert_eq!(ElfType::from_u16(4), ElfType::Core);
        assert_eq!(ElfType::from_u16(0xFE10), ElfType::OsSpecific(0xFE10));
        assert_eq!(ElfType::from_u16(0xFF00), ElfType::ProcessorSpecific(0xFF00));
        assert_eq!(ElfType::from_u16(5), ElfType::Unrecognized(5));
        assert_eq!(ElfType::from_u16(0x1000), ElfType::Unrecognized(0x1000));
    }
}
