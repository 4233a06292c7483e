use std::{fs::File, io::Read, path::Path};

use super::ERError;

/// Reads a whole file into memory. The decoders in `file_struct` never touch
/// the filesystem themselves, they only see the returned buffer.
#[derive(Debug)]
pub struct ERFile {
    path    : String,
    file    : File
}

impl ERFile {
    pub fn new<P>(p: P) -> Result<ERFile, ERError>
    where P: AsRef<Path> + ToString {
        let s = p.to_string();
        let f = File::open(p);
        let f = match f {
            Ok(file) => file,
            Err(err) => {
                return Err(ERError::from(Box::new(err)));
            }
        };
        Ok(ERFile {
            path: s,
            file: f,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn read_all(&mut self) -> Result<Vec<u8>, ERError> {
        let mut result = Vec::new();
        if let Err(e) = self.file.read_to_end(&mut result) {
            return Err(ERError::from(Box::new(e)));
        }
        Ok(result)
    }
}

pub fn filesize_to_human_string(size: usize) -> String {
    let result;
    if size > 1024 * 1024 {
        let human_size = size as f64 / (1024 * 1024) as f64;
        result = format!("{:.2} MB", human_size);
    } else if size > 1024 {
        let human_size = size as f64 / 1024.0;
        result = format!("{:.2} KB", human_size);
    } else {
        result = format!("{} B", size);
    }

    result
}
