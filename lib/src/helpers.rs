use std::fs::{self, DirEntry, ReadDir};
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

pub fn read_data_dir(data_path: PathBuf) -> Result<ReadDir> {
    let data_path = fs::canonicalize(data_path)?;
    let entries = fs::read_dir(data_path)?;

    Ok(entries)
}

pub fn read_dir_entry_document(dir_entry: DirEntry) -> Result<String> {
    if dir_entry.file_type()?.is_dir() {
        bail!("{} is a directory", dir_entry.path().display());
    };

    read_document(&dir_entry.path())
}

pub fn read_document(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

pub fn write_data(path: PathBuf, data: String) -> Result<()> {
    fs::write(path, format!("{data}\n"))?;

    Ok(())
}
