use std::fs::{read, read_to_string, File};
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::defs::{IntoResult, Result};

fn path_desc(action: &str, path: &Path) -> String {
    if let Some(path) = path.to_str() {
        format!("failed to {} file '{}'", action, path)
    } else {
        format!("failed to {} file", action)
    }
}

pub fn open_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    File::open(path).res(|| path_desc("open", path))
}

pub fn create_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    File::create(path).res(|| path_desc("create", path))
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();
    read(path).res(|| path_desc("read", path))
}

pub fn read_file_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    read_to_string(path).res(|| path_desc("read", path))
}

pub fn read_json_file<T: DeserializeOwned, P: AsRef<Path>>(
    path: P,
) -> Result<T> {
    let path = path.as_ref();
    let reader = BufReader::new(open_file(path)?);
    serde_json::from_reader(reader).res(|| path_desc("parse JSON", path))
}
