//! HTTP fetching of static data files.

use std::{fs, io, path::Path};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Download `url` into `out_path` with a tempfile-then-rename write, so a
/// failed transfer never leaves a truncated file behind. Refuses to
/// overwrite an existing file unless `force` is set.
pub fn fetch_data_file(url: &str, out_path: &Path, force: bool) -> Result<()> {
    if !force && out_path.exists() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("refusing to overwrite existing file: {}", out_path.display()),
        )));
    }

    let parent = out_path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = NamedTempFile::new_in(parent.unwrap_or(Path::new(".")))?;

    let mut response = reqwest::blocking::get(url)
        .map_err(|e| Error::load("remote file", url, e))?
        .error_for_status()
        .map_err(|e| Error::load("remote file", url, e))?;

    io::copy(&mut response, &mut tmp)?;
    tmp.persist(out_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!(url, path = %out_path.display(), "downloaded data file");
    Ok(())
}
