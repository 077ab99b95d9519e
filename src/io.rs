use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> Error + '_ {
    move |source| Error::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn json_error(path: &Path) -> impl FnOnce(serde_json::Error) -> Error + '_ {
    move |source| Error::Json {
        path: path.to_path_buf(),
        source,
    }
}

/// Read and parse a JSON document, streaming from a buffered file reader
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).map_err(io_error(path))?;
    let document = serde_json::from_reader(BufReader::new(file)).map_err(json_error(path))?;
    info!("Loaded {}", path.display());
    Ok(document)
}

/// Write a JSON document.
///
/// The document goes to a sibling `.tmp` file first and is renamed into
/// place once fully flushed, so `path` never holds a partial document.
pub fn save_json<T: Serialize>(document: &T, path: &Path) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let written = (|| -> Result<()> {
        let file = File::create(&tmp_path).map_err(io_error(&tmp_path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, document).map_err(json_error(&tmp_path))?;
        writer.flush().map_err(io_error(&tmp_path))?;
        fs::rename(&tmp_path, path).map_err(io_error(path))
    })();

    if written.is_err() {
        debug!("Removing partial output {}", tmp_path.display());
        let _ = fs::remove_file(&tmp_path);
    }
    written?;

    info!("Wrote {}", path.display());
    Ok(())
}

/// Create the output directory if missing, keeping any existing contents
pub fn ensure_output_directory(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        debug!("Creating output directory {}", path.display());
    }
    fs::create_dir_all(path).map_err(io_error(path))?;
    Ok(path.to_path_buf())
}
