use crate::prelude::*;
use log::debug;
use std::{fmt::Display, path::Path};
use thiserror::Error;

mod gsd_handler;
mod xml_handler;

use gsd_handler::GsdHandlerError;
use xml_handler::XmlHandlerError;

// Reexports
pub use gsd_handler::{GsdChunk, GsdFileHandler, GsdType};
pub use xml_handler::XmlFileHandler;

//================================
// General type for file handlers
//================================

// There are two kinds of supported files:
// (1)  Single configuration in HOOMD XML
// (2)  Frame-indexed snapshots in GSD
// Both produce the complete SystemStorage at once.

pub struct FileHandler {
    pub file_name: String,
    format_handler: FileFormat,
    pub stats: FileStats,
}

enum FileFormat {
    Xml(XmlFileHandler),
    Gsd(GsdFileHandler),
}

impl FileFormat {
    pub fn open(fname: &Path) -> Result<Self, FileFormatError> {
        let ext = get_ext(fname)?;
        if ext.contains("xml") {
            Ok(FileFormat::Xml(XmlFileHandler::open(fname)?))
        } else if ext.contains("gsd") {
            Ok(FileFormat::Gsd(GsdFileHandler::open(fname)?))
        } else {
            Err(FileFormatError::NotReadable(ext.to_owned()))
        }
    }

    pub fn read(&mut self, frame: usize) -> Result<SystemStorage, FileFormatError> {
        let data = match self {
            FileFormat::Xml(ref mut h) => h.read(frame)?,
            FileFormat::Gsd(ref mut h) => h.read(frame)?,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn num_frames(&self) -> usize {
        match self {
            FileFormat::Xml(_) => 1,
            FileFormat::Gsd(ref h) => h.num_frames(),
        }
    }
}

#[derive(Default, Debug, Clone)]
pub struct FileStats {
    pub elapsed_time: std::time::Duration,
    pub frames_processed: usize,
}

impl Display for FileStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "IO time {:.4}s, {} frames",
            self.elapsed_time.as_secs_f32(),
            self.frames_processed,
        )
    }
}

pub fn get_ext(fname: &Path) -> Result<&str, FileFormatError> {
    // Get extention
    fname
        .extension()
        .ok_or_else(|| FileFormatError::NoExtension)?
        .to_str()
        .ok_or_else(|| FileFormatError::NoExtension)
}

//------------------------------------------------------------------

impl FileHandler {
    pub fn open(fname: impl AsRef<Path>) -> Result<Self, FileIoError> {
        let fname = fname.as_ref();
        let file_name = fname.display().to_string();
        Ok(Self {
            format_handler: FileFormat::open(fname)
                .map_err(|e| FileIoError(file_name.to_owned(), e))?,
            file_name,
            stats: Default::default(),
        })
    }

    /// Reads the system at given frame. Single-frame formats ignore `frame`.
    pub fn read(&mut self, frame: usize) -> Result<SystemStorage, FileIoError> {
        let t = std::time::Instant::now();

        let data = self
            .format_handler
            .read(frame)
            .map_err(|e| FileIoError(self.file_name.to_owned(), e))?;

        self.stats.elapsed_time += t.elapsed();
        self.stats.frames_processed += 1;

        Ok(data)
    }

    pub fn num_frames(&self) -> usize {
        self.format_handler.num_frames()
    }
}

impl Drop for FileHandler {
    fn drop(&mut self) {
        debug!("Done with file '{}': {}", self.file_name, self.stats);
    }
}

//--------------------------------------------------------
#[derive(Error, Debug)]
#[error("in file {0}:")]
pub struct FileIoError(String, #[source] FileFormatError);

impl FileIoError {
    pub fn file_name(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> &FileFormatError {
        &self.1
    }
}

#[derive(Error, Debug)]
pub enum FileFormatError {
    #[error("in xml format handler")]
    Xml(#[from] XmlHandlerError),

    #[error("in gsd format handler")]
    Gsd(#[from] GsdHandlerError),

    #[error("file has no extension")]
    NoExtension,

    #[error("format '{0}' is not recognized as readable")]
    NotReadable(String),

    #[error(transparent)]
    Inconsistent(#[from] ConsistencyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extension() {
        let res = FileHandler::open("tests/protein.pdb");
        let err = res.err().unwrap();
        assert_eq!(err.file_name(), "tests/protein.pdb");
        assert!(matches!(err.kind(), FileFormatError::NotReadable(e) if e == "pdb"));
    }

    #[test]
    fn no_extension() {
        let err = FileHandler::open("tests/config").err().unwrap();
        assert!(matches!(err.kind(), FileFormatError::NoExtension));
    }

    #[test]
    fn gsd_through_file_handler() -> anyhow::Result<()> {
        let mut w = gsd_handler::tests::GsdWriter::new(2);
        w.u32s(0, "particles/N", 1, &[3])
            .names(0, "particles/types", &["O", "H"])
            .u32s(0, "particles/typeid", 1, &[0, 1, 1])
            .u32s(0, "bonds/N", 1, &[2])
            .names(0, "bonds/types", &["O-H"])
            .u32s(0, "bonds/group", 2, &[0, 1, 0, 2]);
        let path = std::env::temp_dir().join(format!("hoomd_reader_{}.gsd", std::process::id()));
        std::fs::write(&path, w.build())?;

        let mut fh = FileHandler::open(&path)?;
        assert_eq!(fh.num_frames(), 1);
        let st = fh.read(0)?;
        assert_eq!(fh.stats.frames_processed, 1);
        drop(fh);
        std::fs::remove_file(&path)?;

        assert_eq!(st.types, vec!["O", "H", "H"]);
        assert_eq!(st.bonds[1], Bond::new("O-H", [0, 2]));
        Ok(())
    }

    #[test]
    #[should_panic]
    fn invalid_file() {
        let mut fh = FileHandler::open("nonexisting.hoomdxml").unwrap();
        fh.read(0).unwrap();
    }
}
