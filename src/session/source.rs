//! Log Sources
//!
//! How the session runner turns a source name into a readable stream.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::debug;

/// Name that selects standard input instead of a file
pub const STDIN_SOURCE: &str = "-";

/// Opens named log sources for reading
pub trait LogSource {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>>;
}

impl<T: LogSource + ?Sized> LogSource for &T {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>> {
        (**self).open(name)
    }
}

/// Sources are paths on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl LogSource for FileSource {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>> {
        if name == STDIN_SOURCE {
            debug!("Reading log from standard input");
            return Ok(Box::new(BufReader::new(io::stdin())));
        }

        let file = File::open(name)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
