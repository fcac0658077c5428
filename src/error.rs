use thiserror::Error;

#[cfg(feature = "matplotlib")]
use pyo3::PyErr;

/// Possible errors when exporting a plot.
#[derive(Debug, Error)]
pub enum Error {
    /// The Python library "matplotlib" was not found.
    #[error("The matplotlib library has not been found.\n\
             Please install it.  See https://matplotlib.org/\n\
             If you use Anaconda, see https://github.com/PyO3/pyo3/issues/1554")]
    NoMatplotlib,
    /// The path contains an element that is not a directory or does
    /// not exist.
    #[error("A path contains an element that is not a directory or does \
             not exist")]
    FileNotFound,
    /// Permission denied to access or create the filesystem path.
    #[error("Permission denied to access or create the filesystem path")]
    Permission,
    /// Other Python errors.
    #[cfg(feature = "matplotlib")]
    #[error("Python error: {0}")]
    Python(#[from] PyErr),
    /// Creating the output directory or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The record could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A renderer other than Matplotlib failed.
    #[error("Rendering failed: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, Error>;
