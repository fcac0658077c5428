//! [`Renderer`] drawing with Matplotlib's `pyplot` interface.
//!
//! `pyplot` keeps a process-wide current figure: the methods of
//! [`Pyplot`] draw on it and [`Renderer::save`] saves it.

use std::path::Path;
use lazy_static::lazy_static;
use ndarray::{ArrayBase, Ix1};
use numpy::PyArray1;
use pyo3::{
    prelude::*,
    intern,
    exceptions::{PyFileNotFoundError, PyPermissionError},
    types::{PyDict, PyModule, PyTuple},
};
use tracing::debug;
use crate::{
    error::{Error, Result},
    render::Renderer,
};

/// Import and return a handle to the module `$m`.
macro_rules! pyimport { ($m: literal) => {
    Python::with_gil(|py|
        PyModule::import_bound(py, $m).map(Bound::unbind))
}}

lazy_static! {
    static ref MATPLOTLIB: std::result::Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib")
    };
    static ref PYPLOT: std::result::Result<Py<PyModule>, PyErr> = {
        pyimport!("matplotlib.pyplot")
    };
}

/// Return a handle to the module `$m`.
/// ⚠ This may try to lock Python's GIL.  Make sure it is executed
/// outside a call to `Python::with_gil`.
macro_rules! pymod { ($m: ident) => {
    $m.as_ref().map_err(|_| Error::NoMatplotlib)
}}

/// Numeric data that can be handed to Matplotlib as a numpy array.
pub trait Data {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>>;
}

impl Data for [f64] {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        PyArray1::from_slice_bound(py, self)
    }
}

impl Data for Vec<f64> {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.as_slice().to_numpy(py)
    }
}

impl<const N: usize> Data for [f64; N] {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        self.as_slice().to_numpy(py)
    }
}

impl<S> Data for ArrayBase<S, Ix1>
where S: ndarray::Data<Elem = f64> {
    fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        PyArray1::from_array_bound(py, self)
    }
}

/// Global Matplotlib settings applied by [`Pyplot::with_style`].
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    backend: Option<String>,
    font_family: Vec<String>,
    solid_joinstyle: Option<String>,
}

impl Default for Style {
    /// Matplotlib's default backend, "DejaVu Sans, Arial" fonts and
    /// bevel joins for solid lines.
    fn default() -> Self {
        Style { backend: None,
                font_family: vec!["DejaVu Sans".into(), "Arial".into()],
                solid_joinstyle: Some("bevel".into()) }
    }
}

impl Style {
    /// Matplotlib backend, e.g. "svg" or "agg" to work without a
    /// display.  Interactive backends are needed for `show`.
    #[must_use]
    pub fn backend(mut self, backend: &str) -> Self {
        self.backend = Some(backend.to_owned());
        self
    }

    /// Font families, in order of preference.  An empty list keeps
    /// Matplotlib's setting.
    #[must_use]
    pub fn font_family<I, S>(mut self, families: I) -> Self
    where I: IntoIterator<Item = S>,
          S: Into<String> {
        self.font_family = families.into_iter().map(Into::into).collect();
        self
    }

    /// One of "miter", "round", "bevel".
    #[must_use]
    pub fn solid_joinstyle(mut self, style: &str) -> Self {
        self.solid_joinstyle = Some(style.to_owned());
        self
    }

    fn apply(&self, mpl: &Bound<'_, PyModule>) -> PyResult<()> {
        let py = mpl.py();
        if let Some(backend) = &self.backend {
            mpl.call_method1(intern!(py, "use"), (backend.as_str(),))?;
        }
        let rc = mpl.getattr(intern!(py, "rcParams"))?;
        if !self.font_family.is_empty() {
            rc.set_item("font.family", self.font_family.clone())?;
        }
        if let Some(js) = &self.solid_joinstyle {
            rc.set_item("lines.solid_joinstyle", js.as_str())?;
        }
        Ok(())
    }
}

/// Handle to `matplotlib.pyplot`.
///
/// # Example
///
/// ```no_run
/// use dataplot::{Pyplot, Renderer};
/// let mut plt = Pyplot::new()?;
/// plt.plot(&[1., 2., 3., 4.], &[1., 4., 2., 3.], "r.")?
///     .title("Basic")?;
/// plt.save("target/basic.pdf".as_ref())?;
/// # Ok::<(), dataplot::Error>(())
/// ```
#[derive(Debug)]
pub struct Pyplot {
    pyplot: &'static Py<PyModule>,
    dpi: Option<f64>,
}

impl Pyplot {
    /// Return a handle using the default [`Style`].
    ///
    /// Return an error if Matplotlib is not present on the system.
    pub fn new() -> Result<Pyplot> {
        Self::with_style(Style::default())
    }

    pub fn with_style(style: Style) -> Result<Pyplot> {
        let mpl = pymod!(MATPLOTLIB)?;
        Python::with_gil(|py| style.apply(mpl.bind(py)))?;
        let pyplot = pymod!(PYPLOT)?;
        debug!(?style, "matplotlib ready");
        Ok(Pyplot { pyplot, dpi: None })
    }

    /// Resolution of saved raster images.  A non-positive value
    /// restores Matplotlib's default.
    pub fn dpi(&mut self, dpi: f64) -> &mut Self {
        self.dpi = if dpi > 0. { Some(dpi) } else { None };
        self
    }

    fn call<A>(&mut self, name: &str, args: A) -> Result<&mut Self>
    where A: IntoPy<Py<PyTuple>> {
        Python::with_gil(|py| {
            self.pyplot.bind(py).call_method1(name, args).map(|_| ())
        })?;
        Ok(self)
    }

    /// Plot `y` versus `x` with the format string `fmt` (e.g. "r.",
    /// "" for the default style).
    pub fn plot<D>(&mut self, x: &D, y: &D, fmt: &str) -> Result<&mut Self>
    where D: Data + ?Sized {
        Python::with_gil(|py| {
            let (xn, yn) = (x.to_numpy(py), y.to_numpy(py));
            self.pyplot.bind(py)
                .call_method1(intern!(py, "plot"), (xn, yn, fmt))
                .map(|_| ())
        })?;
        Ok(self)
    }

    pub fn xlabel(&mut self, label: &str) -> Result<&mut Self> {
        self.call("xlabel", (label,))
    }

    pub fn ylabel(&mut self, label: &str) -> Result<&mut Self> {
        self.call("ylabel", (label,))
    }

    pub fn title(&mut self, title: &str) -> Result<&mut Self> {
        self.call("title", (title,))
    }

    /// Add the text `s` at the data coordinates (`x`, `y`).
    pub fn text(&mut self, x: f64, y: f64, s: &str) -> Result<&mut Self> {
        self.call("text", (x, y, s))
    }

    pub fn grid(&mut self) -> Result<&mut Self> {
        self.call("grid", (true,))
    }

    pub fn legend(&mut self) -> Result<&mut Self> {
        self.call("legend", ())
    }

    /// Clear the current figure.
    pub fn clf(&mut self) -> Result<&mut Self> {
        self.call("clf", ())
    }
}

impl Renderer for Pyplot {
    fn save(&mut self, path: &Path) -> Result<()> {
        Python::with_gil(|py| {
            let kwargs = PyDict::new_bound(py);
            if let Some(dpi) = self.dpi {
                kwargs.set_item("dpi", dpi)?;
            }
            self.pyplot.bind(py).call_method(
                intern!(py, "savefig"), (path,), Some(&kwargs)
            ).map_err(|e| {
                if e.is_instance_of::<PyFileNotFoundError>(py) {
                    Error::FileNotFound
                } else if e.is_instance_of::<PyPermissionError>(py) {
                    Error::Permission
                } else {
                    Error::Python(e)
                }
            })?;
            Ok(())
        })
    }

    fn show(&mut self) -> Result<()> {
        Python::with_gil(|py| {
            self.pyplot.bind(py).call_method0(intern!(py, "show")).map(|_| ())
        })?;
        Ok(())
    }
}
