//! Separated data / plot pipeline.
//!
//! Usage
//! -----
//!
//! A [`DataPlot`] owns a [`PlotRecord`]: the axis properties, data
//! series and key / value annotations of one plot.  Fill it, then
//! export it with [`DataPlot::save_plot`], optionally giving a builder
//! drawing the figure from the record.  The record itself can be
//! exported as JSON so that the plot can be redrawn, or the data
//! reused, without rerunning the code that generated it.
//!
//! Figures are drawn by a [`Renderer`].  With the `matplotlib` feature
//! (enabled by default), [`Pyplot`] uses [Matplotlib][] through Python.
//!
//! [Matplotlib]: https://matplotlib.org/

mod dataplot;
mod error;
mod format;
mod record;
mod render;
#[cfg(feature = "matplotlib")]
mod pyplot;

pub use dataplot::{DataPlot, SavePlot};
pub use error::{Error, Result};
pub use format::Format;
pub use record::{PlotRecord, RELATION};
pub use render::{NoRenderer, Renderer};
#[cfg(feature = "matplotlib")]
pub use pyplot::{Data, Pyplot, Style};

#[cfg(all(doctest, feature = "matplotlib"))]
doc_comment::doctest!("../README.md");
