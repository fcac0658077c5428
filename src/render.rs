//! The plotting side: whatever holds the "current figure".

use std::path::Path;
use crate::error::{Error, Result};

/// A plotting backend holding a current figure.
///
/// The builder callback given to [`SavePlot::builder`][crate::SavePlot::builder]
/// draws on it, then [`SavePlot::export`][crate::SavePlot::export]
/// saves and/or shows the result.  Backends such as Matplotlib keep
/// the current figure process-wide, so a renderer must not be driven
/// from several threads at once; taking `&mut self` enforces it on the
/// Rust side.
pub trait Renderer {
    /// Save the current figure to `path`.  The file format is chosen
    /// by the backend, usually from the extension of `path`.
    fn save(&mut self, path: &Path) -> Result<()>;

    /// Display the current figure interactively.
    fn show(&mut self) -> Result<()>;
}

impl<R> Renderer for &mut R
where R: Renderer + ?Sized {
    fn save(&mut self, path: &Path) -> Result<()> {
        (**self).save(path)
    }

    fn show(&mut self) -> Result<()> {
        (**self).show()
    }
}

/// A renderer without any figure.  Enough to export the `json`
/// format; every other format fails with [`Error::Render`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRenderer;

impl Renderer for NoRenderer {
    fn save(&mut self, path: &Path) -> Result<()> {
        Err(Error::Render(format!("no figure to save to {}", path.display())))
    }

    fn show(&mut self) -> Result<()> {
        Err(Error::Render("no figure to show".to_owned()))
    }
}
