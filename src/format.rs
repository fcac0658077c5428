use std::{
    convert::Infallible,
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Output requested from [`SavePlot`][crate::SavePlot].
///
/// Tags are plain strings on the outside: `"show"`, `"json"`, `"asis"`
/// and anything else, which is taken as an image file extension and
/// handed to the renderer untouched (so `"png"`, `"pdf"`, `"svg"`,...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Format {
    /// Display the figure interactively, once, after every file has
    /// been written.
    Show,
    /// Dump the [`PlotRecord`][crate::PlotRecord], not the figure.
    Json,
    /// Save the figure under the plot name verbatim; the name carries
    /// the extension.
    AsIs,
    /// Save the figure with this extension appended to the plot name.
    Image(String),
}

impl Format {
    /// Return `true` if the format produces a file.
    pub fn is_file(&self) -> bool {
        !matches!(self, Format::Show)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Format::Show => "show",
            Format::Json => "json",
            Format::AsIs => "asis",
            Format::Image(ext) => ext.as_str(),
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Format::from(s))
    }
}

impl From<&str> for Format {
    fn from(s: &str) -> Self {
        match s {
            "show" => Format::Show,
            "json" => Format::Json,
            "asis" => Format::AsIs,
            ext => Format::Image(ext.to_owned()),
        }
    }
}

impl From<String> for Format {
    fn from(s: String) -> Self {
        match s.as_str() {
            "show" | "json" | "asis" => Format::from(s.as_str()),
            _ => Format::Image(s),
        }
    }
}

impl From<&String> for Format {
    fn from(s: &String) -> Self {
        Format::from(s.as_str())
    }
}
