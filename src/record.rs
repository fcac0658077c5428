//! The data half of a plot.

use std::{collections::BTreeMap, io::Read};
use chrono::Local;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use serde_json::{
    ser::PrettyFormatter,
    Map, Serializer, Value,
};
use crate::error::{Error, Result};

/// Stored under `_metadata.relation` to explain the JSON layout to
/// whoever finds the file later.
pub const RELATION: &str =
    concat!("https://docs.rs/dataplot/", env!("CARGO_PKG_VERSION"));

/// Layout of `generated`, the one of C's `asctime`.
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Everything needed to draw a plot, and nothing about how it is
/// drawn.
///
/// Serialized as a JSON object with the keys `_metadata`, `ax`, `ds`
/// and `kv`.  All maps are ordered so the output is deterministic.
///
/// # Example
///
/// ```
/// use dataplot::PlotRecord;
/// use serde_json::json;
/// let mut r = PlotRecord::new();
/// r.set_series("x", (0 .. 10).collect::<Vec<_>>());
/// r.set_axis("x", "title", "X units");
/// r.set_title("The Plot");
/// r.annotate("r2", 0.2);
/// assert_eq!(r.axes["x"], json!({"title": "X units"}));
/// assert_eq!(r.series_f64("x").unwrap()[9], 9.);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRecord {
    /// Author information, description, generation time,...
    #[serde(rename = "_metadata")]
    pub metadata: BTreeMap<String, Value>,
    /// Plot wide properties (title,...) and one object per axis,
    /// keyed by the axis name.
    #[serde(rename = "ax")]
    pub axes: BTreeMap<String, Value>,
    /// Data series.  Series plotted together are expected to have the
    /// same length; this is not checked.
    #[serde(rename = "ds")]
    pub series: BTreeMap<String, Vec<Value>>,
    /// Arbitrary key / value information.
    #[serde(rename = "kv")]
    pub annotations: BTreeMap<String, Value>,
}

impl Default for PlotRecord {
    fn default() -> Self { Self::new() }
}

impl PlotRecord {
    /// Return an empty record whose metadata holds the generation
    /// time and the [`RELATION`] pointer.
    pub fn new() -> PlotRecord {
        let mut metadata = BTreeMap::new();
        metadata.insert("generated".to_owned(),
                        Local::now().format(ASCTIME).to_string().into());
        metadata.insert("relation".to_owned(), RELATION.into());
        PlotRecord { metadata,
                     axes: BTreeMap::new(),
                     series: BTreeMap::new(),
                     annotations: BTreeMap::new() }
    }

    /// Add (or replace) a metadata entry, e.g. `creator`.
    pub fn describe(&mut self, key: &str, v: impl Into<Value>) -> &mut Self {
        self.metadata.insert(key.to_owned(), v.into());
        self
    }

    /// Properties of `axis`, an object created empty on first access,
    /// so that `r.axis_mut("x")["title"] = ...` works.  A plot-wide
    /// property of the same name is replaced.
    pub fn axis_mut(&mut self, axis: &str) -> &mut Value {
        let slot = self.axes.entry(axis.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        slot
    }

    pub fn set_axis(&mut self, axis: &str, key: &str, v: impl Into<Value>)
                    -> &mut Self {
        self.axis_mut(axis)[key] = v.into();
        self
    }

    pub fn set_title(&mut self, title: impl Into<Value>) -> &mut Self {
        self.axes.insert("title".to_owned(), title.into());
        self
    }

    pub fn set_series<I, V>(&mut self, name: &str, values: I) -> &mut Self
    where I: IntoIterator<Item = V>,
          V: Into<Value> {
        self.series.insert(name.to_owned(),
                           values.into_iter().map(Into::into).collect());
        self
    }

    pub fn series(&self, name: &str) -> Option<&[Value]> {
        self.series.get(name).map(|s| s.as_slice())
    }

    /// Return the series `name` as floats, or `None` if it does not
    /// exist or holds a non-numeric value.
    pub fn series_f64(&self, name: &str) -> Option<Vec<f64>> {
        self.series.get(name)?.iter().map(Value::as_f64).collect()
    }

    /// Same as [`PlotRecord::series_f64`] as an ndarray vector.
    pub fn series_array(&self, name: &str) -> Option<Array1<f64>> {
        self.series_f64(name).map(Array1::from)
    }

    pub fn annotate(&mut self, key: &str, v: impl Into<Value>) -> &mut Self {
        self.annotations.insert(key.to_owned(), v.into());
        self
    }

    pub fn annotation(&self, key: &str) -> Option<&Value> {
        self.annotations.get(key)
    }

    /// Pretty JSON with a one space indent.  Keys are sorted at every
    /// level.
    pub fn to_json_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_json(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| Error::Json(serde::ser::Error::custom(e)))
    }

    pub(crate) fn write_json<W: std::io::Write>(&self, w: W) -> Result<()> {
        let mut ser = Serializer::with_formatter(
            w, PrettyFormatter::with_indent(b" "));
        self.serialize(&mut ser)?;
        Ok(())
    }

    /// Load a record previously exported with the `json` format.
    pub fn from_json_str(s: &str) -> Result<PlotRecord> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(r: R) -> Result<PlotRecord> {
        Ok(serde_json::from_reader(r)?)
    }
}
