use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info};
use crate::{
    error::Result,
    format::Format,
    record::PlotRecord,
    render::Renderer,
};

/// A plot whose data ([`PlotRecord`]) is kept apart from the code
/// drawing it.
#[derive(Debug, Clone)]
pub struct DataPlot {
    name: String,
    record: PlotRecord,
}

type Builder<'a, R> =
    Box<dyn FnOnce(&mut PlotRecord, &mut R) -> Result<()> + 'a>;

/// Options of [`DataPlot::save_plot`].  Nothing happens until
/// [`SavePlot::export`] is called.
#[must_use]
pub struct SavePlot<'a, R> {
    record: &'a mut PlotRecord,
    name: &'a str,
    builder: Option<Builder<'a, R>>,
    path: PathBuf,
    formats: Vec<Format>,
}

impl DataPlot {
    /// Return a plot with an empty record.  `name` is the basename of
    /// the exported files.
    pub fn new(name: impl Into<String>) -> DataPlot {
        DataPlot { name: name.into(), record: PlotRecord::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record(&self) -> &PlotRecord {
        &self.record
    }

    /// The data container, to be filled before exporting.
    pub fn record_mut(&mut self) -> &mut PlotRecord {
        &mut self.record
    }

    /// Export the plot.  By default the figure is shown
    /// interactively; see [`SavePlot`] for the options.
    ///
    /// # Example
    ///
    /// ```
    /// use dataplot::{DataPlot, NoRenderer};
    /// let mut dp = DataPlot::new("doc_example");
    /// dp.record_mut().set_series("x", [1., 2., 3.]);
    /// dp.save_plot()
    ///     .path("target/doc")
    ///     .formats(["json"])
    ///     .export(&mut NoRenderer)?;
    /// assert!(std::path::Path::new("target/doc/doc_example.json").exists());
    /// # Ok::<(), dataplot::Error>(())
    /// ```
    pub fn save_plot<R: Renderer>(&mut self) -> SavePlot<'_, R> {
        SavePlot { record: &mut self.record,
                   name: &self.name,
                   builder: None,
                   path: PathBuf::from("."),
                   formats: vec![] }
    }
}

impl<'a, R: Renderer> SavePlot<'a, R> {
    /// Draw the figure with `f` before it is saved or shown.  `f` is
    /// not called when the formats are exactly `["json"]`.
    pub fn builder<F>(mut self, f: F) -> Self
    where F: FnOnce(&mut PlotRecord, &mut R) -> Result<()> + 'a {
        self.builder = Some(Box::new(f));
        self
    }

    /// Directory receiving the files.  Default: `.`.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.path = if path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            path.to_path_buf()
        };
        self
    }

    /// Formats to export, in order.  An empty list means `["show"]`.
    pub fn formats<I, F>(mut self, formats: I) -> Self
    where I: IntoIterator<Item = F>,
          F: Into<Format> {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Basename of the files, overriding the plot name.  An empty
    /// name keeps the plot name.
    pub fn name(mut self, name: &'a str) -> Self {
        if !name.is_empty() {
            self.name = name;
        }
        self
    }

    /// Run the builder (if any), write one file per format, then show
    /// the figure if `show` was requested.  The first failure stops
    /// the export.
    pub fn export(self, renderer: &mut R) -> Result<()> {
        let SavePlot { record, name, builder, path, mut formats } = self;
        if formats.is_empty() {
            formats.push(Format::Show);
        }
        if let Some(build) = builder {
            // The figure is useless for the data alone.
            if formats != [Format::Json] {
                build(&mut *record, &mut *renderer)?;
            }
        }
        let record: &PlotRecord = record;
        for format in formats.iter().filter(|f| f.is_file()) {
            let file = target(&path, name, format)?;
            match format {
                Format::Json => {
                    let mut out = BufWriter::new(File::create(&file)?);
                    record.write_json(&mut out)?;
                    out.flush()?;
                }
                _ => renderer.save(&file)?,
            }
            debug!(file = %file.display(), %format, "plot saved");
        }
        if formats.contains(&Format::Show) {
            debug!(name, "showing plot");
            renderer.show()?;
        }
        info!(name, path = %path.display(), n = formats.len(), "plot exported");
        Ok(())
    }
}

/// Path of the file for `format`, creating `dir` if needed.
fn target(dir: &Path, name: &str, format: &Format) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(match format {
        Format::AsIs => dir.join(name),
        _ => dir.join(format!("{name}.{format}")),
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::{json, Value};

    #[derive(Debug, PartialEq)]
    enum Event {
        Build,
        Save(PathBuf),
        Show,
    }

    /// Records the calls it receives.  When `touch` is set, `save`
    /// also creates an empty file, as a real backend would.
    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
        touch: bool,
        fail_save: bool,
    }

    impl Renderer for Recorder {
        fn save(&mut self, path: &Path) -> Result<()> {
            if self.fail_save {
                return Err(Error::Render("no figure".into()));
            }
            if self.touch {
                File::create(path)?;
            }
            self.events.push(Event::Save(path.to_path_buf()));
            Ok(())
        }

        fn show(&mut self) -> Result<()> {
            self.events.push(Event::Show);
            Ok(())
        }
    }

    fn build(_: &mut PlotRecord, r: &mut Recorder) -> Result<()> {
        r.events.push(Event::Build);
        Ok(())
    }

    fn out_dir(test: &str) -> PathBuf {
        let dir = Path::new("target/dataplot-tests").join(test);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn json_only_skips_builder() -> Result<()> {
        let dir = out_dir("json_only");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        dp.save_plot().builder(build).path(&dir).formats(["json"])
            .export(&mut r)?;
        assert!(r.events.is_empty());
        let v: Value = serde_json::from_str(
            &fs::read_to_string(dir.join("fred.json"))?)?;
        let keys: Vec<_> = v.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["_metadata", "ax", "ds", "kv"]);
        Ok(())
    }

    #[test]
    fn builder_runs_once_before_saving() -> Result<()> {
        let dir = out_dir("builder_once");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        dp.save_plot().builder(build).path(&dir)
            .formats(["png", "json", "pdf"])
            .export(&mut r)?;
        assert_eq!(r.events, [Event::Build,
                              Event::Save(dir.join("fred.png")),
                              Event::Save(dir.join("fred.pdf"))]);
        assert!(dir.join("fred.json").exists());
        Ok(())
    }

    #[test]
    fn repeated_json_still_builds() -> Result<()> {
        let dir = out_dir("json_json");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        dp.save_plot().builder(build).path(&dir).formats(["json", "json"])
            .export(&mut r)?;
        assert_eq!(r.events, [Event::Build]);
        Ok(())
    }

    #[test]
    fn show_is_last_and_once() -> Result<()> {
        let dir = out_dir("show_last");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        dp.save_plot().builder(build).path(&dir)
            .formats(["show", "png", "show"])
            .export(&mut r)?;
        assert_eq!(r.events, [Event::Build,
                              Event::Save(dir.join("fred.png")),
                              Event::Show]);
        Ok(())
    }

    #[test]
    fn default_is_show() -> Result<()> {
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        dp.save_plot().builder(build).export(&mut r)?;
        assert_eq!(r.events, [Event::Build, Event::Show]);
        let mut r = Recorder::default();
        dp.save_plot().formats(Vec::<Format>::new()).export(&mut r)?;
        assert_eq!(r.events, [Event::Show]);
        Ok(())
    }

    #[test]
    fn empty_path_is_current_dir() -> Result<()> {
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        dp.save_plot().path("").formats(["png"]).export(&mut r)?;
        assert_eq!(r.events, [Event::Save(PathBuf::from("./fred.png"))]);
        Ok(())
    }

    #[test]
    fn asis_uses_name_verbatim() -> Result<()> {
        let dir = out_dir("asis");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder { touch: true, ..Recorder::default() };
        dp.save_plot().path(&dir).name("foo.svg").formats(["asis"])
            .export(&mut r)?;
        assert_eq!(r.events, [Event::Save(dir.join("foo.svg"))]);
        assert!(dir.join("foo.svg").is_file());
        assert!(!dir.join("foo.svg.asis").exists());
        Ok(())
    }

    #[test]
    fn empty_name_keeps_plot_name() -> Result<()> {
        let dir = out_dir("empty_name");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        dp.save_plot().path(&dir).name("").formats(["json", "asis"])
            .export(&mut r)?;
        assert!(dir.join("fred.json").is_file());
        assert!(!dir.join(".json").exists());
        assert_eq!(r.events, [Event::Save(dir.join("fred"))]);
        Ok(())
    }

    #[test]
    fn nested_directories_are_created() -> Result<()> {
        let dir = out_dir("nested").join("a").join("b");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder { touch: true, ..Recorder::default() };
        dp.save_plot().path(&dir).formats(["svg"]).export(&mut r)?;
        assert!(dir.join("fred.svg").is_file());
        Ok(())
    }

    #[test]
    fn failure_stops_the_export() {
        let dir = out_dir("failure");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder { fail_save: true, ..Recorder::default() };
        let e = dp.save_plot().path(&dir).formats(["png", "json", "show"])
            .export(&mut r);
        assert!(matches!(e, Err(Error::Render(_))));
        assert!(!dir.join("fred.json").exists());
        assert!(r.events.is_empty());
    }

    #[test]
    fn builder_error_propagates() {
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        let e = dp.save_plot()
            .builder(|_, _: &mut Recorder| Err(Error::Render("boom".into())))
            .formats(["show"])
            .export(&mut r);
        assert!(matches!(e, Err(Error::Render(m)) if m == "boom"));
        assert!(r.events.is_empty());
    }

    #[test]
    fn builder_sees_and_fills_the_record() -> Result<()> {
        let dir = out_dir("builder_fills");
        let mut dp = DataPlot::new("fred");
        dp.record_mut().set_series("x", [1, 2]);
        let mut r = Recorder::default();
        dp.save_plot().path(&dir).formats(["json", "png"])
            .builder(|rec: &mut PlotRecord, _: &mut Recorder| {
                assert_eq!(rec.series("x").unwrap().len(), 2);
                rec.annotate("drawn", true);
                Ok(())
            })
            .export(&mut r)?;
        assert_eq!(dp.record().annotation("drawn"), Some(&json!(true)));
        let back = PlotRecord::from_reader(File::open(dir.join("fred.json"))?)?;
        assert_eq!(back.annotations["drawn"], json!(true));
        Ok(())
    }

    #[test]
    fn unknown_tag_goes_to_renderer() -> Result<()> {
        let dir = out_dir("unknown_tag");
        let mut dp = DataPlot::new("fred");
        let mut r = Recorder::default();
        dp.save_plot().path(&dir).formats(["pgn"]).export(&mut r)?;
        assert_eq!(r.events, [Event::Save(dir.join("fred.pgn"))]);
        Ok(())
    }
}
