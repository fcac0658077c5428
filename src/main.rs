//! Demo: generate a small dataset, then plot it to PNG and PDF and
//! dump its data as JSON in `tests/output`.

use dataplot::{DataPlot, PlotRecord, Pyplot, Style};
use tracing::info;

fn make_data(r: &mut PlotRecord) {
    r.describe("creator", "Christophe Troestler")
        .describe("description", "Demo data for DataPlot")
        .set_series("x", 0 .. 10)
        .set_series("y", (0 .. 10).map(|i| i % 3))
        .annotate("r2", 0.2)
        .set_axis("x", "title", "X units")
        .set_title("The Plot");
}

fn plot_data(r: &mut PlotRecord, plt: &mut Pyplot) -> dataplot::Result<()> {
    let x = r.series_array("x").unwrap_or_default();
    let y = r.series_array("y").unwrap_or_default();
    let label = |v: Option<&serde_json::Value>| {
        v.and_then(|v| v.as_str()).unwrap_or_default().to_owned()
    };
    let r2 = r.annotation("r2").map(|v| v.to_string()).unwrap_or_default();
    plt.plot(&x, &y, "")?
        .xlabel(&label(r.axes.get("x").and_then(|x| x.get("title"))))?
        .title(&label(r.axes.get("title")))?
        .text(0., 1.5, &format!("$r^2={r2}$"))?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut plt = Pyplot::with_style(Style::default().backend("svg"))?;
    let mut dp = DataPlot::new("fred");
    make_data(dp.record_mut());
    dp.save_plot()
        .builder(plot_data)
        .path("tests/output")
        .formats(["png", "pdf", "json"])
        .export(&mut plt)?;
    info!(name = dp.name(), "demo done");
    Ok(())
}
