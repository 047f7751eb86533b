//! Draw a few measurements on a site map and print what a renderer would see.
//!
//! Run with: RUST_LOG=sitemeasure=debug cargo run --example walkthrough --features tracing

use sitemeasure::render::{DisplayList, draw_snapshot};
use sitemeasure::types::spt;
use sitemeasure::{
    CanvasEvent, GridSettings, MeasureCanvas, MeasurementKind, MeasurementStore, Pan, SiteMapContext, Viewport,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = MeasurementStore::new(SiteMapContext::new("festival-grounds"));
    let viewport = Viewport::try_new(20.0, Pan::new(40.0, 40.0)).expect("valid viewport");
    let mut canvas = MeasureCanvas::new(store).with_viewport(viewport);
    canvas.set_grid(GridSettings::try_new(0.5, true).expect("valid grid"));

    // A fire lane between two vendor rows, 3.5 m wide
    canvas.select_tool(Some(MeasurementKind::Distance));
    canvas.pointer_down(spt(40.0, 40.0)).expect("first point");
    report(canvas.pointer_down(spt(110.0, 40.0)));

    // Clearance around a generator
    canvas.select_tool(Some(MeasurementKind::Clearance));
    canvas.pointer_down(spt(200.0, 40.0)).expect("first point");
    report(canvas.pointer_down(spt(200.0, 70.0)));

    // Stage footprint, closed explicitly
    canvas.select_tool(Some(MeasurementKind::Area));
    for p in [spt(40.0, 200.0), spt(240.0, 200.0), spt(240.0, 320.0), spt(40.0, 320.0)] {
        canvas.pointer_down(p).expect("vertex");
    }
    match canvas.close_shape() {
        Ok(m) => println!("{}: {:.2} {}", m.label(), m.value(), m.unit().suffix()),
        Err(e) => eprintln!("{:?}", miette::Report::new(e)),
    }

    // Clicking with no tool is reported with its diagnostic
    canvas.select_tool(None);
    if let Err(e) = canvas.pointer_down(spt(0.0, 0.0)) {
        eprintln!("{:?}", miette::Report::new(e));
    }

    println!("{:?}", canvas.store().compliance_summary());

    let snapshot = canvas.snapshot();
    if let Some(extent) = snapshot.bounds() {
        println!("extent: {:.1} x {:.1} m", extent.width().raw(), extent.height().raw());
    }

    let mut list: DisplayList = DisplayList::new();
    draw_snapshot(&snapshot, canvas.precision(), &mut list);
    println!("{}", list.to_screen(canvas.viewport()));
}

fn report(event: Result<CanvasEvent, sitemeasure::CanvasError>) {
    match event {
        Ok(CanvasEvent::Completed(m)) => {
            let verdict = m
                .compliance()
                .map(|c| format!("{} ({} {})", c.status, c.rule_id, c.severity))
                .unwrap_or_else(|| "no rule".to_string());
            println!("{}: {:.2} {} -> {verdict}", m.label(), m.value(), m.unit().suffix());
        }
        Ok(CanvasEvent::Progress(p)) => println!("in progress: {} points", p.points),
        Err(e) => eprintln!("{:?}", miette::Report::new(e)),
    }
}
