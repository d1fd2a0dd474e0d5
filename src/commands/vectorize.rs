use std::fs;
use std::io::{self, Write};

use geotrace::{GeoBounds, GeoPolygon, GeotraceResult};
use serde_json::Value;
use tracing::{info, warn};

use crate::cli::{GlobalOptions, OutputFormat, VectorizeCommand};

use super::utils::build_geotrace;

/// The main function to run the vectorize command.
pub fn run(global: &GlobalOptions, cmd: VectorizeCommand) -> GeotraceResult<()> {
    let geotrace = build_geotrace(global, &cmd.mask_processing, cmd.max_vertices)?;
    let bounds = GeoBounds::from(&cmd.bounds);
    if bounds.north <= bounds.south || bounds.east <= bounds.west {
        warn!(?bounds, "bounds are not ordered north > south, east > west; output will be mirrored");
    }

    let polygon = geotrace.vectorize_path(&cmd.input, &bounds)?;
    if polygon.is_empty() {
        info!(input = %cmd.input.display(), "no foreground detected");
    } else {
        info!(vertices = polygon.len(), "polygon traced");
    }

    let rendered = render(&polygon, cmd.format, cmd.pretty)?;
    match &cmd.output {
        Some(path) => {
            fs::write(path, rendered + "\n")?;
            println!("Polygon JSON saved to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{rendered}")?;
        }
    }

    Ok(())
}

fn render(polygon: &GeoPolygon, format: OutputFormat, pretty: bool) -> GeotraceResult<String> {
    let value: Value = match format {
        OutputFormat::Pairs => serde_json::to_value(polygon)?,
        OutputFormat::Geojson => polygon.to_geojson(),
    };
    let text = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        value.to_string()
    };
    Ok(text)
}
