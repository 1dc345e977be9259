use cache_lib::error::SimulatorError;
use cache_lib::logger;
use cache_lib::memory::cache::CachePolicy;
use cache_lib::run_wrapper::{load_trace, replay};
use cache_lib::trace::MalformedPolicy;

fn plot_error<E: std::fmt::Display>(e: E) -> SimulatorError {
    SimulatorError::PlotError(e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init(false);
    let param_tokens: Vec<String> = std::env::args().collect();
    let trace_path = param_tokens
        .get(1)
        .ok_or("You should specify exactly one trace file")?;
    let trace_base_name = std::path::Path::new(trace_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| trace_path.clone());
    let output_path = param_tokens
        .get(2)
        .cloned()
        .unwrap_or_else(|| format!("eval/plot_eval_{}.svg", trace_base_name));

    let records = load_trace(std::path::Path::new(trace_path), MalformedPolicy::Skip)?;

    // One line per cache size, direct-mapped,
    // miss rate against block size
    let cache_sizes = [4, 16, 64, 256];
    let block_sizes = [16, 32, 64, 128];

    let mut data: Vec<Vec<(i32, f64)>> = vec![vec![]; cache_sizes.len()];
    let mut y_max: f64 = 0.;
    for (i, cache_size) in cache_sizes.iter().enumerate() {
        for block_size in block_sizes.iter() {
            let policy = CachePolicy {
                cache_size_kb: *cache_size,
                block_size: *block_size,
                ..Default::default()
            };
            let miss_rate =
                replay(policy, &records)?.get_miss_rate().unwrap_or(0.);
            data[i].push((*block_size as i32, miss_rate));
            y_max = y_max.max(miss_rate);
        }
    }
    if y_max == 0. {
        y_max = 1.;
    }

    use plotters::prelude::*;

    let plot_title = format!("Miss rate (direct-mapped): {}", trace_base_name);

    let root =
        SVGBackend::new(output_path.as_str(), (800, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(plot_title.as_str(), ("sans-serif", 40).into_font())
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(16..128, 0.0..y_max * 1.1)
        .map_err(plot_error)?;
    ctx.configure_mesh()
        .x_desc("Block size (bytes)")
        .y_desc("Miss rate")
        .draw()
        .map_err(plot_error)?;

    for (i, cache_size) in cache_sizes.iter().enumerate() {
        let series = data[i].iter().copied();
        let label = format!("Cache size = {}KB", cache_size);
        let color = Palette99::pick(i).to_rgba();
        ctx.draw_series(LineSeries::new(series, color))
            .map_err(plot_error)?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color)
            });
    }

    ctx.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;
    root.present().map_err(plot_error)?;

    eprintln!("Wrote {}", output_path);
    Ok(())
}
