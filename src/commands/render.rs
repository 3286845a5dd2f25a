use std::time::Instant;

use anyhow::{Result, bail};

use crate::cli::RenderArgs;
use crate::map::Dataset;
use crate::render::Renderer;

pub fn run(args: &RenderArgs) -> Result<()> {
    if !args.force && args.output.exists() {
        bail!("Refusing to overwrite existing file: {} (use --force)", args.output.display());
    }

    let manifest = super::resolve_sources(&args.source)?;
    let dataset = Dataset::load(&manifest)?;

    let now = Instant::now();
    let mut renderer = Renderer::new(manifest.width as f64, manifest.height as f64);
    renderer.initialize(dataset, args.metric.into(), now);

    for _ in 0..args.zoom {
        renderer.zoom_in();
    }
    for _ in args.zoom..0 {
        renderer.zoom_out();
    }

    renderer.to_svg(&args.output, now)?;
    println!("Wrote map -> {}", args.output.display());
    Ok(())
}
