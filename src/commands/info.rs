use anyhow::Result;

use crate::cli::InfoArgs;
use crate::color::QuantileScale;
use crate::map::{Dataset, Metric};

pub fn run(args: &InfoArgs) -> Result<()> {
    let manifest = super::resolve_sources(&args.source)?;
    let dataset = Dataset::load(&manifest)?;

    println!(
        "{} data rows, {} region boundaries",
        dataset.store.len(),
        dataset.regions.len(),
    );

    for metric in Metric::order() {
        let values = dataset.store.values(metric);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let [q1, q2, q3] = QuantileScale::from_values(&values).thresholds();
        println!(
            "{:<20} min={min:>14.0} q1={q1:>14.1} median={q2:>14.1} q3={q3:>14.1} max={max:>14.0}",
            metric.column(),
        );
    }

    let missing = dataset.missing_regions();
    if !missing.is_empty() {
        println!("regions with geometry but no data ({}):", missing.len());
        for id in missing {
            println!("  {id}");
        }
    }

    Ok(())
}
