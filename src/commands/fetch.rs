use anyhow::Result;

use crate::cli::FetchArgs;
use crate::download::fetch_data_file;

pub fn run(args: &FetchArgs) -> Result<()> {
    fetch_data_file(&args.url, &args.out, args.force)?;
    println!("Downloaded {} -> {}", args.url, args.out.display());
    Ok(())
}
