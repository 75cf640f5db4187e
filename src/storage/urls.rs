//! Product URL list persistence
//!
//! One absolute URL per line, sorted, full-file overwrite on save. A
//! bundled copy shipped alongside the binary serves as a first-run
//! fallback until a crawl produces a runtime list.

use std::io::Write;
use std::path::Path;

/// Loads the product URL list, preferring the runtime file over the
/// bundled fallback
///
/// Returns an empty list when neither file exists.
pub fn load_urls(primary: &Path, bundled: &Path) -> std::io::Result<Vec<String>> {
    let path = if primary.exists() {
        primary
    } else if bundled.exists() {
        tracing::info!("Using bundled URL list: {}", bundled.display());
        bundled
    } else {
        return Ok(Vec::new());
    };

    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Overwrites the URL list, sorted, one URL per line
pub fn save_urls<'a, I>(path: &Path, urls: I) -> std::io::Result<()>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<&String> = urls.into_iter().collect();
    sorted.sort();

    let mut file = std::fs::File::create(path)?;
    for url in sorted {
        writeln!(file, "{}", url)?;
    }
    Ok(())
}
