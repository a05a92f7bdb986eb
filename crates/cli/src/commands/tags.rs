//! `typescout tags` — tag usage counts.

use super::Session;
use crate::GlobalArgs;
use typescout_tools::ListTagsTool;

pub async fn run(global: &GlobalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(global)?;
    let listing = ListTagsTool::new(session.registry.clone()).listing();

    if listing.tags.is_empty() {
        println!("No tags registered.");
        return Ok(());
    }

    let width = listing
        .tags
        .iter()
        .map(|t| t.tag.as_str().len())
        .max()
        .unwrap_or(0);
    for usage in &listing.tags {
        println!("{:<width$}  {}", usage.tag.as_str(), usage.count);
    }
    println!("\n{} unique tags", listing.total_unique_tags);
    Ok(())
}
