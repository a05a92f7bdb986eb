//! `typescout search` — filter the registry by text and tags.

use super::{Session, first_line};
use crate::GlobalArgs;
use typescout_index::Tag;

pub async fn run(
    global: &GlobalArgs,
    query: Option<String>,
    tags: Vec<String>,
    all_tags: bool,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(global)?;
    let limit = limit.unwrap_or(session.config.search.default_limit);
    let tags: Vec<Tag> = tags.into_iter().map(Tag::from).collect();

    let found = session
        .registry
        .search(query.as_deref(), &tags, all_tags);
    let total = found.len();

    if total == 0 {
        println!("No matching types.");
        return Ok(());
    }

    for ty in found.iter().take(limit) {
        let tags: Vec<&str> = ty.tags().iter().map(|t| t.as_str()).collect();
        println!("{}  [{}]", ty.path(), tags.join(", "));
        if !ty.docstring().is_empty() {
            println!("    {}", first_line(ty.docstring(), 100));
        }
    }
    if total > limit {
        println!("\n{} of {total} matches shown (use --limit to see more).", limit);
    }
    Ok(())
}
