//! `typescout rank` — relevance-ranked types for a question.

use super::{Session, first_line};
use crate::GlobalArgs;

pub async fn run(
    global: &GlobalArgs,
    query: String,
    limit: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(global)?;
    let mut agent = session.codebase_agent();
    if let Some(limit) = limit {
        agent = agent.with_rank_limit(limit);
    }

    let ranked = agent.search_codebase(&query).await;
    if ranked.is_empty() {
        println!("No relevant types for \"{query}\".");
        return Ok(());
    }

    for scored in &ranked {
        let ty = &scored.registered;
        println!("{:>5}  {}", scored.score, ty.path());
        if !ty.docstring().is_empty() {
            println!("       {}", first_line(ty.docstring(), 100));
        }
    }
    Ok(())
}
