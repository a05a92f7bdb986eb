//! `typescout ask` — single-shot answer grounded in ranked types.

use super::{Session, print_reasoning_help};
use crate::GlobalArgs;
use futures::StreamExt;
use std::io::Write;
use typescout_agent::AgentError;

pub async fn run(global: &GlobalArgs, question: String) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(global)?;
    let agent = session.codebase_agent();

    let stream = match agent.answer_stream(&question).await {
        Ok(stream) => stream,
        Err(AgentError::NoReasoningClient) => {
            print_reasoning_help(&session.config);
            return Err(AgentError::NoReasoningClient.into());
        }
        Err(e) => return Err(e.into()),
    };

    if stream.context.is_empty() {
        eprintln!("  (no matching types, answering without context)");
    } else {
        let names: Vec<&str> = stream.context.iter().map(|s| s.registered.path()).collect();
        eprintln!("  Context: {}", names.join(", "));
    }
    eprintln!();

    let mut fragments = stream.fragments;
    let mut stdout = std::io::stdout();
    while let Some(fragment) = fragments.next().await {
        write!(stdout, "{}", fragment?)?;
        stdout.flush()?;
    }
    writeln!(stdout)?;
    Ok(())
}
