//! `typescout explore` — iterative exploration, printed as it happens.

use super::{Session, print_reasoning_help};
use crate::GlobalArgs;
use futures::StreamExt;
use typescout_agent::{AgentError, StatusEvent, StatusKind};

pub async fn run(
    global: &GlobalArgs,
    question: String,
    max_iterations: Option<usize>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(global)?;
    let mut agent = session.codebase_agent();
    if let Some(max) = max_iterations {
        agent = agent.with_max_iterations(max);
    }

    let mut events = match agent.explore(&question) {
        Ok(events) => events,
        Err(AgentError::NoReasoningClient) => {
            print_reasoning_help(&session.config);
            return Err(AgentError::NoReasoningClient.into());
        }
        Err(e) => return Err(e.into()),
    };

    while let Some(event) = events.next().await {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else {
            print!("{}", render(&event));
        }
    }
    Ok(())
}

fn render(event: &StatusEvent) -> String {
    match event.kind {
        StatusKind::IterationStart => format!("\n── {} ──\n", event.content),
        StatusKind::Thinking => format!("[thinking]\n{}\n", indent(&event.content)),
        StatusKind::Action => format!("[action] {}\n", event.content),
        StatusKind::Observation => format!("[observation]\n{}\n", indent(&event.content)),
        StatusKind::ParseError => format!("[parse error] {}\n", event.content),
        StatusKind::FinalAnswer if event.forced => {
            format!("\n══ Answer (iteration limit reached) ══\n{}\n", event.content)
        }
        StatusKind::FinalAnswer => format!("\n══ Answer ══\n{}\n", event.content),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
