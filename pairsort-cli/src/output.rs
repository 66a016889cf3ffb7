/// Output formatting: terminal table and JSON.
///
/// Rankings are printed most preferred first; the core orders them the other
/// way round.
use pairsort_core::ListOrder;
use serde::Serialize;

use crate::bail;
use crate::state::Session;

#[derive(Serialize, Debug)]
struct JsonRankedItem {
    rank: usize,
    name: String,
}

#[derive(Serialize, Debug)]
struct JsonQuestion {
    option1: String,
    option2: String,
}

#[derive(Serialize, Debug)]
struct JsonOutput {
    completed: bool,
    items: Vec<JsonRankedItem>,
    ignored: Vec<String>,
    question: Option<JsonQuestion>,
    choices_remaining: usize,
    judgments: usize,
}

fn ranked_names(order: &ListOrder, session: &Session) -> Vec<String> {
    order.sorted.iter().rev().map(|&id| session.name_of(id).to_string()).collect()
}

/// Render results as a terminal table.
pub fn render_table(order: &ListOrder, session: &Session) -> String {
    let names = ranked_names(order, session);
    let name_width = names.iter().map(String::len).max().unwrap_or(4).max(4);
    let mut out = String::new();

    out.push_str(&format!("  # | {:<name_width$}\n", "Item"));
    out.push_str(&format!("----|-{}\n", "-".repeat(name_width)));
    for (i, name) in names.iter().enumerate() {
        out.push_str(&format!("{:>3} | {name}\n", i + 1));
    }

    let ignored = session.listed_ignored(&order.ignored);
    if !ignored.is_empty() {
        out.push_str(&format!("\nIgnored: {}\n", ignored.join(", ")));
    }

    let judgments = session.list.graph().len();
    if order.completed {
        out.push_str(&format!("\n{} items ranked from {judgments} judgments\n", names.len()));
    } else {
        out.push_str(&format!(
            "\nRanking incomplete ({judgments} judgments, at most {} questions left); order above is provisional\n",
            order.choices_remaining,
        ));
        if let Some((a, b)) = order.choice {
            out.push_str(&format!(
                "Next question: \"{}\" or \"{}\"?\n",
                session.name_of(a),
                session.name_of(b),
            ));
        }
    }
    out
}

/// Render results as JSON.
pub fn render_json(order: &ListOrder, session: &Session) -> String {
    let items = ranked_names(order, session)
        .into_iter()
        .enumerate()
        .map(|(i, name)| JsonRankedItem { rank: i + 1, name })
        .collect();

    let output = JsonOutput {
        completed: order.completed,
        items,
        ignored: session.listed_ignored(&order.ignored),
        question: order.choice.map(|(a, b)| JsonQuestion {
            option1: session.name_of(a).to_string(),
            option2: session.name_of(b).to_string(),
        }),
        choices_remaining: order.choices_remaining,
        judgments: session.list.graph().len(),
    };

    serde_json::to_string_pretty(&output)
        .unwrap_or_else(|e| bail(format!("Failed to serialize output: {e}")))
}
