use serde::Serialize;

use batchgen_core::api::{
    extract_report, normalize_escapes, CliError, MultiStrategyPromptParser, ParsedTask,
    ReviewDraft, StrategyKind,
};

use super::cli::ParseArgs;
use crate::utils::{read_text, write_json};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseSummary {
    pub report: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
    pub tasks: ReviewDraft,
}

/// Normalises raw model output and runs the parser cascade on it.
pub fn summarize(raw: &str) -> ParseSummary {
    let text = normalize_escapes(raw);
    let outcome = MultiStrategyPromptParser::new().parse_outcome(&text);
    ParseSummary {
        report: extract_report(&text),
        strategy: outcome.strategy,
        tasks: ReviewDraft::from_parsed(outcome.tasks),
    }
}

pub fn render_tasks(tasks: &[ParsedTask]) -> String {
    let mut out = String::new();
    for (i, task) in tasks.iter().enumerate() {
        out.push_str(&format!("[{}] {}  ({})\n", i + 1, task.title, task.id));
        for line in task.prompt.lines() {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

#[tracing::instrument(skip_all, fields(input = ?args.input))]
pub async fn handle_parse(args: ParseArgs) -> Result<i32, CliError> {
    let raw = read_text(args.input.as_deref()).await?;
    let summary = summarize(&raw);
    tracing::info!(
        tasks = summary.tasks.len(),
        strategy = ?summary.strategy,
        "prompt text parsed"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if !summary.report.is_empty() {
            println!("{}\n", summary.report);
        }
        match summary.strategy {
            Some(kind) => println!("{} task(s) via {:?} blocks", summary.tasks.len(), kind),
            None => println!("no prompt blocks recognised"),
        }
        print!("{}", render_tasks(summary.tasks.items()));
    }

    if let Some(out) = args.out.as_deref() {
        write_json(out, &summary.tasks).await?;
        eprintln!("task list written to {}", out.display());
    }
    Ok(0)
}
