use std::path::Path;

use anyhow::{Context as _, Result};
use graphql_online_parser::{tokenize_line, State, Style};

use crate::ExitCode;

pub fn run(file: &Path) -> Result<ExitCode> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    for line in styled_lines(&text) {
        println!("{line}");
    }
    Ok(ExitCode::Success)
}

/// One output line per source line: the line number followed by each
/// non-whitespace token as `style("text")`. State carries across lines.
fn styled_lines(text: &str) -> Vec<String> {
    let mut state = State::new();
    text.lines()
        .enumerate()
        .map(|(number, line)| {
            let (tokens, next) = tokenize_line(line, &state);
            state = next;
            let styled: Vec<String> = tokens
                .iter()
                .filter(|token| token.style != Style::Ws)
                .map(|token| format!("{}({:?})", token.style.as_str(), &line[token.start..token.end]))
                .collect();
            format!("{:>4} | {}", number + 1, styled.join(" "))
        })
        .collect()
}
