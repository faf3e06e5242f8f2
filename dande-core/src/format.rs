use crate::models::{FilterLevelResult, Level, Token};

fn block(key: impl std::fmt::Display, tokens: &[Token]) -> String {
    format!("Mức {} ({} số)\n{}", key, tokens.len(), tokens.join(","))
}

/// "Mức N (k số)" + danh sách số, các mức cách nhau một dòng trống, mức cao trước.
pub fn format_levels(levels: &[Level]) -> String {
    let mut sorted: Vec<&Level> = levels.iter().collect();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    sorted
        .iter()
        .map(|l| block(l.frequency, &l.tokens))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_filter_results(results: &[FilterLevelResult]) -> String {
    let mut sorted: Vec<&FilterLevelResult> = results.iter().collect();
    sorted.sort_by(|a, b| b.index.cmp(&a.index));
    sorted
        .iter()
        .map(|r| block(r.index, &r.tokens))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn join_tokens(tokens: &[Token]) -> String {
    tokens.join(",")
}
