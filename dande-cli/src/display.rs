use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};

use dande_core::models::{FilterLevelResult, Level, Token};
use dande_core::special_sets::SpecialSet;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join(tokens: &[Token]) -> String {
    tokens.join(" ")
}

pub fn display_levels(levels: &[Level], title: &str) {
    if levels.is_empty() {
        println!("Không có mức nào để hiển thị.");
        return;
    }

    println!("\n── {title} ──");
    let mut table = new_table(vec!["Mức", "Số lượng", "Các số"]);

    let mut sorted: Vec<&Level> = levels.iter().collect();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    for level in sorted {
        let color = if level.frequency == 0 { Color::DarkGrey } else { Color::Green };
        table.add_row(vec![
            Cell::new(level.frequency.to_string()).fg(color),
            Cell::new(level.tokens.len().to_string()),
            Cell::new(join(&level.tokens)),
        ]);
    }
    println!("{table}");
}

pub fn display_filter_results(results: &[FilterLevelResult]) {
    println!("\n── Kết quả lọc dàn ──");
    let mut table = new_table(vec!["Mức", "Dàn", "Các số"]);

    for r in results {
        table.add_row(vec![
            &r.index.to_string(),
            &format!("{} số", r.target),
            &join(&r.tokens),
        ]);
    }
    println!("{table}");
}

pub fn display_tokens(title: &str, tokens: &[Token]) {
    println!("\n── {title} ({} số) ──", tokens.len());
    if tokens.is_empty() {
        println!("(trống)");
        return;
    }
    let mut table = new_table(vec!["Đầu", "Các số"]);
    for head in 0..10u8 {
        let row: Vec<&str> = tokens
            .iter()
            .filter(|t| t.as_bytes().first() == Some(&(b'0' + head)))
            .map(String::as_str)
            .collect();
        if !row.is_empty() {
            table.add_row(vec![head.to_string(), row.join(" ")]);
        }
    }
    println!("{table}");
}

pub fn display_special_sets(sets: &[SpecialSet]) {
    let mut table = new_table(vec!["Mã", "Tên", "Các số"]);
    for set in sets {
        table.add_row(vec![&set.id, &set.name, &join(&set.tokens)]);
    }
    println!("{table}");
}
