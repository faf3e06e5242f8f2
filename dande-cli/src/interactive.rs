use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use tracing::debug;

use dande_core::config::Limits;
use dande_core::format::{format_filter_results, format_levels, join_tokens};
use dande_core::models::Width;
use dande_core::selector::{FilterRequest, make_rng, run_filter};
use dande_core::session::Session;
use dande_core::tokenizer::parse_number_list;

use crate::display::{display_filter_results, display_levels, display_tokens};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Input,
    Level,
    Show,
    Filter,
    Clear,
    Undo,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "nhap" | "nhập" | "input" => Some(InteractiveCommand::Input),
        "2" | "muc" | "mức" | "level" => Some(InteractiveCommand::Level),
        "3" | "xem" | "show" => Some(InteractiveCommand::Show),
        "4" | "loc" | "lọc" | "filter" => Some(InteractiveCommand::Filter),
        "5" | "xoa" | "xoá" | "xóa" | "clear" => Some(InteractiveCommand::Clear),
        "6" | "hoantac" | "hoàn tác" | "undo" | "u" => Some(InteractiveCommand::Undo),
        "7" | "thoat" | "thoát" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu(session: &Session) {
    println!();
    println!("── Chế độ tương tác ({}) ──", session.width());
    println!("  1. nhap     Nhập dãy số");
    println!("  2. muc      Chọn / bỏ chọn một mức");
    println!("  3. xem      Xem các mức và dàn đã chọn");
    println!("  4. loc      Lọc dàn 8/18/.../95 số");
    println!("  5. xoa      Xoá dữ liệu");
    println!(
        "  6. hoantac  Hoàn tác{}",
        if session.can_undo() { "" } else { " (không có)" }
    );
    println!("  7. thoat    Thoát");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let n = io::stdin()
        .read_line(&mut input)
        .context("Lỗi đọc dữ liệu")?;
    if n == 0 {
        bail!("Hết dữ liệu vào");
    }
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn cmd_input(session: &mut Session) -> Result<()> {
    let text = prompt("Dãy số : ")?;
    session.set_input(&text)?;
    display_levels(session.levels(), "Các mức");
    Ok(())
}

fn cmd_level(session: &mut Session) -> Result<()> {
    let key: u32 = prompt("Mức : ")?.parse().context("Mức không hợp lệ")?;
    if session.toggle_level(key) {
        println!("Đã chọn mức {}.", key);
    } else if session.levels().iter().any(|l| l.frequency == key) {
        println!("Đã bỏ chọn mức {}.", key);
    } else {
        println!("Mức {} không có số nào.", key);
    }
    Ok(())
}

fn cmd_show(session: &Session) {
    display_levels(session.levels(), "Các mức");
    if session.width() == Width::Two && !session.tokens().is_empty() {
        display_levels(&session.digit_levels(), "Chữ số 0-9");
    }
    if !session.selected().is_empty() {
        let picked = session.selected_tokens();
        display_tokens("Dàn đã chọn", &picked);
        println!("{}", join_tokens(&picked));
    }
    println!("\n{}", format_levels(session.levels()));
}

fn cmd_filter(session: &mut Session, limits: &Limits) -> Result<()> {
    if session.width() != Width::Two {
        bail!("Lọc dàn chỉ dùng cho số 2 chữ số");
    }
    let index: usize = prompt_with_default("Mức lọc (0 = 8 số ... 9 = 95 số)", "0")?
        .parse()
        .context("Mức không hợp lệ")?;
    let them = prompt_with_default("Thêm số", "")?;
    let loai = prompt_with_default("Loại bỏ", "")?;
    let bo = prompt_with_default("Bộ số đặc biệt (mã, cách nhau bởi dấu phẩy)", "")?;
    let bo_kep = prompt_with_default("Bỏ kép ? (c/k)", "k")?.to_lowercase() == "c";
    let seed_str = prompt_with_default("Seed (trống = ngẫu nhiên)", "")?;
    let seed: Option<u64> = if seed_str.is_empty() {
        None
    } else {
        Some(seed_str.parse().context("Seed không hợp lệ")?)
    };

    let request = FilterRequest {
        levels: vec![index],
        priority: parse_number_list(&them)?,
        special_sets: bo
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        exclude: parse_number_list(&loai)?,
        exclude_doubles: bo_kep,
    };
    debug!(?request, "lọc dàn tương tác");

    let results = run_filter(session.input(), &request, limits, &mut make_rng(seed))?;
    display_filter_results(&results);
    println!("\n{}", format_filter_results(&results));

    let confirm = prompt("\nDùng kết quả này làm dữ liệu mới ? (c/k) : ")?;
    if confirm.to_lowercase() == "c" {
        if let Some(result) = results.first() {
            session.apply_filter_result(&result.tokens)?;
            println!("Đã áp dụng. Gõ 'hoantac' để quay lại.");
        }
    }
    Ok(())
}

pub fn run_interactive(width: Width, limits: Limits) -> Result<()> {
    println!("Chào mừng đến với chế độ tương tác của dande !");
    let mut session = Session::new(width, limits.clone());

    loop {
        display_menu(&session);
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Tạm biệt !");
                break;
            }
            Some(InteractiveCommand::Input) => {
                if let Err(e) = cmd_input(&mut session) {
                    println!("Lỗi: {e:#}");
                }
            }
            Some(InteractiveCommand::Level) => {
                if let Err(e) = cmd_level(&mut session) {
                    println!("Lỗi: {e:#}");
                }
            }
            Some(InteractiveCommand::Show) => cmd_show(&session),
            Some(InteractiveCommand::Filter) => {
                if let Err(e) = cmd_filter(&mut session, &limits) {
                    println!("Lỗi: {e:#}");
                }
            }
            Some(InteractiveCommand::Clear) => {
                session.clear();
                println!("Đã xoá. Gõ 'hoantac' để khôi phục.");
            }
            Some(InteractiveCommand::Undo) => {
                if session.undo() {
                    println!("Đã hoàn tác.");
                } else {
                    println!("Không có gì để hoàn tác.");
                }
            }
            None => {
                println!("Lệnh không rõ : '{}'. Gõ một số (1-7) hoặc tên lệnh.", input);
            }
        }
    }

    Ok(())
}
