mod display;
mod interactive;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dande_core::builder::{DauDuoiSpec, build_bo_dan, build_dau_duoi};
use dande_core::classify::{classify, classify_digits, discovered_universe, select_levels};
use dande_core::config::Limits;
use dande_core::format::{format_filter_results, format_levels, join_tokens};
use dande_core::models::{Width, universe_2d};
use dande_core::selector::{FilterRequest, make_rng, run_filter};
use dande_core::setops::{self, SetOp};
use dande_core::special_sets;
use dande_core::tokenizer::{normalize, parse_number_list};
use dande_core::DanError;

use crate::display::{display_filter_results, display_levels, display_special_sets, display_tokens};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OpArg {
    /// Số có ở cả hai dàn
    Giao,
    /// Số có ở một trong hai dàn
    Hop,
    /// Dàn 1 trừ dàn 2
    Tru,
    /// Dàn 2 trừ dàn 1
    TruNguoc,
}

impl From<OpArg> for SetOp {
    fn from(op: OpArg) -> SetOp {
        match op {
            OpArg::Giao => SetOp::Intersect,
            OpArg::Hop => SetOp::Union,
            OpArg::Tru => SetOp::Difference,
            OpArg::TruNguoc => SetOp::ReverseDifference,
        }
    }
}

#[derive(Parser)]
#[command(name = "dande", about = "Công cụ tạo và lọc dàn đề")]
struct Cli {
    /// Tệp cấu hình JSON (giới hạn nhập liệu)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ghi log chi tiết ra stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tạo dàn 2D: phân mức 00-99 theo số lần xuất hiện
    Dan2d {
        /// Các số, ngăn cách bởi dấu phẩy/chấm phẩy/khoảng trắng ("-" = đọc stdin)
        input: String,

        /// Các mức cần lấy, theo thứ tự chọn (vd: 3,2)
        #[arg(short, long, value_delimiter = ',')]
        levels: Vec<u32>,

        /// Hiển thị thêm thống kê chữ số 0-9
        #[arg(long)]
        digits: bool,
    },

    /// Tạo dàn 3D/4D: phân mức các số đã xuất hiện
    Dan3d {
        input: String,

        /// Độ dài số (3 hoặc 4)
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(3..=4))]
        width: u8,

        #[arg(short, long, value_delimiter = ',')]
        levels: Vec<u32>,
    },

    /// Lọc dàn theo mức 8/18/.../95 số
    Loc {
        input: String,

        /// Chỉ số mức 0-9 (0 = 8 số, 9 = 95 số)
        #[arg(short = 'm', long, value_delimiter = ',')]
        levels: Vec<usize>,

        /// Thêm số (ưu tiên)
        #[arg(long, default_value = "")]
        them: String,

        /// Loại bỏ
        #[arg(long, default_value = "")]
        loai: String,

        /// Mã bộ số đặc biệt (xem `dande bo-so`)
        #[arg(long, value_delimiter = ',')]
        bo: Vec<String>,

        /// Bỏ kép bằng
        #[arg(long)]
        bo_kep: bool,

        /// Seed để kết quả lặp lại được
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Lọc ghép hai dàn (giao, hợp, trừ)
    Ghep {
        #[arg(value_enum)]
        op: OpArg,
        dan1: String,
        dan2: String,
    },

    /// Tạo dàn từ bộ số (bóng dương)
    Bo { numbers: String },

    /// Tạo dàn theo đầu, đuôi, tổng
    DauDuoi {
        #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(0..=9))]
        dau: Vec<u8>,

        #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(0..=9))]
        duoi: Vec<u8>,

        #[arg(long, value_delimiter = ',', value_parser = clap::value_parser!(u8).range(0..=9))]
        tong: Vec<u8>,

        #[arg(long)]
        bo_kep: bool,
    },

    /// Liệt kê các bộ số đặc biệt
    BoSo,

    /// Chế độ tương tác (có hoàn tác)
    TuongTac {
        #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=4))]
        width: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let limits = load_limits(cli.config.as_deref())?;
    debug!(?limits, "cấu hình");

    match cli.command {
        Command::Dan2d { input, levels, digits } => cmd_dan2d(&read_input(&input)?, &levels, digits, &limits),
        Command::Dan3d { input, width, levels } => cmd_dan3d(&read_input(&input)?, width, &levels, &limits),
        Command::Loc { input, levels, them, loai, bo, bo_kep, seed } => {
            let request = FilterRequest {
                levels,
                priority: parse_number_list(&them)?,
                special_sets: bo,
                exclude: parse_number_list(&loai)?,
                exclude_doubles: bo_kep,
            };
            cmd_loc(&read_input(&input)?, &request, seed, &limits)
        }
        Command::Ghep { op, dan1, dan2 } => cmd_ghep(op.into(), &dan1, &dan2),
        Command::Bo { numbers } => cmd_bo(&numbers),
        Command::DauDuoi { dau, duoi, tong, bo_kep } => cmd_dau_duoi(DauDuoiSpec {
            heads: dau,
            tails: duoi,
            sums: tong,
            exclude_doubles: bo_kep,
        }),
        Command::BoSo => {
            display_special_sets(special_sets::all());
            Ok(())
        }
        Command::TuongTac { width } => {
            let width = Width::from_digits(width as usize).context("Độ dài số không hợp lệ")?;
            interactive::run_interactive(width, limits)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_limits(path: Option<&Path>) -> Result<Limits> {
    match path {
        Some(p) => Limits::load(p).with_context(|| format!("Không đọc được cấu hình {:?}", p)),
        None => Ok(Limits::default()),
    }
}

fn read_input(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf).context("Lỗi đọc stdin")?;
    Ok(buf)
}

fn check_length(input: &str, limits: &Limits) -> Result<()> {
    let got = input.chars().count();
    if got > limits.max_input_chars {
        return Err(DanError::InputTooLong { limit: limits.max_input_chars, got }.into());
    }
    Ok(())
}

fn cmd_dan2d(input: &str, levels: &[u32], digits: bool, limits: &Limits) -> Result<()> {
    check_length(input, limits)?;
    let tokens = normalize(input, Width::Two)?;
    let classified = classify(&tokens, &universe_2d());

    display_levels(&classified, "Dàn 2D");
    if digits {
        display_levels(&classify_digits(&tokens), "Chữ số 0-9");
    }
    if !levels.is_empty() {
        display_tokens("Dàn đã chọn", &select_levels(&classified, levels));
    }
    println!("\n{}", format_levels(&classified));
    Ok(())
}

fn cmd_dan3d(input: &str, width: u8, levels: &[u32], limits: &Limits) -> Result<()> {
    check_length(input, limits)?;
    let width = Width::from_digits(width as usize).context("Độ dài số không hợp lệ")?;
    let tokens = normalize(input, width)?;
    if tokens.is_empty() {
        return Err(DanError::NoValidInput.into());
    }
    let classified = classify(&tokens, &discovered_universe(&tokens));

    display_levels(&classified, &format!("Dàn {}", width));
    if !levels.is_empty() {
        display_tokens("Dàn đã chọn", &select_levels(&classified, levels));
    }
    println!("\n{}", format_levels(&classified));
    Ok(())
}

fn cmd_loc(input: &str, request: &FilterRequest, seed: Option<u64>, limits: &Limits) -> Result<()> {
    let mut rng = make_rng(seed);
    let results = run_filter(input, request, limits, &mut rng)?;
    display_filter_results(&results);
    println!("\n{}", format_filter_results(&results));
    Ok(())
}

fn cmd_ghep(op: SetOp, dan1: &str, dan2: &str) -> Result<()> {
    let result = setops::apply(op, dan1, dan2)?;
    display_tokens("Kết quả lọc ghép", &result);
    println!("\n{}", join_tokens(&result));
    Ok(())
}

fn cmd_bo(numbers: &str) -> Result<()> {
    let tokens = parse_number_list(numbers)?;
    let dan = build_bo_dan(&tokens)?;
    display_tokens("Dàn bộ", &dan);
    println!("\n{}", join_tokens(&dan));
    Ok(())
}

fn cmd_dau_duoi(spec: DauDuoiSpec) -> Result<()> {
    let dan = build_dau_duoi(&spec)?;
    display_tokens("Dàn đầu đuôi", &dan);
    println!("\n{}", join_tokens(&dan));
    Ok(())
}
