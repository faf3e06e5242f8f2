use std::collections::HashSet;

use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::debug;

use crate::classify::FrequencyMap;
use crate::config::Limits;
use crate::error::{DanError, DanResult};
use crate::models::{FilterLevelResult, Token, Width, is_double, universe_2d};
use crate::special_sets::{self, SpecialSet};
use crate::tokenizer::normalize;

pub const TARGET_SIZES: [usize; 10] = [8, 18, 28, 38, 48, 58, 68, 78, 88, 95];

/// Mức cao nhất khi bỏ kép: chỉ còn 90 số.
pub const TOP_TARGET_WITHOUT_DOUBLES: usize = 90;

pub fn target_size(index: usize, exclude_doubles: bool) -> Option<usize> {
    let size = *TARGET_SIZES.get(index)?;
    if exclude_doubles && index == TARGET_SIZES.len() - 1 {
        Some(TOP_TARGET_WITHOUT_DOUBLES)
    } else {
        Some(size)
    }
}

/// Có seed thì kết quả lặp lại được, không thì lấy entropy của hệ thống.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

pub fn apply_exclusions(tokens: &[Token], exclude: &HashSet<Token>, exclude_doubles: bool) -> Vec<Token> {
    tokens
        .iter()
        .filter(|t| !(exclude_doubles && is_double(t)))
        .filter(|t| !exclude.contains(*t))
        .cloned()
        .collect()
}

/// Chọn đúng `target` số cho một mức, theo thứ tự ưu tiên:
/// thêm số -> bộ đặc biệt -> số lặp -> số đơn (ngẫu nhiên) -> số ngoài dàn (ngẫu nhiên).
/// Kết quả luôn được sắp tăng dần.
pub fn select_for_level<R: Rng + ?Sized>(
    input_tokens: &[Token],
    target: usize,
    priority: &[Token],
    special_tokens: &[Token],
    exclude: &HashSet<Token>,
    exclude_doubles: bool,
    rng: &mut R,
) -> Vec<Token> {
    let pool = apply_exclusions(input_tokens, exclude, exclude_doubles);
    let freq = FrequencyMap::from_tokens(&pool);

    let mut selected: Vec<Token> = Vec::with_capacity(target);
    let mut taken: HashSet<Token> = HashSet::new();

    for p in priority {
        if freq.contains(p) && taken.insert(p.clone()) {
            selected.push(p.clone());
        }
    }
    let tier1 = selected.len();

    if priority.is_empty() {
        for s in special_tokens {
            if freq.contains(s) && taken.insert(s.clone()) {
                selected.push(s.clone());
            }
        }
    }
    let tier2 = selected.len() - tier1;

    let mut repeats: Vec<(&str, u32)> = freq
        .iter()
        .filter(|(t, c)| *c > 1 && !taken.contains(*t))
        .collect();
    repeats.sort_by(|a, b| b.1.cmp(&a.1));
    for (t, _) in &repeats {
        taken.insert(t.to_string());
        selected.push(t.to_string());
    }

    let mut singles: Vec<&str> = freq
        .iter()
        .filter(|(t, c)| *c == 1 && !taken.contains(*t))
        .map(|(t, _)| t)
        .collect();
    let gap = target.saturating_sub(selected.len());
    singles.shuffle(rng);
    for t in singles.iter().take(gap) {
        taken.insert(t.to_string());
        selected.push(t.to_string());
    }

    let shortfall = target.saturating_sub(selected.len());
    let mut filled = 0;
    if shortfall > 0 {
        let mut outside: Vec<Token> = universe_2d()
            .into_iter()
            .filter(|t| !freq.contains(t))
            .filter(|t| !(exclude_doubles && is_double(t)))
            .filter(|t| !exclude.contains(t))
            .collect();
        outside.shuffle(rng);
        outside.truncate(shortfall);
        filled = outside.len();
        selected.extend(outside);
    }

    debug!(
        target,
        pool = pool.len(),
        tier1,
        tier2,
        repeats = repeats.len(),
        singles = singles.len().min(gap),
        filled,
        "chọn số cho mức"
    );

    selected.truncate(target);
    selected.sort();
    selected
}

/// Yêu cầu lọc dàn: mức (0-9), thêm số, bộ đặc biệt, loại bỏ, bỏ kép.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pub levels: Vec<usize>,
    pub priority: Vec<Token>,
    pub special_sets: Vec<String>,
    pub exclude: Vec<Token>,
    pub exclude_doubles: bool,
}

impl FilterRequest {
    /// Kiểm tra toàn bộ yêu cầu trước khi tính toán. Trả về các bộ đặc biệt đã tra cứu.
    pub fn validate(&self, limits: &Limits) -> DanResult<Vec<&'static SpecialSet>> {
        if self.levels.is_empty() {
            return Err(DanError::NoLevelSelected);
        }
        if let Some(&bad) = self.levels.iter().find(|&&i| i >= TARGET_SIZES.len()) {
            return Err(DanError::UnknownLevel(bad));
        }
        if self.priority.len() > limits.max_priority {
            return Err(DanError::TooManyEntries {
                field: "Thêm số",
                limit: limits.max_priority,
                got: self.priority.len(),
            });
        }
        if self.exclude.len() > limits.max_exclude {
            return Err(DanError::TooManyEntries {
                field: "Loại bỏ",
                limit: limits.max_exclude,
                got: self.exclude.len(),
            });
        }
        let sets = special_sets::lookup(&self.special_sets, limits)?;

        let excluded: HashSet<&str> = self.exclude.iter().map(String::as_str).collect();
        if let Some(token) = self.priority.iter().find(|t| excluded.contains(t.as_str())) {
            return Err(DanError::ConflictingSpecification {
                token: token.clone(),
                origin: "thêm số".to_string(),
            });
        }
        for set in &sets {
            if let Some(token) = set.tokens.iter().find(|t| excluded.contains(t.as_str())) {
                return Err(DanError::ConflictingSpecification {
                    token: token.clone(),
                    origin: format!("bộ {}", set.id),
                });
            }
        }
        Ok(sets)
    }
}

/// Lọc dàn cho từng mức được chọn, theo thứ tự chọn (mức trùng bị bỏ qua).
pub fn run_filter<R: Rng + ?Sized>(
    input: &str,
    request: &FilterRequest,
    limits: &Limits,
    rng: &mut R,
) -> DanResult<Vec<FilterLevelResult>> {
    let sets = request.validate(limits)?;
    let got = input.chars().count();
    if got > limits.max_input_chars {
        return Err(DanError::InputTooLong { limit: limits.max_input_chars, got });
    }

    let tokens = normalize(input, Width::Two)?;
    let exclude: HashSet<Token> = request.exclude.iter().cloned().collect();
    if apply_exclusions(&tokens, &exclude, request.exclude_doubles).is_empty() {
        return Err(DanError::NoValidInput);
    }

    let special_tokens = special_sets::union_of(&sets);
    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(request.levels.len());

    for &index in &request.levels {
        if !seen.insert(index) {
            continue;
        }
        let target = target_size(index, request.exclude_doubles).ok_or(DanError::UnknownLevel(index))?;
        let tokens = select_for_level(
            &tokens,
            target,
            &request.priority,
            &special_tokens,
            &exclude,
            request.exclude_doubles,
            rng,
        );
        results.push(FilterLevelResult { index, target, tokens });
    }

    Ok(results)
}
