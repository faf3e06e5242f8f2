use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{DanError, DanResult, Side};
use crate::models::{Token, Width, sort_numeric};
use crate::tokenizer::split_pieces;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOp {
    Intersect,
    Union,
    Difference,
    ReverseDifference,
}

/// Một dàn đã kiểm tra: các số phân biệt, cùng độ dài, tăng dần.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dan {
    pub width: Option<Width>,
    pub tokens: Vec<Token>,
}

impl Dan {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Đọc một dàn và kiểm tra mọi số có cùng độ dài 2, 3 hoặc 4.
pub fn parse_dan(input: &str, side: Side) -> DanResult<Dan> {
    let pieces = split_pieces(input)?;
    let mut width: Option<usize> = None;

    for piece in &pieces {
        match width {
            None => width = Some(piece.len()),
            Some(w) if w != piece.len() => {
                return Err(DanError::InconsistentWidth {
                    side,
                    message: format!("có cả số {} chữ số và {} chữ số", w, piece.len()),
                });
            }
            Some(_) => {}
        }
    }

    let width = match width {
        None => None,
        Some(w) => Some(Width::from_digits(w).ok_or_else(|| DanError::InconsistentWidth {
            side,
            message: format!("số có {} chữ số (chỉ chấp nhận 2, 3 hoặc 4)", w),
        })?),
    };

    let set: BTreeSet<&str> = pieces.into_iter().collect();
    let mut tokens: Vec<Token> = set.into_iter().map(str::to_string).collect();
    sort_numeric(&mut tokens);
    Ok(Dan { width, tokens })
}

fn check_pair(dan1: &Dan, dan2: &Dan) -> DanResult<()> {
    match (dan1.width, dan2.width) {
        (Some(a), Some(b)) if a != b => Err(DanError::InconsistentWidth {
            side: Side::Both,
            message: format!("dàn 1 là số {}, dàn 2 là số {}", a, b),
        }),
        _ => Ok(()),
    }
}

fn require_non_empty(dan: &Dan, side: Side) -> DanResult<()> {
    if dan.is_empty() {
        debug!(%side, "dàn rỗng");
        return Err(DanError::NoValidInput);
    }
    Ok(())
}

pub fn intersect(dan1: &Dan, dan2: &Dan) -> DanResult<Vec<Token>> {
    check_pair(dan1, dan2)?;
    require_non_empty(dan1, Side::Dan1)?;
    require_non_empty(dan2, Side::Dan2)?;
    Ok(dan1.tokens.iter().filter(|t| dan2.tokens.contains(t)).cloned().collect())
}

pub fn union(dan1: &Dan, dan2: &Dan) -> DanResult<Vec<Token>> {
    check_pair(dan1, dan2)?;
    require_non_empty(dan1, Side::Dan1)?;
    require_non_empty(dan2, Side::Dan2)?;
    let mut out: Vec<Token> = dan1.tokens.iter().chain(dan2.tokens.iter()).cloned().collect();
    sort_numeric(&mut out);
    out.dedup();
    Ok(out)
}

/// Số thuộc dàn 1 nhưng không thuộc dàn 2. Dàn 2 rỗng thì kết quả là dàn 1.
pub fn difference(dan1: &Dan, dan2: &Dan) -> DanResult<Vec<Token>> {
    check_pair(dan1, dan2)?;
    require_non_empty(dan1, Side::Dan1)?;
    Ok(dan1.tokens.iter().filter(|t| !dan2.tokens.contains(t)).cloned().collect())
}

pub fn reverse_difference(dan1: &Dan, dan2: &Dan) -> DanResult<Vec<Token>> {
    check_pair(dan1, dan2)?;
    require_non_empty(dan2, Side::Dan2)?;
    Ok(dan2.tokens.iter().filter(|t| !dan1.tokens.contains(t)).cloned().collect())
}

/// Đọc hai dàn dạng văn bản rồi áp dụng phép toán.
pub fn apply(op: SetOp, input1: &str, input2: &str) -> DanResult<Vec<Token>> {
    let dan1 = parse_dan(input1, Side::Dan1)?;
    let dan2 = parse_dan(input2, Side::Dan2)?;
    let result = match op {
        SetOp::Intersect => intersect(&dan1, &dan2),
        SetOp::Union => union(&dan1, &dan2),
        SetOp::Difference => difference(&dan1, &dan2),
        SetOp::ReverseDifference => reverse_difference(&dan1, &dan2),
    }?;
    debug!(?op, left = dan1.tokens.len(), right = dan2.tokens.len(), result = result.len(), "lọc ghép dàn");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dan_dedup_sorted() {
        let dan = parse_dan("34, 12 34;05", Side::Dan1).unwrap();
        assert_eq!(dan.width, Some(Width::Two));
        assert_eq!(dan.tokens, vec!["05", "12", "34"]);
    }

    #[test]
    fn test_mixed_width_rejected_with_side() {
        let err = apply(SetOp::Intersect, "12,345", "67").unwrap_err();
        match err {
            DanError::InconsistentWidth { side, .. } => assert_eq!(side, Side::Dan1),
            other => panic!("unexpected {other:?}"),
        }
        let err = apply(SetOp::Union, "12", "67,8").unwrap_err();
        assert!(matches!(err, DanError::InconsistentWidth { side: Side::Dan2, .. }));
    }

    #[test]
    fn test_width_mismatch_between_sides() {
        let err = apply(SetOp::Intersect, "12,34", "123,456").unwrap_err();
        assert!(matches!(err, DanError::InconsistentWidth { side: Side::Both, .. }));
    }

    #[test]
    fn test_unsupported_width() {
        let err = apply(SetOp::Union, "12345", "12345").unwrap_err();
        assert!(matches!(err, DanError::InconsistentWidth { side: Side::Dan1, .. }));
    }

    #[test]
    fn test_intersect() {
        assert_eq!(apply(SetOp::Intersect, "12 34 56", "56,12,78").unwrap(), vec!["12", "56"]);
    }

    #[test]
    fn test_union() {
        assert_eq!(apply(SetOp::Union, "56 12", "34 12").unwrap(), vec!["12", "34", "56"]);
    }

    #[test]
    fn test_difference_and_reverse() {
        assert_eq!(apply(SetOp::Difference, "12 34 56", "34").unwrap(), vec!["12", "56"]);
        assert_eq!(apply(SetOp::ReverseDifference, "34", "12 34 56").unwrap(), vec!["12", "56"]);
    }

    #[test]
    fn test_difference_empty_second() {
        assert_eq!(apply(SetOp::Difference, "1234 5678", "").unwrap(), vec!["1234", "5678"]);
    }

    #[test]
    fn test_empty_operands() {
        assert_eq!(apply(SetOp::Intersect, "", "12").unwrap_err(), DanError::NoValidInput);
        assert_eq!(apply(SetOp::Union, "12", " ").unwrap_err(), DanError::NoValidInput);
        assert_eq!(apply(SetOp::Difference, "", "12").unwrap_err(), DanError::NoValidInput);
        assert_eq!(apply(SetOp::ReverseDifference, "12", "").unwrap_err(), DanError::NoValidInput);
    }

    #[test]
    fn test_idempotence() {
        let a = "45 07 99 45";
        let expected = vec!["07", "45", "99"];
        assert_eq!(apply(SetOp::Union, a, a).unwrap(), expected);
        assert_eq!(apply(SetOp::Intersect, a, a).unwrap(), expected);
        assert!(apply(SetOp::Difference, a, a).unwrap().is_empty());
    }

    #[test]
    fn test_three_digit_ops() {
        assert_eq!(apply(SetOp::Intersect, "123 456", "456 789").unwrap(), vec!["456"]);
    }
}
