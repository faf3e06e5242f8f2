use crate::error::{DanError, DanResult};
use crate::models::{Token, head_tail, pad2, sort_numeric};

/// Bóng dương: 0-5, 1-6, 2-7, 3-8, 4-9.
pub fn shadow(digit: u8) -> u8 {
    (digit + 5) % 10
}

/// Bộ của một số 2 chữ số: mỗi chữ số được thay bằng chính nó hoặc bóng của nó,
/// lấy cả hai chiều đảo. "01" -> 01 06 10 15 51 56 60 65.
pub fn bo_of(token: &str) -> Option<Vec<Token>> {
    let (h, d) = head_tail(token)?;
    let mut out = Vec::with_capacity(8);
    for a in [h, shadow(h)] {
        for b in [d, shadow(d)] {
            out.push(format!("{a}{b}"));
            out.push(format!("{b}{a}"));
        }
    }
    sort_numeric(&mut out);
    out.dedup();
    Some(out)
}

/// Tạo dàn từ các bộ: hợp bộ của từng số nhập vào.
pub fn build_bo_dan<S: AsRef<str>>(tokens: &[S]) -> DanResult<Vec<Token>> {
    let mut out = Vec::new();
    for t in tokens {
        if let Some(bo) = bo_of(t.as_ref()) {
            out.extend(bo);
        }
    }
    if out.is_empty() {
        return Err(DanError::NoValidInput);
    }
    sort_numeric(&mut out);
    out.dedup();
    Ok(out)
}

/// Điều kiện tạo dàn đầu/đuôi/tổng. Danh sách rỗng nghĩa là không ràng buộc.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DauDuoiSpec {
    pub heads: Vec<u8>,
    pub tails: Vec<u8>,
    pub sums: Vec<u8>,
    pub exclude_doubles: bool,
}

fn accepts(set: &[u8], v: u8) -> bool {
    set.is_empty() || set.contains(&v)
}

pub fn build_dau_duoi(spec: &DauDuoiSpec) -> DanResult<Vec<Token>> {
    if spec.heads.is_empty() && spec.tails.is_empty() && spec.sums.is_empty() {
        return Err(DanError::NoValidInput);
    }
    let out: Vec<Token> = (0..100u8)
        .filter(|n| {
            let (h, d) = (n / 10, n % 10);
            accepts(&spec.heads, h)
                && accepts(&spec.tails, d)
                && accepts(&spec.sums, (h + d) % 10)
                && !(spec.exclude_doubles && h == d)
        })
        .map(pad2)
        .collect();
    Ok(out)
}
