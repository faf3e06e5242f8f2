use serde::{Deserialize, Serialize};

/// Số có độ dài cố định (giữ nguyên số 0 ở đầu), ví dụ "05", "123".
pub type Token = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Width {
    Two,
    Three,
    Four,
}

impl Width {
    pub fn digits(&self) -> usize {
        match self {
            Width::Two => 2,
            Width::Three => 3,
            Width::Four => 4,
        }
    }

    pub fn from_digits(n: usize) -> Option<Width> {
        match n {
            2 => Some(Width::Two),
            3 => Some(Width::Three),
            4 => Some(Width::Four),
            _ => None,
        }
    }
}

impl std::fmt::Display for Width {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}D", self.digits())
    }
}

/// Một mức: các số xuất hiện đúng `frequency` lần.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub frequency: u32,
    pub tokens: Vec<Token>,
}

/// Kết quả lọc cho một mức của công cụ lọc dàn (chỉ số 0-9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterLevelResult {
    pub index: usize,
    pub target: usize,
    pub tokens: Vec<Token>,
}

pub fn pad2(n: u8) -> Token {
    format!("{:02}", n)
}

/// 00..99 theo thứ tự tăng dần.
pub fn universe_2d() -> Vec<Token> {
    (0..100u8).map(pad2).collect()
}

/// Kép: số 2 chữ số có hai chữ số giống nhau (00, 11, ..., 99).
pub fn is_double(token: &str) -> bool {
    let b = token.as_bytes();
    b.len() == 2 && b[0] == b[1]
}

/// Đầu và đuôi của một số 2 chữ số.
pub fn head_tail(token: &str) -> Option<(u8, u8)> {
    let b = token.as_bytes();
    if b.len() != 2 || !b.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some((b[0] - b'0', b[1] - b'0'))
}

pub fn sort_numeric(tokens: &mut [Token]) {
    tokens.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
}
