use tracing::debug;

use crate::classify::{classify, classify_digits, discovered_universe, select_levels};
use crate::config::Limits;
use crate::error::{DanError, DanResult};
use crate::format::join_tokens;
use crate::models::{Level, Token, Width, universe_2d};
use crate::tokenizer::normalize;

/// Trạng thái ngay trước một thao tác xoá / áp dụng lọc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoSnapshot {
    pub input: String,
    pub levels: Vec<Level>,
    pub selected: Vec<u32>,
}

/// Phiên làm việc của công cụ tạo dàn. Chỉ giữ một bản hoàn tác gần nhất.
#[derive(Debug, Clone)]
pub struct Session {
    width: Width,
    limits: Limits,
    input: String,
    tokens: Vec<Token>,
    levels: Vec<Level>,
    selected: Vec<u32>,
    undo: Option<UndoSnapshot>,
}

fn derive_levels(tokens: &[Token], width: Width) -> Vec<Level> {
    let universe = match width {
        Width::Two => universe_2d(),
        Width::Three | Width::Four => discovered_universe(tokens),
    };
    classify(tokens, &universe)
}

impl Session {
    pub fn new(width: Width, limits: Limits) -> Self {
        Self {
            width,
            limits,
            input: String::new(),
            tokens: Vec::new(),
            levels: derive_levels(&[], width),
            selected: Vec::new(),
            undo: None,
        }
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn selected(&self) -> &[u32] {
        &self.selected
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Nhập lại dữ liệu và tính lại toàn bộ mức. Lỗi thì phiên giữ nguyên.
    pub fn set_input(&mut self, text: &str) -> DanResult<()> {
        let got = text.chars().count();
        if got > self.limits.max_input_chars {
            return Err(DanError::InputTooLong { limit: self.limits.max_input_chars, got });
        }
        let tokens = normalize(text, self.width)?;
        let levels = derive_levels(&tokens, self.width);

        self.selected.retain(|k| levels.iter().any(|l| l.frequency == *k));
        self.input = text.to_string();
        self.tokens = tokens;
        self.levels = levels;
        debug!(tokens = self.tokens.len(), levels = self.levels.len(), "cập nhật phiên");
        Ok(())
    }

    /// Bật/tắt một mức. Trả về `true` nếu mức đang được chọn sau thao tác.
    pub fn toggle_level(&mut self, key: u32) -> bool {
        if let Some(pos) = self.selected.iter().position(|&k| k == key) {
            self.selected.remove(pos);
            return false;
        }
        if !self.levels.iter().any(|l| l.frequency == key) {
            return false;
        }
        self.selected.push(key);
        true
    }

    pub fn selected_tokens(&self) -> Vec<Token> {
        select_levels(&self.levels, &self.selected)
    }

    pub fn digit_levels(&self) -> Vec<Level> {
        classify_digits(&self.tokens)
    }

    fn capture(&self) -> UndoSnapshot {
        UndoSnapshot {
            input: self.input.clone(),
            levels: self.levels.clone(),
            selected: self.selected.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.undo = Some(self.capture());
        self.input.clear();
        self.tokens.clear();
        self.levels = derive_levels(&[], self.width);
        self.selected.clear();
    }

    /// Thay dữ liệu nhập bằng kết quả lọc (sau khi chụp trạng thái để hoàn tác).
    pub fn apply_filter_result(&mut self, tokens: &[Token]) -> DanResult<()> {
        if self.width != Width::Two {
            return Err(DanError::UnsupportedWidth(self.width));
        }
        let text = join_tokens(tokens);
        let previous = self.capture();
        self.set_input(&text)?;
        self.undo = Some(previous);
        Ok(())
    }

    /// Khôi phục bản chụp gần nhất rồi bỏ nó. Không có gì để hoàn tác thì trả về `false`.
    pub fn undo(&mut self) -> bool {
        let Some(snap) = self.undo.take() else {
            return false;
        };
        self.tokens = normalize(&snap.input, self.width).unwrap_or_default();
        self.input = snap.input;
        self.levels = snap.levels;
        self.selected = snap.selected;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Width::Two, Limits::default())
    }

    #[test]
    fn test_new_session_all_level_zero() {
        let s = session();
        assert_eq!(s.levels().len(), 1);
        assert_eq!(s.levels()[0].tokens.len(), 100);
        assert!(!s.can_undo());
    }

    #[test]
    fn test_set_input_recomputes() {
        let mut s = session();
        s.set_input("12 12 34").unwrap();
        assert_eq!(s.levels().len(), 3);
        assert_eq!(s.tokens(), &["12", "12", "34"]);
    }

    #[test]
    fn test_set_input_error_keeps_state() {
        let mut s = session();
        s.set_input("12 12").unwrap();
        assert!(s.set_input("12 x").is_err());
        assert_eq!(s.input(), "12 12");
        assert_eq!(s.levels().len(), 2);
    }

    #[test]
    fn test_set_input_too_long() {
        let mut s = Session::new(Width::Two, Limits { max_input_chars: 5, ..Limits::default() });
        assert_eq!(s.set_input("12 34 56").unwrap_err(), DanError::InputTooLong { limit: 5, got: 8 });
    }

    #[test]
    fn test_toggle_and_selection_order() {
        let mut s = session();
        s.set_input("12 12 34").unwrap();
        assert!(s.toggle_level(1));
        assert!(s.toggle_level(2));
        assert_eq!(s.selected_tokens(), vec!["34", "12"]);
        assert!(!s.toggle_level(1));
        assert_eq!(s.selected(), &[2]);
        assert!(!s.toggle_level(9));
    }

    #[test]
    fn test_clear_then_undo() {
        let mut s = session();
        s.set_input("12 12 34").unwrap();
        s.toggle_level(2);
        s.clear();
        assert_eq!(s.input(), "");
        assert!(s.selected().is_empty());

        assert!(s.undo());
        assert_eq!(s.input(), "12 12 34");
        assert_eq!(s.selected(), &[2]);
        assert_eq!(s.selected_tokens(), vec!["12"]);
        assert_eq!(s.tokens().len(), 3);
    }

    #[test]
    fn test_undo_is_single_use() {
        let mut s = session();
        s.set_input("45").unwrap();
        s.clear();
        assert!(s.undo());
        assert!(!s.undo());
        assert_eq!(s.input(), "45");
    }

    #[test]
    fn test_only_latest_snapshot_kept() {
        let mut s = session();
        s.set_input("11").unwrap();
        s.clear();
        s.set_input("22").unwrap();
        s.clear();
        assert!(s.undo());
        assert_eq!(s.input(), "22");
        assert!(!s.undo());
    }

    #[test]
    fn test_apply_filter_result_and_undo() {
        let mut s = session();
        s.set_input("12 34 56").unwrap();
        s.apply_filter_result(&["34".to_string(), "56".to_string()]).unwrap();
        assert_eq!(s.input(), "34,56");
        assert!(s.undo());
        assert_eq!(s.input(), "12 34 56");
    }

    #[test]
    fn test_digit_levels() {
        let mut s = session();
        s.set_input("11,11,22").unwrap();
        let levels = s.digit_levels();
        let four = levels.iter().find(|l| l.frequency == 4).unwrap();
        assert_eq!(four.tokens, vec!["1"]);
    }

    #[test]
    fn test_three_digit_session() {
        let mut s = Session::new(Width::Three, Limits::default());
        assert!(s.levels().is_empty());
        s.set_input("123 123 456").unwrap();
        assert_eq!(s.levels().len(), 2);
        assert_eq!(s.levels()[1].tokens, vec!["123"]);
    }

    #[test]
    fn test_apply_filter_result_rejected_for_three_digits() {
        let mut s = Session::new(Width::Three, Limits::default());
        s.set_input("123 123 456").unwrap();
        let err = s.apply_filter_result(&["01".to_string(), "02".to_string()]).unwrap_err();
        assert_eq!(err, DanError::UnsupportedWidth(Width::Three));
        assert_eq!(s.input(), "123 123 456");
        assert_eq!(s.tokens(), &["123", "123", "456"]);
        assert!(!s.can_undo());
    }
}
