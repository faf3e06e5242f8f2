use tracing::debug;

use crate::error::{DanError, DanResult};
use crate::models::{Token, Width};

fn is_separator(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

/// Chỉ chấp nhận chữ số và dấu phân cách; lỗi ở ký tự sai đầu tiên.
pub fn check_characters(input: &str) -> DanResult<()> {
    match input
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_digit() && !is_separator(*c))
    {
        Some((position, ch)) => Err(DanError::InvalidCharacter { ch, position }),
        None => Ok(()),
    }
}

/// Tách chuỗi thành các mảnh số. Mọi chuỗi `;`/khoảng trắng/dấu phẩy liên tiếp
/// được coi là một dấu phẩy duy nhất; mảnh rỗng bị bỏ.
pub fn split_pieces(input: &str) -> DanResult<Vec<&str>> {
    check_characters(input)?;
    Ok(input
        .split(is_separator)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect())
}

/// Cửa sổ trượt độ rộng `width`, bước 1: "123456" -> 12, 23, 34, 45, 56.
fn sliding(piece: &str, width: usize, out: &mut Vec<Token>) {
    if piece.len() < width {
        return;
    }
    for start in 0..=(piece.len() - width) {
        out.push(piece[start..start + width].to_string());
    }
}

/// Chuẩn hoá văn bản tự do thành danh sách số độ rộng cố định. Không khử trùng lặp.
///
/// Ở chế độ 2 chữ số, mảnh 1 chữ số được đệm thành `0d`. Ở chế độ 3/4 chữ số,
/// mảnh ngắn hơn độ rộng bị bỏ qua.
pub fn normalize(input: &str, width: Width) -> DanResult<Vec<Token>> {
    let pieces = split_pieces(input)?;
    let w = width.digits();
    let mut tokens = Vec::with_capacity(pieces.len());

    for piece in &pieces {
        if width == Width::Two && piece.len() == 1 {
            tokens.push(format!("0{}", piece));
        } else {
            sliding(piece, w, &mut tokens);
        }
    }

    debug!(pieces = pieces.len(), tokens = tokens.len(), %width, "chuẩn hoá xong");
    Ok(tokens)
}

/// Danh sách người dùng nhập tay ("thêm số", "loại bỏ"): giữ thứ tự, bỏ trùng.
pub fn parse_number_list(input: &str) -> DanResult<Vec<Token>> {
    let mut seen = std::collections::HashSet::new();
    Ok(normalize(input, Width::Two)?
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sliding_window_2d() {
        let tokens = normalize("123456", Width::Two).unwrap();
        assert_eq!(tokens, vec!["12", "23", "34", "45", "56"]);
    }

    #[test]
    fn test_sliding_window_count() {
        for n in 2..12 {
            let piece: String = (0..n).map(|i| char::from(b'0' + (i % 10) as u8)).collect();
            assert_eq!(normalize(&piece, Width::Two).unwrap().len(), n - 1, "piece {}", piece);
        }
    }

    #[test]
    fn test_tokens_are_two_digits() {
        let tokens = normalize("1, 23;456\n7  8901", Width::Two).unwrap();
        for t in &tokens {
            assert_eq!(t.len(), 2);
            assert!(t.bytes().all(|b| b.is_ascii_digit()));
        }
        assert_eq!(tokens, vec!["01", "23", "45", "56", "07", "89", "90", "01"]);
    }

    #[test]
    fn test_separators_collapse() {
        let tokens = normalize(",,12;; 34 ,\t,56,,", Width::Two).unwrap();
        assert_eq!(tokens, vec!["12", "34", "56"]);
    }

    #[test]
    fn test_duplicates_kept() {
        let tokens = normalize("11,11,22", Width::Two).unwrap();
        assert_eq!(tokens, vec!["11", "11", "22"]);
    }

    #[test]
    fn test_invalid_character_fails_fast() {
        let err = normalize("12,3a4", Width::Two).unwrap_err();
        assert_eq!(err, DanError::InvalidCharacter { ch: 'a', position: 4 });
        assert!(normalize("12-34", Width::Two).is_err());
    }

    #[test]
    fn test_3d_mode() {
        let tokens = normalize("123, 4567, 89", Width::Three).unwrap();
        assert_eq!(tokens, vec!["123", "456", "567"]);
    }

    #[test]
    fn test_4d_mode() {
        let tokens = normalize("12345 678", Width::Four).unwrap();
        assert_eq!(tokens, vec!["1234", "2345"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize("", Width::Two).unwrap().is_empty());
        assert!(normalize(" ,; ", Width::Three).unwrap().is_empty());
    }

    #[test]
    fn test_parse_number_list_dedup() {
        let list = parse_number_list("45, 5, 45, 12").unwrap();
        assert_eq!(list, vec!["45", "05", "12"]);
    }

    #[test]
    fn test_split_pieces_keeps_raw_widths() {
        let pieces = split_pieces("12 345;6789").unwrap();
        assert_eq!(pieces, vec!["12", "345", "6789"]);
    }
}
