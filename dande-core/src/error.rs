use thiserror::Error;

use crate::models::Width;

/// Phía toán hạng của phép lọc ghép dàn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Dan1,
    Dan2,
    Both,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Dan1 => write!(f, "dàn 1"),
            Side::Dan2 => write!(f, "dàn 2"),
            Side::Both => write!(f, "hai dàn"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DanError {
    #[error("Ký tự không hợp lệ '{ch}' tại vị trí {position} (chỉ chấp nhận số, dấu phẩy, chấm phẩy, khoảng trắng)")]
    InvalidCharacter { ch: char, position: usize },

    #[error("Không có số hợp lệ trong dữ liệu nhập")]
    NoValidInput,

    #[error("Chưa chọn mức nào")]
    NoLevelSelected,

    #[error("Mức {0} không tồn tại (0-9)")]
    UnknownLevel(usize),

    #[error("Số {token} thuộc {origin} nhưng cũng nằm trong danh sách loại bỏ")]
    ConflictingSpecification { token: String, origin: String },

    #[error("Độ dài số không thống nhất ở {side}: {message}")]
    InconsistentWidth { side: Side, message: String },

    #[error("{field}: tối đa {limit} mục, nhận {got}")]
    TooManyEntries {
        field: &'static str,
        limit: usize,
        got: usize,
    },

    #[error("Dữ liệu nhập quá dài: tối đa {limit} ký tự, nhận {got}")]
    InputTooLong { limit: usize, got: usize },

    #[error("Thao tác chỉ dùng cho số 2 chữ số, phiên đang dùng số {0}")]
    UnsupportedWidth(Width),

    #[error("Bộ số đặc biệt không tồn tại : '{0}'")]
    UnknownSpecialSet(String),
}

pub type DanResult<T> = Result<T, DanError>;
