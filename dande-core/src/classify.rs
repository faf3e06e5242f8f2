use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::models::{Level, Token};

/// Bảng tần suất, nhớ thứ tự xuất hiện lần đầu của từng số.
#[derive(Debug, Clone, Default)]
pub struct FrequencyMap {
    counts: HashMap<Token, u32>,
    order: Vec<Token>,
}

impl FrequencyMap {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut map = FrequencyMap::default();
        for t in tokens {
            map.add(t.as_ref());
        }
        map
    }

    pub fn add(&mut self, token: &str) {
        match self.counts.get_mut(token) {
            Some(c) => *c += 1,
            None => {
                self.counts.insert(token.to_string(), 1);
                self.order.push(token.to_string());
            }
        }
    }

    pub fn count(&self, token: &str) -> u32 {
        self.counts.get(token).copied().unwrap_or(0)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.counts.contains_key(token)
    }

    /// Số phân biệt, theo thứ tự xuất hiện.
    pub fn distinct(&self) -> &[Token] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.order.iter().map(|t| (t.as_str(), self.counts[t]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Chia `universe` theo số lần xuất hiện trong `tokens`. Trong mỗi mức, thứ tự
/// của `universe` được giữ nguyên. Chỉ trả về các mức khác rỗng, tần suất tăng dần.
pub fn classify<S: AsRef<str>>(tokens: &[S], universe: &[Token]) -> Vec<Level> {
    let freq = FrequencyMap::from_tokens(tokens);
    let mut buckets: BTreeMap<u32, Vec<Token>> = BTreeMap::new();

    for t in universe {
        buckets.entry(freq.count(t)).or_default().push(t.clone());
    }

    let levels: Vec<Level> = buckets
        .into_iter()
        .map(|(frequency, tokens)| Level { frequency, tokens })
        .collect();
    debug!(tokens = tokens.len(), universe = universe.len(), levels = levels.len(), "phân mức");
    levels
}

/// Tập nền cho 3D/4D: các số phân biệt theo thứ tự xuất hiện.
pub fn discovered_universe<S: AsRef<str>>(tokens: &[S]) -> Vec<Token> {
    FrequencyMap::from_tokens(tokens).distinct().to_vec()
}

/// Đếm từng chữ số 0-9; mỗi ký tự của mỗi số được tính riêng ("55" cộng 2 cho chữ số 5).
pub fn digit_frequencies<S: AsRef<str>>(tokens: &[S]) -> [u32; 10] {
    let mut counts = [0u32; 10];
    for t in tokens {
        for b in t.as_ref().bytes() {
            if b.is_ascii_digit() {
                counts[(b - b'0') as usize] += 1;
            }
        }
    }
    counts
}

/// Phân mức cho 10 chữ số theo cùng quy tắc như `classify`.
pub fn classify_digits<S: AsRef<str>>(tokens: &[S]) -> Vec<Level> {
    let counts = digit_frequencies(tokens);
    let mut buckets: BTreeMap<u32, Vec<Token>> = BTreeMap::new();
    for (digit, &count) in counts.iter().enumerate() {
        buckets.entry(count).or_default().push(digit.to_string());
    }
    buckets
        .into_iter()
        .map(|(frequency, tokens)| Level { frequency, tokens })
        .collect()
}

/// Ghép các mức được chọn theo thứ tự chọn; khoá trùng hoặc không tồn tại bị bỏ qua.
pub fn select_levels(levels: &[Level], keys: &[u32]) -> Vec<Token> {
    let mut out = Vec::new();
    let mut used = Vec::with_capacity(keys.len());
    for &key in keys {
        if used.contains(&key) {
            continue;
        }
        used.push(key);
        if let Some(level) = levels.iter().find(|l| l.frequency == key) {
            out.extend(level.tokens.iter().cloned());
        }
    }
    out
}
