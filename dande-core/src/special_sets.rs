use once_cell::sync::Lazy;

use crate::config::Limits;
use crate::error::{DanError, DanResult};
use crate::models::{Token, head_tail, pad2, sort_numeric, universe_2d};

#[derive(Debug, Clone)]
pub struct SpecialSet {
    pub id: String,
    pub name: String,
    pub tokens: Vec<Token>,
}

const ZODIAC: [(&str, &str); 12] = [
    ("ty", "Tý"),
    ("suu", "Sửu"),
    ("dan", "Dần"),
    ("mao", "Mão"),
    ("thin", "Thìn"),
    ("ti", "Tỵ"),
    ("ngo", "Ngọ"),
    ("mui", "Mùi"),
    ("than", "Thân"),
    ("dau", "Dậu"),
    ("tuat", "Tuất"),
    ("hoi", "Hợi"),
];

fn matching(id: String, name: String, pred: impl Fn(u8, u8) -> bool) -> SpecialSet {
    let tokens = universe_2d()
        .into_iter()
        .filter(|t| head_tail(t).is_some_and(|(h, d)| pred(h, d)))
        .collect();
    SpecialSet { id, name, tokens }
}

fn build_registry() -> Vec<SpecialSet> {
    let mut sets = vec![
        matching("kep-bang".into(), "Kép bằng".into(), |h, d| h == d),
        matching("kep-lech".into(), "Kép lệch".into(), |h, d| (h + 5) % 10 == d),
    ];

    for n in 0..10u8 {
        sets.push(matching(format!("dau-{n}"), format!("Đầu {n}"), move |h, _| h == n));
    }
    for n in 0..10u8 {
        sets.push(matching(format!("duoi-{n}"), format!("Đuôi {n}"), move |_, d| d == n));
    }
    for n in 0..10u8 {
        sets.push(matching(format!("tong-{n}"), format!("Tổng {n}"), move |h, d| (h + d) % 10 == n));
    }
    for n in 0..10u8 {
        sets.push(matching(format!("hieu-{n}"), format!("Hiệu {n}"), move |h, d| (d + 10 - h) % 10 == n));
    }

    // Con giáp theo số dư cho 12, Tý = 00
    for (i, (id, name)) in ZODIAC.iter().enumerate() {
        sets.push(SpecialSet {
            id: format!("giap-{id}"),
            name: format!("Tuổi {name}"),
            tokens: (0..100u8).filter(|n| *n as usize % 12 == i).map(pad2).collect(),
        });
    }

    sets.push(SpecialSet {
        id: "ngay".into(),
        name: "Ngày (01-31)".into(),
        tokens: (1..=31u8).map(pad2).collect(),
    });
    sets.push(SpecialSet {
        id: "thang".into(),
        name: "Tháng (01-12)".into(),
        tokens: (1..=12u8).map(pad2).collect(),
    });

    sets
}

static REGISTRY: Lazy<Vec<SpecialSet>> = Lazy::new(build_registry);

pub fn all() -> &'static [SpecialSet] {
    &REGISTRY
}

pub fn find(id: &str) -> Option<&'static SpecialSet> {
    let id = id.trim().to_lowercase();
    REGISTRY.iter().find(|s| s.id == id)
}

/// Tra cứu các bộ theo mã, kiểm tra giới hạn số bộ.
pub fn lookup<S: AsRef<str>>(ids: &[S], limits: &Limits) -> DanResult<Vec<&'static SpecialSet>> {
    if ids.len() > limits.max_special_sets {
        return Err(DanError::TooManyEntries {
            field: "Bộ số đặc biệt",
            limit: limits.max_special_sets,
            got: ids.len(),
        });
    }
    ids.iter()
        .map(|id| find(id.as_ref()).ok_or_else(|| DanError::UnknownSpecialSet(id.as_ref().to_string())))
        .collect()
}

/// Hợp các bộ: tăng dần, không trùng.
pub fn union_of(sets: &[&SpecialSet]) -> Vec<Token> {
    let mut out: Vec<Token> = sets.iter().flat_map(|s| s.tokens.iter().cloned()).collect();
    sort_numeric(&mut out);
    out.dedup();
    out
}

pub fn combine<S: AsRef<str>>(ids: &[S], limits: &Limits) -> DanResult<Vec<Token>> {
    Ok(union_of(&lookup(ids, limits)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_ids_unique() {
        let mut ids: Vec<&str> = all().iter().map(|s| s.id.as_str()).collect();
        let n = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), n);
        assert_eq!(n, 2 + 40 + 12 + 2);
    }

    #[test]
    fn test_kep_sets() {
        let bang = find("kep-bang").unwrap();
        assert_eq!(bang.tokens.len(), 10);
        assert_eq!(bang.tokens[3], "33");
        let lech = find("kep-lech").unwrap();
        assert_eq!(lech.tokens, vec!["05", "16", "27", "38", "49", "50", "61", "72", "83", "94"]);
    }

    #[test]
    fn test_digit_sets_have_ten() {
        for prefix in ["dau", "duoi", "tong", "hieu"] {
            for n in 0..10 {
                let set = find(&format!("{prefix}-{n}")).unwrap();
                assert_eq!(set.tokens.len(), 10, "{}", set.id);
            }
        }
        assert!(find("tong-5").unwrap().tokens.contains(&"87".to_string()));
        assert!(find("hieu-3").unwrap().tokens.contains(&"14".to_string()));
        assert!(find("hieu-3").unwrap().tokens.contains(&"70".to_string()));
    }

    #[test]
    fn test_zodiac_sets() {
        let ty = find("giap-ty").unwrap();
        assert_eq!(ty.tokens, vec!["00", "12", "24", "36", "48", "60", "72", "84", "96"]);
        let hoi = find("giap-hoi").unwrap();
        assert_eq!(hoi.tokens.first().map(String::as_str), Some("11"));
        let total: usize = ZODIAC.iter().map(|(id, _)| find(&format!("giap-{id}")).unwrap().tokens.len()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_find_case_insensitive() {
        assert!(find(" KEP-BANG ").is_some());
        assert!(find("khong-co").is_none());
    }

    #[test]
    fn test_combine_union_sorted() {
        let tokens = combine(&["thang", "kep-bang"], &Limits::default()).unwrap();
        assert_eq!(tokens.len(), 12 + 10 - 1);
        assert_eq!(&tokens[..3], &["00", "01", "02"]);
        let mut sorted = tokens.clone();
        sorted.sort();
        assert_eq!(sorted, tokens);
    }

    #[test]
    fn test_combine_cap() {
        let ids = ["dau-0", "dau-1", "dau-2", "dau-3", "dau-4", "dau-5"];
        let err = combine(&ids, &Limits::default()).unwrap_err();
        assert_eq!(err, DanError::TooManyEntries { field: "Bộ số đặc biệt", limit: 5, got: 6 });
    }

    #[test]
    fn test_combine_unknown() {
        let err = combine(&["xyz"], &Limits::default()).unwrap_err();
        assert_eq!(err, DanError::UnknownSpecialSet("xyz".to_string()));
    }
}
