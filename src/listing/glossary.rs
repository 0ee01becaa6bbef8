//! Glossary: term search, reading order and the gojūon index

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::dataset::Slugged;
use super::filter::is_all_category;
use super::item::null_as_default;

lazy_static! {
    static ref NON_SLUG: Regex = Regex::new(r"[^a-z0-9一-龠ぁ-んァ-ン-]+").unwrap();
}

/// Group for anything that is neither kana, latin nor a digit
pub const OTHER_GROUP: &str = "他";

/// Index rows and the hiragana ranges they cover, in display order
const GOJUON_GROUPS: &[(&str, char, char)] = &[
    ("あ", 'ぁ', 'お'),
    ("か", 'か', 'ご'),
    ("さ", 'さ', 'ぞ'),
    ("た", 'た', 'ど'),
    ("な", 'な', 'の'),
    ("は", 'は', 'ぽ'),
    ("ま", 'ま', 'も'),
    ("や", 'ゃ', 'よ'),
    ("ら", 'ら', 'ろ'),
    ("わ", 'ゎ', 'ん'),
];

/// A glossary entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlossaryItem {
    #[serde(deserialize_with = "null_as_default")]
    pub term: String,
    /// Kana reading used for ordering; katakana is fine
    pub reading: Option<String>,
    pub slug: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub desc: String,
    pub category: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub synonyms: Vec<String>,
    pub badge: Option<String>,
    pub updated_at: Option<String>,
}

impl GlossaryItem {
    /// Fragment id of the entry: its slug, or one derived from the term
    pub fn anchor(&self) -> String {
        match self.slug.as_deref().filter(|s| !s.is_empty()) {
            Some(slug) => slug.trim_start_matches('#').to_string(),
            None => to_slug(&self.term),
        }
    }

    /// Reading, or the term itself, normalized for ordering
    pub fn sort_key(&self) -> String {
        let reading = self
            .reading
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.term);
        normalize_kana(reading)
    }

    /// Index row of the entry
    pub fn group(&self) -> &'static str {
        group_key(&self.sort_key())
    }
}

impl Slugged for GlossaryItem {
    fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or(&self.term)
    }
}

/// Fold katakana to hiragana and full-width ASCII to half-width, then trim
pub fn normalize_kana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            '\u{3000}' => ' ',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Index row for a normalized reading
pub fn group_key(normalized: &str) -> &'static str {
    let Some(first) = normalized.chars().next() else {
        return OTHER_GROUP;
    };
    for (key, lo, hi) in GOJUON_GROUPS {
        if (*lo..=*hi).contains(&first) {
            return *key;
        }
    }
    if first.is_ascii_alphabetic() {
        "英"
    } else if first.is_ascii_digit() {
        "数"
    } else {
        OTHER_GROUP
    }
}

/// URL fragment for a term: lowercase, runs of other characters become `-`
pub fn to_slug(term: &str) -> String {
    NON_SLUG
        .replace_all(&term.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Category filter then case-insensitive search over term, reading, synonyms and description
pub fn filter(items: &[GlossaryItem], query: &str, category: &str) -> Vec<GlossaryItem> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| is_all_category(category) || item.category.as_deref() == Some(category))
        .filter(|item| {
            if query.is_empty() {
                return true;
            }
            let mut hay = vec![item.term.as_str(), item.reading.as_deref().unwrap_or_default()];
            hay.extend(item.synonyms.iter().map(String::as_str));
            hay.push(&item.desc);
            hay.join("\n").to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Sort by normalized reading, stable on ties
pub fn sort_by_reading(items: &mut [GlossaryItem]) {
    items.sort_by_cached_key(GlossaryItem::sort_key);
}

/// Entries grouped by index row, rows in gojūon order, empty rows left out
pub fn group(items: &[GlossaryItem]) -> Vec<(&'static str, Vec<GlossaryItem>)> {
    let order = GOJUON_GROUPS
        .iter()
        .map(|(key, _, _)| *key)
        .chain(["英", "数", OTHER_GROUP]);

    order
        .filter_map(|key| {
            let members: Vec<GlossaryItem> = items.iter().filter(|i| i.group() == key).cloned().collect();
            if members.is_empty() {
                None
            } else {
                Some((key, members))
            }
        })
        .collect()
}

/// Distinct categories, sorted
pub fn categories(items: &[GlossaryItem]) -> Vec<String> {
    let mut cats: Vec<String> = items
        .iter()
        .filter_map(|i| i.category.clone())
        .filter(|c| !c.is_empty())
        .collect();
    cats.sort();
    cats.dedup();
    cats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(term: &str, reading: Option<&str>, category: Option<&str>) -> GlossaryItem {
        GlossaryItem {
            term: term.to_string(),
            reading: reading.map(str::to_string),
            category: category.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_kana() {
        assert_eq!(normalize_kana("カオアワセ"), "かおあわせ");
        assert_eq!(normalize_kana("ＰＲ１"), "PR1");
        assert_eq!(normalize_kana(" てあて "), "てあて");
    }

    #[test]
    fn test_group_key() {
        assert_eq!(group_key("かおあわせ"), "か");
        assert_eq!(group_key("ぱぱかつ"), "は");
        assert_eq!(group_key("ゆうはい"), "や");
        assert_eq!(group_key("んー"), "わ");
        assert_eq!(group_key("sugar"), "英");
        assert_eq!(group_key("2回目"), "数");
        assert_eq!(group_key("顔合わせ"), "他");
        assert_eq!(group_key(""), "他");
    }

    #[test]
    fn test_sort_and_group() {
        let mut items = vec![
            item("お手当", Some("おてあて"), Some("お金")),
            item("顔合わせ", Some("カオアワセ"), Some("初回")),
            item("P活", Some("ぴーかつ"), None),
            item("NG", None, None),
            item("相席", Some("あいせき"), None),
        ];
        sort_by_reading(&mut items);
        let terms: Vec<&str> = items.iter().map(|i| i.term.as_str()).collect();
        assert_eq!(terms, vec!["NG", "相席", "お手当", "顔合わせ", "P活"]);

        let groups: Vec<(&str, usize)> = group(&items).into_iter().map(|(k, v)| (k, v.len())).collect();
        assert_eq!(groups, vec![("あ", 2), ("か", 1), ("は", 1), ("英", 1)]);
    }

    #[test]
    fn test_filter() {
        let mut items = vec![
            item("顔合わせ", Some("かおあわせ"), Some("初回")),
            item("お手当", Some("おてあて"), Some("お金")),
        ];
        items[1].synonyms = vec!["Allowance".to_string()];
        items[0].desc = "初回に条件を確認する短い面談".to_string();

        assert_eq!(filter(&items, "", "all").len(), 2);
        assert_eq!(filter(&items, "allow", "all")[0].term, "お手当");
        assert_eq!(filter(&items, "面談", "all")[0].term, "顔合わせ");
        assert_eq!(filter(&items, "カオ", "all").len(), 0);
        assert_eq!(filter(&items, "", "お金")[0].term, "お手当");
        assert!(filter(&items, "allow", "初回").is_empty());
    }

    #[test]
    fn test_slugs_and_categories() {
        assert_eq!(to_slug("Sugar Daddy!"), "sugar-daddy");
        assert_eq!(to_slug("顔合わせ"), "顔合わせ");
        let mut with_slug = item("お手当", None, None);
        with_slug.slug = Some("#oteate".to_string());
        assert_eq!(with_slug.anchor(), "oteate");
        assert_eq!(item("NG行為", None, None).anchor(), "ng行為");

        let items = vec![
            item("a", None, Some("初回")),
            item("b", None, Some("お金")),
            item("c", None, Some("初回")),
            item("d", None, None),
        ];
        assert_eq!(categories(&items), vec!["お金", "初回"]);
    }
}
