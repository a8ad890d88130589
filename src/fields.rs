//! フィールド (ヘッダー) の集合

use std::collections::HashMap;
use std::collections::hash_map::{Entry, Iter};

/// フィールド名からフィールド値への対応
///
/// 名前は一意で、同じ名前のフィールド行が 2 回現れるとパースエラーになる
/// (複数値の結合は行わない)。
///
/// # 名前の大文字小文字
///
/// 名前は受信したとおりに保持し、**大文字小文字を区別して** 比較する。
/// RFC 9112 はフィールド名を大文字小文字を区別せずに扱うことを求めているため、
/// これは既知の相違点である。`Host` と `host` は別のフィールドとして扱われ、
/// 重複検出もこの規則に従う。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    map: HashMap<String, String>,
}

impl Fields {
    /// 空のフィールド集合を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// フィールド値を取得 (大文字小文字を区別する)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// フィールドが存在するか確認
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// フィールド数
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// フィールドがないか
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// すべてのフィールド (順序は不定)
    pub fn iter(&self) -> Iter<'_, String, String> {
        self.map.iter()
    }

    /// 未登録の名前のときだけ追加し、追加できたかを返す
    pub(crate) fn insert_unique(&mut self, name: String, value: String) -> bool {
        match self.map.entry(name) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }
}

/// 同じ名前が複数ある場合は後のものが残る
impl<N, V> FromIterator<(N, V)> for Fields
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a String);
    type IntoIter = Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
