//! Query parameter mapping
//!
//! Keys are kept in a `BTreeMap`, so serialization is always in
//! lexicographic key order no matter how the layers were assembled.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use url::form_urlencoded;

/// A single query value: either one string or a list serialized as repeated keys.
///
/// `Empty` is a key written without `=`, as in `?flag&x=1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Empty,
    One(String),
    Many(Vec<String>),
}

impl QueryValue {
    /// Values in serialization order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Empty => Vec::new(),
            QueryValue::One(value) => vec![value.as_str()],
            QueryValue::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(self, value: String) -> Self {
        match self {
            QueryValue::Empty => QueryValue::Many(vec![String::new(), value]),
            QueryValue::One(first) => QueryValue::Many(vec![first, value]),
            QueryValue::Many(mut values) => {
                values.push(value);
                QueryValue::Many(values)
            }
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values().join(","))
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::One(value.clone())
    }
}

macro_rules! query_value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::One(value.to_string())
                }
            }
        )*
    };
}

query_value_from_display!(i32, i64, u32, u64, usize, bool);

impl<T: ToString> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::Many(values.iter().map(ToString::to_string).collect())
    }
}

/// Ordered mapping of query keys to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(BTreeMap<String, QueryValue>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, QueryValue> {
        self.0.iter()
    }

    /// Shallow merge where keys of `other` win.
    pub fn merge(&self, other: &Query) -> Query {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Fold layers ordered from lowest to highest precedence.
    pub fn merge_layers<'a, I>(layers: I) -> Query
    where
        I: IntoIterator<Item = &'a Query>,
    {
        layers
            .into_iter()
            .fold(Query::new(), |acc, layer| acc.merge(layer))
    }

    /// Parse an `a=1&b=2&b=3` string. Repeated keys collect into [`QueryValue::Many`],
    /// keys without `=` become [`QueryValue::Empty`].
    pub fn parse(input: &str) -> Query {
        let mut query = BTreeMap::new();
        for pair in input.split('&').filter(|pair| !pair.is_empty()) {
            let bare = !pair.contains('=');
            let Some((key, value)) = form_urlencoded::parse(pair.as_bytes()).next() else {
                continue;
            };
            let key = key.into_owned();
            let next = match (query.remove(&key), bare) {
                (Some(existing), _) => QueryValue::push(existing, value.into_owned()),
                (None, true) => QueryValue::Empty,
                (None, false) => QueryValue::One(value.into_owned()),
            };
            query.insert(key, next);
        }
        Query(query)
    }

    /// Serialize as `&`-joined pairs, sorted by key, arrays as repeated keys.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            if let QueryValue::Empty = value {
                serializer.append_key_only(key);
                continue;
            }
            for item in value.values() {
                serializer.append_pair(key, item);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Query(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = btree_map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
