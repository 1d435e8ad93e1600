//! Query-string construction
//!
//! Keys whose value is absent or empty are dropped. List values repeat the
//! key once per non-empty element. Insertion order is preserved.

/// A single query parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Absent,
    Scalar(String),
    List(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Scalar(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Scalar(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

macro_rules! query_value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::Scalar(value.to_string())
                }
            }
        )*
    };
}

query_value_from_number!(i32, i64, u32, u64, usize, f64);

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(QueryValue::Absent)
    }
}

impl<T: ToString> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::List(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for QueryValue {
    fn from(values: &[T]) -> Self {
        QueryValue::List(values.iter().map(ToString::to_string).collect())
    }
}

/// Ordered query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, QueryValue)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter (builder style)
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Add a parameter
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> &mut Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Encoded `key=value` pairs that survive the empty/absent filter
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.params {
            match value {
                QueryValue::Absent => {}
                QueryValue::Scalar(v) if v.is_empty() => {}
                QueryValue::Scalar(v) => pairs.push((key.clone(), v.clone())),
                QueryValue::List(items) => pairs.extend(
                    items
                        .iter()
                        .filter(|item| !item.is_empty())
                        .map(|item| (key.clone(), item.clone())),
                ),
            }
        }
        pairs
    }

    /// Whether nothing would be serialized
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// `?a=1&b=2`, or an empty string when nothing survives
    pub fn to_query_string(&self) -> String {
        let encoded: Vec<String> = self
            .pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(&k), urlencoding::encode(&v)))
            .collect();

        if encoded.is_empty() {
            String::new()
        } else {
            format!("?{}", encoded.join("&"))
        }
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (k, v) in iter {
            query.push(k, v);
        }
        query
    }
}
