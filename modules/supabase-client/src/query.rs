/// PostgREST query-string builder: column filters plus `select`, `order`, `limit`.
///
/// Values are passed through reqwest's query encoder, so keywords with spaces
/// or Hangul need no manual escaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns.to_string())
    }

    pub fn eq(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.param(column, format!("eq.{value}"))
    }

    pub fn neq(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.param(column, format!("neq.{value}"))
    }

    pub fn gte(self, column: &str, value: impl std::fmt::Display) -> Self {
        self.param(column, format!("gte.{value}"))
    }

    pub fn order_desc(self, column: &str) -> Self {
        self.param("order", format!("{column}.desc"))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.param("limit", limit.to_string())
    }

    /// Conflict target for merge-duplicates upserts.
    pub fn on_conflict(self, columns: &str) -> Self {
        self.param("on_conflict", columns.to_string())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn param(mut self, key: &str, value: String) -> Self {
        self.params.push((key.to_string(), value));
        self
    }
}
