use chrono::{DateTime, Utc};

use super::types::SqlParam;

/// Accumulates AND-joined predicates and the values bound to their
/// placeholders. Column names are always `&'static str` so caller input can
/// only ever reach the query as a bound value.
#[derive(Debug, Default)]
pub struct FilterWhere {
    param_values: Vec<SqlParam>,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after parameters already bound by an earlier clause
    /// (e.g. the SET list of an UPDATE).
    pub fn continuing(param_values: Vec<SqlParam>) -> Self {
        Self {
            param_values,
            conditions: vec![],
        }
    }

    pub fn eq(&mut self, column: &'static str, value: impl Into<SqlParam>) -> &mut Self {
        let placeholder = self.param(value.into());
        self.conditions.push(format!("{} = {}", column, placeholder));
        self
    }

    pub fn gte(&mut self, column: &'static str, value: DateTime<Utc>) -> &mut Self {
        let placeholder = self.param(SqlParam::Timestamp(value));
        self.conditions.push(format!("{} >= {}", column, placeholder));
        self
    }

    pub fn lte(&mut self, column: &'static str, value: DateTime<Utc>) -> &mut Self {
        let placeholder = self.param(SqlParam::Timestamp(value));
        self.conditions.push(format!("{} <= {}", column, placeholder));
        self
    }

    /// Case-insensitive substring match against any of `columns`. The term is
    /// bound once and shared by every column.
    pub fn ilike_any(&mut self, columns: &[&'static str], term: &str) -> &mut Self {
        if columns.is_empty() {
            return self;
        }
        let placeholder = self.param(SqlParam::Text(format!("%{}%", escape_like(term))));
        let parts: Vec<String> = columns
            .iter()
            .map(|c| format!("{} ILIKE {}", c, placeholder))
            .collect();
        if let [single] = parts.as_slice() {
            self.conditions.push(single.clone());
        } else {
            self.conditions.push(format!("({})", parts.join(" OR ")));
        }
        self
    }

    /// Array containment: the stored array must carry every element of `values`.
    pub fn contains_all(&mut self, column: &'static str, values: Vec<String>) -> &mut Self {
        let placeholder = self.param(SqlParam::TextArray(values));
        self.conditions.push(format!("{} @> {}::text[]", column, placeholder));
        self
    }

    /// Bind a value that is referenced outside the WHERE clause (LIMIT/OFFSET).
    pub fn bind(&mut self, value: impl Into<SqlParam>) -> String {
        self.param(value.into())
    }

    /// Render the predicate list; an empty builder renders `TRUE`.
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            "TRUE".to_string()
        } else {
            self.conditions.join(" AND ")
        }
    }

    pub fn into_params(self) -> Vec<SqlParam> {
        self.param_values
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}

/// Escape LIKE metacharacters so the term matches literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
