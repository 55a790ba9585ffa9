use super::filter_where::FilterWhere;
use super::types::SqlParam;

/// Builds the SET list of a partial UPDATE: only assigned columns appear.
#[derive(Debug, Default)]
pub struct FilterSet {
    param_values: Vec<SqlParam>,
    assignments: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, column: &'static str, value: impl Into<SqlParam>) -> &mut Self {
        self.param_values.push(value.into());
        self.assignments
            .push(format!("{} = ${}", column, self.param_values.len()));
        self
    }

    /// Assign only when the value is present.
    pub fn assign_opt<V: Into<SqlParam>>(&mut self, column: &'static str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            self.assign(column, v);
        }
        self
    }

    /// Refresh a timestamp column on the database clock.
    pub fn touch(&mut self, column: &'static str) -> &mut Self {
        self.assignments.push(format!("{} = NOW()", column));
        self
    }

    pub fn to_sql(&self) -> String {
        self.assignments.join(", ")
    }

    /// Hand the bound values over to a WHERE builder that continues numbering.
    pub fn into_where(self) -> (String, FilterWhere) {
        let set_clause = self.to_sql();
        (set_clause, FilterWhere::continuing(self.param_values))
    }
}
