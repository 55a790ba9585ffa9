use sqlx::postgres::{PgArguments, PgQueryResult, PgRow};
use sqlx::{FromRow, PgPool, Postgres, Row};

use crate::filter::types::{SqlParam, SqlResult};

/// Run a built query and collect every row.
pub async fn fetch_all<T>(pool: &PgPool, sql: &SqlResult) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query_as(q, p);
    }
    q.fetch_all(pool).await
}

pub async fn fetch_optional<T>(pool: &PgPool, sql: &SqlResult) -> Result<Option<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query_as(q, p);
    }
    q.fetch_optional(pool).await
}

/// Expects the query to select a single `count` column.
pub async fn fetch_count(pool: &PgPool, sql: &SqlResult) -> Result<i64, sqlx::Error> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query(q, p);
    }
    let row = q.fetch_one(pool).await?;
    row.try_get("count")
}

pub async fn execute(pool: &PgPool, sql: &SqlResult) -> Result<PgQueryResult, sqlx::Error> {
    let mut q = sqlx::query(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query(q, p);
    }
    q.execute(pool).await
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, Postgres, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::Query<'q, Postgres, PgArguments> {
    match p {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Timestamp(t) => q.bind(*t),
        SqlParam::TextArray(v) => q.bind(v.clone()),
        SqlParam::Json(v) => q.bind(v.clone()), // JSONB
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match p {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Timestamp(t) => q.bind(*t),
        SqlParam::TextArray(v) => q.bind(v.clone()),
        SqlParam::Json(v) => q.bind(v.clone()),
    }
}
