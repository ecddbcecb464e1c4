//! Query builder for list endpoints with dynamic WHERE conditions
//!
//! Postgres placeholders are numbered, so `$n` is assigned in insertion
//! order. Use the same builder instance for the COUNT query and the page
//! query so the bindings line up.

use rust_decimal::Decimal;
use sqlx::Postgres;
use sqlx::query::{QueryAs, QueryScalar};

type PgArgs<'a> = <Postgres as sqlx::Database>::Arguments<'a>;

#[derive(Default)]
pub struct QueryBuilder {
    conditions: Vec<String>,
    bindings: Vec<QueryValue>,
}

#[derive(Clone)]
enum QueryValue {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Bool(bool),
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition that needs no binding (e.g. `stock > 0`)
    pub fn condition(&mut self, condition: &str) -> &mut Self {
        self.conditions.push(condition.to_string());
        self
    }

    fn placeholder(&mut self, value: QueryValue) -> usize {
        self.bindings.push(value);
        self.bindings.len()
    }

    pub fn eq_i64(&mut self, field: &str, value: i64) -> &mut Self {
        let n = self.placeholder(QueryValue::Integer(value));
        self.conditions.push(format!("{field} = ${n}"));
        self
    }

    pub fn eq_text(&mut self, field: &str, value: &str) -> &mut Self {
        let n = self.placeholder(QueryValue::Text(value.to_string()));
        self.conditions.push(format!("{field} = ${n}"));
        self
    }

    pub fn eq_bool(&mut self, field: &str, value: bool) -> &mut Self {
        let n = self.placeholder(QueryValue::Bool(value));
        self.conditions.push(format!("{field} = ${n}"));
        self
    }

    pub fn min_decimal(&mut self, field: &str, value: Decimal) -> &mut Self {
        let n = self.placeholder(QueryValue::Decimal(value));
        self.conditions.push(format!("{field} >= ${n}"));
        self
    }

    pub fn max_decimal(&mut self, field: &str, value: Decimal) -> &mut Self {
        let n = self.placeholder(QueryValue::Decimal(value));
        self.conditions.push(format!("{field} <= ${n}"));
        self
    }

    /// Add a case-insensitive substring search across multiple fields.
    /// Postgres allows one binding referenced from every field condition.
    pub fn search(&mut self, fields: &[&str], term: &str) -> &mut Self {
        let n = self.placeholder(QueryValue::Text(format!("%{term}%")));
        let field_conditions: Vec<String> =
            fields.iter().map(|f| format!("{f} ILIKE ${n}")).collect();
        self.conditions
            .push(format!("({})", field_conditions.join(" OR ")));
        self
    }

    /// Build WHERE clause (empty if no conditions)
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Apply bindings to a SQLx query_as
    pub fn apply_bindings<'a, 'b, O>(
        &'b self,
        mut query: QueryAs<'a, Postgres, O, PgArgs<'a>>,
    ) -> QueryAs<'a, Postgres, O, PgArgs<'a>>
    where
        O: Send + Unpin,
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::Decimal(d) => query.bind(*d),
                QueryValue::Bool(b) => query.bind(*b),
            };
        }
        query
    }

    /// Apply bindings to a SQLx query_scalar
    pub fn apply_bindings_scalar<'a, 'b, O>(
        &'b self,
        mut query: QueryScalar<'a, Postgres, O, PgArgs<'a>>,
    ) -> QueryScalar<'a, Postgres, O, PgArgs<'a>>
    where
        O: Send + Unpin,
        'b: 'a,
    {
        for binding in &self.bindings {
            query = match binding {
                QueryValue::Text(s) => query.bind(s),
                QueryValue::Integer(i) => query.bind(*i),
                QueryValue::Decimal(d) => query.bind(*d),
                QueryValue::Bool(b) => query.bind(*b),
            };
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_where_clause() {
        let qb = QueryBuilder::new();
        assert_eq!(qb.where_clause(), "");
    }

    #[test]
    fn test_placeholder_numbering() {
        let mut qb = QueryBuilder::new();
        qb.eq_i64("category_id", 3)
            .eq_bool("is_active", true)
            .condition("stock > 0");
        assert_eq!(
            qb.where_clause(),
            " WHERE category_id = $1 AND is_active = $2 AND stock > 0"
        );
    }

    #[test]
    fn test_search_reuses_single_binding() {
        let mut qb = QueryBuilder::new();
        qb.eq_bool("is_active", true)
            .search(&["name", "description"], "phone");
        assert_eq!(
            qb.where_clause(),
            " WHERE is_active = $1 AND (name ILIKE $2 OR description ILIKE $2)"
        );
    }

    #[test]
    fn test_price_range() {
        let mut qb = QueryBuilder::new();
        qb.min_decimal("price", Decimal::new(100, 2))
            .max_decimal("price", Decimal::new(5000, 2));
        assert_eq!(qb.where_clause(), " WHERE price >= $1 AND price <= $2");
    }
}
