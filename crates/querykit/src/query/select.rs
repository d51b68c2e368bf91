//! SELECT statement.

use super::{QueryCore, Statement, StatementKind};
use crate::bindings::ClausePart;
use crate::clause::{
    ColumnList, Join, JoinKind, build_group_by, build_having, build_join, build_limit,
    build_order_by, build_where,
};
use crate::client::Executor;
use crate::condition::{Conditions, Glue, Term};
use crate::error::{DbError, DbResult};
use crate::row::{FromRow, Row, RowExt};
use crate::sql::Sql;
use crate::value::Value;
use indexmap::IndexMap;

/// SELECT builder.
///
/// Clauses render in a fixed order: columns, FROM, JOIN, WHERE, GROUP BY,
/// HAVING, ORDER BY, LIMIT.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    core: QueryCore,
    columns: Option<ColumnList>,
    joins: Vec<Join>,
    where_: Conditions,
    group_by: Option<ColumnList>,
    having: Conditions,
    order_by: Option<ColumnList>,
    limit: Option<u64>,
    offset: u64,
}

impl Select {
    pub fn new(table: &str) -> Self {
        Self {
            core: QueryCore::new(table),
            columns: None,
            joins: Vec::new(),
            where_: Conditions::new(ClausePart::Where),
            group_by: None,
            having: Conditions::new(ClausePart::Having),
            order_by: None,
            limit: None,
            offset: 0,
        }
    }

    impl_statement_common!();
    impl_where_methods!();
    impl_limit_methods!(offset);

    // ==================== columns ====================

    /// Columns to select: a list of names (quoted) or a raw string.
    /// Defaults to `*`.
    pub fn columns(mut self, columns: impl Into<ColumnList>) -> Self {
        let columns = columns.into();
        self.columns = (!columns.is_empty()).then_some(columns);
        self
    }

    // ==================== JOIN ====================

    /// Join `table` (prefix applied, `"name alias"` allowed) on a raw condition.
    /// Joining the same table again replaces the earlier join.
    pub fn join(mut self, table: &str, on: &str, kind: Option<JoinKind>) -> Self {
        let join = Join {
            table: table.to_string(),
            on: Sql::parse(on),
            kind,
        };
        match self.joins.iter_mut().find(|j| j.table == table) {
            Some(existing) => *existing = join,
            None => self.joins.push(join),
        }
        self
    }

    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.join(table, on, Some(JoinKind::Left))
    }

    pub fn right_join(self, table: &str, on: &str) -> Self {
        self.join(table, on, Some(JoinKind::Right))
    }

    pub fn inner_join(self, table: &str, on: &str) -> Self {
        self.join(table, on, Some(JoinKind::Inner))
    }

    // ==================== ORDER BY / GROUP BY ====================

    /// ORDER BY names (quoted) or a raw string.
    pub fn order_by(mut self, order_by: impl Into<ColumnList>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// ORDER BY a raw string.
    pub fn order_by_raw(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(ColumnList::Raw(order_by.into()));
        self
    }

    /// GROUP BY names (quoted) or a raw string.
    pub fn group_by(mut self, group_by: impl Into<ColumnList>) -> Self {
        self.group_by = Some(group_by.into());
        self
    }

    /// GROUP BY a raw string.
    pub fn group_by_raw(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = Some(ColumnList::Raw(group_by.into()));
        self
    }

    // ==================== HAVING ====================

    /// Add HAVING terms. Keyed terms bind as `:having_<key>`.
    pub fn having<T: Into<Term>>(mut self, terms: impl IntoIterator<Item = T>) -> Self {
        for term in terms {
            self.having.apply(self.core.bindings_mut(), term.into());
        }
        self
    }

    /// HAVING `column`=:having_column
    pub fn having_eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.having([Term::eq(column, value)])
    }

    /// Join HAVING terms with AND (`true`, default) or OR (`false`).
    pub fn join_having_by_and(mut self, and: bool) -> Self {
        self.having.set_glue(Glue::from_and(and));
        self
    }

    // ==================== paging ====================

    /// `per_page` rows of page `page` (1-based, values below 1 mean 1). The
    /// offset saturates at `u64::MAX`.
    pub fn page(self, page: i64, per_page: u64) -> Self {
        let page = u64::try_from(page.max(1)).unwrap_or(1);
        self.limit(per_page).offset((page - 1).saturating_mul(per_page))
    }

    // ==================== fetching ====================

    /// Execute and return every row.
    pub async fn fetch_all(&mut self, conn: &impl Executor) -> DbResult<Vec<Row>> {
        let sql = self.make(false)?;
        let values = self.bound_values();
        conn.query(&sql, &values).await
    }

    /// Execute and map every row to `T`.
    pub async fn fetch_all_as<T: FromRow>(&mut self, conn: &impl Executor) -> DbResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute with `LIMIT 1` and return the row, if any.
    pub async fn fetch_one(&mut self, conn: &impl Executor) -> DbResult<Option<Row>> {
        self.limit = Some(1);
        let rows = self.fetch_all(conn).await?;
        Ok(rows.into_iter().next())
    }

    /// Execute with `LIMIT 1` and map the row to `T`, if any.
    pub async fn fetch_one_as<T: FromRow>(&mut self, conn: &impl Executor) -> DbResult<Option<T>> {
        let row = self.fetch_one(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute with `LIMIT 1` and return one column of the row, if any.
    pub async fn fetch_value(&mut self, conn: &impl Executor, column: &str) -> DbResult<Option<Value>> {
        match self.fetch_one(conn).await? {
            Some(row) => Ok(Some(row.try_get(column)?.clone())),
            None => Ok(None),
        }
    }

    /// Execute and return one column of every row.
    pub async fn fetch_column(&mut self, conn: &impl Executor, column: &str) -> DbResult<Vec<Value>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter()
            .map(|row| row.try_get(column).cloned())
            .collect()
    }

    /// Execute and return `key column text → value column` pairs, in row order.
    pub async fn fetch_pairs(
        &mut self,
        conn: &impl Executor,
        key: &str,
        value: &str,
    ) -> DbResult<IndexMap<String, Value>> {
        let rows = self.fetch_all(conn).await?;
        let mut pairs = IndexMap::with_capacity(rows.len());
        for row in &rows {
            let k = row
                .get(key)
                .ok_or_else(|| DbError::MissingKey(key.to_string()))?;
            let v = row.try_get(value)?;
            pairs.insert(k.to_string(), v.clone());
        }
        Ok(pairs)
    }
}

impl Statement for Select {
    const KIND: StatementKind = StatementKind::Select;

    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }

    fn build(&self) -> DbResult<Sql> {
        let columns = self
            .columns
            .as_ref()
            .map_or_else(|| "*".to_string(), ColumnList::render);

        let mut sql = Sql::new(format!("SELECT {columns} FROM {}", self.core.quoted_table()));
        build_join(&mut sql, &self.joins, self.core.prefix());
        build_where(&mut sql, &self.where_);
        build_group_by(&mut sql, self.group_by.as_ref());
        build_having(&mut sql, &self.having);
        build_order_by(&mut sql, self.order_by.as_ref());
        build_limit(&mut sql, self.limit, self.offset);
        Ok(sql)
    }
}
