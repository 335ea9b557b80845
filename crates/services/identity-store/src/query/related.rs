//! Related (two-table) query builder.
//!
//! Table and column identifiers come from SeaORM entity metadata, so only
//! names of the known schema can be rendered. Filter text is supplied by the
//! caller and appended after a keyword check; it must reference values via
//! [`placeholder`] only.

use sea_orm::{DbBackend, EntityTrait, IdenStatic};

use common::{AppError, AppResult};

const WHERE_KEYWORD: &str = "WHERE ";
const ORDER_BY_KEYWORD: &str = "ORDER BY ";

/// Kind of join between the primary and the foreign table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    Inner,
    Left,
    Right,
}

impl Join {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Join::Inner => "INNER JOIN",
            Join::Left => "LEFT JOIN",
            Join::Right => "RIGHT JOIN",
        }
    }
}

impl std::fmt::Display for Join {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone)]
enum Projection<E: EntityTrait> {
    Nothing,
    All,
    Columns(Vec<E::Column>),
}

/// One side of a join: an entity's table, the column it joins on, an alias
/// and the columns it contributes to the select list.
#[derive(Debug, Clone)]
pub struct TableSpec<E: EntityTrait> {
    alias: String,
    key: E::Column,
    projection: Projection<E>,
}

impl<E: EntityTrait> TableSpec<E> {
    /// Describe `entity`'s table under `alias`, joined on `key`.
    ///
    /// The alias is rendered verbatim, so it must be a plain identifier.
    pub fn new(_entity: E, alias: &str, key: E::Column) -> AppResult<Self> {
        if !is_identifier(alias) {
            return Err(AppError::InvalidArgument("alias"));
        }

        Ok(Self {
            alias: alias.to_owned(),
            key,
            projection: Projection::Nothing,
        })
    }

    /// Project every column of this table (`alias.*`).
    pub fn all_columns(mut self) -> Self {
        self.projection = Projection::All;
        self
    }

    /// Project the given columns, in order.
    pub fn columns(mut self, columns: impl IntoIterator<Item = E::Column>) -> Self {
        self.projection = Projection::Columns(columns.into_iter().collect());
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    fn table(&self) -> String {
        E::default().table_name().to_owned()
    }

    /// `alias.column` for any column of this table.
    pub fn qualify(&self, column: E::Column) -> String {
        format!("{}.{}", self.alias, column.as_str())
    }

    fn key(&self) -> String {
        self.qualify(self.key)
    }

    fn select_list(&self) -> Vec<String> {
        match &self.projection {
            Projection::Nothing => Vec::new(),
            Projection::All => vec![format!("{}.*", self.alias)],
            Projection::Columns(columns) => columns.iter().map(|c| self.qualify(*c)).collect(),
        }
    }
}

/// A two-table statement joining `primary` and `foreign` on their keys.
#[derive(Debug, Clone)]
pub struct RelatedQuery<P: EntityTrait, F: EntityTrait> {
    primary: TableSpec<P>,
    foreign: TableSpec<F>,
    join: Join,
}

impl<P: EntityTrait, F: EntityTrait> RelatedQuery<P, F> {
    pub fn new(primary: TableSpec<P>, foreign: TableSpec<F>, join: Join) -> Self {
        Self {
            primary,
            foreign,
            join,
        }
    }

    pub fn primary(&self) -> &TableSpec<P> {
        &self.primary
    }

    pub fn foreign(&self) -> &TableSpec<F> {
        &self.foreign
    }

    /// Render a SELECT across both tables.
    ///
    /// `where_clause` must start with `WHERE `; `order_by`, when given, must
    /// start with `ORDER BY `. Both are appended verbatim.
    pub fn select(&self, where_clause: &str, order_by: Option<&str>) -> AppResult<String> {
        let where_clause = check_where(where_clause)?;
        let order_by = order_by.map(check_order_by).transpose()?;

        let mut columns = self.primary.select_list();
        columns.extend(self.foreign.select_list());
        if columns.is_empty() {
            return Err(AppError::InvalidArgument("columns"));
        }

        let mut sql = format!(
            "SELECT {} FROM {} AS {} {} {} AS {} ON {} = {} {}",
            columns.join(", "),
            self.primary.table(),
            self.primary.alias,
            self.join,
            self.foreign.table(),
            self.foreign.alias,
            self.primary.key(),
            self.foreign.key(),
            where_clause,
        );

        if let Some(order_by) = order_by {
            sql.push(' ');
            sql.push_str(order_by);
        }

        tracing::debug!(sql = %sql, "Built related select");
        Ok(sql)
    }

    /// Render a DELETE of primary-table rows that have a matching foreign
    /// row satisfying `where_clause`.
    ///
    /// Rendered as a correlated `EXISTS` so the same text runs on every
    /// supported backend. Only inner joins have a delete meaning.
    pub fn delete(&self, where_clause: &str) -> AppResult<String> {
        if self.join != Join::Inner {
            return Err(AppError::InvalidArgument("join"));
        }

        let condition = check_where(where_clause)?[WHERE_KEYWORD.len()..].trim();

        let sql = format!(
            "DELETE FROM {} AS {} WHERE EXISTS (SELECT 1 FROM {} AS {} WHERE {} = {} AND ({}))",
            self.primary.table(),
            self.primary.alias,
            self.foreign.table(),
            self.foreign.alias,
            self.primary.key(),
            self.foreign.key(),
            condition,
        );

        tracing::debug!(sql = %sql, "Built related delete");
        Ok(sql)
    }
}

/// The `index`-th (1-based) positional parameter in `backend`'s syntax.
pub fn placeholder(backend: DbBackend, index: usize) -> String {
    match backend {
        DbBackend::Postgres => format!("${}", index),
        _ => "?".to_owned(),
    }
}

fn check_where(clause: &str) -> AppResult<&str> {
    match clause.strip_prefix(WHERE_KEYWORD) {
        Some(rest) if !rest.trim().is_empty() => Ok(clause),
        _ => Err(AppError::InvalidArgument("where")),
    }
}

fn check_order_by(clause: &str) -> AppResult<&str> {
    match clause.strip_prefix(ORDER_BY_KEYWORD) {
        Some(rest) if !rest.trim().is_empty() => Ok(clause),
        _ => Err(AppError::InvalidArgument("orderBy")),
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
