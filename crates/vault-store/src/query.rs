//! Query and pagination engine
//!
//! Filters are turned into a list of predicates plus the values bound to
//! them, in the same order. The candidate relation is either the
//! `latest_evidence` view or every row (`evidence_rows`); both expose `seq`,
//! the insertion order used as the final tie-break.

use crate::rows::{evidence_from_row, EVIDENCE_COLUMNS};
use crate::{SqliteStore, StoreError};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use vault_domain::{EvidencePage, EvidenceVersion, ListFilter, SortDirection, SortField};

/// Parameterized WHERE clause built from a [`ListFilter`]
///
/// # Examples
///
/// ```
/// use vault_domain::{EvidenceStatus, ListFilter, StatusFilter};
/// use vault_store::QueryBuilder;
///
/// let filter = ListFilter {
///     status: StatusFilter::Only(EvidenceStatus::Approved),
///     ..Default::default()
/// };
/// let query = QueryBuilder::from_filter(&filter);
/// assert_eq!(query.where_clause(), "WHERE v.status = ?");
/// assert_eq!(query.params().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    predicates: Vec<String>,
    params: Vec<Value>,
}

impl QueryBuilder {
    /// Build predicates for search text, status and category
    pub fn from_filter(filter: &ListFilter) -> Self {
        let mut query = Self::default();

        if let Some(search) = filter.search_text() {
            let needle = search.to_lowercase();
            query.push(
                "(instr(casefold(v.title), ?) > 0 \
                  OR instr(casefold(v.description), ?) > 0 \
                  OR EXISTS (SELECT 1 FROM evidence_tags et JOIN tags t ON t.id = et.tag_id \
                             WHERE et.evidence_id = v.id AND instr(casefold(t.name), ?) > 0))",
                [needle.clone(), needle.clone(), needle].map(Value::Text),
            );
        }

        if let Some(status) = filter.status.status() {
            query.push("v.status = ?", [Value::Text(status.as_str().to_string())]);
        }

        if let Some(category) = filter.category.category() {
            query.push("v.category = ?", [Value::Text(category.to_string())]);
        }

        query
    }

    /// Add a predicate together with the values for its placeholders
    pub fn push<I>(&mut self, predicate: &str, values: I)
    where
        I: IntoIterator<Item = Value>,
    {
        let before = self.params.len();
        self.params.extend(values);
        debug_assert_eq!(
            predicate.matches('?').count(),
            self.params.len() - before,
            "placeholder count must match bound values"
        );
        self.predicates.push(predicate.to_string());
    }

    /// `WHERE a AND b ...`, or an empty string without predicates
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.predicates.join(" AND "))
        }
    }

    /// Values bound to the placeholders, in order
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

/// Candidate rows for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Latest,
    History,
}

impl Source {
    fn for_filter(filter: &ListFilter) -> Self {
        if filter.include_history {
            Source::History
        } else {
            Source::Latest
        }
    }

    fn relation(&self) -> &'static str {
        match self {
            Source::Latest => "latest_evidence",
            Source::History => "evidence_rows",
        }
    }
}

fn order_clause(filter: &ListFilter) -> String {
    let column = match filter.sort_by {
        SortField::CreatedAt => "v.created_at",
        SortField::Status => "v.status",
    };
    let direction = match filter.sort_dir {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    format!("ORDER BY {} {}, v.seq ASC", column, direction)
}

fn count(conn: &Connection, source: Source, query: &QueryBuilder) -> Result<u64, StoreError> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} v {}",
        source.relation(),
        query.where_clause()
    );
    let total: i64 = conn.query_row(&sql, params_from_iter(query.params()), |row| row.get(0))?;
    Ok(total as u64)
}

fn select(
    conn: &Connection,
    source: Source,
    query: &QueryBuilder,
    filter: &ListFilter,
    window: Option<(u64, u64)>,
) -> Result<Vec<EvidenceVersion>, StoreError> {
    let mut sql = format!(
        "SELECT {} FROM {} v {} {}",
        qualified_columns(),
        source.relation(),
        query.where_clause(),
        order_clause(filter)
    );
    let mut params = query.params().to_vec();
    if let Some((limit, offset)) = window {
        sql.push_str(" LIMIT ? OFFSET ?");
        params.push(Value::Integer(limit as i64));
        params.push(Value::Integer(offset as i64));
    }

    tracing::debug!(sql = %sql, params = params.len(), "Listing evidence");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), evidence_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn qualified_columns() -> String {
    EVIDENCE_COLUMNS
        .split(',')
        .map(|column| format!("v.{}", column.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SqliteStore {
    /// One page of matching rows plus the unpaginated total
    ///
    /// Count and page are read inside one read transaction so the total is
    /// always consistent with the rows.
    pub fn list_evidence(&self, filter: &ListFilter) -> Result<EvidencePage, StoreError> {
        let filter = filter.clone().normalized();
        let source = Source::for_filter(&filter);
        let query = QueryBuilder::from_filter(&filter);

        let tx = self.conn.unchecked_transaction()?;
        let total = count(&tx, source, &query)?;
        let items = select(
            &tx,
            source,
            &query,
            &filter,
            Some((u64::from(filter.page_size), filter.offset())),
        )?;
        tx.commit()?;

        Ok(EvidencePage { items, total })
    }

    /// Every matching row in listing order, ignoring pagination
    pub fn list_matching(&self, filter: &ListFilter) -> Result<Vec<EvidenceVersion>, StoreError> {
        let filter = filter.clone().normalized();
        let query = QueryBuilder::from_filter(&filter);
        select(&self.conn, Source::for_filter(&filter), &query, &filter, None)
    }

    /// The latest version of every group, in insertion order
    pub fn latest_versions(&self) -> Result<Vec<EvidenceVersion>, StoreError> {
        let sql = format!(
            "SELECT {} FROM latest_evidence v ORDER BY v.seq",
            qualified_columns()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], evidence_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Distinct categories of latest versions, sorted
    pub fn categories(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT category FROM latest_evidence ORDER BY category")?;
        let categories = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(categories)
    }
}
