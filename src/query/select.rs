//! SELECT statement rendering.
//!
//! A [`QuerySpec`] collects the pieces of one query and renders them in a
//! fixed clause order: SELECT, FROM, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT.
//!
//! ```
//! use sqlscribe::query::QuerySpec;
//!
//! let sql = QuerySpec::new("test", ["*"])
//!     .conditions(["age", "name"])
//!     .operators(["=", ">"])
//!     .render()
//!     .unwrap();
//! assert_eq!(sql, "SELECT * FROM test WHERE age = ? AND name > ?;");
//! ```
use super::ddl::require_table;
use super::SQLITE_PLACEHOLDER;
use crate::core::{Result, SqlscribeError};
use std::fmt;
use std::str::FromStr;

/// Comparison operators accepted in a WHERE condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    /// `<>`
    Ne,
    /// `!=`
    BangEq,
    Lt,
    Gt,
    Le,
    Ge,
    All,
    Any,
    Between,
    Exists,
    In,
    Like,
    Not,
}

impl Operator {
    pub const ALL_OPERATORS: [Operator; 14] = [
        Operator::Eq,
        Operator::Ne,
        Operator::BangEq,
        Operator::Lt,
        Operator::Gt,
        Operator::Le,
        Operator::Ge,
        Operator::All,
        Operator::Any,
        Operator::Between,
        Operator::Exists,
        Operator::In,
        Operator::Like,
        Operator::Not,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "<>",
            Operator::BangEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le => "<=",
            Operator::Ge => ">=",
            Operator::All => "ALL",
            Operator::Any => "ANY",
            Operator::Between => "BETWEEN",
            Operator::Exists => "EXISTS",
            Operator::In => "IN",
            Operator::Like => "LIKE",
            Operator::Not => "NOT",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = SqlscribeError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_uppercase();
        Operator::ALL_OPERATORS
            .into_iter()
            .find(|op| op.as_str() == upper)
            .ok_or_else(|| SqlscribeError::Validation(format!("unknown operator: '{}'", s)))
    }
}

/// Connectives placed between consecutive WHERE conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOperator {
    And,
    Or,
}

impl LogicOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicOperator::And => "AND",
            LogicOperator::Or => "OR",
        }
    }
}

impl FromStr for LogicOperator {
    type Err = SqlscribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "AND" => Ok(LogicOperator::And),
            "OR" => Ok(LogicOperator::Or),
            _ => Err(SqlscribeError::Validation(format!(
                "unknown logic operator: '{}', must be AND or OR",
                s
            ))),
        }
    }
}

/// Sort direction for one ORDER BY field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl FromStr for Order {
    type Err = SqlscribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Ok(Order::Asc),
            "DESC" => Ok(Order::Desc),
            _ => Err(SqlscribeError::Validation(format!(
                "unknown order: '{}', must be ASC or DESC",
                s
            ))),
        }
    }
}

/// Aggregate functions usable as output expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Avg,
    Count,
    Max,
    Min,
    Sum,
}

impl Aggregate {
    /// Wraps `expr` in the aggregate call, e.g. `avg(age)`.
    pub fn of(&self, expr: &str) -> String {
        let name = match self {
            Aggregate::Avg => "avg",
            Aggregate::Count => "count",
            Aggregate::Max => "max",
            Aggregate::Min => "min",
            Aggregate::Sum => "sum",
        };
        format!("{}({})", name, expr)
    }
}

/// Structured description of one SELECT statement.
///
/// Operators, logic operators and orders are kept as caller text and
/// validated when the statement is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    table: String,
    fields: Vec<String>,
    conditions: Vec<String>,
    operators: Option<Vec<String>>,
    logic_operators: Option<Vec<String>>,
    group_by: Vec<String>,
    having: Vec<String>,
    order_by: Vec<String>,
    order: Option<Vec<String>>,
    placeholder: String,
    limit: Option<u64>,
    offset: Option<u64>,
    subquery: Option<String>,
}

fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

impl QuerySpec {
    /// Starts a query over `table` returning `fields` (columns or expressions).
    pub fn new<I, S>(table: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QuerySpec {
            table: table.into(),
            fields: strings(fields),
            conditions: Vec::new(),
            operators: None,
            logic_operators: None,
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            order: None,
            placeholder: SQLITE_PLACEHOLDER.to_string(),
            limit: None,
            offset: None,
            subquery: None,
        }
    }

    /// Fields compared in the WHERE clause, one placeholder each
    /// (two for `BETWEEN`).
    pub fn conditions<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = strings(fields);
        self
    }

    /// One operator per condition. Defaults to a single `=`, which only
    /// covers a one-condition query.
    pub fn operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operators = Some(strings(operators));
        self
    }

    /// One connective between each pair of conditions. Defaults to a single
    /// `AND`, which covers at most two conditions.
    pub fn logic_operators<I, S>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.logic_operators = Some(strings(operators));
        self
    }

    pub fn group_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = strings(fields);
        self
    }

    /// HAVING conditions, written as complete expressions and joined with `AND`.
    pub fn having<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.having = strings(conditions);
        self
    }

    pub fn order_by<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = strings(fields);
        self
    }

    /// `ASC`/`DESC` per ORDER BY field. Without it no direction is rendered
    /// and the engine's default applies.
    pub fn order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(strings(order));
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Nested query used as the row source. Not supported yet; rendering a
    /// query that carries one fails with `Unsupported`.
    pub fn subquery(mut self, sql: impl Into<String>) -> Self {
        self.subquery = Some(sql.into());
        self
    }

    /// Renders the statement, terminated by `;`.
    pub fn render(&self) -> Result<String> {
        if self.subquery.is_some() {
            return Err(SqlscribeError::Unsupported(
                "nested subqueries are not supported".to_string(),
            ));
        }
        require_table(&self.table)?;
        if self.fields.is_empty() {
            return Err(SqlscribeError::Validation(
                "SELECT needs at least one field or expression".to_string(),
            ));
        }
        if self.placeholder.trim().is_empty() {
            return Err(SqlscribeError::Validation(
                "placeholder must not be empty".to_string(),
            ));
        }

        let mut sql = format!("SELECT {} FROM {}", self.fields.join(", "), self.table);

        let where_clause = self.render_where()?;
        if !where_clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&where_clause);
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if !self.having.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.having.join(" AND "));
        }

        let order_clause = self.render_order_by()?;
        if !order_clause.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_clause);
        }

        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset)),
            (Some(limit), None) => sql.push_str(&format!(" LIMIT {}", limit)),
            (None, Some(_)) => {
                return Err(SqlscribeError::Validation("OFFSET requires a LIMIT".to_string()))
            }
            (None, None) => {}
        }

        sql.push(';');
        Ok(sql)
    }

    fn render_where(&self) -> Result<String> {
        let count = self.conditions.len();
        if count == 0 {
            return Ok(String::new());
        }

        // Omitted lists fall back to a single `=` and a single `AND`.
        let operators = match &self.operators {
            Some(given) => given
                .iter()
                .map(|op| op.parse())
                .collect::<Result<Vec<Operator>>>()?,
            None => vec![Operator::Eq],
        };
        if operators.len() != count {
            return Err(SqlscribeError::Validation(format!(
                "{} condition(s) need {} operator(s), got {}",
                count,
                count,
                operators.len()
            )));
        }

        let joins = count - 1;
        let logic = match &self.logic_operators {
            Some(given) => given
                .iter()
                .map(|op| op.parse())
                .collect::<Result<Vec<LogicOperator>>>()?,
            // A lone condition has nothing to join.
            None => vec![LogicOperator::And; joins.min(1)],
        };
        if logic.len() != joins {
            return Err(SqlscribeError::Validation(format!(
                "{} condition(s) need {} logic operator(s), got {}",
                count,
                joins,
                logic.len()
            )));
        }

        let p = &self.placeholder;
        let mut clause = String::new();
        for (i, (field, op)) in self.conditions.iter().zip(&operators).enumerate() {
            if i > 0 {
                clause.push(' ');
                clause.push_str(logic[i - 1].as_str());
                clause.push(' ');
            }
            match op {
                Operator::Between => clause.push_str(&format!("{} BETWEEN {} AND {}", field, p, p)),
                _ => clause.push_str(&format!("{} {} {}", field, op, p)),
            }
        }
        Ok(clause)
    }

    fn render_order_by(&self) -> Result<String> {
        let directions = match &self.order {
            Some(given) if given.len() != self.order_by.len() => {
                return Err(SqlscribeError::Validation(format!(
                    "{} ORDER BY field(s) need {} order(s), got {}",
                    self.order_by.len(),
                    self.order_by.len(),
                    given.len()
                )))
            }
            Some(given) => given
                .iter()
                .map(|o| o.parse().map(Some))
                .collect::<Result<Vec<Option<Order>>>>()?,
            None => vec![None; self.order_by.len()],
        };

        let parts: Vec<String> = self
            .order_by
            .iter()
            .zip(directions)
            .map(|(field, direction)| match direction {
                Some(direction) => format!("{} {}", field, direction.as_str()),
                None => field.clone(),
            })
            .collect();
        Ok(parts.join(", "))
    }
}
