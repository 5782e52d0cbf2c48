//! Left-to-right descriptor parser.
//!
//! Each segment function consumes its prefix from a shared [`Cursor`] and
//! reports failure as a [`SyntaxCause`]; [`parse`] tags the cause with the
//! segment and stops. Nothing is published until every segment succeeded.

use super::{
    ConnectionSpec, ContextTableSpec, DescriptorSpec, DirectiveTableSpec, MappingTableSpec,
};
use crate::error::{Segment, SyntaxCause, SyntaxError, SyntaxResult};

const CONTEXT_TAG: &str = "ctx:";
const DIRECTIVE_TAG: &str = "conf:";
const MAPPING_TAG: &str = "map:";
const WHERE_KEYWORD: &str = "where";
const BASE_ID_KEYWORD: &str = "base_id";
const DATABASE_KEYWORD: &str = "db";

const CONTEXT_ARITY: usize = 4;
const DIRECTIVE_ARITY: usize = 3;
const MAPPING_ARITY: usize = 2;

type CauseResult<T> = Result<T, SyntaxCause>;

/// Remaining unparsed input
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    /// Consume through the next `delim`, returning the text before it.
    fn take_until(&mut self, delim: char) -> Option<&'a str> {
        let (head, tail) = self.rest.split_once(delim)?;
        self.rest = tail;
        Some(head)
    }

    fn strip_tag(&mut self, tag: &'static str) -> CauseResult<()> {
        match self.rest.strip_prefix(tag) {
            Some(tail) => {
                self.rest = tail;
                Ok(())
            }
            None => Err(SyntaxCause::MissingTag { expected: tag }),
        }
    }

    /// Consume everything that is left.
    fn take_rest(&mut self) -> &'a str {
        std::mem::take(&mut self.rest)
    }

    fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }
}

/// Body of a `ctx:`, `conf:` or `map:` segment after its tag
struct TableBody<'a> {
    table: &'a str,
    columns: Option<Vec<&'a str>>,
    where_clause: Option<&'a str>,
}

/// Parse a full descriptor string.
pub fn parse(input: &str) -> SyntaxResult<DescriptorSpec> {
    let (scheme, rest) = input
        .split_once("://")
        .ok_or_else(|| SyntaxError::new(Segment::Connection, SyntaxCause::MissingScheme))?;
    if scheme.is_empty() {
        return Err(SyntaxError::new(
            Segment::Connection,
            SyntaxCause::EmptyField { field: "scheme" },
        ));
    }

    let mut cursor = Cursor::new(rest);

    let connection = parse_connection(&mut cursor).map_err(|c| fail(Segment::Connection, c))?;
    log::debug!("db.user: '{}'", connection.user);
    log::debug!("db.server: '{}'", connection.server);
    log::debug!(
        "db.database: '{}'",
        connection.database.as_deref().unwrap_or("(none)")
    );

    let mut contexts = parse_contexts(&mut cursor).map_err(|c| fail(Segment::Contexts, c))?;
    log::debug!(
        "ctx: table '{}', columns ({}, {}, {}, {}), where '{}'",
        contexts.table,
        contexts.id_column,
        contexts.parent_id_column,
        contexts.key_column,
        contexts.value_column,
        contexts.where_clause.as_deref().unwrap_or("(none)")
    );

    let directives = parse_directives(&mut cursor).map_err(|c| fail(Segment::Directives, c))?;
    log::debug!(
        "conf: table '{}', columns ({}, {}, {}), where '{}'",
        directives.table,
        directives.id_column,
        directives.key_column,
        directives.value_column,
        directives.where_clause.as_deref().unwrap_or("(none)")
    );

    let mapping = parse_mapping(&mut cursor).map_err(|c| fail(Segment::Mapping, c))?;
    log::debug!(
        "map: table '{}', columns ({}, {}), where '{}'",
        mapping.table,
        mapping.directive_id_column,
        mapping.context_id_column,
        mapping.where_clause.as_deref().unwrap_or("(none)")
    );

    contexts.base_context_id = parse_base_id(&mut cursor).map_err(|c| fail(Segment::BaseId, c))?;
    if let Some(base) = &contexts.base_context_id {
        log::debug!("ctx.base_id: '{}'", base);
    }

    Ok(DescriptorSpec {
        scheme: scheme.to_string(),
        connection,
        contexts,
        directives,
        mapping,
    })
}

fn fail(segment: Segment, cause: SyntaxCause) -> SyntaxError {
    log::debug!("failed parsing {} portion of descriptor: {}", segment, cause);
    SyntaxError::new(segment, cause)
}

fn parse_connection(cursor: &mut Cursor<'_>) -> CauseResult<ConnectionSpec> {
    let user = cursor.take_until(':').ok_or(SyntaxCause::MissingDelimiter {
        delimiter: ':',
        before: "password",
    })?;
    let password = cursor.take_until('@').ok_or(SyntaxCause::MissingDelimiter {
        delimiter: '@',
        before: "server",
    })?;

    let rest = cursor.take_rest();
    let end = rest
        .find(|c: char| c == '?' || c == '/')
        .ok_or(SyntaxCause::MissingDelimiter {
            delimiter: '/',
            before: "context table segment",
        })?;
    let server = &rest[..end];
    let has_query = rest[end..].starts_with('?');
    *cursor = Cursor::new(&rest[end + 1..]);

    let database = if has_query {
        let keyword = cursor.take_until('=').ok_or(SyntaxCause::MissingDelimiter {
            delimiter: '=',
            before: "database name",
        })?;
        if keyword != DATABASE_KEYWORD {
            return Err(SyntaxCause::BadKeyword {
                expected: DATABASE_KEYWORD,
                found: keyword.to_string(),
            });
        }
        let database = cursor.take_until('/').ok_or(SyntaxCause::MissingDelimiter {
            delimiter: '/',
            before: "context table segment",
        })?;
        Some(non_empty(database, "database name")?.to_string())
    } else {
        None
    };

    Ok(ConnectionSpec {
        user: user.to_string(),
        password: password.to_string(),
        server: server.to_string(),
        database,
    })
}

fn parse_contexts(cursor: &mut Cursor<'_>) -> CauseResult<ContextTableSpec> {
    cursor.strip_tag(CONTEXT_TAG)?;
    let body = cursor.take_until('/').ok_or(SyntaxCause::MissingDelimiter {
        delimiter: '/',
        before: "directive table segment",
    })?;
    let body = parse_table_body(body, CONTEXT_ARITY)?;

    let mut spec = ContextTableSpec::new(body.table);
    if let Some(cols) = body.columns {
        spec.id_column = cols[0].to_string();
        spec.parent_id_column = cols[1].to_string();
        spec.key_column = cols[2].to_string();
        spec.value_column = cols[3].to_string();
    }
    spec.where_clause = body.where_clause.map(str::to_string);
    Ok(spec)
}

fn parse_directives(cursor: &mut Cursor<'_>) -> CauseResult<DirectiveTableSpec> {
    cursor.strip_tag(DIRECTIVE_TAG)?;
    let body = cursor.take_until('/').ok_or(SyntaxCause::MissingDelimiter {
        delimiter: '/',
        before: "mapping table segment",
    })?;
    let body = parse_table_body(body, DIRECTIVE_ARITY)?;

    let mut spec = DirectiveTableSpec::new(body.table);
    if let Some(cols) = body.columns {
        spec.id_column = cols[0].to_string();
        spec.key_column = cols[1].to_string();
        spec.value_column = cols[2].to_string();
    }
    spec.where_clause = body.where_clause.map(str::to_string);
    Ok(spec)
}

fn parse_mapping(cursor: &mut Cursor<'_>) -> CauseResult<MappingTableSpec> {
    cursor.strip_tag(MAPPING_TAG)?;
    // The mapping segment is the last mandatory one, so its '/' is optional.
    let body = match cursor.take_until('/') {
        Some(body) => body,
        None => cursor.take_rest(),
    };
    let body = parse_table_body(body, MAPPING_ARITY)?;

    let mut spec = MappingTableSpec::new(body.table);
    if let Some(cols) = body.columns {
        spec.directive_id_column = cols[0].to_string();
        spec.context_id_column = cols[1].to_string();
    }
    spec.where_clause = body.where_clause.map(str::to_string);
    Ok(spec)
}

fn parse_base_id(cursor: &mut Cursor<'_>) -> CauseResult<Option<String>> {
    if cursor.is_empty() {
        return Ok(None);
    }
    let rest = cursor.take_rest();
    let (keyword, value) = rest.split_once('=').ok_or(SyntaxCause::MissingDelimiter {
        delimiter: '=',
        before: "base context id",
    })?;
    if keyword != BASE_ID_KEYWORD {
        return Err(SyntaxCause::BadKeyword {
            expected: BASE_ID_KEYWORD,
            found: keyword.to_string(),
        });
    }
    if let Some((_, extra)) = value.split_once('/') {
        return Err(SyntaxCause::TrailingContent {
            found: extra.to_string(),
        });
    }
    Ok(Some(non_empty(value, "base context id")?.to_string()))
}

/// Split `table[:options]` where options is either `where=<clause>` or a
/// column list of exactly `arity` names, optionally followed by
/// `:where=<clause>`.
fn parse_table_body(body: &str, arity: usize) -> CauseResult<TableBody<'_>> {
    let (table, options) = match body.split_once(':') {
        Some((table, options)) => (table, Some(options)),
        None => (body, None),
    };
    let table = non_empty(table, "table name")?;

    let Some(options) = options else {
        return Ok(TableBody {
            table,
            columns: None,
            where_clause: None,
        });
    };

    // A lone where clause may itself contain commas, so it is recognised
    // before trying the column list.
    if options.starts_with("where=") || !options.contains(',') {
        let head = options.split_once(':').map_or(options, |(head, _)| head);
        if !head.contains('=') {
            // A single bare name is a column list that is too short
            return Err(SyntaxCause::WrongArity {
                expected: arity,
                found: 1,
            });
        }
        return Ok(TableBody {
            table,
            columns: None,
            where_clause: Some(parse_where(options)?),
        });
    }

    let (columns, tail) = match options.split_once(':') {
        Some((columns, tail)) => (columns, Some(tail)),
        None => (options, None),
    };

    let columns: Vec<&str> = columns.split(',').collect();
    if columns.len() != arity {
        return Err(SyntaxCause::WrongArity {
            expected: arity,
            found: columns.len(),
        });
    }
    for column in &columns {
        non_empty(column, "column name")?;
    }

    let where_clause = tail.map(parse_where).transpose()?;
    Ok(TableBody {
        table,
        columns: Some(columns),
        where_clause,
    })
}

fn parse_where(option: &str) -> CauseResult<&str> {
    let (keyword, clause) = option.split_once('=').ok_or(SyntaxCause::MissingDelimiter {
        delimiter: '=',
        before: "where clause",
    })?;
    if keyword != WHERE_KEYWORD {
        return Err(SyntaxCause::BadKeyword {
            expected: WHERE_KEYWORD,
            found: keyword.to_string(),
        });
    }
    non_empty(clause, "where clause")
}

fn non_empty<'a>(value: &'a str, field: &'static str) -> CauseResult<&'a str> {
    if value.is_empty() {
        Err(SyntaxCause::EmptyField { field })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
