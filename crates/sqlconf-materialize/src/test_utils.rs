//! Shared test utilities for sqlconf-materialize

use crate::query;
use sqlconf_core::DescriptorSpec;
use sqlconf_db::{DbError, DbResult, QueryGateway, RowSet};
use std::collections::HashMap;
use std::sync::Mutex;

/// Gateway answering exact SQL strings with canned rows.
///
/// Unscripted queries fail with an execution error. Every query is recorded
/// in issue order.
#[derive(Default)]
pub struct ScriptedGateway {
    responses: HashMap<String, Result<RowSet, String>>,
    issued: Mutex<Vec<String>>,
}

fn text(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `sql` with `rows`.
    pub fn respond(mut self, sql: impl Into<String>, rows: RowSet) -> Self {
        self.responses.insert(sql.into(), Ok(rows));
        self
    }

    /// Fail `sql` with an execution error.
    pub fn fail(mut self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses.insert(sql.into(), Err(message.into()));
        self
    }

    /// Script the root lookup to return `id`.
    pub fn root(self, spec: &DescriptorSpec, id: &str) -> Self {
        let sql = query::root_context(spec);
        self.respond(sql, RowSet::new(1, vec![vec![Some(id.to_string())]]))
    }

    /// Script the three lookups for one context: its label, its
    /// directives, and its children.
    pub fn context(
        self,
        spec: &DescriptorSpec,
        id: &str,
        tag: Option<(&str, Option<&str>)>,
        directives: &[(&str, Option<&str>)],
        children: &[&str],
    ) -> Self {
        let tag_rows = tag
            .map(|(key, value)| vec![vec![Some(key.to_string()), text(value)]])
            .unwrap_or_default();
        let directive_rows = directives
            .iter()
            .map(|(key, value)| vec![Some(key.to_string()), text(*value)])
            .collect();
        let child_rows = children
            .iter()
            .map(|child| vec![Some(child.to_string())])
            .collect();

        self.respond(query::context_tag(spec, id), RowSet::new(2, tag_rows))
            .respond(
                query::context_directives(spec, id),
                RowSet::new(2, directive_rows),
            )
            .respond(query::child_contexts(spec, id), RowSet::new(1, child_rows))
    }

    /// Queries issued so far, in order
    pub fn issued(&self) -> Vec<String> {
        self.issued
            .lock()
            .map(|issued| issued.clone())
            .unwrap_or_default()
    }
}

impl QueryGateway for ScriptedGateway {
    fn select(&self, sql: &str) -> DbResult<RowSet> {
        self.issued
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))?
            .push(sql.to_string());
        match self.responses.get(sql) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(message)) => Err(DbError::ExecutionError(message.clone())),
            None => Err(DbError::ExecutionError(format!("unscripted query: {sql}"))),
        }
    }

    fn db_type(&self) -> &'static str {
        "scripted"
    }
}
