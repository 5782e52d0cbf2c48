//! Depth-first rendering of the context tree.
//!
//! Queries are issued strictly one after another: each result decides what
//! to ask next, so there is nothing to run concurrently.

use crate::error::{MaterializeError, MaterializeResult};
use crate::query;
use sqlconf_core::{DescriptorSpec, RenderedConfig};
use sqlconf_db::{QueryGateway, RowSet};

/// Counters collected during one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeStats {
    /// Contexts visited, root included
    pub contexts: usize,
    /// Directive lines emitted
    pub directives: usize,
    /// Queries issued
    pub queries: usize,
}

/// Output of a successful pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub lines: RenderedConfig,
    pub stats: MaterializeStats,
}

/// A context's `<key value>` label
struct ContextTag {
    key: String,
    value: Option<String>,
}

/// Renders one descriptor's context tree through a gateway.
pub struct TreeMaterializer<'a> {
    spec: &'a DescriptorSpec,
    gateway: &'a dyn QueryGateway,
    out: RenderedConfig,
    /// Ids from the root down to the context being rendered
    path: Vec<String>,
    stats: MaterializeStats,
}

/// Materialize `spec` and return the rendered lines.
pub fn materialize(
    spec: &DescriptorSpec,
    gateway: &dyn QueryGateway,
) -> MaterializeResult<RenderedConfig> {
    Ok(TreeMaterializer::new(spec, gateway).run()?.lines)
}

impl<'a> TreeMaterializer<'a> {
    pub fn new(spec: &'a DescriptorSpec, gateway: &'a dyn QueryGateway) -> Self {
        Self {
            spec,
            gateway,
            out: RenderedConfig::new(),
            path: Vec::new(),
            stats: MaterializeStats::default(),
        }
    }

    /// Resolve the root context and render the whole tree below it.
    ///
    /// The root's own tag lines are never emitted. Any failure discards
    /// everything rendered so far.
    pub fn run(mut self) -> MaterializeResult<Materialized> {
        let root = self.resolve_root()?;
        log::debug!("rendering context tree from root id {}", root);
        self.render_context(&root, true)?;

        log::debug!(
            "materialized {} lines from {} contexts, {} directives, {} queries",
            self.out.len(),
            self.stats.contexts,
            self.stats.directives,
            self.stats.queries
        );
        Ok(Materialized {
            lines: self.out,
            stats: self.stats,
        })
    }

    fn select(&mut self, sql: &str) -> MaterializeResult<RowSet> {
        self.stats.queries += 1;
        log::debug!("query: {}", sql);
        Ok(self.gateway.select(sql)?)
    }

    fn resolve_root(&mut self) -> MaterializeResult<String> {
        let which = if self.spec.base_context_id().is_some() {
            "base"
        } else {
            "default"
        };
        let rows = self.select(&query::root_context(self.spec))?;
        expect_columns(&rows, "root context", 1)?;

        match rows.len() {
            0 => Err(MaterializeError::RootNotFound { which }),
            1 => rows.rows[0][0]
                .clone()
                .ok_or_else(|| MaterializeError::NullValue {
                    what: "root context id",
                    context: which.to_string(),
                }),
            n => Err(MaterializeError::AmbiguousRoot { which, rows: n }),
        }
    }

    fn render_context(&mut self, id: &str, is_root: bool) -> MaterializeResult<()> {
        if self.path.iter().any(|seen| seen == id) {
            return Err(MaterializeError::Cycle {
                id: id.to_string(),
                path: self.path.join(" -> "),
            });
        }
        self.path.push(id.to_string());
        self.stats.contexts += 1;

        // The root is the implicit outermost scope: its label is still looked
        // up, but never rendered.
        let tag = self.context_tag(id)?.filter(|_| !is_root);

        if let Some(tag) = &tag {
            self.out.open_tag(&tag.key, tag.value.as_deref());
        }

        self.render_directives(id)?;

        for child in self.child_ids(id)? {
            self.render_context(&child, false)?;
        }

        if let Some(tag) = &tag {
            self.out.close_tag(&tag.key);
        }

        self.path.pop();
        Ok(())
    }

    fn context_tag(&mut self, id: &str) -> MaterializeResult<Option<ContextTag>> {
        let mut rows = self.select(&query::context_tag(self.spec, id))?;
        expect_columns(&rows, "context key/value", 2)?;

        match rows.len() {
            0 => {
                log::warn!("context id {} has no associated key/value", id);
                Ok(None)
            }
            1 => {
                let mut row = rows.rows.swap_remove(0);
                let value = row.pop().flatten();
                let key = row.pop().flatten();
                Ok(key.map(|key| ContextTag { key, value }))
            }
            n => Err(MaterializeError::AmbiguousContext {
                id: id.to_string(),
                rows: n,
            }),
        }
    }

    fn render_directives(&mut self, id: &str) -> MaterializeResult<()> {
        let rows = self.select(&query::context_directives(self.spec, id))?;
        expect_columns(&rows, "directive", 2)?;

        for row in &rows.rows {
            let key = row[0].as_deref().ok_or_else(|| MaterializeError::NullValue {
                what: "directive key",
                context: id.to_string(),
            })?;
            self.out.directive(key, row[1].as_deref());
            self.stats.directives += 1;
        }
        Ok(())
    }

    fn child_ids(&mut self, id: &str) -> MaterializeResult<Vec<String>> {
        let rows = self.select(&query::child_contexts(self.spec, id))?;
        expect_columns(&rows, "child context", 1)?;

        rows.rows
            .into_iter()
            .map(|mut row| {
                row.swap_remove(0).ok_or_else(|| MaterializeError::NullValue {
                    what: "child context id",
                    context: id.to_string(),
                })
            })
            .collect()
    }
}

fn expect_columns(
    rows: &RowSet,
    query: &'static str,
    expected: usize,
) -> MaterializeResult<()> {
    let rows_match = rows.rows.iter().all(|row| row.len() == expected);
    if rows.column_count != expected || !rows_match {
        return Err(MaterializeError::UnexpectedColumns {
            query,
            expected,
            found: rows.column_count,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "materializer_test.rs"]
mod tests;
