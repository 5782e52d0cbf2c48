use super::*;
use crate::test_utils::ScriptedGateway;
use sqlconf_db::DbError;

fn spec() -> DescriptorSpec {
    DescriptorSpec::parse("sql://u:p@h?db=d/ctx:contexts/conf:directives/map:links").unwrap()
}

/// Assert every `<key ...>` has a matching `</key>` with proper nesting.
fn assert_well_nested(lines: &RenderedConfig) {
    let mut stack: Vec<String> = Vec::new();
    for line in lines.iter() {
        let line = line.trim_end_matches('\n');
        if let Some(key) = line.strip_prefix("</").and_then(|l| l.strip_suffix('>')) {
            assert_eq!(stack.pop().as_deref(), Some(key), "unbalanced close: {line}");
        } else if let Some(inner) = line.strip_prefix('<').and_then(|l| l.strip_suffix('>')) {
            let key = inner.split(' ').next().unwrap_or_default();
            stack.push(key.to_string());
        }
    }
    assert!(stack.is_empty(), "unclosed tags: {stack:?}");
}

#[test]
fn test_root_directive_then_child() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[("Port", Some("21"))], &["2"])
        .context(&spec, "2", Some(("Limit", Some("LOGIN"))), &[], &[]);

    let lines = materialize(&spec, &gw).unwrap();
    assert_eq!(lines.to_text(), "Port 21\n<Limit LOGIN>\n</Limit>\n");
}

#[test]
fn test_root_tags_are_suppressed() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(
            &spec,
            "1",
            Some(("Global", None)),
            &[("ServerName", Some("\"ftp\""))],
            &[],
        );

    let lines = materialize(&spec, &gw).unwrap();
    assert_eq!(lines.to_text(), "ServerName \"ftp\"\n");
}

#[test]
fn test_nested_tree_renders_depth_first() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[("Port", Some("21"))], &["2", "4"])
        .context(
            &spec,
            "2",
            Some(("Anonymous", Some("~ftp"))),
            &[("User", Some("ftp")), ("Group", Some("nogroup"))],
            &["3"],
        )
        .context(
            &spec,
            "3",
            Some(("Limit", Some("WRITE"))),
            &[("DenyAll", None)],
            &[],
        )
        .context(&spec, "4", Some(("Global", None)), &[("Umask", Some("022"))], &[]);

    let lines = materialize(&spec, &gw).unwrap();
    let expected = [
        "Port 21\n",
        "<Anonymous ~ftp>\n",
        "User ftp\n",
        "Group nogroup\n",
        "<Limit WRITE>\n",
        "DenyAll\n",
        "</Limit>\n",
        "</Anonymous>\n",
        "<Global>\n",
        "Umask 022\n",
        "</Global>\n",
    ];
    assert_eq!(lines.iter().collect::<Vec<_>>(), expected);
    assert_well_nested(&lines);
}

#[test]
fn test_query_order_follows_descent() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[], &["2"])
        .context(&spec, "2", Some(("Limit", None)), &[], &[]);

    materialize(&spec, &gw).unwrap();
    assert_eq!(
        gw.issued(),
        vec![
            query::root_context(&spec),
            query::context_tag(&spec, "1"),
            query::context_directives(&spec, "1"),
            query::child_contexts(&spec, "1"),
            query::context_tag(&spec, "2"),
            query::context_directives(&spec, "2"),
            query::child_contexts(&spec, "2"),
        ]
    );
}

#[test]
fn test_materialize_is_idempotent() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[("Port", Some("21"))], &["2"])
        .context(&spec, "2", Some(("Limit", Some("LOGIN"))), &[("AllowAll", None)], &[]);

    let first = materialize(&spec, &gw).unwrap();
    let second = materialize(&spec, &gw).unwrap();
    assert_eq!(first.to_text(), second.to_text());
}

#[test]
fn test_context_without_tag_row_still_renders_contents() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[], &["2"])
        .context(&spec, "2", None, &[("MaxClients", Some("10"))], &["3"])
        .context(&spec, "3", Some(("Limit", Some("LOGIN"))), &[], &[]);

    let lines = materialize(&spec, &gw).unwrap();
    assert_eq!(
        lines.to_text(),
        "MaxClients 10\n<Limit LOGIN>\n</Limit>\n"
    );
}

#[test]
fn test_null_key_means_no_tag() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[], &["2"])
        .respond(
            query::context_tag(&spec, "2"),
            RowSet::new(2, vec![vec![None, Some("ignored".to_string())]]),
        )
        .respond(
            query::context_directives(&spec, "2"),
            RowSet::new(2, vec![vec![Some("Port".to_string()), Some("2121".to_string())]]),
        )
        .respond(query::child_contexts(&spec, "2"), RowSet::new(1, vec![]));

    let lines = materialize(&spec, &gw).unwrap();
    assert_eq!(lines.to_text(), "Port 2121\n");
}

#[test]
fn test_stats() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[("Port", Some("21"))], &["2"])
        .context(&spec, "2", Some(("Limit", Some("LOGIN"))), &[("DenyAll", None)], &[]);

    let result = TreeMaterializer::new(&spec, &gw).run().unwrap();
    assert_eq!(
        result.stats,
        MaterializeStats {
            contexts: 2,
            directives: 2,
            queries: 7,
        }
    );
}

#[test]
fn test_no_root_is_fatal() {
    let spec = spec();
    let gw = ScriptedGateway::new().respond(query::root_context(&spec), RowSet::new(1, vec![]));

    let err = materialize(&spec, &gw).unwrap_err();
    assert!(matches!(
        err,
        MaterializeError::RootNotFound { which: "default" }
    ));
    assert!(err.is_schema_error());
}

#[test]
fn test_multiple_roots_are_fatal() {
    let spec = spec();
    let gw = ScriptedGateway::new().respond(
        query::root_context(&spec),
        RowSet::new(
            1,
            vec![vec![Some("1".to_string())], vec![Some("5".to_string())]],
        ),
    );

    let err = materialize(&spec, &gw).unwrap_err();
    assert!(matches!(err, MaterializeError::AmbiguousRoot { rows: 2, .. }));
}

#[test]
fn test_root_with_wrong_column_count_is_fatal() {
    let spec = spec();
    let gw = ScriptedGateway::new().respond(
        query::root_context(&spec),
        RowSet::new(2, vec![vec![Some("1".to_string()), None]]),
    );

    let err = materialize(&spec, &gw).unwrap_err();
    assert!(matches!(
        err,
        MaterializeError::UnexpectedColumns {
            expected: 1,
            found: 2,
            ..
        }
    ));
}

#[test]
fn test_base_id_root_lookup() {
    let spec = DescriptorSpec::parse("sql://u:p@h/ctx:c/conf:d/map:m/base_id=7").unwrap();
    let gw = ScriptedGateway::new()
        .root(&spec, "7")
        .context(&spec, "7", Some(("VirtualHost", Some("10.0.0.1"))), &[("Port", Some("2121"))], &[]);

    let lines = materialize(&spec, &gw).unwrap();
    assert_eq!(lines.to_text(), "Port 2121\n");
    assert_eq!(gw.issued()[0], "SELECT id FROM c WHERE id = '7'");
}

#[test]
fn test_missing_base_context_reports_base() {
    let spec = DescriptorSpec::parse("sql://u:p@h/ctx:c/conf:d/map:m/base_id=7").unwrap();
    let gw = ScriptedGateway::new().respond(query::root_context(&spec), RowSet::new(1, vec![]));

    let err = materialize(&spec, &gw).unwrap_err();
    assert!(matches!(err, MaterializeError::RootNotFound { which: "base" }));
}

#[test]
fn test_ambiguous_context_is_fatal_at_any_depth() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[("Port", Some("21"))], &["2"])
        .respond(
            query::context_tag(&spec, "2"),
            RowSet::new(
                2,
                vec![
                    vec![Some("Limit".to_string()), None],
                    vec![Some("Global".to_string()), None],
                ],
            ),
        );

    let err = materialize(&spec, &gw).unwrap_err();
    match err {
        MaterializeError::AmbiguousContext { id, rows } => {
            assert_eq!(id, "2");
            assert_eq!(rows, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_backend_failure_aborts() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[("Port", Some("21"))], &["2"])
        .fail(query::context_tag(&spec, "2"), "connection reset");

    let err = materialize(&spec, &gw).unwrap_err();
    assert!(matches!(
        err,
        MaterializeError::Backend(DbError::ExecutionError(_))
    ));
    assert!(!err.is_schema_error());
}

#[test]
fn test_cycle_is_detected() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[], &["2"])
        .context(&spec, "2", Some(("A", None)), &[], &["3"])
        .context(&spec, "3", Some(("B", None)), &[], &["2"]);

    let err = materialize(&spec, &gw).unwrap_err();
    match err {
        MaterializeError::Cycle { id, path } => {
            assert_eq!(id, "2");
            assert_eq!(path, "1 -> 2 -> 3");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_shared_child_is_not_a_cycle() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[], &["2", "3"])
        .context(&spec, "2", Some(("A", None)), &[], &["4"])
        .context(&spec, "3", Some(("B", None)), &[], &["4"])
        .context(&spec, "4", Some(("C", None)), &[], &[]);

    let lines = materialize(&spec, &gw).unwrap();
    assert_eq!(
        lines.to_text(),
        "<A>\n<C>\n</C>\n</A>\n<B>\n<C>\n</C>\n</B>\n"
    );
}

#[test]
fn test_null_directive_key_is_fatal() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .respond(query::context_tag(&spec, "1"), RowSet::new(2, vec![]))
        .respond(
            query::context_directives(&spec, "1"),
            RowSet::new(2, vec![vec![None, Some("21".to_string())]]),
        );

    let err = materialize(&spec, &gw).unwrap_err();
    assert!(matches!(
        err,
        MaterializeError::NullValue {
            what: "directive key",
            ..
        }
    ));
}

#[test]
fn test_null_child_id_is_fatal() {
    let spec = spec();
    let gw = ScriptedGateway::new()
        .root(&spec, "1")
        .respond(query::context_tag(&spec, "1"), RowSet::new(2, vec![]))
        .respond(query::context_directives(&spec, "1"), RowSet::new(2, vec![]))
        .respond(query::child_contexts(&spec, "1"), RowSet::new(1, vec![vec![None]]));

    let err = materialize(&spec, &gw).unwrap_err();
    assert!(matches!(
        err,
        MaterializeError::NullValue {
            what: "child context id",
            ..
        }
    ));
}
