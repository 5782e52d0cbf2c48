use super::*;
use sqlconf_core::DescriptorSpec;
use sqlconf_db::SharedConnector;
use sqlconf_materialize::test_utils::ScriptedGateway;

const PATH: &str = "sql://u:p@host/ctx:contexts/conf:directives/map:links";

fn fs_with(gateway: ScriptedGateway) -> SqlConfFs {
    SqlConfFs::new("sql://", Arc::new(SharedConnector::new(Arc::new(gateway))))
}

fn scripted() -> ScriptedGateway {
    let spec = DescriptorSpec::parse(PATH).unwrap();
    ScriptedGateway::new()
        .root(&spec, "1")
        .context(&spec, "1", None, &[("ServerName", Some("\"test\""))], &[])
}

#[test]
fn test_descriptor_opens_as_sql() {
    let fs = fs_with(scripted());
    let mut source = fs.open(PATH).unwrap();
    assert_eq!(source.kind(), SourceKind::Virtual);

    let mut text = String::new();
    source.read_to_string(&mut text).unwrap();
    assert_eq!(text, "ServerName \"test\"\n");
}

#[test]
fn test_other_paths_open_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proftpd.conf");
    std::fs::write(&path, "Port 21\n").unwrap();

    let fs = fs_with(ScriptedGateway::new());
    let mut source = fs.open(path.to_str().unwrap()).unwrap();
    assert_eq!(source.kind(), SourceKind::Disk);

    let mut text = String::new();
    source.read_to_string(&mut text).unwrap();
    assert_eq!(text, "Port 21\n");
}

#[test]
fn test_missing_disk_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.conf");

    let fs = fs_with(ScriptedGateway::new());
    let err = fs.open(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, VfsError::Io { .. }));
}

#[test]
fn test_bad_descriptor_fails_open() {
    let fs = fs_with(ScriptedGateway::new());
    let err = fs.open("sql://u:p@host/ctx:contexts").unwrap_err();
    assert!(matches!(err, VfsError::Syntax(_)));
}

#[test]
fn test_unregister_routes_to_disk() {
    let mut fs = fs_with(scripted());
    assert!(fs.claims(PATH));

    fs.unregister();
    assert!(!fs.is_registered());
    assert!(!fs.claims(PATH));
    // No such file on disk
    assert!(matches!(fs.open(PATH).unwrap_err(), VfsError::Io { .. }));

    fs.register();
    assert!(fs.claims(PATH));
    assert_eq!(fs.open(PATH).unwrap().kind(), SourceKind::Virtual);
}

#[test]
fn test_stat() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("proftpd.conf");
    std::fs::write(&path, "Port 21\n").unwrap();
    let fs = fs_with(ScriptedGateway::new());

    assert_eq!(
        fs.stat(PATH).unwrap(),
        SourceStat {
            kind: SourceKind::Virtual,
            len: None
        }
    );
    assert_eq!(
        fs.stat(path.to_str().unwrap()).unwrap(),
        SourceStat {
            kind: SourceKind::Disk,
            len: Some(8)
        }
    );
    assert!(fs.stat(dir.path().join("nope").to_str().unwrap()).is_err());
}

#[test]
fn test_custom_scheme_from_config() {
    let config = Config {
        scheme: "db://".to_string(),
        ..Config::default()
    };
    let fs = SqlConfFs::from_config(
        &config,
        Arc::new(SharedConnector::new(Arc::new(ScriptedGateway::new()))),
    );
    assert_eq!(fs.scheme(), "db://");
    assert!(fs.claims("db://u:p@h/ctx:c/conf:d/map:m"));
    assert!(!fs.claims(PATH));
}
