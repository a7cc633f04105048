use sqlcheck::commands::{run_generate, GenerateOptions};
use sqlcheck::config::Config;
use sqlcheck::export::{ClipboardSink, CopyOutcome, ExportError, SCRIPT_FILE_NAME};
use sqlcheck::{build_script, extract, generate, ClientPathRegistry, Session, SessionEvent};

#[derive(Default)]
struct RecordingClipboard {
    writes: Vec<String>,
}

impl ClipboardSink for RecordingClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.writes.push(text.to_string());
        Ok(())
    }
}

const NOTES: &str = "\
Deployment for release 4.2
1. Run 001_create_members.sql on the QA database
2. Run 002-alter_claims.SQL
3. Re-run 001_create_members.sql if step 2 fails
Do not run rollback.sqlite or notes.txt
";

#[test]
fn extracts_in_order_with_duplicates() {
    assert_eq!(
        extract(NOTES),
        vec!["001_create_members.sql", "002-alter_claims.SQL", "001_create_members.sql"]
    );
}

#[test]
fn documented_script_format() {
    let files = vec!["a.sql".to_string(), "b.sql".to_string()];
    assert_eq!(
        generate(&files, Some("Q:\\Client\\qa\\sql")),
        "@echo off\nif exist \"Q:\\Client\\qa\\sql\\a.sql\" (echo a.sql found) else (echo a.sql missing)\nif exist \"Q:\\Client\\qa\\sql\\b.sql\" (echo b.sql found) else (echo b.sql missing)\n\npause"
    );
    assert_eq!(generate(&[], Some("X")), "");
    assert_eq!(generate(&["a.sql".to_string()], None), "");
}

#[test]
fn live_script_for_standard_client() {
    let script = build_script(&ClientPathRegistry::new(), NOTES, "HIP", "LIVE");
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(lines[0], "@echo off");
    assert_eq!(
        lines[2],
        r#"if exist "Q:\iThrive\live\sql\002-alter_claims.SQL" (echo 002-alter_claims.SQL found) else (echo 002-alter_claims.SQL missing)"#
    );
    assert_eq!(lines.len(), 6);
}

#[test]
fn session_walkthrough() {
    let mut session = Session::new(ClientPathRegistry::new());
    let mut clipboard = RecordingClipboard::default();
    let dir = tempfile::tempdir().unwrap();

    session.apply(SessionEvent::TextChanged(NOTES.to_string()));
    session.apply(SessionEvent::EnvironmentChanged("LIVE".to_string()));
    assert_eq!(session.resolved_path(), Some(r"Q:\BestMed\live"));

    session.apply(SessionEvent::ClientChanged("Test".to_string()));
    assert_eq!(session.state().environment, "TEST");
    assert!(session.state().script.contains(r"Q:\iThrive\test\sql\002-alter_claims.SQL"));

    session.apply(SessionEvent::ClientChanged("ZMC".to_string()));
    assert_eq!(session.state().environment, "QA");

    assert_eq!(session.copy(&mut clipboard).unwrap(), CopyOutcome::Copied);
    let path = session.download(dir.path()).unwrap().unwrap();
    assert_eq!(path.file_name().unwrap(), SCRIPT_FILE_NAME);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), clipboard.writes[0]);

    session.apply(SessionEvent::TextChanged(String::new()));
    assert_eq!(session.copy(&mut clipboard).unwrap(), CopyOutcome::Skipped);
    assert_eq!(clipboard.writes.len(), 1);
}

#[test]
fn custom_table_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clients.toml");
    std::fs::write(
        &path,
        "[[clients]]\nname = \"Solo\"\nenvironments = [{ name = \"UAT\", path = 'E:\\solo\\uat' }]\n",
    )
    .unwrap();

    let registry = Config::load(&path).unwrap().into_registry().unwrap();
    let mut session = Session::new(registry);
    assert_eq!(session.state().client, "Solo");
    assert_eq!(session.state().environment, "UAT");

    session.apply(SessionEvent::EnvironmentChanged("LIVE".to_string()));
    session.apply(SessionEvent::TextChanged("x.sql".to_string()));
    assert_eq!(session.state().environment, "UAT");
    assert!(session.state().script.contains(r#"if exist "E:\solo\uat\x.sql""#));
}

#[test]
fn one_shot_generate_writes_script_and_bat_file() {
    let dir = tempfile::tempdir().unwrap();
    let options = GenerateOptions {
        client: "MMI".to_string(),
        environment: None,
        output_dir: Some(dir.path().join("out")),
        copy: true,
    };
    let mut out: Vec<u8> = Vec::new();
    let mut notices: Vec<u8> = Vec::new();

    let report = run_generate(
        &ClientPathRegistry::new(),
        NOTES,
        &options,
        &mut out,
        &mut notices,
        || Ok(Box::new(RecordingClipboard::default()) as Box<dyn ClipboardSink>),
    )
    .unwrap();

    assert_eq!(report.environment, "QA");
    assert!(report.copied);
    assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", report.script));
    assert!(report.script.contains(r"Q:\MMI_Africa\qa\sql\001_create_members.sql"));

    let written = report.written.unwrap();
    assert_eq!(written.file_name().unwrap(), SCRIPT_FILE_NAME);
    assert_eq!(std::fs::read_to_string(written).unwrap(), report.script);
}

#[test]
fn one_shot_generate_for_unknown_client_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let options = GenerateOptions {
        client: "Nobody".to_string(),
        environment: Some("LIVE".to_string()),
        output_dir: Some(dir.path().to_path_buf()),
        copy: true,
    };
    let mut out: Vec<u8> = Vec::new();
    let mut notices: Vec<u8> = Vec::new();

    let report = run_generate(
        &ClientPathRegistry::new(),
        NOTES,
        &options,
        &mut out,
        &mut notices,
        || Err(ExportError::Clipboard("no display".to_string())),
    )
    .unwrap();

    assert_eq!(report.script, "");
    assert_eq!(report.written, None);
    assert!(!report.copied);
    assert!(out.is_empty());
    let notices = String::from_utf8(notices).unwrap();
    assert!(notices.contains("No path registered for Nobody / LIVE"));
    assert!(!notices.contains("[ERROR]"));
    assert!(!dir.path().join(SCRIPT_FILE_NAME).exists());
}
