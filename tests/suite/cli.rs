//! End-to-end runs of the `dominsp` binary

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{
    Sandbox, mount_no_synonyms, mount_registered, mount_synonyms, mount_unregistered_by_default,
    stderr, stdout,
};

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(sandbox: &Sandbox, args: &[&str]) -> std::process::Output {
    let config = sandbox.config_path();
    let cwd = sandbox.dir.path().to_path_buf();
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        crate::common::run_dominsp(&config, &cwd, &args)
    })
    .await
    .unwrap()
}

#[test]
fn version_flag_prints_package_version() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        format!("dominsp {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn init_creates_database_and_records_it_in_config() {
    let sandbox = Sandbox::new();
    let database = sandbox.database_path();

    let output = sandbox.run(&["init", "--db-path", database.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(sandbox.database_json(), serde_json::json!([]));

    let config = std::fs::read_to_string(sandbox.config_path()).unwrap();
    assert!(config.contains("[general]"));
    assert!(config.contains(database.to_str().unwrap()));

    // Later commands find the database through the config alone.
    let output = sandbox.run(&["add", "sun"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

#[test]
fn init_keeps_an_existing_database() {
    let sandbox = Sandbox::new();
    sandbox.write_config("");
    std::fs::write(
        sandbox.database_path(),
        r#"[{ "word": "sun", "status": 0, "combined": false }]"#,
    )
    .unwrap();

    let output = sandbox.run(&["init"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("existing database"));
    assert_eq!(sandbox.database_json().as_array().unwrap().len(), 1);
}

#[test]
fn add_and_list_show_normalized_words() {
    let sandbox = Sandbox::new();
    sandbox.write_config("");
    assert!(sandbox.run(&["init"]).status.success());

    let output = sandbox.run(&["add", "Bad", "Apple"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("bad apple"));

    let output = sandbox.run(&["list"]);
    assert!(output.status.success());
    let listing = stdout(&output);
    assert!(listing.contains("new"));
    assert!(listing.contains("bad apple"));

    assert_eq!(
        sandbox.database_json(),
        serde_json::json!([{ "word": "bad apple", "status": 0, "combined": false }])
    );
}

#[test]
fn combine_reports_staged_compounds() {
    let sandbox = Sandbox::new();
    sandbox.write_config("");
    assert!(sandbox.run(&["init"]).status.success());
    assert!(sandbox.run(&["add", "sun"]).status.success());
    assert!(sandbox.run(&["add", "set"]).status.success());

    let output = sandbox.run(&["combine"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Staged 4 compound(s)"));

    let output = sandbox.run(&["combine"]);
    assert!(stdout(&output).contains("Staged 0 compound(s)"));
}

#[test]
fn commands_before_init_point_at_init() {
    let sandbox = Sandbox::new();

    let output = sandbox.run(&["add", "sun"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error:"), "stderr: {err}");
    assert!(
        err.contains("Config file not found. Please run \"dominsp init\""),
        "stderr: {err}"
    );
    assert!(stdout(&output).is_empty());
    assert!(!sandbox.database_path().exists());
}

#[test]
fn missing_database_points_at_init() {
    let sandbox = Sandbox::new();
    sandbox.write_config("");

    for command in ["list", "available", "process", "combine"] {
        let output = sandbox.run(&[command]);
        assert!(!output.status.success(), "{command} should fail");
        let err = stderr(&output);
        assert!(err.contains("Database not found"), "{command}: {err}");
        assert!(err.contains("Please run \"dominsp init\""), "{command}: {err}");
    }
    assert!(!sandbox.database_path().exists());
}

#[test]
fn unreadable_database_reports_the_read_failure() {
    let sandbox = Sandbox::new();
    sandbox.write_config("");
    std::fs::create_dir(sandbox.database_path()).unwrap();

    let output = sandbox.run(&["list"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("database read failure"), "stderr: {err}");
}

#[test]
fn invalid_config_is_reported() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.config_path(), "invalid toml [").unwrap();

    let output = sandbox.run(&["list"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to parse config"));
}

#[test]
fn missing_thesaurus_fails_process_before_touching_database() {
    let sandbox = Sandbox::new();
    let thesaurus = sandbox.dir.path().join("absent.txt");
    sandbox.write_config(&format!(
        "[lexicon]\nprovider = \"thesaurus\"\nthesaurus_path = {:?}\n",
        thesaurus.display().to_string()
    ));
    assert!(sandbox.run(&["init"]).status.success());
    assert!(sandbox.run(&["add", "good"]).status.success());

    let output = sandbox.run(&["process"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("thesaurus"));
    assert_eq!(
        sandbox.database_json(),
        serde_json::json!([{ "word": "good", "status": 0, "combined": false }])
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn process_with_thesaurus_checks_rdap() {
    let server = MockServer::start().await;
    mount_registered(&server, "fine.com").await;
    mount_unregistered_by_default(&server).await;

    let sandbox = Sandbox::new();
    let thesaurus = sandbox.dir.path().join("thesaurus.txt");
    std::fs::write(&thesaurus, "good,fine,great,ok\n").unwrap();
    sandbox.write_config(&format!(
        "[lexicon]\nprovider = \"thesaurus\"\nthesaurus_path = {:?}\n\n\
         [registrar]\nrdap_url = \"{}/com/v1\"\n",
        thesaurus.display().to_string(),
        server.uri()
    ));
    assert!(run_blocking(&sandbox, &["init"]).await.status.success());
    assert!(run_blocking(&sandbox, &["add", "good"]).await.status.success());

    let output = run_blocking(&sandbox, &["process"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_blocking(&sandbox, &["available"]).await;
    assert_eq!(stdout(&output), "good.com\ngreat.com\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn process_with_datamuse_end_to_end() {
    let server = MockServer::start().await;
    mount_synonyms(&server, "good", &["fine", "great", "ok"]).await;
    mount_no_synonyms(&server).await;
    mount_registered(&server, "fine.com").await;
    mount_unregistered_by_default(&server).await;

    let sandbox = Sandbox::new();
    sandbox.write_mock_config(&server);
    assert!(run_blocking(&sandbox, &["init"]).await.status.success());
    assert!(run_blocking(&sandbox, &["add", "good"]).await.status.success());

    let output = run_blocking(&sandbox, &["process"]).await;
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = stdout(&output);
    assert!(report.contains("discovered 2"), "stdout: {report}");
    assert!(report.contains("great.com"));

    assert_eq!(
        sandbox.database_json(),
        serde_json::json!([
            { "word": "fine", "status": 2, "combined": false },
            { "word": "good", "status": 3, "combined": false },
            { "word": "great", "status": 3, "combined": false }
        ])
    );

    let output = run_blocking(&sandbox, &["available"]).await;
    assert_eq!(stdout(&output), "good.com\ngreat.com\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn registrar_failure_keeps_staged_records_for_the_next_run() {
    let server = MockServer::start().await;
    mount_synonyms(&server, "good", &["fine"]).await;
    mount_no_synonyms(&server).await;
    Mock::given(method("GET"))
        .and(path("/com/v1/domain/good.com"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sandbox = Sandbox::new();
    sandbox.write_mock_config(&server);
    assert!(run_blocking(&sandbox, &["init"]).await.status.success());
    assert!(run_blocking(&sandbox, &["add", "good"]).await.status.success());

    let output = run_blocking(&sandbox, &["process"]).await;
    assert!(!output.status.success());
    assert!(stderr(&output).contains("expansion pass failed"));

    assert_eq!(
        sandbox.database_json(),
        serde_json::json!([
            { "word": "good", "status": 1, "combined": false },
            { "word": "fine", "status": 1, "combined": false }
        ])
    );
}
