//! Integration tests for the `sqlproxy-fn` binary.
//!
//! Each test runs the binary in an empty temp directory so no stray
//! `sqlproxy.toml` is picked up.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_sqlproxy-fn");

const RESOURCE_LIST: &str = r#"apiVersion: config.kubernetes.io/v1
kind: ResourceList
items:
  - apiVersion: apps/v1
    kind: Deployment
    metadata:
      name: my-app
      annotations:
        kustomize.treyd.io/cloud-sql-proxy: "true"
    spec:
      template:
        spec:
          containers:
            - name: container1
              image: image1
  - apiVersion: v1
    kind: Service
    metadata:
      name: my-app
    spec:
      ports:
        - port: 80
functionConfig:
  apiVersion: kustomize.treyd.io/v1
  kind: CloudSqlProxy
  metadata:
    name: proxy
  spec:
    proxyImage: gcr.io/cloud-sql-connectors/cloud-sql-proxy
    proxyVersion: 2.0.0
    proxyInstances: your-project:your-region:your-instance=tcp:5432
"#;

fn sqlproxy_fn(dir: &TempDir, args: &[&str], stdin: &str) -> Output {
    sqlproxy_fn_with_env(dir, args, stdin, &[])
}

fn sqlproxy_fn_with_env(
    dir: &TempDir,
    args: &[&str],
    stdin: &str,
    envs: &[(&str, &str)],
) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("SQLPROXY_GENERAL_LOG_LEVEL")
        .env_remove("SQLPROXY_GENERAL_LOG_FORMAT")
        .env_remove("SQLPROXY_INJECTOR_EXTRA_CONTAINER_PATHS")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("should spawn sqlproxy-fn");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin.as_bytes())
        .expect("should write stdin");

    child.wait_with_output().expect("should wait for sqlproxy-fn")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout should be utf8")
}

#[test]
fn test_default_command_transforms_stdin() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sqlproxy_fn(&dir, &[], RESOURCE_LIST);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let out = stdout(&output);
    assert!(out.starts_with("apiVersion: config.kubernetes.io/v1"));
    assert!(out.contains("name: proxysql"));
    assert!(out.contains("image: gcr.io/cloud-sql-connectors/cloud-sql-proxy:2.0.0"));
    assert!(out.contains("runAsNonRoot: true"));

    let proxy = out.find("name: proxysql").expect("sidecar present");
    let original = out.find("name: container1").expect("original container present");
    assert!(proxy < original, "sidecar must come first");
}

#[test]
fn test_run_json_format() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sqlproxy_fn(&dir, &["run", "--format", "json"], RESOURCE_LIST);

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    let containers = &parsed["items"][0]["spec"]["template"]["spec"]["containers"];
    assert_eq!(containers[0]["name"], "proxysql");
    assert_eq!(containers[1]["name"], "container1");
    assert_eq!(parsed["items"][1]["kind"], "Service");
    assert!(parsed["items"][1]["spec"].get("containers").is_none());
}

#[test]
fn test_missing_function_config_field_exits_2_with_no_output() {
    let dir = TempDir::new().expect("should create temp dir");
    let input = RESOURCE_LIST.replace("    proxyVersion: 2.0.0\n", "");
    let output = sqlproxy_fn(&dir, &[], &input);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty(), "no partial output on failure");
    assert!(String::from_utf8_lossy(&output.stderr).contains("spec.proxyVersion"));
}

#[test]
fn test_unquoted_numeric_version_exits_2() {
    let dir = TempDir::new().expect("should create temp dir");
    let input = RESOURCE_LIST.replace("proxyVersion: 2.0.0", "proxyVersion: 2.10");
    let output = sqlproxy_fn(&dir, &[], &input);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must be a quoted string"), "stderr: {stderr}");
    assert!(stderr.contains("spec.proxyVersion"));
}

#[test]
fn test_annotated_configmap_exits_3() {
    let dir = TempDir::new().expect("should create temp dir");
    let input = RESOURCE_LIST.replace("kind: Service", "kind: ConfigMap").replace(
        "      name: my-app\n    spec:\n      ports:",
        "      name: my-app\n      annotations:\n        kustomize.treyd.io/cloud-sql-proxy: \"true\"\n    spec:\n      ports:",
    );
    let output = sqlproxy_fn(&dir, &[], &input);

    assert_eq!(output.status.code(), Some(3));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("ConfigMap 'my-app'"));
}

#[test]
fn test_non_resource_list_exits_4() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sqlproxy_fn(&dir, &[], "kind: Deployment\nmetadata:\n  name: x\n");
    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_settings_file_adds_container_path() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        dir.path().join("sqlproxy.toml"),
        "[injector]\nextra_container_paths = [\"spec.podSpec.containers\"]\n",
    )
    .expect("should write settings");

    let input = r#"kind: ResourceList
items:
  - kind: Workload
    metadata:
      name: custom
      annotations:
        kustomize.treyd.io/cloud-sql-proxy: "true"
    spec:
      podSpec:
        containers: []
functionConfig:
  spec:
    proxyImage: img
    proxyVersion: "1"
    proxyInstances: p:r:i
"#;
    let output = sqlproxy_fn(&dir, &[], input);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("image: img:1"));
}

#[test]
fn test_missing_explicit_settings_exits_2() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sqlproxy_fn(&dir, &["--settings", "missing.toml"], RESOURCE_LIST);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_input_and_output_files() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(dir.path().join("in.yaml"), RESOURCE_LIST).expect("should write input");

    let output = sqlproxy_fn(
        &dir,
        &["run", "--input", "in.yaml", "--output-file", "out.yaml"],
        "",
    );
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "result goes to the file, not stdout");

    let written =
        std::fs::read_to_string(dir.path().join("out.yaml")).expect("output file should exist");
    assert!(written.contains("name: proxysql"));
}

#[test]
fn test_gen_writes_dockerfile() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sqlproxy_fn(&dir, &["gen", "image"], "");

    assert!(output.status.success());
    let dockerfile = std::fs::read_to_string(dir.path().join("image").join("Dockerfile"))
        .expect("Dockerfile should exist");
    assert!(dockerfile.contains(r#"ENTRYPOINT ["/usr/local/bin/sqlproxy-fn"]"#));
}

#[test]
fn test_preview_json() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        dir.path().join("fn.yaml"),
        "spec:\n  proxyImage: img\n  proxyVersion: \"1.2\"\n  proxyInstances: p:r:i\n",
    )
    .expect("should write function config");

    let output = sqlproxy_fn(
        &dir,
        &["preview", "--function-config", "fn.yaml", "--output", "json"],
        "",
    );
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(parsed["container"]["image"], "img:1.2");
    assert_eq!(parsed["kind"], "Deployment");
}

#[test]
fn test_config_validate_reports_invalid_settings() {
    let dir = TempDir::new().expect("should create temp dir");
    std::fs::write(
        dir.path().join("sqlproxy.toml"),
        "[general]\nlog_level = \"loud\"\n",
    )
    .expect("should write settings");

    let output = sqlproxy_fn(&dir, &["config", "validate", "--output", "json"], "");
    assert_eq!(output.status.code(), Some(2));
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("report should be JSON");
    assert_eq!(parsed["valid"], false);
    assert!(parsed["errors"][0]
        .as_str()
        .expect("error message")
        .contains("general.log_level"));
}

#[test]
fn test_config_show_defaults() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sqlproxy_fn(&dir, &["config", "show", "--output", "json"], "");

    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("report should be JSON");
    assert_eq!(parsed["source"], "<defaults>");
    assert_eq!(
        parsed["container_paths"]["candidates"]
            .as_array()
            .expect("candidates array")
            .len(),
        4
    );
}

#[test]
fn test_invalid_log_level_flag_exits_2() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sqlproxy_fn(&dir, &["--log-level", "loud"], RESOURCE_LIST);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_empty_env_path_list_is_warned_after_logging_starts() {
    let dir = TempDir::new().expect("should create temp dir");
    let output = sqlproxy_fn_with_env(
        &dir,
        &[],
        RESOURCE_LIST,
        &[("SQLPROXY_INJECTOR_EXTRA_CONTAINER_PATHS", " , ")],
    );

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("empty list in env var"), "stderr: {stderr}");
    assert!(stderr.contains("SQLPROXY_INJECTOR_EXTRA_CONTAINER_PATHS"));
}
