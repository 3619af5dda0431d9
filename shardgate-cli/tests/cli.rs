use std::path::Path;

use assert_cmd::Command;
use tempfile::TempDir;

fn shardgate() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shardgate"));
    cmd.env_remove("SHARDGATE_MAX_RESOURCES")
        .env_remove("SHARDGATE_OPERATION_MAP")
        .env_remove("SHARDGATE_ENDPOINT_MAP")
        .env("RUST_LOG", "error");
    cmd
}

fn project(api: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let write = |name: &str, contents: &str| {
        std::fs::write(dir.path().join(name), contents).expect("write fixture");
    };
    write("api.yaml", api);
    write(
        "schema.graphql",
        "type Query { getUser(id: ID!): String listUsers: [String] }\n\
         type Mutation { createUser(name: String): String }\n",
    );
    write(
        "templates.json",
        r#"{
  "getUser": {"request_vtl": "q1", "response_vtl": "r1"},
  "listUsers": {"request_vtl": "q2", "response_vtl": "r2"},
  "createUser": {"request_vtl": "q3", "response_vtl": "r3"}
}"#,
    );
    write(
        "shardgate.yaml",
        "project:\n  name: users\n\
         description_path: api.yaml\n\
         schema_path: schema.graphql\n\
         templates_path: templates.json\n\
         max_resources_per_stack: 2\n\
         endpoint_template: \"https://{surface}.example.com/prod\"\n",
    );
    dir
}

const API: &str = r#"
openapi: 3.0.0
paths:
  /users/{id}:
    get:
      operationId: getUser
  /users:
    get:
      operationId: listUsers
    post:
      operationId: createUser
"#;

fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn build_writes_manifest_and_decode_reads_it_back() {
    let dir = project(API);
    let manifest = dir.path().join("manifest.json");

    shardgate()
        .args(["build", "--config", &arg(&dir.path().join("shardgate.yaml"))])
        .args(["--out", &arg(&manifest)])
        .assert()
        .success();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(written["tables"]["operations"]["createUser"], 1);
    assert_eq!(
        written["tables"]["endpoints"]["0"],
        "https://users-batch0.example.com/prod"
    );
    assert!(written["router"]["environment"]["SHARDGATE_OPERATION_MAP"].is_string());

    let out = shardgate()
        .args(["decode", "--manifest", &arg(&manifest)])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("getUser -> batch 0 (https://users-batch0.example.com/prod)"));
    assert!(text.contains("createUser -> batch 1 (https://users-batch1.example.com/prod)"));
}

#[test]
fn batch_size_comes_from_the_environment() {
    let dir = project(API);
    let out = shardgate()
        .env("SHARDGATE_MAX_RESOURCES", "1")
        .args(["batches", "--format", "json"])
        .args(["--config", &arg(&dir.path().join("shardgate.yaml"))])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let result: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(result["max_resources_per_stack"], 1);
    assert_eq!(result["batches"].as_array().unwrap().len(), 3);
    assert_eq!(result["batches"][2]["operations"][0]["role"], "Mutation");
}

#[test]
fn missing_operation_id_is_a_validation_failure() {
    let dir = project("paths:\n  /users:\n    get:\n      summary: no id\n");
    shardgate()
        .args(["build", "--config", &arg(&dir.path().join("shardgate.yaml"))])
        .assert()
        .code(2);
}

#[test]
fn zero_batch_size_is_rejected() {
    let dir = project(API);
    shardgate()
        .args(["build", "--max-resources", "0"])
        .args(["--config", &arg(&dir.path().join("shardgate.yaml"))])
        .assert()
        .code(2);
}

#[test]
fn missing_description_file_is_a_runtime_error() {
    let dir = project(API);
    shardgate()
        .args(["build", "--description", &arg(&dir.path().join("absent.yaml"))])
        .args(["--config", &arg(&dir.path().join("shardgate.yaml"))])
        .assert()
        .code(4);
}

#[test]
fn decode_without_payload_fails() {
    shardgate().args(["decode"]).assert().code(2);
}
