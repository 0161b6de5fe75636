//! CLI integration tests for the resource-graph binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("resource-graph"))
}

// Helper to create a temp file
fn write_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

const RELATIONSHIPS: &str = r#"{
    "AWS::EC2::Instance": {
        "primaryIdentifier": ["/properties/InstanceId"],
        "relationships": [
            { "SubnetId": [{ "typeName": "AWS::EC2::Subnet", "attribute": "/properties/SubnetId" }] },
            { "SecurityGroupIds": [{ "typeName": "AWS::EC2::SecurityGroup", "attribute": "/properties/GroupId" }] }
        ]
    },
    "AWS::EC2::Subnet": {
        "relationships": [
            { "VpcId": [{ "typeName": "AWS::EC2::VPC", "attribute": "/properties/VpcId" }] }
        ]
    },
    "AWS::EC2::SecurityGroup": {},
    "AWS::EC2::VPC": {}
}"#;

const INSTANCE_SCHEMA: &str = r##"{
    "typeName": "AWS::EC2::Instance",
    "properties": {
        "InstanceId": { "type": "string" },
        "SubnetId": { "type": "string" },
        "SecurityGroupIds": { "type": "array", "items": { "type": "string" } },
        "Tags": { "type": "array", "items": { "$ref": "#/definitions/Tag" } }
    },
    "definitions": {
        "Tag": {
            "type": "object",
            "properties": {
                "Key": { "type": "string" },
                "Value": { "type": "string" }
            }
        }
    }
}"##;

const SUBNET_SCHEMA: &str = r#"{
    "typeName": "AWS::EC2::Subnet",
    "properties": { "VpcId": { "type": "string" } }
}"#;

/// Relationship document plus a schema directory.
struct Fixture {
    dir: TempDir,
    relationships: PathBuf,
    schemas: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let relationships = write_temp_file(dir.path(), "relationships.json", RELATIONSHIPS);
    let schemas = dir.path().join("schemas");
    fs::create_dir(&schemas).unwrap();
    write_temp_file(&schemas, "aws-ec2-instance.json", INSTANCE_SCHEMA);
    write_temp_file(&schemas, "aws-ec2-subnet.json", SUBNET_SCHEMA);
    Fixture {
        dir,
        relationships,
        schemas,
    }
}

mod translate_command {
    use super::*;

    #[test]
    fn translate_to_stdout() {
        let f = fixture();
        cmd()
            .args(["translate", "--relationships"])
            .arg(&f.relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""rustName":"AwsEc2Instance""#))
            .stdout(predicate::str::contains(r#""returnType":"Option<AwsEc2Subnet>""#))
            .stdout(predicate::str::contains(r#""returnType":"Vec<Node>""#));
    }

    #[test]
    fn translate_to_file() {
        let f = fixture();
        let output = f.dir.path().join("model.json");

        cmd()
            .args(["translate", "--pretty", "--relationships"])
            .arg(&f.relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .arg("--output")
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        let model: serde_json::Value = serde_json::from_str(&content).unwrap();
        let names: Vec<&str> = model
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["AWS::EC2::Instance", "AWS::EC2::Subnet"]);
    }

    #[test]
    fn translate_is_deterministic() {
        let f = fixture();
        let run = || {
            cmd()
                .args(["translate", "--relationships"])
                .arg(&f.relationships)
                .arg("--schemas")
                .arg(&f.schemas)
                .output()
                .unwrap()
                .stdout
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn translate_with_filter() {
        let f = fixture();
        cmd()
            .args(["translate", "--filter", "AWS::EC2::Instance", "--filter", "AWS::EC2::Subnet"])
            .arg("--relationships")
            .arg(&f.relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .success()
            // Subnet's only target is filtered out
            .stdout(predicate::str::contains(r#""returnType":"Option<Node>""#))
            .stdout(predicate::str::contains("security_group_ids").not());
    }

    #[test]
    fn translate_with_config_overrides() {
        let f = fixture();
        let relationships = write_temp_file(
            f.dir.path(),
            "renamed.json",
            r#"{
                "AWS::EC2::Instance": {
                    "relationships": [
                        { "SecurityGroups": [{ "typeName": "AWS::EC2::SecurityGroup" }] }
                    ]
                },
                "AWS::EC2::SecurityGroup": {}
            }"#,
        );
        let config = write_temp_file(
            f.dir.path(),
            "config.toml",
            r#"
[overrides."AWS::EC2::Instance"]
SecurityGroups = "SecurityGroupIds"
"#,
        );

        cmd()
            .args(["translate", "--relationships"])
            .arg(&relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .arg("--config")
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""sourcePropertyName":"security_group_ids""#));
    }

    #[test]
    fn relationship_errors_exit_1_after_output() {
        let f = fixture();
        let relationships = write_temp_file(
            f.dir.path(),
            "broken.json",
            r#"{
                "AWS::EC2::Instance": {
                    "relationships": [
                        { "SubnetId": [{ "typeName": "AWS::EC2::Subnet" }] },
                        { "NoSuchProperty": [{ "typeName": "AWS::EC2::Subnet" }] }
                    ]
                },
                "AWS::EC2::Subnet": {}
            }"#,
        );

        cmd()
            .args(["translate", "--relationships"])
            .arg(&relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("subnet_id"))
            .stderr(predicate::str::contains("1 relationship error(s)"))
            .stderr(predicate::str::contains("NoSuchProperty"));
    }

    #[test]
    fn invalid_relationship_document_exit_2() {
        let f = fixture();
        let relationships = write_temp_file(
            f.dir.path(),
            "invalid.json",
            r#"{ "AWS::EC2::Instance": { "relationships": [{ "SubnetId": [{ "attribute": "/x" }] }] } }"#,
        );

        cmd()
            .args(["translate", "--relationships"])
            .arg(&relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("typeName"));
    }

    #[test]
    fn invalid_json_exit_2() {
        let f = fixture();
        let relationships = write_temp_file(f.dir.path(), "bad.json", "{ not json");

        cmd()
            .args(["translate", "--relationships"])
            .arg(&relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .code(2);
    }

    #[test]
    fn invalid_config_exit_2() {
        let f = fixture();
        let config = write_temp_file(f.dir.path(), "config.toml", "unknown_key = true\n");

        cmd()
            .args(["translate", "--relationships"])
            .arg(&f.relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .arg("--config")
            .arg(&config)
            .assert()
            .code(2);
    }

    #[test]
    fn missing_file_exit_3() {
        let f = fixture();
        cmd()
            .args(["translate", "--relationships", "/nonexistent/relationships.json"])
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("not found"));
    }

    #[test]
    fn missing_schema_dir_exit_3() {
        let f = fixture();
        cmd()
            .args(["translate", "--relationships"])
            .arg(&f.relationships)
            .args(["--schemas", "/nonexistent/schemas"])
            .assert()
            .code(3);
    }
}

mod classify_command {
    use super::*;

    #[test]
    fn classify_array_path() {
        let f = fixture();
        let schema = f.schemas.join("aws-ec2-instance.json");
        cmd()
            .args(["classify", "--schema"])
            .arg(&schema)
            .arg("Tags/Value")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("array ("));
    }

    #[test]
    fn classify_scalar_path() {
        let f = fixture();
        let schema = f.schemas.join("aws-ec2-instance.json");
        cmd()
            .args(["classify", "--schema"])
            .arg(&schema)
            .arg("SubnetId")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("scalar ("));
    }

    #[test]
    fn classify_missing_path_exit_2() {
        let f = fixture();
        let schema = f.schemas.join("aws-ec2-instance.json");
        cmd()
            .args(["classify", "--schema"])
            .arg(&schema)
            .arg("Tags/Nope")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Tags/Nope"));
    }

    #[test]
    fn classify_ambiguous_path_exit_2() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            dir.path(),
            "schema.json",
            r#"{
                "properties": {
                    "Target": {
                        "oneOf": [
                            { "type": "string" },
                            { "type": "array", "items": { "type": "string" } }
                        ]
                    }
                }
            }"#,
        );

        cmd()
            .args(["classify", "--schema"])
            .arg(&schema)
            .arg("Target")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Target"));
    }

    #[test]
    fn classify_missing_schema_exit_3() {
        cmd()
            .args(["classify", "--schema", "/nonexistent/schema.json", "SubnetId"])
            .assert()
            .code(3);
    }
}

mod check_command {
    use super::*;

    #[test]
    fn check_passes() {
        let f = fixture();
        cmd()
            .args(["check", "--relationships"])
            .arg(&f.relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .success()
            .stdout(predicate::str::contains("all passed"));
    }

    #[test]
    fn check_json_output() {
        let f = fixture();
        let output = cmd()
            .args(["check", "--format", "json", "--relationships"])
            .arg(&f.relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .output()
            .unwrap();
        assert!(output.status.success());

        let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["errors"], 0);
        assert_eq!(result["resources_checked"], 4);
    }

    #[test]
    fn check_warning_fails_only_in_strict_mode() {
        let f = fixture();
        let relationships = write_temp_file(
            f.dir.path(),
            "warn.json",
            r#"{
                "AWS::EC2::Instance": {
                    "relationships": [{ "Gone": [{ "typeName": "AWS::EC2::Subnet" }] }]
                },
                "AWS::EC2::Subnet": {}
            }"#,
        );

        cmd()
            .args(["check", "--relationships"])
            .arg(&relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .success()
            .stdout(predicate::str::contains("W001"));

        cmd()
            .args(["check", "--strict", "--relationships"])
            .arg(&relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .code(1);
    }

    #[test]
    fn check_applies_config_overrides() {
        let f = fixture();
        let relationships = write_temp_file(
            f.dir.path(),
            "renamed.json",
            r#"{
                "AWS::EC2::Instance": {
                    "relationships": [{ "SecurityGroups": [{ "typeName": "AWS::EC2::SecurityGroup" }] }]
                },
                "AWS::EC2::SecurityGroup": {}
            }"#,
        );
        let config = write_temp_file(
            f.dir.path(),
            "config.toml",
            r#"
[overrides."AWS::EC2::Instance"]
SecurityGroups = "SecurityGroupIds"
"#,
        );

        cmd()
            .args(["check", "--strict", "--relationships"])
            .arg(&relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("W001"));

        cmd()
            .args(["check", "--strict", "--relationships"])
            .arg(&relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .arg("--config")
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::contains("W001").not());
    }

    #[test]
    fn check_with_filter() {
        let f = fixture();
        let output = cmd()
            .args(["check", "--format", "json", "--filter", "AWS::EC2::Subnet", "--relationships"])
            .arg(&f.relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .output()
            .unwrap();
        assert!(output.status.success());

        let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(result["resources_checked"], 1);
        assert_eq!(result["results"][0]["resource"], "AWS::EC2::Subnet");
    }

    #[test]
    fn check_broken_definition_fails() {
        let f = fixture();
        write_temp_file(
            &f.schemas,
            "aws-ec2-vpc.json",
            r##"{
                "typeName": "AWS::EC2::VPC",
                "properties": { "Cidr": { "$ref": "#/definitions/Cidr" } },
                "definitions": { "Cidr": { "$ref": "#/definitions/Missing" } }
            }"##,
        );

        cmd()
            .args(["check", "--quiet", "--relationships"])
            .arg(&f.relationships)
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("E003"))
            .stdout(predicate::str::contains("AWS::EC2::Instance").not());
    }
}

#[cfg(feature = "remote")]
mod remote {
    use super::*;

    #[test]
    fn translate_relationships_from_url() {
        let f = fixture();
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/relationships.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(RELATIONSHIPS)
            .create();

        cmd()
            .args(["translate", "--relationships"])
            .arg(format!("{}/relationships.json", server.url()))
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .success()
            .stdout(predicate::str::contains("AwsEc2Instance"));
        mock.assert();
    }

    #[test]
    fn unreachable_url_exit_3() {
        let f = fixture();
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/gone.json").with_status(404).create();

        cmd()
            .args(["translate", "--relationships"])
            .arg(format!("{}/gone.json", server.url()))
            .arg("--schemas")
            .arg(&f.schemas)
            .assert()
            .code(3);
    }
}
