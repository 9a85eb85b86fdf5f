use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn cli(dir: &assert_fs::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("site_area_cli").unwrap();
    cmd.env_remove("SITE_AREA_DB")
        .env_remove("SITE_AREA_LOG")
        .arg("--db")
        .arg(dir.child("areas.db").path());
    cmd
}

const CIRCLE: &str = r#"{"type":"circle","center":{"lat":45.0,"lng":-93.0},"radius":100.0}"#;

#[test]
fn circle_area_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    cli(&dir)
        .args(["circle-area", "45.0", "-93.0", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Area: 338157.89 sq ft"))
        .stdout(predicate::str::contains("Square meters: 31415.93"));
}

#[test]
fn rectangle_area_in_hectares() {
    let dir = assert_fs::TempDir::new().unwrap();
    cli(&dir)
        .args(["--unit", "hectares", "rectangle-area", "0.001", "0", "0.001", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Area: 1.2392 hectares"));
}

#[test]
fn inverted_rectangle_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    cli(&dir)
        .args(["rectangle-area", "0", "1", "1", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rectangle"));
}

#[test]
fn polygon_area_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("lot.csv");
    file.write_str("0.001,0\n0.001,0.001\n0,0.001\n0,0\n").unwrap();
    cli(&dir)
        .args(["--unit", "sqm", "polygon-area", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Area: 12392.03 sq m"));
    cli(&dir)
        .args(["--unit", "sqm", "--planar", "polygon-area", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Area: 12392.14 sq m"));
}

#[test]
fn convert_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    cli(&dir)
        .args(["convert", "1", "hectares", "sqm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 hectares = 10000.00 sq m"));
    cli(&dir)
        .args(["convert", "1", "hectares", "furlongs"])
        .assert()
        .failure();
}

#[test]
fn save_list_load_delete() {
    let dir = assert_fs::TempDir::new().unwrap();
    let shape = dir.child("pond.json");
    shape.write_str(CIRCLE).unwrap();
    let shape_path = shape.path().to_str().unwrap();

    cli(&dir)
        .args(["save", shape_path, "--name", "Pond", "--job", "3", "--customer", "2", "--user", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved area 1: 338157.89 sq ft"));

    cli(&dir)
        .args(["list", "--user", "1", "--job", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pond"));

    cli(&dir)
        .args(["list", "--user", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pond").not());

    cli(&dir)
        .args(["--unit", "acres", "load", "1", "--user", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Area: 7.7630 acres"));

    cli(&dir)
        .args(["delete", "1", "--user", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted area 1"));

    cli(&dir)
        .args(["load", "1", "--user", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No area 1"));
    dir.close().unwrap();
}

#[test]
fn save_without_job_is_rejected() {
    let dir = assert_fs::TempDir::new().unwrap();
    let shape = dir.child("pond.json");
    shape.write_str(CIRCLE).unwrap();
    cli(&dir)
        .args(["save", shape.path().to_str().unwrap(), "--name", "Pond", "--user", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("select a job"));
}

#[test]
fn malformed_shape_file() {
    let dir = assert_fs::TempDir::new().unwrap();
    let shape = dir.child("bad.json");
    shape.write_str(r#"{"center":{"lat":1,"lng":2}}"#).unwrap();
    cli(&dir)
        .args(["shape-area", shape.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing `type`"));
}

#[test]
fn export_geojson_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("pond.json");
    input.write_str(CIRCLE).unwrap();
    let output = dir.child("pond.geojson");

    cli(&dir)
        .args([
            "export-geojson",
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
            "--name",
            "Pond",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    output.assert(predicate::path::exists());
    output.assert(predicate::str::contains("FeatureCollection"));
    dir.close().unwrap();
}

#[test]
fn material_command_reads_legacy_dimensions() {
    let dir = assert_fs::TempDir::new().unwrap();
    cli(&dir)
        .args(["material", "Plywood sheathing", "--dimensions", r#"{"thickness":0.75,"length":8}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("Type: lumber"))
        .stdout(predicate::str::contains(
            "Dimensions: thickness: 0.75 inches, length: 8 feet",
        ));
}
