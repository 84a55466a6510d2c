//! Integration tests for the diff command

use crate::common::{assertions, sample_data, CliTestRunner};
use tablediff::cli::{Cli, Commands};
use tablediff::commands::diff_command;

fn setup(runner: &CliTestRunner) -> (String, String) {
    let fixture = runner.fixture();
    let t1 = fixture.create_csv("v1.csv", &sample_data::products_v1()).unwrap();
    let t2 = fixture.create_csv("v2.csv", &sample_data::products_v2()).unwrap();
    (
        t1.to_string_lossy().into_owned(),
        t2.to_string_lossy().into_owned(),
    )
}

#[test]
fn test_diff_to_csv_file() {
    let runner = CliTestRunner::new().unwrap();
    let (t1, t2) = setup(&runner);
    let out = runner.fixture().path("out.csv");

    runner.expect_success(&[
        "diff",
        t1.as_str(),
        t2.as_str(),
        "--key",
        "id",
        "--output",
        out.to_str().unwrap(),
        "--no-progress",
    ]);

    assertions::assert_file_exists_and_not_empty(&out);
    assert_eq!(
        runner.fixture().read("out.csv"),
        "id,name,price\n1,Apple,1.50\n2,Banana,0.75\n3,Cherry,2.00\n4,Date,3.00\n"
    );
}

#[test]
fn test_diff_with_mark_column_and_details() {
    let runner = CliTestRunner::new().unwrap();
    let (t1, t2) = setup(&runner);
    let out = runner.fixture().path("out.csv");

    runner.expect_success(&[
        "diff",
        t1.as_str(),
        t2.as_str(),
        "--key",
        "id",
        "--output",
        out.to_str().unwrap(),
        "--mark-column",
        "DIFF",
        "--show-change-details",
        "--sort-lines",
        "--no-progress",
    ]);

    assert_eq!(
        runner.fixture().read("out.csv"),
        "id,name,price,DIFF\n\
         1,Apple,1.50 -> 1.60,CHANGED\n\
         2,Banana,0.75,\n\
         3,Cherry,2.00,REMOVED\n\
         4,Date,3.00,ADDED\n"
    );
}

#[test]
fn test_diff_synthesis_to_separate_file() {
    let runner = CliTestRunner::new().unwrap();
    let (t1, t2) = setup(&runner);
    let out = runner.fixture().path("out.csv");
    let summary = runner.fixture().path("summary.csv");

    runner.expect_success(&[
        "diff",
        t1.as_str(),
        t2.as_str(),
        "-k",
        "id",
        "-o",
        out.to_str().unwrap(),
        "--synthesis-output",
        summary.to_str().unwrap(),
        "--suppress-unchanged",
        "--no-progress",
    ]);

    let rows = runner.fixture().read("out.csv");
    assert!(!rows.contains("Banana"), "unchanged row should be suppressed");
    assert!(!rows.contains("STATUS"), "synthesis belongs in its own file");

    assert_eq!(
        runner.fixture().read("summary.csv"),
        "STATUS,COUNT\nUNCHANGED,1\nCHANGED,1\nADDED,1\nREMOVED,1\nTABLE1_ROWS,3\nTABLE2_ROWS,3\n"
    );
}

#[test]
fn test_diff_to_json_file() {
    let runner = CliTestRunner::new().unwrap();
    let (t1, t2) = setup(&runner);
    let out = runner.fixture().path("out.json");

    runner.expect_success(&[
        "diff",
        t1.as_str(),
        t2.as_str(),
        "--key",
        "id",
        "--output",
        out.to_str().unwrap(),
        "--show-change-details",
        "--synthesis",
        "--no-progress",
    ]);

    let json: serde_json::Value = serde_json::from_str(&runner.fixture().read("out.json")).unwrap();
    assert_eq!(json["header"], serde_json::json!(["id", "name", "price"]));
    assert_eq!(json["rows"].as_array().unwrap().len(), 4);
    assert_eq!(json["rows"][0]["status"], "CHANGED");
    assert_eq!(json["rows"][0]["cells"]["price"]["old"], "1.50");
    assert_eq!(json["rows"][0]["cells"]["price"]["new"], "1.60");
    assert_eq!(json["rows"][1]["status"], "UNCHANGED");
    assert!(json["rows"][1].get("mark").is_none());
    assert_eq!(json["synthesis"]["removed"], 1);
    assert_eq!(json["synthesis"]["table1_rows"], 3);
}

#[test]
fn test_diff_tsv_inputs() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let t1 = fixture.create_csv_raw("a.tsv", "id\tv\n1\tx, y\n").unwrap();
    let t2 = fixture.create_csv_raw("b.tsv", "id\tv\n1\tx, z\n").unwrap();
    let out = fixture.path("out.csv");

    runner.expect_success(&[
        "diff",
        t1.to_str().unwrap(),
        t2.to_str().unwrap(),
        "--key",
        "id",
        "--output",
        out.to_str().unwrap(),
        "--mark-column",
        "M",
        "--no-progress",
    ]);

    assert_eq!(fixture.read("out.csv"), "id,v,M\n1,\"x, y\",CHANGED\n");
}

#[test]
fn test_diff_output_is_deterministic() {
    let runner = CliTestRunner::new().unwrap();
    let fixture = runner.fixture();
    let t1 = fixture
        .create_keyed_csv("big1.csv", 500, |i| Some(format!("v{}", i)))
        .unwrap();
    let t2 = fixture
        .create_keyed_csv("big2.csv", 600, |i| match i % 7 {
            0 => None,
            3 => Some(format!("changed{}", i)),
            _ => Some(format!("v{}", i)),
        })
        .unwrap();

    let mut outputs = Vec::new();
    for name in ["run1.csv", "run2.csv"] {
        let out = fixture.path(name);
        runner.expect_success(&[
            "diff",
            t1.to_str().unwrap(),
            t2.to_str().unwrap(),
            "--key",
            "id",
            "--output",
            out.to_str().unwrap(),
            "--synthesis",
            "--mark-column",
            "DIFF",
            "--no-progress",
        ]);
        outputs.push(fixture.read(name));
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_diff_command_returns_synthesis() {
    use clap::Parser;

    let runner = CliTestRunner::new().unwrap();
    let (t1, t2) = setup(&runner);
    let out = runner.fixture().path("out.csv");

    let cli = Cli::try_parse_from([
        "tablediff",
        "diff",
        t1.as_str(),
        t2.as_str(),
        "--key",
        "id",
        "--output",
        out.to_str().unwrap(),
        "--no-progress",
    ])
    .unwrap();
    let Commands::Diff(args) = cli.command else {
        panic!("Expected Diff command");
    };

    let synthesis = diff_command(&args).unwrap();
    assertions::assert_complete(&synthesis, 3, 3);
    assert_eq!(synthesis.changed, 1);
    assert_eq!(synthesis.added, 1);
    assert_eq!(synthesis.removed, 1);
}

#[test]
fn test_json_output_with_synthesis_file() {
    let runner = CliTestRunner::new().unwrap();
    let (t1, t2) = setup(&runner);
    let out = runner.fixture().path("out.json");
    let summary = runner.fixture().path("summary.csv");

    runner.expect_success(&[
        "diff",
        t1.as_str(),
        t2.as_str(),
        "--key",
        "id",
        "--output",
        out.to_str().unwrap(),
        "--synthesis-output",
        summary.to_str().unwrap(),
        "--no-progress",
    ]);

    let json: serde_json::Value = serde_json::from_str(&runner.fixture().read("out.json")).unwrap();
    assert_eq!(json["rows"].as_array().unwrap().len(), 4);
    assert!(json.get("synthesis").is_none(), "synthesis belongs in its own file");
    assert_eq!(
        runner.fixture().read("summary.csv"),
        "STATUS,COUNT\nUNCHANGED,1\nCHANGED,1\nADDED,1\nREMOVED,1\nTABLE1_ROWS,3\nTABLE2_ROWS,3\n"
    );
}

#[test]
fn test_pretty_output_file_has_no_colors() {
    let runner = CliTestRunner::new().unwrap();
    let (t1, t2) = setup(&runner);
    let out = runner.fixture().path("out.txt");

    runner.expect_success(&[
        "diff",
        t1.as_str(),
        t2.as_str(),
        "--key",
        "id",
        "--output",
        out.to_str().unwrap(),
        "--format",
        "pretty",
        "--synthesis",
        "--no-progress",
    ]);

    let text = runner.fixture().read("out.txt");
    assert!(!text.contains('\u{1b}'), "files never get ANSI escapes");
    assert!(text.contains("- 3  │ Cherry │ 2.00"));
    assert!(text.contains("├─ Removed: 1"));
}
