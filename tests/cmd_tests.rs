//! End-to-end CLI tests, running the real binary against a small fixture
//! document and checking it behaves correctly rather than re-exercising unit
//! logic already covered in `src/`.

use cmd_lib::{run_cmd, run_fun};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn bin() -> String {
	env!("CARGO_BIN_EXE_gexf-render").to_string()
}

#[test]
fn inspect_reports_schema_and_snapshot_boundaries_as_json() {
	let bin = bin();
	let input = fixture("small-dynamic.gexf");
	let input = input.display();
	let output = run_fun!($bin inspect --input $input).expect("inspect should succeed on a well-formed fixture");

	let parsed: serde_json::Value = serde_json::from_str(&output).expect("inspect output must be valid JSON");
	assert_eq!(parsed["time_format"], serde_json::json!("integer"));
	assert!(parsed["attributes"].as_array().unwrap().iter().any(|a| a["title"] == "weight"));
	assert!(!parsed["snapshots"].as_array().unwrap().is_empty());
}

#[test]
fn render_writes_one_png_per_snapshot() {
	let bin = bin();
	let input = fixture("small-dynamic.gexf");
	let input = input.display();
	let out_dir = std::env::temp_dir().join(format!("gexf-render-test-{}", std::process::id()));
	std::fs::create_dir_all(&out_dir).unwrap();
	let output = out_dir.display();

	run_cmd!($bin render --input $input --output $output --width 64 --height 64).expect("render should succeed on a well-formed fixture");

	let frames: Vec<_> = std::fs::read_dir(&out_dir).unwrap().filter_map(Result::ok).filter(|e| e.path().extension().is_some_and(|x| x == "png")).collect();
	assert!(!frames.is_empty(), "render should produce at least one frame");

	std::fs::remove_dir_all(&out_dir).ok();
}

#[test]
fn dump_config_prints_toml_that_round_trips() {
	let bin = bin();
	let output = run_fun!($bin dump-config).expect("dump-config should always succeed");
	let parsed: toml::Value = toml::from_str(&output).expect("dump-config output must be valid TOML");
	assert!(parsed.get("layout").is_some());
	assert!(parsed.get("raster").is_some());
}

#[test]
fn render_rejects_a_non_dynamic_graph() {
	let bin = bin();
	let tmp = std::env::temp_dir().join(format!("gexf-render-static-{}.gexf", std::process::id()));
	std::fs::write(
		&tmp,
		r#"<?xml version="1.0"?>
<gexf version="1.3">
  <graph mode="static" defaultedgetype="undirected">
    <nodes><node id="a" label="A"/></nodes>
  </graph>
</gexf>"#,
	)
	.unwrap();
	let input = tmp.display();
	let out_dir = std::env::temp_dir().join(format!("gexf-render-static-out-{}", std::process::id()));
	let output = out_dir.display();

	let result = run_cmd!($bin render --input $input --output $output);
	assert!(result.is_err(), "a static-mode document should be rejected, not silently rendered");

	std::fs::remove_file(&tmp).ok();
}
