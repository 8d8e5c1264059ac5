//! Tests for the flattened, glyph-decorated traversal

use rstest::{fixture, rstest};
use serde_json::{json, Value};

use treelist::util::testing;
use treelist::{Markers, Record, RecordId, TreeBuilder};

// 1 A
// ├── 3 C
// │   ├── 6 F
// │   └── 7 G
// └── 4 D
// 2 B
// └── 5 E
#[fixture]
fn menu() -> Value {
    testing::init_test_setup();
    json!({
        "1": {"id": "1", "parentid": 0, "name": "A"},
        "2": {"id": "2", "parentid": 0, "name": "B"},
        "3": {"id": "3", "parentid": 1, "name": "C"},
        "4": {"id": "4", "parentid": 1, "name": "D"},
        "5": {"id": "5", "parentid": 2, "name": "E"},
        "6": {"id": "6", "parentid": 3, "name": "F"},
        "7": {"id": "7", "parentid": 3, "name": "G"},
    })
}

fn builder_for(source: &Value) -> TreeBuilder {
    let mut builder = TreeBuilder::new();
    builder.set_source_value(source);
    builder
}

fn labels(rows: &[Record]) -> Vec<String> {
    rows.iter()
        .map(|row| row["spacer_name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn given_three_records_when_flattening_with_defaults_then_top_level_has_no_glyph() {
    testing::init_test_setup();
    let source = json!({
        "1": {"parentid": 0, "name": "A"},
        "2": {"parentid": 0, "name": "B"},
        "3": {"parentid": 1, "name": "C"},
    });
    let mut builder = builder_for(&source);

    builder.build_flat_list(&RecordId::root(), "");

    assert_eq!(labels(builder.result()), vec!["A", "&nbsp;└C", "B"]);
}

#[rstest]
fn given_three_levels_when_flattening_then_draws_tree(menu: Value) {
    let mut builder = builder_for(&menu);

    builder.set_indent_token(" ").build_flat_list_from_root();

    assert_eq!(
        labels(builder.result()),
        vec!["A", " ├C", " │ ├F", " │ └G", " └D", "B", " └E"]
    );
}

#[rstest]
fn given_html_markers_when_flattening_then_glyphs_carry_em_space(menu: Value) {
    let mut builder = builder_for(&menu);

    builder
        .set_markers(Markers::html())
        .build_flat_list_from_root();

    let names = labels(builder.result());
    assert_eq!(names[1], "&nbsp;&emsp;├C");
    assert_eq!(names[2], "&nbsp;&emsp;│&nbsp;&emsp;├F");
    assert_eq!(names[4], "&nbsp;&emsp;└D");
}

#[rstest]
fn given_marker_array_when_flattening_then_uses_custom_glyphs(menu: Value) {
    let mut builder = builder_for(&menu);

    builder
        .set_markers(["|", "+-", "`-"])
        .set_indent_token("  ")
        .build_flat_list_from_root();

    assert_eq!(
        labels(builder.result()),
        vec!["A", "  +-C", "  |  +-F", "  |  `-G", "  `-D", "B", "  `-E"]
    );
}

#[rstest]
fn given_flat_list_when_built_then_rows_keep_all_fields(menu: Value) {
    let mut builder = builder_for(&menu);

    builder.build_flat_list_from_root();

    let first = &builder.result()[0];
    assert_eq!(first["id"], json!("1"));
    assert_eq!(first["parentid"], json!(0));
    assert_eq!(first["name"], json!("A"));
    assert!(!first.contains_key("child"));
}

#[test]
fn given_nameless_siblings_when_flattening_then_last_named_sibling_gets_last_glyph() {
    let source = json!({
        "1": {"parentid": 0, "name": "A"},
        "2": {"parentid": 1, "name": "B"},
        "3": {"parentid": 1},
        "4": {"parentid": 1, "name": null},
    });
    let mut builder = builder_for(&source);

    builder.set_indent_token(" ").build_flat_list_from_root();

    assert_eq!(labels(builder.result()), vec!["A", " └B"]);
}

#[test]
fn given_nameless_record_when_flattening_then_its_descendants_are_not_visited() {
    let source = json!({
        "1": {"parentid": 0, "name": "A"},
        "2": {"parentid": 0},
        "3": {"parentid": 2, "name": "hidden child"},
        "4": {"parentid": 3, "name": "hidden grandchild"},
    });
    let mut builder = builder_for(&source);

    builder.build_flat_list_from_root();

    assert_eq!(labels(builder.result()), vec!["A"]);
}

#[test]
fn given_siblings_in_input_order_when_flattening_then_order_is_kept() {
    let source = json!({
        "30": {"parentid": 0, "name": "c"},
        "10": {"parentid": 0, "name": "a"},
        "20": {"parentid": 0, "name": "b"},
    });
    let mut builder = builder_for(&source);

    builder.build_flat_list_from_root();

    assert_eq!(labels(builder.result()), vec!["c", "a", "b"]);
}

#[rstest]
fn given_subtree_parent_when_flattening_then_starts_below_it(menu: Value) {
    let mut builder = builder_for(&menu);

    builder
        .set_indent_token(" ")
        .build_flat_list(&RecordId::from(1), "");

    assert_eq!(labels(builder.result()), vec!["C", " ├F", " └G", "D"]);
}

#[rstest]
fn given_initial_prefix_when_flattening_then_top_level_is_decorated(menu: Value) {
    let mut builder = builder_for(&menu);

    builder
        .set_indent_token(" ")
        .build_flat_list(&RecordId::root(), ">");

    let names = labels(builder.result());
    assert_eq!(names[0], ">├A");
    assert_eq!(names[1], ">│ ├C");
    assert_eq!(names[5], ">└B");
    assert_eq!(names[6], "> └E");
}

#[rstest]
fn given_previous_result_when_flattening_again_then_buffer_is_replaced(menu: Value) {
    let mut builder = builder_for(&menu);

    builder.build_flat_list_from_root();
    builder.build_flat_list_from_root();

    assert_eq!(builder.result().len(), 7);
}

#[rstest]
fn given_result_when_source_replaced_then_buffer_is_cleared(menu: Value) {
    let mut builder = builder_for(&menu);
    builder.build_flat_list_from_root();

    builder.set_source_value(&menu);

    assert!(builder.result().is_empty());
}

#[rstest]
#[case::fresh(false)]
#[case::after_build(true)]
fn given_any_state_when_reset_then_result_is_empty(menu: Value, #[case] built: bool) {
    let mut builder = builder_for(&menu);
    if built {
        builder.build_flat_list_from_root();
    }

    builder.reset_result();

    assert!(builder.result().is_empty());
}

#[rstest]
fn given_result_when_taken_then_buffer_is_empty(menu: Value) {
    let mut builder = builder_for(&menu);
    builder.build_flat_list_from_root();

    let rows = builder.take_result();

    assert_eq!(rows.len(), 7);
    assert!(builder.result().is_empty());
}

#[rstest]
fn given_builder_when_flatten_called_then_buffer_untouched(menu: Value) {
    let mut builder = builder_for(&menu);
    builder.build_flat_list(&RecordId::from(2), "");

    let rows = builder.flatten(&RecordId::root());

    assert_eq!(rows.len(), 7);
    assert_eq!(labels(builder.result()), vec!["E"]);
}

#[test]
fn given_custom_fields_when_flattening_then_reads_and_writes_them() {
    let source = json!({
        "a": {"pid": "root", "title": "Top"},
        "b": {"pid": "a", "title": "Nested"},
    });
    let mut builder = TreeBuilder::new();
    builder
        .set_parent_field("pid")
        .set_name_field("title")
        .set_spacer_field("label")
        .set_root("root")
        .set_indent_token("-")
        .set_source_value(&source)
        .build_flat_list_from_root();

    let column = builder.result_column("label", None);
    assert_eq!(column["0"], json!("Top"));
    assert_eq!(column["1"], json!("-└Nested"));
}

#[test]
fn given_numeric_name_when_flattening_then_label_uses_its_text() {
    let source = json!({"1": {"parentid": 0, "name": 42}});
    let mut builder = builder_for(&source);

    builder.build_flat_list_from_root();

    assert_eq!(labels(builder.result()), vec!["42"]);
}

#[rstest]
#[case::empty_parent_field("parentid", "")]
#[case::unknown_parent_field("parentid", "no_such_field")]
#[case::unknown_name_field("name", "no_such_field")]
fn given_misconfigured_field_when_flattening_then_result_is_empty(
    menu: Value,
    #[case] which: &str,
    #[case] value: &str,
) {
    let mut builder = builder_for(&menu);
    match which {
        "parentid" => builder.set_parent_field(value),
        _ => builder.set_name_field(value),
    };

    builder.build_flat_list_from_root();

    assert!(builder.result().is_empty());
}

#[test]
fn given_non_collection_source_when_flattening_then_result_is_empty() {
    let mut builder = builder_for(&json!("not records"));

    builder.build_flat_list_from_root();

    assert!(builder.result().is_empty());
}

#[test]
fn given_loose_parent_values_when_flattening_then_all_attach() {
    let source = json!({
        "1": {"parentid": "0", "name": "A"},
        "2": {"parentid": 1.0, "name": "B"},
        "3": {"parentid": "01", "name": "C"},
    });
    let mut builder = builder_for(&source);

    builder.set_indent_token(" ").build_flat_list_from_root();

    assert_eq!(labels(builder.result()), vec!["A", " ├B", " └C"]);
}

// ============================================================
// result_column
// ============================================================

#[rstest]
fn given_result_when_projecting_without_key_then_keys_are_positions(menu: Value) {
    let mut builder = builder_for(&menu);
    builder.set_indent_token(" ").build_flat_list_from_root();

    let column = builder.result_column("name", None);

    let keys: Vec<_> = column.keys().cloned().collect();
    assert_eq!(keys, vec!["0", "1", "2", "3", "4", "5", "6"]);
    assert_eq!(column["2"], json!("F"));
}

#[rstest]
fn given_result_when_projecting_by_key_field_then_keys_are_field_values(menu: Value) {
    let mut builder = builder_for(&menu);
    builder.set_indent_token(" ").build_flat_list_from_root();

    let column = builder.result_column("spacer_name", Some("id"));

    let keys: Vec<_> = column.keys().cloned().collect();
    assert_eq!(keys, vec!["1", "3", "6", "7", "4", "2", "5"]);
    assert_eq!(column["7"], json!(" │ └G"));
}

#[test]
fn given_rows_missing_fields_when_projecting_then_nulls_and_position_keys() {
    let source = json!({
        "1": {"parentid": 0, "name": "A", "code": "a"},
        "2": {"parentid": 0, "name": "B"},
    });
    let mut builder = builder_for(&source);
    builder.build_flat_list_from_root();

    let column = builder.result_column("color", Some("code"));

    assert_eq!(column["a"], Value::Null);
    assert_eq!(column["1"], Value::Null);
    assert_eq!(column.len(), 2);
}

#[rstest]
fn given_empty_key_field_when_projecting_then_uses_positions(menu: Value) {
    let mut builder = builder_for(&menu);
    builder.build_flat_list_from_root();

    let column = builder.result_column("name", Some(""));

    assert_eq!(column["0"], json!("A"));
}

#[test]
fn given_duplicate_keys_when_projecting_then_later_row_wins() {
    let source = json!({
        "1": {"parentid": 0, "name": "A", "group": "x"},
        "2": {"parentid": 0, "name": "B", "group": "x"},
    });
    let mut builder = builder_for(&source);
    builder.build_flat_list_from_root();

    let column = builder.result_column("name", Some("group"));

    assert_eq!(column.len(), 1);
    assert_eq!(column["x"], json!("B"));
}
