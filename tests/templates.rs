mod common;

use std::collections::HashSet;

use atena_label::templates::{default_template, find_template, list_templates, position_of};

#[test]
fn catalog_geometry_is_consistent() {
    let templates = list_templates();
    assert_eq!(templates.len(), 3);
    for t in templates {
        assert_eq!(t.rows * t.cols, t.total_labels, "template {}", t.code);
        assert!(t.label_width > 0.0 && t.label_height > 0.0);
    }
}

#[test]
fn catalog_order_is_stable() {
    let codes: Vec<&str> = list_templates().iter().map(|t| t.code).collect();
    assert_eq!(codes, ["28382", "28386", "28387"]);
    assert_eq!(default_template().code, "28382");
}

#[test]
fn lookup_by_code() {
    let t = find_template("28386").expect("28386 in catalog");
    assert_eq!(t.total_labels, 24);
    assert_eq!((t.rows, t.cols), (6, 4));
    assert!(find_template("99999").is_none());
}

#[test]
fn positions_follow_rows_and_columns() {
    let t = find_template("28382").unwrap();

    let first = position_of(t, 0, 0.0, 0.0);
    common::assert_close(first.x, 12.5);
    common::assert_close(first.y, 15.5);

    // cell 4 = row 1, col 1
    let p = position_of(t, 4, 0.0, 0.0);
    common::assert_close(p.x, 12.5 + 63.5 + 2.5);
    common::assert_close(p.y, 15.5 + 72.0);

    let last = position_of(t, 11, 0.0, 0.0);
    common::assert_close(last.x, 12.5 + 2.0 * 66.0);
    common::assert_close(last.y, 15.5 + 3.0 * 72.0);
}

#[test]
fn offsets_shift_every_cell() {
    let t = find_template("28387").unwrap();
    for i in 0..t.total_labels {
        let base = position_of(t, i, 0.0, 0.0);
        let shifted = position_of(t, i, 1.5, -2.0);
        common::assert_close(shifted.x - base.x, 1.5);
        common::assert_close(shifted.y - base.y, -2.0);
    }
}

#[test]
fn positions_never_collide() {
    for t in list_templates() {
        let seen: HashSet<(i64, i64)> = (0..t.total_labels)
            .map(|i| {
                let p = position_of(t, i, 0.7, -0.3);
                ((p.x * 100.0).round() as i64, (p.y * 100.0).round() as i64)
            })
            .collect();
        assert_eq!(seen.len(), t.total_labels, "template {}", t.code);
    }
}
