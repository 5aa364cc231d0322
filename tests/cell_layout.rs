mod common;

use atena_label::model::CellPosition;
use atena_label::pdf::{MM_TO_PT, PAGE_HEIGHT, TextOp, plan_cell};
use atena_label::templates::find_template;
use atena_label::{AddressRecord, LabelTemplate, SenderData};
use common::{assert_close, full_width, record};

fn template() -> LabelTemplate {
    *find_template("28382").unwrap()
}

const ORIGIN: CellPosition = CellPosition { x: 10.0, y: 20.0 };

fn top() -> f32 {
    PAGE_HEIGHT - (ORIGIN.y + 3.0) * MM_TO_PT
}

fn left() -> f32 {
    (ORIGIN.x + 3.0) * MM_TO_PT
}

fn plan(record: &AddressRecord, sender: Option<&SenderData>) -> Vec<TextOp> {
    plan_cell(record, ORIGIN, &template(), sender, &full_width)
}

#[test]
fn bare_postal_code_gets_marker_and_small_size() {
    let ops = plan(&record(&["123-4567", "東京都千代田区"], &[]), None);
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].text, "〒123-4567");
    assert_eq!(ops[0].size, 9.0);
    assert_close(ops[0].x, left());
    assert_close(ops[0].y, top());
    assert_eq!(ops[1].size, 10.0);
    assert_close(ops[0].y - ops[1].y, 5.0 * MM_TO_PT);

    let ops = plan(&record(&["1234567"], &[]), None);
    assert_eq!(ops[0].text, "〒1234567");
    assert_eq!(ops[0].size, 9.0);
}

#[test]
fn marked_postal_code_is_kept_as_is() {
    let ops = plan(&record(&["〒100-0001", "東京都"], &[]), None);
    assert_eq!(ops[0].text, "〒100-0001");
    assert_eq!(ops[0].size, 9.0);
}

#[test]
fn other_postal_shapes_are_plain_lines() {
    for line in ["1234-567", "123-45678", "１２３-４５６７", "123 4567"] {
        let ops = plan(&record(&[line], &[]), None);
        assert_eq!(ops[0].text, line);
        assert_eq!(ops[0].size, 10.0);
    }
    // Only the first address line is inspected.
    let ops = plan(&record(&["東京都", "123-4567"], &[]), None);
    assert_eq!(ops[1].text, "123-4567");
    assert_eq!(ops[1].size, 10.0);
    assert_close(ops[0].y - ops[1].y, 4.5 * MM_TO_PT);
}

#[test]
fn long_address_lines_wrap_inside_the_cell() {
    // Content width is (63.5 - 6) mm = ~163pt, i.e. 16 glyphs at 10pt.
    let long = "東京都千代田区丸の内一丁目二番三号サンプルビル十階";
    let ops = plan(&record(&[long], &[]), None);
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].text.chars().count(), 16);
    assert_eq!(format!("{}{}", ops[0].text, ops[1].text), long);
    assert_close(ops[0].y - ops[1].y, 4.5 * MM_TO_PT);
}

#[test]
fn recipient_block_follows_address_with_gap() {
    let ops = plan(&record(&["東京都"], &[("山田太郎様", false)]), None);
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[1].size, 12.0);
    assert_close(ops[0].y - ops[1].y, (4.5 + 2.0) * MM_TO_PT);
}

#[test]
fn recipient_only_record_starts_after_gap() {
    let ops = plan(&record(&[], &[("山田太郎様", false)]), None);
    assert_eq!(ops.len(), 1);
    assert_close(ops[0].y, top() - 2.0 * MM_TO_PT);
}

#[test]
fn recipient_breaks_split_segments() {
    let ops = plan(
        &record(
            &[],
            &[("株式会社サンプル", true), ("営業部", false), ("山田太郎様", false)],
        ),
        None,
    );
    let texts: Vec<&str> = ops.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, ["株式会社サンプル", "営業部山田太郎様"]);
    assert_close(ops[0].y - ops[1].y, 5.0 * MM_TO_PT);
}

#[test]
fn unknown_breaks_join_everything() {
    let mut rec = record(&[], &[("株式会社", true), ("山田様", false)]);
    rec.recipient_breaks_known = false;
    let ops = plan(&rec, None);
    let texts: Vec<&str> = ops.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, ["株式会社山田様"]);
}

#[test]
fn long_recipient_keeps_honorific_attached() {
    // 13 glyphs at 12pt fit in ~163pt, 14 do not.
    let ops = plan(&record(&[], &[("有限会社サンプル商事佐々木様", false)]), None);
    let texts: Vec<&str> = ops.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, ["有限会社サンプル商事佐々木", "様"]);
}

#[test]
fn empty_record_draws_nothing() {
    assert!(plan(&AddressRecord::default(), None).is_empty());
}

#[test]
fn sender_block_is_right_aligned_at_the_bottom() {
    let t = template();
    let sender = SenderData {
        postal_code: "150-0001".into(),
        address: "東京都渋谷区".into(),
        name: "差出人".into(),
    };
    let ops = plan(&record(&[], &[("山田様", false)]), Some(&sender));
    let sender_ops: Vec<&TextOp> = ops.iter().filter(|o| o.size == 7.0).collect();
    assert_eq!(sender_ops.len(), 3);

    let texts: Vec<&str> = sender_ops.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, ["〒150-0001", "東京都渋谷区", "差出人"]);

    let right = (ORIGIN.x + t.label_width - 3.0) * MM_TO_PT;
    for op in &sender_ops {
        assert_close(op.x + full_width(&op.text, 7.0), right);
    }
    let first_y = PAGE_HEIGHT - (ORIGIN.y + t.label_height - 3.0 - 12.0) * MM_TO_PT;
    assert_close(sender_ops[0].y, first_y);
    assert_close(sender_ops[0].y - sender_ops[1].y, 3.0 * MM_TO_PT);
    assert_close(sender_ops[1].y - sender_ops[2].y, 3.0 * MM_TO_PT);
}

#[test]
fn sender_lines_are_optional_but_name_is_not() {
    let name_only = SenderData {
        name: "差出人".into(),
        ..Default::default()
    };
    let ops = plan(&record(&[], &[]), Some(&name_only));
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].text, "差出人");

    let no_name = SenderData {
        postal_code: "150-0001".into(),
        address: "東京都".into(),
        name: String::new(),
    };
    assert!(plan(&record(&[], &[]), Some(&no_name)).is_empty());
}
