use crate::model::{AddressRecord, LabelTemplate};

/// Where one record lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement<'a> {
    pub page_index: usize,
    pub cell_index: usize,
    pub record: &'a AddressRecord,
}

/// Number of sheets needed for `record_count` records starting at the 1-based
/// absolute position `start_position`. Zero records never produce a page.
/// Saturates instead of overflowing for positions near `usize::MAX`.
pub fn page_count(record_count: usize, total_labels: usize, start_position: usize) -> usize {
    if record_count == 0 || total_labels == 0 {
        return 0;
    }
    // 0-based index of the last filled cell
    let last = (start_position.max(1) - 1).saturating_add(record_count - 1);
    (last / total_labels).saturating_add(1)
}

/// Assign each record, in order, to consecutive cells beginning at
/// `start_position`. Cells before it stay empty; trailing cells on the last
/// page stay empty.
pub fn paginate<'a>(
    records: &'a [AddressRecord],
    template: &LabelTemplate,
    start_position: usize,
) -> Vec<Placement<'a>> {
    let total = template.total_labels;
    if total == 0 {
        return Vec::new();
    }
    let first = start_position.max(1) - 1;
    let (first_page, first_cell) = (first / total, first % total);

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let cell = first_cell + i;
            Placement {
                page_index: first_page.saturating_add(cell / total),
                cell_index: cell % total,
                record,
            }
        })
        .collect()
}
