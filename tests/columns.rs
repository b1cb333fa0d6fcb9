use std::collections::HashSet;

use sel_terminal::columns::{partition_columns, visible_columns};
use sel_terminal::season::SeasonSelection;

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn rank_and_first_three_are_frozen() {
    let columns = cols(&["season", "team", "pts", "won", "lost", "Average"]);
    let part = partition_columns(&columns, &SeasonSelection::All);
    assert_eq!(part.frozen, cols(&["rank", "season", "team", "pts"]));
    assert_eq!(part.scrollable, cols(&["won", "lost", "Average"]));
}

#[test]
fn specific_season_hides_both_season_keys() {
    let columns = cols(&["season", "team", "Season", "pts", "won", "lost"]);
    let part = partition_columns(&columns, &SeasonSelection::Season("2023".into()));
    assert_eq!(part.frozen, cols(&["rank", "team", "pts", "won"]));
    assert_eq!(part.scrollable, cols(&["lost"]));
}

#[test]
fn unset_selection_keeps_season_columns() {
    let columns = cols(&["season", "team"]);
    assert_eq!(visible_columns(&columns, &SeasonSelection::Unset), columns);
}

#[test]
fn partition_sizes_hold_for_any_width() {
    let all = ["season", "a", "b", "c", "d", "e"];
    for n in 0..=all.len() {
        let columns = cols(&all[..n]);
        for season in [SeasonSelection::All, SeasonSelection::Season("2023".into())] {
            let visible = visible_columns(&columns, &season);
            let part = partition_columns(&columns, &season);
            assert_eq!(part.frozen.len(), 4.min(visible.len() + 1));

            let union: Vec<&str> = part.all().collect();
            let unique: HashSet<&str> = union.iter().copied().collect();
            assert_eq!(unique.len(), union.len(), "duplicates in {union:?}");

            let mut expected: HashSet<&str> = visible.iter().map(String::as_str).collect();
            expected.insert("rank");
            assert_eq!(unique, expected);
        }
    }
}

#[test]
fn data_column_named_rank_is_shadowed() {
    let columns = cols(&["rank", "team", "pts"]);
    let part = partition_columns(&columns, &SeasonSelection::All);
    assert_eq!(part.frozen, cols(&["rank", "team", "pts"]));
    assert!(part.scrollable.is_empty());
}

#[test]
fn column_lookup_spans_both_fragments() {
    let columns = cols(&["a", "b", "c", "d", "e"]);
    let part = partition_columns(&columns, &SeasonSelection::All);
    assert_eq!(part.len(), 6);
    assert_eq!(part.column_at(0), Some("rank"));
    assert_eq!(part.column_at(4), Some("d"));
    assert_eq!(part.column_at(6), None);
}
