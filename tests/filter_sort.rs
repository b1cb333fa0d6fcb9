use sel_terminal::filter::filter_rows;
use sel_terminal::row::{Cell, Row};
use sel_terminal::season::{SeasonSelection, extract_seasons, season_of};
use sel_terminal::sort::{SortDirection, SortState, sort_rows};

fn stat_row(season: &str, team: &str, pts: i64) -> Row {
    Row::from_pairs([
        ("season", Cell::from(season)),
        ("team", Cell::from(team)),
        ("pts", Cell::from(pts)),
    ])
}

fn scenario_rows() -> Vec<Row> {
    vec![stat_row("2023", "A", 10), stat_row("2022", "B", 20)]
}

fn teams(rows: &[&Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get("team").and_then(Cell::as_text).unwrap_or_default())
        .collect()
}

#[test]
fn scenario_a_default_season_filters_to_latest() {
    let rows = scenario_rows();
    let seasons = extract_seasons(&rows);
    assert_eq!(seasons, vec!["2023", "2022"]);

    let selected = SeasonSelection::Season(seasons[0].clone());
    let out = filter_rows(&rows, &selected, "");
    assert_eq!(out, vec![&rows[0]]);
}

#[test]
fn scenario_b_search_is_case_insensitive_across_seasons() {
    let rows = scenario_rows();
    let out = filter_rows(&rows, &SeasonSelection::All, "b");
    assert_eq!(out, vec![&rows[1]]);
}

#[test]
fn search_term_is_trimmed_and_blank_means_no_filter() {
    let rows = scenario_rows();
    assert_eq!(filter_rows(&rows, &SeasonSelection::All, "  b ").len(), 1);
    assert_eq!(filter_rows(&rows, &SeasonSelection::All, "   ").len(), 2);
}

#[test]
fn search_matches_stringified_numbers_and_skips_nulls() {
    let rows = vec![
        Row::from_pairs([("team", Cell::from("A")), ("coach", Cell::Null)]),
        Row::from_pairs([("team", Cell::from("B")), ("pts", Cell::from(120i64))]),
    ];
    let out = filter_rows(&rows, &SeasonSelection::All, "12");
    assert_eq!(teams(&out), vec!["B"]);
    assert!(filter_rows(&rows, &SeasonSelection::All, "null").is_empty());
}

#[test]
fn season_filter_uses_fallback_key() {
    let rows = vec![
        Row::from_pairs([("Season", Cell::from("2021")), ("team", Cell::from("X"))]),
        Row::from_pairs([("season", Cell::from("2021")), ("team", Cell::from("Y"))]),
        Row::from_pairs([("season", Cell::from(2021i64)), ("team", Cell::from("Z"))]),
    ];
    let out = filter_rows(&rows, &SeasonSelection::Season("2021".into()), "");
    assert_eq!(teams(&out), vec!["X", "Y", "Z"]);
}

#[test]
fn season_then_search_equals_combined_filter() {
    let rows = vec![
        stat_row("2023", "Alpha", 1),
        stat_row("2023", "Beta", 2),
        stat_row("2022", "Alpine", 3),
        stat_row("2022", "Gamma", 4),
    ];
    for season in [
        SeasonSelection::All,
        SeasonSelection::Unset,
        SeasonSelection::Season("2023".into()),
        SeasonSelection::Season("1999".into()),
    ] {
        for term in ["", "al", "ALP", "4", "zzz"] {
            let staged = filter_rows(
                filter_rows(&rows, &season, ""),
                &SeasonSelection::All,
                term,
            );
            assert_eq!(staged, filter_rows(&rows, &season, term), "{season:?} {term:?}");
        }
    }
}

#[test]
fn empty_input_is_fine() {
    let rows: Vec<Row> = Vec::new();
    assert!(filter_rows(&rows, &SeasonSelection::Season("2023".into()), "x").is_empty());
    assert!(sort_rows(&[], Some("pts"), SortDirection::Descending).is_empty());
    assert!(extract_seasons(&rows).is_empty());
}

#[test]
fn scenario_c_three_clicks_cycle_back_to_filter_order() {
    let rows = vec![stat_row("2023", "A", 30), stat_row("2023", "B", 10), stat_row("2023", "C", 20)];
    let filtered = filter_rows(&rows, &SeasonSelection::All, "");
    let mut sort = SortState::default();

    assert!(sort.request("pts"));
    assert_eq!(sort.direction, SortDirection::Ascending);
    let (key, dir) = sort.active().unwrap();
    assert_eq!(teams(&sort_rows(&filtered, Some(key), dir)), vec!["B", "C", "A"]);

    sort.request("pts");
    assert_eq!(sort.direction, SortDirection::Descending);
    let (key, dir) = sort.active().unwrap();
    assert_eq!(teams(&sort_rows(&filtered, Some(key), dir)), vec!["A", "C", "B"]);

    sort.request("pts");
    assert_eq!(sort.direction, SortDirection::None);
    assert!(sort.active().is_none());
    assert_eq!(
        teams(&sort_rows(&filtered, sort.key.as_deref(), sort.direction)),
        vec!["A", "B", "C"]
    );

    sort.request("pts");
    assert_eq!(sort.direction, SortDirection::Ascending);
}

#[test]
fn switching_key_restarts_ascending() {
    let mut sort = SortState::default();
    sort.request("pts");
    sort.request("pts");
    sort.request("team");
    assert_eq!(sort.key.as_deref(), Some("team"));
    assert_eq!(sort.direction, SortDirection::Ascending);
}

#[test]
fn rank_sort_requests_change_nothing() {
    let mut sort = SortState::default();
    sort.request("pts");
    let before = sort.clone();
    assert!(!sort.request("rank"));
    assert_eq!(sort, before);
}

#[test]
fn descending_reverses_ascending_for_distinct_keys() {
    let rows = vec![
        stat_row("2023", "delta", 4),
        stat_row("2023", "Alpha", 1),
        stat_row("2023", "charlie", 3),
        stat_row("2023", "Bravo", 2),
    ];
    let input: Vec<&Row> = rows.iter().collect();
    let asc = sort_rows(&input, Some("team"), SortDirection::Ascending);
    assert_eq!(teams(&asc), vec!["Alpha", "Bravo", "charlie", "delta"]);
    let desc = sort_rows(&asc, Some("team"), SortDirection::Descending);
    let mut reversed = asc.clone();
    reversed.reverse();
    assert_eq!(desc, reversed);
}

#[test]
fn unsorted_direction_and_missing_key_are_identity() {
    let rows = scenario_rows();
    let input: Vec<&Row> = rows.iter().collect();
    assert_eq!(sort_rows(&input, Some("pts"), SortDirection::None), input);
    assert_eq!(sort_rows(&input, None, SortDirection::Ascending), input);
}

#[test]
fn numbers_sort_numerically_strings_lexically() {
    let rows = vec![
        Row::from_pairs([("v", Cell::from(100i64))]),
        Row::from_pairs([("v", Cell::from(9i64))]),
        Row::from_pairs([("v", Cell::from("100"))]),
        Row::from_pairs([("v", Cell::from("9"))]),
    ];
    let nums: Vec<&Row> = rows[..2].iter().collect();
    let out = sort_rows(&nums, Some("v"), SortDirection::Ascending);
    assert_eq!(out[0].get("v"), Some(&Cell::Number(9.0)));

    let texts: Vec<&Row> = rows[2..].iter().collect();
    let out = sort_rows(&texts, Some("v"), SortDirection::Ascending);
    assert_eq!(out[0].get("v"), Some(&Cell::from("100")));
}

#[test]
fn mixed_and_missing_values_do_not_panic() {
    let rows = vec![
        Row::from_pairs([("v", Cell::from(3i64))]),
        Row::from_pairs([("v", Cell::from("b"))]),
        Row::from_pairs([("v", Cell::Null)]),
        Row::new(),
        Row::from_pairs([("v", Cell::Number(f64::NAN))]),
        Row::from_pairs([("v", Cell::from(1i64))]),
        Row::from_pairs([("v", Cell::from("A"))]),
        Row::from_pairs([("v", Cell::Bool(true))]),
    ];
    let input: Vec<&Row> = rows.iter().collect();
    for dir in [SortDirection::Ascending, SortDirection::Descending] {
        let out = sort_rows(&input, Some("v"), dir);
        assert_eq!(out.len(), rows.len());
    }
}

#[test]
fn equal_values_keep_input_order_both_directions() {
    let rows = vec![stat_row("2023", "first", 5), stat_row("2023", "second", 5)];
    let input: Vec<&Row> = rows.iter().collect();
    assert_eq!(
        teams(&sort_rows(&input, Some("pts"), SortDirection::Ascending)),
        vec!["first", "second"]
    );
    assert_eq!(
        teams(&sort_rows(&input, Some("pts"), SortDirection::Descending)),
        vec!["first", "second"]
    );
}

#[test]
fn season_lookup_skips_empty_primary_key() {
    let row = Row::from_pairs([("season", Cell::from("")), ("Season", Cell::from("2020"))]);
    assert_eq!(season_of(&row).as_deref(), Some("2020"));
    let row = Row::from_pairs([("season", Cell::Null)]);
    assert_eq!(season_of(&row), None);
    let row = Row::from_pairs([("season", Cell::from(0i64))]);
    assert_eq!(season_of(&row).as_deref(), Some("0"));
}

#[test]
fn seasons_sort_as_plain_strings_descending() {
    let rows: Vec<Row> = ["9", "10", "2023-24", "2023", "10", "9"]
        .iter()
        .map(|season| stat_row(season, "T", 0))
        .collect();
    let seasons = extract_seasons(&rows);
    assert_eq!(seasons, vec!["9", "2023-24", "2023", "10"]);

    let again: Vec<Row> = seasons.iter().map(|season| stat_row(season, "T", 0)).collect();
    assert_eq!(extract_seasons(&again), seasons);
}
