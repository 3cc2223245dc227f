use super::*;

fn tag(name: &str) -> CategoryTag {
    CategoryTag::from(name)
}

fn ids(arrangement: &Arrangement) -> Vec<&str> {
    arrangement.order().into_iter().map(RowId::as_str).collect()
}

fn priority_rows() -> Vec<Row> {
    vec![
        Row::new("b", "b", "prop").with_priority(2),
        Row::new("a", "a", "prop").with_priority(2),
        Row::new("c", "c", "prop").with_priority(1),
    ]
}

fn asset_rows() -> Vec<Row> {
    vec![
        Row::new("r1", "Tree", "prop")
            .with_type_name("Prop")
            .with_owner(2)
            .with_state(0)
            .with_priority(5),
        Row::new("r2", "bob", "character")
            .with_type_name("Character")
            .with_owner(0)
            .with_state(3)
            .with_priority(1),
        Row::new("r3", "Alley", "set")
            .with_type_name("Set")
            .with_owner(1)
            .with_state(1)
            .with_priority(3),
        Row::new("r4", "zz top", "character")
            .with_type_name("Character")
            .with_owner(1)
            .with_state(2)
            .with_priority(3),
    ]
}

#[test]
fn priority_ascending_breaks_ties_by_name() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), priority_rows(), []);
    let arrangement = engine
        .set_sort_mode(SortMode::ascending(SortKey::Priority))
        .expect("sort");
    assert_eq!(ids(arrangement), vec!["c", "a", "b"]);
}

#[test]
fn descending_reverses_the_combined_comparison() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), priority_rows(), []);
    let arrangement = engine
        .set_sort_control("priority_dsc")
        .expect("sort");
    assert_eq!(ids(arrangement), vec!["b", "a", "c"]);
}

#[test]
fn string_keys_compare_case_sensitively() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), asset_rows(), []);
    let arrangement = engine.set_sort_control("name_asc").expect("sort");
    // Uppercase sorts ahead of lowercase.
    assert_eq!(ids(arrangement), vec!["r3", "r1", "r2", "r4"]);
}

#[test]
fn owner_and_state_sort_by_option_ordinal() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), asset_rows(), []);
    assert_eq!(
        ids(engine.set_sort_control("owner_asc").expect("sort")),
        vec!["r2", "r3", "r4", "r1"]
    );
    assert_eq!(
        ids(engine.set_sort_control("state_dsc").expect("sort")),
        vec!["r2", "r4", "r3", "r1"]
    );
}

#[test]
fn type_sort_uses_type_label_then_name() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), asset_rows(), []);
    assert_eq!(
        ids(engine.set_sort_control("type_asc").expect("sort")),
        vec!["r2", "r4", "r1", "r3"]
    );
}

#[test]
fn recompute_is_idempotent() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), asset_rows(), []);
    engine.set_sort_control("priority_dsc").expect("sort");
    engine.set_text_filter("e").expect("filter");
    let first = engine.arrangement().clone();
    let second = engine.recompute().expect("recompute").clone();
    assert_eq!(first, second);
}

#[test]
fn disabled_category_hides_rows_regardless_of_text() {
    let rows = vec![
        Row::new("a1", "zz tower", "typeB"),
        Row::new("a2", "zz bridge", "typeA"),
        Row::new("a3", "house", "typeA"),
    ];
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), rows, []);
    engine.select_only(&tag("typeA")).expect("solo");
    let arrangement = engine.set_text_filter("zz").expect("filter");

    assert_eq!(arrangement.is_visible(&RowId::from("a1")), Some(false));
    assert_eq!(arrangement.is_visible(&RowId::from("a2")), Some(true));
    assert_eq!(arrangement.is_visible(&RowId::from("a3")), Some(false));
}

#[test]
fn text_filter_is_case_insensitive_substring() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), asset_rows(), []);
    let arrangement = engine.set_text_filter("AL").expect("filter");
    let visible: Vec<&str> = arrangement.visible().into_iter().map(RowId::as_str).collect();
    assert_eq!(visible, vec!["r3"]);
}

#[test]
fn display_text_overrides_name_for_filtering() {
    let rows = vec![Row::new("s1", "sh010", "shot").with_display_text("Opening crane move")];
    let mut engine = SortFilterEngine::new(ListingProfile::shots(), rows, []);
    assert_eq!(engine.set_text_filter("crane").expect("filter").visible().len(), 1);
    assert_eq!(engine.set_text_filter("sh010").expect("filter").visible().len(), 0);
}

#[test]
fn toggle_flips_one_category_only() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), asset_rows(), []);
    engine.toggle(&tag("character")).expect("toggle");
    assert!(!engine.filter().is_enabled(&tag("character")));
    assert!(engine.filter().is_enabled(&tag("prop")));
    assert!(engine.filter().is_enabled(&tag("set")));

    engine.toggle(&tag("character")).expect("toggle");
    assert!(engine.filter().is_enabled(&tag("character")));
    assert_eq!(engine.arrangement().visible().len(), 4);
}

#[test]
fn select_only_disables_every_other_category() {
    let mut engine =
        SortFilterEngine::new(ListingProfile::assets(), asset_rows(), [tag("empty_type")]);
    let arrangement = engine.select_only(&tag("set")).expect("solo");
    let visible: Vec<&str> = arrangement.visible().into_iter().map(RowId::as_str).collect();
    assert_eq!(visible, vec!["r3"]);

    let enabled: Vec<&CategoryTag> = engine.filter().enabled_categories().collect();
    assert_eq!(enabled, vec![&tag("set")]);
}

#[test]
fn all_categories_start_enabled() {
    let engine = SortFilterEngine::new(ListingProfile::assets(), asset_rows(), [tag("fx")]);
    assert!(engine.filter().is_enabled(&tag("fx")));
    assert!(engine.filter().is_enabled(&tag("prop")));
    assert_eq!(engine.filter().text_filter, "");
}

#[test]
fn stale_category_hides_its_rows_without_failing() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), asset_rows(), []);
    engine.filter.categories.remove(&tag("character"));
    let arrangement = engine.recompute().expect("recompute");
    assert_eq!(arrangement.is_visible(&RowId::from("r2")), Some(false));
    assert_eq!(arrangement.is_visible(&RowId::from("r4")), Some(false));
}

#[test]
fn unsupported_key_leaves_prior_order() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), priority_rows(), []);
    engine.set_sort_control("priority_asc").expect("sort");
    let before = engine.arrangement().clone();

    let err = engine
        .set_sort_control("colour_asc")
        .expect_err("unknown key");
    assert_eq!(err, ListingError::UnsupportedSortKey("colour".into()));
    assert_eq!(engine.arrangement(), &before);
    assert_eq!(engine.filter().sort_mode, SortMode::ascending(SortKey::Priority));
}

#[test]
fn shot_listing_rejects_asset_only_keys() {
    let rows = vec![Row::new("s1", "sh010", "shot").with_owner(1)];
    let mut engine = SortFilterEngine::new(ListingProfile::shots(), rows, []);
    let err = engine
        .set_sort_mode(SortMode::ascending(SortKey::Priority))
        .expect_err("not a shot column");
    assert_eq!(err, ListingError::KeyNotInListing(SortKey::Priority));
    assert!(engine.set_sort_control("owner_dsc").is_ok());
}

#[test]
fn rows_without_a_value_sort_first() {
    let rows = vec![
        Row::new("x", "x", "prop").with_priority(1),
        Row::new("y", "y", "prop"),
    ];
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), rows, []);
    assert_eq!(
        ids(engine.set_sort_control("priority_asc").expect("sort")),
        vec!["y", "x"]
    );
}

#[test]
fn engine_rows_follow_the_applied_order() {
    let mut engine = SortFilterEngine::new(ListingProfile::assets(), priority_rows(), []);
    engine.set_sort_control("priority_asc").expect("sort");
    let names: Vec<&str> = engine.rows().iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}
