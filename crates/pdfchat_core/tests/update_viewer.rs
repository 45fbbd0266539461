use std::path::PathBuf;

use pdfchat_core::{
    update, AppState, CatalogStatus, Citation, DocumentStatus, Effect, FetchGeneration, Msg,
};

fn generation_of(effects: &[Effect]) -> FetchGeneration {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchDocument { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("fetch effect")
}

fn loaded(state: AppState, generation: FetchGeneration, total_pages: u32) -> AppState {
    update(
        state,
        Msg::DocumentLoaded {
            generation,
            total_pages,
            local_path: None,
        },
    )
    .0
}

/// Selects `name` and lets the fetch complete with `total_pages`.
fn open(state: AppState, name: &str, total_pages: u32) -> AppState {
    let (state, effects) = update(state, Msg::DocumentSelected(name.to_string()));
    loaded(state, generation_of(&effects), total_pages)
}

#[test]
fn selecting_a_document_resets_page_and_shows_selector() {
    let (state, effects) = update(AppState::new(), Msg::DocumentSelected("a.pdf".to_string()));

    assert_eq!(
        effects,
        vec![Effect::FetchDocument {
            generation: 1,
            name: "a.pdf".to_string(),
        }]
    );
    let view = state.view().viewer;
    assert_eq!(view.selected_document, "a.pdf");
    assert_eq!(view.page, 1);
    assert_eq!(view.total_pages, None);
    assert!(view.selector_visible);
    assert_eq!(view.document, DocumentStatus::Loading);
    assert_eq!(view.page_label(), "Page -- of --");
}

#[test]
fn page_count_arrives_with_the_document() {
    let (state, effects) = update(AppState::new(), Msg::DocumentSelected("a.pdf".to_string()));
    let (state, _) = update(
        state,
        Msg::DocumentLoaded {
            generation: generation_of(&effects),
            total_pages: 12,
            local_path: Some(PathBuf::from("/cache/a.pdf")),
        },
    );

    let view = state.view().viewer;
    assert_eq!(view.total_pages, Some(12));
    assert_eq!(view.page_label(), "Page 1 of 12");
    assert_eq!(view.local_path(), Some(&PathBuf::from("/cache/a.pdf")));
    assert!(!view.previous_enabled());
    assert!(view.next_enabled());
}

#[test]
fn page_changes_are_rejected_while_page_count_unknown() {
    let (state, _) = update(AppState::new(), Msg::DocumentSelected("a.pdf".to_string()));
    let before = state.clone();

    let (state, _) = update(state, Msg::PageStepped(1));
    let (state, _) = update(state, Msg::PageEntered(2));
    let (state, _) = update(state, Msg::PageInput("3".to_string()));

    assert_eq!(state, before);
}

#[test]
fn stepping_clamps_to_document_bounds() {
    let state = open(AppState::new(), "a.pdf", 3);

    let (state, _) = update(state, Msg::PageStepped(-1));
    assert_eq!(state.viewer().page(), 1);

    let (state, _) = update(state, Msg::PageStepped(1));
    let (state, _) = update(state, Msg::PageStepped(1));
    let (mut state, _) = update(state, Msg::PageStepped(1));
    assert_eq!(state.viewer().page(), 3);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::PageStepped(10));
    assert_eq!(state.viewer().page(), 3);
    assert!(!state.consume_dirty());
}

#[test]
fn out_of_range_entry_leaves_page_unchanged() {
    let state = open(AppState::new(), "a.pdf", 5);
    let (state, _) = update(state, Msg::PageEntered(4));
    assert_eq!(state.viewer().page(), 4);

    for rejected in [Msg::PageEntered(0), Msg::PageEntered(6)] {
        let (next, effects) = update(state.clone(), rejected);
        assert!(effects.is_empty());
        assert_eq!(next.viewer().page(), 4);
    }
}

#[test]
fn raw_page_input_is_parsed_or_ignored() {
    let state = open(AppState::new(), "a.pdf", 5);

    let (state, _) = update(state, Msg::PageInput(" 2 ".to_string()));
    assert_eq!(state.viewer().page(), 2);

    for raw in ["", "abc", "-1", "2.5", "99"] {
        let (next, _) = update(state.clone(), Msg::PageInput(raw.to_string()));
        assert_eq!(next.viewer().page(), 2, "input {raw:?}");
    }
}

#[test]
fn page_stays_in_bounds_for_any_navigation_sequence() {
    let total = 4;
    let steps = [-3, -1, 0, 1, 2, 7];
    let entries = [0, 1, 2, 4, 5, 100];

    for seed in 0..200u32 {
        let mut state = open(AppState::new(), "a.pdf", total);
        let mut x = seed;
        for _ in 0..12 {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let msg = if x % 2 == 0 {
                Msg::PageStepped(steps[(x as usize / 2) % steps.len()])
            } else {
                Msg::PageEntered(entries[(x as usize / 2) % entries.len()])
            };
            state = update(state, msg).0;
            let page = state.viewer().page();
            assert!((1..=total).contains(&page), "page {page} out of bounds");
        }
    }
}

#[test]
fn citation_targets_page_and_hides_selector() {
    let (state, effects) = update(
        AppState::new(),
        Msg::CitationClicked(Citation::new("b.pdf", 5)),
    );

    assert_eq!(
        effects,
        vec![Effect::FetchDocument {
            generation: 1,
            name: "b.pdf".to_string(),
        }]
    );
    let view = state.view().viewer;
    assert_eq!(view.selected_document, "b.pdf");
    assert_eq!(view.page, 5);
    assert!(!view.selector_visible);

    let state = loaded(state, 1, 9);
    assert_eq!(state.viewer().page(), 5);
    assert_eq!(state.viewer().total_pages(), Some(9));
}

#[test]
fn citation_past_the_end_is_clamped_once_page_count_known() {
    let (state, effects) = update(
        AppState::new(),
        Msg::CitationClicked(Citation::new("b.pdf", 40)),
    );
    let state = loaded(state, generation_of(&effects), 7);

    assert_eq!(state.viewer().page(), 7);
}

#[test]
fn citation_page_zero_is_raised_to_first_page() {
    let (state, _) = update(
        AppState::new(),
        Msg::CitationClicked(Citation::new("b.pdf", 0)),
    );
    assert_eq!(state.viewer().page(), 1);
}

#[test]
fn citation_for_open_document_refetches_and_jumps() {
    let state = open(AppState::new(), "a.pdf", 10);
    let (state, effects) = update(state, Msg::CitationClicked(Citation::new("a.pdf", 8)));

    assert_eq!(generation_of(&effects), 2);
    assert_eq!(state.viewer().page(), 8);
    assert_eq!(state.viewer().total_pages(), None);

    let state = loaded(state, 2, 10);
    assert_eq!(state.viewer().page(), 8);
}

#[test]
fn stale_document_result_is_discarded() {
    let (state, first) = update(AppState::new(), Msg::DocumentSelected("a.pdf".to_string()));
    let (state, second) = update(state, Msg::DocumentSelected("b.pdf".to_string()));
    assert_eq!(generation_of(&first), 1);
    assert_eq!(generation_of(&second), 2);

    // The older response arrives last.
    let state = loaded(state, 2, 4);
    let before = state.clone();
    let state = loaded(state, 1, 30);
    assert_eq!(state, before);

    let (state, _) = update(
        state,
        Msg::DocumentFailed {
            generation: 1,
            reason: "boom".to_string(),
        },
    );
    assert_eq!(state, before);
    assert_eq!(state.viewer().selected_document(), "b.pdf");
    assert_eq!(state.viewer().total_pages(), Some(4));
}

#[test]
fn failed_fetch_keeps_navigation_disabled() {
    let (state, effects) = update(AppState::new(), Msg::DocumentSelected("a.pdf".to_string()));
    let (state, _) = update(
        state,
        Msg::DocumentFailed {
            generation: generation_of(&effects),
            reason: "PDF not found".to_string(),
        },
    );

    let view = state.view().viewer;
    assert_eq!(view.document, DocumentStatus::Failed("PDF not found".to_string()));
    assert_eq!(view.total_pages, None);
    assert!(!view.next_enabled());

    let (state, _) = update(state, Msg::PageStepped(1));
    assert_eq!(state.viewer().page(), 1);
}

#[test]
fn catalog_results_are_ignored_unless_requested() {
    let (state, _) = update(
        AppState::new(),
        Msg::CatalogLoaded(vec!["a.pdf".to_string()]),
    );

    assert!(state.viewer().catalog().is_empty());
    assert_eq!(state.viewer().catalog_status(), &CatalogStatus::NotRequested);
}
