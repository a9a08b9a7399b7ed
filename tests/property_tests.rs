use foldmark::block::{BlockEngine, BlockState, ParentKind};
use foldmark::{
    BlockEvent, Event, LineSpan, LineTable, Options, ParseError, parse, parse_with_options,
};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

fn list_tight(events: &[Event]) -> Option<bool> {
    events.iter().find_map(|e| match e.kind {
        BlockEvent::ListStart { tight, .. } => Some(tight),
        _ => None,
    })
}

fn nested_list(depth: usize) -> String {
    (0..depth)
        .map(|i| format!("{}- item{i}\n", "  ".repeat(i)))
        .collect()
}

proptest! {
    #[test]
    fn list_without_blanks_is_tight(items in prop::collection::vec(word(), 1..20)) {
        let input: String = items.iter().map(|w| format!("- {w}\n")).collect();
        let events = parse(&input).unwrap();
        prop_assert_eq!(list_tight(&events), Some(true));
        let item_count = events
            .iter()
            .filter(|e| matches!(e.kind, BlockEvent::ListItemStart { .. }))
            .count();
        prop_assert_eq!(item_count, items.len());
    }

    #[test]
    fn blank_between_items_is_loose(items in prop::collection::vec(word(), 2..20)) {
        let input = items
            .iter()
            .map(|w| format!("- {w}"))
            .collect::<Vec<_>>()
            .join("\n\n");
        let events = parse(&input).unwrap();
        prop_assert_eq!(list_tight(&events), Some(false));
    }

    #[test]
    fn trailing_blanks_keep_list_tight(
        items in prop::collection::vec(word(), 1..10),
        blanks in 1usize..4,
    ) {
        let mut input: String = items.iter().map(|w| format!("- {w}\n")).collect();
        input.push_str(&"\n".repeat(blanks));
        input.push_str("after\n");
        let events = parse(&input).unwrap();
        prop_assert_eq!(list_tight(&events), Some(true));
    }

    #[test]
    fn closed_disclosure_span_includes_close_line(
        body in prop::collection::vec(word(), 1..10),
        extra in 0usize..3,
    ) {
        let run = "+".repeat(3 + extra);
        let input = format!("{run} Title\n{}\n{run}\ntail", body.join("\n"));
        let events = parse(&input).unwrap();
        let close = body.len() + 1;
        prop_assert_eq!(events[0].span, LineSpan::new(0, close + 1));
        prop_assert_eq!(events[0].span.len(), close + 1);
    }

    #[test]
    fn auto_closed_disclosure_runs_to_end(body in prop::collection::vec(word(), 1..10)) {
        let input = format!(">>> Title\n{}", body.join("\n"));
        let events = parse(&input).unwrap();
        prop_assert_eq!(events[0].span, LineSpan::new(0, body.len() + 1));
        prop_assert!(matches!(events.last().map(|e| &e.kind), Some(BlockEvent::DisclosureEnd)));
    }

    #[test]
    fn context_is_restored_after_parse(depth in 1usize..8, disclose in any::<bool>()) {
        let mut input = nested_list(depth);
        if disclose {
            input = format!("+++ Wrap\n{input}+++\n");
        }
        let lines = LineTable::new(input.as_bytes());
        let mut state = BlockState::new(input.as_bytes(), &lines);
        BlockEngine::default().tokenize(&mut state, 0, lines.len()).unwrap();

        prop_assert_eq!(state.blk_indent(), 0);
        prop_assert_eq!(state.list_indent(), None);
        prop_assert_eq!(state.parent(), ParentKind::Root);
        prop_assert_eq!(state.level(), 0);
        prop_assert_eq!(state.line_max(), lines.len());
    }

    #[test]
    fn nesting_limit_is_enforced(depth in 1usize..8, limit in 1usize..20) {
        let options = Options { max_nesting: limit, ..Options::default() };
        let result = parse_with_options(&nested_list(depth), &options);
        // Each list adds a list level and an item level, so item content on
        // line `n` is tokenized at level `2 * (n + 1)`.
        if limit <= 2 * depth {
            let expected = ParseError::NestingTooDeep { line: limit.div_ceil(2) - 1, limit };
            prop_assert_eq!(result.err(), Some(expected));
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn events_are_balanced(input in "[-+>*_`#0-9. a-z\n]{0,200}") {
        match parse(&input) {
            Ok(events) => {
                let mut depth = 0i32;
                for event in &events {
                    depth += i32::from(event.kind.nesting());
                    prop_assert!(depth >= 0);
                }
                prop_assert_eq!(depth, 0);
            }
            Err(err) => {
                let is_nesting_error = matches!(err, ParseError::NestingTooDeep { .. });
                prop_assert!(is_nesting_error);
            }
        }
    }

    #[test]
    fn html_never_fails_on_shallow_input(input in "[-+> a-z\n]{0,30}") {
        prop_assert!(foldmark::to_html(&input).is_ok());
    }
}
