use foldmark::{BlockEvent, Event, ListKind, Options, parse, to_html, to_html_with_options};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn events(input: &str) -> Vec<Event> {
    init_logging();
    parse(input).unwrap()
}

fn html(input: &str) -> String {
    init_logging();
    to_html(input).unwrap()
}

fn list_starts(events: &[Event]) -> Vec<&BlockEvent> {
    events
        .iter()
        .map(|e| &e.kind)
        .filter(|k| matches!(k, BlockEvent::ListStart { .. }))
        .collect()
}

fn item_flags(events: &[Event]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|e| match e.kind {
            BlockEvent::ListItemStart { expandable, .. } => Some(expandable),
            _ => None,
        })
        .collect()
}

fn is_tight(events: &[Event]) -> bool {
    match list_starts(events).first() {
        Some(BlockEvent::ListStart { tight, .. }) => *tight,
        other => panic!("expected ListStart, got {other:?}"),
    }
}

// --- Tight and loose ---

#[test]
fn tight_bullet_list() {
    let events = events("- one\n- two\n- three");
    let starts = list_starts(&events);
    assert_eq!(starts.len(), 1);
    assert!(matches!(
        starts[0],
        BlockEvent::ListStart {
            kind: ListKind::Unordered,
            tight: true,
            marker: b'-',
            style_level: 0,
        }
    ));
    assert_eq!(item_flags(&events), [false, false, false]);

    let paragraphs: Vec<_> = events
        .iter()
        .filter(|e| matches!(e.kind, BlockEvent::ParagraphStart | BlockEvent::ParagraphEnd))
        .collect();
    assert_eq!(paragraphs.len(), 6);
    assert!(paragraphs.iter().all(|e| e.hidden));

    assert!(matches!(
        events.last().unwrap().kind,
        BlockEvent::ListEnd { tight: true, .. }
    ));
    assert_eq!(
        html("- one\n- two\n- three"),
        "<ul class=\"lvl-0\">\n\
         <li class=\"lvl-1\">one</li>\n\
         <li class=\"lvl-1\">two</li>\n\
         <li class=\"lvl-1\">three</li>\n\
         </ul>\n"
    );
}

#[test]
fn blank_between_items_loosens() {
    let events = events("- one\n\n- two");
    assert!(!is_tight(&events));
    assert!(events.iter().all(|e| !e.hidden));
}

#[test]
fn blank_between_blocks_of_an_item_loosens() {
    let events = events("- one\n\n  more\n- two");
    assert!(!is_tight(&events));
    assert!(html("- one\n\n  more\n- two").contains("<p>one</p>\n<p>more</p>"));
}

#[test]
fn trailing_blank_after_last_item_stays_tight() {
    let out = html("- one\n- two\n\nafter");
    assert_eq!(
        out,
        "<ul class=\"lvl-0\">\n\
         <li class=\"lvl-1\">one</li>\n\
         <li class=\"lvl-1\">two</li>\n\
         </ul>\n\
         <p>after</p>\n"
    );
}

#[test]
fn nested_list_tightness_is_independent() {
    let events = events("- a\n\n- b\n  - c\n  - d");
    let starts = list_starts(&events);
    assert_eq!(starts.len(), 2);
    assert!(matches!(starts[0], BlockEvent::ListStart { tight: false, .. }));
    assert!(matches!(
        starts[1],
        BlockEvent::ListStart {
            tight: true,
            style_level: 2,
            ..
        }
    ));
}

// --- Markers ---

#[test]
fn marker_change_starts_new_list() {
    let events = events("* a\n- b\n+ c");
    let markers: Vec<u8> = list_starts(&events)
        .iter()
        .filter_map(|k| match k {
            BlockEvent::ListStart { marker, .. } => Some(*marker),
            _ => None,
        })
        .collect();
    assert_eq!(markers, [b'*', b'-', b'+']);
}

#[test]
fn ordered_delimiter_change_starts_new_list() {
    let events = events("1. a\n2) b");
    assert_eq!(list_starts(&events).len(), 2);
}

#[test]
fn ordered_list_numbers() {
    let events = events("7. a\n8. b\n9. c");
    assert!(matches!(
        list_starts(&events)[0],
        BlockEvent::ListStart {
            kind: ListKind::Ordered {
                start: 7,
                delimiter: b'.'
            },
            ..
        }
    ));
    let numbers: Vec<_> = events
        .iter()
        .filter_map(|e| match e.kind {
            BlockEvent::ListItemStart { number, .. } => number,
            _ => None,
        })
        .collect();
    assert_eq!(numbers, [7, 8, 9]);
    assert!(html("7. a").starts_with("<ol start=\"7\">\n"));
    assert!(html("1. a").starts_with("<ol>\n"));
}

#[test]
fn ten_digit_number_is_text() {
    assert_eq!(html("1234567890. a"), "<p>1234567890. a</p>\n");
}

// --- Paragraph interruption ---

#[test]
fn only_ordered_one_interrupts_paragraph() {
    assert_eq!(html("In\n1984. a year"), "<p>In\n1984. a year</p>\n");
    assert_eq!(
        html("In\n1. first"),
        "<p>In</p>\n<ol>\n<li class=\"lvl-1\">first</li>\n</ol>\n"
    );
}

#[test]
fn empty_item_does_not_interrupt_paragraph() {
    assert_eq!(html("text\n-"), "<p>text\n-</p>\n");
    assert!(html("text\n- item").starts_with("<p>text</p>\n<ul"));
}

// --- Expandable items ---

#[test]
fn expandable_flag_without_valid_disclosure() {
    let events = events("- +++ Nested");
    assert_eq!(item_flags(&events), [true]);
    assert!(
        events
            .iter()
            .all(|e| !matches!(e.kind, BlockEvent::DisclosureStart { .. }))
    );
    assert_eq!(
        html("- +++ Nested"),
        "<ul class=\"lvl-0\">\n<li class=\"lvl-1 expandable\">+++ Nested</li>\n</ul>\n"
    );
}

#[test]
fn expandable_detection() {
    assert_eq!(item_flags(&events("- >>> More\n  body\n  >>>")), [true]);
    assert_eq!(item_flags(&events("1. ++++ Long run")), [true]);
    assert_eq!(item_flags(&events("- ++ short")), [false]);
    assert_eq!(item_flags(&events("-  +++ two spaces")), [false]);
    assert_eq!(item_flags(&events("- +>+ mixed")), [false]);
    assert_eq!(item_flags(&events("- plain\n- +++ T")), [false, true]);
}

#[test]
fn expandable_item_holds_disclosure() {
    let out = html("- >>> More\n  body\n  >>>\n- after");
    assert!(out.contains("<li class=\"lvl-1 expandable\">\n<details class=\"collapsible\">"));
    assert!(out.contains("</details>\n</li>\n<li class=\"lvl-1\">after</li>"));
}

// --- Edge cases ---

#[test]
fn empty_items() {
    assert_eq!(
        html("-\n- b"),
        "<ul class=\"lvl-0\">\n<li class=\"lvl-1\"></li>\n<li class=\"lvl-1\">b</li>\n</ul>\n"
    );
}

#[test]
fn item_content_on_next_line() {
    assert_eq!(
        html("-\n  foo"),
        "<ul class=\"lvl-0\">\n<li class=\"lvl-1\">foo</li>\n</ul>\n"
    );
}

#[test]
fn tab_after_marker_expands_to_next_stop() {
    // "1.\t" puts the content at column 4, so a line indented by 4 stays in the item.
    let inside = events("1.\tx\n\n    y");
    let paragraphs = inside
        .iter()
        .filter(|e| matches!(e.kind, BlockEvent::ParagraphStart))
        .count();
    assert_eq!(paragraphs, 2);
    assert!(!is_tight(&inside));
    assert!(matches!(inside.last().map(|e| &e.kind), Some(BlockEvent::ListEnd { .. })));

    // "-\t" also lands on column 4; two spaces fall outside the item.
    let outside = events("-\tx\n\n  y");
    assert!(matches!(outside.last().map(|e| &e.kind), Some(BlockEvent::ParagraphEnd)));
    assert_eq!(outside.last().map(|e| e.level), Some(0));
}

#[test]
fn code_indented_marker_is_code() {
    let events = events("    - a");
    assert!(list_starts(&events).is_empty());
    assert!(matches!(events[0].kind, BlockEvent::CodeBlockStart { .. }));
}

#[test]
fn thematic_break_ends_list() {
    assert_eq!(
        html("- a\n* * *"),
        "<ul class=\"lvl-0\">\n<li class=\"lvl-1\">a</li>\n</ul>\n<hr />\n"
    );
}

#[test]
fn disabled_by_option() {
    init_logging();
    let options = Options {
        classy_lists: false,
        ..Options::default()
    };
    assert_eq!(
        to_html_with_options("- a\n- b", &options).unwrap(),
        "<p>- a\n- b</p>\n"
    );
}
