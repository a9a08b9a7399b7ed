//! HTML output.
//!
//! [`HtmlWriter`] owns the output buffer; [`HtmlRenderer`] walks a block
//! event stream and drives the writer, inline-parsing text as it goes.
//! Newlines follow the host renderer: a block opening tag is followed by a
//! newline unless its content is inline or hidden, and a block that comes
//! right after a hidden paragraph starts on a new line.

use std::borrow::Cow;

use crate::Range;
use crate::block::{BlockEvent, Event, ListKind};
use crate::inline::{InlineEvent, InlineParser};

/// Fixed spacer written ahead of every disclosure title.
const SUMMARY_SPACER: &str = "<span class=\"pre-summary\">&nbsp;</span>";

/// HTML output writer with a reusable buffer.
///
/// # Example
/// ```
/// use foldmark::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(64);
/// writer.write_str("<p>");
/// writer.write_escaped_text(b"Hello <World>");
/// writer.write_str("</p>");
///
/// assert_eq!(writer.into_string(), "<p>Hello &lt;World&gt;</p>");
/// ```
#[derive(Debug, Default)]
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }

    /// Create with capacity for rendering `input_len` bytes of markup.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: Vec::with_capacity(input_len + input_len / 4),
        }
    }

    /// Write a static string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write a single byte.
    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        self.out.push(b);
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push(b'\n');
    }

    /// Write text with `&`, `<`, `>` and `"` escaped.
    #[inline]
    pub fn write_escaped_text(&mut self, text: &[u8]) {
        html_escape::encode_double_quoted_attribute_to_vec(as_text(text), &mut self.out);
    }

    /// Write escaped text from a range of `input`.
    #[inline]
    pub fn write_escaped_range(&mut self, input: &[u8], range: Range) {
        self.write_escaped_text(range.slice(input));
    }

    /// Write a decimal number.
    pub fn write_u32(&mut self, n: u32) {
        let mut buf = [0u8; 10];
        let mut i = buf.len();
        let mut n = n;
        loop {
            i -= 1;
            buf[i] = b'0' + (n % 10) as u8;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        self.out.extend_from_slice(&buf[i..]);
    }

    /// Write a number into a `lvl-N` class attribute.
    fn write_level_class(&mut self, level: usize, extra: Option<&str>) {
        self.write_str(" class=\"lvl-");
        self.write_u32(u32::try_from(level).unwrap_or(u32::MAX));
        if let Some(extra) = extra {
            self.write_byte(b' ');
            self.write_str(extra);
        }
        self.write_byte(b'"');
    }

    /// Current output length.
    #[inline]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    /// True if nothing was written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// Output bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    /// Take ownership as a `String`.
    pub fn into_string(self) -> String {
        String::from_utf8(self.out)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
    }
}

/// View text bytes as `str`. Ranges only split at ASCII bytes, so slices of
/// a `str` input stay valid UTF-8.
#[inline]
fn as_text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Renders a block event stream to HTML.
pub struct HtmlRenderer<'a> {
    input: &'a [u8],
    writer: HtmlWriter,
    inline: InlineParser,
    inline_events: Vec<InlineEvent>,
    content: Vec<u8>,
    prev_hidden: bool,
}

impl<'a> HtmlRenderer<'a> {
    /// Create a renderer for events parsed from `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            writer: HtmlWriter::with_capacity_for(input.len()),
            inline: InlineParser::new(),
            inline_events: Vec::with_capacity(64),
            content: Vec::with_capacity(256),
            prev_hidden: false,
        }
    }

    /// Render `events` and return the HTML.
    pub fn render(mut self, events: &[Event]) -> String {
        let mut idx = 0;
        while idx < events.len() {
            idx = self.render_event(events, idx);
        }
        self.writer.into_string()
    }

    /// Render the event at `idx`; returns the index of the next event.
    fn render_event(&mut self, events: &[Event], idx: usize) -> usize {
        let event = &events[idx];
        let next = events.get(idx + 1);

        if event.kind.nesting() >= 0 && self.prev_hidden && !event.hidden {
            self.writer.newline();
        }
        self.prev_hidden = event.hidden;

        match &event.kind {
            BlockEvent::ParagraphStart => return self.paragraph(events, idx),
            BlockEvent::ParagraphEnd => {
                if !event.hidden {
                    self.writer.write_str("</p>\n");
                }
            }

            BlockEvent::HeadingStart { level } => {
                self.writer.write_str("<h");
                self.writer.write_byte(b'0' + level);
                self.writer.write_byte(b'>');
            }
            BlockEvent::HeadingEnd { level } => {
                self.writer.write_str("</h");
                self.writer.write_byte(b'0' + level);
                self.writer.write_str(">\n");
            }
            BlockEvent::Text(range) => self.inline_range(*range),

            BlockEvent::CodeBlockStart { info } => {
                self.writer.write_str("<pre><code");
                if let Some(lang) = info.and_then(|info| first_word(self.input, info)) {
                    self.writer.write_str(" class=\"language-");
                    self.writer.write_escaped_range(self.input, lang);
                    self.writer.write_byte(b'"');
                }
                self.writer.write_byte(b'>');
            }
            BlockEvent::VirtualSpaces(n) => {
                for _ in 0..*n {
                    self.writer.write_byte(b' ');
                }
            }
            BlockEvent::Code(range) => {
                self.writer.write_escaped_range(self.input, *range);
                self.writer.newline();
            }
            BlockEvent::CodeBlockEnd => self.writer.write_str("</code></pre>\n"),

            BlockEvent::ThematicBreak => self.writer.write_str("<hr />\n"),

            BlockEvent::DisclosureStart { expanded, .. } => {
                self.writer.write_str(if *expanded {
                    "<details class=\"collapsible\" open>"
                } else {
                    "<details class=\"collapsible\">"
                });
                self.open_newline(event, next);
            }
            BlockEvent::DisclosureSummary { children, .. } => {
                self.writer.write_str("<summary>");
                self.writer.write_str(SUMMARY_SPACER);
                render_inline(&mut self.writer, self.input, children);
                self.writer.write_str("</summary>\n");
            }
            BlockEvent::DisclosureEnd => self.writer.write_str("</details>\n"),

            BlockEvent::ListStart { kind, style_level, .. } => {
                match kind {
                    ListKind::Unordered => {
                        self.writer.write_str("<ul");
                        self.writer.write_level_class(*style_level, None);
                    }
                    ListKind::Ordered { .. } => {
                        self.writer.write_str("<ol");
                        if let Some(start) = kind.start_value() {
                            self.writer.write_str(" start=\"");
                            self.writer.write_u32(start);
                            self.writer.write_byte(b'"');
                        }
                    }
                }
                self.writer.write_byte(b'>');
                self.open_newline(event, next);
            }
            BlockEvent::ListEnd { kind, .. } => {
                self.writer.write_str(if kind.is_ordered() { "</ol>\n" } else { "</ul>\n" });
            }
            BlockEvent::ListItemStart {
                style_level,
                expandable,
                ..
            } => {
                self.writer.write_str("<li");
                self.writer
                    .write_level_class(*style_level, expandable.then_some("expandable"));
                self.writer.write_byte(b'>');
                self.open_newline(event, next);
            }
            BlockEvent::ListItemEnd => self.writer.write_str("</li>\n"),
        }
        idx + 1
    }

    /// Newline after a container's opening tag, unless the container is
    /// empty or starts with hidden content.
    fn open_newline(&mut self, event: &Event, next: Option<&Event>) {
        let need = match next {
            Some(next) => !next.hidden && !closes(&event.kind, &next.kind),
            None => true,
        };
        if need {
            self.writer.newline();
        }
    }

    /// Render a paragraph starting at `idx`; returns the index after it.
    fn paragraph(&mut self, events: &[Event], idx: usize) -> usize {
        let hidden = events[idx].hidden;
        if !hidden {
            self.writer.write_str("<p>");
        }

        self.content.clear();
        let mut end = idx + 1;
        while let Some(event) = events.get(end) {
            match event.kind {
                BlockEvent::Text(range) => {
                    if !self.content.is_empty() {
                        self.content.push(b'\n');
                    }
                    self.content.extend_from_slice(range.slice(self.input));
                }
                _ => break,
            }
            end += 1;
        }
        while self.content.last().is_some_and(|b| b.is_ascii_whitespace()) {
            self.content.pop();
        }

        self.inline_events.clear();
        self.inline.parse(&self.content, 0, &mut self.inline_events);
        render_inline(&mut self.writer, &self.content, &self.inline_events);

        match events.get(end) {
            Some(close) if close.kind == BlockEvent::ParagraphEnd => {
                self.prev_hidden = close.hidden;
                if !close.hidden {
                    self.writer.write_str("</p>\n");
                }
                end + 1
            }
            _ => end,
        }
    }

    /// Inline-parse a single range of the input (heading text).
    fn inline_range(&mut self, range: Range) {
        self.inline_events.clear();
        self.inline.parse(range.slice(self.input), range.start, &mut self.inline_events);
        render_inline(&mut self.writer, self.input, &self.inline_events);
    }
}

/// True when `next` closes the container opened by `open`.
fn closes(open: &BlockEvent, next: &BlockEvent) -> bool {
    matches!(
        (open, next),
        (BlockEvent::ListItemStart { .. }, BlockEvent::ListItemEnd)
            | (BlockEvent::ListStart { .. }, BlockEvent::ListEnd { .. })
            | (BlockEvent::DisclosureStart { .. }, BlockEvent::DisclosureEnd)
    )
}

/// First word of a fence info string.
fn first_word(input: &[u8], info: Range) -> Option<Range> {
    let bytes = info.slice(input);
    let len = bytes
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    (len > 0).then(|| Range::new(info.start, info.start + len as u32))
}

/// Write inline events whose ranges index `text`.
pub fn render_inline(writer: &mut HtmlWriter, text: &[u8], events: &[InlineEvent]) {
    for event in events {
        match event {
            InlineEvent::Text(range) => writer.write_escaped_range(text, *range),
            InlineEvent::Code(range) => {
                writer.write_str("<code>");
                // Line endings inside code spans become spaces
                for (i, line) in range.slice(text).split(|&b| b == b'\n').enumerate() {
                    if i > 0 {
                        writer.write_byte(b' ');
                    }
                    writer.write_escaped_text(line);
                }
                writer.write_str("</code>");
            }
            InlineEvent::EmphasisStart => writer.write_str("<em>"),
            InlineEvent::EmphasisEnd => writer.write_str("</em>"),
            InlineEvent::StrongStart => writer.write_str("<strong>"),
            InlineEvent::StrongEnd => writer.write_str("</strong>"),
            InlineEvent::SoftBreak => writer.newline(),
            InlineEvent::HardBreak => writer.write_str("<br />\n"),
            InlineEvent::EscapedChar(b) => writer.write_escaped_text(&[*b]),
        }
    }
}
