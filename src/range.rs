//! Compact byte ranges into the source buffer.
//!
//! Events never copy text out of the input; they carry `u32` offsets
//! instead, which keeps documents up to 4GB addressable.

/// Half-open byte range `[start, end)` into an input buffer.
///
/// # Example
/// ```
/// use foldmark::Range;
///
/// let input = b"+++ Title";
/// let range = Range::new(4, 9);
/// assert_eq!(range.slice(input), b"Title");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

const _: () = assert!(std::mem::size_of::<Range>() == 8);

impl Range {
    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a range from usize offsets.
    ///
    /// # Panics
    /// Panics in debug mode if either value exceeds `u32::MAX`.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(end <= u32::MAX as usize);
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Get the bytes this range refers to.
    #[inline]
    pub fn slice<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        &input[self.start as usize..self.end as usize]
    }

    /// Try to view the range as UTF-8 text.
    #[inline]
    pub fn try_slice_str<'a>(&self, input: &'a [u8]) -> Result<&'a str, std::str::Utf8Error> {
        std::str::from_utf8(self.slice(input))
    }

    /// Length of the range in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Start position as usize.
    #[inline]
    pub const fn start_usize(&self) -> usize {
        self.start as usize
    }

    /// End position as usize.
    #[inline]
    pub const fn end_usize(&self) -> usize {
        self.end as usize
    }

    /// Shift the range by `base` bytes.
    #[inline]
    pub const fn offset_by(&self, base: u32) -> Self {
        Self {
            start: self.start + base,
            end: self.end + base,
        }
    }

    /// Shrink the range so it has no leading or trailing ASCII whitespace.
    pub fn trim(&self, input: &[u8]) -> Self {
        let mut start = self.start_usize();
        let mut end = self.end_usize();
        while start < end && input[start].is_ascii_whitespace() {
            start += 1;
        }
        while end > start && input[end - 1].is_ascii_whitespace() {
            end -= 1;
        }
        Self::from_usize(start, end)
    }

    /// Check whether the range ends with `count` repetitions of `byte`.
    pub fn ends_with_run(&self, input: &[u8], byte: u8, count: usize) -> bool {
        let bytes = self.slice(input);
        bytes.len() >= count && bytes[bytes.len() - count..].iter().all(|&b| b == byte)
    }
}
