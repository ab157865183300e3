use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// 字元格式與設定中使用的 RGBA 顏色。 / An RGBA color as stored in char formats and settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    /// 建立不透明的顏色。 / Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// 解析 `#rrggbb` 或 `#rrggbbaa`。 / Parses `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let hex = input
            .trim()
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingHashPrefix)?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::InvalidLength);
        }
        let mut rgba = [0u8; 4];
        for (i, slot) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            let start = i * 2;
            let slice = hex
                .get(start..start + 2)
                .ok_or(ColorParseError::InvalidHex)?;
            *slot = u8::from_str_radix(slice, 16).map_err(|_| ColorParseError::InvalidHex)?;
        }
        if hex.len() == 6 {
            rgba[3] = 0xFF;
        }
        Ok(Color {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        })
    }

    /// 輸出 `#rrggbb`，非不透明時附加 alpha。 / Formats the color as `#rrggbb`, appending alpha only when it is not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 0xFF {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// 顏色字串解析錯誤。 / Errors raised while parsing a hex color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("missing leading '#'")]
    MissingHashPrefix,
    #[error("expected 6 or 8 hexadecimal digits")]
    InvalidLength,
    #[error("contains non-hexadecimal digits")]
    InvalidHex,
}

/// 回報給監聽者的完整字型描述。 / Fully resolved font description reported to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontInfo {
    pub family: String,
    pub point_size: u16,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontInfo {
    pub fn new(family: impl Into<String>, point_size: u16) -> Self {
        Self {
            family: family.into(),
            point_size,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

impl Default for FontInfo {
    fn default() -> Self {
        Self::new("Arial", 11)
    }
}

/// 稀疏的字元格式，`None` 代表沿用編輯器預設值。 / Sparse character format. `None` means "inherit from the editor defaults".
///
/// Merging keeps every attribute the incoming format leaves unspecified and
/// overwrites the ones it sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharFormat {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub point_size: Option<u16>,
    pub family: Option<String>,
    pub foreground: Option<Color>,
}

impl CharFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    pub fn with_underline(mut self, underline: bool) -> Self {
        self.underline = Some(underline);
        self
    }

    pub fn with_point_size(mut self, size: u16) -> Self {
        self.point_size = Some(size);
        self
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    /// 明確設定 `font` 的每個字型屬性。 / Every font attribute of `font` set explicitly.
    pub fn from_font(font: &FontInfo) -> Self {
        Self {
            bold: Some(font.bold),
            italic: Some(font.italic),
            underline: Some(font.underline),
            point_size: Some(font.point_size),
            family: Some(font.family.clone()),
            foreground: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == CharFormat::default()
    }

    /// 以 `other` 中已設定的屬性覆寫目前格式。 / Overwrites the attributes `other` sets.
    pub fn merge(&mut self, other: &CharFormat) {
        if other.bold.is_some() {
            self.bold = other.bold;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.underline.is_some() {
            self.underline = other.underline;
        }
        if other.point_size.is_some() {
            self.point_size = other.point_size;
        }
        if let Some(family) = &other.family {
            self.family = Some(family.clone());
        }
        if other.foreground.is_some() {
            self.foreground = other.foreground;
        }
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }

    pub fn is_underline(&self) -> bool {
        self.underline.unwrap_or(false)
    }

    /// 以 `base` 補齊未設定的屬性。 / Resolves unset attributes from `base`.
    pub fn font(&self, base: &FontInfo) -> FontInfo {
        FontInfo {
            family: self.family.clone().unwrap_or_else(|| base.family.clone()),
            point_size: self.point_size.unwrap_or(base.point_size),
            bold: self.bold.unwrap_or(base.bold),
            italic: self.italic.unwrap_or(base.italic),
            underline: self.underline.unwrap_or(base.underline),
        }
    }

    pub fn color(&self, base: Color) -> Color {
        self.foreground.unwrap_or(base)
    }
}

/// 共用同一格式的 `len` 個字元。 / A span of `len` characters sharing one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRun {
    pub len: usize,
    pub format: CharFormat,
}

impl FormatRun {
    pub fn new(len: usize, format: CharFormat) -> Self {
        Self { len, format }
    }
}

/// 覆蓋整個緩衝區的字元格式區段清單。 / Run-length list of character formats covering a buffer.
///
/// Runs never have zero length and adjacent runs never share a format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatRuns {
    runs: Vec<FormatRun>,
}

impl FormatRuns {
    /// 建立以預設格式覆蓋 `len` 個字元的清單。 / Creates runs covering `len` characters in the default format.
    pub fn new(len: usize) -> Self {
        let mut runs = Self::default();
        if len > 0 {
            runs.runs.push(FormatRun::new(len, CharFormat::default()));
        }
        runs
    }

    /// 覆蓋的字元總數。 / Total number of characters covered.
    pub fn len(&self) -> usize {
        self.runs.iter().map(|run| run.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatRun> {
        self.runs.iter()
    }

    /// `pos` 位置字元的格式；超出結尾時回報最後一段。 / Format of the character at `pos`; positions past the end report the last run.
    pub fn format_at(&self, pos: usize) -> CharFormat {
        let mut offset = 0;
        for run in &self.runs {
            if pos < offset + run.len {
                return run.format.clone();
            }
            offset += run.len;
        }
        self.runs
            .last()
            .map(|run| run.format.clone())
            .unwrap_or_default()
    }

    /// 複製 `range` 範圍內的區段。 / Copies the runs inside `range`.
    pub fn slice(&self, range: Range<usize>) -> Vec<FormatRun> {
        let mut out = Vec::new();
        let mut offset = 0;
        for run in &self.runs {
            let run_start = offset;
            let run_end = offset + run.len;
            offset = run_end;
            let start = range.start.max(run_start);
            let end = range.end.min(run_end);
            if start < end {
                out.push(FormatRun::new(end - start, run.format.clone()));
            }
        }
        out
    }

    /// 以 `replacement` 取代 `range` 範圍的區段。 / Replaces the runs covering `range` with `replacement`.
    pub fn splice(&mut self, range: Range<usize>, replacement: Vec<FormatRun>) {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        let first = self.split_at(start);
        let last = self.split_at(end);
        self.runs.splice(first..last, replacement);
        self.normalize();
    }

    /// 將格式合併到 `range` 內的每一段。 / Merges `format` into every run inside `range`.
    pub fn merge_range(&mut self, range: Range<usize>, format: &CharFormat) {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        if start == end {
            return;
        }
        let first = self.split_at(start);
        let last = self.split_at(end);
        for run in &mut self.runs[first..last] {
            run.format.merge(format);
        }
        self.normalize();
    }

    /// Ensures a run boundary at `pos` and returns the index of the run starting there.
    fn split_at(&mut self, pos: usize) -> usize {
        let mut offset = 0;
        for idx in 0..self.runs.len() {
            let run_len = self.runs[idx].len;
            if pos == offset {
                return idx;
            }
            if pos < offset + run_len {
                let head = pos - offset;
                let format = self.runs[idx].format.clone();
                self.runs[idx].len = head;
                self.runs
                    .insert(idx + 1, FormatRun::new(run_len - head, format));
                return idx + 1;
            }
            offset += run_len;
        }
        self.runs.len()
    }

    fn normalize(&mut self) {
        let mut merged: Vec<FormatRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.format == run.format => last.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

/// 取得包含 `pos` 的單字字元範圍。 / Character range of the word enclosing `pos`.
///
/// A caret sitting directly before or after a word counts as inside it; a caret
/// surrounded by non-word characters yields an empty range at `pos`. An
/// apostrophe between two word characters belongs to the word ("don't").
pub fn word_range_at(text: &str, pos: usize) -> Range<usize> {
    let chars: Vec<char> = text.chars().collect();
    let pos = pos.min(chars.len());
    let touches_word =
        (pos < chars.len() && is_word_at(&chars, pos)) || (pos > 0 && is_word_at(&chars, pos - 1));
    if !touches_word {
        return pos..pos;
    }
    let mut start = pos;
    while start > 0 && is_word_at(&chars, start - 1) {
        start -= 1;
    }
    let mut end = pos;
    while end < chars.len() && is_word_at(&chars, end) {
        end += 1;
    }
    start..end
}

fn is_word_at(chars: &[char], idx: usize) -> bool {
    match chars[idx] {
        '\'' | '\u{2019}' => {
            idx > 0
                && idx + 1 < chars.len()
                && is_word_char(chars[idx - 1])
                && is_word_char(chars[idx + 1])
        }
        ch => is_word_char(ch),
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> CharFormat {
        CharFormat::new().with_bold(true)
    }

    #[test]
    fn color_hex_round_trip() {
        let color = Color::from_hex("#FFAA33").unwrap();
        assert_eq!(color, Color::rgb(0xFF, 0xAA, 0x33));
        assert_eq!(color.to_hex(), "#ffaa33");

        let translucent = Color::from_hex("#11223344").unwrap();
        assert_eq!(translucent.a, 0x44);
        assert_eq!(translucent.to_hex(), "#11223344");
    }

    #[test]
    fn color_rejects_malformed_input() {
        assert_eq!(
            Color::from_hex("123456").unwrap_err(),
            ColorParseError::MissingHashPrefix
        );
        assert_eq!(
            Color::from_hex("#123").unwrap_err(),
            ColorParseError::InvalidLength
        );
        assert_eq!(
            Color::from_hex("#12345g").unwrap_err(),
            ColorParseError::InvalidHex
        );
    }

    #[test]
    fn merge_keeps_unspecified_attributes() {
        let mut format = CharFormat::new()
            .with_italic(true)
            .with_family("Courier New");
        format.merge(&CharFormat::new().with_bold(true).with_family("Arial"));
        assert_eq!(format.bold, Some(true));
        assert_eq!(format.italic, Some(true));
        assert_eq!(format.family.as_deref(), Some("Arial"));
        assert_eq!(format.point_size, None);
    }

    #[test]
    fn merge_range_splits_runs() {
        let mut runs = FormatRuns::new(13);
        runs.merge_range(4..9, &bold());
        let spans: Vec<_> = runs.iter().map(|run| (run.len, run.format.is_bold())).collect();
        assert_eq!(spans, vec![(4, false), (5, true), (4, false)]);
        assert_eq!(runs.len(), 13);
    }

    #[test]
    fn adjacent_equal_runs_are_coalesced() {
        let mut runs = FormatRuns::new(6);
        runs.merge_range(0..3, &bold());
        runs.merge_range(3..6, &bold());
        assert_eq!(runs.iter().count(), 1);
        assert!(runs.format_at(5).is_bold());
    }

    #[test]
    fn splice_replaces_and_reports_slices() {
        let mut runs = FormatRuns::new(10);
        runs.merge_range(2..4, &bold());
        let removed = runs.slice(1..5);
        assert_eq!(
            removed,
            vec![
                FormatRun::new(1, CharFormat::default()),
                FormatRun::new(2, bold()),
                FormatRun::new(1, CharFormat::default()),
            ]
        );
        runs.splice(1..5, Vec::new());
        assert_eq!(runs.len(), 6);
        assert!(!runs.format_at(1).is_bold());

        runs.splice(1..1, removed);
        assert_eq!(runs.len(), 10);
        assert!(runs.format_at(2).is_bold());
        assert!(runs.format_at(3).is_bold());
        assert!(!runs.format_at(4).is_bold());
    }

    #[test]
    fn word_range_expands_around_caret() {
        let text = "say hello now";
        assert_eq!(word_range_at(text, 6), 4..9);
        assert_eq!(word_range_at(text, 4), 4..9);
        assert_eq!(word_range_at(text, 9), 4..9);
        assert_eq!(word_range_at(text, 0), 0..3);
        assert_eq!(word_range_at(text, 13), 10..13);
    }

    #[test]
    fn word_range_keeps_inner_apostrophes() {
        let text = "I don't know";
        assert_eq!(word_range_at(text, 4), 2..7);
        assert_eq!(word_range_at(text, 7), 2..7);
        assert_eq!(word_range_at("it\u{2019}s", 0), 0..4);
    }

    #[test]
    fn word_range_skips_quoting_apostrophes() {
        let text = "say 'hi' now";
        assert_eq!(word_range_at(text, 6), 5..7);
        assert_eq!(word_range_at("don'", 1), 0..3);
    }

    #[test]
    fn word_range_is_empty_between_spaces() {
        assert_eq!(word_range_at("a  b", 2), 2..2);
        assert_eq!(word_range_at("", 0), 0..0);
    }
}
