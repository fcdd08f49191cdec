//! Word cloud image of the top title words.
//!
//! Layout is computed here for any text measurer; drawing needs the
//! default `wordcloud` cargo feature (`image`, `imageproc`, `ab_glyph`) and a font
//! with Hangul glyphs. Without either, [`WordCloud::Unavailable`] carries the
//! reason and the pipeline skips the image.

#![cfg_attr(not(feature = "wordcloud"), allow(dead_code))]

use crate::error::RenderError;
use crate::models::Ranking;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const WIDTH: u32 = 800;
pub const HEIGHT: u32 = 400;

const MARGIN: u32 = 12;
const GAP: u32 = 14;
const MAX_FONT_SIZE: f32 = 96.0;
const MIN_FONT_SIZE: f32 = 18.0;

/// Fonts tried in order when none is configured or the configured one is missing.
const FONT_CANDIDATES: &[&str] = &[
    "C:/Windows/Fonts/malgun.ttf",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
];

/// Viridis-like palette, darkest first.
const PALETTE: &[[u8; 3]] = &[
    [68, 1, 84],
    [59, 82, 139],
    [33, 145, 140],
    [94, 201, 98],
    [253, 231, 37],
];

/// A word with its font size and top-left position on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub text: String,
    pub size: f32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Font size for `count`, scaled linearly against the most frequent word.
pub fn font_size(count: usize, max_count: usize) -> f32 {
    if max_count == 0 {
        return MIN_FONT_SIZE;
    }
    let ratio = count as f32 / max_count as f32;
    MIN_FONT_SIZE + (MAX_FONT_SIZE - MIN_FONT_SIZE) * ratio
}

/// Pack words into centered rows, largest first.
///
/// `measure(text, size)` returns the rendered `(width, height)`. Words wider
/// than the canvas are shrunk; rows that overflow the canvas height are
/// dropped, least frequent first.
pub fn layout<M>(words: &[(String, usize)], width: u32, height: u32, measure: M) -> Vec<PlacedWord>
where
    M: Fn(&str, f32) -> (u32, u32),
{
    let max_count = words.iter().map(|(_, c)| *c).max().unwrap_or(0);
    let usable_width = width.saturating_sub(2 * MARGIN);
    let usable_height = height.saturating_sub(2 * MARGIN);

    let mut rows: Vec<Vec<PlacedWord>> = Vec::new();
    let mut row_width = 0u32;

    for (text, count) in words {
        let mut size = font_size(*count, max_count);
        let (mut w, mut h) = measure(text, size);
        while w > usable_width && size > MIN_FONT_SIZE / 2.0 {
            size *= 0.8;
            (w, h) = measure(text, size);
        }
        if w > usable_width {
            debug!(word = %text, "Word too wide for the canvas; skipping");
            continue;
        }

        let needed = if row_width == 0 { w } else { row_width + GAP + w };
        if rows.is_empty() || needed > usable_width {
            rows.push(Vec::new());
            row_width = w;
        } else {
            row_width = needed;
        }
        if let Some(row) = rows.last_mut() {
            row.push(PlacedWord {
                text: text.clone(),
                size,
                x: 0,
                y: 0,
                width: w,
                height: h,
            });
        }
    }

    let row_height = |row: &Vec<PlacedWord>| row.iter().map(|w| w.height).max().unwrap_or(0);
    let total_height = |rows: &[Vec<PlacedWord>]| {
        rows.iter().map(row_height).sum::<u32>() + GAP * rows.len().saturating_sub(1) as u32
    };
    while !rows.is_empty() && total_height(&rows) > usable_height {
        rows.pop();
    }

    let mut top = (height.saturating_sub(total_height(&rows)) / 2) as i32;
    let mut placed = Vec::new();
    for row in rows {
        let line_height = row_height(&row);
        let line_width: u32 = row.iter().map(|w| w.width).sum::<u32>() + GAP * row.len().saturating_sub(1) as u32;
        let mut left = (width.saturating_sub(line_width) / 2) as i32;
        for mut word in row {
            word.x = left;
            word.y = top + (line_height - word.height) as i32;
            left += (word.width + GAP) as i32;
            placed.push(word);
        }
        top += (line_height + GAP) as i32;
    }
    placed
}

/// Pick the configured font if it exists, else the first installed candidate.
pub fn resolve_font(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        warn!(path = %path.display(), "Configured word cloud font not found; trying system fonts");
    }
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Word cloud rendering capability.
#[derive(Debug)]
pub enum WordCloud {
    #[cfg(feature = "wordcloud")]
    Raster(raster::Renderer),
    /// Rendering is not possible; the reason is logged when the step is skipped.
    Unavailable(String),
}

impl WordCloud {
    /// Build a renderer from the configured font, falling back to system fonts.
    #[cfg(feature = "wordcloud")]
    pub fn from_font(configured: Option<&Path>) -> Self {
        let Some(path) = resolve_font(configured) else {
            return WordCloud::Unavailable("no font with Hangul glyphs was found".to_string());
        };
        match raster::Renderer::load(&path) {
            Ok(renderer) => WordCloud::Raster(renderer),
            Err(e) => WordCloud::Unavailable(format!("font {} could not be loaded: {e}", path.display())),
        }
    }

    #[cfg(not(feature = "wordcloud"))]
    pub fn from_font(_configured: Option<&Path>) -> Self {
        WordCloud::Unavailable("built without the `wordcloud` feature".to_string())
    }

    /// Draw the `max_words` most frequent words into a PNG at `path`.
    #[cfg_attr(not(feature = "wordcloud"), allow(unused_variables))]
    pub fn render(&self, words: &Ranking, max_words: usize, path: &Path) -> Result<(), RenderError> {
        match self {
            #[cfg(feature = "wordcloud")]
            WordCloud::Raster(renderer) => {
                if words.is_empty() {
                    return Err(RenderError::NoData);
                }
                renderer.draw(&words[..words.len().min(max_words)], path)
            }
            WordCloud::Unavailable(reason) => Err(RenderError::Unavailable(reason.clone())),
        }
    }
}

#[cfg(feature = "wordcloud")]
pub mod raster {
    //! Drawing with `imageproc` onto an RGB canvas.

    use super::{HEIGHT, PALETTE, WIDTH, layout};
    use crate::error::RenderError;
    use ab_glyph::{FontVec, PxScale};
    use image::{Rgb, RgbImage};
    use imageproc::drawing::{draw_text_mut, text_size};
    use std::fmt;
    use std::path::{Path, PathBuf};
    use tracing::info;

    pub struct Renderer {
        font: FontVec,
        font_path: PathBuf,
    }

    impl fmt::Debug for Renderer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("Renderer")
                .field("font_path", &self.font_path)
                .finish()
        }
    }

    impl Renderer {
        pub fn load(path: &Path) -> Result<Self, String> {
            let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
            let font = FontVec::try_from_vec_and_index(bytes, 0).map_err(|e| e.to_string())?;
            Ok(Self {
                font,
                font_path: path.to_path_buf(),
            })
        }

        pub fn draw(&self, words: &[(String, usize)], path: &Path) -> Result<(), RenderError> {
            let placed = layout(words, WIDTH, HEIGHT, |text, size| {
                text_size(PxScale::from(size), &self.font, text)
            });

            let mut canvas = RgbImage::from_pixel(WIDTH, HEIGHT, Rgb([255, 255, 255]));
            for (i, word) in placed.iter().enumerate() {
                let color = Rgb(PALETTE[i % PALETTE.len()]);
                draw_text_mut(
                    &mut canvas,
                    color,
                    word.x,
                    word.y,
                    PxScale::from(word.size),
                    &self.font,
                    &word.text,
                );
            }

            canvas
                .save(path)
                .map_err(|e| RenderError::Write(e.to_string()))?;
            info!(words = placed.len(), path = %path.display(), font = %self.font_path.display(), "Rendered word cloud");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fixed-pitch measurer: each char is `size * 0.6` wide, line height is `size`.
    fn mono(text: &str, size: f32) -> (u32, u32) {
        let chars = text.chars().count() as f32;
        ((chars * size * 0.6) as u32, size as u32)
    }

    fn ranking(words: &[(&str, usize)]) -> Ranking {
        words.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn test_font_size_scales_with_count() {
        assert_eq!(font_size(10, 10), MAX_FONT_SIZE);
        assert!(font_size(5, 10) < font_size(6, 10));
        assert_eq!(font_size(0, 0), MIN_FONT_SIZE);
    }

    #[test]
    fn test_layout_keeps_words_inside_canvas() {
        let words = ranking(&[
            ("환율", 9),
            ("대통령", 7),
            ("아이폰", 5),
            ("날씨", 4),
            ("국회", 3),
            ("주식", 2),
            ("축구", 1),
        ]);

        let placed = layout(&words, WIDTH, HEIGHT, mono);
        assert!(!placed.is_empty());
        assert_eq!(placed[0].text, "환율");
        for w in &placed {
            assert!(w.x >= 0 && w.y >= 0, "{w:?}");
            assert!(w.x as u32 + w.width <= WIDTH, "{w:?}");
            assert!(w.y as u32 + w.height <= HEIGHT, "{w:?}");
        }
    }

    #[test]
    fn test_layout_does_not_overlap_within_rows() {
        let words = ranking(&[("a", 3), ("b", 3), ("c", 3)]);
        let placed = layout(&words, WIDTH, HEIGHT, mono);

        for pair in placed.windows(2) {
            if pair[0].y + pair[0].height as i32 == pair[1].y + pair[1].height as i32 {
                assert!(pair[0].x + pair[0].width as i32 <= pair[1].x);
            }
        }
    }

    #[test]
    fn test_layout_shrinks_oversized_words() {
        let words = ranking(&[("가나다라마바사아자차카타파하가나다라", 1)]);
        let placed = layout(&words, WIDTH, HEIGHT, mono);

        assert_eq!(placed.len(), 1);
        assert!(placed[0].size < MAX_FONT_SIZE);
        assert!(placed[0].width <= WIDTH - 2 * MARGIN);
    }

    #[test]
    fn test_layout_drops_rows_that_overflow() {
        let words: Ranking = (0..40).map(|i| (format!("긴단어{i:02}"), 10)).collect();
        let placed = layout(&words, WIDTH, HEIGHT, mono);

        assert!(placed.len() < 40);
        assert!(placed.iter().all(|w| w.y as u32 + w.height <= HEIGHT));
    }

    #[test]
    fn test_resolve_font_prefers_existing_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("custom.ttf");
        std::fs::write(&font, b"not really a font").unwrap();

        assert_eq!(resolve_font(Some(&font)), Some(font.clone()));
    }

    #[cfg(not(feature = "wordcloud"))]
    #[test]
    fn test_render_without_feature_is_unavailable() {
        let cloud = WordCloud::from_font(None);
        let err = cloud
            .render(&ranking(&[("a", 1)]), 10, Path::new("/tmp/unused.png"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Unavailable(_)));
    }

    // Needs an installed Hangul font; passes without checking anything when none is found.
    #[cfg(feature = "wordcloud")]
    #[test]
    fn test_raster_render_writes_png() {
        let Some(font) = resolve_font(None) else {
            return;
        };
        let Ok(renderer) = raster::Renderer::load(&font) else {
            return;
        };
        let cloud = WordCloud::Raster(renderer);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.png");

        let err = cloud.render(&vec![], 10, &path).unwrap_err();
        assert!(matches!(err, RenderError::NoData));
        assert!(!path.exists());

        cloud
            .render(&ranking(&[("환율", 5), ("전망", 3), ("주식", 1)]), 10, &path)
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[cfg(feature = "wordcloud")]
    #[test]
    fn test_unloadable_font_makes_cloud_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let font = dir.path().join("broken.ttf");
        std::fs::write(&font, b"not really a font").unwrap();

        let cloud = WordCloud::from_font(Some(&font));
        assert!(matches!(cloud, WordCloud::Unavailable(ref r) if r.contains("could not be loaded")));
    }

    #[test]
    fn test_unavailable_reason_reported_before_empty_data() {
        let cloud = WordCloud::Unavailable("no font".into());
        let err = cloud.render(&vec![], 10, Path::new("/tmp/unused.png")).unwrap_err();
        assert_eq!(err.to_string(), "Word cloud skipped: no font");
    }
}
