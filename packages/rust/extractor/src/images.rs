//! Image scoring and thumbnail selection.
//!
//! Large images (both sides at or above the thresholds) whose URL does not
//! look like an icon are "relevant". Pages without any such image fall back to
//! the single largest sized image. The publisher's `og:image` always wins the
//! thumbnail slot and is appended to the relevant list if missing.

use percent_encoding::percent_decode_str;
use tracing::debug;

use linkpeek_shared::ExtractOptions;

use crate::document::ImageElement;

/// Minimum natural size for a high-quality image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageThresholds {
    pub min_width: u32,
    pub min_height: u32,
}

impl Default for ImageThresholds {
    fn default() -> Self {
        Self {
            min_width: 600,
            min_height: 600,
        }
    }
}

impl From<&ExtractOptions> for ImageThresholds {
    fn from(opts: &ExtractOptions) -> Self {
        Self {
            min_width: opts.min_image_width,
            min_height: opts.min_image_height,
        }
    }
}

/// Outcome of [`select`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSelection {
    /// Relevant image URLs in document order, without duplicates.
    pub relevant: Vec<String>,
    /// Representative thumbnail.
    pub best: Option<String>,
}

/// Select relevant images and the best thumbnail.
///
/// `images` is read as an immutable snapshot; its order is never changed.
pub fn select(
    images: &[ImageElement],
    og_image: Option<&str>,
    thresholds: ImageThresholds,
) -> ImageSelection {
    let sized: Vec<&ImageElement> = images.iter().filter(|img| img.area().is_some()).collect();

    let mut relevant: Vec<String> = Vec::new();
    for img in &sized {
        if img.natural_width < thresholds.min_width || img.natural_height < thresholds.min_height {
            continue;
        }
        let src = decode_src(&img.src);
        if src.to_lowercase().contains("icon") || relevant.contains(&src) {
            continue;
        }
        relevant.push(src);
    }

    if relevant.is_empty() {
        if let Some(largest) = largest(&sized) {
            relevant.push(largest.src.clone());
        }
    }

    let best = og_image
        .map(str::to_string)
        .or_else(|| relevant.first().cloned());

    if let Some(best) = &best {
        if !relevant.contains(best) {
            relevant.push(best.clone());
        }
    }

    debug!(
        candidates = images.len(),
        sized = sized.len(),
        relevant = relevant.len(),
        has_thumbnail = best.is_some(),
        "images selected"
    );

    ImageSelection { relevant, best }
}

/// Largest image by area; ties keep the first encountered.
fn largest<'a>(sized: &[&'a ImageElement]) -> Option<&'a ImageElement> {
    let mut best: Option<(&'a ImageElement, u64)> = None;
    for &img in sized {
        let Some(area) = img.area() else {
            continue;
        };
        if best.is_none_or(|(_, best_area)| area > best_area) {
            best = Some((img, area));
        }
    }
    best.map(|(img, _)| img)
}

/// Percent-decode an image URL; sources that do not decode to UTF-8 are kept as-is.
fn decode_src(src: &str) -> String {
    match percent_decode_str(src).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => src.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn img(src: &str, w: u32, h: u32) -> ImageElement {
        ImageElement::new(src, w, h)
    }

    fn select_default(images: &[ImageElement], og: Option<&str>) -> ImageSelection {
        select(images, og, ImageThresholds::default())
    }

    #[test]
    fn single_large_image_is_thumbnail() {
        let selection = select_default(&[img("hero.jpg", 800, 800)], None);
        assert_eq!(selection.relevant, ["hero.jpg"]);
        assert_eq!(selection.best.as_deref(), Some("hero.jpg"));
    }

    #[test]
    fn falls_back_to_largest_small_image() {
        let selection = select_default(&[img("favicon.png", 64, 64)], None);
        assert_eq!(selection.relevant, ["favicon.png"]);
        assert_eq!(selection.best.as_deref(), Some("favicon.png"));
    }

    #[test]
    fn threshold_is_inclusive() {
        let selection = select_default(
            &[img("a.jpg", 600, 600), img("b.jpg", 599, 900), img("c.jpg", 900, 599)],
            None,
        );
        assert_eq!(selection.relevant, ["a.jpg"]);
    }

    #[test]
    fn icon_urls_are_not_high_quality() {
        let selection = select_default(
            &[img("https://x.com/ICONS/big.png", 1000, 1000), img("photo.jpg", 700, 700)],
            None,
        );
        assert_eq!(selection.relevant, ["photo.jpg"]);
    }

    #[test]
    fn fallback_ignores_icon_filter() {
        // Nothing qualifies as high quality, so the largest image wins even if it is an icon.
        let selection = select_default(
            &[img("small.jpg", 100, 100), img("apple-touch-icon.png", 180, 180)],
            None,
        );
        assert_eq!(selection.relevant, ["apple-touch-icon.png"]);
    }

    #[test]
    fn largest_tie_keeps_first() {
        let selection = select_default(&[img("first.jpg", 200, 100), img("second.jpg", 100, 200)], None);
        assert_eq!(selection.relevant, ["first.jpg"]);
    }

    #[test]
    fn zero_dimension_images_are_excluded() {
        let selection = select_default(&[img("pixel.gif", 0, 0), img("lazy.jpg", 1200, 0)], None);
        assert!(selection.relevant.is_empty());
        assert_eq!(selection.best, None);
    }

    #[test]
    fn high_quality_sources_are_decoded_and_deduplicated() {
        let selection = select_default(
            &[
                img("https://x.com/my%20photo.jpg", 800, 800),
                img("https://x.com/my photo.jpg", 900, 900),
                img("https://x.com/other.jpg", 800, 800),
            ],
            None,
        );
        assert_eq!(
            selection.relevant,
            ["https://x.com/my photo.jpg", "https://x.com/other.jpg"]
        );
    }

    #[test]
    fn og_image_is_best_and_appended() {
        let selection = select_default(&[img("hero.jpg", 800, 800)], Some("card.png"));
        assert_eq!(selection.best.as_deref(), Some("card.png"));
        assert_eq!(selection.relevant, ["hero.jpg", "card.png"]);
    }

    #[test]
    fn og_image_not_duplicated() {
        let selection = select_default(&[img("hero.jpg", 800, 800)], Some("hero.jpg"));
        assert_eq!(selection.relevant, ["hero.jpg"]);
    }

    #[test]
    fn og_image_without_page_images() {
        let selection = select_default(&[], Some("card.png"));
        assert_eq!(selection.relevant, ["card.png"]);
        assert_eq!(selection.best.as_deref(), Some("card.png"));
    }

    #[test]
    fn custom_thresholds() {
        let thresholds = ImageThresholds {
            min_width: 100,
            min_height: 100,
        };
        let selection = select(&[img("a.jpg", 150, 150), img("b.jpg", 120, 300)], None, thresholds);
        assert_eq!(selection.relevant, ["a.jpg", "b.jpg"]);
    }

    fn arb_image() -> impl Strategy<Value = ImageElement> {
        ("[a-z]{1,6}\\.(jpg|png)", 0u32..1500, 0u32..1500)
            .prop_map(|(src, w, h)| ImageElement::new(src, w, h))
    }

    proptest! {
        #[test]
        fn sized_images_always_yield_relevant(images in prop::collection::vec(arb_image(), 0..12)) {
            let selection = select_default(&images, None);
            if images.iter().any(|i| i.area().is_some()) {
                prop_assert!(!selection.relevant.is_empty());
            } else {
                prop_assert!(selection.relevant.is_empty());
            }
        }

        #[test]
        fn best_is_og_image_or_first_relevant(
            images in prop::collection::vec(arb_image(), 0..12),
            og in prop::option::of("[a-z]{1,6}\\.webp"),
        ) {
            let selection = select_default(&images, og.as_deref());
            match (&og, &selection.best) {
                (Some(og), Some(best)) => {
                    prop_assert_eq!(og, best);
                }
                (None, Some(best)) => {
                    prop_assert_eq!(Some(best), selection.relevant.first());
                }
                (None, None) => {
                    prop_assert!(selection.relevant.is_empty());
                }
                (Some(_), None) => {
                    prop_assert!(false, "og:image must become the thumbnail");
                }
            }
            if let Some(best) = &selection.best {
                prop_assert!(selection.relevant.contains(best));
            }
        }

        #[test]
        fn selection_is_deterministic(images in prop::collection::vec(arb_image(), 0..12)) {
            prop_assert_eq!(select_default(&images, None), select_default(&images, None));
        }
    }
}
