//! Marked-region replacement
//!
//! Everything here is pure string manipulation; file access lives in
//! [`crate::document`].

use skillify_core::{ProfileConfig, DEFAULT_END_MARKER, DEFAULT_START_MARKER};

/// The two literal sentinels bounding the machine-owned region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarkers {
    pub start: String,
    pub end: String,
}

impl Default for SectionMarkers {
    fn default() -> Self {
        Self::new(DEFAULT_START_MARKER, DEFAULT_END_MARKER)
    }
}

impl SectionMarkers {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn from_profile(profile: &ProfileConfig) -> Self {
        Self::new(profile.start_marker.trim(), profile.end_marker.trim())
    }

    /// Surround `body` with both markers, each on its own line
    pub fn wrap(&self, body: &str) -> String {
        format!("{}\n{}\n{}", self.start, body.trim_matches('\n'), self.end)
    }
}

/// Which markers a document carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionState {
    /// Neither marker (or only a stray end marker)
    WithoutMarkers,
    /// Start marker followed by an end marker
    WithMarkers,
    /// Start marker with no end marker after it; the rest of the document
    /// is treated as the marked body
    Unterminated,
}

/// A document split around its marked region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRegion<'a> {
    pub prefix: &'a str,
    pub marked_body: Option<&'a str>,
    pub suffix: &'a str,
    pub state: RegionState,
    block: Option<&'a str>,
}

impl<'a> DocumentRegion<'a> {
    /// Split `document` on the first start marker and the first end marker
    /// after it.
    pub fn parse(document: &'a str, markers: &SectionMarkers) -> Self {
        let Some(start_at) = document.find(&markers.start) else {
            return Self {
                prefix: document,
                marked_body: None,
                suffix: "",
                state: RegionState::WithoutMarkers,
                block: None,
            };
        };

        let body_at = start_at + markers.start.len();
        match document[body_at..].find(&markers.end) {
            Some(offset) => {
                let end_at = body_at + offset;
                let suffix_at = end_at + markers.end.len();
                Self {
                    prefix: &document[..start_at],
                    marked_body: Some(&document[body_at..end_at]),
                    suffix: &document[suffix_at..],
                    state: RegionState::WithMarkers,
                    block: Some(&document[start_at..suffix_at]),
                }
            }
            None => Self {
                prefix: &document[..start_at],
                marked_body: Some(&document[body_at..]),
                suffix: "",
                state: RegionState::Unterminated,
                block: None,
            },
        }
    }

    /// The marked region including both markers, when it is well formed
    pub fn marked_block(&self) -> Option<&'a str> {
        self.block
    }

    /// Reassemble the original text. Exact for every state.
    pub fn reconstruct(&self, markers: &SectionMarkers) -> String {
        match (self.state, self.marked_body) {
            (RegionState::WithMarkers, Some(body)) => format!(
                "{}{}{}{}{}",
                self.prefix, markers.start, body, markers.end, self.suffix
            ),
            (RegionState::Unterminated, Some(body)) => {
                format!("{}{}{}", self.prefix, markers.start, body)
            }
            _ => format!("{}{}", self.prefix, self.suffix),
        }
    }
}

/// Replace (or append) the marked region of `document` with `markup`.
///
/// `markup` is expected to carry both markers itself (see
/// [`SectionMarkers::wrap`]) so that the next run finds the region again.
/// Text outside the region is kept, trimmed, and separated from the markup
/// by one blank line. The output ends with a single newline.
pub fn patch(document: &str, markup: &str, markers: &SectionMarkers) -> String {
    let region = DocumentRegion::parse(document, markers);
    let (prefix, suffix) = match region.state {
        RegionState::WithMarkers => (region.prefix, region.suffix),
        RegionState::Unterminated => (region.prefix, ""),
        RegionState::WithoutMarkers => (document, ""),
    };

    let parts: Vec<&str> = [prefix.trim(), markup.trim(), suffix.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        return String::new();
    }

    let mut output = parts.join("\n\n");
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> SectionMarkers {
        SectionMarkers::default()
    }

    fn markup(body: &str) -> String {
        markers().wrap(body)
    }

    #[test]
    fn test_replaces_marked_region() {
        let document = "# Hi\n\nIntro text.\n\n<!-- SKILLS-SECTION-START -->\nold badges\n<!-- SKILLS-SECTION-END -->\n\n## Contact\nmail me\n";
        let patched = patch(document, &markup("new badges"), &markers());

        assert_eq!(
            patched,
            "# Hi\n\nIntro text.\n\n<!-- SKILLS-SECTION-START -->\nnew badges\n<!-- SKILLS-SECTION-END -->\n\n## Contact\nmail me\n"
        );
    }

    #[test]
    fn test_document_without_markers_gets_markup_appended() {
        let document = "# About me\n\nI write code.   \n\n\n";
        let patched = patch(document, &markup("badges"), &markers());

        assert!(patched.starts_with("# About me\n\nI write code."));
        assert_eq!(
            patched,
            "# About me\n\nI write code.\n\n<!-- SKILLS-SECTION-START -->\nbadges\n<!-- SKILLS-SECTION-END -->\n"
        );
    }

    #[test]
    fn test_patch_is_idempotent() {
        let documents = [
            "",
            "plain text only",
            "# Title\n<!-- SKILLS-SECTION-START -->x<!-- SKILLS-SECTION-END -->tail",
            "# Title\n\n<!-- SKILLS-SECTION-START -->\nunterminated",
            "<!-- SKILLS-SECTION-END --> stray end first",
        ];
        let generated = markup("  <img src=\"a.svg\"/>");

        for document in documents {
            let once = patch(document, &generated, &markers());
            let twice = patch(&once, &generated, &markers());
            assert_eq!(once, twice, "not idempotent for {:?}", document);
        }
    }

    #[test]
    fn test_round_trip_recovers_markup() {
        let generated = markup("## Skills\n\n<p align=\"left\">\n</p>");
        let patched = patch("# Profile\n\nHello.\n", &generated, &markers());

        let region = DocumentRegion::parse(&patched, &markers());
        assert_eq!(region.state, RegionState::WithMarkers);
        assert_eq!(region.marked_block(), Some(generated.as_str()));
        assert_eq!(
            region.marked_body,
            Some("\n## Skills\n\n<p align=\"left\">\n</p>\n")
        );
    }

    #[test]
    fn test_parse_reconstructs_original() {
        let document = "before\n<!-- SKILLS-SECTION-START -->body<!-- SKILLS-SECTION-END -->\nafter";
        let region = DocumentRegion::parse(document, &markers());

        assert_eq!(region.prefix, "before\n");
        assert_eq!(region.marked_body, Some("body"));
        assert_eq!(region.suffix, "\nafter");
        assert_eq!(region.reconstruct(&markers()), document);
    }

    #[test]
    fn test_unterminated_region_is_replaced_to_end() {
        let document = "# Me\n\n<!-- SKILLS-SECTION-START -->\nleftover generated text";
        let region = DocumentRegion::parse(document, &markers());
        assert_eq!(region.state, RegionState::Unterminated);
        assert_eq!(region.reconstruct(&markers()), document);

        let patched = patch(document, &markup("fresh"), &markers());
        assert_eq!(
            patched,
            "# Me\n\n<!-- SKILLS-SECTION-START -->\nfresh\n<!-- SKILLS-SECTION-END -->\n"
        );
    }

    #[test]
    fn test_end_marker_before_start_counts_as_no_markers() {
        let document = "<!-- SKILLS-SECTION-END -->\ntext";
        let region = DocumentRegion::parse(document, &markers());
        // a start marker is required to open a region
        assert_eq!(region.state, RegionState::WithoutMarkers);
        assert_eq!(region.prefix, document);
    }

    #[test]
    fn test_custom_markers() {
        let custom = SectionMarkers::new("<!-- BEGIN -->", "<!-- END -->");
        let document = "a\n<!-- BEGIN -->\nold\n<!-- END -->\nb";
        let patched = patch(document, &custom.wrap("new"), &custom);
        assert_eq!(patched, "a\n\n<!-- BEGIN -->\nnew\n<!-- END -->\n\nb\n");
    }

    #[test]
    fn test_empty_document_and_body() {
        assert_eq!(patch("", "", &markers()), "");
        assert_eq!(
            patch("", &markup(""), &markers()),
            "<!-- SKILLS-SECTION-START -->\n\n<!-- SKILLS-SECTION-END -->\n"
        );
    }
}
