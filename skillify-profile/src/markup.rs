//! Badge markup for the profile document

use crate::patcher::SectionMarkers;
use skillify_core::{AggregationResult, IconConfig, ProfileConfig};
use std::collections::{BTreeMap, BTreeSet};

/// A single icon in a badge row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub icon: String,
    pub label: String,
}

/// Renders the two skills sections between the document markers
#[derive(Debug, Clone)]
pub struct BadgeRenderer {
    icon_url_template: String,
    badge_size: u32,
    language_icons: BTreeMap<String, String>,
    top_heading: String,
    all_heading: String,
    markers: SectionMarkers,
}

impl BadgeRenderer {
    pub fn new(icons: &IconConfig, profile: &ProfileConfig) -> Self {
        Self {
            icon_url_template: icons.icon_url_template.clone(),
            badge_size: icons.badge_size,
            language_icons: icons.languages.clone(),
            top_heading: profile.top_heading.clone(),
            all_heading: profile.all_heading.clone(),
            markers: SectionMarkers::from_profile(profile),
        }
    }

    pub fn markers(&self) -> &SectionMarkers {
        &self.markers
    }

    pub fn icon_url(&self, icon: &str) -> String {
        self.icon_url_template.replace("{icon}", icon)
    }

    /// Badges for `languages` followed by `frameworks`.
    /// Languages without an icon are left out; repeated icons appear once.
    pub fn badges<'s, L>(&self, languages: L, frameworks: &BTreeSet<String>) -> Vec<Badge>
    where
        L: IntoIterator<Item = &'s str>,
    {
        let language_badges = languages.into_iter().filter_map(|language| {
            self.language_icons.get(language).map(|icon| Badge {
                icon: icon.clone(),
                label: language.to_string(),
            })
        });
        let framework_badges = frameworks.iter().map(|icon| Badge {
            icon: icon.clone(),
            label: icon.clone(),
        });

        let mut seen = BTreeSet::new();
        language_badges
            .chain(framework_badges)
            .filter(|badge| seen.insert(badge.icon.clone()))
            .collect()
    }

    pub fn render_section(&self, heading: &str, badges: &[Badge]) -> String {
        let mut section = format!("## {}\n\n<p align=\"left\">\n", heading);
        for badge in badges {
            section.push_str(&format!(
                "  <img src=\"{}\" alt=\"{}\" width=\"{size}\" height=\"{size}\"/>\n",
                escape_attribute(&self.icon_url(&badge.icon)),
                escape_attribute(&badge.label),
                size = self.badge_size,
            ));
        }
        section.push_str("</p>");
        section
    }

    /// Full marked block: recent top languages and frameworks, then every
    /// language and framework ever used.
    pub fn render(&self, recent: &AggregationResult, all: &AggregationResult) -> String {
        let top = self.badges(
            recent.top_languages.iter().map(|(name, _)| name.as_str()),
            &recent.frameworks,
        );
        let everything = self.badges(
            all.all_languages.iter().map(String::as_str),
            &all.frameworks,
        );

        let body = format!(
            "{}\n\n{}",
            self.render_section(&self.top_heading, &top),
            self.render_section(&self.all_heading, &everything)
        );
        self.markers.wrap(&body)
    }
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
