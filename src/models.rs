//! Domain models shared by the catalog fetch, the query engine and the TUI.
//! These types stay light-weight data holders so the other layers can focus on
//! filtering, presentation and transport.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A single catalog entry as delivered by the remote source.
pub struct BookRecord {
    /// Display title. The catalog has no stable id, so the title doubles as
    /// the identity key for reading-list membership.
    pub title: String,
    /// Author shown under the title.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    /// Single-letter difficulty code, compared case-sensitively.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reading_level: String,
    /// Optional cover reference, either an absolute URL or a path relative to
    /// the asset server.
    #[serde(rename = "coverPhotoURL", default)]
    pub cover_image_ref: Option<String>,
}

/// GraphQL sends `null` for unset nullable fields; those read as blank.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl BookRecord {
    pub fn new(title: impl Into<String>, author: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            reading_level: level.into(),
            cover_image_ref: None,
        }
    }

    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover_image_ref = Some(cover.into());
        self
    }

    /// The cover reference with blank values treated as absent.
    pub fn cover_ref(&self) -> Option<&str> {
        self.cover_image_ref
            .as_deref()
            .map(str::trim)
            .filter(|cover| !cover.is_empty())
    }

    /// Resolve the cover into something the platform opener understands.
    /// Absolute URLs win; relative references are joined onto `asset_base`
    /// when one is configured and returned verbatim otherwise.
    pub fn cover_location(&self, asset_base: Option<&Url>) -> Option<String> {
        let cover = self.cover_ref()?;
        if let Ok(absolute) = Url::parse(cover) {
            return Some(absolute.to_string());
        }
        match asset_base.and_then(|base| base.join(cover).ok()) {
            Some(joined) => Some(joined.to_string()),
            None => Some(cover.to_string()),
        }
    }

    /// `Title by Author`, dropping the suffix when the author is blank.
    pub fn display_title(&self) -> String {
        if self.author.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} by {}", self.title, self.author.trim())
        }
    }

    /// Chip text shown next to the title.
    pub fn level_label(&self) -> String {
        if self.reading_level.trim().is_empty() {
            "Level ?".to_string()
        } else {
            format!("Level {}", self.reading_level.trim())
        }
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Named groups of reading levels used as the coarse catalog filter. Exactly
/// one band is active at a time; `All` has no levels and matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelBand {
    #[default]
    All,
    AToC,
    DToF,
    GToI,
    JToL,
}

impl LevelBand {
    /// Every band in the order the selector shows them.
    pub const ALL: [LevelBand; 5] = [
        LevelBand::All,
        LevelBand::AToC,
        LevelBand::DToF,
        LevelBand::GToI,
        LevelBand::JToL,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LevelBand::All => "All Levels",
            LevelBand::AToC => "A-C",
            LevelBand::DToF => "D-F",
            LevelBand::GToI => "G-I",
            LevelBand::JToL => "J-L",
        }
    }

    pub fn levels(self) -> &'static [&'static str] {
        match self {
            LevelBand::All => &[],
            LevelBand::AToC => &["A", "B", "C"],
            LevelBand::DToF => &["D", "E", "F"],
            LevelBand::GToI => &["G", "H", "I"],
            LevelBand::JToL => &["J", "K", "L"],
        }
    }

    /// True when the band is the match-all band or lists `level` exactly.
    pub fn matches(self, level: &str) -> bool {
        let levels = self.levels();
        levels.is_empty() || levels.contains(&level)
    }

    fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|band| *band == self)
            .unwrap_or_default()
    }

    /// Next band in selector order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous band in selector order, wrapping around.
    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for LevelBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level band `{0}` (expected one of: All Levels, A-C, D-F, G-I, J-L)")]
pub struct UnknownBand(pub String);

impl FromStr for LevelBand {
    type Err = UnknownBand;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        if wanted.eq_ignore_ascii_case("all") {
            return Ok(LevelBand::All);
        }
        LevelBand::ALL
            .into_iter()
            .find(|band| band.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownBand(raw.to_string()))
    }
}
