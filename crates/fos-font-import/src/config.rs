//! Import configuration
//!
//! Mirrors the font meta file: every key is optional and falls back to the
//! defaults below.

use serde::Deserialize;

use crate::{ImportError, Result};

/// Largest starting canvas edge; keeps cell math inside `i32`
pub const MAX_CANVAS_SIZE: u32 = 1 << 30;

/// Characters imported when the meta file does not name any
pub const DEFAULT_CHARACTERS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789.+- ";

/// How the packing loop reacts when a glyph does not fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RepackMode {
    /// Grow the canvas and repack every glyph from the first one
    #[default]
    Restart,
    /// Grow the canvas and retry only the glyph that failed
    Incremental,
}

/// Font import options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontImportConfig {
    /// Requested characters, in import order
    pub characters: String,
    /// Em square size in pixels
    pub resolution: u32,
    /// Distance field border width in pixels
    pub sdf_range: u32,
    /// Dead border inside every packed cell
    pub padding: u32,
    /// Maximum number of canvas growths before giving up
    pub max_grow_attempts: u32,
    /// Packing retry strategy
    pub repack: RepackMode,
    /// Face index inside a font collection
    pub face_index: u32,
}

impl Default for FontImportConfig {
    fn default() -> Self {
        Self {
            characters: DEFAULT_CHARACTERS.to_string(),
            resolution: 64,
            sdf_range: 8,
            padding: 2,
            max_grow_attempts: 16,
            repack: RepackMode::Restart,
            face_index: 0,
        }
    }
}

impl FontImportConfig {
    /// Parse a JSON meta file
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ImportError::Config(format!("meta file: {e}")))
    }

    pub fn with_characters(mut self, characters: &str) -> Self {
        self.characters = characters.to_string();
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_sdf_range(mut self, sdf_range: u32) -> Self {
        self.sdf_range = sdf_range;
        self
    }

    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_max_grow_attempts(mut self, attempts: u32) -> Self {
        self.max_grow_attempts = attempts;
        self
    }

    pub fn with_repack(mut self, repack: RepackMode) -> Self {
        self.repack = repack;
        self
    }

    /// Check the options before any work is done
    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(ImportError::Config("resolution must be positive".into()));
        }
        if self.characters.is_empty() {
            return Err(ImportError::Config("character set is empty".into()));
        }
        self.min_canvas_size()?;
        Ok(())
    }

    /// Deduplicated character set with the space forced in
    pub fn character_set(&self) -> Result<CharacterSet> {
        CharacterSet::new(&self.characters)
    }

    /// Border reserved around every glyph on each side
    pub fn cell_border(&self) -> u32 {
        self.padding.saturating_add(self.sdf_range)
    }

    /// Starting canvas edge: fits one full em cell without growing.
    ///
    /// Fails when the padded cell does not fit in [`MAX_CANVAS_SIZE`].
    pub fn min_canvas_size(&self) -> Result<u32> {
        self.padding
            .checked_add(self.sdf_range)
            .and_then(|border| border.checked_mul(2))
            .and_then(|border| border.checked_add(self.resolution))
            .and_then(crate::geometry::next_pow2)
            .filter(|&size| size <= MAX_CANVAS_SIZE)
            .ok_or_else(|| {
                ImportError::Config(format!(
                    "resolution {} with sdf range {} and padding {} exceeds the {}px canvas limit",
                    self.resolution, self.sdf_range, self.padding, MAX_CANVAS_SIZE
                ))
            })
    }
}

/// Ordered set of characters to import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSet {
    chars: Vec<char>,
}

impl CharacterSet {
    /// Build from a string, keeping first occurrences and appending a space
    pub fn new(characters: &str) -> Result<Self> {
        if characters.is_empty() {
            return Err(ImportError::Config("character set is empty".into()));
        }

        let mut chars: Vec<char> = Vec::with_capacity(characters.len() + 1);
        for c in characters.chars() {
            if !chars.contains(&c) {
                chars.push(c);
            }
        }

        if !chars.contains(&' ') {
            chars.push(' ');
        }

        Ok(Self { chars })
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    /// Never zero: the space is always present
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn as_slice(&self) -> &[char] {
        &self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FontImportConfig::default();
        assert_eq!(config.resolution, 64);
        assert_eq!(config.sdf_range, 8);
        assert_eq!(config.padding, 2);
        assert_eq!(config.repack, RepackMode::Restart);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_character_set_dedup_and_space() {
        let set = CharacterSet::new("ABBA").unwrap();
        assert_eq!(set.as_slice(), &['A', 'B', ' ']);
    }

    #[test]
    fn test_character_set_keeps_existing_space() {
        let set = CharacterSet::new("A B").unwrap();
        assert_eq!(set.as_slice(), &['A', ' ', 'B']);
    }

    #[test]
    fn test_empty_character_set_rejected() {
        assert!(matches!(CharacterSet::new(""), Err(ImportError::Config(_))));
        let config = FontImportConfig::default().with_characters("");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let config = FontImportConfig::default().with_resolution(0);
        assert!(matches!(config.validate(), Err(ImportError::Config(_))));
    }

    #[test]
    fn test_min_canvas_size() {
        let config = FontImportConfig::default()
            .with_resolution(32)
            .with_sdf_range(4)
            .with_padding(2);
        assert_eq!(config.min_canvas_size().unwrap(), 64);
        assert_eq!(FontImportConfig::default().min_canvas_size().unwrap(), 128);
    }

    #[test]
    fn test_oversized_values_rejected() {
        let configs = [
            FontImportConfig::default().with_resolution(3_000_000_000),
            FontImportConfig::default().with_resolution(u32::MAX),
            FontImportConfig::default().with_sdf_range(u32::MAX),
            FontImportConfig::default().with_padding(u32::MAX / 2),
            FontImportConfig::default()
                .with_sdf_range(u32::MAX / 2)
                .with_padding(u32::MAX / 2),
            FontImportConfig::default().with_resolution(MAX_CANVAS_SIZE + 1),
        ];
        for config in configs {
            assert!(matches!(config.min_canvas_size(), Err(ImportError::Config(_))));
            assert!(matches!(config.validate(), Err(ImportError::Config(_))));
        }
    }

    #[test]
    fn test_oversized_meta_rejected() {
        let config = FontImportConfig::from_json(r#"{ "resolution": 4000000000 }"#).unwrap();
        assert!(matches!(config.validate(), Err(ImportError::Config(_))));
    }

    #[test]
    fn test_largest_canvas_accepted() {
        let config = FontImportConfig::default()
            .with_resolution(MAX_CANVAS_SIZE - 20)
            .with_sdf_range(8)
            .with_padding(2);
        assert_eq!(config.min_canvas_size().unwrap(), MAX_CANVAS_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = FontImportConfig::from_json(
            r#"{ "characters": "xyz", "sdfRange": 4, "repack": "incremental" }"#,
        )
        .unwrap();
        assert_eq!(config.characters, "xyz");
        assert_eq!(config.sdf_range, 4);
        assert_eq!(config.resolution, 64);
        assert_eq!(config.repack, RepackMode::Incremental);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = FontImportConfig::from_json("{ resolution: }").unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));
    }
}
