// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::elements::{
    DefaultFramesConfig, DefaultIdentityConfig, DefaultLogConfig, DefaultPageConfig,
    DeserializedElementIds, DeserializedFramesConfig, DeserializedIdentityConfig,
    DeserializedLogConfig, DeserializedMarkerClasses, DeserializedPageConfig, ElementIds,
    IdentityConfig, LogConfig, MarkerClasses, PageKind,
};
use crate::{codec::FrameFormat, errors::ConfigError};
use camino::Utf8Path;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Specifies where to load the viewer configuration from.
#[derive(Clone, Copy, Debug)]
pub enum ConfigLocation<'a> {
    /// Use only the embedded defaults.
    Embedded,

    /// Layer the file at this path over the embedded defaults.
    ///
    /// Returns an error if the file does not exist.
    Explicit(&'a Utf8Path),
}

impl<'a> ConfigLocation<'a> {
    /// Creates a config location from a CLI or environment variable value.
    pub fn from_cli_or_env(path: Option<&'a Utf8Path>) -> Self {
        match path {
            None => Self::Embedded,
            Some(path) => Self::Explicit(path),
        }
    }
}

/// Viewer configuration after user settings have been layered over the defaults.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ViewerConfig {
    /// The kind of page driven.
    pub page: PageKind,
    /// Identity filter settings.
    pub identity: IdentityConfig,
    /// Frame encoding.
    pub frames: FrameFormat,
    /// Log page settings.
    pub log: LogConfig,
    /// Page element identifiers.
    pub elements: ElementIds,
    /// Thumbnail and text-link marker classes.
    pub classes: MarkerClasses,
}

impl ViewerConfig {
    /// Loads the configuration from the given location.
    pub fn load(location: ConfigLocation<'_>) -> Result<Self, ConfigError> {
        Self::load_with_warnings(location, &mut DefaultConfigWarnings)
    }

    fn load_with_warnings(
        location: ConfigLocation<'_>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigError> {
        let defaults = DefaultViewerConfig::from_embedded();
        match location {
            ConfigLocation::Embedded => {
                debug!("viewer config: using embedded defaults");
                Ok(defaults.resolve(DeserializedViewerConfig::default()))
            }
            ConfigLocation::Explicit(path) => {
                let user = DeserializedViewerConfig::from_path_with_warnings(path, warnings)?;
                Ok(defaults.resolve(user))
            }
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        DefaultViewerConfig::from_embedded().resolve(DeserializedViewerConfig::default())
    }
}

/// Trait for handling configuration warnings.
///
/// Logging is the default; tests collect warnings instead.
trait ConfigWarnings {
    /// Handle unknown configuration keys found in a config file.
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        if unknown.len() == 1 {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.push_str(unknown.iter().next().expect("unknown has one element"));
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                unknown_str.push('\n');
                unknown_str.push_str("  - ");
                unknown_str.push_str(ignored_key);
            }
        }

        warn!("in viewer config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

/// Viewer configuration as written by the user: every setting is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedViewerConfig {
    #[serde(default)]
    page: DeserializedPageConfig,
    #[serde(default)]
    identity: DeserializedIdentityConfig,
    #[serde(default)]
    frames: DeserializedFramesConfig,
    #[serde(default)]
    log: DeserializedLogConfig,
    #[serde(default)]
    elements: DeserializedElementIds,
    #[serde(default)]
    classes: DeserializedMarkerClasses,
}

impl DeserializedViewerConfig {
    fn from_path_with_warnings(
        path: &Utf8Path,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigError> {
        debug!("viewer config: loading from {path}");
        let contents = std::fs::read_to_string(path).map_err(|error| ConfigError::Read {
            path: path.to_owned(),
            error,
        })?;

        let (config, unknown) =
            Self::deserialize_toml(&contents).map_err(|error| ConfigError::Parse {
                path: path.to_owned(),
                error,
            })?;

        if !unknown.is_empty() {
            warnings.unknown_config_keys(path, &unknown);
        }

        Ok(config)
    }

    /// Deserializes TOML content and returns the config along with any unknown keys.
    fn deserialize_toml(contents: &str) -> Result<(Self, BTreeSet<String>), toml::de::Error> {
        let deserializer = toml::Deserializer::parse(contents)?;
        let mut unknown = BTreeSet::new();
        let config: DeserializedViewerConfig = serde_ignored::deserialize(deserializer, |path| {
            unknown.insert(path.to_string());
        })?;
        Ok((config, unknown))
    }
}

/// The embedded defaults: every setting is required.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DefaultViewerConfig {
    page: DefaultPageConfig,
    identity: DefaultIdentityConfig,
    frames: DefaultFramesConfig,
    log: DefaultLogConfig,
    elements: ElementIds,
    classes: MarkerClasses,
}

impl DefaultViewerConfig {
    /// The embedded default viewer config TOML.
    const DEFAULT_CONFIG: &'static str = include_str!("../../default-viewer-config.toml");

    /// Parses the default config.
    ///
    /// Panics if the embedded TOML is invalid or contains unknown keys.
    fn from_embedded() -> Self {
        let deserializer = toml::Deserializer::parse(Self::DEFAULT_CONFIG)
            .expect("embedded default viewer config should parse");
        let mut unknown = BTreeSet::new();
        let config: DefaultViewerConfig =
            serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
                unknown.insert(path.to_string());
            })
            .expect("embedded default viewer config should be valid");

        // The default config is shipped with this binary, so unknown keys are a bug.
        if !unknown.is_empty() {
            panic!(
                "found unknown keys in default viewer config: {}",
                unknown.iter().join(", ")
            );
        }

        config
    }

    fn resolve(&self, user: DeserializedViewerConfig) -> ViewerConfig {
        ViewerConfig {
            page: user.page.kind.unwrap_or(self.page.kind),
            identity: self.identity.resolve(&user.identity),
            frames: user.frames.format.unwrap_or(self.frames.format),
            log: self.log.resolve(&user.log),
            elements: self.elements.resolve(user.elements),
            classes: self.classes.resolve(user.classes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        filter::{IdentityBinding, MismatchPolicy},
        identity::IdentityScheme,
    };
    use camino_tempfile::Utf8TempDir;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct TestConfigWarnings {
        unknown: BTreeSet<String>,
    }

    impl ConfigWarnings for TestConfigWarnings {
        fn unknown_config_keys(&mut self, _config_file: &Utf8Path, unknown: &BTreeSet<String>) {
            self.unknown.extend(unknown.iter().cloned());
        }
    }

    fn write_config(dir: &Utf8TempDir, contents: &str) -> camino::Utf8PathBuf {
        let path = dir.path().join("viewer.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn embedded_defaults() {
        let config = ViewerConfig::default();

        assert_eq!(config.page, PageKind::Report);
        assert_eq!(
            config.identity,
            IdentityConfig {
                scheme: IdentityScheme::Numbered,
                binding: IdentityBinding::FirstEvent,
                on_mismatch: MismatchPolicy::Drop,
                enabled: None,
            }
        );
        assert_eq!(config.frames, FrameFormat::Json);
        assert_eq!(config.log.summary_extra_columns, 9);
        assert_eq!(config.elements.results, "results");
        assert_eq!(config.elements.directories, "dirs");
        assert_eq!(config.classes.thumbnail, "thumb");
        assert_eq!(config.classes.text_link, "tlink");
    }

    #[test]
    fn user_config_layers_over_defaults() {
        let dir = Utf8TempDir::new().unwrap();
        let path = write_config(
            &dir,
            indoc! {r#"
                [page]
                kind = "log"

                [identity]
                scheme = "slug"
                on-mismatch = "close"

                [frames]
                format = "delimited"

                [log]
                summary-extra-columns = 12

                [classes]
                thumbnail = "preview"
            "#},
        );

        let mut warnings = TestConfigWarnings::default();
        let config =
            ViewerConfig::load_with_warnings(ConfigLocation::Explicit(&path), &mut warnings)
                .unwrap();

        assert_eq!(config.page, PageKind::Log);
        assert_eq!(config.identity.scheme, IdentityScheme::Slug);
        assert_eq!(config.identity.binding, IdentityBinding::FirstEvent);
        assert_eq!(config.identity.on_mismatch, MismatchPolicy::Close);
        assert_eq!(config.frames, FrameFormat::Delimited);
        assert_eq!(config.log.summary_extra_columns, 12);
        assert_eq!(config.classes.thumbnail, "preview");
        assert_eq!(config.classes.text_link, "tlink");
        assert!(warnings.unknown.is_empty());
    }

    #[test]
    fn summary_columns_are_clamped() {
        let dir = Utf8TempDir::new().unwrap();
        let path = write_config(&dir, "[log]\nsummary-extra-columns = 2\n");

        let config = ViewerConfig::load(ConfigLocation::Explicit(&path)).unwrap();
        assert_eq!(config.log.summary_extra_columns, 9);
    }

    #[test]
    fn unknown_keys_are_reported() {
        let dir = Utf8TempDir::new().unwrap();
        let path = write_config(
            &dir,
            indoc! {r#"
                [page]
                kind = "report"
                theme = "dark"

                [reconnect]
                attempts = 3
            "#},
        );

        let mut warnings = TestConfigWarnings::default();
        ViewerConfig::load_with_warnings(ConfigLocation::Explicit(&path), &mut warnings).unwrap();

        assert_eq!(
            warnings.unknown,
            ["page.theme", "reconnect"]
                .into_iter()
                .map(String::from)
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn invalid_value_is_a_parse_error() {
        let dir = Utf8TempDir::new().unwrap();
        let path = write_config(&dir, "[identity]\nscheme = \"triple\"\n");

        let err = ViewerConfig::load(ConfigLocation::Explicit(&path)).unwrap_err();
        assert!(
            matches!(err, ConfigError::Parse { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = Utf8TempDir::new().unwrap();
        let path = dir.path().join("does-not-exist.toml");

        let err = ViewerConfig::load(ConfigLocation::Explicit(&path)).unwrap_err();
        assert!(
            matches!(err, ConfigError::Read { .. }),
            "unexpected error: {err:?}"
        );
    }
}
