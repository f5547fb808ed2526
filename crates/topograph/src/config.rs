//! Configuration types for rendering Topograph graphs.
//!
//! The builder itself has no tunables; everything here is handed to the
//! rendering collaborator. All types implement [`serde::Deserialize`] so the
//! CLI can load them from TOML.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining render and style settings.
//! - [`RenderConfig`] - Selects the [`OutputFormat`] of the artifact.
//! - [`StyleConfig`] - Graph, cluster and per-category node styling.
//!
//! # Example
//!
//! ```
//! # use topograph::config::{AppConfig, OutputFormat};
//! let config = AppConfig::default();
//! assert_eq!(config.render().format(), OutputFormat::Png);
//! assert!(config.style().background_color().is_ok());
//! ```

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use indexmap::IndexMap;
use serde::Deserialize;

use topograph_core::color::Color;

/// Top-level configuration combining render and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Render configuration section.
    #[serde(default)]
    render: RenderConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified render and style configurations.
    pub fn new(render: RenderConfig, style: StyleConfig) -> Self {
        Self { render, style }
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Replaces the output format, e.g. from a command-line override.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.render.format = format;
        self
    }
}

/// Artifact formats a renderer can produce.
///
/// The names match external configuration strings (kebab-case).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// PNG image produced by Graphviz (default)
    #[default]
    Png,
    /// SVG image produced by Graphviz
    Svg,
    /// Graphviz DOT source
    Dot,
    /// JSON cluster tree
    JsonTree,
    /// JSON flat edge list
    JsonEdges,
}

impl OutputFormat {
    /// File extension conventionally used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Dot => "dot",
            Self::JsonTree | Self::JsonEdges => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "dot" => Ok(Self::Dot),
            "json-tree" => Ok(Self::JsonTree),
            "json-edges" => Ok(Self::JsonEdges),
            _ => Err(format!(
                "unsupported output format `{s}`, expected one of png, svg, dot, json-tree, json-edges"
            )),
        }
    }
}

impl From<OutputFormat> for &'static str {
    fn from(val: OutputFormat) -> Self {
        match val {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Dot => "dot",
            OutputFormat::JsonTree => "json-tree",
            OutputFormat::JsonEdges => "json-edges",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}

/// Render configuration.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RenderConfig {
    /// Artifact format.
    #[serde(default)]
    format: OutputFormat,
}

impl RenderConfig {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Returns the artifact format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Styling applied to nodes of one category.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CategoryStyle {
    /// Graphviz node shape, e.g. `box3d`.
    #[serde(default)]
    shape: Option<String>,

    /// Fill color as a CSS color string.
    #[serde(default)]
    fill_color: Option<String>,

    /// Label color as a CSS color string.
    #[serde(default)]
    font_color: Option<String>,
}

impl CategoryStyle {
    pub fn new(shape: Option<&str>, fill_color: Option<&str>, font_color: Option<&str>) -> Self {
        Self {
            shape: shape.map(str::to_owned),
            fill_color: fill_color.map(str::to_owned),
            font_color: font_color.map(str::to_owned),
        }
    }

    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    /// Returns the parsed fill [`Color`], or `None` if unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn fill_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.fill_color.as_deref(), "fill color")
    }

    /// Returns the parsed font [`Color`], or `None` if unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured string is not a valid color.
    pub fn font_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.font_color.as_deref(), "font color")
    }
}

/// Visual styling configuration for rendered graphs.
///
/// Fields left out of a configuration file fall back to the defaults, which
/// mirror a conventional cloud architecture palette.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color as a CSS color string.
    background_color: Option<String>,

    /// Font size for the graph title; nodes and clusters derive from it.
    font_size: u32,

    /// Node shape used when no category style sets one.
    default_shape: String,

    /// Cluster background colors, cycled by nesting depth.
    cluster_colors: Vec<String>,

    /// Styles keyed by category. A category such as `aws.compute` also
    /// matches an entry for `aws`.
    categories: IndexMap<String, CategoryStyle>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let categories = [
            ("aws", CategoryStyle::new(None, Some("#fdf1e0"), Some("#232f3e"))),
            ("aws.compute", CategoryStyle::new(Some("box3d"), Some("#ffd8a8"), None)),
            ("aws.storage", CategoryStyle::new(Some("cylinder"), Some("#d3f9d8"), None)),
            ("aws.security", CategoryStyle::new(Some("octagon"), Some("#ffe3e3"), None)),
            ("k8s", CategoryStyle::new(Some("component"), Some("#dbe4ff"), None)),
            ("onprem", CategoryStyle::new(Some("ellipse"), Some("#f1f3f5"), None)),
        ]
        .into_iter()
        .map(|(name, style)| (name.to_string(), style))
        .collect();

        Self {
            background_color: None,
            font_size: 15,
            default_shape: "box".to_string(),
            cluster_colors: ["#e5f5fd", "#ebf3e7", "#ece8f6", "#fdf7e3"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            categories,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color(self.background_color.as_deref(), "background color")
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn default_shape(&self) -> &str {
        &self.default_shape
    }

    /// Returns the parsed cluster background colors.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid color.
    pub fn cluster_colors(&self) -> Result<Vec<Color>, String> {
        self.cluster_colors
            .iter()
            .map(|color| {
                Color::new(color).map_err(|err| format!("Invalid cluster color in config: {err}"))
            })
            .collect()
    }

    /// Finds the style for `category`, trying the full name first and then
    /// each shorter dotted prefix.
    ///
    /// ```
    /// # use topograph::config::StyleConfig;
    /// let style = StyleConfig::default();
    /// assert_eq!(style.category_style("aws.compute").and_then(|s| s.shape()), Some("box3d"));
    /// assert!(style.category_style("aws.network").is_some());
    /// assert!(style.category_style("gcp.network").is_none());
    /// ```
    pub fn category_style(&self, category: &str) -> Option<&CategoryStyle> {
        let mut name = category;
        loop {
            if let Some(style) = self.categories.get(name) {
                return Some(style);
            }
            let (parent, _) = name.rsplit_once('.')?;
            name = parent;
        }
    }

    /// Returns every configured category style in file order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryStyle)> {
        self.categories
            .iter()
            .map(|(name, style)| (name.as_str(), style))
    }
}

fn parse_color(value: Option<&str>, what: &str) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {what} in config: {err}"))
}
