use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
}

/// Presentation colours and typography. Pure metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub name: String,
    pub font_family: String,
    pub font_color: String,
    pub background_color: String,
    pub slide_background_color: String,
    pub accent_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navbar_color: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ThemeKind,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            font_family: "'Inter', sans-serif".to_string(),
            font_color: "#333333".to_string(),
            background_color: "#f0f0f0".to_string(),
            slide_background_color: "#ffffff".to_string(),
            accent_color: "#3b82f6".to_string(),
            gradient_background: None,
            sidebar_color: None,
            navbar_color: None,
            kind: ThemeKind::Light,
        }
    }
}

impl Theme {
    fn dark(name: &str, font_family: &str, accent: &str, background: &str, slide: &str) -> Self {
        Self {
            name: name.to_string(),
            font_family: font_family.to_string(),
            font_color: "#f5f5f5".to_string(),
            background_color: background.to_string(),
            slide_background_color: slide.to_string(),
            accent_color: accent.to_string(),
            gradient_background: None,
            sidebar_color: Some(background.to_string()),
            navbar_color: Some(slide.to_string()),
            kind: ThemeKind::Dark,
        }
    }
}

/// Built-in themes, the default first.
pub fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme::default(),
        Theme {
            name: "Paper".to_string(),
            font_family: "'Georgia', serif".to_string(),
            font_color: "#2d2a26".to_string(),
            background_color: "#f7f3ea".to_string(),
            slide_background_color: "#fffdf8".to_string(),
            accent_color: "#b45309".to_string(),
            ..Theme::default()
        },
        Theme {
            name: "Ocean".to_string(),
            accent_color: "#0891b2".to_string(),
            gradient_background: Some("linear-gradient(135deg, #e0f2fe 0%, #ecfeff 100%)".to_string()),
            ..Theme::default()
        },
        Theme::dark("Midnight", "'Inter', sans-serif", "#818cf8", "#0f172a", "#1e293b"),
        Theme::dark("Ember", "'Poppins', sans-serif", "#f97316", "#1c1917", "#292524"),
    ]
}

/// Look up a built-in theme by name, falling back to the default.
pub fn theme_by_name(name: &str) -> Theme {
    builtin_themes()
        .into_iter()
        .find(|t| t.name == name)
        .unwrap_or_default()
}
