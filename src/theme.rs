//! Page color themes selectable from the sidebar

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Default,
    Dark,
    Light,
}

/// Background and foreground colors for a theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Default, Theme::Dark, Theme::Light];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Default => "Default",
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    /// Parse a theme name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Theme> {
        Theme::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Default => Palette { background: "#f0f2f6", foreground: "black" },
            Theme::Dark => Palette { background: "#111", foreground: "white" },
            Theme::Light => Palette { background: "#fff", foreground: "black" },
        }
    }

    /// Raw style block injected into the page body
    pub fn style_directive(&self) -> String {
        let p = self.palette();
        format!(
            "<style>body {{background-color: {}; color: {};}}</style>",
            p.background, p.foreground
        )
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
