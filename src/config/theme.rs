use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

use crate::chat::{NoticeLevel, Origin};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
    pub focus: FocusStyle,
    pub chat: ChatStyle,
    pub notifications: NotificationStyle,
    pub spinner: SpinnerThemeStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
            focus: FocusStyle::default(),
            chat: ChatStyle::default(),
            notifications: NotificationStyle::default(),
            spinner: SpinnerThemeStyle::default(),
        }
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self::default()
    }

    /// Green palette matching the fertilizer brand
    pub fn field() -> Self {
        Self {
            name: "field".to_string(),
            colors: ThemeColors {
                background: HexColor::new("#0f1a12"),
                foreground: HexColor::new("#e3f1e0"),
                primary: HexColor::new("#4caf50"),
                secondary: HexColor::new("#8bc34a"),
                accent: HexColor::new("#cddc39"),
                success: HexColor::new("#66bb6a"),
                warning: HexColor::new("#ffca28"),
                error: HexColor::new("#ef5350"),
                muted: HexColor::new("#6b7f6e"),
            },
            focus: FocusStyle {
                focused_border: HexColor::new("#4caf50"),
                unfocused_border: HexColor::new("#2e3d31"),
                focused_title: HexColor::new("#cddc39"),
                unfocused_title: HexColor::new("#6b7f6e"),
                use_bold_focused: true,
            },
            chat: ChatStyle {
                user_fg: HexColor::new("#0f1a12"),
                user_bg: HexColor::new("#66bb6a"),
                agent_fg: HexColor::new("#e3f1e0"),
                agent_bg: HexColor::new("#1f2e22"),
                ..ChatStyle::default()
            },
            ..Default::default()
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "default" | "dark" => Some(Self::dark()),
            "field" => Some(Self::field()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub background: HexColor,
    pub foreground: HexColor,
    pub primary: HexColor,
    pub secondary: HexColor,
    pub accent: HexColor,
    pub success: HexColor,
    pub warning: HexColor,
    pub error: HexColor,
    pub muted: HexColor,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            background: HexColor::new("#1a1b26"),
            foreground: HexColor::new("#c0caf5"),
            primary: HexColor::new("#7aa2f7"),
            secondary: HexColor::new("#9ece6a"),
            accent: HexColor::new("#bb9af7"),
            success: HexColor::new("#9ece6a"),
            warning: HexColor::new("#e0af68"),
            error: HexColor::new("#f7768e"),
            muted: HexColor::new("#565f89"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusStyle {
    pub focused_border: HexColor,
    pub unfocused_border: HexColor,
    pub focused_title: HexColor,
    pub unfocused_title: HexColor,
    pub use_bold_focused: bool,
}

impl Default for FocusStyle {
    fn default() -> Self {
        Self {
            focused_border: HexColor::new("#7aa2f7"),
            unfocused_border: HexColor::new("#3b4261"),
            focused_title: HexColor::new("#bb9af7"),
            unfocused_title: HexColor::new("#565f89"),
            use_bold_focused: true,
        }
    }
}

/// Transcript bubbles, quick-prompt chips and the status header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatStyle {
    pub user_fg: HexColor,
    pub user_bg: HexColor,
    pub agent_fg: HexColor,
    pub agent_bg: HexColor,
    pub timestamp_fg: HexColor,
    pub online: HexColor,
    pub offline: HexColor,
    pub chip_fg: HexColor,
    pub chip_bg: HexColor,
    pub chip_selected_fg: HexColor,
    pub chip_selected_bg: HexColor,
    pub locked_fg: HexColor,
}

impl Default for ChatStyle {
    fn default() -> Self {
        Self {
            user_fg: HexColor::new("#1a1b26"),
            user_bg: HexColor::new("#7aa2f7"),
            agent_fg: HexColor::new("#c0caf5"),
            agent_bg: HexColor::new("#24283b"),
            timestamp_fg: HexColor::new("#565f89"),
            online: HexColor::new("#9ece6a"),
            offline: HexColor::new("#f7768e"),
            chip_fg: HexColor::new("#c0caf5"),
            chip_bg: HexColor::new("#24283b"),
            chip_selected_fg: HexColor::new("#1a1b26"),
            chip_selected_bg: HexColor::new("#9ece6a"),
            locked_fg: HexColor::new("#565f89"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationStyle {
    pub info_fg: HexColor,
    pub info_bg: HexColor,
    pub warning_fg: HexColor,
    pub warning_bg: HexColor,
    pub error_fg: HexColor,
    pub error_bg: HexColor,
}

impl Default for NotificationStyle {
    fn default() -> Self {
        Self {
            info_fg: HexColor::new("#c0caf5"),
            info_bg: HexColor::new("#24283b"),
            warning_fg: HexColor::new("#1a1b26"),
            warning_bg: HexColor::new("#e0af68"),
            error_fg: HexColor::new("#c0caf5"),
            error_bg: HexColor::new("#f7768e"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerThemeStyle {
    pub default_style: String,
    pub color: HexColor,
}

impl Default for SpinnerThemeStyle {
    fn default() -> Self {
        Self {
            default_style: "dots".to_string(),
            color: HexColor::new("#7dcfff"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    pub fn new(hex: &str) -> Self {
        Self(hex.to_string())
    }

    pub fn to_color(&self) -> Color {
        self.parse_hex().unwrap_or(Color::Reset)
    }

    fn parse_hex(&self) -> Option<Color> {
        let hex = self.0.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Color::Rgb(r, g, b))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self("#ffffff".to_string())
    }
}

impl Theme {
    pub fn border_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.focus.focused_border.to_color()
        } else {
            self.focus.unfocused_border.to_color()
        };

        let mut style = Style::default().fg(color);
        if focused && self.focus.use_bold_focused {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    pub fn title_style(&self, focused: bool) -> Style {
        let color = if focused {
            self.focus.focused_title.to_color()
        } else {
            self.focus.unfocused_title.to_color()
        };

        let mut style = Style::default().fg(color);
        if focused && self.focus.use_bold_focused {
            style = style.add_modifier(Modifier::BOLD);
        }
        style
    }

    pub fn bubble_style(&self, origin: Origin) -> Style {
        match origin {
            Origin::User => Style::default()
                .fg(self.chat.user_fg.to_color())
                .bg(self.chat.user_bg.to_color()),
            Origin::Agent => Style::default()
                .fg(self.chat.agent_fg.to_color())
                .bg(self.chat.agent_bg.to_color()),
        }
    }

    pub fn status_color(&self, online: bool) -> Color {
        if online {
            self.chat.online.to_color()
        } else {
            self.chat.offline.to_color()
        }
    }

    pub fn chip_style(&self, selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(self.chat.chip_selected_fg.to_color())
                .bg(self.chat.chip_selected_bg.to_color())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.chat.chip_fg.to_color())
                .bg(self.chat.chip_bg.to_color())
        }
    }

    pub fn notice_style(&self, level: NoticeLevel) -> Style {
        let (fg, bg) = match level {
            NoticeLevel::Info => (&self.notifications.info_fg, &self.notifications.info_bg),
            NoticeLevel::Warning => (&self.notifications.warning_fg, &self.notifications.warning_bg),
            NoticeLevel::Error => (&self.notifications.error_fg, &self.notifications.error_bg),
        };
        Style::default().fg(fg.to_color()).bg(bg.to_color())
    }
}
