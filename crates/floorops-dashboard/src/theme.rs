use floorops_core::{ConnectionState, StatusCategory};
use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy)]
pub struct Theme {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,
    pub title: Color,
    pub text: Color,
    pub muted: Color,
    pub primary: Color,
    pub secondary: Color,
    pub ok: Color,
    pub warn: Color,
    pub critical: Color,
}

pub fn floor_theme() -> Theme {
    Theme {
        bg: Color::Rgb(15, 23, 42),
        surface: Color::Rgb(30, 41, 59),
        border: Color::Rgb(71, 85, 105),
        title: Color::Rgb(191, 219, 254),
        text: Color::Rgb(226, 232, 240),
        muted: Color::Rgb(148, 163, 184),
        primary: Color::Rgb(37, 99, 235),
        secondary: Color::Rgb(100, 116, 139),
        ok: Color::Rgb(16, 185, 129),
        warn: Color::Rgb(245, 158, 11),
        critical: Color::Rgb(239, 68, 68),
    }
}

impl Theme {
    pub fn category_color(self, category: StatusCategory) -> Color {
        match category {
            StatusCategory::Urgent => self.critical,
            StatusCategory::Pending => self.warn,
            StatusCategory::Resolved => self.ok,
            StatusCategory::Neutral => self.secondary,
        }
    }

    pub fn badge_style(self, connection: ConnectionState) -> Style {
        let bg = if connection.is_online() {
            self.ok
        } else {
            self.critical
        };
        Style::new()
            .fg(Color::White)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title_style(self) -> Style {
        Style::new().fg(self.title).add_modifier(Modifier::BOLD)
    }
}

pub fn category_icon(category: StatusCategory) -> &'static str {
    match category {
        StatusCategory::Urgent => "!",
        StatusCategory::Pending => "~",
        StatusCategory::Resolved => "✓",
        StatusCategory::Neutral => "•",
    }
}

pub fn badge_icon(connection: ConnectionState) -> &'static str {
    if connection.is_online() {
        "●"
    } else {
        "○"
    }
}
