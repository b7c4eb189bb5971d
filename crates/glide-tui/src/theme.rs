use ratatui::style::Color;

/// Colors used by the pager
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Palette colors
    pub yellow: Color,
    pub aqua: Color,

    // Semantic colors
    pub selection: Color,
    pub fold: Color,
    pub alert: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            yellow: Color::Rgb(0xd8, 0xa6, 0x57),
            aqua: Color::Rgb(0x89, 0xb4, 0x82),
            selection: Color::Rgb(0x45, 0x40, 0x3d),
            fold: Color::Rgb(0x7d, 0xae, 0xa3),
            alert: Color::Rgb(0xea, 0x69, 0x62),
        }
    }
}
