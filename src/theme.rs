//! Colors for every widget. `dark` (Nord) and `light` (Solarized Light) are
//! built in; `custom` is `dark` with hex overrides from `[theme.custom]`.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    pub breadcrumb_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub border_fg: Color,
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Fixed per palette; `[theme.custom]` cannot set these.
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

pub fn dark_theme() -> ThemeColors {
    let snow = rgb(0xeceff4);
    let frost = rgb(0x88c0d0);
    ThemeColors {
        tree_fg: snow,
        tree_selected_bg: rgb(0x434c5e),
        tree_selected_fg: snow,
        tree_dir_fg: frost,
        tree_file_fg: rgb(0xd8dee9),
        breadcrumb_fg: rgb(0xebcb8b),
        status_bg: rgb(0x2e3440),
        status_fg: snow,
        border_fg: rgb(0x4c566a),
        dialog_bg: rgb(0x3b4252),
        dialog_border_fg: frost,
        error_fg: rgb(0xbf616a),
        warning_fg: rgb(0xebcb8b),
        success_fg: rgb(0xa3be8c),
        info_fg: rgb(0x81a1c1),
        accent_fg: rgb(0xb48ead),
        dim_fg: rgb(0x7b88a1),
    }
}

pub fn light_theme() -> ThemeColors {
    let base00 = rgb(0x657b83);
    let blue = rgb(0x268bd2);
    ThemeColors {
        tree_fg: rgb(0x586e75),
        tree_selected_bg: rgb(0xeee8d5),
        tree_selected_fg: rgb(0x073642),
        tree_dir_fg: blue,
        tree_file_fg: base00,
        breadcrumb_fg: rgb(0xb58900),
        status_bg: rgb(0xeee8d5),
        status_fg: rgb(0x586e75),
        border_fg: rgb(0x93a1a1),
        dialog_bg: rgb(0xfdf6e3),
        dialog_border_fg: blue,
        error_fg: rgb(0xdc322f),
        warning_fg: rgb(0xcb4b16),
        success_fg: rgb(0x859900),
        info_fg: blue,
        accent_fg: rgb(0x6c71c4),
        dim_fg: rgb(0x93a1a1),
    }
}

/// `#rrggbb` or `rrggbb`; anything else is `None`.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb)
}

pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref() {
        Some("light") => light_theme(),
        Some("custom") => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let slots = [
        (&mut theme.tree_fg, &custom.tree_fg),
        (&mut theme.tree_selected_bg, &custom.tree_selected_bg),
        (&mut theme.tree_selected_fg, &custom.tree_selected_fg),
        (&mut theme.tree_dir_fg, &custom.tree_dir_fg),
        (&mut theme.tree_file_fg, &custom.tree_file_fg),
        (&mut theme.breadcrumb_fg, &custom.breadcrumb_fg),
        (&mut theme.status_bg, &custom.status_bg),
        (&mut theme.status_fg, &custom.status_fg),
        (&mut theme.border_fg, &custom.border_fg),
        (&mut theme.dialog_bg, &custom.dialog_bg),
        (&mut theme.dialog_border_fg, &custom.dialog_border_fg),
    ];
    for (slot, hex) in slots {
        // Invalid hex leaves the palette color in place.
        if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("88c0d0"), Some(Color::Rgb(136, 192, 208)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
        assert_eq!(parse_hex_color("+12345"), None);
        assert_eq!(parse_hex_color("#ééé"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn scheme_selection() {
        let dark = resolve_theme(&ThemeConfig::default());
        assert_eq!(dark.tree_dir_fg, Color::Rgb(0x88, 0xc0, 0xd0));

        let light = resolve_theme(&ThemeConfig {
            scheme: Some("light".into()),
            custom: None,
        });
        assert_eq!(light.tree_dir_fg, Color::Rgb(0x26, 0x8b, 0xd2));

        let unknown = resolve_theme(&ThemeConfig {
            scheme: Some("neon".into()),
            custom: None,
        });
        assert_eq!(unknown.tree_dir_fg, dark.tree_dir_fg);
    }

    #[test]
    fn custom_overrides_on_dark() {
        let theme = resolve_theme(&ThemeConfig {
            scheme: Some("custom".into()),
            custom: Some(ThemeColorsConfig {
                breadcrumb_fg: Some("#c0caf5".into()),
                border_fg: Some("#zzzzzz".into()),
                ..Default::default()
            }),
        });
        assert_eq!(theme.breadcrumb_fg, Color::Rgb(192, 202, 245));
        assert_eq!(theme.border_fg, dark_theme().border_fg);
    }

    #[test]
    fn builtin_schemes_ignore_custom_block() {
        let theme = resolve_theme(&ThemeConfig {
            scheme: Some("light".into()),
            custom: Some(ThemeColorsConfig {
                tree_dir_fg: Some("#000000".into()),
                ..Default::default()
            }),
        });
        assert_eq!(theme.tree_dir_fg, light_theme().tree_dir_fg);
    }
}
