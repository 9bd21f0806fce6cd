//! Symbolic icon keys used by floor-plan steps.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    MapPin,
    Flag,
    Anchor,
    Zap,
    ArrowDown,
    Footprints,
    Dumbbell,
    Block,
    Repeat,
    Timer,
    CircleDot,
    ArrowRight,
    Users,
    Trophy,
}

/// Icon used for missing or unknown keys.
pub const NEUTRAL_ICON: Icon = Icon::CircleDot;

const ICON_TABLE: &[(&str, Icon)] = &[
    ("start", Icon::MapPin),
    ("finish", Icon::Flag),
    ("row", Icon::Anchor),
    ("gym", Icon::Zap),
    ("ski", Icon::ArrowDown),
    ("run", Icon::Footprints),
    ("lift", Icon::Dumbbell),
    ("box", Icon::Block),
    ("repeat", Icon::Repeat),
    ("timer", Icon::Timer),
    ("dot", Icon::CircleDot),
    ("arrow", Icon::ArrowRight),
    ("team", Icon::Users),
    ("trophy", Icon::Trophy),
];

/// Total lookup: unknown or absent keys degrade to [`NEUTRAL_ICON`].
pub fn icon_for_key(key: Option<&str>) -> Icon {
    let Some(key) = key else {
        return NEUTRAL_ICON;
    };
    ICON_TABLE
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, icon)| *icon)
        .unwrap_or(NEUTRAL_ICON)
}

impl Icon {
    /// Terminal stand-in for the graphic.
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::MapPin => "📍",
            Icon::Flag => "🏁",
            Icon::Anchor => "⚓",
            Icon::Zap => "⚡",
            Icon::ArrowDown => "⬇",
            Icon::Footprints => "👣",
            Icon::Dumbbell => "🏋",
            Icon::Block => "■",
            Icon::Repeat => "🔁",
            Icon::Timer => "⏱",
            Icon::CircleDot => "◉",
            Icon::ArrowRight => "➡",
            Icon::Users => "👥",
            Icon::Trophy => "🏆",
        }
    }
}
