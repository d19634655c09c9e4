use crate::document::model::ThemeId;
use crate::document::token::TokenKind;
use crate::foundation::core::Rgba8;

/// Fixed palette for one [`ThemeId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Canvas background.
    pub background: Rgba8,
    /// Identifiers and fallback text.
    pub text: Rgba8,
    /// Keywords.
    pub keyword: Rgba8,
    /// Numeric literals.
    pub number: Rgba8,
    /// String literals.
    pub string: Rgba8,
    /// Comments.
    pub comment: Rgba8,
    /// Operators and delimiters.
    pub punctuation: Rgba8,
    /// End-of-sequence marker.
    pub marker: Rgba8,
}

static DARK: Theme = Theme {
    background: Rgba8::rgb(0x1e1e2e),
    text: Rgba8::rgb(0xcdd6f4),
    keyword: Rgba8::rgb(0xcba6f7),
    number: Rgba8::rgb(0xfab387),
    string: Rgba8::rgb(0xa6e3a1),
    comment: Rgba8::rgb(0x6c7086),
    punctuation: Rgba8::rgb(0x94e2d5),
    marker: Rgba8::rgb(0xf38ba8),
};

static LIGHT: Theme = Theme {
    background: Rgba8::rgb(0xfafafa),
    text: Rgba8::rgb(0x383a42),
    keyword: Rgba8::rgb(0xa626a4),
    number: Rgba8::rgb(0x986801),
    string: Rgba8::rgb(0x50a14f),
    comment: Rgba8::rgb(0xa0a1a7),
    punctuation: Rgba8::rgb(0x0184bc),
    marker: Rgba8::rgb(0xe45649),
};

impl Theme {
    /// Palette for a theme id.
    pub fn get(id: ThemeId) -> &'static Theme {
        match id {
            ThemeId::Dark => &DARK,
            ThemeId::Light => &LIGHT,
        }
    }

    /// Ink color for a token kind.
    pub fn color_for(&self, kind: TokenKind) -> Rgba8 {
        match kind {
            TokenKind::Keyword => self.keyword,
            TokenKind::Number => self.number,
            TokenKind::String => self.string,
            TokenKind::Comment => self.comment,
            TokenKind::Punctuation => self.punctuation,
            TokenKind::Identifier | TokenKind::Whitespace | TokenKind::Newline => self.text,
        }
    }
}
