//! Structured terminal styling.
//!
//! Text is composed as [`Styled`] segments grouped into a [`Line`] and only
//! turned into a string at the output boundary, with or without ANSI codes.
//! Nothing ever inspects a rendered string to find out how it was styled.
use std::fmt::Write as _;
use std::io::IsTerminal as _;

/// Visual role of a text segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Default terminal colours.
    Plain,
    /// Bold, used for action verbs.
    Bold,
    /// Cyan, used for paths.
    Highlight,
    /// Yellow, used for warnings.
    Warning,
    /// Red, used for errors and destructive warnings.
    Error,
    /// Green, used for successful outcomes.
    Success,
    /// Dim, used for secondary detail.
    Muted,
    /// Light grey, used for dry-run outcomes.
    Notice,
    /// Bold blue, used for stage markers.
    Heading,
}

impl Style {
    const fn ansi(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Bold => Some("\x1b[1m"),
            Self::Highlight => Some("\x1b[1;36m"),
            Self::Warning => Some("\x1b[33m"),
            Self::Error => Some("\x1b[1;31m"),
            Self::Success => Some("\x1b[32m"),
            Self::Muted => Some("\x1b[2m"),
            Self::Notice => Some("\x1b[37m"),
            Self::Heading => Some("\x1b[1;34m"),
        }
    }
}

/// A run of text carrying a single [`Style`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styled {
    /// The raw text.
    pub text: String,
    /// How the text should be drawn.
    pub style: Style,
}

impl Styled {
    /// Create a segment with an explicit style.
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// An ordered sequence of styled segments forming one line of output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    segments: Vec<Styled>,
}

impl Line {
    /// Create an empty line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Append a segment with the given style.
    #[must_use]
    pub fn push(mut self, text: impl Into<String>, style: Style) -> Self {
        self.segments.push(Styled::new(text, style));
        self
    }

    /// Append plain text.
    #[must_use]
    pub fn plain(self, text: impl Into<String>) -> Self {
        self.push(text, Style::Plain)
    }

    /// Append bold text.
    #[must_use]
    pub fn bold(self, text: impl Into<String>) -> Self {
        self.push(text, Style::Bold)
    }

    /// Append a quoted, highlighted path or name.
    #[must_use]
    pub fn quoted(self, text: impl std::fmt::Display) -> Self {
        self.plain("'")
            .push(text.to_string(), Style::Highlight)
            .plain("'")
    }

    /// Append warning-coloured text.
    #[must_use]
    pub fn warning(self, text: impl Into<String>) -> Self {
        self.push(text, Style::Warning)
    }

    /// Append error-coloured text.
    #[must_use]
    pub fn error(self, text: impl Into<String>) -> Self {
        self.push(text, Style::Error)
    }

    /// Append dimmed text.
    #[must_use]
    pub fn muted(self, text: impl Into<String>) -> Self {
        self.push(text, Style::Muted)
    }

    /// Render the line, emitting ANSI escape codes only when `color` is set.
    #[must_use]
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            match seg.style.ansi() {
                Some(code) if color => {
                    let _ = write!(out, "{code}{}\x1b[0m", seg.text);
                }
                _ => out.push_str(&seg.text),
            }
        }
        out
    }
}

impl std::fmt::Display for Line {
    /// Uncoloured rendering.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Whether stdout should receive colour codes.
///
/// Honours the `NO_COLOR` convention and disables colour when stdout is not
/// a terminal.
#[must_use]
pub fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
