//! Presentation card for a movie result.
//!
//! [`CARD_STYLE`] is the fixed look of a result card. [`MovieCard`] renders a
//! movie inside that style as a bordered text block for terminals, counting
//! one terminal column per `rem` of padding and margin. Text is measured in
//! display columns, so wide characters take two.

use movie_search_core::movie::Movie;
use std::fmt;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A CSS length in `rem`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rem(pub u16);

impl Rem {
    /// Character cells this length takes in a terminal
    #[must_use]
    pub fn cells(self) -> usize {
        usize::from(self.0)
    }
}

impl fmt::Display for Rem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}rem", self.0)
    }
}

/// Visual properties of a result card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardStyle {
    /// Background color name
    pub background: &'static str,
    /// Corner radius
    pub border_radius: Rem,
    /// Vertical padding
    pub padding_vertical: Rem,
    /// Horizontal padding
    pub padding_horizontal: Rem,
    /// Text color name
    pub color: &'static str,
    /// Space below the card
    pub margin_bottom: Rem,
}

/// The result card style.
pub const CARD_STYLE: CardStyle = CardStyle {
    background: "lightgrey",
    border_radius: Rem(1),
    padding_vertical: Rem(1),
    padding_horizontal: Rem(2),
    color: "black",
    margin_bottom: Rem(1),
};

impl CardStyle {
    /// The style as CSS declarations
    #[must_use]
    pub fn to_css(&self) -> String {
        format!(
            "background-color: {}; border-radius: {}; padding: {} {}; color: {}; margin-bottom: {};",
            self.background,
            self.border_radius,
            self.padding_vertical,
            self.padding_horizontal,
            self.color,
            self.margin_bottom,
        )
    }
}

impl Default for CardStyle {
    fn default() -> Self {
        CARD_STYLE
    }
}

/// Default width of the text area inside a card
pub const DEFAULT_CONTENT_WIDTH: usize = 60;

/// A movie rendered as a card.
///
/// ```
/// use movie_search::card::MovieCard;
/// use movie_search_core::Movie;
///
/// let movie = Movie::new(603, "The Matrix");
/// let card = MovieCard::new(&movie).with_width(20).to_string();
///
/// assert!(card.lines().any(|line| line.contains("The Matrix")));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MovieCard<'a> {
    movie: &'a Movie,
    style: CardStyle,
    width: usize,
}

impl<'a> MovieCard<'a> {
    /// Card with the default style and width
    #[must_use]
    pub fn new(movie: &'a Movie) -> Self {
        Self {
            movie,
            style: CARD_STYLE,
            width: DEFAULT_CONTENT_WIDTH,
        }
    }

    /// Use another style
    #[must_use]
    pub const fn with_style(mut self, style: CardStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the width of the text area (at least one cell)
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self
    }

    fn content(&self) -> Vec<String> {
        let movie = self.movie;
        let mut lines = Vec::new();

        let heading = match movie.release_year() {
            Some(year) => format!("{} ({year})", movie.title),
            None => movie.title.clone(),
        };
        lines.extend(wrap(&heading, self.width));

        if let Some(original) = movie.original_title.as_deref().filter(|o| *o != movie.title) {
            lines.extend(wrap(original, self.width));
        }

        if movie.vote_count > 0 {
            let rating = format!(
                "Rating {:.1}/10 ({} votes)",
                movie.vote_average, movie.vote_count
            );
            lines.extend(wrap(&rating, self.width));
        }

        if !movie.overview.is_empty() {
            lines.push(String::new());
            lines.extend(wrap(&movie.overview, self.width));
        }

        lines
    }
}

impl fmt::Display for MovieCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (top_left, top_right, bottom_left, bottom_right) = if self.style.border_radius.0 > 0 {
            ('╭', '╮', '╰', '╯')
        } else {
            ('┌', '┐', '└', '┘')
        };
        let pad = " ".repeat(self.style.padding_horizontal.cells());
        let inner = self.width + 2 * self.style.padding_horizontal.cells();
        let rule = "─".repeat(inner);
        let blank = " ".repeat(inner);

        writeln!(f, "{top_left}{rule}{top_right}")?;
        for _ in 0..self.style.padding_vertical.cells() {
            writeln!(f, "│{blank}│")?;
        }
        for line in self.content() {
            let fill = " ".repeat(self.width.saturating_sub(line.width()));
            writeln!(f, "│{pad}{line}{fill}{pad}│")?;
        }
        for _ in 0..self.style.padding_vertical.cells() {
            writeln!(f, "│{blank}│")?;
        }
        writeln!(f, "{bottom_left}{rule}{bottom_right}")?;
        for _ in 0..self.style.margin_bottom.cells() {
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Greedy word wrap by display width; words wider than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        for chunk in split_to_width(word, width) {
            let chunk_width = chunk.width();
            let needed = if current_width == 0 {
                chunk_width
            } else {
                current_width + 1 + chunk_width
            };

            if needed > width && current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if current_width > 0 {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(&chunk);
            current_width += chunk_width;
        }
    }

    if current_width > 0 {
        lines.push(current);
    }
    lines
}

/// Cut a word into pieces no wider than `width`. A single character wider
/// than `width` still gets a piece of its own.
fn split_to_width(word: &str, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0;

    for ch in word.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if piece_width + ch_width > width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0;
        }
        piece.push(ch);
        piece_width += ch_width;
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
