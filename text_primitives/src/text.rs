// Copyright 2025 the DALi Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// The resolved direction of a character.
///
/// Produced by the bidirectional algorithm upstream. A text without any right-to-left content
/// usually carries no direction buffer at all, which is equivalent to every character being
/// [`LeftToRight`](Self::LeftToRight).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[repr(u8)]
pub enum CharacterDirection {
    /// Left-to-right.
    #[default]
    LeftToRight = 0,
    /// Right-to-left.
    RightToLeft = 1,
}

impl CharacterDirection {
    /// Returns `true` for [`RightToLeft`](Self::RightToLeft).
    #[inline]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::RightToLeft)
    }

    /// Converts a "right to left" flag into a direction.
    #[inline]
    pub const fn from_rtl(rtl: bool) -> Self {
        if rtl {
            Self::RightToLeft
        } else {
            Self::LeftToRight
        }
    }
}

/// Line break opportunity after a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[repr(u8)]
pub enum LineBreakInfo {
    /// The line must be broken after this character (end of paragraph or end of text).
    MustBreak = 0,
    /// The line may be broken after this character.
    AllowBreak = 1,
    /// The line can't be broken after this character.
    #[default]
    NoBreak = 2,
}

/// Word boundary after a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[repr(u8)]
pub enum WordBreakInfo {
    /// A word ends after this character.
    WordBreak = 0,
    /// This character doesn't end a word.
    #[default]
    NoBreak = 1,
}

/// Whether the character is a white space for layout purposes.
///
/// White spaces don't count towards the overflow test of a line and are reported as the line's
/// trailing length instead.
pub fn is_white_space(character: char) -> bool {
    matches!(
        character,
        '\u{0009}'..='\u{000D}' | '\u{0020}' | '\u{0085}' | '\u{00A0}' | '\u{1680}'
            | '\u{2000}'..='\u{200A}' | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}'
            | '\u{3000}'
    )
}

/// Whether the character ends a paragraph.
pub fn is_new_paragraph(character: char) -> bool {
    matches!(
        character,
        '\u{000A}' | '\u{000B}' | '\u{000C}' | '\u{000D}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_space_classification() {
        for c in [' ', '\t', '\n', '\u{00A0}', '\u{3000}'] {
            assert!(is_white_space(c), "{c:?} should be a white space");
        }
        for c in ['a', '0', '\u{0627}', '.'] {
            assert!(!is_white_space(c), "{c:?} should not be a white space");
        }
    }

    #[test]
    fn new_paragraph_classification() {
        assert!(is_new_paragraph('\n'));
        assert!(is_new_paragraph('\u{2029}'));
        assert!(!is_new_paragraph(' '));
    }

    #[test]
    fn direction_from_flag() {
        assert_eq!(
            CharacterDirection::from_rtl(true),
            CharacterDirection::RightToLeft
        );
        assert!(!CharacterDirection::from_rtl(false).is_rtl());
    }
}
