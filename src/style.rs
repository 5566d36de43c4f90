//! Terminal attribute flags applied alongside a color pair.
//!
//! A rule's style is a palette color pair plus a mask of these flags.
//! Renderers translate the mask into the terminal's attribute escape
//! sequences; not all terminals support all attributes.

use bitflags::bitflags;

bitflags! {
    /// Text rendering attributes (bold, underline, reverse, etc.).
    ///
    /// Attributes combine with bitwise OR. An empty mask means "colors
    /// only".
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct AttrFlags: u32 {
        /// Bold/increased intensity.
        const BOLD      = 0x01;
        /// Dim/decreased intensity.
        const DIM       = 0x02;
        /// Italic (not widely supported).
        const ITALIC    = 0x04;
        /// Underlined text.
        const UNDERLINE = 0x08;
        /// Blinking text (rarely supported).
        const BLINK     = 0x10;
        /// Swapped foreground/background.
        const REVERSE   = 0x20;
        /// Highlighted, where the terminal distinguishes it from reverse.
        const STANDOUT  = 0x40;
    }
}

impl AttrFlags {
    /// Merge two masks.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self::from_bits_retain(self.bits() | other.bits())
    }
}
