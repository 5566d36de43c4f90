//! Reference-counted palette of terminal color pairs.
//!
//! The terminal layer renders a rule's colors through an allocated
//! (foreground, background) pair. The [`Palette`] caches those
//! allocations: acquiring the same pair twice yields two handles onto one
//! shared entry, and the entry is freed when the last [`StyleHandle`] is
//! dropped. Rules therefore never release anything by hand; ownership of
//! the handle is the whole contract.
//!
//! # Usage
//!
//! ```
//! use regstyle::palette::{ColorId, Palette};
//!
//! let palette = Palette::new();
//! let green = palette.acquire(ColorId(2), ColorId(0));
//! let again = palette.acquire(ColorId(2), ColorId(0));
//!
//! // One cached pair, two references.
//! assert_eq!(palette.active_pairs(), 1);
//! assert_eq!(palette.ref_count(ColorId(2), ColorId(0)), 2);
//!
//! drop(green);
//! drop(again);
//! assert_eq!(palette.active_pairs(), 0);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Identifier of a single palette color, as understood by the terminal
/// layer. `0` is conventionally the terminal default.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ColorId(pub u32);

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct PairEntry {
    /// Pair slot as the terminal layer numbers them. Slots are handed out
    /// monotonically and not reused after free.
    index: u32,
    refs: usize,
}

#[derive(Debug, Default)]
struct PaletteInner {
    pairs: HashMap<(ColorId, ColorId), PairEntry>,
    next_index: u32,
}

/// Caching allocator for (foreground, background) color pairs.
///
/// Cloning a `Palette` clones a view onto the same shared pool, so the
/// engine can own one clone while callers keep another for inspection.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    inner: Rc<RefCell<PaletteInner>>,
}

impl Palette {
    /// Empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a handle on the (fg, bg) pair, reusing the cached
    /// allocation when one exists.
    #[must_use]
    pub fn acquire(&self, fg: ColorId, bg: ColorId) -> StyleHandle {
        let mut guard = self.inner.borrow_mut();
        let PaletteInner { pairs, next_index } = &mut *guard;
        let entry = pairs.entry((fg, bg)).or_insert_with(|| {
            let index = *next_index;
            *next_index += 1;
            PairEntry { index, refs: 0 }
        });
        entry.refs += 1;
        let index = entry.index;
        StyleHandle {
            pool: Rc::clone(&self.inner),
            fg,
            bg,
            index,
        }
    }

    /// Number of distinct pairs currently allocated.
    #[must_use]
    pub fn active_pairs(&self) -> usize {
        self.inner.borrow().pairs.len()
    }

    /// Whether the (fg, bg) pair is currently allocated.
    #[must_use]
    pub fn is_active(&self, fg: ColorId, bg: ColorId) -> bool {
        self.inner.borrow().pairs.contains_key(&(fg, bg))
    }

    /// Number of live references to the (fg, bg) pair, `0` if it is not
    /// allocated.
    #[must_use]
    pub fn ref_count(&self, fg: ColorId, bg: ColorId) -> usize {
        self.inner
            .borrow()
            .pairs
            .get(&(fg, bg))
            .map_or(0, |entry| entry.refs)
    }
}

/// Owned reference to an allocated color pair.
///
/// Dropping the handle releases its reference; the pair is freed when the
/// last handle goes away. Cloning bumps the reference count.
pub struct StyleHandle {
    pool: Rc<RefCell<PaletteInner>>,
    fg: ColorId,
    bg: ColorId,
    index: u32,
}

impl StyleHandle {
    /// Foreground color of the pair.
    #[must_use]
    pub const fn fg(&self) -> ColorId {
        self.fg
    }

    /// Background color of the pair.
    #[must_use]
    pub const fn bg(&self) -> ColorId {
        self.bg
    }

    /// The pair as a (fg, bg) tuple.
    #[must_use]
    pub const fn pair(&self) -> (ColorId, ColorId) {
        (self.fg, self.bg)
    }

    /// Pair slot as numbered by the terminal layer.
    #[must_use]
    pub const fn pair_index(&self) -> u32 {
        self.index
    }
}

impl Clone for StyleHandle {
    fn clone(&self) -> Self {
        if let Some(entry) = self.pool.borrow_mut().pairs.get_mut(&(self.fg, self.bg)) {
            entry.refs += 1;
        }
        Self {
            pool: Rc::clone(&self.pool),
            fg: self.fg,
            bg: self.bg,
            index: self.index,
        }
    }
}

impl Drop for StyleHandle {
    fn drop(&mut self) {
        let mut inner = self.pool.borrow_mut();
        if let Some(entry) = inner.pairs.get_mut(&(self.fg, self.bg)) {
            entry.refs -= 1;
            if entry.refs == 0 {
                inner.pairs.remove(&(self.fg, self.bg));
            }
        }
    }
}

impl fmt::Debug for StyleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleHandle")
            .field("fg", &self.fg)
            .field("bg", &self.bg)
            .field("index", &self.index)
            .finish()
    }
}
