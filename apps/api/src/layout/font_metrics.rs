//! Font descriptors and the text-measurement seam consumed by the layout engine.
//!
//! `TextMeasurer` is the only capability the wrapper and block renderer need.
//! The real implementation lives in `crate::fonts::FontSet` (glyph advances from
//! the registered face). `StaticMetrics` is a static per-character width table
//! used when no outline font could be registered at all.
//!
//! Static widths are in em units (relative to font size) and cover ASCII
//! 0x20..=0x7E. Index = (char as usize) - 32.

// ────────────────────────────────────────────────────────────────────────────
// Font descriptor
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// Family, pixel size and weight of one run of text. Built per block type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    pub family: String,
    /// Font size in CSS pixels (one em).
    pub size: u32,
    pub weight: FontWeight,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, size: u32, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            size,
            weight,
        }
    }

    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement capability
// ────────────────────────────────────────────────────────────────────────────

/// Returns the rendered pixel width of `text` in `font`.
///
/// Must be deterministic for identical inputs: the wrapper relies on it to
/// produce the same lines for the same request.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32;
}

// ────────────────────────────────────────────────────────────────────────────
// Static metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table approximating a humanist sans-serif.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
#[derive(Debug)]
pub struct StaticMetrics {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    /// Bold runs are this much wider than regular ones.
    pub bold_expansion: f32,
}

impl StaticMetrics {
    /// Width of `s` in em units at regular weight.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }
}

impl TextMeasurer for StaticMetrics {
    fn measure(&self, text: &str, font: &FontDescriptor) -> f32 {
        let em = self.measure_em(text) * font.size as f32;
        if font.is_bold() {
            em * self.bold_expansion
        } else {
            em
        }
    }
}

pub static SANS_METRICS: StaticMetrics = StaticMetrics {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        0.28, 0.28, 0.36, 0.56, 0.56, 0.89, 0.67, 0.19, 0.33, 0.33, 0.39, 0.58, 0.28, 0.33, 0.28, 0.28,
        // 0     1     2     3     4     5     6     7     8     9
        0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56, 0.56,
        // :     ;     <     =     >     ?     @
        0.28, 0.28, 0.58, 0.58, 0.58, 0.56, 1.02,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        0.67, 0.67, 0.72, 0.72, 0.67, 0.61, 0.78, 0.72, 0.28, 0.50, 0.67, 0.56, 0.83,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        0.72, 0.78, 0.67, 0.78, 0.72, 0.67, 0.61, 0.72, 0.67, 0.94, 0.67, 0.67, 0.61,
        // [     \     ]     ^     _     `
        0.28, 0.28, 0.28, 0.47, 0.56, 0.33,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        0.56, 0.56, 0.50, 0.56, 0.56, 0.28, 0.56, 0.56, 0.22, 0.22, 0.50, 0.22, 0.83,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        0.56, 0.56, 0.56, 0.56, 0.33, 0.50, 0.28, 0.56, 0.50, 0.72, 0.50, 0.50, 0.50,
        // {     |     }     ~
        0.33, 0.26, 0.33, 0.58,
    ],
    average_char_width: 0.56,
    bold_expansion: 1.08,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn font(size: u32, weight: FontWeight) -> FontDescriptor {
        FontDescriptor::new("Sans", size, weight)
    }

    #[test]
    fn test_measure_empty_returns_zero() {
        assert_eq!(SANS_METRICS.measure("", &font(48, FontWeight::Normal)), 0.0);
    }

    #[test]
    fn test_measure_scales_with_font_size() {
        let small = SANS_METRICS.measure("Rust", &font(10, FontWeight::Normal));
        let large = SANS_METRICS.measure("Rust", &font(20, FontWeight::Normal));
        assert!(
            (large - small * 2.0).abs() < 1e-3,
            "doubling size should double width: {small} vs {large}"
        );
    }

    #[test]
    fn test_measure_ascii_characters() {
        // "Rust" = R(0.72) + u(0.56) + s(0.50) + t(0.28) = 2.06
        let width = SANS_METRICS.measure_em("Rust");
        assert!((width - 2.06).abs() < 1e-3, "Rust should be ~2.06em, got {width}");
    }

    #[test]
    fn test_non_ascii_falls_back_to_average() {
        let width = SANS_METRICS.measure_em("é");
        assert!((width - SANS_METRICS.average_char_width).abs() < 1e-4);
    }

    #[test]
    fn test_bold_is_wider_than_normal() {
        let normal = SANS_METRICS.measure("Hello World", &font(72, FontWeight::Normal));
        let bold = SANS_METRICS.measure("Hello World", &font(72, FontWeight::Bold));
        assert!(bold > normal);
    }
}
