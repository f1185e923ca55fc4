//! Static glyph advance tables for the four reader fonts.
//!
//! Each family is stored once in font units per 1000 em, covering ASCII
//! 0x20..=0x7E (95 printable characters, index = `c as usize - 32`). The
//! pixel advance at point size `s` is `units * s / 1000`; it is kept exactly
//! as `units * s` thousandths of a pixel, so every measurement is an integer
//! and the same text always measures the same on every platform.

use serde::{Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::sync::OnceLock;

const FIRST_PRINTABLE: u32 = 0x20;
const LAST_PRINTABLE: u32 = 0x7E;
const GLYPH_COUNT: usize = 95;

/// Horizontal extent in thousandths of a pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Width(u64);

impl Width {
    pub const ZERO: Width = Width(0);

    pub const fn from_px(px: u32) -> Self {
        Width(px as u64 * 1000)
    }

    pub const fn from_millipx(millipx: u64) -> Self {
        Width(millipx)
    }

    pub const fn millipx(self) -> u64 {
        self.0
    }

    pub fn as_px(self) -> f32 {
        self.0 as f32 / 1000.0
    }

    pub fn saturating_sub(self, other: Width) -> Width {
        Width(self.0.saturating_sub(other.0))
    }
}

impl Add for Width {
    type Output = Width;

    fn add(self, rhs: Width) -> Width {
        Width(self.0 + rhs.0)
    }
}

impl AddAssign for Width {
    fn add_assign(&mut self, rhs: Width) {
        self.0 += rhs.0;
    }
}

impl Sum for Width {
    fn sum<I: Iterator<Item = Width>>(iter: I) -> Width {
        iter.fold(Width::ZERO, Add::add)
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.as_px())
    }
}

/// Serialized as fractional pixels; that is what the rasterizer consumes.
impl Serialize for Width {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0 as f64 / 1000.0)
    }
}

/// Reader font family. Names match the settings menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Arial,
    Georgia,
    SanFrancisco,
    TimesNewRoman,
}

impl FontFamily {
    pub const ALL: [FontFamily; 4] = [
        FontFamily::Arial,
        FontFamily::Georgia,
        FontFamily::SanFrancisco,
        FontFamily::TimesNewRoman,
    ];

    /// Name as shown in the settings menu and written into the settings stamp.
    pub fn display_name(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Georgia => "Georgia",
            FontFamily::SanFrancisco => "San Francisco",
            FontFamily::TimesNewRoman => "Times New Roman",
        }
    }

    /// Lower-case name with spaces removed, the prefix of a variant key.
    pub fn key(self) -> &'static str {
        match self {
            FontFamily::Arial => "arial",
            FontFamily::Georgia => "georgia",
            FontFamily::SanFrancisco => "sanfrancisco",
            FontFamily::TimesNewRoman => "timesnewroman",
        }
    }

    /// Accepts the display name or the key, case-insensitively.
    pub fn from_name(name: &str) -> Option<FontFamily> {
        let squashed: String = name
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        FontFamily::ALL.into_iter().find(|f| f.key() == squashed)
    }

    fn units(self) -> &'static [u16; GLYPH_COUNT] {
        match self {
            FontFamily::Arial => &ARIAL_UNITS,
            FontFamily::Georgia => &GEORGIA_UNITS,
            FontFamily::SanFrancisco => &SAN_FRANCISCO_UNITS,
            FontFamily::TimesNewRoman => &TIMES_NEW_ROMAN_UNITS,
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Supported point sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontSize {
    Pt18,
    Pt24,
    Pt30,
    Pt36,
}

impl FontSize {
    pub const ALL: [FontSize; 4] = [FontSize::Pt18, FontSize::Pt24, FontSize::Pt30, FontSize::Pt36];

    pub fn points(self) -> u32 {
        match self {
            FontSize::Pt18 => 18,
            FontSize::Pt24 => 24,
            FontSize::Pt30 => 30,
            FontSize::Pt36 => 36,
        }
    }

    pub fn from_points(points: u32) -> Option<FontSize> {
        FontSize::ALL.into_iter().find(|s| s.points() == points)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.points())
    }
}

/// A (family, size) pair; the key into the metrics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontVariant {
    pub family: FontFamily,
    pub size: FontSize,
}

impl FontVariant {
    pub fn new(family: FontFamily, size: FontSize) -> Self {
        Self { family, size }
    }

    /// Every supported variant, family-major.
    pub fn all() -> impl Iterator<Item = FontVariant> {
        FontFamily::ALL
            .into_iter()
            .flat_map(|family| FontSize::ALL.into_iter().map(move |size| FontVariant { family, size }))
    }

    /// Metric key, e.g. `sanfrancisco18`.
    pub fn key(self) -> String {
        format!("{}{}", self.family.key(), self.size.points())
    }

    /// Inverse of [FontVariant::key].
    pub fn from_key(key: &str) -> Option<FontVariant> {
        FontVariant::all().find(|v| v.key() == key)
    }

    fn table_index(self) -> usize {
        let family = FontFamily::ALL
            .iter()
            .position(|f| *f == self.family)
            .unwrap_or(0);
        let size = FontSize::ALL
            .iter()
            .position(|s| *s == self.size)
            .unwrap_or(0);
        family * FontSize::ALL.len() + size
    }
}

impl Default for FontVariant {
    fn default() -> Self {
        FontVariant::new(FontFamily::SanFrancisco, FontSize::Pt18)
    }
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Width given to characters outside 0x20..=0x7E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedGlyph {
    /// Same advance as the space character.
    #[default]
    SpaceWidth,
    Fixed(Width),
}

/// Advance widths for one font variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMetrics {
    advances: [Width; GLYPH_COUNT],
    unmapped: Width,
}

static TABLES: OnceLock<Vec<GlyphMetrics>> = OnceLock::new();

impl GlyphMetrics {
    /// Shared table for a built-in variant. Built on first use, never mutated.
    pub fn for_variant(variant: FontVariant) -> &'static GlyphMetrics {
        let tables = TABLES.get_or_init(|| FontVariant::all().map(GlyphMetrics::build).collect());
        &tables[variant.table_index()]
    }

    fn build(variant: FontVariant) -> GlyphMetrics {
        let points = u64::from(variant.size.points());
        let units = variant.family.units();
        let advances: [Width; GLYPH_COUNT] = std::array::from_fn(|i| Width::from_millipx(u64::from(units[i]) * points));
        GlyphMetrics {
            unmapped: advances[0],
            advances,
        }
    }

    /// Constant-width table: every glyph, space included, advances by `width`.
    pub fn uniform(width: Width) -> GlyphMetrics {
        GlyphMetrics {
            advances: [width; GLYPH_COUNT],
            unmapped: width,
        }
    }

    /// Copy of this table with a different unmapped-glyph policy.
    pub fn with_unmapped(&self, policy: UnmappedGlyph) -> GlyphMetrics {
        let unmapped = match policy {
            UnmappedGlyph::SpaceWidth => self.space_width(),
            UnmappedGlyph::Fixed(w) => w,
        };
        GlyphMetrics {
            advances: self.advances,
            unmapped,
        }
    }

    pub fn advance(&self, c: char) -> Width {
        let code = c as u32;
        if (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&code) {
            self.advances[(code - FIRST_PRINTABLE) as usize]
        } else {
            self.unmapped
        }
    }

    pub fn space_width(&self) -> Width {
        self.advances[0]
    }

    pub fn unmapped_width(&self) -> Width {
        self.unmapped
    }

    /// Sum of the advances of every character in `s`.
    pub fn measure(&self, s: &str) -> Width {
        s.chars().map(|c| self.advance(c)).sum()
    }
}

/// Advance of `c` in `variant`, using the shared tables.
pub fn width(variant: FontVariant, c: char) -> Width {
    GlyphMetrics::for_variant(variant).advance(c)
}

// Width tables, font units per 1000 em.
//
// Slot layout:
// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
// [16..25]=0-9
// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
// [33..58]=A-Z
// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
// [65..90]=a-z
// [91]={  [92]=|  [93]=}  [94]=~

#[rustfmt::skip]
static ARIAL_UNITS: [u16; GLYPH_COUNT] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0    1    2    3    4    5    6    7    8    9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
static GEORGIA_UNITS: [u16; GLYPH_COUNT] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    241, 331, 411, 643, 609, 817, 710, 215, 375, 375, 472, 643, 269, 374, 269, 468,
    // 0    1    2    3    4    5    6    7    8    9
    614, 429, 560, 553, 583, 523, 582, 505, 628, 582,
    // :    ;    <    =    >    ?    @
    269, 269, 643, 643, 643, 476, 931,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    671, 651, 643, 739, 635, 591, 717, 816, 385, 504, 688, 593, 886,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    743, 745, 603, 745, 695, 565, 617, 737, 669, 993, 706, 615, 602,
    // [    \    ]    ^    _    `
    375, 468, 375, 643, 643, 500,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    502, 546, 451, 559, 486, 325, 496, 577, 285, 283, 527, 276, 866,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    578, 525, 553, 541, 419, 431, 338, 570, 492, 754, 483, 490, 442,
    // {    |    }    ~
    375, 375, 375, 643,
];

#[rustfmt::skip]
static SAN_FRANCISCO_UNITS: [u16; GLYPH_COUNT] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    272, 292, 404, 602, 602, 899, 714, 228, 352, 352, 459, 602, 264, 406, 264, 370,
    // 0    1    2    3    4    5    6    7    8    9
    602, 602, 602, 602, 602, 602, 602, 602, 602, 602,
    // :    ;    <    =    >    ?    @
    264, 264, 602, 602, 602, 499, 941,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    675, 654, 713, 727, 599, 582, 739, 740, 256, 541, 654, 559, 883,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    740, 768, 634, 768, 649, 624, 602, 725, 675, 972, 656, 639, 627,
    // [    \    ]    ^    _    `
    352, 370, 352, 602, 416, 371,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    535, 591, 540, 591, 556, 343, 588, 572, 237, 237, 525, 237, 858,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    572, 577, 591, 591, 366, 508, 347, 572, 530, 782, 519, 532, 511,
    // {    |    }    ~
    352, 266, 352, 602,
];

#[rustfmt::skip]
static TIMES_NEW_ROMAN_UNITS: [u16; GLYPH_COUNT] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    // 0    1    2    3    4    5    6    7    8    9
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    // :    ;    <    =    >    ?    @
    278, 278, 564, 564, 564, 444, 921,
    // A    B    C    D    E    F    G    H    I    J    K    L    M
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    // N    O    P    Q    R    S    T    U    V    W    X    Y    Z
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    // [    \    ]    ^    _    `
    333, 278, 333, 469, 500, 333,
    // a    b    c    d    e    f    g    h    i    j    k    l    m
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    // n    o    p    q    r    s    t    u    v    w    x    y    z
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    // {    |    }    ~
    480, 200, 480, 541,
];
