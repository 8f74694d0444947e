//! Mask patterns and the penalty score used to choose between them.

use crate::error::{InvalidArgument, QrResult};

/// A mask pattern (0–7).
///
/// Each pattern is a pure function of the module coordinates deciding whether a data module is
/// inverted.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Mask {
    /// `(x + y) % 2 == 0`
    Checkerboard = 0,
    /// `y % 2 == 0`
    HorizontalLines = 1,
    /// `x % 3 == 0`
    VerticalLines = 2,
    /// `(x + y) % 3 == 0`
    DiagonalLines = 3,
    /// `(x / 3 + y / 2) % 2 == 0`
    LargeCheckerboard = 4,
    /// `x * y % 2 + x * y % 3 == 0`
    Fields = 5,
    /// `(x * y % 2 + x * y % 3) % 2 == 0`
    Diamonds = 6,
    /// `((x + y) % 2 + x * y % 3) % 2 == 0`
    Meadow = 7,
}

impl Mask {
    /// All eight patterns, in index order.
    pub const ALL: [Mask; 8] = [
        Mask::Checkerboard,
        Mask::HorizontalLines,
        Mask::VerticalLines,
        Mask::DiagonalLines,
        Mask::LargeCheckerboard,
        Mask::Fields,
        Mask::Diamonds,
        Mask::Meadow,
    ];

    /// Creates a mask object from the given number.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::MaskOutOfRange`] if the number is outside [0, 7].
    pub fn new(mask: u8) -> QrResult<Self> {
        Self::ALL
            .get(usize::from(mask))
            .copied()
            .ok_or_else(|| InvalidArgument::MaskOutOfRange(mask).into())
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Whether the module at (x, y) is inverted by this mask.
    pub fn invert(self, x: i32, y: i32) -> bool {
        use Mask::*;
        match self {
            Checkerboard => (x + y) % 2 == 0,
            HorizontalLines => y % 2 == 0,
            VerticalLines => x % 3 == 0,
            DiagonalLines => (x + y) % 3 == 0,
            LargeCheckerboard => (x / 3 + y / 2) % 2 == 0,
            Fields => x * y % 2 + x * y % 3 == 0,
            Diamonds => (x * y % 2 + x * y % 3) % 2 == 0,
            Meadow => ((x + y) % 2 + x * y % 3) % 2 == 0,
        }
    }
}

impl TryFrom<u8> for Mask {
    type Error = crate::error::QrError;

    fn try_from(mask: u8) -> QrResult<Self> {
        Self::new(mask)
    }
}

pub(crate) const PENALTY_N1: i32 = 3;
pub(crate) const PENALTY_N2: i32 = 3;
pub(crate) const PENALTY_N3: i32 = 40;
pub(crate) const PENALTY_N4: i32 = 10;

/// Rule 1 and rule 3 scores of a single row or column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct LinePenalty {
    pub runs: i32,
    pub finder_like: i32,
}

impl LinePenalty {
    pub fn total(self) -> i32 {
        self.runs + self.finder_like
    }
}

/// Scores one line of modules for same-colour runs (rule 1) and finder-like patterns (rule 3).
///
/// `qr_size` is the symbol side length; it stands in for the light quiet zone on both ends.
pub(crate) fn line_penalty<I>(line: I, qr_size: i32) -> LinePenalty
where
    I: IntoIterator<Item = bool>,
{
    let mut result = LinePenalty::default();
    let mut runcolor = false;
    let mut runlen: i32 = 0;
    let mut runhistory = FinderPenalty::new(qr_size);
    for color in line {
        if color == runcolor {
            runlen += 1;
            if runlen == 5 {
                result.runs += PENALTY_N1;
            } else if runlen > 5 {
                result.runs += 1;
            }
        } else {
            runhistory.add_history(runlen);
            if !runcolor {
                result.finder_like += runhistory.count_patterns() * PENALTY_N3;
            }
            runcolor = color;
            runlen = 1;
        }
    }
    result.finder_like += runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3;
    result
}

/// Total penalty of a row-major `size` x `size` grid under all four rules.
pub(crate) fn penalty_score(modules: &[bool], size: i32) -> i32 {
    debug_assert_eq!(modules.len(), (size * size) as usize);
    let n = size as usize;
    let at = |x: usize, y: usize| modules[y * n + x];
    let mut result: i32 = 0;

    // Rules 1 and 3, rows then columns
    for y in 0..n {
        result += line_penalty((0..n).map(|x| at(x, y)), size).total();
    }
    for x in 0..n {
        result += line_penalty((0..n).map(|y| at(x, y)), size).total();
    }

    // Rule 2: uniform 2x2 blocks
    for y in 0..n - 1 {
        for x in 0..n - 1 {
            let color: bool = at(x, y);
            if color == at(x + 1, y) && color == at(x, y + 1) && color == at(x + 1, y + 1) {
                result += PENALTY_N2;
            }
        }
    }

    // Rule 4: dark/light balance
    let dark = modules.iter().filter(|&&m| m).count() as i32;
    result += balance_penalty(dark, size * size);
    result
}

/// 10 points for each full 5% step the dark proportion deviates from 50%.
pub(crate) fn balance_penalty(dark: i32, total: i32) -> i32 {
    let k: i32 = (dark * 20 - total * 10).abs() / total;
    k * PENALTY_N4
}

/// Sliding history of the last seven run lengths on a line, used to spot 1:1:3:1:1 patterns.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(qr_size: i32) -> Self {
        Self {
            qr_size,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            // Add light border to initial run
            currentrunlength += self.qr_size;
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    /// Can only be called immediately after a light run is added.
    ///
    /// Each side with a light margin of at least 4n counts once, provided the opposite side is
    /// at least n wide.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        let core: bool = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n) +
            i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            // Terminate dark run
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        // Add light border to final run
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '#').collect()
    }

    #[test]
    fn test_mask_range() {
        assert_eq!(Mask::new(0).unwrap(), Mask::Checkerboard);
        assert_eq!(Mask::new(7).unwrap().value(), 7);
        assert!(Mask::new(8).is_err());
        for (i, m) in Mask::ALL.iter().enumerate() {
            assert_eq!(usize::from(m.value()), i);
        }
    }

    #[test]
    fn test_mask_formulas_at_origin() {
        // Every formula inverts (0, 0)
        assert!(Mask::ALL.iter().all(|m| m.invert(0, 0)));
        assert!(!Mask::Checkerboard.invert(1, 0));
        assert!(Mask::HorizontalLines.invert(5, 2));
        assert!(!Mask::VerticalLines.invert(1, 3));
        assert!(Mask::LargeCheckerboard.invert(2, 1));
        assert!(!Mask::LargeCheckerboard.invert(3, 0));
    }

    #[test]
    fn test_run_of_five_costs_three() {
        let p = line_penalty(line("#####.#."), 21);
        assert_eq!(p.runs, 3);
    }

    #[test]
    fn test_run_of_six_costs_four() {
        let p = line_penalty(line("######.#"), 21);
        assert_eq!(p.runs, 4);
    }

    #[test]
    fn test_short_runs_are_free() {
        let p = line_penalty(line("####.####.#.##"), 21);
        assert_eq!(p.runs, 0);
    }

    #[test]
    fn test_finder_like_at_line_start() {
        // The virtual light border supplies the leading margin
        let p = line_penalty(line("#.###.#.##"), 21);
        assert_eq!(p.finder_like, PENALTY_N3);
    }

    #[test]
    fn test_finder_like_at_line_end() {
        // The virtual light border supplies the trailing margin
        let p = line_penalty(line("#.#..#.###.#"), 21);
        assert_eq!(p.finder_like, PENALTY_N3);
    }

    #[test]
    fn test_finder_like_with_margin_on_both_sides() {
        let p = line_penalty(line("#.###.#....#.#"), 21);
        assert_eq!(p.finder_like, 2 * PENALTY_N3);
        let bordered = line_penalty(line("#.###.#"), 21);
        assert_eq!(bordered.finder_like, 2 * PENALTY_N3);
    }

    #[test]
    fn test_finder_like_needs_opposite_side_of_width_n() {
        // 1:1:3:1:1 at n = 2 with a wide trailing margin but a single light module before it
        let p = line_penalty(line("#.##..######..##........"), 21);
        assert_eq!(p.finder_like, 0);
    }

    #[test]
    fn test_finder_like_inside_line() {
        let p = line_penalty(line("#.#....#.###.#.#"), 21);
        assert_eq!(p.finder_like, PENALTY_N3);
        let none = line_penalty(line("#.#.#.##.#.#.#.#"), 21);
        assert_eq!(none.finder_like, 0);
    }

    #[test]
    fn test_balance_penalty_steps() {
        assert_eq!(balance_penalty(50, 100), 0);
        assert_eq!(balance_penalty(54, 100), 0);
        assert_eq!(balance_penalty(55, 100), 10);
        assert_eq!(balance_penalty(39, 100), 20);
        assert_eq!(balance_penalty(0, 100), 100);
    }

    #[test]
    fn test_penalty_of_uniform_grid() {
        let size = 21;
        let grid = vec![false; 21 * 21];
        // Rule 1: 42 lines of 21 -> 3 + 16 each; rule 2: 20*20 blocks; rule 4: 100
        let expected = 42 * (3 + 16) + 400 * 3 + 100;
        assert_eq!(penalty_score(&grid, size), expected);
    }
}
