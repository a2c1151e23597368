//! Per-slot counts of the faces a hidden card could still be.

use crate::model::card::{CardFace, NUMBERS};
use crate::model::color::Color;
use std::fmt;

/// Count, for every (color, number), of physically remaining copies that
/// could occupy one hidden position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionTracker {
    counts: [[u8; 5]; 5],
}

impl OptionTracker {
    pub fn full_deck() -> Self {
        let mut counts = [[0u8; 5]; 5];
        for face in CardFace::all() {
            counts[face.color.index()][number_index(face.number)] = face.copies();
        }
        Self { counts }
    }

    /// A tracker with no options at all.
    pub fn empty() -> Self {
        Self {
            counts: [[0u8; 5]; 5],
        }
    }

    /// The full composition minus every face in `visible`.
    pub fn unseen<I>(visible: I) -> Self
    where
        I: IntoIterator<Item = CardFace>,
    {
        let mut tracker = Self::full_deck();
        for face in visible {
            tracker.remove_instance(face);
        }
        tracker
    }

    /// Builds a tracker from `(face, count)` pairs; unnamed faces start at zero.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (CardFace, u8)>,
    {
        let mut tracker = Self::empty();
        for (face, count) in counts {
            if CardFace::is_valid_number(face.number) {
                tracker.counts[face.color.index()][number_index(face.number)] = count;
            }
        }
        tracker
    }

    pub fn get(&self, face: CardFace) -> u8 {
        if !CardFace::is_valid_number(face.number) {
            return 0;
        }
        self.counts[face.color.index()][number_index(face.number)]
    }

    /// Keeps only faces of `color`.
    pub fn color_is(&mut self, color: Color) {
        for other in Color::ALL {
            if other != color {
                self.counts[other.index()] = [0; 5];
            }
        }
    }

    pub fn color_is_not(&mut self, color: Color) {
        self.counts[color.index()] = [0; 5];
    }

    /// Keeps only faces numbered `number`.
    pub fn number_is(&mut self, number: u8) {
        for row in &mut self.counts {
            for (idx, count) in row.iter_mut().enumerate() {
                if idx + 1 != number as usize {
                    *count = 0;
                }
            }
        }
    }

    pub fn number_is_not(&mut self, number: u8) {
        if !CardFace::is_valid_number(number) {
            return;
        }
        for row in &mut self.counts {
            row[number_index(number)] = 0;
        }
    }

    /// One copy of `face` is accounted for elsewhere. Floors at zero.
    pub fn remove_instance(&mut self, face: CardFace) {
        if !CardFace::is_valid_number(face.number) {
            return;
        }
        let count = &mut self.counts[face.color.index()][number_index(face.number)];
        *count = count.saturating_sub(1);
    }

    pub fn has_options(&self) -> bool {
        self.counts.iter().flatten().any(|&count| count > 0)
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().map(|&count| count as u32).sum()
    }

    /// Faces with a positive count, each with its share of the total.
    pub fn probabilities(&self) -> Vec<(CardFace, f64)> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }
        self.iter()
            .map(|(face, count)| (face, count as f64 / total as f64))
            .collect()
    }

    /// Faces with a positive count, in color then number order.
    pub fn iter(&self) -> impl Iterator<Item = (CardFace, u8)> + '_ {
        CardFace::all()
            .map(|face| (face, self.get(face)))
            .filter(|&(_, count)| count > 0)
    }
}

impl Default for OptionTracker {
    fn default() -> Self {
        Self::full_deck()
    }
}

/// Grid with one row per color and one column per number.
impl fmt::Display for OptionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for number in NUMBERS {
            write!(f, " {number}")?;
        }
        for color in Color::ALL {
            writeln!(f)?;
            write!(f, "{}", color.initial())?;
            for count in self.counts[color.index()] {
                write!(f, " {count}")?;
            }
        }
        Ok(())
    }
}

fn number_index(number: u8) -> usize {
    number as usize - 1
}

#[cfg(test)]
mod tests {
    use super::OptionTracker;
    use crate::model::card::CardFace;
    use crate::model::color::Color;

    fn face(color: Color, number: u8) -> CardFace {
        CardFace::new(color, number)
    }

    #[test]
    fn full_deck_matches_composition() {
        let tracker = OptionTracker::full_deck();
        assert_eq!(tracker.total(), 50);
        assert_eq!(tracker.get(face(Color::Blue, 1)), 3);
        assert_eq!(tracker.get(face(Color::Blue, 4)), 2);
        assert_eq!(tracker.get(face(Color::Blue, 5)), 1);
        assert_eq!(tracker.get(face(Color::Blue, 9)), 0);
    }

    #[test]
    fn unseen_subtracts_visible_cards() {
        let tracker = OptionTracker::unseen([face(Color::Red, 1), face(Color::Red, 1), face(Color::Red, 5)]);
        assert_eq!(tracker.get(face(Color::Red, 1)), 1);
        assert_eq!(tracker.get(face(Color::Red, 5)), 0);
        assert_eq!(tracker.total(), 47);
    }

    #[test]
    fn color_and_number_constraints_compose() {
        let mut tracker = OptionTracker::full_deck();
        tracker.color_is(Color::Green);
        assert_eq!(tracker.total(), 10);
        tracker.number_is_not(1);
        assert_eq!(tracker.total(), 7);
        tracker.number_is(4);
        assert_eq!(tracker.total(), 2);
        assert_eq!(tracker.iter().collect::<Vec<_>>(), vec![(face(Color::Green, 4), 2)]);

        tracker.color_is_not(Color::Green);
        assert!(!tracker.has_options());
        assert!(tracker.probabilities().is_empty());
    }

    #[test]
    fn remove_instance_floors_at_zero() {
        let mut tracker = OptionTracker::from_counts([(face(Color::White, 5), 1)]);
        tracker.remove_instance(face(Color::White, 5));
        tracker.remove_instance(face(Color::White, 5));
        assert_eq!(tracker.get(face(Color::White, 5)), 0);
        assert_eq!(tracker.total(), 0);
    }

    #[test]
    fn probabilities_are_normalized() {
        let tracker = OptionTracker::from_counts([
            (face(Color::Yellow, 1), 3),
            (face(Color::Yellow, 2), 1),
        ]);
        let probabilities = tracker.probabilities();
        assert_eq!(probabilities.len(), 2);
        assert!((probabilities[0].1 - 0.75).abs() < 1e-12);
        let sum: f64 = probabilities.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn display_renders_a_grid() {
        let rendered = OptionTracker::full_deck().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "  1 2 3 4 5");
        assert_eq!(lines[1], "R 3 2 2 2 1");
    }
}
