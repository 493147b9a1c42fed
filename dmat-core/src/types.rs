/// Index of an animation frame, i.e. a row of a [`crate::table::DensityTable`].
///
/// Only meaningful for the table it was taken from.
pub type FrameIndex = usize;

/// One of the four elements of a two-level density matrix.
///
/// Each element owns one square and one label in the 2x2 grid and reads
/// its value from a fixed column of the input table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    /// `|1⟩⟨1|`, top-left cell.
    OneOne,
    /// `|1⟩⟨2|`, top-right cell.
    OneTwo,
    /// `|2⟩⟨1|`, bottom-left cell.
    TwoOne,
    /// `|2⟩⟨2|`, bottom-right cell.
    TwoTwo,
}

impl Element {
    /// All elements in input-column order.
    pub const ALL: [Element; 4] = [
        Element::OneOne,
        Element::OneTwo,
        Element::TwoOne,
        Element::TwoTwo,
    ];

    /// Column of this element in an input row. Column 0 holds the time.
    pub fn column(self) -> usize {
        match self {
            Element::OneOne => 1,
            Element::OneTwo => 2,
            Element::TwoOne => 3,
            Element::TwoTwo => 4,
        }
    }

    /// Ket and bra state indices, e.g. `(1, 2)` for `|1⟩⟨2|`.
    pub fn indices(self) -> (u8, u8) {
        match self {
            Element::OneOne => (1, 1),
            Element::OneTwo => (1, 2),
            Element::TwoOne => (2, 1),
            Element::TwoTwo => (2, 2),
        }
    }

    /// Ket-bra label drawn on top of the element's square.
    pub fn ket_bra(self) -> &'static str {
        match self {
            Element::OneOne => "|1⟩⟨1|",
            Element::OneTwo => "|1⟩⟨2|",
            Element::TwoOne => "|2⟩⟨1|",
            Element::TwoTwo => "|2⟩⟨2|",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_input_order() {
        let cols: Vec<usize> = Element::ALL.iter().map(|e| e.column()).collect();
        assert_eq!(cols, vec![1, 2, 3, 4]);
    }

    #[test]
    fn labels_use_angle_brackets() {
        assert_eq!(Element::OneTwo.ket_bra(), "|1\u{27e9}\u{27e8}2|");
        for element in Element::ALL {
            let (ket, bra) = element.indices();
            assert_eq!(element.ket_bra(), format!("|{ket}⟩⟨{bra}|"));
        }
    }

    #[test]
    fn labels_are_distinct() {
        let mut labels: Vec<&str> = Element::ALL.iter().map(|e| e.ket_bra()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 4);
    }
}
