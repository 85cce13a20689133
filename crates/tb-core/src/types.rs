/// Selects which triangle of a symmetric matrix is read and written,
/// diagonal inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uplo {
    Upper,
    Lower,
}

impl Uplo {
    /// True if global element `(i, j)` lies in the selected triangle.
    ///
    /// Always evaluated on global matrix coordinates, never on tile-local
    /// ones: diagonal-straddling tiles compute elements on both sides of
    /// the diagonal and rely on this predicate to mask the excluded half.
    pub fn contains(self, i: usize, j: usize) -> bool {
        match self {
            Uplo::Upper => j >= i,
            Uplo::Lower => i >= j,
        }
    }

    /// The opposite triangle selector.
    pub fn flip(self) -> Uplo {
        match self {
            Uplo::Upper => Uplo::Lower,
            Uplo::Lower => Uplo::Upper,
        }
    }
}

/// Operand orientation for the matrix-update routines.
///
/// For the real element types implemented here, `ConjTrans` behaves as
/// `Trans`, as in the classical BLAS real-arithmetic routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transpose {
    NoTrans,
    Trans,
    ConjTrans,
}

impl Transpose {
    /// True for either transposed orientation.
    pub fn is_trans(self) -> bool {
        !matches!(self, Transpose::NoTrans)
    }
}
