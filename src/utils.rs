//! Shared numerical utilities.

use nalgebra::{DMatrix, DVector};

/// Pivots below this magnitude mark the system as singular.
const PIVOT_EPS: f64 = 1e-10;

/// Solve `a * x = b` by Gaussian elimination with partial pivoting.
///
/// `augmented` is the `n x (n + 1)` matrix `[a | b]`, consumed in place.
/// Returns `None` when a pivot vanishes (singular system).
pub(crate) fn gauss_elimination(mut augmented: DMatrix<f64>) -> Option<DVector<f64>> {
    let n = augmented.nrows();
    if augmented.ncols() != n + 1 {
        return None;
    }

    for i in 0..n {
        // Partial pivoting: bring the largest remaining entry of column i
        // onto the diagonal.
        let mut pivot_row = i;
        for k in (i + 1)..n {
            if augmented[(k, i)].abs() > augmented[(pivot_row, i)].abs() {
                pivot_row = k;
            }
        }
        if pivot_row != i {
            augmented.swap_rows(i, pivot_row);
        }
        if augmented[(i, i)].abs() < PIVOT_EPS {
            return None;
        }

        for k in (i + 1)..n {
            let factor = augmented[(k, i)] / augmented[(i, i)];
            for j in i..=n {
                let delta = factor * augmented[(i, j)];
                augmented[(k, j)] -= delta;
            }
        }
    }

    // Back-substitution.
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut acc = augmented[(i, n)];
        for j in (i + 1)..n {
            acc -= augmented[(i, j)] * x[j];
        }
        x[i] = acc / augmented[(i, i)];
    }

    Some(x)
}
