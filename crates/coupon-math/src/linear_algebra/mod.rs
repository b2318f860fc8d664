//! Linear solves used by the spline, Smith-Wilson and least-squares code.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Solves a tridiagonal system with the Thomas algorithm.
///
/// `lower` has length n-1 (entries below the diagonal), `diag` length n,
/// `upper` length n-1 and `rhs` length n.
pub fn solve_tridiagonal(
    lower: &[f64],
    diag: &[f64],
    upper: &[f64],
    rhs: &[f64],
) -> MathResult<Vec<f64>> {
    let n = diag.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if lower.len() + 1 != n || upper.len() + 1 != n {
        return Err(MathError::DimensionMismatch {
            expected: n - 1,
            actual: lower.len().min(upper.len()),
        });
    }
    if rhs.len() != n {
        return Err(MathError::DimensionMismatch {
            expected: n,
            actual: rhs.len(),
        });
    }

    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    if diag[0].abs() < f64::MIN_POSITIVE {
        return Err(MathError::SingularMatrix);
    }
    if n > 1 {
        c[0] = upper[0] / diag[0];
    }
    d[0] = rhs[0] / diag[0];

    for i in 1..n {
        let pivot = diag[i] - lower[i - 1] * c[i - 1];
        if pivot.abs() < 1e-300 {
            return Err(MathError::SingularMatrix);
        }
        if i < n - 1 {
            c[i] = upper[i] / pivot;
        }
        d[i] = (rhs[i] - lower[i - 1] * d[i - 1]) / pivot;
    }

    let mut x = d;
    for i in (0..n - 1).rev() {
        x[i] -= c[i] * x[i + 1];
    }
    Ok(x)
}

/// Solves a dense square system `A x = b` by LU with partial pivoting.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    if a.nrows() != a.ncols() {
        return Err(MathError::invalid_input(format!(
            "matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    if a.nrows() != b.len() {
        return Err(MathError::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }

    a.clone().lu().solve(b).ok_or(MathError::SingularMatrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tridiagonal() {
        // [2 1 0; 1 2 1; 0 1 2] x = [4 8 8] -> x = [1 2 3]
        let x = solve_tridiagonal(&[1.0, 1.0], &[2.0, 2.0, 2.0], &[1.0, 1.0], &[4.0, 8.0, 8.0])
            .unwrap();
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tridiagonal_single() {
        let x = solve_tridiagonal(&[], &[4.0], &[], &[2.0]).unwrap();
        assert_relative_eq!(x[0], 0.5);
    }

    #[test]
    fn test_dense_solve() {
        let a = DMatrix::from_row_slice(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![9.0, 8.0]);
        let x = solve_linear_system(&a, &b).unwrap();
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_linear_system(&a, &b),
            Err(MathError::SingularMatrix)
        ));
    }
}
