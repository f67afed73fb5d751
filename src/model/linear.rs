//! Ordinary least squares regression.

use super::Regressor;

/// Relative pivot size below which a column is treated as collinear.
const PIVOT_EPS: f64 = 1e-10;

/// Linear model `y = intercept + Σ coefficients[j] * x[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegression {
    /// Fits by solving the centred normal equations.
    ///
    /// Columns that are constant or linear combinations of earlier columns
    /// get a zero coefficient, so the fit always succeeds. `rows` and
    /// `targets` must have the same length.
    pub(crate) fn fit<R: AsRef<[f64]>>(rows: &[R], targets: &[f64]) -> Self {
        debug_assert_eq!(rows.len(), targets.len(), "rows and targets must align");
        let p = rows.first().map_or(0, |r| r.as_ref().len());
        if rows.is_empty() {
            return Self {
                intercept: 0.0,
                coefficients: vec![0.0; p],
            };
        }

        let n = rows.len() as f64;
        let mut x_mean = vec![0.0; p];
        for row in rows {
            for (m, v) in x_mean.iter_mut().zip(row.as_ref()) {
                *m += v / n;
            }
        }
        let y_mean = targets.iter().sum::<f64>() / n;

        let mut xtx = vec![vec![0.0; p]; p];
        let mut xty = vec![0.0; p];
        for (row, y) in rows.iter().zip(targets) {
            let row = row.as_ref();
            let dy = y - y_mean;
            for i in 0..p {
                let di = row[i] - x_mean[i];
                xty[i] += di * dy;
                for j in 0..p {
                    xtx[i][j] += di * (row[j] - x_mean[j]);
                }
            }
        }

        let coefficients = solve(xtx, xty);
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        Self {
            intercept,
            coefficients,
        }
    }
}

impl Regressor for LinearRegression {
    fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(b, x)| b * x)
                .sum::<f64>()
    }
}

/// Gauss-Jordan elimination with partial pivoting; free columns resolve to 0.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let n = b.len();
    let scale = (0..n).map(|i| a[i][i].abs()).fold(0.0_f64, f64::max);
    let eps = PIVOT_EPS * scale.max(f64::MIN_POSITIVE);

    let mut pivot_row = vec![None; n];
    let mut row = 0;
    for col in 0..n {
        if row == n {
            break;
        }
        let Some(p) = (row..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs())) else {
            break;
        };
        if a[p][col].abs() <= eps {
            continue;
        }
        a.swap(p, row);
        b.swap(p, row);

        for r in 0..n {
            if r == row {
                continue;
            }
            let factor = a[r][col] / a[row][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[r][k] -= factor * a[row][k];
            }
            b[r] -= factor * b[row];
        }
        pivot_row[col] = Some(row);
        row += 1;
    }

    (0..n)
        .map(|col| pivot_row[col].map_or(0.0, |r| b[r] / a[r][col]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_linear_relationship() {
        // y = 3 + 2*x0 - 0.5*x1
        let rows: Vec<[f64; 2]> = (0..20)
            .map(|i| [i as f64, ((i * 7) % 5) as f64])
            .collect();
        let y: Vec<f64> = rows.iter().map(|r| 3.0 + 2.0 * r[0] - 0.5 * r[1]).collect();
        let model = LinearRegression::fit(&rows, &y);
        assert!((model.intercept - 3.0).abs() < 1e-9);
        assert!((model.coefficients[0] - 2.0).abs() < 1e-9);
        assert!((model.coefficients[1] + 0.5).abs() < 1e-9);
        assert!((model.predict(&[10.0, 2.0]) - 22.0).abs() < 1e-9);
    }

    #[test]
    fn constant_column_gets_zero_coefficient() {
        let rows: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 4.0]).collect();
        let y: Vec<f64> = rows.iter().map(|r| 1.0 + r[0]).collect();
        let model = LinearRegression::fit(&rows, &y);
        assert_eq!(model.coefficients[1], 0.0);
        assert!((model.coefficients[0] - 1.0).abs() < 1e-9);
        assert!((model.intercept - 1.0).abs() < 1e-9);
    }

    #[test]
    fn duplicated_column_is_absorbed() {
        let rows: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, i as f64]).collect();
        let y: Vec<f64> = rows.iter().map(|r| 2.0 * r[0]).collect();
        let model = LinearRegression::fit(&rows, &y);
        assert!((model.predict(&[5.0, 5.0]) - 10.0).abs() < 1e-9);
        assert!(model.coefficients.iter().all(|c| c.is_finite()));
    }
}
