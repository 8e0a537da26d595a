//! Butcher tableaux of the embedded Runge-Kutta pairs.

/// Dormand-Prince 5(4) pair.
///
/// Reference: Dormand, J. R. and Prince, P. J. (1980). "A family of embedded Runge-Kutta
/// formulae". Journal of Computational and Applied Mathematics 6 (1), 19-26.
///
/// The last row of [`A`](dopri54::A) equals the fifth order weights, so the last stage of a
/// step is the derivative at the new state (first same as last).
pub mod dopri54 {
    /// Number of stages.
    pub const STAGES: usize = 7;

    /// Order of the solution used to advance the integration.
    pub const ORDER: u8 = 5;

    /// Order of the embedded solution used for error estimation.
    pub const EMBEDDED_ORDER: u8 = 4;

    /// Nodes, as fractions of the step size.
    pub const C: [f64; STAGES] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

    /// Strictly lower-triangular stage matrix.
    pub const A: [[f64; STAGES]; STAGES] = [
        [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0, 0.0],
        [
            19372.0 / 6561.0,
            -25360.0 / 2187.0,
            64448.0 / 6561.0,
            -212.0 / 729.0,
            0.0,
            0.0,
            0.0,
        ],
        [
            9017.0 / 3168.0,
            -355.0 / 33.0,
            46732.0 / 5247.0,
            49.0 / 176.0,
            -5103.0 / 18656.0,
            0.0,
            0.0,
        ],
        B_HIGH,
    ];

    /// Fifth order weights.
    pub const B_HIGH: [f64; STAGES] = [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ];

    /// Fourth order weights, only used for the error estimate.
    pub const B_LOW: [f64; STAGES] = [
        5179.0 / 57600.0,
        0.0,
        7571.0 / 16695.0,
        393.0 / 640.0,
        -92097.0 / 339200.0,
        187.0 / 2100.0,
        1.0 / 40.0,
    ];

    /// Error weights `B_HIGH - B_LOW`.
    pub const E: [f64; STAGES] = [
        B_HIGH[0] - B_LOW[0],
        B_HIGH[1] - B_LOW[1],
        B_HIGH[2] - B_LOW[2],
        B_HIGH[3] - B_LOW[3],
        B_HIGH[4] - B_LOW[4],
        B_HIGH[5] - B_LOW[5],
        B_HIGH[6] - B_LOW[6],
    ];
}

#[cfg(test)]
mod tests {
    use super::dopri54::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_row_sums_match_nodes() {
        for i in 0..STAGES {
            let sum: f64 = A[i].iter().sum();
            assert_abs_diff_eq!(sum, C[i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_strictly_lower_triangular() {
        for i in 0..STAGES {
            for j in i..STAGES {
                assert_eq!(A[i][j], 0.0);
            }
        }
    }

    #[test]
    fn test_weights() {
        assert_abs_diff_eq!(B_HIGH.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(B_LOW.iter().sum::<f64>(), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(E.iter().sum::<f64>(), 0.0, epsilon = 1e-14);
        assert_eq!(A[STAGES - 1], B_HIGH);
        assert_eq!(C[0], 0.0);
        assert_eq!(C[STAGES - 1], 1.0);
    }

    #[test]
    fn test_error_weights() {
        let expected = [
            71.0 / 57600.0,
            0.0,
            -71.0 / 16695.0,
            71.0 / 1920.0,
            -17253.0 / 339200.0,
            22.0 / 525.0,
            -1.0 / 40.0,
        ];
        for i in 0..STAGES {
            assert_abs_diff_eq!(E[i], expected[i], epsilon = 1e-15);
        }
    }
}
