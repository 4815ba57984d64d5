use crate::LtiError;

/// Floating point type used throughout the workspace
pub type Real = f64;

/// Absolute/relative tolerance pair for floating comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

impl Tolerances {
    /// Loose tolerances for coefficients rebuilt from floating roots.
    pub fn loose() -> Self {
        Self {
            abs: 1e-8,
            rel: 1e-5,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Element-wise `nearly_equal` over two slices of the same length.
pub fn all_nearly_equal(a: &[Real], b: &[Real], tol: Tolerances) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| nearly_equal(x, y, tol))
}

/// True when `im` is negligible next to the magnitude of `re + j·im`.
///
/// The threshold scales with `max(1, |z|)` so large roots are not held to an
/// absolute tolerance.
pub fn imag_negligible(re: Real, im: Real, rel_tol: Real) -> bool {
    let scale = re.hypot(im).max(1.0);
    im.abs() <= rel_tol * scale
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LtiError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LtiError::NonFinite { what, value: v })
    }
}
