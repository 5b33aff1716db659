use crate::CoreError;

/// Floating point type used for point coordinates and view parameters.
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_infinity() {
        assert!(ensure_positive(0.0, "zoom").is_err());
        assert!(ensure_positive(-2.0, "zoom").is_err());
        assert!(ensure_positive(Real::INFINITY, "zoom").is_err());
        assert_eq!(ensure_positive(2.5, "zoom"), Ok(2.5));
    }
}
