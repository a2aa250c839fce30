//! Closed-form PMI arithmetic.

/// `log( P(i,p) / (P(i)·P(p)) )` with probabilities relative to `total`.
/// Zero joint weight gives negative infinity.
pub fn pmi(joint: f64, f_instance: f64, f_pattern: f64, total: f64) -> f64 {
    let p_joint = joint / total;
    let p_instance = f_instance / total;
    let p_pattern = f_pattern / total;
    (p_joint / (p_instance * p_pattern)).ln()
}

/// `F(i,p)/(F(i,p)+1) · m/(m+1)` where `m = min(F(i), F(p))`.
/// Zero for `F(i,p) = 0`; tends to `m/(m+1)` as `F(i,p)` grows.
pub fn discount(joint: f64, f_instance: f64, f_pattern: f64) -> f64 {
    let m = f_instance.min(f_pattern);
    (joint / (joint + 1.0)) * (m / (m + 1.0))
}

/// `pmi · discount`, defined as 0 when the discount is 0 so that a zero
/// joint weight never yields `-inf · 0`.
pub fn discounted_pmi(joint: f64, f_instance: f64, f_pattern: f64, total: f64) -> f64 {
    let d = discount(joint, f_instance, f_pattern);
    if d == 0.0 {
        return 0.0;
    }
    pmi(joint, f_instance, f_pattern, total) * d
}
