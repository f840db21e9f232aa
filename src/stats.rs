//! Information measures over splicing events.

use std::collections::BTreeMap;

/// Shannon entropy in bits of a count vector. Zero counts are ignored; an
/// empty or all-zero vector has entropy 0.
pub fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Mutual information in bits between two discrete variables, estimated
/// from observed `(x, y)` pairs.
///
/// Computed as `H(X) + H(Y) - H(X, Y)`, summing counts in key order so the
/// result does not depend on the order of `pairs`.
pub fn mutual_information<X, Y>(pairs: &[(X, Y)]) -> f64
where
    X: Ord + Clone,
    Y: Ord + Clone,
{
    if pairs.is_empty() {
        return 0.0;
    }

    let mut xs: BTreeMap<X, usize> = BTreeMap::new();
    let mut ys: BTreeMap<Y, usize> = BTreeMap::new();
    let mut joint: BTreeMap<(X, Y), usize> = BTreeMap::new();

    for (x, y) in pairs {
        *xs.entry(x.clone()).or_default() += 1;
        *ys.entry(y.clone()).or_default() += 1;
        *joint.entry((x.clone(), y.clone())).or_default() += 1;
    }

    let h = |m: Vec<usize>| entropy(&m);
    let mi = h(xs.into_values().collect()) + h(ys.into_values().collect())
        - h(joint.into_values().collect());

    // float noise can push independent variables slightly below zero
    mi.max(0.0)
}
