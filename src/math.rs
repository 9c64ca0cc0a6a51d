use std::collections::{BTreeMap, BTreeSet};

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Type alias for sets whose iteration order is given by [`Ord`]. Blocks of a
/// [`crate::Partition`] are stored this way.
pub type OrderedSet<S> = BTreeSet<S>;
/// Type alias for maps whose iteration order is given by [`Ord`] on the keys.
pub type OrderedMap<K, V> = BTreeMap<K, V>;

/// Returns `ln(0!), ..., ln(n!)`.
pub fn ln_factorials(n: usize) -> Vec<f64> {
    let mut ln_fact = Vec::with_capacity(n + 1);
    ln_fact.push(0.0);
    for m in 1..=n {
        ln_fact.push(ln_fact[m - 1] + (m as f64).ln());
    }
    ln_fact
}

/// Returns the natural logarithms of the Bell numbers `B(0), ..., B(n)`, computed with the
/// recurrence `B(m) = sum_k binomial(m - 1, k) * B(k)`. Working with logarithms keeps the
/// values finite for every universe size, whereas `B(n)` itself exceeds the range of `f64`
/// above roughly 218 elements.
pub fn ln_bell_numbers(n: usize) -> Vec<f64> {
    let ln_fact = ln_factorials(n);
    let mut ln_bell = Vec::with_capacity(n + 1);
    ln_bell.push(0.0);
    for m in 1..=n {
        let terms: Vec<f64> = (0..m)
            .map(|k| ln_fact[m - 1] - ln_fact[k] - ln_fact[m - 1 - k] + ln_bell[k])
            .collect();
        ln_bell.push(ln_sum_exp(&terms));
    }
    ln_bell
}

/// Computes `ln(sum_i exp(x_i))` without leaving the range of `f64`.
fn ln_sum_exp(terms: &[f64]) -> f64 {
    let max = terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return max;
    }
    max + terms.iter().map(|x| (x - max).exp()).sum::<f64>().ln()
}

/// Computes the Bell number `B(n)`, i.e. the number of set partitions of an `n` element
/// set, exactly. Returns `None` if the value does not fit into a `u128`.
///
/// # Example
/// ```
/// use automata_algebra::math::bell_number;
/// assert_eq!(bell_number(4), Some(15));
/// ```
pub fn bell_number(n: usize) -> Option<u128> {
    // Bell triangle, each row starts with the last entry of the previous one
    let mut row: Vec<u128> = vec![1];
    for _ in 0..n {
        let mut next = Vec::with_capacity(row.len() + 1);
        next.push(*row.last()?);
        for value in &row {
            let sum = next.last()?.checked_add(*value)?;
            next.push(sum);
        }
        row = next;
    }
    row.first().copied()
}

/// Computes the Stirling number of the second kind `S(n, k)`, the number of partitions of an
/// `n` element set into exactly `k` blocks. Returns `None` on overflow.
pub fn stirling2(n: usize, k: usize) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let mut row = vec![0u128; k + 1];
    row[0] = 1;
    for _ in 0..n {
        for j in (1..=k).rev() {
            row[j] = (j as u128).checked_mul(row[j])?.checked_add(row[j - 1])?;
        }
        row[0] = 0;
    }
    Some(row[k])
}
