use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use ordered_float::OrderedFloat;

/// Natural breaks of `values` into `n_classes` classes (Fisher-Jenks).
///
/// Returns `n_classes + 1` breaks: the minimum, the upper limit of every class but the last, and the maximum.
pub fn jenks_breaks(values: &[f64], n_classes: usize) -> Result<Vec<f64>> {
    ensure!(n_classes >= 2, "at least 2 classes required, got {n_classes}");
    ensure!(
        values.len() >= n_classes,
        "not enough values ({}) for {} classes",
        values.len(),
        n_classes
    );
    ensure!(
        values.iter().all(|v| v.is_finite()),
        "values must be finite"
    );

    let data = values
        .iter()
        .copied()
        .sorted_by_key(|v| OrderedFloat(*v))
        .collect_vec();
    let n_distinct = data.iter().dedup().count();
    ensure!(
        n_distinct >= n_classes,
        "not enough distinct values ({}) for {} classes",
        n_distinct,
        n_classes
    );
    let (n, k) = (data.len(), n_classes);

    //lower_limits[l][j]: 1-based index of the first value of class j when the first l values are split into j classes
    let mut lower_limits = vec![vec![0usize; k + 1]; n + 1];
    //variances[l][j]: minimal sum of squared deviations of that split
    let mut variances = vec![vec![0.0f64; k + 1]; n + 1];

    for j in 1..=k {
        lower_limits[1][j] = 1;
        for row in variances.iter_mut().skip(2) {
            row[j] = f64::INFINITY;
        }
    }

    for l in 2..=n {
        let (mut sum, mut sq_sum, mut w) = (0.0, 0.0, 0.0);
        let mut variance = 0.0;
        for m in 1..=l {
            let lower = l - m + 1;
            let val = data[lower - 1];
            sq_sum += val * val;
            sum += val;
            w += 1.0;
            variance = sq_sum - (sum * sum) / w;
            let prev = lower - 1;
            if prev != 0 {
                for j in 2..=k {
                    if variances[l][j] >= variance + variances[prev][j - 1] {
                        lower_limits[l][j] = lower;
                        variances[l][j] = variance + variances[prev][j - 1];
                    }
                }
            }
        }
        lower_limits[l][1] = 1;
        variances[l][1] = variance;
    }

    let mut breaks = vec![0.0; k + 1];
    breaks[0] = data[0];
    breaks[k] = data[n - 1];
    let mut upper = n;
    for class in (2..=k).rev() {
        let lower = lower_limits[upper][class];
        let last_of_prev = lower
            .checked_sub(2)
            .with_context(|| format!("class {class} of {k} is empty"))?;
        breaks[class - 1] = data[last_of_prev];
        upper = lower - 1;
    }
    Ok(breaks)
}

/// 1-based class of `value` given the `breaks` from [`jenks_breaks`], `None` if it exceeds the last break.
pub fn classify(value: f64, breaks: &[f64]) -> Option<usize> {
    (1..breaks.len()).find(|&i| value <= breaks[i])
}
