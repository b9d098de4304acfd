use crate::state::dataset::Sample;

/// Largest-Triangle-Three-Buckets (LTTB) downsampling to at most `target`
/// samples. First and last samples are always kept.
pub fn lttb(samples: &[Sample], target: usize) -> Vec<Sample> {
    let n = samples.len();
    if n <= target || target < 3 {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity(target);
    out.push(samples[0]);

    let bucket_size = (n - 2) as f64 / (target - 2) as f64;
    let mut prev = samples[0];

    for i in 0..(target - 2) {
        let bucket_start = (i as f64 * bucket_size) as usize + 1;
        let bucket_end = (((i + 1) as f64 * bucket_size) as usize + 1).min(n - 1);

        // Average of the next bucket is the third triangle corner.
        let next_end = (((i + 2) as f64 * bucket_size) as usize + 1).min(n);
        let next = &samples[bucket_end..next_end.max(bucket_end + 1)];
        let count = next.len() as f64;
        let avg_x = next.iter().map(|s| s.x).sum::<f64>() / count;
        let avg_y = next.iter().map(|s| s.y).sum::<f64>() / count;

        let mut max_area = -1.0f64;
        let mut best = samples[bucket_start.min(n - 1)];
        for s in &samples[bucket_start.min(bucket_end)..bucket_end] {
            // Doubled area; only compared.
            let area = ((prev.x - avg_x) * (s.y - prev.y) - (prev.x - s.x) * (avg_y - prev.y)).abs();
            if area > max_area {
                max_area = area;
                best = *s;
            }
        }

        out.push(best);
        prev = best;
    }

    out.push(samples[n - 1]);
    out
}

/// Samples visible in `[view_min, view_max]`, reduced to `max_points` with
/// LTTB. Sorted x uses binary search and keeps one neighbour on each side
/// so the line runs to the plot edge.
pub fn downsample_for_view(samples: &[Sample], view_min: f64, view_max: f64, max_points: usize) -> Vec<Sample> {
    if samples.is_empty() {
        return Vec::new();
    }

    let is_sorted = samples.windows(2).all(|w| w[0].x <= w[1].x);
    let visible: Vec<Sample> = if is_sorted {
        let start = samples.partition_point(|s| s.x < view_min).saturating_sub(1);
        let end = (samples.partition_point(|s| s.x <= view_max) + 1).min(samples.len());
        samples[start..end].to_vec()
    } else {
        samples
            .iter()
            .filter(|s| s.x >= view_min && s.x <= view_max)
            .copied()
            .collect()
    };

    lttb(&visible, max_points)
}
