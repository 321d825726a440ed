use rand::Rng;

/// Picks one item with probability `weight_of(item) / total weight`.
///
/// Draws a single value in `[0, total)` and walks the items until the running
/// weight passes it, so the pick is reproducible for a given random stream.
/// Errors on an empty slice, a negative or non-finite weight, or a zero total.
pub fn weighted_random<'a, T, F, R>(items: &'a [T], weight_of: F, rng: &mut R) -> Result<&'a T, String>
where
    F: Fn(&T) -> f64,
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return Err("Weighted random selection over an empty set".to_string());
    }

    let weights: Vec<f64> = items.iter().map(&weight_of).collect();
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(format!("Weighted random selection got invalid weight {}", bad));
    }

    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Err(format!(
            "Weighted random selection over {} items with zero total weight",
            items.len()
        ));
    }

    let roll = rng.gen_range(0.0..total_weight);
    let mut cumulative_weight = 0.0;
    for (item, weight) in items.iter().zip(&weights) {
        cumulative_weight += weight;
        if roll < cumulative_weight {
            return Ok(item);
        }
    }

    // Rounding can leave the roll just past the last running sum
    let last_weighted = items
        .iter()
        .zip(&weights)
        .rev()
        .find(|(_, weight)| **weight > 0.0)
        .map(|(item, _)| item);
    last_weighted.ok_or_else(|| "Weighted random selection found no positive weight".to_string())
}

/// True with probability `chance` (one draw).
pub fn roll_chance<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}
