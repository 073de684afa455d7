//! Scoring

/// Points per whole second survived
pub const POINTS_PER_SECOND: u64 = 10;

/// `10 * floor(elapsed) + bonus * teapots`
pub fn score(elapsed_secs: f32, teapots: u32, teapot_bonus: u64) -> u64 {
    let seconds = elapsed_secs.max(0.0).floor() as u64;
    POINTS_PER_SECOND * seconds + teapot_bonus * u64::from(teapots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_formula() {
        assert_eq!(score(0.0, 0, 418), 0);
        assert_eq!(score(12.9, 0, 418), 120);
        assert_eq!(score(404.0, 3, 418), 4040 + 3 * 418);
        assert_eq!(score(-1.0, 0, 418), 0);
    }

    proptest! {
        #[test]
        fn prop_score_is_monotonic(
            t in 0.0f32..404.0, dt in 0.0f32..50.0,
            items in 0u32..50, more in 0u32..5,
        ) {
            prop_assert!(score(t + dt, items, 418) >= score(t, items, 418));
            prop_assert!(score(t, items + more, 418) >= score(t, items, 418));
        }
    }
}
