use rand::seq::SliceRandom;

/// Rotating hydration advice, shown on the status screen and inside
/// reminder prompts.
pub const HEALTH_TIPS: &[&str] = &[
    "A glass of warm water right after waking up kickstarts your metabolism",
    "Drinking water 30 minutes before a meal helps control how much you eat",
    "Rehydrate soon after exercise so recovery isn't slowed down",
    "Ease off water in the last 2 hours before bed to sleep through the night",
    "Frequent small sips beat emptying a bottle in one go",
    "Water around 35-40 degrees is easiest on the stomach, not iced, not scalding",
    "Drinking too fast brings on hiccups, slow sips are more comfortable",
    "Sweating through summer? Top up at least 200 ml every hour",
    "Heated rooms in winter dry you out faster than you notice",
    "Coffee and milk tea are no substitute for plain water",
    "Feeling thirsty means you're already behind, drink before it kicks in",
    "A good order: after waking, before meals, after exercise, a little before bed",
];

/// Uniformly random pick from the catalog.
pub fn random_tip() -> &'static str {
    HEALTH_TIPS
        .choose(&mut rand::thread_rng())
        .copied()
        .expect("The tip catalog is never empty")
}

#[cfg(test)]
mod tests {
    use super::{random_tip, HEALTH_TIPS};

    #[test]
    fn random_tip_comes_from_the_catalog() {
        for _ in 0..32 {
            assert!(HEALTH_TIPS.contains(&random_tip()));
        }
    }
}
