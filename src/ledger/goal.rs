use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;

/// Daily target in milliliters, bounded to 1000..=5000. The bounds live in
/// the type, so every constructed [Goal] is usable as a divisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Goal(u32);

impl Goal {
    pub const MIN_ML: u32 = 1000;
    pub const MAX_ML: u32 = 5000;

    pub fn new_opt(ml: u32) -> Option<Goal> {
        if (Self::MIN_ML..=Self::MAX_ML).contains(&ml) {
            Some(Goal(ml))
        } else {
            None
        }
    }

    pub fn ml(self) -> u32 {
        self.0
    }
}

impl Default for Goal {
    fn default() -> Self {
        Goal(2000)
    }
}

impl Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ml", self.0)
    }
}

impl FromStr for Goal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accepts both "2500" and "2500 ml"
        let s = s.trim_end_matches("ml").trim();
        let v = s.parse::<u32>()?;
        Goal::new_opt(v).ok_or_else(|| {
            anyhow!(
                "goal must be between {} and {} ml",
                Self::MIN_ML,
                Self::MAX_ML
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Goal;

    #[test]
    fn accepts_values_inside_bounds() {
        assert_eq!(Goal::new_opt(1000).map(Goal::ml), Some(1000));
        assert_eq!(Goal::new_opt(5000).map(Goal::ml), Some(5000));
    }

    #[test]
    fn rejects_values_outside_bounds() {
        assert_eq!(Goal::new_opt(999), None);
        assert_eq!(Goal::new_opt(5001), None);
        assert_eq!(Goal::new_opt(0), None);
    }

    #[test]
    fn parses_with_and_without_unit() {
        assert_eq!(Goal::from_str("2500").unwrap().ml(), 2500);
        assert_eq!(Goal::from_str("2500 ml").unwrap().ml(), 2500);
        assert!(Goal::from_str("800").is_err());
        assert!(Goal::from_str("lots").is_err());
    }

    #[test]
    fn default_is_two_liters() {
        assert_eq!(Goal::default().ml(), 2000);
    }
}
