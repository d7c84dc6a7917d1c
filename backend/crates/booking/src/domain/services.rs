//! Domain Services
//!
//! Doctor rating rules.

/// Patients needed per star
pub const PATIENTS_PER_STAR: i32 = 10;

pub const MAX_STARS: i16 = 5;

/// `min(floor(patients_count / 10), 5)`
pub fn stars_for(patients_count: i32) -> i16 {
    let stars = patients_count.max(0) / PATIENTS_PER_STAR;
    stars.min(MAX_STARS as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_for() {
        assert_eq!(stars_for(0), 0);
        assert_eq!(stars_for(9), 0);
        assert_eq!(stars_for(10), 1);
        assert_eq!(stars_for(19), 1);
        assert_eq!(stars_for(49), 4);
        assert_eq!(stars_for(50), 5);
        assert_eq!(stars_for(10_000), 5);
        assert_eq!(stars_for(-3), 0);
    }

    #[test]
    fn test_stars_never_decrease() {
        let mut previous = 0;
        for count in 0..200 {
            let stars = stars_for(count);
            assert!(stars >= previous);
            previous = stars;
        }
    }
}
