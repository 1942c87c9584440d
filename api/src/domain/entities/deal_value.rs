//! Expected deal value
//!
//! Monthly processing value estimated from company size and industry,
//! sent to the CRM as a deal's expected value.

/// Base monthly processing value before any multiplier
pub const BASE_DEAL_VALUE: f64 = 5000.0;

/// Half-open employee-count band `[lower, upper)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeBand {
    pub lower: u32,
    pub upper: u32,
    pub multiplier: f64,
}

impl SizeBand {
    pub fn contains(&self, employee_count: u32) -> bool {
        employee_count >= self.lower && employee_count < self.upper
    }
}

/// Scanned in order; the first matching band wins
pub const SIZE_BANDS: [SizeBand; 4] = [
    SizeBand {
        lower: 1,
        upper: 50,
        multiplier: 1.0,
    },
    SizeBand {
        lower: 50,
        upper: 200,
        multiplier: 2.0,
    },
    SizeBand {
        lower: 200,
        upper: 500,
        multiplier: 3.0,
    },
    SizeBand {
        lower: 500,
        upper: 1000,
        multiplier: 4.0,
    },
];

/// Multiplier for counts outside every band (0, or 1000 and above)
pub const FALLBACK_SIZE_MULTIPLIER: f64 = 1.0;

pub fn size_multiplier(employee_count: u32) -> f64 {
    SIZE_BANDS
        .iter()
        .find(|band| band.contains(employee_count))
        .map_or(FALLBACK_SIZE_MULTIPLIER, |band| band.multiplier)
}

pub fn industry_multiplier(industry: &str) -> f64 {
    match industry.trim().to_lowercase().as_str() {
        "retail" => 1.2,
        "hospitality" => 1.3,
        "healthcare" => 1.1,
        "professional_services" => 0.9,
        _ => 1.0,
    }
}

pub fn expected_deal_value(employee_count: u32, industry: &str) -> f64 {
    BASE_DEAL_VALUE * size_multiplier(employee_count) * industry_multiplier(industry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn bands_are_contiguous() {
        for pair in SIZE_BANDS.windows(2) {
            assert_eq!(pair[0].upper, pair[1].lower);
        }
    }

    #[test]
    fn band_bounds_are_half_open() {
        assert_eq!(size_multiplier(1), 1.0);
        assert_eq!(size_multiplier(49), 1.0);
        assert_eq!(size_multiplier(50), 2.0);
        assert_eq!(size_multiplier(199), 2.0);
        assert_eq!(size_multiplier(200), 3.0);
        assert_eq!(size_multiplier(999), 4.0);
    }

    #[test]
    fn counts_outside_bands_fall_back() {
        assert_eq!(size_multiplier(0), FALLBACK_SIZE_MULTIPLIER);
        assert_eq!(size_multiplier(1000), FALLBACK_SIZE_MULTIPLIER);
        assert_eq!(size_multiplier(25_000), FALLBACK_SIZE_MULTIPLIER);
    }

    #[test]
    fn industry_multipliers() {
        assert!(approx(industry_multiplier("Retail"), 1.2));
        assert!(approx(industry_multiplier("hospitality"), 1.3));
        assert!(approx(industry_multiplier("healthcare"), 1.1));
        assert!(approx(industry_multiplier("professional_services"), 0.9));
        assert!(approx(industry_multiplier("mining"), 1.0));
    }

    #[test]
    fn expected_values() {
        assert!(approx(expected_deal_value(30, "retail"), 6000.0));
        assert!(approx(expected_deal_value(120, "hospitality"), 13000.0));
        assert!(approx(expected_deal_value(750, "logistics"), 20000.0));
        assert!(approx(expected_deal_value(4000, "retail"), 6000.0));
    }
}
