use crate::error::{Error, Result};
use crate::metrics::mae::Mae;
use crate::metrics::RatingMetric;

/// MAE divided by the range of the actual values.
pub struct Nmae {
    mae: Mae,
    min_actual: f64,
    max_actual: f64,
}

impl Default for Nmae {
    fn default() -> Self {
        Nmae {
            mae: Mae::new(),
            min_actual: f64::INFINITY,
            max_actual: f64::NEG_INFINITY,
        }
    }
}

impl Nmae {
    pub fn new() -> Nmae {
        Nmae::default()
    }
}

impl RatingMetric for Nmae {
    fn add(&mut self, predicted: f64, actual: f64) {
        self.mae.add(predicted, actual);
        self.min_actual = self.min_actual.min(actual);
        self.max_actual = self.max_actual.max(actual);
    }

    fn result(&self) -> Result<f64> {
        let mae = self.mae.result()?;
        let range = self.max_actual - self.min_actual;
        if range == 0.0 {
            return Err(Error::DivideByZero);
        }
        Ok(mae / range)
    }

    fn get_name(&self) -> String {
        "NMAE".to_string()
    }
}

#[cfg(test)]
mod nmae_test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn should_calculate_nmae() {
        let mut mymetric = Nmae::new();
        for (predicted, actual) in [(2.0, 1.0), (4.0, 5.0), (3.0, 3.0)] {
            mymetric.add(predicted, actual);
        }
        assert!(approx_eq!(f64, (2.0 / 3.0) / 4.0, mymetric.result().unwrap(), epsilon = 1e-12));
        assert_eq!("NMAE", mymetric.get_name());
    }

    #[test]
    fn should_fail_on_constant_actual_values() {
        let mut mymetric = Nmae::new();
        for (predicted, actual) in [(2.0, 3.0), (4.0, 3.0), (3.0, 3.0)] {
            mymetric.add(predicted, actual);
        }
        assert!(matches!(mymetric.result(), Err(Error::DivideByZero)));
    }

    #[test]
    fn should_fail_without_observations() {
        assert!(matches!(Nmae::new().result(), Err(Error::InvalidInput(_))));
    }
}
