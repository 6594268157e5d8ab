use crate::error::{Error, Result};
use crate::metrics::RatingMetric;

#[derive(Default)]
pub struct Rmse {
    sum_of_squared_errors: f64,
    qty: usize,
}

impl Rmse {
    pub fn new() -> Rmse {
        Rmse::default()
    }
}

impl RatingMetric for Rmse {
    fn add(&mut self, predicted: f64, actual: f64) {
        let error = predicted - actual;
        self.sum_of_squared_errors += error * error;
        self.qty += 1;
    }

    fn result(&self) -> Result<f64> {
        if self.qty > 0 {
            Ok((self.sum_of_squared_errors / self.qty as f64).sqrt())
        } else {
            Err(Error::InvalidInput("RMSE over an empty sequence".to_string()))
        }
    }

    fn get_name(&self) -> String {
        "RMSE".to_string()
    }
}
