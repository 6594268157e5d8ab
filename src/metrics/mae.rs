use crate::error::{Error, Result};
use crate::metrics::RatingMetric;

#[derive(Default)]
pub struct Mae {
    sum_of_errors: f64,
    qty: usize,
}

impl Mae {
    pub fn new() -> Mae {
        Mae::default()
    }
}

impl RatingMetric for Mae {
    fn add(&mut self, predicted: f64, actual: f64) {
        self.sum_of_errors += (predicted - actual).abs();
        self.qty += 1;
    }

    fn result(&self) -> Result<f64> {
        if self.qty > 0 {
            Ok(self.sum_of_errors / self.qty as f64)
        } else {
            Err(Error::InvalidInput("MAE over an empty sequence".to_string()))
        }
    }

    fn get_name(&self) -> String {
        "MAE".to_string()
    }
}
