use std::time::Instant;

use anyhow::Context;

use slopeone::config::AppConfig;
use slopeone::dataframeutils::determine_rating_data_statistics;
use slopeone::evaluation::evaluate_held_out;
use slopeone::io::{read_items, read_ratings, read_users};
use slopeone::metrics::EvaluationReporter;
use slopeone::predictor::{PredictionMap, PredictorKind};
use slopeone::ratings::RatingStore;
use slopeone::slopeone::SlopeOne;
use slopeone::stopwatch::Stopwatch;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(&config_path)
        .with_context(|| format!("Could not load configuration from '{}'", config_path))?;

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", &config.log.level);
    }
    sensible_env_logger::init!();

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.runtime.num_threads)
        .build_global()
        .context("Could not start the worker pool")?;

    let scale = config.model.scale;
    let users = read_users(&config.data.users_path)
        .with_context(|| format!("Could not read users from {}", config.data.users_path))?;
    let items = read_items(&config.data.items_path)
        .with_context(|| format!("Could not read items from {}", config.data.items_path))?;
    let training_set = read_ratings(&config.data.training_data_path, &scale).with_context(|| {
        format!(
            "Could not read training ratings from {}",
            config.data.training_data_path
        )
    })?;
    let test_set = read_ratings(&config.data.test_data_path, &scale).with_context(|| {
        format!(
            "Could not read test ratings from {}",
            config.data.test_data_path
        )
    })?;
    log::info!("Users: {}, Items: {}", users.len(), items.len());
    determine_rating_data_statistics(&config.data.training_data_path, &training_set);
    determine_rating_data_statistics(&config.data.test_data_path, &test_set);

    let start_time = Instant::now();
    let store = RatingStore::new(&training_set);
    let mut stopwatch = Stopwatch::new();

    let predictions: PredictionMap = match config.model.predictor {
        PredictorKind::SlopeOne if !config.model.parallel => {
            // row by row, to measure the latency per user
            let model = SlopeOne::new(false).fit(&store);
            let mut predictions = PredictionMap::with_capacity(users.len());
            for user in &users {
                stopwatch.start();
                let row = model.predict_user(&store, &user.id, &items);
                stopwatch.stop();
                if let Some(row) = row {
                    predictions.insert(user.id, row);
                }
            }
            predictions
        }
        kind => kind
            .create(config.model.parallel)
            .predict(&users, &items, &store),
    };
    log::info!(
        "Predicted {} users in {} ms",
        predictions.len(),
        start_time.elapsed().as_millis()
    );

    let result = evaluate_held_out(
        &predictions,
        &test_set,
        config.evaluation.on_missing,
        config.evaluation.round_predictions,
    )
    .context("Could not evaluate the held-out ratings")?;

    println!("===============================================================");
    println!("===               START EVALUATING TEST FILE               ====");
    println!("===============================================================");
    println!("{}", EvaluationReporter::new().get_name());
    println!("{}", result.evaluation);
    println!("Qty test evaluations: {}", result.qty_evaluated);
    println!("Qty skipped test ratings: {}", result.qty_skipped);
    if stopwatch.get_n() > 0 {
        println!("Prediction latency per user");
        for (name, q) in [("p90", 0.90), ("p95", 0.95), ("p99.5", 0.995)] {
            if let Some(micros) = stopwatch.get_percentile_in_micros(q) {
                println!("{} (microseconds): {:.1}", name, micros);
            }
        }
    }
    Ok(())
}
