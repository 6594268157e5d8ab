use std::convert::TryInto;
use std::ffi::OsStr;
use std::fs::File;

use justconfig::error::ConfigError;
use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::Unquote;
use crate::error::{Error, Result};
use crate::evaluation::MissPolicy;
use crate::predictor::PredictorKind;
use crate::ratings::RatingScale;

// MovieLens 100k layout
const DEFAULT_USERS_PATH: &str = "./data/ml-100k/u.user";
const DEFAULT_ITEMS_PATH: &str = "./data/ml-100k/u.item";
const DEFAULT_LOG_LEVEL: &str = "info";

pub struct AppConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub evaluation: EvaluationConfig,
    pub runtime: RuntimeConfig,
    pub log: LogConfig,
}

pub struct DataConfig {
    pub users_path: String,
    pub items_path: String,
    pub training_data_path: String,
    pub test_data_path: String,
}

pub struct ModelConfig {
    pub predictor: PredictorKind,
    pub scale: RatingScale,
    pub parallel: bool,
}

pub struct EvaluationConfig {
    pub on_missing: MissPolicy,
    pub round_predictions: bool,
}

pub struct RuntimeConfig {
    pub num_threads: usize,
}

pub struct LogConfig {
    pub level: String,
}

fn config_error(error: ConfigError) -> Error {
    Error::Config(error.to_string())
}

impl AppConfig {
    /// Reads `config_path` when it exists, then applies environment overrides.
    pub fn new(config_path: &str) -> Result<AppConfig> {
        let mut conf = Config::default();

        if let Ok(config_file) = File::open(config_path) {
            let config_text = ConfigText::new(config_file, config_path)
                .map_err(|e| Error::Config(e.to_string()))?;
            conf.add_source(config_text);
        }

        let config_env = Env::new(&[
            (
                ConfPath::from(&["data", "users_path"]),
                OsStr::new("USERS_DATA"),
            ),
            (
                ConfPath::from(&["data", "items_path"]),
                OsStr::new("ITEMS_DATA"),
            ),
            (
                ConfPath::from(&["data", "training_data_path"]),
                OsStr::new("TRAINING_DATA"),
            ),
            (
                ConfPath::from(&["data", "test_data_path"]),
                OsStr::new("TEST_DATA"),
            ),
            (
                ConfPath::from(&["runtime", "num_threads"]),
                OsStr::new("NUM_THREADS"),
            ),
            (ConfPath::from(&["log", "level"]), OsStr::new("LOG_LEVEL")),
        ]);
        conf.add_source(config_env);

        AppConfig::parse(conf)
    }

    fn parse(conf: Config) -> Result<AppConfig> {
        Ok(AppConfig {
            data: DataConfig::parse(&conf, ConfPath::from(&["data"]))?,
            model: ModelConfig::parse(&conf, ConfPath::from(&["model"]))?,
            evaluation: EvaluationConfig::parse(&conf, ConfPath::from(&["evaluation"]))?,
            runtime: RuntimeConfig::parse(&conf, ConfPath::from(&["runtime"]))?,
            log: LogConfig::parse(&conf, ConfPath::from(&["log"]))?,
        })
    }
}

impl DataConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<DataConfig> {
        let users_path: Option<String> = conf
            .get(path.push("users_path"))
            .unquote()
            .try_value()
            .map_err(config_error)?;
        let items_path: Option<String> = conf
            .get(path.push("items_path"))
            .unquote()
            .try_value()
            .map_err(config_error)?;
        Ok(DataConfig {
            users_path: users_path.unwrap_or_else(|| DEFAULT_USERS_PATH.to_string()),
            items_path: items_path.unwrap_or_else(|| DEFAULT_ITEMS_PATH.to_string()),
            training_data_path: conf
                .get(path.push("training_data_path"))
                .unquote()
                .value()
                .map_err(config_error)?,
            test_data_path: conf
                .get(path.push("test_data_path"))
                .unquote()
                .value()
                .map_err(config_error)?,
        })
    }
}

impl ModelConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<ModelConfig> {
        let predictor: Option<String> = conf
            .get(path.push("predictor"))
            .unquote()
            .try_value()
            .map_err(config_error)?;
        let predictor = match predictor {
            Some(name) => name.parse()?,
            None => PredictorKind::SlopeOne,
        };
        let default_scale = RatingScale::default();
        let min_rating: Option<i32> = conf
            .get(path.push("min_rating"))
            .trim()
            .try_value()
            .map_err(config_error)?;
        let max_rating: Option<i32> = conf
            .get(path.push("max_rating"))
            .trim()
            .try_value()
            .map_err(config_error)?;
        let scale = RatingScale::new(
            min_rating.unwrap_or(default_scale.min),
            max_rating.unwrap_or(default_scale.max),
        )?;
        let parallel: Option<bool> = conf
            .get(path.push("parallel"))
            .trim()
            .try_value()
            .map_err(config_error)?;
        Ok(ModelConfig {
            predictor,
            scale,
            parallel: parallel.unwrap_or(false),
        })
    }
}

impl EvaluationConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<EvaluationConfig> {
        let on_missing: Option<String> = conf
            .get(path.push("on_missing"))
            .unquote()
            .try_value()
            .map_err(config_error)?;
        let round_predictions: Option<bool> = conf
            .get(path.push("round_predictions"))
            .trim()
            .try_value()
            .map_err(config_error)?;
        Ok(EvaluationConfig {
            on_missing: match on_missing {
                Some(policy) => policy.parse()?,
                None => MissPolicy::Abort,
            },
            round_predictions: round_predictions.unwrap_or(true),
        })
    }
}

impl RuntimeConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<RuntimeConfig> {
        let num_threads: Option<usize> = conf
            .get(path.push("num_threads"))
            .trim()
            .try_value()
            .map_err(config_error)?;
        Ok(RuntimeConfig {
            // Detect number of CPUs
            num_threads: num_threads.unwrap_or_else(|| {
                sys_info::cpu_num()
                    .ok()
                    .and_then(|qty| qty.try_into().ok())
                    .unwrap_or(1)
            }),
        })
    }
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<LogConfig> {
        let level: Option<String> = conf
            .get(path.push("level"))
            .unquote()
            .try_value()
            .map_err(config_error)?;
        Ok(LogConfig {
            level: level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }
}
