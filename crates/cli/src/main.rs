use std::io;
use std::sync::Arc;

use cropwise_ai::CropPredictor;
use cropwise_infra::{AppConfig, load};

fn main() -> anyhow::Result<()> {
    cropwise_observability::init();

    let config = AppConfig::from_env();
    tracing::info!(
        classifier = %config.artifacts.classifier.display(),
        top_k = config.top_k,
        "starting"
    );

    let predictor =
        CropPredictor::from_load(load(&config.artifacts).map(Arc::new)).with_top_k(config.top_k);

    let stdin = io::stdin();
    cropwise_cli::session::run(&predictor, stdin.lock(), io::stdout().lock())
}
