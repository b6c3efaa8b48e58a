use anyhow::Result;
use beam_engine::logging::init_logging;
use beam_engine::window::Runtime;
use beam_game::{Beam, GameConfig};

fn main() -> Result<()> {
    let config = GameConfig::from_env()?;
    init_logging(config.logging.clone());

    log::info!("starting {} ({}x{})", config.title, config.width, config.height);

    Runtime::run(config.runtime(), config.gpu(), Beam::new(config.program.clone()))
}
