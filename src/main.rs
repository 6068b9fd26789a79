use anyhow::Result;
use robot_order_bot::utils::logging;
use robot_order_bot::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init(config.verbose_logging);

    App::new(config).run().await
}
