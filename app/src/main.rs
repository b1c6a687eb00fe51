use std::io;

use log::info;
use todo_app::{ApiProvider, App, AppError, HttpTransport, Root};
use todo_core::ApiConfig;

fn main() -> Result<(), AppError> {
    env_logger::init();

    let config = ApiConfig::default();
    info!("todo server at {}", config.base_url);
    let mut provider = ApiProvider::new(&config, HttpTransport::new());

    let root = Root::create(io::stdout().lock());
    root.render(&mut provider, App::new(), io::stdin().lock())
}
