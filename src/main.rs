#[macro_use]
extern crate rocket;

use log::info;
use rocket::fairing::AdHoc;
use std::env;
use std::sync::Arc;

use robot_arena::arena::Arena;
use robot_arena::config::Config;
use robot_arena::handler;
use robot_arena::round_logger::RoundLogger;
use robot_arena::store::MemoryStore;

#[launch]
async fn rocket() -> _ {
    // Lots of web hosting services expect you to bind to the port specified by the `PORT`
    // environment variable. However, Rocket looks at the `ROCKET_PORT` environment variable.
    // If we find a value for `PORT`, we set `ROCKET_PORT` to that value.
    if let Ok(port) = env::var("PORT") {
        env::set_var("ROCKET_PORT", &port);
    }

    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Robot Arena Server...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    let logger = RoundLogger::new(config.round_log.enabled, &config.round_log.log_file_path).await;
    let arena = Arena::new(config, Arc::new(MemoryStore::new()), logger);

    rocket::build()
        .manage(arena)
        .attach(AdHoc::on_response("Server ID Middleware", |_, res| {
            Box::pin(async move {
                res.set_raw_header("Server", "robot-arena");
            })
        }))
        .mount(
            "/",
            routes![
                handler::index,
                handler::register,
                handler::unregister,
                handler::start_match,
                handler::game,
                handler::game_info
            ],
        )
}
