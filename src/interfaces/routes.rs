use actix_web::web;

use crate::handlers::system::{health_check, home};

mod json_error;
mod messages;
mod projects;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api")
            .service(health_check)
            .configure(projects::config_routes)
            .configure(messages::config_routes)
    );

    cfg.configure(json_error::config_routes);
}
