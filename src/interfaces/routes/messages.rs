use actix_web::web;

use crate::handlers::messages;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/messages")
            .service(
                web::resource("")
                    .route(web::post().to(messages::create_message))
                    .route(web::get().to(messages::list_messages))
            )
            .service(
                web::resource("/{message_id}")
                    .route(web::delete().to(messages::delete_message))
            )
    );

    // Contact form endpoint used by the public site
    cfg.service(
        web::scope("/contact")
            .service(
                web::resource("")
                    .route(web::post().to(messages::create_message))
                    .route(web::get().to(messages::list_messages))
            )
            .service(
                web::resource("/{message_id}")
                    .route(web::delete().to(messages::delete_message))
            )
    );
}
