mod api;
mod app;
mod config;
mod constants;
mod errors;
mod models;
mod store;
mod utils;

use actix_web::middleware::Logger;
use actix_web::{web, App as ActixWebApp, HttpServer};
use app::App;

use crate::utils::logger::log_fatal;

#[tokio::main]
async fn main() {
    let app = App::new().await;
    let port = app.port();

    app.init();
    let app_web_data = web::Data::new(app);

    let server = HttpServer::new(move || {
        ActixWebApp::new()
            .wrap(Logger::new("%a %r %s %b %{Referer}i %{User-Agent}i %T"))
            .wrap(app_web_data.cors())
            .app_data(app_web_data.clone())
            .configure(api::config)
    })
    .bind(("0.0.0.0", port))
    .unwrap_or_else(|e| {
        log_fatal(format!("Could not bind to port {}.", port));
        panic!("{}", e)
    });

    server
        .run()
        .await
        .unwrap_or_else(|e| panic!("Could not run server to port {}.\n{}", port, e));
}
