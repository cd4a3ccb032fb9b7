use actix_web::{App, HttpServer, middleware, web};

use marketdesk::config::AppConfig;
use marketdesk::console::{OrderConsole, RequestConsole};
use marketdesk::workflow::PriceRules;
use marketdesk::workflow::guard::InFlightGuard;
use marketdesk::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let store = db::connect(config.database.as_ref())
        .await
        .map_err(std::io::Error::other)?;
    log::info!("Using {} store", store.backend_name());

    if config.seed_demo {
        let (orders, requests) = db::seed_demo(&store)
            .await
            .map_err(std::io::Error::other)?;
        if orders + requests > 0 {
            log::info!("Seeded {orders} orders and {requests} gadget requests");
        }
    }

    // One guard for both consoles; keys carry the entity kind.
    let guard = InFlightGuard::new();
    let orders = web::Data::new(OrderConsole::new(store.clone(), guard.clone()));
    let requests = web::Data::new(RequestConsole::new(
        store,
        guard,
        PriceRules {
            max: config.offer_price_max,
        },
    ));

    log::info!("Starting server at http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::from_fn(handlers::middleware::correlation_id))
            .wrap(middleware::Logger::default())
            .app_data(orders.clone())
            .app_data(requests.clone())
            .configure(handlers::configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
