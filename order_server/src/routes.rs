//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every handler here awaits the cache or the database
//! asynchronously, so a slow lookup only holds up its own request.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use order_engine::{db_types::OrderId, LookupApi, OrderStorage};

use crate::errors::ServerError;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(order_by_id => Get "/order/{order_uid}" impl OrderStorage);
/// Use `/order/{order_uid}` to fetch a single order.
///
/// The order is served from the cache when possible, otherwise from the database. Returns 404 if the order does not
/// exist and 500 if it could not be read.
pub async fn order_by_id<B: OrderStorage>(
    path: web::Path<String>,
    api: web::Data<LookupApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_uid = OrderId::from(path.trim());
    debug!("💻️ GET order_by_id({order_uid})");
    if order_uid.is_blank() {
        return Err(ServerError::NoRecordFound("No order id was given".into()));
    }
    let order = api.lookup(&order_uid).await.map_err(|e| {
        warn!("💻️ Could not fetch order {order_uid}. {e}");
        ServerError::from(e)
    })?;
    match order {
        Some(order) => Ok(HttpResponse::Ok().json(order.as_ref())),
        None => Err(ServerError::NoRecordFound(format!("Order {order_uid} does not exist"))),
    }
}
