use actix_web::{web, HttpResponse};
use std::sync::atomic::{AtomicU64, Ordering};
use crate::services::PokedexService;

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus metrics", body = String, content_type = "text/plain")
    )
)]
pub async fn get_metrics(service: web::Data<PokedexService>) -> HttpResponse {
    let requests = REQUEST_COUNT.load(Ordering::Relaxed);
    let errors = ERROR_COUNT.load(Ordering::Relaxed);
    let cache = service.cache_stats();

    let metrics = format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP errors\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n\
         \n\
         # HELP cache_hits_total Lookups answered from the cache\n\
         # TYPE cache_hits_total counter\n\
         cache_hits_total {}\n\
         \n\
         # HELP cache_misses_total Lookups that found no live entry\n\
         # TYPE cache_misses_total counter\n\
         cache_misses_total {}\n\
         \n\
         # HELP cache_evictions_total Expired entries removed\n\
         # TYPE cache_evictions_total counter\n\
         cache_evictions_total {}\n\
         \n\
         # HELP cache_entries Entries currently stored\n\
         # TYPE cache_entries gauge\n\
         cache_entries {}\n",
        requests, errors, cache.hits, cache.misses, cache.evictions, cache.entries
    );

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics)
}
