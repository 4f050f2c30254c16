pub mod analysis;
pub mod categories;
pub mod health;
pub mod ideas;
pub mod tags;
pub mod users;
pub mod votes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users                                   list, create
/// /users/{id}                              get
///
/// /categories                              list, create
/// /categories/{id}                         get, update
///
/// /tags                                    list, create (or get)
/// /tags/{id}                               get, rename
///
/// /ideas                                   list (filters, pagination), create
/// /ideas/stats                             totals and distributions
/// /ideas/{id}                              get, update, delete
/// /ideas/{id}/analysis                     record AI results (PUT)
/// /ideas/{id}/comments                     list, create
/// /ideas/{id}/votes                        list, cast
/// /ideas/{id}/votes/{user_id}              retract (DELETE)
///
/// /votes/stats                             vote statistics report
///
/// /analysis/overview                       service-mapping overview
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/tags", tags::router())
        .nest("/ideas", ideas::router())
        .nest("/votes", votes::router())
        .nest("/analysis", analysis::router())
}
