//! PostgreSQL repository implementations

mod favorite;
mod restaurant;
mod user;
mod visit;

pub use favorite::PgFavoriteListRepository;
pub use restaurant::PgRestaurantRepository;
pub use user::PgUserRepository;
pub use visit::PgVisitRepository;
