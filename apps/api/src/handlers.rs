pub mod areas;
pub mod geography;
pub mod health;
pub mod notifications;
pub mod requests;
pub mod surveys;
pub mod users;
