pub mod location;
pub mod pizzeria;
pub mod search;

pub use location::{City, Keyword, Province};
pub use pizzeria::{OpeningHours, Pizzeria};
pub use search::{CompleteSearchResult, PlacesPage, SearchPage};
