use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub province: String,
    /// Kept as text; the source files mix plain digits with thousands separators.
    pub population: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Keyword {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Province {
    pub name: String,
    pub slug: String,
    pub cities: Vec<City>,
}
