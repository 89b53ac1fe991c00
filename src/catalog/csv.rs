use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::slugify;
use crate::models::{City, Keyword};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{file} not found in {searched:?}")]
    NotFound { file: String, searched: Vec<PathBuf> },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads `file` from the first directory that has it.
pub fn read_data_file(file: &str, dirs: &[&Path]) -> Result<String, CatalogError> {
    let searched: Vec<PathBuf> = dirs.iter().map(|dir| dir.join(file)).collect();

    for path in &searched {
        if path.is_file() {
            debug!("Reading {}", path.display());
            return std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
                path: path.clone(),
                source,
            });
        }
        warn!("{} not found at {}", file, path.display());
    }

    Err(CatalogError::NotFound {
        file: file.to_string(),
        searched,
    })
}

fn data_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .skip(1)
}

/// Parses `id,name,province[,population]` rows. The first non-blank line is a header.
#[must_use]
pub fn parse_cities(content: &str) -> Vec<City> {
    let cities: Vec<City> = data_lines(content)
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            if parts.len() < 3 {
                debug!("Skipping city row with too few fields: {}", line);
                return None;
            }

            let (id, name, province) = (parts[0], parts[1], parts[2]);
            if id.is_empty() || name.is_empty() || province.is_empty() {
                return None;
            }

            let Ok(id) = id.parse::<i32>() else {
                debug!("Skipping city row with invalid id: {}", line);
                return None;
            };

            Some(City {
                id,
                name: name.to_string(),
                province: province.to_string(),
                population: parts.get(3).copied().unwrap_or_default().to_string(),
                slug: slugify(name),
            })
        })
        .collect();

    debug!("Parsed {} cities", cities.len());
    cities
}

/// Parses `id,name` rows. Ids may be decorated (`#3`); names may contain commas.
#[must_use]
pub fn parse_keywords(content: &str) -> Vec<Keyword> {
    let keywords: Vec<Keyword> = data_lines(content)
        .filter_map(|line| {
            let Some((raw_id, name)) = line.split_once(',') else {
                debug!("Skipping keyword row without a comma: {}", line);
                return None;
            };

            let digits: String = raw_id.chars().filter(char::is_ascii_digit).collect();
            let name = name.trim();
            if digits.is_empty() || name.is_empty() {
                return None;
            }

            let id = digits.parse::<i32>().ok()?;

            Some(Keyword {
                id,
                name: name.to_string(),
                slug: slugify(name),
            })
        })
        .collect();

    debug!("Parsed {} keywords", keywords.len());
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: &str = "id,name,province,population
1,Ciudad de Buenos Aires,Buenos Aires,3075646

2, Córdoba , Córdoba,1329604
3,Rosario,Santa Fe
bad,Nowhere,Santa Fe,10
4,,Mendoza,100
5,Only Two
";

    #[test]
    fn test_parse_cities() {
        let cities = parse_cities(CITIES);

        assert_eq!(cities.len(), 3);
        assert_eq!(
            cities[0],
            City {
                id: 1,
                name: "Ciudad de Buenos Aires".to_string(),
                province: "Buenos Aires".to_string(),
                population: "3075646".to_string(),
                slug: "ciudad-de-buenos-aires".to_string(),
            }
        );
        assert_eq!(cities[1].name, "Córdoba");
        assert_eq!(cities[1].slug, "cordoba");
        assert_eq!(cities[2].population, "");
    }

    #[test]
    fn test_parse_keywords() {
        let content = "#,keyword
#1,Pizza a la Piedra
2,Fugazzeta Rellena
#3,Muzzarella, con aceitunas
no comma here
,Sin Id
";
        let keywords = parse_keywords(content);

        assert_eq!(keywords.len(), 3);
        assert_eq!(keywords[0].id, 1);
        assert_eq!(keywords[0].slug, "pizza-a-la-piedra");
        assert_eq!(keywords[1].name, "Fugazzeta Rellena");
        assert_eq!(keywords[2].name, "Muzzarella, con aceitunas");
        assert_eq!(keywords[2].slug, "muzzarella-con-aceitunas");
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(parse_cities("id,name,province\n").is_empty());
        assert!(parse_keywords("").is_empty());
    }

    #[test]
    fn test_read_data_file_uses_fallback() {
        let root = std::env::temp_dir().join(format!("pizzerias-csv-{}", uuid::Uuid::new_v4()));
        let primary = root.join("pizzerias");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("cities.csv"), "id,name,province\n1,Salta,Salta\n").unwrap();

        let content = read_data_file("cities.csv", &[primary.as_path(), root.as_path()]).unwrap();
        assert_eq!(parse_cities(&content).len(), 1);

        let missing = read_data_file("keywords.csv", &[primary.as_path(), root.as_path()]);
        assert!(matches!(missing, Err(CatalogError::NotFound { .. })));

        std::fs::remove_dir_all(&root).ok();
    }
}
