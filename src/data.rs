use crate::config::AppConfig;
use crate::types::{AgeBracket, Region};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use geo::Point;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// Built-in demographic table for the five largest cities of the DRC.
pub fn default_regions() -> Vec<Region> {
    vec![
        region("Kinshasa", -4.3214, 15.3134, 12_300_000),
        region("Lubumbashi", -11.6687, 27.4797, 700_000),
        region("Goma", -1.6701, 29.2130, 400_000),
        region("Kisangani", 0.5167, 25.1944, 300_000),
        region("Bukavu", -2.5250, 28.8552, 200_000),
    ]
}

/// Built-in population table by age bracket.
pub fn default_age_brackets() -> Vec<AgeBracket> {
    vec![
        bracket("0-14", 15_000_000),
        bracket("15-24", 10_000_000),
        bracket("25-54", 8_000_000),
        bracket("55-64", 3_000_000),
        bracket("65+", 1_000_000),
    ]
}

fn region(name: &str, lat: f64, lon: f64, population: u64) -> Region {
    Region {
        name: name.to_string(),
        location: Point::new(lon, lat),
        population,
    }
}

fn bracket(label: &str, population: u64) -> AgeBracket {
    AgeBracket {
        label: label.to_string(),
        population,
    }
}

pub fn load_regions(config: &AppConfig) -> Result<Vec<Region>> {
    match &config.input.regions_csv {
        Some(path) => {
            println!("Loading regions from {:?}...", path);
            let regions = load_regions_csv(path)?;
            println!("Loaded {} regions", regions.len());
            Ok(regions)
        }
        None => Ok(default_regions()),
    }
}

pub fn load_age_brackets(config: &AppConfig) -> Result<Vec<AgeBracket>> {
    match &config.input.age_brackets_csv {
        Some(path) => {
            println!("Loading age brackets from {:?}...", path);
            let brackets = load_age_brackets_csv(path)?;
            println!("Loaded {} age brackets", brackets.len());
            Ok(brackets)
        }
        None => Ok(default_age_brackets()),
    }
}

// Expected headers: region, latitude, longitude, population
fn load_regions_csv(path: &Path) -> Result<Vec<Region>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open regions CSV: {:?}", path))?;
    let mut rdr = ReaderBuilder::new().from_reader(file);
    let headers = rdr.headers()?.clone();

    let name_idx = column_index(&headers, "region")?;
    let lat_idx = column_index(&headers, "latitude")?;
    let lon_idx = column_index(&headers, "longitude")?;
    let pop_idx = column_index(&headers, "population")?;

    let mut regions = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let name = record.get(name_idx).unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        let lat: f64 = record
            .get(lat_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("Invalid latitude for region '{}'", name))?;
        let lon: f64 = record
            .get(lon_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("Invalid longitude for region '{}'", name))?;
        let population: u64 = record
            .get(pop_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("Invalid population for region '{}'", name))?;

        if !(-90.0..=90.0).contains(&lat) {
            return Err(anyhow!("Latitude {} out of range for region '{}'", lat, name));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(anyhow!("Longitude {} out of range for region '{}'", lon, name));
        }

        regions.push(Region {
            name,
            location: Point::new(lon, lat),
            population,
        });
    }

    Ok(regions)
}

// Expected headers: age_group, population
fn load_age_brackets_csv(path: &Path) -> Result<Vec<AgeBracket>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open age brackets CSV: {:?}", path))?;
    let mut rdr = ReaderBuilder::new().from_reader(file);
    let headers = rdr.headers()?.clone();

    let label_idx = column_index(&headers, "age_group")?;
    let pop_idx = column_index(&headers, "population")?;

    let mut brackets = Vec::new();
    let mut seen = HashSet::new();

    for result in rdr.records() {
        let record = result?;
        let label = record.get(label_idx).unwrap_or("").to_string();
        if label.is_empty() {
            continue;
        }

        if !seen.insert(label.clone()) {
            return Err(anyhow!("Duplicate age bracket label '{}'", label));
        }

        let population: u64 = record
            .get(pop_idx)
            .unwrap_or("")
            .parse()
            .with_context(|| format!("Invalid population for age bracket '{}'", label))?;

        brackets.push(AgeBracket { label, population });
    }

    Ok(brackets)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| anyhow!("Column '{}' not found in CSV", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_tables() {
        let regions = default_regions();
        assert_eq!(regions.len(), 5);
        assert_eq!(regions[0].name, "Kinshasa");
        assert_eq!(regions[0].population, 12_300_000);
        assert_eq!(regions[0].location.y(), -4.3214);
        assert_eq!(regions[0].location.x(), 15.3134);
        assert_eq!(regions[4].name, "Bukavu");
        assert_eq!(regions[4].population, 200_000);

        let brackets = default_age_brackets();
        assert_eq!(brackets.len(), 5);
        assert_eq!(brackets[0].label, "0-14");
        assert_eq!(brackets[0].population, 15_000_000);
        assert_eq!(brackets[4].label, "65+");
        assert_eq!(brackets[4].population, 1_000_000);
    }

    fn write_temp_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_regions_csv() {
        let file = write_temp_csv(
            "region,latitude,longitude,population\n\
             Kinshasa,-4.3214,15.3134,12300000\n\
             Bukavu,-2.5250,28.8552,200000\n",
        );
        let regions = load_regions_csv(file.path()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].name, "Bukavu");
        assert_eq!(regions[1].location.x(), 28.8552);
        assert_eq!(regions[1].population, 200_000);
    }

    #[test]
    fn test_load_regions_csv_rejects_bad_latitude() {
        let file = write_temp_csv(
            "region,latitude,longitude,population\n\
             Nowhere,95.0,15.0,1000\n",
        );
        let err = load_regions_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_load_regions_csv_missing_column() {
        let file = write_temp_csv("region,latitude,population\nKinshasa,-4.3,12300000\n");
        let err = load_regions_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("'longitude' not found"));
    }

    #[test]
    fn test_load_age_brackets_csv_rejects_duplicates() {
        let file = write_temp_csv(
            "age_group,population\n\
             0-14,15000000\n\
             0-14,1\n",
        );
        let err = load_age_brackets_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("Duplicate age bracket"));
    }
}
