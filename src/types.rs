use geo::Point;

#[derive(Debug, Clone)]
pub struct Region {
    pub name: String,
    // x = longitude, y = latitude
    pub location: Point<f64>,
    pub population: u64,
}

#[derive(Debug, Clone)]
pub struct AgeBracket {
    pub label: String,
    pub population: u64,
}
