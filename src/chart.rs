use crate::types::AgeBracket;
use anyhow::Result;
use serde::Serialize;

pub const BAR_COLOR: &str = "indianred";
pub const PIE_HOLE: f64 = 0.3;

/// Plasma sequential palette, dark violet to yellow, one stop per slice.
pub const PLASMA_PALETTE: [&str; 10] = [
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.32.0.min.js";

#[derive(Debug, Serialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: Vec<String>,
    pub y: Vec<u64>,
    pub name: &'static str,
    pub marker: BarMarker,
}

#[derive(Debug, Serialize)]
pub struct BarMarker {
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PieTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub name: &'static str,
    pub hole: f64,
    pub textinfo: &'static str,
    pub marker: PieMarker,
}

#[derive(Debug, Serialize)]
pub struct PieMarker {
    pub colors: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Layout {
    pub title: Text,
    pub grid: Grid,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub showlegend: bool,
}

#[derive(Debug, Serialize)]
pub struct Text {
    pub text: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Grid {
    pub rows: u8,
    pub columns: u8,
}

#[derive(Debug, Serialize)]
pub struct Axis {
    pub title: Text,
}

#[derive(Debug)]
pub struct Figure {
    pub bar: BarTrace,
    pub pie: PieTrace,
    pub layout: Layout,
}

/// Builds the combined bar + donut figure for the age-bracket table.
/// Population values flow into both traces unmodified; upstream data is
/// trusted here.
pub fn build_figure(brackets: &[AgeBracket]) -> Figure {
    println!("Composing chart for {} age brackets...", brackets.len());

    let labels: Vec<String> = brackets.iter().map(|b| b.label.clone()).collect();
    let populations: Vec<u64> = brackets.iter().map(|b| b.population).collect();

    Figure {
        bar: BarTrace {
            kind: "bar",
            x: labels.clone(),
            y: populations.clone(),
            name: "Population par Tranche d'Âge",
            marker: BarMarker { color: BAR_COLOR },
        },
        pie: PieTrace {
            kind: "pie",
            labels,
            values: populations,
            name: "Distribution par Tranche d'Âge",
            hole: PIE_HOLE,
            textinfo: "label+percent",
            marker: PieMarker {
                colors: PLASMA_PALETTE.to_vec(),
            },
        },
        layout: Layout {
            title: Text {
                text: "Visualisation Démographique Avancée pour la RDC",
            },
            grid: Grid { rows: 1, columns: 2 },
            xaxis: Axis {
                title: Text {
                    text: "Tranche d'Âge",
                },
            },
            yaxis: Axis {
                title: Text { text: "Population" },
            },
            showlegend: true,
        },
    }
}

/// Percent-of-total view of the bracket populations, in table order.
/// This is the proportion each donut slice represents.
pub fn proportions(brackets: &[AgeBracket]) -> Vec<f64> {
    let total: u64 = brackets.iter().map(|b| b.population).sum();
    if total == 0 {
        return vec![0.0; brackets.len()];
    }
    brackets
        .iter()
        .map(|b| b.population as f64 / total as f64 * 100.0)
        .collect()
}

impl Figure {
    /// Serializes the figure to a self-contained plotly page. Deterministic
    /// for identical input.
    pub fn to_html(&self) -> Result<String> {
        let bar = serde_json::to_string(&self.bar)?;
        let pie = serde_json::to_string(&self.pie)?;
        let layout = serde_json::to_string(&self.layout)?;

        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Population de la RDC par tranche d'âge</title>\n\
             <script src=\"{}\" charset=\"utf-8\"></script>\n\
             </head>\n<body>\n\
             <div id=\"chart\" style=\"width: 100%; height: 100vh;\"></div>\n\
             <script>\n\
             var data = [{}, {}];\n\
             var layout = {};\n\
             Plotly.newPlot(\"chart\", data, layout);\n\
             </script>\n</body>\n</html>\n",
            PLOTLY_JS, bar, pie, layout
        ))
    }
}
