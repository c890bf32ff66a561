use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use log::{debug, info};
use serde::{Deserialize, Serialize};

const DEPTH_SECTION: &str = "Node Depth Summary";
const FLOODING_SECTION: &str = "Node Flooding Summary";

/// Row of the node depth summary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeDepth {
    pub node_id: String,
    pub node_type: String,
    /// Average water depth (meters)
    pub avg_depth: f64,
    /// Maximum water depth (meters)
    pub max_depth: f64,
    /// Reported maximum water depth, last column of the row (meters)
    pub reported_max_depth: f64,
}

/// Row of the node flooding summary
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeFlooding {
    pub node_id: String,
    pub hours_flooded: f64,
    /// Maximum overflow rate (CMS)
    pub max_rate: f64,
    /// Total flood volume (10^6 liters), always positive
    pub total_volume: f64,
}

/// Per-node results extracted from a SWMM report (`.rpt`) file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SwmmReport {
    pub node_depths: Vec<NodeDepth>,
    pub node_flooding: Vec<NodeFlooding>,
}

impl SwmmReport {
    pub fn depth_of(&self, node_id: &str) -> Option<&NodeDepth> {
        self.node_depths.iter().find(|d| d.node_id == node_id)
    }

    pub fn flooding_of(&self, node_id: &str) -> Option<&NodeFlooding> {
        self.node_flooding.iter().find(|f| f.node_id == node_id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Section {
    Depth,
    Flooding,
}

/// Extracts the node depth and node flooding summaries from the text of a SWMM report.
///
/// Flooding rows with a zero volume are dropped.
/// A report without a node flooding summary is valid (nothing flooded), one without a node depth summary is not.
pub fn parse_report(text: &str) -> Result<SwmmReport> {
    let mut report = SwmmReport::default();
    let mut section = None;
    let mut header_found = false;
    let mut depth_section_seen = false;

    for (line_nr, line) in text.lines().enumerate() {
        let line = line.trim();

        if line.contains(DEPTH_SECTION) {
            section = Some(Section::Depth);
            header_found = false;
            depth_section_seen = true;
            continue;
        }
        if line.contains(FLOODING_SECTION) {
            section = Some(Section::Flooding);
            header_found = false;
            continue;
        }
        let Some(current) = section else {
            continue;
        };

        let parts = line.split_whitespace().collect::<Vec<_>>();
        if !header_found {
            //the column header row closes the table heading
            header_found = parts.first() == Some(&"Node") && parts.len() > 1;
            continue;
        }
        if line.starts_with('*') {
            //banner of the next section
            section = None;
            header_found = false;
            continue;
        }
        if line.is_empty() || line.starts_with("--") {
            continue;
        }

        let parsed = match current {
            Section::Depth => parse_depth_row(&parts).map(|d| report.node_depths.push(d)),
            Section::Flooding => parse_flooding_row(&parts).map(|f| {
                if let Some(f) = f {
                    report.node_flooding.push(f)
                }
            }),
        };
        if parsed.is_none() {
            debug!("[REPORT] skipping unparsable row {}: {}", line_nr + 1, line);
        }
    }

    ensure!(
        depth_section_seen,
        "no \"{DEPTH_SECTION}\" section found in report"
    );
    info!(
        "[REPORT] parsed {} node depths, {} flooded nodes",
        report.node_depths.len(),
        report.node_flooding.len()
    );
    Ok(report)
}

pub fn read_report(path: &Path) -> Result<SwmmReport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read report file: {}", path.display()))?;
    parse_report(&text).with_context(|| format!("invalid report file: {}", path.display()))
}

fn parse_depth_row(parts: &[&str]) -> Option<NodeDepth> {
    match parts {
        [node_id, node_type, avg, max, .., last] => Some(NodeDepth {
            node_id: node_id.to_string(),
            node_type: node_type.to_string(),
            avg_depth: avg.parse().ok()?,
            max_depth: max.parse().ok()?,
            reported_max_depth: last.parse().ok()?,
        }),
        [node_id, node_type, avg, max] => {
            let max_depth = max.parse().ok()?;
            Some(NodeDepth {
                node_id: node_id.to_string(),
                node_type: node_type.to_string(),
                avg_depth: avg.parse().ok()?,
                max_depth,
                reported_max_depth: max_depth,
            })
        }
        _ => None,
    }
}

/// `Some(None)` for a well-formed row without any flooding
fn parse_flooding_row(parts: &[&str]) -> Option<Option<NodeFlooding>> {
    if parts.len() < 6 {
        return None;
    }
    let total_volume: f64 = parts[5].parse().ok()?;
    let flooding = NodeFlooding {
        node_id: parts[0].to_string(),
        hours_flooded: parts[1].parse().ok()?,
        max_rate: parts[2].parse().ok()?,
        total_volume,
    };
    Some((total_volume > 0.0).then_some(flooding))
}
