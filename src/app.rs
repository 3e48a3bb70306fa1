use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::builder::build_scene_contents;
use crate::config::SegmentCount;
use crate::scene::{Scene, WedgeSummary, BACKGROUND};

/// Headless description of the scene a view would display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneReport {
    pub segments: u32,
    pub background: String,
    pub lights: usize,
    pub grids: usize,
    pub wedges: Vec<WedgeSummary>,
}

impl SceneReport {
    pub fn from_scene(segments: SegmentCount, scene: &Scene) -> Self {
        Self {
            segments: segments.get(),
            background: scene.background().to_string(),
            lights: scene.lights().count(),
            grids: scene.grids().count(),
            wedges: scene.wedges().map(|wedge| wedge.summary()).collect(),
        }
    }
}

/// Builds the scene for `segments` without any display attached.
pub fn build_report(segments: SegmentCount) -> Result<SceneReport> {
    let nodes = build_scene_contents(segments.get() as i64)
        .with_context(|| format!("failed to build {segments} wedge(s)"))?;
    let mut scene = Scene::new(BACKGROUND);
    scene.replace_contents(nodes);
    Ok(SceneReport::from_scene(segments, &scene))
}

pub fn print_report(report: &SceneReport) {
    println!(
        "Radar with {} segment(s), background {}, {} light(s), {} grid(s):",
        report.segments, report.background, report.lights, report.grids
    );
    for wedge in &report.wedges {
        println!(
            " - wedge {} span=[{:.1}, {:.1}) depth={:.0} hue={:.3} color={} triangles={}",
            wedge.index,
            wedge.start_degrees,
            wedge.end_degrees,
            wedge.depth,
            wedge.hue,
            wedge.color,
            wedge.triangles
        );
    }
}

pub fn report_json(report: &SceneReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize scene report")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_wedge() {
        let report = build_report(SegmentCount::new(3).unwrap()).unwrap();
        assert_eq!(report.segments, 3);
        assert_eq!(report.background, "#999999");
        assert_eq!((report.lights, report.grids), (1, 1));
        let colors: Vec<&str> = report.wedges.iter().map(|w| w.color.as_str()).collect();
        assert_eq!(colors, vec!["#ff0000", "#00ff4a", "#9500ff"]);
    }

    #[test]
    fn json_report_parses_back() {
        let report = build_report(SegmentCount::DEFAULT).unwrap();
        let json = report_json(&report).unwrap();
        let parsed: SceneReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.wedges.len(), 5);
        assert_eq!(parsed.segments, 5);
    }
}
