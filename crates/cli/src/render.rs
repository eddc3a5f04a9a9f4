//! Plain-text rendering for terminal output.

use std::fmt::Write;

use engine::{ClusterSnapshot, StepView, Tutorial};

pub fn cluster(snapshot: &ClusterSnapshot) -> String {
    let mut out = String::new();
    if snapshot.nodes().is_empty() {
        out.push_str("no nodes\n");
    }
    for node in snapshot.nodes() {
        let _ = writeln!(out, "{:>4}  {:<9}  {}", node.name, node.status, node.url);
    }
    let _ = writeln!(
        out,
        "load generator: {}",
        if snapshot.load_active() { "on" } else { "off" }
    );
    out
}

pub fn step(view: &StepView) -> String {
    let mut out = format!("[{}/{}] {}\n", view.step, view.total, view.headline);
    for paragraph in &view.body {
        let _ = writeln!(out, "  {paragraph}");
    }
    for failure in &view.failures {
        let _ = writeln!(out, "  ! {failure}");
    }
    out
}

pub fn outline(tutorial: &Tutorial) -> String {
    let mut out = String::new();
    for (i, s) in tutorial.steps().iter().enumerate() {
        let _ = writeln!(out, "{:>2}. {} ({})", i + 1, s.headline, s.label());
    }
    out
}
