//! Plain-text rendering for terminal output.

use std::fmt::Write;

use alibi_core::analytics::SurveyReport;
use alibi_explore::solver::pipeline::GenerationLog;
use alibi_ir::theme::ThemePack;
use alibi_ir::types::{ClaimVector, Puzzle, Suspect};

pub fn puzzle(puzzle: &Puzzle, log: &GenerationLog, theme: &ThemePack) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Puzzle {} (attempt {}, seed {}, theme {})",
        puzzle.base_seed, puzzle.attempt, puzzle.seed, theme.name
    );
    if !puzzle.is_proven() {
        let _ = writeln!(out, "WARNING: no proof found after {} attempt(s)", log.attempts);
    }

    let _ = writeln!(out, "\nLocations:");
    for location in &puzzle.world.locations {
        let _ = writeln!(
            out,
            "  {:<14} ({:>3}, {:>3})",
            theme.location_label(location.id),
            location.coords.x,
            location.coords.y
        );
    }

    let _ = writeln!(out, "\nCrossings:");
    for edge in &puzzle.world.edges {
        if edge.from < edge.to {
            let _ = writeln!(
                out,
                "  {} <-> {}: {} min, {} bell(s)",
                theme.location_label(edge.from),
                theme.location_label(edge.to),
                edge.minutes,
                edge.bells_required
            );
        }
    }

    let _ = writeln!(out, "\nSuspects:");
    for suspect in &puzzle.suspects {
        let _ = writeln!(out, "  {}", suspect_line(suspect, theme));
        for line in claim_lines(&suspect.claim, theme) {
            let _ = writeln!(out, "      {line}");
        }
    }

    let _ = writeln!(out, "\nEvidence:");
    for (index, card) in puzzle.deck.iter().enumerate() {
        let _ = writeln!(out, "  [{index}] {}", card.archetype.slug());
        for fact in card.facts() {
            let _ = writeln!(out, "      {}", fact.text);
        }
    }

    if let Some(proof) = &puzzle.proof {
        if let Some(best) = proof.best_explanation() {
            let types: Vec<&str> = best.triggered_types.iter().map(|t| t.as_str()).collect();
            let _ = writeln!(
                out,
                "\nProof: cards {} separate the liar by {} ({} vs {}; {})",
                proof.best_pair,
                best.separation_margin,
                best.liar_strikes,
                best.runner_up_strikes,
                types.join(", ")
            );
        }
    }
    out
}

fn suspect_line(suspect: &Suspect, theme: &ThemePack) -> String {
    match theme.persona(suspect.persona) {
        Some(p) => format!("{} {}, {}", suspect.id, p.name, p.role),
        None => suspect.id.to_string(),
    }
}

fn claim_lines(claim: &ClaimVector, theme: &ThemePack) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in &claim.segments {
        let from_bell = theme.bell_label(segment.depart_bell);
        let to_bell = theme.bell_label(segment.arrive_bell);
        if segment.is_travel() {
            lines.push(format!(
                "left the {} at {from_bell}, reached the {} at {to_bell}",
                theme.location_label(segment.from),
                theme.location_label(segment.to)
            ));
        } else {
            lines.push(format!(
                "stayed at the {} from {from_bell} to {to_bell}",
                theme.location_label(segment.from)
            ));
        }
    }
    if let Some(horn) = claim.heard_horn {
        lines.push(format!(
            "heard the horn from the {} at {}",
            theme.location_label(horn.heard_from),
            theme.bell_label(horn.bell)
        ));
    }
    if let Some(relic) = claim.carried_relic {
        lines.push(format!("carried the {}", theme.relic_label(relic)));
    }
    if let Some(sensed) = claim.sensed {
        lines.push(format!(
            "smelled {} at the {}",
            theme.scent_label(sensed.scent),
            theme.location_label(sensed.location)
        ));
    }
    lines
}

pub fn survey(report: &SurveyReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Seeds {}..{}: {} proven, {} degraded ({:.1}% solved)",
        report.from_seed,
        u64::from(report.from_seed) + u64::from(report.count),
        report.solved,
        report.degraded,
        report.solve_rate() * 100.0
    );
    let _ = writeln!(
        out,
        "Attempts: {} total, {} puzzle(s) needed a retry",
        report.total_attempts, report.retried
    );
    if let Some(m) = &report.margins {
        let _ = writeln!(out, "Margins: min {}, max {}, mean {:.2}", m.min, m.max, m.mean);
    }
    let _ = writeln!(out, "Mean tied pairs: {:.2}", report.mean_ties);
    let _ = writeln!(out, "Best-pair archetypes:");
    for (archetype, hits) in &report.best_pair_archetypes {
        let _ = writeln!(out, "  {:<12} {hits}", archetype.slug());
    }
    out
}
