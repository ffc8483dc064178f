//! Terminal formatting for constructed models and sweeps.

use crate::domain::Namespace;
use crate::model::{DrawOutcome, HankModel, Rejection, SweepSummary};
use crate::registry::NormalizedRegistry;

/// Dimensions, grids and steady state of a constructed model.
pub fn format_model_summary(model: &HankModel) -> String {
    let mut out = String::new();
    let c = &model.config;
    let reg = &model.registry;
    let base = reg.unnormalized();

    out.push_str("=== hank - model construction ===\n");
    out.push_str(&format!(
        "Grid: nx={} x ns={} = {} points\n",
        c.nx,
        c.ns,
        model.total.len()
    ));
    let g = model.grid_settings();
    out.push_str(&format!(
        "Cash on hand: [{:.4}, {:.4}] | xscale={:.4} | sscale={:.4}\n",
        g.xlo, g.xhi, g.xscale, g.sscale
    ));
    out.push_str(&format!("Skill nodes: {}\n", fmt_vec(model.skill.nodes().as_slice())));
    out.push_str(&format!("Skill weights: {}\n", fmt_vec(model.skill.weights().as_slice())));

    out.push_str("\nDimensions:\n");
    out.push_str(&format!(
        "- endogenous states: {} (2·{} + {})\n",
        base.endogenous_dim(),
        base.grid_size(),
        base.scalar_count()
    ));
    out.push_str(&format!(
        "- normalized states: {} (+{} augmented)\n",
        reg.endogenous_dim(),
        reg.augmented().dim()
    ));
    out.push_str(&format!(
        "- removed dof: state={} jump={}\n",
        c.dof_removed_state, c.dof_removed_jump
    ));
    out.push_str(&format!(
        "- Qx: {}x{} | Qy: {}x{} | Qleft: {}x{}\n",
        model.matrices.qx.nrows(),
        model.matrices.qx.ncols(),
        model.matrices.qy.nrows(),
        model.matrices.qy.ncols(),
        model.matrices.qleft.nrows(),
        model.matrices.qleft.ncols()
    ));
    out.push_str(&format!(
        "- predetermined variables: {} | model states: {}\n",
        model.n_predetermined_variables(),
        model.n_model_states()
    ));

    out.push_str("\nSteady state:\n");
    for (key, value) in model.steady_state.iter() {
        out.push_str(&format!("  {:<6} {value:>12.6}\n", key.name()));
    }

    out
}

/// Every namespace of the normalized layout, 1-based inclusive.
pub fn format_ranges(registry: &NormalizedRegistry) -> String {
    let mut out = String::new();
    for ns in Namespace::ALL {
        out.push_str(&format!("\n[{}]\n", ns.display_name()));
        let layout = registry.layout(ns);
        let extra = if ns == Namespace::EndogenousStates {
            Some(registry.augmented())
        } else {
            None
        };
        for (symbol, range) in layout.iter().chain(extra.into_iter().flat_map(|l| l.iter())) {
            out.push_str(&format!("  {:<24} {range}\n", symbol.as_str()));
        }
    }
    out
}

pub fn format_rejection(rejection: &Rejection) -> String {
    let mut out = String::new();
    out.push_str("Parameter draw rejected: ");
    out.push_str(&rejection.reason);
    out.push('\n');
    let bad = rejection.steady_state.non_finite();
    if !bad.is_empty() {
        let names: Vec<&str> = bad.iter().map(|k| k.name()).collect();
        out.push_str(&format!("Non-finite steady-state values: {}\n", names.join(", ")));
    }
    out
}

pub fn format_sweep_summary(summary: &SweepSummary, outcomes: &[DrawOutcome]) -> String {
    let mut out = String::new();
    out.push_str("=== hank - prior sweep ===\n");
    out.push_str(&format!(
        "Draws: {} | accepted={} rejected={} failed={} | acceptance={:.1}%\n",
        summary.draws,
        summary.accepted,
        summary.rejected,
        summary.failed,
        100.0 * summary.acceptance_rate()
    ));

    let outputs: Vec<f64> = outcomes
        .iter()
        .filter_map(|o| match o {
            DrawOutcome::Accepted { output, .. } if output.is_finite() => Some(*output),
            _ => None,
        })
        .collect();
    if let (Some(lo), Some(hi)) = (
        outputs.iter().copied().reduce(f64::min),
        outputs.iter().copied().reduce(f64::max),
    ) {
        out.push_str(&format!("Steady-state output: [{lo:.4}, {hi:.4}]\n"));
    }

    for o in outcomes {
        match o {
            DrawOutcome::Rejected { index, reason } => {
                out.push_str(&format!("  draw {index:>5} rejected: {}\n", truncate(reason, 72)));
            }
            DrawOutcome::Failed { index, error } => {
                out.push_str(&format!("  draw {index:>5} failed: {}\n", truncate(error, 72)));
            }
            DrawOutcome::Accepted { .. } => {}
        }
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelConfig;
    use crate::model::{Construction, construct, hank_parameters};

    #[test]
    fn sweep_summary_lists_only_unsuccessful_draws() {
        let outcomes = vec![
            DrawOutcome::Accepted {
                index: 0,
                n_model_states: 10,
                output: 1.5,
            },
            DrawOutcome::Rejected {
                index: 1,
                reason: "Cash-on-hand bounds are not finite".into(),
            },
        ];
        let s = format_sweep_summary(&SweepSummary::from_outcomes(&outcomes), &outcomes);
        assert!(s.contains("accepted=1 rejected=1 failed=0"));
        assert!(s.contains("draw     1 rejected"));
        assert!(!s.contains("draw     0"));
        assert!(s.contains("[1.5000, 1.5000]"));
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn model_summary_and_ranges_mention_key_sizes() {
        let config = ModelConfig {
            nx: 10,
            ..ModelConfig::default()
        };
        let Construction::Built(model) = construct(&config, &hank_parameters().unwrap()).unwrap() else {
            panic!("default parameters should build");
        };
        let summary = format_model_summary(&model);
        assert!(summary.contains("nx=10 x ns=2 = 20 points"));
        assert!(summary.contains("2·20 + 28"));

        let ranges = format_ranges(&model.registry);
        assert!(ranges.contains("[equilibrium conditions]"));
        assert!(ranges.contains("pi_t1"));
    }
}
