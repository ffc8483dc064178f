//! Variable declarations of the one-asset HANK model.

use crate::domain::BlockKind;
use crate::error::AppError;
use crate::registry::{IndexRegistry, RegistryBuilder};

/// Predetermined states, each with the equation that pins it down.
const BACKWARD_LOOKING: [(&str, BlockKind, &str); 8] = [
    ("mu_t", BlockKind::Function, "eq_kolmogorov_fwd"),
    ("k_t", BlockKind::Structural, "eq_capital_accumulation"),
    ("b_t", BlockKind::Structural, "eq_govt_budget"),
    ("r_t1", BlockKind::Lagged, "eq_r_lag"),
    ("i_t1", BlockKind::Lagged, "eq_i_lag"),
    ("y_t1", BlockKind::Lagged, "eq_y_lag"),
    ("w_t1", BlockKind::Lagged, "eq_w_lag"),
    ("c_t1", BlockKind::Lagged, "eq_c_lag"),
];

const JUMPS: [(&str, BlockKind, &str); 15] = [
    ("ell_t", BlockKind::Function, "eq_euler"),
    ("kprime_t", BlockKind::Aggregate, "eq_market_clearing"),
    ("n_t", BlockKind::Aggregate, "eq_labor_agg"),
    ("c_t", BlockKind::Aggregate, "eq_consumption_agg"),
    ("rk_t", BlockKind::Structural, "eq_rental_rate"),
    ("w_t", BlockKind::Structural, "eq_wage"),
    ("y_t", BlockKind::Structural, "eq_production"),
    ("i_t", BlockKind::Structural, "eq_investment"),
    ("q_t", BlockKind::Structural, "eq_tobin_q"),
    ("tr_t", BlockKind::Structural, "eq_transfers"),
    ("r_t", BlockKind::Structural, "eq_fisher"),
    ("pi_t", BlockKind::Structural, "eq_phillips"),
    ("rn_t", BlockKind::Structural, "eq_taylor_rule"),
    ("mc_t", BlockKind::Structural, "eq_marginal_cost"),
    ("tax_t", BlockKind::Structural, "eq_tax_rule"),
];

/// AR(1) shock states: (state, law of motion, innovation).
pub const SHOCKS: [(&str, &str, &str); 7] = [
    ("zp_t", "eq_zp", "zp_sh"),
    ("z_t", "eq_z", "z_sh"),
    ("g_t", "eq_g", "g_sh"),
    ("bet_t", "eq_bet", "bet_sh"),
    ("mu_inv_t", "eq_mu_inv", "mu_inv_sh"),
    ("lamf_t", "eq_lamf", "lamf_sh"),
    ("rm_t", "eq_rm", "rm_sh"),
];

const EXPECTED_SHOCKS: [&str; 4] = ["E_c", "E_q", "E_rk", "E_pi"];

const OBSERVABLES: [&str; 7] = [
    "obs_gdp",
    "obs_consumption",
    "obs_investment",
    "obs_wages",
    "obs_hours",
    "obs_gdpdeflator",
    "obs_nominalrate",
];

/// Lag-only states appended after normalization.
pub const AUGMENTED_STATES: [&str; 3] = ["pi_t1", "n_t1", "z_t1"];

/// Declare every HANK variable on a total grid of `grid_size` points.
pub fn hank_registry(grid_size: usize) -> Result<IndexRegistry, AppError> {
    let mut b = RegistryBuilder::new(grid_size);
    for (symbol, kind, equation) in BACKWARD_LOOKING {
        b.backward_looking(symbol, kind, equation);
    }
    for (symbol, kind, equation) in JUMPS {
        b.jump(symbol, kind, equation);
    }
    for (state, equation, innovation) in SHOCKS {
        b.shock_process(state, equation).exogenous_shock(innovation);
    }
    for symbol in EXPECTED_SHOCKS {
        b.expected_shock(symbol);
    }
    for symbol in OBSERVABLES {
        b.observable(symbol);
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Namespace, Role};
    use proptest::prelude::*;

    #[test]
    fn default_grid_gives_1228_states_with_eq_rm_last() {
        let reg = hank_registry(600).unwrap();
        assert_eq!(reg.scalar_count(), 28);
        assert_eq!(reg.endogenous_dim(), 1228);
        assert_eq!(IndexRegistry::endogenous_dimension(600, 28), 1228);

        let eq_rm = reg.range(Namespace::EquilibriumConditions, "eq_rm").unwrap();
        assert_eq!((eq_rm.first_one_based(), eq_rm.last_one_based()), (1228, 1228));
        assert_eq!(reg.range(Namespace::EndogenousStates, "rm_t").unwrap(), eq_rm);
    }

    #[test]
    fn function_blocks_lead_and_shocks_trail() {
        let reg = hank_registry(600).unwrap();
        let r = |s: &str| reg.range(Namespace::EndogenousStates, s).unwrap().as_range();
        assert_eq!(r("mu_t"), 0..600);
        assert_eq!(r("ell_t"), 600..1200);
        assert_eq!(r("kprime_t"), 1200..1201);
        assert_eq!(reg.model_dim(), 1221);
        assert_eq!(reg.role_dim(Role::ShockProcess), 7);
        assert!(r("zp_t").start >= reg.model_dim());
    }

    #[test]
    fn secondary_namespaces_are_laid_out_in_declaration_order() {
        let reg = hank_registry(10).unwrap();
        assert_eq!(reg.layout(Namespace::ExogenousShocks).dim(), 7);
        assert_eq!(reg.range(Namespace::ExpectedShocks, "E_pi").unwrap().start, 3);
        assert_eq!(reg.range(Namespace::Observables, "obs_nominalrate").unwrap().start, 6);
        assert!(reg.range(Namespace::Observables, "obs_unknown").is_err());
    }

    proptest! {
        #[test]
        fn every_namespace_partitions_its_dimension(nx in 2usize..40, ns in 2usize..5) {
            let reg = hank_registry(nx * ns).unwrap();
            for ns_kind in Namespace::ALL {
                let layout = reg.layout(ns_kind);
                let mut next = 0;
                for (_, range) in layout.iter() {
                    prop_assert_eq!(range.start, next);
                    prop_assert!(!range.is_empty());
                    next = range.end;
                }
                prop_assert_eq!(next, layout.dim());
            }
            prop_assert_eq!(reg.endogenous_dim(), 2 * nx * ns + 28);
        }
    }
}
