//! Two-stage fit: differential evolution, then Nelder–Mead from its best member.

use tracing::warn;

use crate::domain::{FitResult, GlobalOutcome, GlobalSearchConfig, LocalSearchConfig, ParamBounds};
use crate::error::AppError;
use crate::fit::global::differential_evolution;
use crate::fit::local::refine;
use crate::fit::objective::L1Objective;

/// Hooks called between stages so front-ends can report progress.
///
/// All methods default to doing nothing.
pub trait FitProgress {
    fn global_started(&mut self) {}
    fn global_finished(&mut self, _outcome: &GlobalOutcome) {}
    fn local_started(&mut self) {}
}

/// Progress sink that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl FitProgress for Silent {}

/// Run both stages and return the refined fit.
pub fn fit_two_stage(
    objective: &L1Objective,
    bounds: &ParamBounds,
    global: &GlobalSearchConfig,
    local: &LocalSearchConfig,
    progress: &mut dyn FitProgress,
) -> Result<FitResult, AppError> {
    progress.global_started();
    let global_out = differential_evolution(objective, bounds, global)?;
    progress.global_finished(&global_out);

    progress.local_started();
    let local_out = refine(objective, bounds, &global_out.params, local)?;

    // Keep whichever stage ended lower; the clamped simplex result can land above the seed.
    let (params, loss) = if local_out.loss <= global_out.loss {
        (local_out.params, local_out.loss)
    } else {
        warn!(
            global = global_out.loss,
            local = local_out.loss,
            "refinement ended above the global optimum; keeping the global result"
        );
        (global_out.params, global_out.loss)
    };

    Ok(FitResult {
        params,
        loss,
        global: global_out,
        local: local_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, Params};
    use crate::models::{predict, time_grid};

    #[derive(Default)]
    struct Recorder {
        events: Vec<&'static str>,
    }

    impl FitProgress for Recorder {
        fn global_started(&mut self) {
            self.events.push("global_started");
        }
        fn global_finished(&mut self, _outcome: &GlobalOutcome) {
            self.events.push("global_finished");
        }
        fn local_started(&mut self) {
            self.events.push("local_started");
        }
    }

    fn synthetic(params: &Params, n: usize) -> L1Objective {
        let t = time_grid(n, 6.0, 60.0);
        let (x, y) = predict(params, &t);
        let obs = x.into_iter().zip(y).map(|(x, y)| Observation { x, y }).collect();
        L1Objective::new(t, obs).unwrap()
    }

    #[test]
    fn recovers_known_parameters_from_noise_free_data() {
        let obj = synthetic(&Params::new(45.0, 0.0, 10.0), 200);
        let mut progress = Recorder::default();
        let fit = fit_two_stage(
            &obj,
            &ParamBounds::default(),
            &GlobalSearchConfig::default(),
            &LocalSearchConfig::default(),
            &mut progress,
        )
        .unwrap();

        assert!((fit.params.theta_deg - 45.0).abs() < 0.5, "{:?}", fit.params);
        assert!(fit.params.m.abs() < 0.001, "{:?}", fit.params);
        assert!((fit.params.x_offset - 10.0).abs() < 0.5, "{:?}", fit.params);
        assert!(fit.loss < 1e-3, "loss = {}", fit.loss);
        assert!(fit.loss <= fit.global.loss);
        assert_eq!(progress.events, ["global_started", "global_finished", "local_started"]);
    }

    #[test]
    fn final_loss_matches_objective_at_final_params() {
        let obj = synthetic(&Params::new(100.0, 0.02, 70.0), 80);
        let fit = fit_two_stage(
            &obj,
            &ParamBounds::default(),
            &GlobalSearchConfig { maxiter: 20, ..GlobalSearchConfig::default() },
            &LocalSearchConfig::default(),
            &mut Silent,
        )
        .unwrap();
        assert_eq!(fit.loss, obj.loss(&fit.params));
        assert!(ParamBounds::default().contains(&fit.params));
    }
}
