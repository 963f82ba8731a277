//! Global search: differential evolution over the parameter box.
//!
//! The loss surface mixes trigonometric and exponential terms and has many
//! local minima, so a purely local method depends heavily on its starting
//! point. We run a population search first:
//!
//! - population of `popsize * 3` members, Latin-hypercube initialised
//! - `best/1/bin` mutation with a per-generation dithered factor
//! - binomial crossover with at least one mutant coordinate
//! - deferred selection: a whole generation of trials is built, evaluated in
//!   parallel, then compared member by member
//!
//! All search happens in the unit cube and is mapped into the box only for
//! evaluation. Trial coordinates that leave `[0, 1]` are redrawn uniformly, so
//! the objective is never evaluated outside the bounds.
//!
//! Trial construction consumes the seeded RNG sequentially; only evaluation is
//! parallel. The same seed therefore always gives the same result.

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{GlobalOutcome, GlobalSearchConfig, PARAM_DIM, ParamBounds};
use crate::error::AppError;
use crate::fit::objective::L1Objective;
use crate::math::{argmin, mean_std};

/// Smallest population we are willing to run with.
const MIN_POPULATION: usize = 5;

type Member = [f64; PARAM_DIM];

/// Run differential evolution and return the best member found.
pub fn differential_evolution(
    objective: &L1Objective,
    bounds: &ParamBounds,
    config: &GlobalSearchConfig,
) -> Result<GlobalOutcome, AppError> {
    validate(bounds, config)?;

    let np = (config.popsize * PARAM_DIM).max(MIN_POPULATION);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let mut population = latin_hypercube(np, &mut rng);
    let mut energies = evaluate(objective, bounds, &population);
    let mut evaluations = np;

    let mut best = argmin(&energies)
        .ok_or_else(|| AppError::numeric("Every initial population member has a non-finite loss."))?;
    debug!(np, loss = energies[best], "initial population evaluated");

    let mut generations = 0usize;
    let mut converged = has_converged(&energies, config);

    while !converged && generations < config.maxiter {
        let f = if config.mutation.1 > config.mutation.0 {
            rng.gen_range(config.mutation.0..config.mutation.1)
        } else {
            config.mutation.0
        };

        let trials: Vec<Member> = (0..np)
            .map(|i| build_trial(i, best, &population, f, config.recombination, &mut rng))
            .collect();
        let trial_energies = evaluate(objective, bounds, &trials);
        evaluations += np;

        for (i, (trial, energy)) in trials.into_iter().zip(trial_energies).enumerate() {
            if energy <= energies[i] {
                population[i] = trial;
                energies[i] = energy;
            }
        }
        best = argmin(&energies).unwrap_or(best);
        generations += 1;
        converged = has_converged(&energies, config);

        debug!(generation = generations, mutation = f, loss = energies[best], "generation complete");
    }

    let params = bounds.clamp(&bounds.from_unit(&population[best]));
    let loss = objective.loss(&params);
    info!(
        generations,
        evaluations,
        converged,
        loss,
        theta_deg = params.theta_deg,
        m = params.m,
        x_offset = params.x_offset,
        "global search finished"
    );

    Ok(GlobalOutcome {
        params,
        loss,
        generations,
        evaluations,
        converged,
    })
}

fn validate(bounds: &ParamBounds, config: &GlobalSearchConfig) -> Result<(), AppError> {
    for iv in bounds.intervals() {
        if !(iv.lo.is_finite() && iv.hi.is_finite() && iv.hi > iv.lo) {
            return Err(AppError::io(format!(
                "Invalid parameter bounds [{}, {}] (must be finite with hi > lo).",
                iv.lo, iv.hi
            )));
        }
    }
    if config.popsize == 0 {
        return Err(AppError::io("Population size must be >= 1."));
    }
    if !(0.0..=1.0).contains(&config.recombination) {
        return Err(AppError::io("Recombination must lie in [0, 1]."));
    }
    let (lo, hi) = config.mutation;
    if !(lo.is_finite() && hi.is_finite() && 0.0 <= lo && lo <= hi && hi <= 2.0) {
        return Err(AppError::io("Mutation range must satisfy 0 <= lo <= hi <= 2."));
    }
    if !(config.tol.is_finite() && config.tol >= 0.0 && config.atol.is_finite() && config.atol >= 0.0) {
        return Err(AppError::io("Convergence tolerances must be finite and >= 0."));
    }
    Ok(())
}

/// Stratified initial population: each coordinate gets exactly one sample per
/// `1/np` stratum, with strata shuffled independently per dimension.
fn latin_hypercube(np: usize, rng: &mut StdRng) -> Vec<Member> {
    let seg = 1.0 / np as f64;
    let mut population: Vec<Member> = (0..np)
        .map(|i| {
            let mut m = [0.0; PARAM_DIM];
            for v in m.iter_mut() {
                *v = seg * (i as f64 + rng.r#gen::<f64>());
            }
            m
        })
        .collect();

    for j in 0..PARAM_DIM {
        let mut column: Vec<f64> = population.iter().map(|m| m[j]).collect();
        column.shuffle(rng);
        for (m, v) in population.iter_mut().zip(column) {
            m[j] = v;
        }
    }
    population
}

fn build_trial(
    i: usize,
    best: usize,
    population: &[Member],
    f: f64,
    recombination: f64,
    rng: &mut StdRng,
) -> Member {
    let (r0, r1) = pick_two(i, population.len(), rng);
    let base = &population[best];
    let a = &population[r0];
    let b = &population[r1];

    let mut trial = population[i];
    let forced = rng.gen_range(0..PARAM_DIM);
    for j in 0..PARAM_DIM {
        if j == forced || rng.r#gen::<f64>() < recombination {
            trial[j] = base[j] + f * (a[j] - b[j]);
        }
    }

    for v in trial.iter_mut() {
        if !(0.0..=1.0).contains(v) {
            *v = rng.r#gen::<f64>();
        }
    }
    trial
}

/// Two distinct member indices, both different from `exclude`.
fn pick_two(exclude: usize, np: usize, rng: &mut StdRng) -> (usize, usize) {
    let mut draw = |other: Option<usize>| loop {
        let k = rng.gen_range(0..np);
        if k != exclude && Some(k) != other {
            return k;
        }
    };
    let r0 = draw(None);
    let r1 = draw(Some(r0));
    (r0, r1)
}

fn evaluate(objective: &L1Objective, bounds: &ParamBounds, members: &[Member]) -> Vec<f64> {
    members
        .par_iter()
        .map(|u| objective.loss(&bounds.from_unit(u)))
        .collect()
}

fn has_converged(energies: &[f64], config: &GlobalSearchConfig) -> bool {
    match mean_std(energies) {
        Some((mean, std)) if mean.is_finite() && std.is_finite() => {
            std <= config.atol + config.tol * mean.abs()
        }
        _ => false,
    }
}
