//! Console text: progress lines, result block and paste-ready expressions.

use crate::domain::{GlobalOutcome, Params};
use crate::io::ingest::DatasetStats;
use crate::models::{WAVE_FREQ, Y_OFFSET};

/// Line printed before the global search starts.
pub fn format_global_started() -> String {
    "Running global search (this may take a minute)...".to_string()
}

/// Line printed once the global search returns.
pub fn format_global_result(outcome: &GlobalOutcome) -> String {
    let p = &outcome.params;
    format!(
        "Global search result: [{} {} {}] L1 = {}",
        p.theta_deg, p.m, p.x_offset, outcome.loss
    )
}

/// Line printed before the local refinement starts.
pub fn format_local_started() -> String {
    "\nRefining locally with Nelder–Mead...".to_string()
}

/// Short dataset summary (shown in verbose mode and by `report`).
pub fn format_dataset_summary(stats: &DatasetStats, t_min: f64, t_max: f64) -> String {
    format!(
        "Points: n={} | x=[{:.3}, {:.3}] | y=[{:.3}, {:.3}] | t=[{t_min}, {t_max}]",
        stats.n_points, stats.x_min, stats.x_max, stats.y_min, stats.y_max
    )
}

/// The fixed-precision results block.
pub fn format_final_results(params: &Params, loss: f64) -> String {
    let mut out = String::new();
    out.push_str("\n--- FINAL RESULTS ---\n");
    out.push_str(&format!("theta (deg): {:.6}\n", params.theta_deg));
    out.push_str(&format!("M          : {:.8}\n", params.m));
    out.push_str(&format!("X          : {:.6}\n", params.x_offset));
    out.push_str(&format!("L1 sum     : {loss:.6}"));
    out
}

/// Parametric expression in Desmos syntax, full precision.
pub fn desmos_expression(params: &Params) -> String {
    let th = params.theta_deg;
    let m = params.m;
    let x = params.x_offset;
    format!(
        "( t*cos({th}*pi/180) - e^({m}*abs(t))*sin({WAVE_FREQ}t)*sin({th}*pi/180) + {x}, \
         {Y_OFFSET} + t*sin({th}*pi/180) + e^({m}*abs(t))*sin({WAVE_FREQ}t)*cos({th}*pi/180) )"
    )
}

/// The same curve typeset as LaTeX (angles in degrees).
pub fn latex_expression(params: &Params) -> String {
    let th = format!("{:.6}", params.theta_deg);
    let m = format!("{:.8}", params.m);
    let x = format!("{:.6}", params.x_offset);
    format!(
        "\\left(t\\cos({th}^\\circ) - e^{{{m}|t|}}\\sin({WAVE_FREQ}t)\\sin({th}^\\circ) + {x},\\;\
         {Y_OFFSET} + t\\sin({th}^\\circ) + e^{{{m}|t|}}\\sin({WAVE_FREQ}t)\\cos({th}^\\circ)\\right)"
    )
}

/// Both expressions with their headings, ready to print.
///
/// The advertised Desmos domain is the time grid the fit used.
pub fn format_expressions(params: &Params, t_min: f64, t_max: f64) -> String {
    format!(
        "\nPaste this into Desmos (domain {t_min} ≤ t ≤ {t_max}):\n\n{}\n\nSubmission string (LaTeX style):\n\n{}",
        desmos_expression(params),
        latex_expression(params)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Params {
        Params::new(28.118423, 0.02138912, 54.901234)
    }

    #[test]
    fn final_results_use_fixed_precision() {
        let text = format_final_results(&params(), 37.8654321);
        assert!(text.contains("theta (deg): 28.118423\n"));
        assert!(text.contains("M          : 0.02138912\n"));
        assert!(text.contains("X          : 54.901234\n"));
        assert!(text.ends_with("L1 sum     : 37.865432"));
    }

    #[test]
    fn desmos_expression_shape() {
        let s = desmos_expression(&params());
        assert_eq!(
            s,
            "( t*cos(28.118423*pi/180) - e^(0.02138912*abs(t))*sin(0.3t)*sin(28.118423*pi/180) + 54.901234, \
             42 + t*sin(28.118423*pi/180) + e^(0.02138912*abs(t))*sin(0.3t)*cos(28.118423*pi/180) )"
        );
    }

    #[test]
    fn latex_expression_shape() {
        let s = latex_expression(&params());
        assert!(s.starts_with("\\left(t\\cos(28.118423^\\circ) - e^{0.02138912|t|}\\sin(0.3t)"));
        assert!(s.contains("+ 54.901234,\\;42 + t\\sin(28.118423^\\circ)"));
        assert!(s.ends_with("\\cos(28.118423^\\circ)\\right)"));
    }

    #[test]
    fn desmos_domain_follows_time_grid() {
        let default_grid = format_expressions(&params(), 6.0, 60.0);
        assert!(default_grid.contains("(domain 6 ≤ t ≤ 60)"));

        let moved = format_expressions(&params(), 0.5, 80.0);
        assert!(moved.contains("(domain 0.5 ≤ t ≤ 80)"));
        assert!(moved.contains(&desmos_expression(&params())));
        assert!(moved.contains(&latex_expression(&params())));
    }

    #[test]
    fn global_result_line() {
        let outcome = GlobalOutcome {
            params: Params::new(45.5, 0.001, 10.25),
            loss: 3.5,
            generations: 10,
            evaluations: 660,
            converged: true,
        };
        assert_eq!(format_global_result(&outcome), "Global search result: [45.5 0.001 10.25] L1 = 3.5");
    }
}
